use super::*;

/// The file must be marked sparse first, or the range is only zeroed.
pub fn punchfile(file: &File, offset: u64, length: u64) -> io::Result<()> {
    let beyond_final_zero = offset
        .checked_add(length)
        .ok_or_else(|| io::Error::new(TO_OFF_T_IO_ERROR_KIND, TO_OFF_T_IO_ERR_PAYLOAD))?;
    // FILE_ZERO_DATA_INFORMATION_EX exists but it's for drivers.
    let input = FILE_ZERO_DATA_INFORMATION {
        FileOffset: convert_int_io(offset)?,
        BeyondFinalZero: convert_int_io(beyond_final_zero)?,
    };
    device_io_control_in(file, FSCTL_SET_ZERO_DATA, &input)
}
