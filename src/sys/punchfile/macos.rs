use std::io::Error;

use super::*;

/// F_PUNCHHOLE wants offset and length aligned to the filesystem block size, and fails with EINVAL
/// otherwise.
pub fn punchfile(file: &File, offset: u64, length: u64) -> io::Result<()> {
    let punchhole = libc::fpunchhole_t {
        fp_flags: 0,
        reserved: 0,
        fp_offset: convert_int_io(offset)?,
        fp_length: convert_int_io(length)?,
    };
    let fcntl_res =
        unsafe { libc::fcntl(file.as_fd().as_raw_fd(), libc::F_PUNCHHOLE, &punchhole) };
    if fcntl_res == -1 {
        return Err(Error::last_os_error());
    }
    Ok(())
}
