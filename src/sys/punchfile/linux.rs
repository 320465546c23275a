use std::io::Error;

use super::*;

pub fn punchfile(file: &File, offset: u64, length: u64) -> io::Result<()> {
    let fd = file.as_fd().as_raw_fd();
    let mode = libc::FALLOC_FL_KEEP_SIZE | libc::FALLOC_FL_PUNCH_HOLE;
    let offset: libc::off64_t = convert_int_io(offset)?;
    let length: libc::off64_t = convert_int_io(length)?;
    if -1 == unsafe { libc::fallocate64(fd, mode, offset, length) } {
        return Err(Error::last_os_error());
    }
    Ok(())
}
