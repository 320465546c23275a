use std::io::Error;
use std::mem;

use super::*;

pub fn punchfile(file: &File, offset: u64, length: u64) -> io::Result<()> {
    let rqsr = libc::spacectl_range {
        r_offset: convert_int_io(offset)?,
        r_len: convert_int_io(length)?,
    };
    let mut rmsr: libc::spacectl_range = unsafe { mem::zeroed() };
    let rv = unsafe {
        libc::fspacectl(
            file.as_fd().as_raw_fd(),
            libc::SPACECTL_DEALLOC,
            &rqsr,
            0,
            &mut rmsr,
        )
    };
    if rv == -1 {
        return Err(Error::last_os_error());
    }
    if rmsr.r_len != 0 {
        warn!(
            "spacectl dealloc of {}+{} left {}+{} unprocessed",
            rqsr.r_offset, rqsr.r_len, rmsr.r_offset, rmsr.r_len
        );
    }
    Ok(())
}
