use std::ffi::c_int;

use libc::ENXIO;
use libc::{SEEK_DATA, SEEK_HOLE};

use super::*;

type SeekWhence = c_int;

/// Returns None if there's no region of the requested type at or after offset.
pub fn seek_hole_whence(
    file: &File,
    offset: RegionOffset,
    whence: impl Into<SeekWhence>,
) -> io::Result<Option<RegionOffset>> {
    let offset: libc::off_t = convert_int_io(offset)?;
    let new_offset = unsafe { libc::lseek(file.as_raw_fd(), offset, whence.into()) };
    if new_offset == -1 {
        let err = io::Error::last_os_error();
        return if err.raw_os_error() == Some(ENXIO) {
            Ok(None)
        } else {
            Err(err)
        };
    }
    convert_int_io(new_offset).map(Some)
}

impl From<RegionType> for SeekWhence {
    fn from(value: RegionType) -> Self {
        match value {
            Hole => SEEK_HOLE,
            Data => SEEK_DATA,
        }
    }
}
