use std::os::fd::IntoRawFd;
use std::os::unix::fs::MetadataExt;

use super::*;

/// Bytes of storage actually allocated to the file. st_blocks is always in 512 byte units.
pub fn file_disk_allocation(file: &File) -> io::Result<u64> {
    Ok(file.metadata()?.blocks() * 512)
}

/// Closes the file and reports the result, which dropping a File silently discards.
pub fn close_file(file: File) -> io::Result<()> {
    nix::unistd::close(file.into_raw_fd()).map_err(io::Error::from)
}

pub(crate) fn is_unsupported_os_error(errno: i32) -> bool {
    errno == libc::EOPNOTSUPP || errno == libc::ENOTSUP || errno == libc::ENOSYS
}
