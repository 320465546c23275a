use super::*;

/// _PC_MIN_HOLE_SIZE is 27 on Darwin.
/// https://github.com/apple/darwin-xnu/blob/main/bsd/sys/unistd.h. It doesn't seem to be defined
/// in the libc crate for Darwin.
const _PC_MIN_HOLE_SIZE: i32 = 27;

/// Recommended minimum hole size for sparse files for file descriptor.
/// fpathconf(_PC_MIN_HOLE_SIZE). This is positive if holes are supported, and 1 if holes are
/// supported but the minimum hole size is unspecified.
pub fn fd_min_hole_size(file: &File) -> io::Result<u64> {
    let long = unsafe { libc::fpathconf(file.as_raw_fd(), _PC_MIN_HOLE_SIZE) };
    if long == -1 {
        return Err(io::Error::last_os_error());
    }
    convert_int_io(long)
}
