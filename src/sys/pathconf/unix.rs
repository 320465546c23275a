use std::os::unix::fs::MetadataExt;

use super::*;

/// Recommended minimum hole size for sparse files for file descriptor. There's no
/// _PC_MIN_HOLE_SIZE here, so this is the preferred I/O block size, which holes are allocated in.
pub fn fd_min_hole_size(file: &File) -> io::Result<u64> {
    Ok(file.metadata()?.blksize())
}
