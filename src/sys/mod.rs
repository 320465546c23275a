//! Exposes the lower-level OS primitives needed to make files sparse: hole punching, the sparse
//! attribute, recommended hole sizes, disk allocation and checked closing.

use super::*;

mod pathconf;
mod punchfile;
#[cfg(unix)]
pub mod seekhole;

use std::num::TryFromIntError;

pub use pathconf::*;
pub use punchfile::*;

cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use self::windows::*;
        pub use ::windows::Win32::System::Ioctl::*;
        use ::windows::Win32::Foundation::*;
        use std::os::windows::io::AsRawHandle;
        use ::windows::Win32::Storage::FileSystem::*;
        use ::windows::Win32::System::IO::*;
    } else if #[cfg(unix)] {
        mod unix;
        pub use unix::*;
        pub(crate) use std::os::fd::AsRawFd;
        pub(crate) use std::os::fd::AsFd;
    }
}

pub trait SparseFile {
    fn set_sparse(&self, set_sparse: bool) -> io::Result<()>;
}

#[cfg(not(windows))]
impl SparseFile for File {
    fn set_sparse(&self, _set_sparse: bool) -> io::Result<()> {
        // Any file can have holes punched on unix.
        Ok(())
    }
}

pub(crate) const TO_OFF_T_IO_ERROR_KIND: io::ErrorKind = io::ErrorKind::InvalidInput;
pub(crate) const TO_OFF_T_IO_ERR_PAYLOAD: &str = "offset out of range for file syscall";

/// Converts between integer types for syscall arguments, turning overflow into an io::Error so it
/// comes out of the syscall wrappers like any other failure.
pub(crate) fn convert_int_io<F, T>(from: F) -> io::Result<T>
where
    F: TryInto<T, Error = TryFromIntError>,
{
    from.try_into()
        .map_err(|_| io::Error::new(TO_OFF_T_IO_ERROR_KIND, TO_OFF_T_IO_ERR_PAYLOAD))
}

/// Whether an error from the hole punching machinery means it isn't available at all, rather than
/// that it failed this time.
pub fn is_unsupported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
        || err.raw_os_error().map_or(false, is_unsupported_os_error)
}
