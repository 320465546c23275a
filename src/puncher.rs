use super::*;
use crate::sys::SparseFile;

/// Deallocates byte ranges while preserving the logical size and zero content of the target.
pub trait HolePuncher {
    /// Readies the target for punching. Called once before anything is punched.
    fn prepare(&self) -> PubResult<()> {
        Ok(())
    }

    /// Punches a hole over exactly `length` bytes from `offset`. Alignment to filesystem blocks is
    /// left to the platform.
    fn punch_hole(&self, offset: u64, length: u64) -> PubResult<()>;
}

impl HolePuncher for File {
    fn prepare(&self) -> PubResult<()> {
        self.set_sparse(true)
            .map_err(|err| Error::punching(IoOp::SetSparse, err))
    }

    fn punch_hole(&self, offset: u64, length: u64) -> PubResult<()> {
        sys::punchfile(self, offset, length)
            .map_err(|err| Error::punching(IoOp::PunchHole { offset, length }, err))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::testing::*;

    #[test]
    fn unsupported_is_distinguished() {
        let unsupported = Error::punching(
            IoOp::PunchHole {
                offset: 0,
                length: 1,
            },
            io::Error::from(io::ErrorKind::Unsupported),
        );
        assert!(unsupported.is_unsupported());
        assert_eq!(unsupported.io_op(), None);
        let other = Error::punching(
            IoOp::PunchHole {
                offset: 0,
                length: 1,
            },
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(!other.is_unsupported());
        assert_eq!(
            other.io_op(),
            Some(IoOp::PunchHole {
                offset: 0,
                length: 1
            })
        );
    }

    #[cfg(unix)]
    #[test]
    fn unsupported_errnos() {
        for errno in [libc::EOPNOTSUPP, libc::ENOTSUP, libc::ENOSYS] {
            assert!(sys::is_unsupported(&io::Error::from_raw_os_error(errno)));
        }
        assert!(!sys::is_unsupported(&io::Error::from_raw_os_error(
            libc::ENOSPC
        )));
    }

    #[test]
    fn punch_keeps_size_and_zeroes() -> anyhow::Result<()> {
        let window = fs_window_size()?;
        let temp_file = write_random_tempfile(2 * window)?;
        let file = temp_file.as_file();
        file.prepare()?;
        match file.punch_hole(0, window) {
            Err(err) if err.is_unsupported() => return Ok(()),
            res => res?,
        }
        assert_eq!(file.seek_end()?, 2 * window);
        let contents = read_all(file)?;
        assert!(contents[..window as usize].iter().all(|&b| b == 0));
        assert!(contents[window as usize..].iter().any(|&b| b != 0));
        Ok(())
    }
}
