use std::fmt;

use thiserror::Error;

use super::*;

pub type PubResult<T> = Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    Argument(String),
    #[error("{op} failed")]
    Io {
        op: IoOp,
        #[source]
        source: io::Error,
    },
    #[error("hole punching is not supported for this file")]
    UnsupportedOperation(#[source] io::Error),
    #[error("allocating {len} byte buffer")]
    Allocation {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

/// The file operation an I/O error came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Seek,
    Read { offset: u64 },
    SetSparse,
    PunchHole { offset: u64, length: u64 },
    Close,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use IoOp::*;
        match self {
            Open => write!(f, "open"),
            Seek => write!(f, "seek to end"),
            Read { offset } => write!(f, "read at offset {}", offset),
            SetSparse => write!(f, "set sparse"),
            PunchHole { offset, length } => {
                write!(f, "punch hole at offset {} length {}", offset, length)
            }
            Close => write!(f, "close"),
        }
    }
}

impl Error {
    pub fn io(op: IoOp, source: io::Error) -> Self {
        Self::Io { op, source }
    }

    /// Like [Error::io], but for requests to the hole punching machinery, where a missing
    /// implementation is reported separately.
    pub fn punching(op: IoOp, source: io::Error) -> Self {
        if sys::is_unsupported(&source) {
            Self::UnsupportedOperation(source)
        } else {
            Self::io(op, source)
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }

    /// The failed operation, for I/O errors.
    pub fn io_op(&self) -> Option<IoOp> {
        match self {
            Self::Io { op, .. } => Some(*op),
            _ => None,
        }
    }
}
