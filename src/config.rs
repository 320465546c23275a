//! Scan options and the parsing of user supplied sizes.

use std::time::Duration;

use super::*;

pub const KIB: usize = 1024;
pub const MIB: usize = 1024 * KIB;

/// Minimum hole size used when none is given, in KiB.
pub const DEFAULT_HOLE_SIZE_KIB: usize = 32;

/// Window sizes at or above this get a warning, since two buffers of that size are allocated.
pub const RAM_WARNING_THRESHOLD: usize = 100 * MIB;

pub const RAM_WARNING_PAUSE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Both the unit of zero detection and the size of every hole punched.
    pub window_size: NonZeroUsize,
    pub ram_warning_threshold: usize,
    pub ram_warning_pause: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self::new(default_window_size())
    }
}

impl Options {
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            window_size,
            ram_warning_threshold: RAM_WARNING_THRESHOLD,
            ram_warning_pause: RAM_WARNING_PAUSE,
        }
    }

    /// Memory held for the duration of a scan: the read buffer plus the zero reference.
    pub fn buffer_memory(&self) -> usize {
        self.window_size.get().saturating_mul(2)
    }

    pub fn warn_about_ram(&self) -> bool {
        self.window_size.get() >= self.ram_warning_threshold
    }
}

pub fn default_window_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_HOLE_SIZE_KIB * KIB).expect("default hole size is non-zero")
}

/// Parses a hole size in KiB into a window size in bytes. Accepts decimal, `0x` prefixed
/// hexadecimal and `0` prefixed octal, the way strtoul does with base 0.
pub fn parse_hole_size_kib(arg: &str) -> PubResult<NonZeroUsize> {
    let arg = arg.trim();
    let (digits, radix) = if let Some(hex) = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
    {
        (hex, 16)
    } else if arg.len() > 1 && arg.starts_with('0') {
        (&arg[1..], 8)
    } else {
        (arg, 10)
    };
    let kib = usize::from_str_radix(digits, radix)
        .map_err(|err| Error::Argument(format!("hole size {:?}: {}", arg, err)))?;
    let bytes = kib
        .checked_mul(KIB)
        .ok_or_else(|| Error::Argument(format!("hole size {} KiB is too large", kib)))?;
    NonZeroUsize::new(bytes)
        .ok_or_else(|| Error::Argument("hole size should be greater than 0".to_owned()))
}
