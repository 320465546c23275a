//! Makes files sparse in place. The file is read in fixed-size windows, and every window made up
//! entirely of zero bytes is deallocated with a hole punch that keeps the file size. The logical
//! content of the file never changes, only its physical allocation.

use std::collections::TryReserveError;
use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::SeekFrom::End;
use std::num::NonZeroUsize;

use cfg_if::cfg_if;
use log::{debug, info, trace, warn};
use positioned_io::ReadAt;

pub use config::*;
pub use detector::ZeroDetector;
pub use error::*;
pub use puncher::HolePuncher;
pub use scanner::{ScanSource, Scanner, Window};

#[macro_use]
mod macros;

pub mod config;
mod detector;
mod error;
mod puncher;
mod scanner;
pub mod sys;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Counters for a scan that ran to completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrillStats {
    /// End offset of the target, probed once when the scan started.
    pub end: u64,
    pub windows_scanned: u64,
    pub bytes_scanned: u64,
    pub holes_punched: u64,
    pub bytes_punched: u64,
}

/// Punches a hole over every window of `window_size` bytes in `target` that contains only zeroes.
///
/// Windows start at offset 0 and follow each other by the number of bytes actually read. Scanning
/// stops once less than a full window remains before the end of the target, so a trailing region
/// shorter than `window_size` is never inspected. The first error aborts the scan, and holes already
/// punched are left in place.
///
/// The target must not be written to by anyone else while this runs.
pub fn drill<T>(target: &T, window_size: NonZeroUsize) -> PubResult<DrillStats>
where
    T: ScanSource + HolePuncher + ?Sized,
{
    let detector = ZeroDetector::new(window_size)?;
    let mut scanner = Scanner::new(target, window_size)?;
    target.prepare()?;
    let mut stats = DrillStats {
        end: scanner.end(),
        ..Default::default()
    };
    log_time!(
        "punched zero windows",
        punch_zero_windows(target, &mut scanner, &detector, &mut stats)
    )?;
    info!(
        "scanned {} windows ({} bytes), punched {} holes ({} bytes)",
        stats.windows_scanned, stats.bytes_scanned, stats.holes_punched, stats.bytes_punched
    );
    Ok(stats)
}

fn punch_zero_windows<T>(
    target: &T,
    scanner: &mut Scanner<T>,
    detector: &ZeroDetector,
    stats: &mut DrillStats,
) -> PubResult<()>
where
    T: ScanSource + HolePuncher + ?Sized,
{
    while let Some(Window { offset, bytes }) = scanner.next_window()? {
        // Always the actual read length, which may be short of the window size.
        let length = bytes.len() as u64;
        stats.windows_scanned += 1;
        stats.bytes_scanned += length;
        if !detector.is_zero(bytes) {
            trace!("window at {} has data", offset);
            continue;
        }
        debug!("punching hole at {} length {}", offset, length);
        target.punch_hole(offset, length)?;
        stats.holes_punched += 1;
        stats.bytes_punched += length;
    }
    Ok(())
}

/// Allocates a zero-filled buffer, failing instead of aborting if the memory isn't available.
pub(crate) fn alloc_zeroed(len: usize) -> PubResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { len, source })?;
    buf.resize(len, 0);
    Ok(buf)
}
