use std::fs::{File, OpenOptions};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::sleep;

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info, warn};

use drill::{drill, parse_hole_size_kib, sys, DrillStats, Error, IoOp, Options, MIB};

/// Make a file sparse without using extra disk space, by punching holes in it wherever a whole
/// window of zero bytes is found.
///
/// This has the same effect as `cp --sparse=always` and renaming the copy over the original, but
/// needs no free space for the copy. It relies on the filesystem supporting hole punching (for
/// example FALLOC_FL_PUNCH_HOLE on Linux >= 2.6.38).
///
/// Nobody else may write to the file while it is drilled.
#[derive(Parser)]
#[command(name = "drill", version, about)]
struct Cli {
    /// Size in KiB of the minimum hole to punch. Decimal, 0x hexadecimal or 0 octal. Too small
    /// values might be ignored by the filesystem, too big values use a lot of RAM and find fewer
    /// holes.
    #[arg(
        short = 's',
        long = "hole-size",
        value_name = "HOLE_SIZE",
        default_value = "32",
        value_parser = parse_hole_size_kib
    )]
    window_size: NonZeroUsize,
    /// File to make sparse. It's changed in place.
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and aren't failures. Usage errors are.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = Options::new(cli.window_size);
    if options.warn_about_ram() {
        warn!("{} MiB of RAM will be used", options.buffer_memory() / MIB);
        sleep(options.ram_warning_pause);
    }
    let path = cli.file;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|err| Error::io(IoOp::Open, err))
        .with_context(|| format!("opening {}", path.display()))?;
    check_min_hole_size(&file, options.window_size);
    let allocated_before = sys::file_disk_allocation(&file);
    let scan = drill(&file, options.window_size);
    if let Ok(stats) = &scan {
        report(&file, stats, allocated_before);
    }
    // The close result counts even if the scan failed.
    let close = sys::close_file(file).map_err(|err| Error::io(IoOp::Close, err));
    match (scan, close) {
        (Ok(_), Ok(())) => Ok(()),
        (Err(scan_err), Ok(())) => {
            Err(scan_err).with_context(|| format!("drilling {}", path.display()))
        }
        (Ok(_), Err(close_err)) => {
            Err(close_err).with_context(|| format!("closing {}", path.display()))
        }
        (Err(scan_err), Err(close_err)) => {
            error!("closing {}: {:?}", path.display(), anyhow::Error::from(close_err));
            Err(scan_err).with_context(|| format!("drilling {}", path.display()))
        }
    }
}

fn check_min_hole_size(file: &File, window_size: NonZeroUsize) {
    match sys::fd_min_hole_size(file) {
        Ok(min_hole_size) if (window_size.get() as u64) < min_hole_size => warn!(
            "hole size {} is below the filesystem's minimum hole size {}, holes might not be punched",
            window_size, min_hole_size
        ),
        Ok(_) => {}
        Err(err) => debug!("getting minimum hole size: {}", err),
    }
}

fn report(file: &File, stats: &DrillStats, allocated_before: io::Result<u64>) {
    info!(
        "punched {} holes totalling {} bytes in {} bytes of file",
        stats.holes_punched, stats.bytes_punched, stats.end
    );
    match (allocated_before, sys::file_disk_allocation(file)) {
        (Ok(before), Ok(after)) => info!(
            "disk allocation went from {} to {} bytes, {} reclaimed",
            before,
            after,
            before.saturating_sub(after)
        ),
        (Err(err), _) | (_, Err(err)) => debug!("getting disk allocation: {}", err),
    }
}
