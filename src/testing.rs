//! Helpers for tests: temporary files with known zero and data regions, and an in-memory target
//! that can be made to misbehave.

use std::cell::{Cell, RefCell};
use std::cmp::min;
use std::io::{Read, Write};

use anyhow::{ensure, Result};
use rand::Rng;
use tempfile::NamedTempFile;

use super::*;

pub fn write_random_tempfile(len: u64) -> Result<NamedTempFile> {
    write_segments_tempfile(&[Segment::Random(len)])
}

/// A run of bytes in a file built by [write_segments_tempfile].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Zeros(u64),
    /// Random bytes, with any zeroes replaced so no window inside is mistaken for a hole.
    Random(u64),
    Bytes(Vec<u8>),
}

pub fn write_segments_tempfile(segments: &[Segment]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    let mut rng = rand::thread_rng();
    let mut buf = [0; 4096];
    let mut len = 0;
    for segment in segments {
        let (mut remaining_size, random) = match segment {
            Segment::Zeros(n) => (*n, false),
            Segment::Random(n) => (*n, true),
            Segment::Bytes(bytes) => {
                file.write_all(bytes)?;
                len += bytes.len() as u64;
                continue;
            }
        };
        while remaining_size > 0 {
            let n1 = min(remaining_size, buf.len() as u64).try_into()?;
            let buf1 = &mut buf[..n1];
            if random {
                rng.fill(&mut *buf1);
                buf1.iter_mut().filter(|b| **b == 0).for_each(|b| *b = 1);
            } else {
                buf1.fill(0);
            }
            file.write_all(buf1)?;
            remaining_size -= n1 as u64;
            len += n1 as u64;
        }
    }
    file.flush()?;
    ensure!(file.as_file().seek_end()? == len);
    Ok(file)
}

/// A window size the temp directory's filesystem will actually punch holes for.
pub fn fs_window_size() -> Result<u64> {
    let file = NamedTempFile::new()?;
    let min_hole_size = sys::fd_min_hole_size(file.as_file())?;
    Ok(min_hole_size.max(4096))
}

pub fn read_all(file: &File) -> Result<Vec<u8>> {
    let mut buf = vec![];
    let mut offset = 0;
    let mut chunk = [0; 4096];
    loop {
        let n = file.read_at(offset, &mut chunk)?;
        if n == 0 {
            return Ok(buf);
        }
        buf.extend_from_slice(&chunk[..n]);
        offset += n as u64;
    }
}

/// Checks the range reads back as zeroes and, where holes can be seen, lies within one.
pub fn check_hole(file: &File, offset: u64, length: u64) -> Result<()> {
    let mut buf = vec![0; length.try_into()?];
    file.read_exact_at(offset, &mut buf)?;
    ensure!(buf.iter().all(|&b| b == 0), "hole has data");
    #[cfg(unix)]
    {
        use sys::seekhole::*;
        let regions = file_regions(file)?;
        ensure!(
            regions
                .iter()
                .any(|region| region.region_type == Hole && region.contains(offset, offset + length)),
            "no hole at {}+{} in {:?}",
            offset,
            length,
            regions
        );
    }
    Ok(())
}

pub fn read_reader(mut reader: impl Read) -> Result<Vec<u8>> {
    let mut buf = vec![];
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// An in-memory scan target that records punches, and can inject short reads and failures.
#[derive(Debug, Default)]
pub struct FakeTarget {
    data: RefCell<Vec<u8>>,
    end: Option<u64>,
    max_read: Option<usize>,
    interrupted_reads: Cell<usize>,
    failing_read_at: Option<u64>,
    failing_seek: bool,
    failing_punch_at: Option<u64>,
    unsupported: bool,
    reads: Cell<usize>,
    prepared: Cell<usize>,
    punched: RefCell<Vec<(u64, u64)>>,
}

impl FakeTarget {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: RefCell::new(data),
            ..Default::default()
        }
    }

    /// Reports this end offset instead of the data length, as if the data was truncated after the
    /// end was probed.
    pub fn with_end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read);
        self
    }

    pub fn with_interrupted_reads(self, count: usize) -> Self {
        self.interrupted_reads.set(count);
        self
    }

    pub fn with_failing_read_at(mut self, offset: u64) -> Self {
        self.failing_read_at = Some(offset);
        self
    }

    pub fn with_failing_seek(mut self) -> Self {
        self.failing_seek = true;
        self
    }

    pub fn with_failing_punch_at(mut self, offset: u64) -> Self {
        self.failing_punch_at = Some(offset);
        self
    }

    pub fn with_unsupported_punching(mut self) -> Self {
        self.unsupported = true;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn prepared(&self) -> usize {
        self.prepared.get()
    }

    /// (offset, length) of every successful punch, in order.
    pub fn punched(&self) -> Vec<(u64, u64)> {
        self.punched.borrow().clone()
    }

    pub fn data(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

impl ReadAt for FakeTarget {
    fn read_at(&self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.set(self.reads.get() + 1);
        let interrupted = self.interrupted_reads.get();
        if interrupted > 0 {
            self.interrupted_reads.set(interrupted - 1);
            return Err(io::ErrorKind::Interrupted.into());
        }
        if self.failing_read_at == Some(pos) {
            return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"));
        }
        let data = self.data.borrow();
        let start = min(pos, data.len() as u64) as usize;
        let mut n = min(buf.len(), data.len() - start);
        if let Some(max_read) = self.max_read {
            n = min(n, max_read);
        }
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }
}

impl ScanSource for FakeTarget {
    fn seek_end(&self) -> io::Result<u64> {
        if self.failing_seek {
            return Err(io::Error::new(io::ErrorKind::Other, "injected seek failure"));
        }
        Ok(self.end.unwrap_or(self.data.borrow().len() as u64))
    }
}

impl HolePuncher for FakeTarget {
    fn prepare(&self) -> PubResult<()> {
        self.prepared.set(self.prepared.get() + 1);
        Ok(())
    }

    fn punch_hole(&self, offset: u64, length: u64) -> PubResult<()> {
        let op = IoOp::PunchHole { offset, length };
        if self.unsupported {
            return Err(Error::punching(op, io::ErrorKind::Unsupported.into()));
        }
        if self.failing_punch_at == Some(offset) {
            return Err(Error::punching(
                op,
                io::Error::new(io::ErrorKind::Other, "injected punch failure"),
            ));
        }
        let start = offset as usize;
        let end = start + length as usize;
        self.data.borrow_mut()[start..end].fill(0);
        self.punched.borrow_mut().push((offset, length));
        Ok(())
    }
}
