use super::*;

/// Something windows can be read from by position, with an end found by seeking.
pub trait ScanSource: ReadAt {
    /// Returns the offset of the end of the source.
    fn seek_end(&self) -> io::Result<u64>;
}

impl ScanSource for File {
    fn seek_end(&self) -> io::Result<u64> {
        // Seek is implemented for &File, so the shared reference is enough.
        let mut file = self;
        file.seek(End(0))
    }
}

/// A run of bytes read from a source, at most the window size long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
    pub offset: u64,
    pub bytes: &'a [u8],
}

/// Walks a source from offset 0 in window-sized positioned reads, until less than a window remains
/// before the end probed at construction.
#[derive(Debug)]
pub struct Scanner<'a, S: ?Sized> {
    source: &'a S,
    buf: Vec<u8>,
    offset: u64,
    end: u64,
    done: bool,
}

impl<'a, S> Scanner<'a, S>
where
    S: ScanSource + ?Sized,
{
    pub fn new(source: &'a S, window_size: NonZeroUsize) -> PubResult<Self> {
        let buf = alloc_zeroed(window_size.get())?;
        let end = source
            .seek_end()
            .map_err(|err| Error::io(IoOp::Seek, err))?;
        Ok(Self {
            source,
            buf,
            offset: 0,
            end,
            done: false,
        })
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Offset the next window will be read from.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn next_window(&mut self) -> PubResult<Option<Window<'_>>> {
        if self.done {
            return Ok(None);
        }
        let window_size = self.buf.len() as u64;
        match self.offset.checked_add(window_size) {
            Some(window_end) if window_end <= self.end => {}
            _ => {
                self.done = true;
                return Ok(None);
            }
        }
        let offset = self.offset;
        let n = read_window(self.source, offset, &mut self.buf)?;
        if n == 0 {
            warn!(
                "nothing read at offset {}, expected data up to {}. was the file truncated?",
                offset, self.end
            );
            self.done = true;
            return Ok(None);
        }
        // A short read is final for this window. The next one starts where it left off.
        self.offset += n as u64;
        Ok(Some(Window {
            offset,
            bytes: &self.buf[..n],
        }))
    }
}

fn read_window<S: ReadAt + ?Sized>(source: &S, offset: u64, buf: &mut [u8]) -> PubResult<usize> {
    loop {
        match source.read_at(offset, buf) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::io(IoOp::Read { offset }, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use test_log::test;

    use super::*;
    use crate::testing::FakeTarget;

    fn window_size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn collect_windows<S: ScanSource + ?Sized>(
        scanner: &mut Scanner<S>,
    ) -> PubResult<Vec<(u64, Vec<u8>)>> {
        let mut windows = vec![];
        while let Some(window) = scanner.next_window()? {
            windows.push((window.offset, window.bytes.to_vec()));
        }
        Ok(windows)
    }

    #[test]
    fn trailing_region_not_read() -> anyhow::Result<()> {
        let data: Vec<u8> = (0..10).collect();
        let target = FakeTarget::new(data);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        assert_eq!(scanner.end(), 10);
        let windows = collect_windows(&mut scanner)?;
        assert_eq!(
            windows,
            vec![(0, vec![0, 1, 2, 3]), (4, vec![4, 5, 6, 7])]
        );
        assert_eq!(scanner.offset(), 8);
        // Exhausted scanners stay exhausted.
        assert!(scanner.next_window()?.is_none());
        Ok(())
    }

    #[test]
    fn exact_multiple_reads_last_window() -> anyhow::Result<()> {
        let target = FakeTarget::new(vec![7; 12]);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        let offsets: Vec<_> = collect_windows(&mut scanner)?
            .into_iter()
            .map(|(offset, _)| offset)
            .collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        Ok(())
    }

    #[test]
    fn smaller_than_window() -> anyhow::Result<()> {
        let target = FakeTarget::new(vec![0; 3]);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        assert!(scanner.next_window()?.is_none());
        assert_eq!(target.reads(), 0);
        Ok(())
    }

    #[test]
    fn short_reads_advance_by_bytes_read() -> anyhow::Result<()> {
        let data: Vec<u8> = (0..16).collect();
        let target = FakeTarget::new(data).with_max_read(3);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        let windows = collect_windows(&mut scanner)?;
        assert_eq!(
            windows,
            vec![
                (0, vec![0, 1, 2]),
                (3, vec![3, 4, 5]),
                (6, vec![6, 7, 8]),
                (9, vec![9, 10, 11]),
                (12, vec![12, 13, 14]),
            ]
        );
        // 12 + 4 <= 16, but 15 + 4 isn't.
        assert_eq!(scanner.offset(), 15);
        Ok(())
    }

    #[test]
    fn truncated_source_stops() -> anyhow::Result<()> {
        let target = FakeTarget::new(vec![1; 8]).with_end(16);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        let windows = collect_windows(&mut scanner)?;
        assert_eq!(windows.len(), 2);
        assert_eq!(scanner.offset(), 8);
        Ok(())
    }

    #[test]
    fn interrupted_reads_retried() -> anyhow::Result<()> {
        let target = FakeTarget::new(vec![0; 8]).with_interrupted_reads(2);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        assert_eq!(collect_windows(&mut scanner)?.len(), 2);
        Ok(())
    }

    #[test]
    fn read_failure_names_offset() -> anyhow::Result<()> {
        let target = FakeTarget::new(vec![0; 12]).with_failing_read_at(4);
        let mut scanner = Scanner::new(&target, window_size(4))?;
        assert!(scanner.next_window()?.is_some());
        let err = scanner.next_window().unwrap_err();
        assert_eq!(err.io_op(), Some(IoOp::Read { offset: 4 }));
        Ok(())
    }

    #[test]
    fn seek_failure() {
        let target = FakeTarget::new(vec![0; 12]).with_failing_seek();
        let err = Scanner::new(&target, window_size(4)).unwrap_err();
        assert_eq!(err.io_op(), Some(IoOp::Seek));
    }

    #[test]
    fn reads_real_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&[1; 10])?;
        let mut scanner = Scanner::new(file.as_file(), window_size(5))?;
        assert_eq!(scanner.end(), 10);
        assert_eq!(collect_windows(&mut scanner)?.len(), 2);
        Ok(())
    }
}
