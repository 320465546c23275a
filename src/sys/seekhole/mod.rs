//! Hole-seeking ( ͡° ͜ʖ ͡°): lists the data and hole regions of a file. Scans don't use this, they
//! always read every window, but it's how to check what a scan left behind.

pub use RegionType::*;

use super::*;

mod unix;
pub use self::unix::*;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RegionType {
    Hole,
    Data,
}

impl std::ops::Not for RegionType {
    type Output = RegionType;

    fn not(self) -> Self::Output {
        match self {
            Hole => Data,
            Data => Hole,
        }
    }
}

pub type RegionOffset = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub region_type: RegionType,
    pub start: RegionOffset,
    pub end: RegionOffset,
}

impl Region {
    pub fn length(&self) -> RegionOffset {
        self.end - self.start
    }

    pub fn contains(&self, start: RegionOffset, end: RegionOffset) -> bool {
        self.start <= start && end <= self.end
    }
}

pub fn file_regions(file: &File) -> io::Result<Vec<Region>> {
    Iter::new(file).collect()
}

pub struct Iter<'a> {
    last_whence: RegionType,
    offset: RegionOffset,
    file: &'a File,
}

impl<'a> Iter<'a> {
    pub fn new(file: &'a File) -> Self {
        Self {
            // Start with whatever most likely gives a positive seek on the first next. Most files
            // start with data.
            last_whence: Data,
            offset: 0,
            file,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = io::Result<Region>;

    fn next(&mut self) -> Option<Self::Item> {
        let first_whence = !self.last_whence;
        let mut whence = first_whence;
        // This only runs twice. Once with each whence, starting with the one we didn't try last.
        loop {
            match seek_hole_whence(self.file, self.offset, whence) {
                Ok(Some(offset)) if offset != self.offset => {
                    let region = Region {
                        region_type: !whence,
                        start: self.offset,
                        end: offset,
                    };
                    self.last_whence = whence;
                    self.offset = offset;
                    return Some(Ok(region));
                }
                Err(err) => return Some(Err(err)),
                Ok(None | Some(_)) => {}
            }
            whence = !whence;
            if whence == first_whence {
                break;
            }
        }
        // Both SEEK_DATA and SEEK_HOLE failed to move the offset. If a file ends in a hole,
        // SEEK_HOLE gets stuck, so the end offset is used to get past a final hole.
        match self.file.seek_end() {
            Err(err) => Some(Err(err)),
            Ok(offset) if offset == self.offset => None,
            Ok(offset) => {
                let region = Region {
                    region_type: Hole,
                    start: self.offset,
                    end: offset,
                };
                self.last_whence = Hole;
                self.offset = offset;
                Some(Ok(region))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::testing::*;

    #[test]
    fn just_a_hole() -> anyhow::Result<()> {
        let min_hole_size = fs_window_size()?;
        let temp_file = write_random_tempfile(2 * min_hole_size)?;
        let file = temp_file.as_file();
        let regions = file_regions(file)?;
        assert_eq!(
            regions,
            vec![Region {
                region_type: Data,
                start: 0,
                end: 2 * min_hole_size
            }]
        );
        match punchfile(file, 0, min_hole_size) {
            Err(err) if is_unsupported(&err) => return Ok(()),
            res => res?,
        }
        let regions = file_regions(file)?;
        assert_eq!(
            regions,
            vec![
                Region {
                    region_type: Hole,
                    start: 0,
                    end: min_hole_size
                },
                Region {
                    region_type: Data,
                    start: min_hole_size,
                    end: 2 * min_hole_size,
                }
            ]
        );
        Ok(())
    }
}
