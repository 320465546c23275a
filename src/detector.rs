use super::*;

/// Classifies windows as all-zero by comparing against a reference buffer of zeroes.
#[derive(Debug)]
pub struct ZeroDetector {
    zeros: Vec<u8>,
}

impl ZeroDetector {
    pub fn new(window_size: NonZeroUsize) -> PubResult<Self> {
        Ok(Self {
            zeros: alloc_zeroed(window_size.get())?,
        })
    }

    pub fn window_size(&self) -> usize {
        self.zeros.len()
    }

    /// Whether every byte of `window` is zero. Windows may be shorter than the window size, but
    /// never longer.
    pub fn is_zero(&self, window: &[u8]) -> bool {
        debug_assert!(window.len() <= self.zeros.len());
        window == &self.zeros[..window.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(window_size: usize) -> ZeroDetector {
        ZeroDetector::new(NonZeroUsize::new(window_size).unwrap()).unwrap()
    }

    #[test]
    fn all_zero_windows() {
        let detector = detector(4096);
        assert_eq!(detector.window_size(), 4096);
        assert!(detector.is_zero(&[0; 4096]));
        // Short reads only compare what was read.
        assert!(detector.is_zero(&[0; 100]));
        assert!(detector.is_zero(&[]));
    }

    #[test]
    fn single_nonzero_byte() {
        let detector = detector(512);
        for index in [0, 1, 255, 510, 511] {
            let mut window = vec![0; 512];
            window[index] = 1;
            assert!(!detector.is_zero(&window), "non-zero byte at {}", index);
        }
        assert!(!detector.is_zero(&[0, 0, 0x80]));
    }
}
