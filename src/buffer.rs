//! Fixed-capacity PCM buffer filled by the reader.
//!
//! Storage is allocated once by the caller and never grown or truncated; the
//! reader tracks how much of it a fill actually wrote.

use crate::format::Format;

/// Interleaved integer PCM samples with their format.
#[derive(Debug, Clone)]
pub struct IntBuffer {
    /// Sample storage. Its length is the buffer capacity.
    data: Vec<i32>,
    /// Number of samples written by the last fill.
    len: usize,
    /// Format of the stream the samples came from.
    pub format: Format,
    /// Bit depth of the source samples (e.g. 16 or 24).
    pub source_bit_depth: u32,
}

impl IntBuffer {
    /// Allocate a buffer holding up to `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        IntBuffer {
            data: vec![0; capacity],
            len: 0,
            format: Format::default(),
            source_bit_depth: 0,
        }
    }

    /// Maximum number of samples a fill may write.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of samples written by the last fill.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.data.len()
    }

    /// Free space left in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.len
    }

    /// The samples written by the last fill.
    pub fn filled(&self) -> &[i32] {
        &self.data[..self.len]
    }

    /// Forget the filled samples. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append one sample. Returns false (and writes nothing) when full.
    pub fn push(&mut self, sample: i32) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.len] = sample;
        self.len += 1;
        true
    }

    /// Append as many samples from `samples` as fit, returning how many were taken.
    pub fn extend_from_slice(&mut self, samples: &[i32]) -> usize {
        let n = samples.len().min(self.remaining());
        self.data[self.len..self.len + n].copy_from_slice(&samples[..n]);
        self.len += n;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = IntBuffer::with_capacity(2);
        assert!(buf.push(1));
        assert!(buf.push(2));
        assert!(!buf.push(3));
        assert_eq!(buf.filled(), &[1, 2]);
        assert!(buf.is_full());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = IntBuffer::with_capacity(4);
        buf.extend_from_slice(&[7, 8, 9]);
        assert_eq!(buf.len(), 3);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.remaining(), 4);
    }

    #[test]
    fn extend_takes_what_fits() {
        let mut buf = IntBuffer::with_capacity(3);
        assert_eq!(buf.extend_from_slice(&[1, 2]), 2);
        assert_eq!(buf.extend_from_slice(&[3, 4, 5]), 1);
        assert_eq!(buf.filled(), &[1, 2, 3]);
    }

    #[test]
    fn zero_capacity_is_always_full() {
        let mut buf = IntBuffer::with_capacity(0);
        assert!(buf.is_full());
        assert!(!buf.push(1));
        assert!(buf.filled().is_empty());
    }
}
