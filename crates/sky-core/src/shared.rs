//! Shared per-band intensity buffers.
//!
//! A [`SharedBuffer`] holds one byte per pixel and is genuinely shared (not
//! copied) between exactly one writer, the band's scaler worker, and one
//! reader, the compositor. No lock protects the bytes: stores and loads are
//! relaxed atomics, so a reader may observe a buffer mid-write. The result
//! is at worst a one-frame tear between old and new values for a band that
//! is currently being rescaled, self-correcting on the next pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// A fixed-length byte buffer shared between a scaler and the compositor.
///
/// Capacity is fixed at creation; the buffer is never resized, only
/// replaced wholesale by the channel store when a band's size changes.
#[derive(Clone)]
pub struct SharedBuffer {
    data: Arc<[AtomicU8]>,
}

impl SharedBuffer {
    /// Allocates a zeroed buffer of `len` bytes.
    pub fn new(len: usize) -> Self {
        let data: Arc<[AtomicU8]> = (0..len).map(|_| AtomicU8::new(0)).collect();
        Self { data }
    }

    /// Buffer length in bytes (one per pixel).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stores one byte at flat pixel index `i`.
    #[inline]
    pub fn store(&self, i: usize, value: u8) {
        self.data[i].store(value, Ordering::Relaxed);
    }

    /// Loads the byte at flat pixel index `i`.
    #[inline]
    pub fn load(&self, i: usize) -> u8 {
        self.data[i].load(Ordering::Relaxed)
    }

    /// Copies `src` into the buffer, byte by byte.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != self.len()`; the channel store guarantees
    /// matching lengths before a scaler writes.
    pub fn write_from(&self, src: &[u8]) {
        assert_eq!(src.len(), self.len(), "shared buffer length mismatch");
        for (slot, &v) in self.data.iter().zip(src) {
            slot.store(v, Ordering::Relaxed);
        }
    }

    /// Copies the current contents out.
    ///
    /// The copy is not atomic with respect to a concurrent writer; it may
    /// mix old and new values across pixels.
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }

    /// Resets every byte to zero.
    pub fn clear(&self) {
        for slot in self.data.iter() {
            slot.store(0, Ordering::Relaxed);
        }
    }
}

impl std::fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBuffer").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let buf = SharedBuffer::new(4);
        buf.write_from(&[1, 2, 3, 4]);
        assert_eq!(buf.snapshot(), vec![1, 2, 3, 4]);
        assert_eq!(buf.load(2), 3);
    }

    #[test]
    fn test_clear() {
        let buf = SharedBuffer::new(3);
        buf.write_from(&[9, 9, 9]);
        buf.clear();
        assert_eq!(buf.snapshot(), vec![0, 0, 0]);
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = SharedBuffer::new(2);
        let b = a.clone();
        a.store(0, 42);
        assert_eq!(b.load(0), 42);
    }
}
