//! Thread-local pool of fixed-size staging buffers.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Largest buffer that is returned to the pool on drop (1 MiB).
pub const MAX_POOLED_SIZE: usize = 1024 * 1024;

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A fixed-size byte region owned by one reader or writer.
///
/// The length is set at construction and never changes. Contents left over
/// from a previous owner are not cleared; owners only read back what they
/// wrote.
pub struct StagingBuffer {
    data: Vec<u8>,
}

impl StagingBuffer {
    /// Takes a buffer of exactly `size` bytes from the thread-local pool, or
    /// allocates a new one.
    pub fn take(size: usize) -> Self {
        let pooled = THREAD_BUFFER_POOL.with(|pool| {
            let mut pool = pool.borrow_mut();
            pool.iter()
                .position(|buf| buf.len() == size)
                .map(|idx| pool.swap_remove(idx))
        });
        Self {
            data: pooled.unwrap_or_else(|| vec![0u8; size]),
        }
    }

    /// Returns the fixed size of the buffer.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl Deref for StagingBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for StagingBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for StagingBuffer {
    fn drop(&mut self) {
        if self.data.len() <= MAX_POOLED_SIZE {
            // try_with: the pool may already be gone during thread teardown
            let _ = THREAD_BUFFER_POOL.try_with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

impl std::fmt::Debug for StagingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingBuffer")
            .field("capacity", &self.data.len())
            .finish()
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_take_exact_size() {
        let buf = StagingBuffer::take(1000);
        assert_eq!(buf.capacity(), 1000);
        assert_eq!(buf.len(), 1000);
    }

    #[test]
    fn test_buffer_reuse() {
        THREAD_BUFFER_POOL.with(|pool| pool.borrow_mut().clear());
        let size = 12_345;
        let ptr = {
            let mut buf = StagingBuffer::take(size);
            buf[..4].copy_from_slice(b"test");
            buf.as_ptr()
        };

        let buf2 = StagingBuffer::take(size);
        assert_eq!(buf2.capacity(), size);
        assert_eq!(buf2.as_ptr(), ptr, "pooled allocation should be reused");
    }

    #[test]
    fn test_buffer_size_mismatch_allocates() {
        drop(StagingBuffer::take(2048));
        let buf = StagingBuffer::take(4096);
        assert_eq!(buf.capacity(), 4096);
    }

    #[test]
    fn test_oversized_buffer_not_pooled() {
        let size = MAX_POOLED_SIZE + 1;
        drop(StagingBuffer::take(size));
        let pooled = THREAD_BUFFER_POOL.with(|pool| pool.borrow().iter().any(|b| b.len() == size));
        assert!(!pooled);
    }
}
