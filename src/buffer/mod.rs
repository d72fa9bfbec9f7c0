//! Internal staging buffer management.
//!
//! Readers and writers each own one fixed-size staging buffer. Buffers come
//! from a small thread-local pool so that constructing many short-lived
//! streams on one thread does not reallocate 512 KiB each time. This is an
//! implementation detail and not part of the public API.

mod pool;

pub(crate) use pool::StagingBuffer;
