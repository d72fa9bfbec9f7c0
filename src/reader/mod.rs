//! Decompressing reader.
//!
//! - [`Reader`] - Pull-based decompression with `read_stream()` / `close()`

mod decoder;

pub use decoder::{ReadProgress, Reader};
