//! Compressing writer.
//!
//! - [`Writer`] - Push-based compression with `write()` / `flush()` / `close()` / `reset()`

mod encoder;

pub use encoder::Writer;
