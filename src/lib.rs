//! gzstream
//!
//! Bounded-memory streaming compression for Rust.
//!
//! `gzstream` compresses and decompresses gzip, zlib and raw DEFLATE streams
//! through fixed-size staging buffers, so payloads larger than memory can be
//! processed without ever being held whole. It is designed as a small,
//! composable primitive for:
//!
//! - log and archive pipelines
//! - network protocols that carry compressed bodies
//! - storage engines that compress blocks on the way to disk
//!
//! The crate intentionally:
//! - does NOT implement DEFLATE itself (the engine comes from `flate2`)
//! - does NOT spawn threads or compress blocks in parallel
//! - does NOT support preset dictionaries
//! - does NOT buffer whole payloads
//!
//! It only does one thing: **bytes in → (de)compressed bytes out**
//!
//! # Decompress
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::Read;
//! use gzstream::{Error, Reader};
//!
//! fn main() -> Result<(), Error> {
//!     let mut reader = Reader::new(File::open("data.gz")?)?;
//!     let mut buf = [0u8; 8192];
//!
//!     loop {
//!         let progress = reader.read_stream(&mut buf)?;
//!         println!("{} bytes", progress.written);
//!         if progress.finished {
//!             break;
//!         }
//!     }
//!     reader.close()
//! }
//! ```
//!
//! # Compress
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::Write;
//! use gzstream::{Error, Writer};
//!
//! fn main() -> Result<(), Error> {
//!     let mut writer = Writer::with_level(File::create("data.gz")?, 9, 512 * 1024)?;
//!     writer.write_all(b"hello world")?;
//!     writer.close()
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod reader;
mod status;
mod util;
mod writer;

mod buffer; // internal (thread-local staging buffers)
mod engine; // internal flate2 binding

//
// Public surface (intentionally tiny)
//

pub use config::{
    DEFAULT_BUFFER_SIZE, DEFAULT_LEVEL, Format, MAX_LEVEL, MIN_LEVEL, ReaderConfig, WriterConfig,
};
pub use engine::ENGINE_VERSION;
pub use error::{Error, Result};
pub use reader::{ReadProgress, Reader};
pub use status::{Signal, Status, translate, translate_code};
pub use util::{compress, compress_bytes, decompress, decompress_bytes};
pub use writer::Writer;

/// Returns the name of the DEFLATE backend compiled into this crate.
///
/// This is a backend name such as `"zlib-rs"`, not a version number. The
/// backend exposes no version string without `unsafe` code.
///
/// ```
/// assert_eq!(gzstream::version(), "zlib-rs");
/// ```
pub fn version() -> &'static str {
    ENGINE_VERSION
}
