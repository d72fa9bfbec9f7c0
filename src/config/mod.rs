//! Configuration for readers and writers.
//!
//! This module provides the types that control how a stream is framed and
//! buffered:
//!
//! - [`ReaderConfig`] - Staging buffer size and container format for decompression
//! - [`WriterConfig`] - Compression level, staging buffer size and container format
//! - [`Format`] - Container framing around the DEFLATE data
//!
//! # Example
//!
//! ```
//! use gzstream::{Format, ReaderConfig, WriterConfig};
//!
//! // Custom buffer size
//! let config = ReaderConfig::new(64 * 1024)?;
//!
//! // Fast zlib output
//! let config = WriterConfig::default()
//!     .with_level(1)
//!     .with_format(Format::Zlib);
//!
//! # Ok::<(), gzstream::Error>(())
//! ```

use crate::error::Error;

/// Default staging buffer size (512 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 512 * 1024;

/// Compression level that selects the engine's default.
pub const DEFAULT_LEVEL: i32 = -1;

/// Lowest explicit compression level (stored blocks only).
pub const MIN_LEVEL: i32 = 0;

/// Highest explicit compression level.
pub const MAX_LEVEL: i32 = 9;

/// Container framing around the DEFLATE data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// gzip members (RFC 1952). Concatenated members decode as one stream.
    #[default]
    Gzip,
    /// zlib wrapper (RFC 1950).
    Zlib,
    /// Raw DEFLATE data with no header or trailer (RFC 1951).
    Raw,
}

/// Configuration for a decompressing [`Reader`](crate::Reader).
///
/// # Example
///
/// ```
/// use gzstream::{Format, ReaderConfig};
///
/// let config = ReaderConfig::default()
///     .with_buffer_size(8 * 1024)
///     .with_format(Format::Zlib);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReaderConfig {
    /// Size of the input staging buffer in bytes.
    buffer_size: usize,

    /// Expected container framing.
    format: Format,
}

impl ReaderConfig {
    /// Creates a gzip configuration with the given staging buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `buffer_size` is zero.
    pub fn new(buffer_size: usize) -> Result<Self, Error> {
        let config = Self {
            buffer_size,
            format: Format::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the staging buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the container format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Returns the staging buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the container format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), Error> {
        validate_buffer_size(self.buffer_size)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            format: Format::default(),
        }
    }
}

/// Configuration for a compressing [`Writer`](crate::Writer).
///
/// The level is `-1` for the engine default (currently 6) or an explicit
/// value in `0..=9`. It is range-checked when the engine is initialized, so a
/// builder call never fails on its own.
///
/// # Example
///
/// ```
/// use gzstream::WriterConfig;
///
/// let config = WriterConfig::new(9, 128 * 1024)?;
/// assert_eq!(config.level(), 9);
///
/// assert!(WriterConfig::default().with_level(12).validate().is_err());
/// # Ok::<(), gzstream::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterConfig {
    /// Compression level, `-1` for the engine default.
    level: i32,

    /// Size of the output staging buffer in bytes.
    buffer_size: usize,

    /// Container framing to produce.
    format: Format,
}

impl WriterConfig {
    /// Creates a gzip configuration with the given level and buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the level is outside `-1..=9` or
    /// `buffer_size` is zero.
    pub fn new(level: i32, buffer_size: usize) -> Result<Self, Error> {
        let config = Self {
            level,
            buffer_size,
            format: Format::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the compression level.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Sets the staging buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the container format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Returns the compression level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Returns the staging buffer size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the container format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), Error> {
        validate_level(self.level)?;
        validate_buffer_size(self.buffer_size)
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            buffer_size: DEFAULT_BUFFER_SIZE,
            format: Format::default(),
        }
    }
}

pub(crate) fn validate_level(level: i32) -> Result<(), Error> {
    if level == DEFAULT_LEVEL || (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: "compression level must be -1 or within 0..=9",
        })
    }
}

fn validate_buffer_size(size: usize) -> Result<(), Error> {
    if size == 0 {
        return Err(Error::InvalidConfig {
            message: "buffer size must be non-zero",
        });
    }
    Ok(())
}
