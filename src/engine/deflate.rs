//! Compression state.

use flate2::{Compress, Compression, FlushCompress};
use log::debug;

use super::{Step, WINDOW_BITS, delta};
use crate::config::{DEFAULT_LEVEL, Format, validate_level};
use crate::error::Error;
use crate::status::Status;

/// Owning handle to one deflate session.
///
/// Dropping the handle releases the engine state. It never emits the
/// trailer of an unfinished stream; that takes an explicit finish.
pub(crate) struct Deflater {
    inner: Compress,
    format: Format,
    /// Set once any input or flush has been fed since init or reset.
    dirty: bool,
    /// Set once the finish loop has reported stream end.
    finished: bool,
    total_in: u64,
    total_out: u64,
}

impl Deflater {
    /// Initializes a compression session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `level` is not `-1` or in `0..=9`.
    pub(crate) fn new(format: Format, level: i32) -> Result<Self, Error> {
        validate_level(level)?;
        let compression = if level == DEFAULT_LEVEL {
            Compression::default()
        } else {
            Compression::new(level as u32)
        };
        let inner = match format {
            Format::Gzip => Compress::new_gzip(compression, WINDOW_BITS),
            Format::Zlib => Compress::new(compression, true),
            Format::Raw => Compress::new(compression, false),
        };
        Ok(Self {
            inner,
            format,
            dirty: false,
            finished: false,
            total_in: 0,
            total_out: 0,
        })
    }

    /// Feeds `input` without forcing output.
    pub(crate) fn step(&mut self, input: &[u8], output: &mut [u8]) -> Step {
        if !input.is_empty() {
            self.dirty = true;
        }
        self.run(input, output, FlushCompress::None)
    }

    /// Emits everything producible so far without ending the stream.
    pub(crate) fn flush(&mut self, output: &mut [u8]) -> Step {
        self.dirty = true;
        self.run(&[], output, FlushCompress::Sync)
    }

    /// Drives the stream towards its end marker and trailer.
    pub(crate) fn finish(&mut self, output: &mut [u8]) -> Step {
        self.dirty = true;
        let step = self.run(&[], output, FlushCompress::Finish);
        if step.status == Status::StreamEnd {
            self.finished = true;
        }
        step
    }

    /// Reinitializes the session in place for a new logical stream.
    pub(crate) fn reset(&mut self) {
        self.inner.reset();
        self.dirty = false;
        self.finished = false;
    }

    /// Uncompressed bytes consumed over the lifetime of the handle.
    pub(crate) fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Compressed bytes produced over the lifetime of the handle.
    pub(crate) fn total_out(&self) -> u64 {
        self.total_out
    }

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: FlushCompress) -> Step {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let result = self.inner.compress(input, output, flush);
        let consumed = delta(self.inner.total_in(), before_in);
        let produced = delta(self.inner.total_out(), before_out);

        self.total_in += consumed as u64;
        self.total_out += produced as u64;

        let status = match result {
            Ok(flate2::Status::Ok) => Status::Ok,
            Ok(flate2::Status::BufError) => Status::BufError,
            Ok(flate2::Status::StreamEnd) => Status::StreamEnd,
            Err(_) => Status::StreamError,
        };
        Step {
            consumed,
            produced,
            status,
        }
    }
}

impl Drop for Deflater {
    fn drop(&mut self) {
        if self.dirty && !self.finished {
            debug!(
                "{:?} deflate stream dropped before finish ({} bytes in, {} bytes out); trailer not written",
                self.format, self.total_in, self.total_out
            );
        }
    }
}

impl std::fmt::Debug for Deflater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deflater")
            .field("format", &self.format)
            .field("finished", &self.finished)
            .field("total_in", &self.total_in)
            .field("total_out", &self.total_out)
            .finish()
    }
}
