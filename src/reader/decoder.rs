//! Pull-based decompression over any [`std::io::Read`] source.
//!
//! This module implements the decompressing half of the crate:
//!
//! - [`Reader`] - Owns an inflate session and an input staging buffer
//! - [`ReadProgress`] - What one call produced and whether the stream ended
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use gzstream::{Reader, Writer};
//!
//! let mut writer = Writer::new(Vec::new())?;
//! std::io::Write::write_all(&mut writer, b"hello world")?;
//! let compressed = writer.finish()?;
//!
//! let mut reader = Reader::new(&compressed[..])?;
//! let mut text = String::new();
//! reader.read_to_string(&mut text)?;
//! assert_eq!(text, "hello world");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Read};

use log::{debug, trace};

use crate::buffer::StagingBuffer;
use crate::config::ReaderConfig;
use crate::engine::{Inflater, Step};
use crate::error::Error;
use crate::status::{Signal, Status, translate};

/// Outcome of one [`Reader::read_stream`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadProgress {
    /// Bytes written into the caller's buffer by this call.
    pub written: usize,
    /// `true` once the source is exhausted and every member has ended.
    ///
    /// The `written` bytes of the same call are still valid.
    pub finished: bool,
}

/// Terminal condition of a reader.
#[derive(Debug)]
enum Terminal {
    /// Clean end of all input.
    End,
    /// Fatal error, re-reported on every call.
    Failed(Error),
}

/// A reader that decompresses a gzip, zlib or raw DEFLATE stream.
///
/// `Reader` pulls compressed bytes from its source into a fixed-size staging
/// buffer only when the engine has consumed everything staged so far, then
/// drives the engine until the caller's buffer is full, the stream ends or an
/// error occurs.
///
/// # Members
///
/// A single call never decodes across the end of a logical member. When a
/// member ends, the engine is reset in place and the next call continues with
/// whatever follows in the source, so concatenated gzip members read back as
/// one stream.
///
/// # Errors
///
/// Errors are sticky. After a fatal error every later call returns the same
/// error. Errors from the source are returned unchanged the first time.
///
/// # Source contract
///
/// The source follows the [`Read`] contract: `Ok(0)` into a non-empty buffer
/// means exhaustion. Exhaustion in the middle of a member is reported as
/// [`Error::Data`]. Reads failing with [`io::ErrorKind::Interrupted`] are
/// retried.
#[derive(Debug)]
pub struct Reader<R> {
    source: R,
    engine: Option<Inflater>,
    staging: StagingBuffer,
    /// Unconsumed window of `staging`; fully consumed when `pos == len`.
    pos: usize,
    len: usize,
    source_eof: bool,
    terminal: Option<Terminal>,
}

impl<R: Read> Reader<R> {
    /// Creates a gzip reader with the default 512 KiB staging buffer.
    pub fn new(source: R) -> Result<Self, Error> {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Creates a gzip reader with the given staging buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `buffer_size` is zero.
    pub fn with_buffer_size(source: R, buffer_size: usize) -> Result<Self, Error> {
        Self::with_config(source, ReaderConfig::default().with_buffer_size(buffer_size))
    }

    /// Creates a reader from a full configuration.
    pub fn with_config(source: R, config: ReaderConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            source,
            engine: Some(Inflater::new(config.format())),
            staging: StagingBuffer::take(config.buffer_size()),
            pos: 0,
            len: 0,
            source_eof: false,
            terminal: None,
        })
    }

    /// Decompresses into `out`, reporting whether the stream has ended.
    ///
    /// Returns the number of bytes written. `finished` is set once the
    /// source is exhausted and the last member has ended; a later call then
    /// returns zero bytes with `finished` still set.
    ///
    /// If an error occurs after some bytes were produced, those bytes are
    /// returned and the error is reported by the next call.
    pub fn read_stream(&mut self, out: &mut [u8]) -> Result<ReadProgress, Error> {
        match self.terminal {
            Some(Terminal::End) => {
                return Ok(ReadProgress {
                    written: 0,
                    finished: true,
                });
            }
            Some(Terminal::Failed(_)) => return Err(self.report()),
            None => {}
        }
        if self.engine.is_none() {
            return Err(Error::Stream(String::from("read after close")));
        }

        let written = self.decode(out);

        match self.terminal {
            Some(Terminal::Failed(_)) if written == 0 => Err(self.report()),
            Some(Terminal::End) => Ok(ReadProgress {
                written,
                finished: true,
            }),
            _ => Ok(ReadProgress {
                written,
                finished: false,
            }),
        }
    }

    /// Runs the feed/drain loop, recording any terminal condition.
    fn decode(&mut self, out: &mut [u8]) -> usize {
        let Some(engine) = self.engine.as_mut() else {
            return 0;
        };
        let mut written = 0;

        while self.terminal.is_none() && written < out.len() {
            let step = if self.pos < self.len {
                let step = engine.step(&self.staging[self.pos..self.len], &mut out[written..]);
                if stalled(&step) {
                    self.terminal = Some(fail(Error::Stream(format!(
                        "inflate made no progress ({:?})",
                        step.status
                    ))));
                    break;
                }
                step
            } else if self.source_eof {
                if !engine.member_in_progress() {
                    trace!("inflate reader finished: {} bytes out", engine.total_out());
                    self.terminal = Some(Terminal::End);
                    break;
                }
                // Drain output the engine still holds for the open member
                let step = engine.step(&[], &mut out[written..]);
                if stalled(&step) {
                    self.terminal = Some(fail(Error::Data(String::from(
                        "unexpected end of compressed stream",
                    ))));
                    break;
                }
                step
            } else {
                match self.source.read(&mut self.staging) {
                    Ok(0) => {
                        trace!("inflate source exhausted after {} bytes", engine.total_in());
                        self.source_eof = true;
                    }
                    Ok(n) => {
                        self.pos = 0;
                        self.len = n;
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => self.terminal = Some(fail(Error::Io(e))),
                }
                continue;
            };

            self.pos += step.consumed;
            written += step.produced;
            match translate(step.status) {
                Ok(Signal::Continue) => {}
                Ok(Signal::EndOfStream) => {
                    debug!(
                        "inflate member ended: {} bytes in, {} bytes out so far",
                        engine.total_in(),
                        engine.total_out()
                    );
                    engine.reset();
                    break;
                }
                Err(e) => {
                    self.terminal = Some(fail(e));
                    break;
                }
            }
        }
        written
    }

    /// Returns the recorded error, keeping an equivalent copy for later calls.
    fn report(&mut self) -> Error {
        match self.terminal.as_mut() {
            Some(Terminal::Failed(err)) => {
                let copy = err.replicate();
                std::mem::replace(err, copy)
            }
            _ => Error::Stream(String::from("reader has no recorded error")),
        }
    }

    /// Releases the engine state.
    ///
    /// Succeeds if the stream ended cleanly or no error was recorded.
    /// Otherwise returns the recorded error. Calling `close` again is
    /// harmless and gives the same answer.
    pub fn close(&mut self) -> Result<(), Error> {
        self.engine = None;
        match self.terminal {
            Some(Terminal::Failed(_)) => Err(self.report()),
            _ => Ok(()),
        }
    }

    /// Compressed bytes consumed from the source so far.
    pub fn total_in(&self) -> u64 {
        self.engine.as_ref().map_or(0, Inflater::total_in)
    }

    /// Decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.engine.as_ref().map_or(0, Inflater::total_out)
    }

    /// Returns a reference to the source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns a mutable reference to the source.
    ///
    /// Reading from the source directly will corrupt the stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Consumes the reader, returning the source.
    ///
    /// Staged input that the engine has not consumed yet is lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}

/// A step that moved no bytes and reported nothing conclusive.
fn stalled(step: &Step) -> bool {
    !step.made_progress() && matches!(step.status, Status::Ok | Status::BufError)
}

fn fail(err: Error) -> Terminal {
    debug!("inflate reader poisoned: {err}");
    Terminal::Failed(err)
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // A member boundary can yield zero bytes without ending the stream
        loop {
            let progress = self.read_stream(buf)?;
            if progress.written > 0 || progress.finished {
                return Ok(progress.written);
            }
        }
    }
}
