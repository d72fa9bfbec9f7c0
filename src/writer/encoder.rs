//! Push-based compression into any [`std::io::Write`] sink.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use gzstream::Writer;
//!
//! let mut writer = Writer::new(Vec::new())?;
//! writer.write_all(b"first part, ")?;
//! writer.flush()?; // everything so far is now decodable by the other side
//! writer.write_all(b"second part")?;
//! let compressed = writer.finish()?;
//! assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Write};

use log::{debug, trace};

use crate::buffer::StagingBuffer;
use crate::config::WriterConfig;
use crate::engine::Deflater;
use crate::error::Error;
use crate::status::{Signal, Status, translate};

/// A writer that compresses everything written to it into a sink.
///
/// Each write feeds the whole input to the engine and pushes produced output
/// to the sink through a fixed-size staging buffer, repeating until the
/// engine has absorbed the input. Every produced byte reaches the sink before
/// the staging buffer is reused.
///
/// # Lifecycle
///
/// - [`compress`](Writer::compress) / [`Write::write`] - all-or-error
/// - [`sync`](Writer::sync) / [`Write::flush`] - emit pending output, keep the stream open
/// - [`close`](Writer::close) - write the end marker and trailer
/// - [`reset`](Writer::reset) - start a fresh stream into a new sink, reusing state
///
/// Dropping a writer releases the engine but does not finish the stream:
/// output still buffered inside the engine and the trailer are lost. Call
/// [`close`](Writer::close) or [`finish`](Writer::finish) when the output
/// must be complete.
///
/// # Errors
///
/// Any engine or sink error poisons the writer; later calls return the same
/// error. Sink errors are returned unchanged the first time.
#[derive(Debug)]
pub struct Writer<W> {
    sink: W,
    engine: Deflater,
    staging: StagingBuffer,
    closed: bool,
    poisoned: Option<Error>,
}

impl<W: Write> Writer<W> {
    /// Creates a gzip writer at the default level with a 512 KiB buffer.
    pub fn new(sink: W) -> Result<Self, Error> {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Creates a gzip writer with an explicit level and buffer size.
    ///
    /// `level` is `-1` for the engine default or `0..=9`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an out-of-range level or a zero
    /// buffer size.
    pub fn with_level(sink: W, level: i32, buffer_size: usize) -> Result<Self, Error> {
        let config = WriterConfig::default()
            .with_level(level)
            .with_buffer_size(buffer_size);
        Self::with_config(sink, config)
    }

    /// Creates a writer from a full configuration.
    pub fn with_config(sink: W, config: WriterConfig) -> Result<Self, Error> {
        config.validate()?;
        let engine = Deflater::new(config.format(), config.level())?;
        Ok(Self {
            sink,
            engine,
            staging: StagingBuffer::take(config.buffer_size()),
            closed: false,
            poisoned: None,
        })
    }

    /// Compresses all of `data`.
    ///
    /// Either the whole input is absorbed and `data.len()` is returned, or an
    /// error is returned; partial acceptance is never reported.
    pub fn compress(&mut self, data: &[u8]) -> Result<usize, Error> {
        self.check_open("write")?;
        if data.is_empty() {
            return Ok(0);
        }
        match self.feed(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Pushes everything written so far to the sink without ending the
    /// stream, then flushes the sink.
    ///
    /// A flush with nothing pending is a no-op.
    pub fn sync(&mut self) -> Result<(), Error> {
        self.check_open("flush")?;
        match self.drain_sync() {
            Ok(()) => Ok(()),
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Ends the stream: emits all remaining output and the trailer, then
    /// flushes the sink.
    ///
    /// Closing an already closed writer does nothing and succeeds. The engine
    /// state is kept so the writer can be [`reset`](Writer::reset).
    pub fn close(&mut self) -> Result<(), Error> {
        if self.poisoned.is_some() {
            return Err(self.report());
        }
        if self.closed {
            return Ok(());
        }
        match self.drain_finish() {
            Ok(()) => {
                self.closed = true;
                debug!(
                    "deflate stream closed: {} bytes in, {} bytes out",
                    self.engine.total_in(),
                    self.engine.total_out()
                );
                Ok(())
            }
            Err(e) => Err(self.poison(e)),
        }
    }

    /// Closes the stream and returns the sink.
    pub fn finish(mut self) -> Result<W, Error> {
        self.close()?;
        Ok(self.sink)
    }

    /// Starts a new, independent stream into `sink`, returning the previous
    /// sink.
    ///
    /// The engine state and staging buffer are reinitialized in place rather
    /// than reallocated. The previous stream is not finished; close it first
    /// if it must be complete. A poisoned writer stays poisoned.
    pub fn reset(&mut self, sink: W) -> Result<W, Error> {
        if self.poisoned.is_some() {
            return Err(self.report());
        }
        self.engine.reset();
        self.closed = false;
        debug!("deflate writer reset for a new stream");
        Ok(std::mem::replace(&mut self.sink, sink))
    }

    /// Returns `true` once the current stream has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Uncompressed bytes accepted so far, across resets.
    pub fn total_in(&self) -> u64 {
        self.engine.total_in()
    }

    /// Compressed bytes produced so far, across resets.
    pub fn total_out(&self) -> u64 {
        self.engine.total_out()
    }

    /// Returns a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns a mutable reference to the sink.
    ///
    /// Writing to the sink directly will corrupt the stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut input = data;
        loop {
            let step = self.engine.step(input, &mut self.staging);
            input = &input[step.consumed..];
            push(&mut self.sink, &self.staging[..step.produced])?;

            let filled = step.produced == self.staging.capacity();
            let progressed = step.made_progress();
            match step.status {
                // Input absorbed and the staging buffer had room to spare
                Status::Ok | Status::BufError if input.is_empty() && !filled => return Ok(()),
                Status::Ok | Status::BufError if !progressed => {
                    return Err(Error::Stream(String::from("deflate made no progress")));
                }
                Status::Ok | Status::BufError => {}
                status => {
                    translate(status)?;
                }
            }
        }
    }

    fn drain_sync(&mut self) -> Result<(), Error> {
        // Only the first call carries the sync flush; later calls drain what it left pending
        let mut step = self.engine.flush(&mut self.staging);
        loop {
            push(&mut self.sink, &self.staging[..step.produced])?;
            if step.status == Status::BufError {
                trace!("deflate flush with nothing pending");
                break;
            }
            translate(step.status)?;
            if step.produced < self.staging.capacity() {
                break;
            }
            step = self.engine.step(&[], &mut self.staging);
        }
        self.sink.flush()?;
        Ok(())
    }

    fn drain_finish(&mut self) -> Result<(), Error> {
        let mut after_fill = false;
        loop {
            let step = self.engine.finish(&mut self.staging);
            push(&mut self.sink, &self.staging[..step.produced])?;
            let progressed = step.made_progress();
            match translate(step.status)? {
                Signal::EndOfStream => break,
                // One empty step may follow a step that filled the buffer
                Signal::Continue if !progressed && !after_fill => {
                    return Err(Error::Stream(String::from("deflate finish made no progress")));
                }
                Signal::Continue => {}
            }
            after_fill = step.produced == self.staging.capacity();
        }
        self.sink.flush()?;
        Ok(())
    }

    fn check_open(&mut self, op: &str) -> Result<(), Error> {
        if self.poisoned.is_some() {
            return Err(self.report());
        }
        if self.closed {
            return Err(Error::Stream(format!("{op} after close")));
        }
        Ok(())
    }

    /// Records `err` as terminal and hands it back for this report.
    fn poison(&mut self, err: Error) -> Error {
        debug!("deflate writer poisoned: {err}");
        self.poisoned = Some(err.replicate());
        err
    }

    fn report(&mut self) -> Error {
        match self.poisoned.as_mut() {
            Some(err) => {
                let copy = err.replicate();
                std::mem::replace(err, copy)
            }
            None => Error::Stream(String::from("writer has no recorded error")),
        }
    }
}

/// Writes all of `data` to the sink.
///
/// Partial writes and interruptions are retried; a sink that accepts zero
/// bytes is a short write.
fn push<W: Write>(sink: &mut W, mut data: &[u8]) -> Result<(), Error> {
    let expected = data.len();
    while !data.is_empty() {
        match sink.write(data) {
            Ok(0) => {
                return Err(Error::ShortWrite {
                    written: expected - data.len(),
                    expected,
                });
            }
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(())
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.compress(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync().map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> Vec<u8> {
        let mut reader = Reader::with_buffer_size(data, 64).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    /// Sink that accepts at most `limit` bytes in total, then reports `Ok(0)`.
    struct Stalling {
        accepted: Vec<u8>,
        limit: usize,
    }

    impl Write for Stalling {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit - self.accepted.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Sink that takes one byte per call and is interrupted every other call.
    struct Choppy {
        out: Vec<u8>,
        calls: usize,
    }

    impl Write for Choppy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.out.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_invalid_level() {
        assert!(matches!(
            Writer::with_level(Vec::new(), 11, 1024),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            Writer::with_level(Vec::new(), 6, 0),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_compress_reports_full_length() {
        let mut writer = Writer::with_level(Vec::new(), 6, 32).unwrap();
        let data = vec![7u8; 1000];
        assert_eq!(writer.compress(&data).unwrap(), 1000);
        assert_eq!(writer.compress(&[]).unwrap(), 0);
        assert_eq!(writer.total_in(), 1000);
        let compressed = writer.finish().unwrap();
        assert_eq!(gunzip(&compressed), data);
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut writer = Writer::new(Vec::new()).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.close().unwrap();
        let len = writer.get_ref().len();
        writer.close().unwrap();
        assert_eq!(writer.get_ref().len(), len, "second close must not emit bytes");
        assert!(writer.is_closed());
    }

    #[test]
    fn test_write_after_close() {
        let mut writer = Writer::new(Vec::new()).unwrap();
        writer.close().unwrap();
        assert!(matches!(writer.compress(b"late"), Err(Error::Stream(_))));
        assert!(matches!(writer.sync(), Err(Error::Stream(_))));
    }

    #[test]
    fn test_flush_without_pending_output_is_noop() {
        let mut writer = Writer::new(Vec::new()).unwrap();
        writer.write_all(b"abc").unwrap();
        writer.sync().unwrap();
        let len = writer.get_ref().len();
        writer.sync().unwrap();
        assert_eq!(writer.get_ref().len(), len);
    }

    #[test]
    fn test_short_write_poisons() {
        let stalled = || Stalling {
            accepted: Vec::new(),
            limit: 0,
        };
        let mut writer = Writer::new(stalled()).unwrap();
        let result = writer.compress(b"some data").and_then(|_| writer.close());
        match result {
            Err(Error::ShortWrite { written, expected }) => {
                assert_eq!(written, 0);
                assert!(expected > 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(writer.close(), Err(Error::ShortWrite { .. })));
        assert!(matches!(writer.compress(b"x"), Err(Error::ShortWrite { .. })));
        assert!(matches!(
            writer.reset(stalled()),
            Err(Error::ShortWrite { .. })
        ));
    }

    #[test]
    fn test_partial_and_interrupted_sink_writes() {
        let sink = Choppy {
            out: Vec::new(),
            calls: 0,
        };
        let mut writer = Writer::with_level(sink, 1, 16).unwrap();
        let data: Vec<u8> = (0..3000).map(|i| (i * 31 % 256) as u8).collect();
        writer.write_all(&data).unwrap();
        let sink = writer.finish().unwrap();
        assert_eq!(gunzip(&sink.out), data);
    }

    #[test]
    fn test_sink_error_passes_through() {
        let mut writer = Writer::with_level(Broken, 6, 1024).unwrap();
        let result = writer.compress(b"abc").and_then(|_| writer.sync());
        match result {
            Err(Error::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
                assert_eq!(e.to_string(), "sink closed");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(writer.close(), Err(Error::Io(_))));
    }

    const RECORD: &[u8] = b"exact fill boundary, exact fill boundary. ";

    /// Bytes emitted by the first write, the sync, and the close of a
    /// write/sync/write/close sequence, plus the finished stream.
    fn emitted(buffer_size: usize) -> (usize, usize, usize, Vec<u8>) {
        let mut writer = Writer::with_level(Vec::new(), 6, buffer_size).unwrap();
        writer.compress(RECORD).unwrap();
        let written = writer.get_ref().len();
        writer.sync().unwrap();
        let synced = writer.get_ref().len();
        writer.compress(RECORD).unwrap();
        let before_close = writer.get_ref().len();
        let packed = writer.finish().unwrap();
        let closed = packed.len() - before_close;
        (written, synced - written, closed, packed)
    }

    #[test]
    fn test_staging_buffer_of_header_length() {
        // A gzip header is 10 bytes, so the first step fills the buffer exactly
        for len in [1, 2, 9, 10, 11, 100, 299] {
            let data: Vec<u8> = (0..len).map(|i| (i * 131 % 251) as u8).collect();
            let mut writer = Writer::with_level(Vec::new(), 9, 10).unwrap();
            assert_eq!(writer.compress(&data).unwrap(), len, "len {len}");
            let packed = writer.finish().unwrap();
            assert_eq!(gunzip(&packed), data, "len {len}");
        }
    }

    #[test]
    fn test_output_landing_exactly_on_capacity() {
        let expected = RECORD.repeat(2);
        let (written, synced, closed, reference) = emitted(4096);
        assert_eq!(written, 10, "only the header precedes the first flush");
        assert!(synced > 0 && closed > 0);

        for capacity in [written, synced, closed] {
            let (_, _, _, packed) = emitted(capacity);
            assert_eq!(gunzip(&packed), expected, "capacity {capacity}");
            assert_eq!(packed, reference, "capacity {capacity}");
        }
    }

    #[test]
    fn test_tiny_staging_buffers() {
        let expected = RECORD.repeat(2);
        for capacity in 1..=40 {
            let (_, _, _, packed) = emitted(capacity);
            assert_eq!(gunzip(&packed), expected, "capacity {capacity}");
        }
    }

    #[test]
    fn test_reset_reuses_staging_and_returns_old_sink() {
        let mut writer = Writer::with_level(Vec::new(), 6, 4096).unwrap();
        writer.write_all(b"first stream").unwrap();
        writer.close().unwrap();
        let ptr = writer.staging.as_ptr();

        let first = writer.reset(Vec::new()).unwrap();
        assert!(!writer.is_closed());
        assert_eq!(writer.staging.as_ptr(), ptr);
        writer.write_all(b"second stream").unwrap();
        let second = writer.finish().unwrap();

        assert_eq!(gunzip(&first), b"first stream");
        assert_eq!(gunzip(&second), b"second stream");
    }
}
