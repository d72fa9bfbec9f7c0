//! Convenience helpers built on [`Reader`] and [`Writer`].
//!
//! - [`compress_bytes`] / [`decompress_bytes`] - whole payloads already in memory
//! - [`compress`] / [`decompress`] - stream-to-stream copies with bounded memory

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::{ReaderConfig, WriterConfig};
use crate::error::Error;
use crate::reader::Reader;
use crate::writer::Writer;

/// Chunk size used when copying between a stream and the caller's side.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Compresses an in-memory payload into a complete stream.
///
/// # Example
///
/// ```
/// use gzstream::{WriterConfig, compress_bytes, decompress_bytes, ReaderConfig};
///
/// let packed = compress_bytes(b"hello hello hello", &WriterConfig::default())?;
/// let unpacked = decompress_bytes(packed, &ReaderConfig::default())?;
/// assert_eq!(&unpacked[..], b"hello hello hello");
/// # Ok::<(), gzstream::Error>(())
/// ```
pub fn compress_bytes(data: impl AsRef<[u8]>, config: &WriterConfig) -> Result<Bytes, Error> {
    let data = data.as_ref();
    let mut writer = Writer::with_config(BytesMut::with_capacity(data.len() / 2).writer(), *config)?;
    writer.compress(data)?;
    Ok(writer.finish()?.into_inner().freeze())
}

/// Decompresses an in-memory stream.
///
/// Fails with [`Error::Data`] if the stream is corrupt or truncated.
pub fn decompress_bytes(data: impl Into<Bytes>, config: &ReaderConfig) -> Result<Bytes, Error> {
    let data = data.into();
    let mut out = BytesMut::with_capacity(data.len().saturating_mul(2)).writer();
    let mut reader = Reader::with_config(data.reader(), *config)?;
    copy(&mut reader, &mut out)?;
    reader.close()?;
    Ok(out.into_inner().freeze())
}

/// Compresses everything from `source` into `sink`.
///
/// Returns the number of uncompressed bytes read.
pub fn compress<R: Read, W: Write>(
    mut source: R,
    sink: W,
    config: &WriterConfig,
) -> Result<u64, Error> {
    let mut writer = Writer::with_config(sink, *config)?;
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        };
        writer.compress(&buf[..n])?;
        total += n as u64;
    }
    writer.close()?;
    Ok(total)
}

/// Decompresses everything from `source` into `sink`.
///
/// Returns the number of decompressed bytes written.
pub fn decompress<R: Read, W: Write>(
    source: R,
    mut sink: W,
    config: &ReaderConfig,
) -> Result<u64, Error> {
    let mut reader = Reader::with_config(source, *config)?;
    let copied = copy(&mut reader, &mut sink)?;
    reader.close()?;
    sink.flush()?;
    Ok(copied)
}

/// Copies until the reader reports the end of the stream.
///
/// Goes through [`Reader::read_stream`] so codec errors keep their type.
fn copy<R: Read, W: Write>(reader: &mut Reader<R>, sink: &mut W) -> Result<u64, Error> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let progress = reader.read_stream(&mut buf)?;
        sink.write_all(&buf[..progress.written])?;
        total += progress.written as u64;
        if progress.finished {
            return Ok(total);
        }
    }
}
