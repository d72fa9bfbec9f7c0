//! Error types for gzstream.

use std::io;

use thiserror::Error;

/// Errors that can occur while compressing or decompressing a stream.
///
/// Once a [`Reader`](crate::Reader) or [`Writer`](crate::Writer) returns one of
/// these from a fatal path, the session is poisoned and every later call
/// reports the same error again.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction argument (compression level, buffer size).
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The compressed input is corrupt or truncated.
    #[error("data error: {0}")]
    Data(String),

    /// The call sequence was illegal for the current stream state.
    #[error("stream error: {0}")]
    Stream(String),

    /// The engine could not allocate its internal state.
    #[error("engine out of memory")]
    Memory,

    /// The engine made no progress because both buffers were exhausted.
    #[error("engine buffer error: no progress possible")]
    Buffer,

    /// The engine and its bindings disagree on the library version.
    #[error("engine version mismatch")]
    Version,

    /// An I/O error from the source, the sink, or the engine's environment.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The sink accepted fewer bytes than offered without reporting an error.
    #[error("short write: sink accepted {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes the sink accepted before stalling.
        written: usize,
        /// Bytes that were offered.
        expected: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds an equivalent error for re-reporting from a poisoned session.
    ///
    /// I/O errors keep their OS code when they have one, otherwise their kind
    /// and message.
    pub(crate) fn replicate(&self) -> Error {
        match self {
            Error::InvalidConfig { message } => Error::InvalidConfig { message: *message },
            Error::Data(msg) => Error::Data(msg.clone()),
            Error::Stream(msg) => Error::Stream(msg.clone()),
            Error::Memory => Error::Memory,
            Error::Buffer => Error::Buffer,
            Error::Version => Error::Version,
            Error::Io(e) => match e.raw_os_error() {
                Some(code) => Error::Io(io::Error::from_raw_os_error(code)),
                None => Error::Io(io::Error::new(e.kind(), e.to_string())),
            },
            Error::ShortWrite { written, expected } => Error::ShortWrite {
                written: *written,
                expected: *expected,
            },
        }
    }

    /// Returns `true` for errors raised by the codec rather than the transport.
    pub fn is_codec_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::ShortWrite { .. })
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::Io(inner) => return inner,
            Error::InvalidConfig { .. } => io::ErrorKind::InvalidInput,
            Error::Data(_) => io::ErrorKind::InvalidData,
            Error::ShortWrite { .. } => io::ErrorKind::WriteZero,
            Error::Memory => io::ErrorKind::OutOfMemory,
            Error::Stream(_) | Error::Buffer | Error::Version => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_codec_error());
    }

    #[test]
    fn test_display() {
        let err = Error::ShortWrite {
            written: 3,
            expected: 10,
        };
        assert!(err.to_string().contains("short write"));
        assert!(Error::Data("bad header".into()).to_string().contains("bad header"));
    }

    #[test]
    fn test_io_error_passes_through_unchanged() {
        let err = Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"));
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(back.to_string(), "sink gone");
    }

    #[test]
    fn test_codec_error_maps_to_invalid_data() {
        let back: io::Error = Error::Data("corrupt".into()).into();
        assert_eq!(back.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_replicate_keeps_os_code() {
        let err = Error::Io(io::Error::from_raw_os_error(5));
        match err.replicate() {
            Error::Io(e) => assert_eq!(e.raw_os_error(), Some(5)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_replicate_keeps_kind_and_message() {
        let err = Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "cut short"));
        match err.replicate() {
            Error::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
                assert_eq!(e.to_string(), "cut short");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
