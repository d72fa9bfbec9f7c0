//! Engine status codes and their translation into crate errors.
//!
//! - [`Status`] - Closed set of outcomes a single engine call can report
//! - [`Signal`] - The two non-error outcomes left after translation
//!
//! The numeric codes are the ones the zlib C API uses, so statuses can be
//! logged and compared against external tooling.

use std::io;

use crate::error::Error;

/// Outcome of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Progress was made; more may follow.
    Ok,
    /// The engine emitted the final bytes of the current logical member.
    StreamEnd,
    /// The engine's environment failed with the given OS error code.
    Errno(i32),
    /// The call was illegal for the engine's current state.
    StreamError,
    /// The compressed input is malformed.
    DataError(String),
    /// The engine could not allocate memory.
    MemError,
    /// No progress was possible with the buffers supplied.
    BufError,
    /// Engine and binding versions are incompatible.
    VersionError,
}

impl Status {
    /// Returns the zlib numeric code for this status.
    pub fn code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::StreamEnd => 1,
            Status::Errno(_) => -1,
            Status::StreamError => -2,
            Status::DataError(_) => -3,
            Status::MemError => -4,
            Status::BufError => -5,
            Status::VersionError => -6,
        }
    }

    /// Builds a status from a zlib numeric code.
    ///
    /// `Z_ERRNO` (-1) picks up the calling thread's last OS error, which is
    /// where the engine leaves it. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Status> {
        let status = match code {
            0 => Status::Ok,
            1 => Status::StreamEnd,
            -1 => Status::Errno(io::Error::last_os_error().raw_os_error().unwrap_or(0)),
            -2 => Status::StreamError,
            -3 => Status::DataError(String::from("invalid compressed data")),
            -4 => Status::MemError,
            -5 => Status::BufError,
            -6 => Status::VersionError,
            _ => return None,
        };
        Some(status)
    }
}

/// Non-error outcome of a translated [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep going.
    Continue,
    /// The current logical member is complete.
    EndOfStream,
}

/// Maps an engine status to a signal or a crate error.
///
/// [`Status::BufError`] becomes [`Error::Buffer`]; callers that can recover
/// from it match on the status before translating.
pub fn translate(status: Status) -> Result<Signal, Error> {
    match status {
        Status::Ok => Ok(Signal::Continue),
        Status::StreamEnd => Ok(Signal::EndOfStream),
        Status::Errno(code) => Err(Error::Io(io::Error::from_raw_os_error(code))),
        Status::StreamError => Err(Error::Stream(String::from(
            "engine rejected the call in its current state",
        ))),
        Status::DataError(msg) => Err(Error::Data(msg)),
        Status::MemError => Err(Error::Memory),
        Status::BufError => Err(Error::Buffer),
        Status::VersionError => Err(Error::Version),
    }
}

/// Maps a raw zlib numeric code the same way as [`translate`].
///
/// Codes outside the known set become [`Error::Stream`].
pub fn translate_code(code: i32) -> Result<Signal, Error> {
    match Status::from_code(code) {
        Some(status) => translate(status),
        None => Err(Error::Stream(format!("unknown engine status code {code}"))),
    }
}
