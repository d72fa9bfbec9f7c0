//! Bindings to the stateful DEFLATE engine.
//!
//! The engine itself comes from `flate2` (with the `zlib-rs` backend). This
//! module wraps it behind two owning handles so the rest of the crate never
//! sees flate2 types:
//!
//! - [`Inflater`] - Decompression state: init, step, reset, drop
//! - [`Deflater`] - Compression state: init, step, flush, finish, reset, drop
//!
//! Every call returns a [`Step`] describing how much input was consumed, how
//! much output was produced and the engine [`Status`](crate::Status). Neither
//! handle performs I/O.

mod deflate;
mod inflate;

pub(crate) use deflate::Deflater;
pub(crate) use inflate::Inflater;

use crate::status::Status;

/// Window size used for every format (32 KiB history).
pub(crate) const WINDOW_BITS: u8 = 15;

/// Name of the engine backend compiled into this crate (not a version number).
pub const ENGINE_VERSION: &str = "zlib-rs";

/// Result of a single engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    /// Input bytes the engine took.
    pub consumed: usize,
    /// Output bytes the engine wrote.
    pub produced: usize,
    /// What the engine reported.
    pub status: Status,
}

impl Step {
    pub(crate) fn made_progress(&self) -> bool {
        self.consumed > 0 || self.produced > 0
    }
}

/// Converts a flate2 counter delta to a buffer length.
///
/// Deltas are bounded by the slice lengths handed to the engine.
fn delta(after: u64, before: u64) -> usize {
    usize::try_from(after.saturating_sub(before)).unwrap_or(usize::MAX)
}
