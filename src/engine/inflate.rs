//! Decompression state.

use flate2::{Decompress, DecompressError, FlushDecompress};

use super::{Step, WINDOW_BITS, delta};
use crate::config::Format;
use crate::status::Status;

/// Owning handle to one inflate session.
///
/// Dropping the handle releases the engine state.
pub(crate) struct Inflater {
    inner: Decompress,
    format: Format,
    /// Input consumed since the last init or reset.
    member_in: u64,
    total_in: u64,
    total_out: u64,
}

impl Inflater {
    /// Initializes a decompression session for `format`.
    pub(crate) fn new(format: Format) -> Self {
        Self {
            inner: init(format),
            format,
            member_in: 0,
            total_in: 0,
            total_out: 0,
        }
    }

    /// Runs one engine step over `input`, writing into `output`.
    pub(crate) fn step(&mut self, input: &[u8], output: &mut [u8]) -> Step {
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let result = self.inner.decompress(input, output, FlushDecompress::None);
        let consumed = delta(self.inner.total_in(), before_in);
        let produced = delta(self.inner.total_out(), before_out);

        self.member_in += consumed as u64;
        self.total_in += consumed as u64;
        self.total_out += produced as u64;

        let status = match result {
            Ok(flate2::Status::Ok) => Status::Ok,
            Ok(flate2::Status::BufError) => Status::BufError,
            Ok(flate2::Status::StreamEnd) => Status::StreamEnd,
            Err(e) => Status::DataError(describe(&e)),
        };
        Step {
            consumed,
            produced,
            status,
        }
    }

    /// Prepares the session for the next logical member.
    ///
    /// zlib and raw sessions are reset in place. The engine's in-place reset
    /// does not keep gzip framing, so gzip sessions are rebuilt.
    pub(crate) fn reset(&mut self) {
        match self.format {
            Format::Gzip => self.inner = init(Format::Gzip),
            Format::Zlib => self.inner.reset(true),
            Format::Raw => self.inner.reset(false),
        }
        self.member_in = 0;
    }

    /// Returns `true` if the current member has consumed input but not ended.
    pub(crate) fn member_in_progress(&self) -> bool {
        self.member_in > 0
    }

    /// Compressed bytes consumed over the whole session.
    pub(crate) fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decompressed bytes produced over the whole session.
    pub(crate) fn total_out(&self) -> u64 {
        self.total_out
    }
}

fn init(format: Format) -> Decompress {
    match format {
        Format::Gzip => Decompress::new_gzip(WINDOW_BITS),
        Format::Zlib => Decompress::new(true),
        Format::Raw => Decompress::new(false),
    }
}

fn describe(err: &DecompressError) -> String {
    match err.needs_dictionary() {
        Some(adler) => format!("stream requires preset dictionary {adler:#010x}"),
        None => err.to_string(),
    }
}

impl std::fmt::Debug for Inflater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inflater")
            .field("format", &self.format)
            .field("member_in", &self.member_in)
            .field("total_in", &self.total_in)
            .field("total_out", &self.total_out)
            .finish()
    }
}
