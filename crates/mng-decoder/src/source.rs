use std::io::{self, Read};

use bytes::Bytes;
use mng_types::{Chunk, Term};
use mng_wire::ChunkTag;

use crate::error::Warning;

/// Result of one host pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// `n` bytes were written to the front of the buffer. `Data(0)` is
    /// treated like `Pending`.
    Data(usize),
    /// Nothing available right now; the decoder suspends.
    Pending,
    /// No more data will ever arrive.
    Eof,
}

/// The host side of a decoder.
///
/// Only `read_data` is required. A push-only host can use [`NoSource`]
/// and feed bytes through [`MngDecoder::push_data`](crate::MngDecoder::push_data).
///
/// The `process_*` hooks see each record after it parsed and before it
/// is stored. Returning `false` aborts the decode with
/// [`DecodeError::Rejected`](crate::DecodeError::Rejected):
///
/// ```text
/// ┌──────────────────┬──────────────────────────────┐
/// │ Hook             │ Called for                   │
/// ├──────────────────┼──────────────────────────────┤
/// │ process_header   │ IHDR, JHDR, MHDR             │
/// │ process_text     │ tEXt, zTXt, iTXt             │
/// │ process_term     │ TERM                         │
/// │ process_unknown  │ tags the registry lacks      │
/// └──────────────────┴──────────────────────────────┘
/// ```
pub trait DataSource {
    /// Fill the front of `buf` with up to `buf.len()` bytes.
    ///
    /// # Errors
    ///
    /// Any I/O error aborts the decode with `DecodeError::Io`.
    fn read_data(&mut self, buf: &mut [u8]) -> io::Result<Pull>;

    /// Called once: on a clean finish, or when the pull reports `Eof`
    /// before the stream could finish. The document is only marked
    /// complete in the first case.
    fn close_stream(&mut self) {}

    /// Receives caller-owned pushed buffers once the decoder is done
    /// with them.
    fn release_data(&mut self, _data: Bytes) {}

    /// Side channel for recoverable conditions.
    fn warning(&mut self, _warning: &Warning) {}

    fn process_header(&mut self, _header: &Chunk) -> bool {
        true
    }

    fn process_text(&mut self, _text: &Chunk) -> bool {
        true
    }

    fn process_term(&mut self, _term: &Term) -> bool {
        true
    }

    /// `payload` is the raw chunk data, without length, tag or CRC.
    fn process_unknown(&mut self, _tag: ChunkTag, _payload: &[u8]) -> bool {
        true
    }
}

impl<S: DataSource + ?Sized> DataSource for &mut S {
    fn read_data(&mut self, buf: &mut [u8]) -> io::Result<Pull> {
        (**self).read_data(buf)
    }

    fn close_stream(&mut self) {
        (**self).close_stream();
    }

    fn release_data(&mut self, data: Bytes) {
        (**self).release_data(data);
    }

    fn warning(&mut self, warning: &Warning) {
        (**self).warning(warning);
    }

    fn process_header(&mut self, header: &Chunk) -> bool {
        (**self).process_header(header)
    }

    fn process_text(&mut self, text: &Chunk) -> bool {
        (**self).process_text(text)
    }

    fn process_term(&mut self, term: &Term) -> bool {
        (**self).process_term(term)
    }

    fn process_unknown(&mut self, tag: ChunkTag, payload: &[u8]) -> bool {
        (**self).process_unknown(tag, payload)
    }
}

/// Host that never supplies data; everything arrives by push.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSource;

impl DataSource for NoSource {
    fn read_data(&mut self, _buf: &mut [u8]) -> io::Result<Pull> {
        Ok(Pull::Pending)
    }
}

/// Adapter over any [`std::io::Read`].
///
/// `Ok(0)` is end of stream. `WouldBlock` suspends the decoder, so a
/// non-blocking socket can be driven by calling `resume` when it becomes
/// readable again.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    closed: bool,
}

impl<R: Read> ReadSource<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Whether the decoder has signalled the end of the stream.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> DataSource for ReadSource<R> {
    fn read_data(&mut self, buf: &mut [u8]) -> io::Result<Pull> {
        loop {
            match self.inner.read(buf) {
                Ok(0) => return Ok(Pull::Eof),
                Ok(n) => return Ok(Pull::Data(n)),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(Pull::Pending),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn close_stream(&mut self) {
        self.closed = true;
    }
}

/// In-memory source that hands out at most `step` bytes per pull.
///
/// With [`drip`](Self::drip) it reports `Pending` after every delivery,
/// so the decoder suspends once per `step` bytes. That models a
/// non-blocking host and is how tests exercise suspend and resume.
#[derive(Clone, Debug)]
pub struct SliceSource {
    data: Bytes,
    pos: usize,
    step: usize,
    suspend_between: bool,
    delivered: bool,
    closed: usize,
    released: Vec<Bytes>,
    warnings: Vec<Warning>,
}

impl SliceSource {
    /// Whole-buffer source: every pull gets as much as it asks for.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            step: usize::MAX,
            suspend_between: false,
            delivered: false,
            closed: 0,
            released: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// `step` bytes per pull, with a `Pending` after each.
    pub fn drip(data: impl Into<Bytes>, step: usize) -> Self {
        Self {
            step: step.max(1),
            suspend_between: true,
            ..Self::new(data)
        }
    }

    /// Bytes not yet pulled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// How many times `close_stream` was called.
    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closed
    }

    /// Caller-owned buffers returned by the decoder, in release order.
    #[must_use]
    pub fn released(&self) -> &[Bytes] {
        &self.released
    }

    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl DataSource for SliceSource {
    fn read_data(&mut self, buf: &mut [u8]) -> io::Result<Pull> {
        if self.pos == self.data.len() {
            return Ok(Pull::Eof);
        }
        if self.suspend_between && self.delivered {
            self.delivered = false;
            return Ok(Pull::Pending);
        }
        let n = buf.len().min(self.step).min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.delivered = true;
        Ok(Pull::Data(n))
    }

    fn close_stream(&mut self) {
        self.closed += 1;
    }

    fn release_data(&mut self, data: Bytes) {
        self.released.push(data);
    }

    fn warning(&mut self, warning: &Warning) {
        self.warnings.push(warning.clone());
    }
}
