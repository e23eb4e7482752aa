use std::sync::Arc;

use bytes::Bytes;
use mng_types::{Chunk, ChunkDocument, ChunkRegistry};
use mng_wire::frame::{LENGTH_SIZE, framed_length, split_frame};
use mng_wire::signature::SIGNATURE_SIZE;
use mng_wire::{ChunkTag, CrcVerdict, Flavor};
use tracing::{debug, trace, warn};

use crate::buffer::{ByteSource, Fill};
use crate::checkpoint::{Checkpoint, Step, Tier};
use crate::config::DecoderConfig;
use crate::error::{DecodeError, Warning};
use crate::push::Ownership;
use crate::source::{DataSource, NoSource, SliceSource};

/// Where a call to [`MngDecoder::read`] or [`MngDecoder::resume`] left
/// the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStatus {
    /// The stream ended cleanly and the document is complete.
    Finished,
    /// The host ran out of data. Supply more, then call `resume`.
    NeedMoreData,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Reading,
    Suspended,
    Finished,
    Failed,
}

/// Headers whose terminator has not been seen yet.
#[derive(Clone, Copy, Debug, Default)]
struct OpenHeaders {
    ihdr: bool,
    jhdr: bool,
    mhdr: bool,
}

impl OpenHeaders {
    fn track(&mut self, tag: ChunkTag) {
        match tag {
            ChunkTag::IHDR => self.ihdr = true,
            ChunkTag::JHDR => self.jhdr = true,
            ChunkTag::MHDR => self.mhdr = true,
            ChunkTag::IEND => {
                self.ihdr = false;
                self.jhdr = false;
            }
            ChunkTag::MEND => self.mhdr = false,
            _ => {}
        }
    }

    fn any(self) -> bool {
        self.ihdr || self.jhdr || self.mhdr
    }
}

/// Incremental PNG/MNG/JNG decoder.
///
/// The decoder pulls bytes from a [`DataSource`] and builds a
/// [`ChunkDocument`]. Whenever the host has nothing more to give,
/// [`read`](Self::read) returns [`ReadStatus::NeedMoreData`] and keeps
/// whatever was already staged; [`resume`](Self::resume) continues from
/// that exact point.
///
/// ```text
///   ┌──────────┐ 8 bytes ┌────────┐ 4 bytes ┌──────┐ framed ┌──────────┐
///   │Signature │────────▶│ Length │────────▶│ Body │───────▶│ Dispatch │
///   └──────────┘         └────────┘         └──────┘        └──────────┘
///                            ▲                                   │
///                            └──────── header still open ────────┘
/// ```
///
/// Dispatch applies the CRC policy, parses the payload through the
/// registry and appends the record. The stream finishes once no `IHDR`,
/// `JHDR` or `MHDR` is left open.
///
/// # Example
///
/// ```rust
/// use mng_decoder::{MngDecoder, Ownership, ReadStatus};
/// use mng_wire::Flavor;
///
/// let mut decoder = MngDecoder::push_only();
/// decoder.push_sig(Flavor::Png).unwrap();
/// decoder.push_chunk(b"IEND".to_vec(), Ownership::Engine);
/// assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);
/// assert_eq!(decoder.document().len(), 1);
/// ```
pub struct MngDecoder<S: DataSource = NoSource> {
    config: DecoderConfig,
    registry: Arc<ChunkRegistry>,
    input: ByteSource<S>,
    doc: ChunkDocument,
    warnings: Vec<Warning>,
    state: State,
    step: Step,
    signature_read: bool,
    open: OpenHeaders,
    closed: bool,
    dispatched: u64,
}

impl MngDecoder<NoSource> {
    /// Decoder fed only through the push API.
    #[must_use]
    pub fn push_only() -> Self {
        Self::new(NoSource)
    }

    #[must_use]
    pub fn push_only_with_config(config: DecoderConfig) -> Self {
        Self::with_config(NoSource, config)
    }
}

impl MngDecoder<SliceSource> {
    /// Decode a complete in-memory stream with the default configuration.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] raised while reading.
    pub fn decode(bytes: &[u8]) -> Result<ChunkDocument, DecodeError> {
        Self::decode_with_config(bytes, DecoderConfig::default())
    }

    /// # Errors
    ///
    /// Any [`DecodeError`] raised while reading.
    pub fn decode_with_config(
        bytes: &[u8],
        config: DecoderConfig,
    ) -> Result<ChunkDocument, DecodeError> {
        let mut decoder =
            MngDecoder::with_config(SliceSource::new(Bytes::copy_from_slice(bytes)), config);
        match decoder.read()? {
            ReadStatus::Finished => Ok(decoder.into_document()),
            ReadStatus::NeedMoreData => Err(DecodeError::UnexpectedEof {
                step: decoder.step,
            }),
        }
    }
}

impl<S: DataSource> MngDecoder<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, DecoderConfig::default())
    }

    #[must_use]
    pub fn with_config(source: S, config: DecoderConfig) -> Self {
        Self {
            input: ByteSource::new(source, config.read_buffer_size),
            config,
            registry: ChunkRegistry::standard(),
            doc: ChunkDocument::new(),
            warnings: Vec::new(),
            state: State::Idle,
            step: Step::Signature,
            signature_read: false,
            open: OpenHeaders::default(),
            closed: false,
            dispatched: 0,
        }
    }

    /// Use `registry` instead of the standard chunk table.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ChunkRegistry>) -> Self {
        self.registry = registry;
        self
    }

    // ── Driving ─────────────────────────────────────────────────────────

    /// Start decoding. Valid once per decoder.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::AlreadyReading`] on a second call.
    /// - Any format, I/O or end-of-stream error. Chunks appended before
    ///   the error stay in the document.
    pub fn read(&mut self) -> Result<ReadStatus, DecodeError> {
        if self.state != State::Idle {
            return Err(DecodeError::AlreadyReading);
        }
        self.run()
    }

    /// Continue after [`ReadStatus::NeedMoreData`].
    ///
    /// # Errors
    ///
    /// - [`DecodeError::NotSuspended`] unless the last call suspended.
    /// - Anything [`read`](Self::read) can return.
    pub fn resume(&mut self) -> Result<ReadStatus, DecodeError> {
        if self.state != State::Suspended {
            return Err(DecodeError::NotSuspended);
        }
        trace!(step = %self.step, "resuming");
        self.run()
    }

    fn run(&mut self) -> Result<ReadStatus, DecodeError> {
        self.state = State::Reading;
        let result = self.drive();
        self.state = match result {
            Ok(ReadStatus::Finished) => State::Finished,
            Ok(ReadStatus::NeedMoreData) => State::Suspended,
            Err(_) => State::Failed,
        };
        result
    }

    fn drive(&mut self) -> Result<ReadStatus, DecodeError> {
        loop {
            if self.dispatch_pushed()? {
                return Ok(self.finish());
            }

            match self.step {
                Step::Signature => {
                    if self.signature_read {
                        self.step = Step::Length;
                        continue;
                    }
                    match self.input.request(SIGNATURE_SIZE, Tier::Default)? {
                        Fill::Filled(bytes) => {
                            let flavor = Flavor::read_signature(&bytes)
                                .map_err(DecodeError::InvalidSignature)?;
                            debug!(?flavor, "signature read");
                            self.doc.set_signature(flavor);
                            self.signature_read = true;
                            self.step = Step::Length;
                        }
                        Fill::Suspended => return Ok(ReadStatus::NeedMoreData),
                        Fill::Exhausted { partial } => return self.end_of_stream(partial),
                    }
                }
                Step::Length => match self.input.request(LENGTH_SIZE, Tier::Default)? {
                    Fill::Filled(bytes) => self.step = self.body_step(&bytes)?,
                    Fill::Suspended => return Ok(ReadStatus::NeedMoreData),
                    Fill::Exhausted { partial } => return self.end_of_stream(partial),
                },
                Step::Body { length, tier } => {
                    let framed = framed_length(length, self.config.crc.crc_present());
                    match self.input.request(framed, tier)? {
                        Fill::Filled(frame) => {
                            self.step = Step::Length;
                            self.dispatch_frame(&frame)?;
                            if !self.open.any() {
                                return Ok(self.finish());
                            }
                        }
                        Fill::Suspended => return Ok(ReadStatus::NeedMoreData),
                        Fill::Exhausted { .. } => {
                            self.close_source();
                            return Err(DecodeError::UnexpectedEof { step: self.step });
                        }
                    }
                }
            }
        }
    }

    /// Validate a length field and pick the buffer tier for the body.
    fn body_step(&self, bytes: &[u8]) -> Result<Step, DecodeError> {
        let mut raw = [0_u8; LENGTH_SIZE];
        raw.copy_from_slice(bytes);
        let length = u32::from_be_bytes(raw);
        if length > self.config.max_chunk_length {
            return Err(DecodeError::InvalidLength {
                length,
                limit: self.config.max_chunk_length,
            });
        }

        let framed = framed_length(length, self.config.crc.crc_present());
        if framed > self.config.improbable_frame_length {
            return Err(DecodeError::ImprobableLength {
                framed,
                ceiling: self.config.improbable_frame_length,
            });
        }

        let tier = if framed < self.config.read_buffer_size {
            Tier::Default
        } else {
            Tier::Overflow
        };
        trace!(length, framed, ?tier, "chunk length read");
        Ok(Step::Body { length, tier })
    }

    /// Running out of data is clean only between chunks with nothing
    /// left open. The source is closed either way.
    fn end_of_stream(&mut self, partial: bool) -> Result<ReadStatus, DecodeError> {
        if partial || self.open.any() {
            self.close_source();
            return Err(DecodeError::UnexpectedEof { step: self.step });
        }
        Ok(self.finish())
    }

    fn finish(&mut self) -> ReadStatus {
        if !self.closed {
            self.doc.mark_complete();
            self.close_source();
            debug!(chunks = self.doc.len(), "stream finished");
        }
        ReadStatus::Finished
    }

    fn close_source(&mut self) {
        if !self.closed {
            self.closed = true;
            self.input.close();
        }
    }

    // ── Dispatch ────────────────────────────────────────────────────────

    fn dispatch_frame(&mut self, frame: &[u8]) -> Result<(), DecodeError> {
        let parts = split_frame(frame, self.config.crc.crc_present())?;
        if let Some(stored) = parts.crc {
            match self.config.crc.evaluate(parts.tag, parts.payload, stored) {
                CrcVerdict::Accept => {}
                CrcVerdict::Warn { computed } => self.warn(Warning::CrcMismatch {
                    tag: parts.tag,
                    expected: stored,
                    computed,
                }),
                CrcVerdict::Discard { computed } => {
                    debug!(tag = %parts.tag, stored, computed, "chunk discarded on CRC mismatch");
                    return Ok(());
                }
                CrcVerdict::Error { computed } => {
                    return Err(DecodeError::InvalidCrc {
                        tag: parts.tag,
                        expected: stored,
                        computed,
                    });
                }
            }
        }
        self.append(parts.tag, parts.payload)
    }

    /// Dispatch queued whole chunks. Returns `true` once one of them
    /// closed the last open header.
    fn dispatch_pushed(&mut self) -> Result<bool, DecodeError> {
        while !self.closed {
            let Some((chunk, ownership)) = self.input.pop_chunk() else {
                break;
            };
            let outcome = match split_frame(&chunk, false) {
                Ok(parts) => self.append(parts.tag, parts.payload),
                Err(e) => Err(e.into()),
            };
            self.input.release(chunk, ownership);
            outcome?;
            if !self.open.any() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn append(&mut self, tag: ChunkTag, payload: &[u8]) -> Result<(), DecodeError> {
        let chunk = self.registry.parse(tag, payload)?;
        debug!(%tag, length = payload.len(), known = !chunk.is_unknown(), "chunk dispatched");
        if !self.notify_host(&chunk) {
            debug!(%tag, "chunk rejected by host");
            return Err(DecodeError::Rejected { tag });
        }
        self.open.track(tag);
        self.dispatched += 1;
        if self.config.store_chunks {
            self.doc.append(chunk);
        }
        Ok(())
    }

    fn notify_host(&mut self, chunk: &Chunk) -> bool {
        let host = self.input.source_mut();
        match chunk {
            Chunk::Ihdr(_) | Chunk::Jhdr(_) | Chunk::Mhdr(_) => host.process_header(chunk),
            Chunk::Text(_) | Chunk::Ztxt(_) | Chunk::Itxt(_) => host.process_text(chunk),
            Chunk::Term(term) => host.process_term(term),
            Chunk::Unknown(raw) => host.process_unknown(raw.tag(), raw.data()),
            _ => true,
        }
    }

    fn warn(&mut self, warning: Warning) {
        warn!(%warning, "decode warning");
        self.input.warning(&warning);
        self.warnings.push(warning);
    }

    // ── Push API ────────────────────────────────────────────────────────

    /// Queue bytes ahead of the host pull. They are consumed before the
    /// host is asked for anything.
    pub fn push_data(&mut self, data: impl Into<Bytes>, ownership: Ownership) {
        self.input.push_data(data.into(), ownership);
    }

    /// Queue one whole chunk, given as the 4-byte tag followed by the
    /// payload. It is dispatched before more bytes are read and skips the
    /// CRC policy.
    pub fn push_chunk(&mut self, chunk: impl Into<Bytes>, ownership: Ownership) {
        self.input.push_chunk(chunk.into(), ownership);
    }

    /// Declare the signature out of band; the stream then starts at the
    /// first chunk length.
    ///
    /// # Errors
    ///
    /// [`DecodeError::SignatureAlreadyRead`] once signature bytes have
    /// been read or declared.
    pub fn push_sig(&mut self, flavor: Flavor) -> Result<(), DecodeError> {
        let mid_signature = self.step == Step::Signature && self.input.staged(Tier::Default) > 0;
        if self.signature_read || mid_signature {
            return Err(DecodeError::SignatureAlreadyRead);
        }
        debug!(?flavor, "signature pushed");
        self.doc.set_signature(flavor);
        self.signature_read = true;
        if self.step == Step::Signature {
            self.step = Step::Length;
        }
        Ok(())
    }

    /// No more data will be pushed. Once the queue is drained the
    /// decoder treats the stream as ended instead of suspending.
    pub fn push_end(&mut self) {
        self.input.push_end();
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn document(&self) -> &ChunkDocument {
        &self.doc
    }

    #[must_use]
    pub fn into_document(self) -> ChunkDocument {
        self.doc
    }

    /// Warnings raised so far, in order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The step in flight and the bytes staged for it.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            step: self.step,
            filled: self.input.staged(self.step.tier()),
        }
    }

    /// Records dispatched so far, stored or not. Discarded and rejected
    /// chunks do not count.
    #[must_use]
    pub fn chunks_read(&self) -> u64 {
        self.dispatched
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.state == State::Suspended
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ChunkRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn source(&self) -> &S {
        self.input.source()
    }

    pub fn source_mut(&mut self) -> &mut S {
        self.input.source_mut()
    }
}
