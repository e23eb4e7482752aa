use std::io::Write;
use std::sync::Arc;

use mng_types::{Chunk, ChunkDocument, ChunkRegistry};
use mng_wire::{ChunkTag, CrcOutput, Flavor};
use mng_wire::frame::write_chunk;
use tracing::debug;

use crate::error::EncodeError;

/// Configuration for [`ChunkWriter`].
///
/// ```text
/// ┌──────────────────┬───────────────────────────────────────────────┐
/// │ Field            │ Purpose                                       │
/// ├──────────────────┼───────────────────────────────────────────────┤
/// │ crc_output       │ Real CRC, zero placeholder, or no CRC field   │
/// │ scratch_capacity │ Initial size of the reused payload buffer     │
/// │ streaming        │ Remove each record once it has been written   │
/// └──────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    pub crc_output: CrcOutput,
    pub scratch_capacity: usize,
    pub streaming: bool,
}

impl Default for WriterConfig {
    /// Generated CRCs, a 4 KiB scratch buffer, non-streaming.
    fn default() -> Self {
        Self {
            crc_output: CrcOutput::Generate,
            scratch_capacity: 4096,
            streaming: false,
        }
    }
}

impl WriterConfig {
    #[must_use]
    pub fn with_crc_output(mut self, crc_output: CrcOutput) -> Self {
        self.crc_output = crc_output;
        self
    }

    #[must_use]
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    #[must_use]
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }
}

/// Serializes a [`ChunkDocument`] to a byte sink.
///
/// Output layout:
///
/// ```text
/// ┌──────────────┬─────────────────────────────────────────────┐
/// │ [8 bytes]    │ Signature for the document's flavor         │
/// │ [12+N bytes] │ Chunk 0: length, tag, payload, CRC slot     │
/// │ [12+N bytes] │ Chunk 1 ...                                 │
/// └──────────────┴─────────────────────────────────────────────┘
/// ```
///
/// Payloads are produced by the registry's serializer into one scratch
/// buffer that is cleared and reused for every chunk.
///
/// A document is refused before anything is written if a chunk follows
/// its terminator: `MEND`, or `IEND` when the first chunk is `IHDR` or
/// `JHDR`. A reader stops at that point, so the trailing chunks would be
/// lost.
pub struct ChunkWriter {
    config: WriterConfig,
    registry: Arc<ChunkRegistry>,
    scratch: Vec<u8>,
}

impl ChunkWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            scratch: Vec::with_capacity(config.scratch_capacity),
            config,
            registry: ChunkRegistry::standard(),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ChunkRegistry>) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write the whole document, leaving it untouched.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::EmptyDocument`] if the document has neither
    ///   chunks nor a signature to infer the flavor from.
    /// - [`EncodeError::CreationFinished`] for a chunk after the
    ///   terminator.
    /// - [`EncodeError::Wire`] for a payload above the format limit or a
    ///   failed write.
    pub fn write_document(
        &mut self,
        doc: &ChunkDocument,
        w: &mut impl Write,
    ) -> Result<usize, EncodeError> {
        check_termination(doc)?;
        let mut written = Self::write_signature(doc, w)?;
        for chunk in doc.chunks() {
            written += self.write_one(chunk, w)?;
        }
        debug!(chunks = doc.len(), bytes = written, "document written");
        Ok(written)
    }

    /// Write the document, removing each record once it is on the wire.
    ///
    /// On error the record that failed and everything after it stay in
    /// the document.
    ///
    /// # Errors
    ///
    /// Same as [`write_document`](Self::write_document).
    pub fn write_streaming(
        &mut self,
        doc: &mut ChunkDocument,
        w: &mut impl Write,
    ) -> Result<usize, EncodeError> {
        check_termination(doc)?;
        let mut written = Self::write_signature(doc, w)?;
        let mut released = 0_usize;
        while let Some(id) = doc.first() {
            if let Some(chunk) = doc.get(id) {
                written += self.write_one(chunk, w)?;
            }
            doc.remove(id);
            released += 1;
        }
        debug!(released, bytes = written, "document streamed");
        Ok(written)
    }

    /// Write per [`WriterConfig::streaming`].
    ///
    /// # Errors
    ///
    /// Same as [`write_document`](Self::write_document).
    pub fn write(
        &mut self,
        doc: &mut ChunkDocument,
        w: &mut impl Write,
    ) -> Result<usize, EncodeError> {
        if self.config.streaming {
            self.write_streaming(doc, w)
        } else {
            self.write_document(doc, w)
        }
    }

    fn write_signature(doc: &ChunkDocument, w: &mut impl Write) -> Result<usize, EncodeError> {
        let flavor: Flavor = doc.flavor().ok_or(EncodeError::EmptyDocument)?;
        Ok(flavor.write_signature(w)?)
    }

    fn write_one(&mut self, chunk: &Chunk, w: &mut impl Write) -> Result<usize, EncodeError> {
        self.scratch.clear();
        self.registry.serialize(chunk, &mut self.scratch);
        Ok(write_chunk(w, chunk.tag(), &self.scratch, self.config.crc_output)?)
    }
}

/// Whether `tag` ends a document whose first chunk is `first`.
pub(crate) fn terminates(first: Option<ChunkTag>, tag: ChunkTag) -> bool {
    match tag {
        ChunkTag::MEND => true,
        ChunkTag::IEND => matches!(first, Some(ChunkTag::IHDR | ChunkTag::JHDR)),
        _ => false,
    }
}

fn check_termination(doc: &ChunkDocument) -> Result<(), EncodeError> {
    let first = doc.first_tag();
    let mut tags = doc.tags();
    for tag in tags.by_ref() {
        if terminates(first, tag) {
            break;
        }
    }
    match tags.next() {
        Some(tag) => Err(EncodeError::CreationFinished { tag }),
        None => Ok(()),
    }
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new()
    }
}
