use std::io::Write;
use std::sync::Arc;

use mng_types::{
    Back, Chunk, ChunkDocument, ChunkId, ChunkRegistry, Defi, Endl, Ihdr, ImageData, Itxt, Jhdr,
    Loop, Mhdr, Plte, RawChunk, Seek, Show, Term, Text,
};
use mng_wire::{ChunkTag, Flavor};
use tracing::debug;

use crate::error::EncodeError;
use crate::writer::{ChunkWriter, WriterConfig, terminates};

/// Builds a chunk document in creating mode and writes it out.
///
/// Every `put_*` call checks the ordering rules, then validates the
/// record, before it is appended:
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────┐
/// │ Rule         │ Rejected                                         │
/// ├──────────────┼──────────────────────────────────────────────────┤
/// │ No header    │ anything but IHDR/MHDR/JHDR as the first chunk   │
/// │ TERM         │ a chunk after TERM, unless TERM directly follows │
/// │              │ MHDR or the new chunk is SEEK                    │
/// │ Termination  │ anything after MEND, or after IEND when the      │
/// │              │ document started with IHDR or JHDR               │
/// │ Content      │ a record the decoder would reject or read back   │
/// │              │ differently (empty keyword, non-Latin-1 text)    │
/// └──────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// # Usage
///
/// ```rust
/// use mng_encoder::MngEncoder;
/// use mng_types::{Ihdr, Mhdr, Term};
///
/// let bytes = MngEncoder::new()
///     .put_mhdr(Mhdr::new(64, 64, 30)).unwrap()
///     .put_term(Term::repeat(10, 5)).unwrap()
///     .put_ihdr(Ihdr::rgba8(64, 64)).unwrap()
///     .put_idat(vec![0; 16]).unwrap()
///     .put_iend().unwrap()
///     .put_mend().unwrap()
///     .encode()
///     .unwrap();
/// assert_eq!(&bytes[1..4], b"MNG");
/// ```
pub struct MngEncoder {
    doc: ChunkDocument,
    writer: ChunkWriter,
    finished: bool,
}

impl MngEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            doc: ChunkDocument::new(),
            writer: ChunkWriter::with_config(config),
            finished: false,
        }
    }

    /// Serialize payloads through `registry` instead of the standard table.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ChunkRegistry>) -> Self {
        self.writer = self.writer.with_registry(registry);
        self
    }

    // ── Putting chunks ──────────────────────────────────────────────────

    /// Append any record, subject to the ordering rules.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::NoHeader`] for a first chunk that is not a header.
    /// - [`EncodeError::TermSequence`] for a chunk TERM does not allow.
    /// - [`EncodeError::CreationFinished`] once IEND or MEND ended the
    ///   document.
    /// - [`EncodeError::Type`] for a record that fails
    ///   [`Chunk::validate`].
    pub fn put_chunk(&mut self, chunk: impl Into<Chunk>) -> Result<&mut Self, EncodeError> {
        let chunk = chunk.into();
        let tag = chunk.tag();
        self.check(tag)?;
        chunk.validate()?;
        self.doc.append(chunk);
        self.after(tag);
        Ok(self)
    }

    fn check(&self, tag: ChunkTag) -> Result<(), EncodeError> {
        if self.finished {
            return Err(EncodeError::CreationFinished { tag });
        }
        if self.doc.is_empty() && !tag.is_header() {
            return Err(EncodeError::NoHeader { tag });
        }
        if let Some(last) = self.doc.last() {
            if matches!(self.doc.get(last), Some(Chunk::Term(_))) && tag != ChunkTag::SEEK {
                let after_mhdr = self
                    .doc
                    .prev(last)
                    .and_then(|prev| self.doc.get(prev))
                    .is_some_and(|c| matches!(c, Chunk::Mhdr(_)));
                if !after_mhdr {
                    return Err(EncodeError::TermSequence { tag });
                }
            }
        }
        Ok(())
    }

    fn after(&mut self, tag: ChunkTag) {
        if terminates(self.doc.first_tag(), tag) {
            debug!(%tag, chunks = self.doc.len(), "document terminated");
            self.finished = true;
        }
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_ihdr(&mut self, ihdr: Ihdr) -> Result<&mut Self, EncodeError> {
        self.put_chunk(ihdr)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_jhdr(&mut self, jhdr: Jhdr) -> Result<&mut Self, EncodeError> {
        self.put_chunk(jhdr)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_mhdr(&mut self, mhdr: Mhdr) -> Result<&mut Self, EncodeError> {
        self.put_chunk(mhdr)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_plte(&mut self, entries: Vec<[u8; 3]>) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Plte { entries })
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_idat(&mut self, data: Vec<u8>) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Chunk::Idat(ImageData::new(data)))
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_jdat(&mut self, data: Vec<u8>) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Chunk::Jdat(ImageData::new(data)))
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_iend(&mut self) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Chunk::Iend)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_mend(&mut self) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Chunk::Mend)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_term(&mut self, term: Term) -> Result<&mut Self, EncodeError> {
        self.put_chunk(term)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_seek(&mut self, name: Option<&str>) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Seek {
            name: name.map(str::to_owned),
        })
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_loop(&mut self, level: u8, repeat: u32) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Loop::new(level, repeat))
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_endl(&mut self, level: u8) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Endl { level })
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_defi(&mut self, defi: Defi) -> Result<&mut Self, EncodeError> {
        self.put_chunk(defi)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_show(&mut self, show: Show) -> Result<&mut Self, EncodeError> {
        self.put_chunk(show)
    }

    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_back(&mut self, back: Back) -> Result<&mut Self, EncodeError> {
        self.put_chunk(back)
    }

    /// Latin-1 `tEXt`.
    ///
    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_text(&mut self, keyword: &str, text: &str) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Text::new(keyword, text))
    }

    /// Uncompressed UTF-8 `iTXt`.
    ///
    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_itxt(&mut self, keyword: &str, text: &str) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Itxt::new(keyword, text))
    }

    /// A chunk the registry knows nothing about, written byte-for-byte.
    ///
    /// # Errors
    ///
    /// See [`put_chunk`](Self::put_chunk).
    pub fn put_unknown(&mut self, tag: ChunkTag, data: Vec<u8>) -> Result<&mut Self, EncodeError> {
        self.put_chunk(Chunk::Unknown(RawChunk::new(tag, data)))
    }

    /// Append a deep copy of `source`'s record `id`.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::UnknownChunkId`] if `id` is stale in `source`.
    /// - Any ordering error from [`put_chunk`](Self::put_chunk).
    pub fn copy_chunk(
        &mut self,
        source: &ChunkDocument,
        id: ChunkId,
    ) -> Result<&mut Self, EncodeError> {
        let chunk = source.get(id).ok_or(EncodeError::UnknownChunkId)?.clone();
        self.put_chunk(chunk)
    }

    /// Visit records from sequence number `start` until `visit` returns
    /// `false`. Returns the number visited.
    pub fn iterate_chunks<F>(&self, start: u64, visit: F) -> usize
    where
        F: FnMut(ChunkId, &Chunk, u64) -> bool,
    {
        self.doc.iterate_chunks(start, visit)
    }

    // ── Output ──────────────────────────────────────────────────────────

    /// Declare the signature when the first chunk does not determine it.
    pub fn set_signature(&mut self, flavor: Flavor) -> &mut Self {
        self.doc.set_signature(flavor);
        self
    }

    /// Serialize the whole document into a new buffer. The document is
    /// kept, whatever the streaming setting.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::EmptyDocument`] if nothing was put.
    /// - [`EncodeError::Wire`] from frame serialization.
    pub fn encode(&mut self) -> Result<Vec<u8>, EncodeError> {
        if self.doc.is_empty() {
            return Err(EncodeError::EmptyDocument);
        }
        let mut out = Vec::new();
        self.writer.write_document(&self.doc, &mut out)?;
        Ok(out)
    }

    /// Serialize into `w`. In streaming mode each record is removed from
    /// the document once written.
    ///
    /// # Errors
    ///
    /// Same as [`encode`](Self::encode), plus I/O errors from `w`.
    pub fn write_to(&mut self, w: &mut impl Write) -> Result<usize, EncodeError> {
        if self.doc.is_empty() {
            return Err(EncodeError::EmptyDocument);
        }
        self.writer.write(&mut self.doc, w)
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

    /// Whether IEND or MEND has closed the document.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Default for MngEncoder {
    fn default() -> Self {
        Self::new()
    }
}
