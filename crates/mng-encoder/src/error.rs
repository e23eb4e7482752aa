use mng_types::TypeError;
use mng_wire::{ChunkTag, WireError};

/// Errors that can occur while building or writing a document.
///
/// Error hierarchy:
///
/// ```text
///   EncodeError
///   ├── NoHeader            ← first chunk is not IHDR, MHDR or JHDR
///   ├── TermSequence        ← chunk after a TERM that does not allow it
///   ├── CreationFinished    ← chunk after the terminating IEND or MEND
///   ├── Type(TypeError)     ← record would not read back unchanged
///   ├── UnknownChunkId      ← copy_chunk with a handle the source lacks
///   ├── EmptyDocument       ← nothing to write
///   ├── Wire(WireError)     ← from frame serialization
///   └── Io(std::io::Error)  ← from the sink
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("{tag} put before any IHDR, MHDR or JHDR")]
    NoHeader { tag: ChunkTag },

    /// TERM must directly follow MHDR, or be followed by SEEK.
    #[error("{tag} cannot follow TERM here")]
    TermSequence { tag: ChunkTag },

    /// Raised by `put_*` once the document is closed, and by the writer
    /// for a document that carries chunks past its terminator.
    #[error("{tag} follows the chunk that terminated the document")]
    CreationFinished { tag: ChunkTag },

    /// The record fails [`Chunk::validate`](mng_types::Chunk::validate).
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("chunk handle does not resolve in the source document")]
    UnknownChunkId,

    #[error("document has no chunks and no signature")]
    EmptyDocument,

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
