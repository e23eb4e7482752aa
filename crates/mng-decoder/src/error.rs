use mng_types::TypeError;
use mng_wire::{ChunkTag, WireError};

use crate::checkpoint::Step;

/// Errors that stop a decode.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── InvalidSignature(WireError) ← not PNG/MNG/JNG, or mangled line endings
///   ├── InvalidLength               ← declared payload length above the limit
///   ├── ImprobableLength            ← framed length above the sanity ceiling
///   ├── InvalidCrc                  ← CRC mismatch under an Error policy
///   ├── UnexpectedEof               ← stream ended inside a step or a header
///   ├── SignatureAlreadyRead        ← push_sig after the signature was read
///   ├── NotSuspended                ← resume while not suspended
///   ├── AlreadyReading              ← read called a second time
///   ├── Rejected                    ← a host process_* hook returned false
///   ├── Type(TypeError)             ← payload rejected by its chunk type
///   ├── Wire(WireError)             ← malformed frame
///   └── Io(std::io::Error)          ← from the host pull
/// ```
///
/// Chunks appended before the error stay in the document.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The 8-byte signature failed validation. The inner error tells a
    /// foreign format apart from line-ending corruption.
    #[error("invalid signature: {0}")]
    InvalidSignature(WireError),

    #[error("chunk length {length} exceeds limit {limit}")]
    InvalidLength { length: u32, limit: u32 },

    /// Refused before any buffer of that size was allocated.
    #[error("framed chunk length {framed} exceeds improbable ceiling {ceiling}")]
    ImprobableLength { framed: usize, ceiling: usize },

    #[error("{tag} CRC mismatch: stored {expected:#010x}, computed {computed:#010x}")]
    InvalidCrc {
        tag: ChunkTag,
        expected: u32,
        computed: u32,
    },

    #[error("unexpected end of stream while reading {step}")]
    UnexpectedEof { step: Step },

    #[error("signature was already read")]
    SignatureAlreadyRead,

    #[error("resume called while the decoder is not suspended")]
    NotSuspended,

    #[error("read already called on this decoder")]
    AlreadyReading,

    /// A [`DataSource`](crate::DataSource) hook refused the chunk. It is
    /// not stored.
    #[error("{tag} rejected by the host")]
    Rejected { tag: ChunkTag },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Recoverable conditions reported while decoding.
///
/// A warning never changes control flow. It is logged, kept on the
/// decoder and handed to [`DataSource::warning`](crate::DataSource::warning).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Warning {
    /// A chunk failed its CRC check and was kept anyway.
    #[error("{tag} CRC mismatch: stored {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        tag: ChunkTag,
        expected: u32,
        computed: u32,
    },
}
