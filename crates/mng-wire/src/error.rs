use crate::tag::ChunkTag;

/// Errors raised while reading or writing the raw chunk framing.
///
/// These cover the byte-level envelope only: signature bytes, length
/// fields and frame boundaries. Anything that needs to know what a
/// chunk's payload means lives in `mng-types`.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete field could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The first four signature bytes match none of PNG, MNG or JNG.
    #[error("invalid signature: {found:02X?}")]
    InvalidSignature { found: [u8; 8] },

    /// The signature prefix was recognised but the `\r\n\x1a\n` tail
    /// was not. This almost always means the file went through a
    /// text-mode line ending conversion.
    #[error("signature line endings corrupted: {found:02X?}")]
    CorruptedLineEndings { found: [u8; 4] },

    /// A chunk declared a payload length above `0x7FFF_FFFF`.
    #[error("invalid chunk length {length:#010X} (limit {limit:#010X})")]
    InvalidLength { length: u32, limit: u32 },

    /// The frame for `tag` is shorter than the framing requires.
    #[error("truncated {tag} frame: need {needed} bytes, have {available}")]
    TruncatedFrame {
        tag: ChunkTag,
        needed: usize,
        available: usize,
    },

    /// A packed CRC mode value contained a nibble outside its range.
    #[error("invalid CRC mode bits {bits:#06X}")]
    InvalidCrcMode { bits: u32 },

    /// I/O error during read or write.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
