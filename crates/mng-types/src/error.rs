use mng_wire::{ChunkTag, WireError};

/// Errors raised while turning a chunk payload into a typed record.
///
/// These sit one level above [`WireError`]: the frame was intact, but
/// the bytes inside it do not hold what the chunk type requires.
///
/// # Error hierarchy
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                   │
/// │   ├── TooShort          mandatory fields missing         │
/// │   ├── InvalidLength     length not allowed for the type  │
/// │   ├── MissingTerminator keyword without its NUL byte     │
/// │   ├── InvalidKeyword    keyword empty or over 79 bytes   │
/// │   ├── InvalidValue      field outside its defined range  │
/// │   ├── Unencodable       character the field cannot carry │
/// │   └── wraps WireError                                    │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// The payload ended before all mandatory fields were read.
    #[error("{tag} payload too short: need {needed} bytes, have {actual}")]
    TooShort {
        tag: ChunkTag,
        needed: usize,
        actual: usize,
    },

    /// The payload length is not one the chunk type permits.
    #[error("{tag} payload length {length} invalid: expected {expected}")]
    InvalidLength {
        tag: ChunkTag,
        length: usize,
        expected: &'static str,
    },

    /// A NUL-terminated string field ran to the end of the payload.
    #[error("{tag} field {field} is missing its NUL terminator")]
    MissingTerminator { tag: ChunkTag, field: &'static str },

    /// Keywords must be 1 to 79 bytes long.
    #[error("{tag} keyword length {length} outside 1..=79")]
    InvalidKeyword { tag: ChunkTag, length: usize },

    /// A field held a value outside its defined range.
    #[error("{tag} field {field} has invalid value {value}")]
    InvalidValue {
        tag: ChunkTag,
        field: &'static str,
        value: u32,
    },

    /// A string field holds a character outside Latin-1, or a NUL
    /// inside a NUL-terminated field. Raised before writing.
    #[error("{tag} field {field} cannot carry {found:?}")]
    Unencodable {
        tag: ChunkTag,
        field: &'static str,
        found: char,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}
