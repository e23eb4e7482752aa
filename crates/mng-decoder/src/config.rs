use mng_wire::CrcPolicy;
use mng_wire::frame::MAX_CHUNK_LENGTH;

/// Default staging buffer size. Frames whose framed length (tag,
/// payload and CRC) is below this are read into one reusable buffer.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4200;

/// Framed lengths above this are refused without allocating.
pub const DEFAULT_IMPROBABLE_FRAME_LENGTH: usize = 16 * 1024 * 1024;

/// Configuration for [`MngDecoder`](crate::MngDecoder).
///
/// ```text
/// ┌─────────────────────────┬──────────────────────────────────────────┐
/// │ Field                   │ Purpose                                  │
/// ├─────────────────────────┼──────────────────────────────────────────┤
/// │ crc                     │ Whether frames carry a CRC and what a    │
/// │                         │ mismatch does per chunk class            │
/// │ read_buffer_size        │ Size of the reusable staging buffer;     │
/// │                         │ larger frames get a one-off buffer       │
/// │ improbable_frame_length │ Ceiling on one framed chunk              │
/// │ max_chunk_length        │ Largest declared payload length accepted │
/// │ store_chunks            │ Keep parsed records in the document; off │
/// │                         │ leaves only the host hooks to see them   │
/// └─────────────────────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub crc: CrcPolicy,
    pub read_buffer_size: usize,
    pub improbable_frame_length: usize,
    pub max_chunk_length: u32,
    pub store_chunks: bool,
}

impl Default for DecoderConfig {
    /// CRCs present, ancillary mismatches discarded, critical mismatches
    /// warned; a 4200-byte staging buffer, a 16 MiB frame ceiling and
    /// every record stored.
    fn default() -> Self {
        Self {
            crc: CrcPolicy::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            improbable_frame_length: DEFAULT_IMPROBABLE_FRAME_LENGTH,
            max_chunk_length: MAX_CHUNK_LENGTH,
            store_chunks: true,
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn with_crc(mut self, crc: CrcPolicy) -> Self {
        self.crc = crc;
        self
    }

    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    #[must_use]
    pub fn with_improbable_frame_length(mut self, ceiling: usize) -> Self {
        self.improbable_frame_length = ceiling;
        self
    }

    #[must_use]
    pub fn with_store_chunks(mut self, store: bool) -> Self {
        self.store_chunks = store;
        self
    }

    /// Values above the format limit of 2^31 - 1 are clamped to it.
    #[must_use]
    pub fn with_max_chunk_length(mut self, length: u32) -> Self {
        self.max_chunk_length = length.min(MAX_CHUNK_LENGTH);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mng_wire::{AncillaryCrc, CriticalCrc};

    #[test]
    fn defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.read_buffer_size, 4200);
        assert_eq!(config.improbable_frame_length, 16 * 1024 * 1024);
        assert_eq!(config.max_chunk_length, 0x7FFF_FFFF);
        assert_eq!(config.crc.bits(), 0x2121);
        assert_eq!(config.crc.ancillary, AncillaryCrc::Discard);
        assert_eq!(config.crc.critical, CriticalCrc::Warn);
        assert!(config.store_chunks);
        assert!(!config.with_store_chunks(false).store_chunks);
    }

    #[test]
    fn max_chunk_length_is_clamped() {
        let config = DecoderConfig::default().with_max_chunk_length(u32::MAX);
        assert_eq!(config.max_chunk_length, MAX_CHUNK_LENGTH);
    }
}
