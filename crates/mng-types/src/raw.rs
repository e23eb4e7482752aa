use mng_wire::ChunkTag;

/// A chunk kept as raw bytes together with its real tag.
///
/// Used for tags the registry does not know and for known tags whose
/// fields are not modelled. The payload is reproduced byte-for-byte on
/// write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawChunk {
    tag: ChunkTag,
    data: Vec<u8>,
}

impl RawChunk {
    #[must_use]
    pub fn new(tag: ChunkTag, data: Vec<u8>) -> Self {
        Self { tag, data }
    }

    #[must_use]
    pub fn tag(&self) -> ChunkTag {
        self.tag
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
