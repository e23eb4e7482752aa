use crate::error::WireError;
use crate::tag::ChunkTag;

/// Signature length in bytes.
pub const SIGNATURE_SIZE: usize = 8;

/// The shared tail of every signature: CR LF SUB LF.
///
/// These four bytes exist to catch transfers that mangle line endings,
/// so they are checked on their own after the prefix matched.
pub const POST_SIGNATURE: [u8; 4] = [0x0D, 0x0A, 0x1A, 0x0A];

pub const PNG_SIGNATURE: [u8; SIGNATURE_SIZE] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
pub const MNG_SIGNATURE: [u8; SIGNATURE_SIZE] = [0x8A, b'M', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
pub const JNG_SIGNATURE: [u8; SIGNATURE_SIZE] = [0x8B, b'J', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Container flavor: which member of the family a stream is.
///
/// ```text
/// ┌────────┬─────────────────────────┬──────────┬────────────┐
/// │ Flavor │ Signature               │ Header   │ Terminator │
/// ├────────┼─────────────────────────┼──────────┼────────────┤
/// │ Png    │ 89 50 4E 47 0D 0A 1A 0A │ IHDR     │ IEND       │
/// │ Mng    │ 8A 4D 4E 47 0D 0A 1A 0A │ MHDR     │ MEND       │
/// │ Jng    │ 8B 4A 4E 47 0D 0A 1A 0A │ JHDR     │ IEND       │
/// └────────┴─────────────────────────┴──────────┴────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavor {
    Png,
    Mng,
    Jng,
}

impl Flavor {
    #[must_use]
    pub const fn signature(self) -> [u8; SIGNATURE_SIZE] {
        match self {
            Self::Png => PNG_SIGNATURE,
            Self::Mng => MNG_SIGNATURE,
            Self::Jng => JNG_SIGNATURE,
        }
    }

    /// The header chunk that opens a stream of this flavor.
    #[must_use]
    pub const fn header(self) -> ChunkTag {
        match self {
            Self::Png => ChunkTag::IHDR,
            Self::Mng => ChunkTag::MHDR,
            Self::Jng => ChunkTag::JHDR,
        }
    }

    /// The chunk that closes a stream of this flavor.
    #[must_use]
    pub const fn terminator(self) -> ChunkTag {
        match self {
            Self::Png | Self::Jng => ChunkTag::IEND,
            Self::Mng => ChunkTag::MEND,
        }
    }

    /// Infer the flavor of a document from its first chunk.
    ///
    /// `IHDR` means a still image, `JHDR` a JNG, and anything else is
    /// taken to be an animation stream.
    #[must_use]
    pub fn from_first_chunk(tag: ChunkTag) -> Self {
        match tag {
            ChunkTag::IHDR => Self::Png,
            ChunkTag::JHDR => Self::Jng,
            _ => Self::Mng,
        }
    }

    /// Write the 8 signature bytes.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the writer.
    pub fn write_signature(self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        w.write_all(&self.signature())?;
        Ok(SIGNATURE_SIZE)
    }

    /// Identify the flavor from the first 8 bytes of `buf`.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if fewer than 8 bytes are given.
    /// - [`WireError::InvalidSignature`] if the prefix is not PNG, MNG or JNG.
    /// - [`WireError::CorruptedLineEndings`] if the prefix matched but the
    ///   trailing four bytes did not.
    pub fn read_signature(buf: &[u8]) -> Result<Self, WireError> {
        let Some(sig) = buf.get(..SIGNATURE_SIZE) else {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        };
        let mut found = [0_u8; SIGNATURE_SIZE];
        found.copy_from_slice(sig);

        let flavor = [Self::Png, Self::Mng, Self::Jng]
            .into_iter()
            .find(|f| f.signature()[..4] == found[..4])
            .ok_or(WireError::InvalidSignature { found })?;

        if found[4..] != POST_SIGNATURE {
            let mut tail = [0_u8; 4];
            tail.copy_from_slice(&found[4..]);
            return Err(WireError::CorruptedLineEndings { found: tail });
        }

        Ok(flavor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_each_flavor() {
        for flavor in [Flavor::Png, Flavor::Mng, Flavor::Jng] {
            let mut buf = Vec::new();
            assert_eq!(flavor.write_signature(&mut buf).unwrap(), SIGNATURE_SIZE);
            assert_eq!(Flavor::read_signature(&buf).unwrap(), flavor);
        }
    }

    #[test]
    fn png_signature_bytes() {
        assert_eq!(&PNG_SIGNATURE[1..4], b"PNG");
        assert_eq!(&PNG_SIGNATURE[4..], &POST_SIGNATURE);
    }

    #[test]
    fn reject_unknown_prefix() {
        let result = Flavor::read_signature(b"GIF89a\0\0");
        assert!(matches!(result, Err(WireError::InvalidSignature { .. })));
    }

    #[test]
    fn reject_mangled_line_endings() {
        let mut sig = MNG_SIGNATURE;
        sig[4] = 0x0A; // CR LF collapsed to LF
        let result = Flavor::read_signature(&sig);
        assert!(matches!(result, Err(WireError::CorruptedLineEndings { .. })));
    }

    #[test]
    fn reject_short_buffer() {
        let result = Flavor::read_signature(&PNG_SIGNATURE[..5]);
        assert!(matches!(result, Err(WireError::UnexpectedEof { offset: 5 })));
    }

    #[test]
    fn flavor_from_first_chunk() {
        assert_eq!(Flavor::from_first_chunk(ChunkTag::IHDR), Flavor::Png);
        assert_eq!(Flavor::from_first_chunk(ChunkTag::JHDR), Flavor::Jng);
        assert_eq!(Flavor::from_first_chunk(ChunkTag::MHDR), Flavor::Mng);
        assert_eq!(Flavor::from_first_chunk(ChunkTag::tEXt), Flavor::Mng);
        assert_eq!(Flavor::Jng.terminator(), ChunkTag::IEND);
    }
}
