use crate::crc::chunk_crc;
use crate::error::WireError;
use crate::tag::ChunkTag;

/// Whether incoming frames carry a trailing CRC at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrcInput {
    /// Frames are `tag + payload` only.
    None,
    #[default]
    Present,
}

/// What the writer emits in the CRC slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrcOutput {
    /// No CRC field is written.
    None,
    /// The real CRC over tag + payload.
    #[default]
    Generate,
    /// A zero placeholder, for producers that patch CRCs later.
    Dummy,
}

/// Reaction to a CRC mismatch on an ancillary chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AncillaryCrc {
    /// Do not compute the CRC.
    Ignore,
    /// Drop the chunk silently.
    #[default]
    Discard,
    Warn,
    Error,
}

/// Reaction to a CRC mismatch on a critical chunk.
///
/// There is no discard mode: a decoder cannot silently lose data it is
/// required to understand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CriticalCrc {
    Ignore,
    #[default]
    Warn,
    Error,
}

/// Outcome of checking one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrcVerdict {
    Accept,
    /// Keep the chunk, report the mismatch.
    Warn { computed: u32 },
    /// Drop the chunk before it is parsed.
    Discard { computed: u32 },
    /// Abort decoding.
    Error { computed: u32 },
}

/// CRC handling configuration for both directions.
///
/// The packed form matches the classic 16-bit mode word, one nibble per
/// concern:
///
/// ```text
/// ┌──────────┬───────────┬──────────────────────────────────────┐
/// │ Nibble   │ Concern   │ Values                               │
/// ├──────────┼───────────┼──────────────────────────────────────┤
/// │ 0x000F   │ input     │ 0 none, 1 present                    │
/// │ 0x00F0   │ output    │ 0 none, 2 generate, 4 dummy          │
/// │ 0x0F00   │ ancillary │ 0 ignore, 1 discard, 2 warn, 3 error │
/// │ 0xF000   │ critical  │ 0 ignore, 2 warn, 3 error            │
/// └──────────┴───────────┴──────────────────────────────────────┘
/// ```
///
/// The default is `0x2121`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CrcPolicy {
    pub input: CrcInput,
    pub output: CrcOutput,
    pub ancillary: AncillaryCrc,
    pub critical: CriticalCrc,
}

impl CrcPolicy {
    /// Reject every mismatch.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            ancillary: AncillaryCrc::Error,
            critical: CriticalCrc::Error,
            ..Self::default()
        }
    }

    /// Never compute input CRCs.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            ancillary: AncillaryCrc::Ignore,
            critical: CriticalCrc::Ignore,
            ..Self::default()
        }
    }

    /// Decode the packed mode word.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidCrcMode`] if any nibble holds a value
    /// with no meaning, or if bits above `0xFFFF` are set.
    pub fn from_bits(bits: u32) -> Result<Self, WireError> {
        let bad = || WireError::InvalidCrcMode { bits };
        if bits > 0xFFFF {
            return Err(bad());
        }
        let input = match bits & 0x000F {
            0x0 => CrcInput::None,
            0x1 => CrcInput::Present,
            _ => return Err(bad()),
        };
        let output = match bits & 0x00F0 {
            0x00 => CrcOutput::None,
            0x20 => CrcOutput::Generate,
            0x40 => CrcOutput::Dummy,
            _ => return Err(bad()),
        };
        let ancillary = match bits & 0x0F00 {
            0x000 => AncillaryCrc::Ignore,
            0x100 => AncillaryCrc::Discard,
            0x200 => AncillaryCrc::Warn,
            0x300 => AncillaryCrc::Error,
            _ => return Err(bad()),
        };
        let critical = match bits & 0xF000 {
            0x0000 => CriticalCrc::Ignore,
            0x2000 => CriticalCrc::Warn,
            0x3000 => CriticalCrc::Error,
            _ => return Err(bad()),
        };
        Ok(Self {
            input,
            output,
            ancillary,
            critical,
        })
    }

    /// Encode into the packed mode word.
    #[must_use]
    pub fn bits(self) -> u32 {
        let input = match self.input {
            CrcInput::None => 0x0,
            CrcInput::Present => 0x1,
        };
        let output = match self.output {
            CrcOutput::None => 0x00,
            CrcOutput::Generate => 0x20,
            CrcOutput::Dummy => 0x40,
        };
        let ancillary = match self.ancillary {
            AncillaryCrc::Ignore => 0x000,
            AncillaryCrc::Discard => 0x100,
            AncillaryCrc::Warn => 0x200,
            AncillaryCrc::Error => 0x300,
        };
        let critical = match self.critical {
            CriticalCrc::Ignore => 0x0000,
            CriticalCrc::Warn => 0x2000,
            CriticalCrc::Error => 0x3000,
        };
        input | output | ancillary | critical
    }

    /// Whether input frames end with a 4-byte CRC.
    #[must_use]
    pub fn crc_present(self) -> bool {
        self.input == CrcInput::Present
    }

    /// Decide what to do with a chunk given its stored CRC.
    ///
    /// The CRC is only computed when the chunk's class is not set to
    /// `Ignore` and input CRCs are present; otherwise the chunk is
    /// accepted without looking at the payload.
    #[must_use]
    pub fn evaluate(self, tag: ChunkTag, payload: &[u8], trailing_crc: u32) -> CrcVerdict {
        if !self.crc_present() {
            return CrcVerdict::Accept;
        }

        let critical = tag.is_critical();
        let skip = if critical {
            self.critical == CriticalCrc::Ignore
        } else {
            self.ancillary == AncillaryCrc::Ignore
        };
        if skip {
            return CrcVerdict::Accept;
        }

        let computed = chunk_crc(tag, payload);
        if computed == trailing_crc {
            return CrcVerdict::Accept;
        }

        if critical {
            match self.critical {
                CriticalCrc::Ignore => CrcVerdict::Accept,
                CriticalCrc::Warn => CrcVerdict::Warn { computed },
                CriticalCrc::Error => CrcVerdict::Error { computed },
            }
        } else {
            match self.ancillary {
                AncillaryCrc::Ignore => CrcVerdict::Accept,
                AncillaryCrc::Discard => CrcVerdict::Discard { computed },
                AncillaryCrc::Warn => CrcVerdict::Warn { computed },
                AncillaryCrc::Error => CrcVerdict::Error { computed },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_0x2121() {
        assert_eq!(CrcPolicy::default().bits(), 0x2121);
        assert_eq!(CrcPolicy::from_bits(0x2121).unwrap(), CrcPolicy::default());
    }

    #[test]
    fn bits_roundtrip_all_modes() {
        for bits in [0x0000, 0x3341, 0x0301, 0x2221, 0x3121, 0x0020] {
            assert_eq!(CrcPolicy::from_bits(bits).unwrap().bits(), bits);
        }
    }

    #[test]
    fn reject_unknown_nibbles() {
        assert!(matches!(
            CrcPolicy::from_bits(0x1121),
            Err(WireError::InvalidCrcMode { bits: 0x1121 })
        ));
        assert!(CrcPolicy::from_bits(0x2131).is_err());
        assert!(CrcPolicy::from_bits(0x10000).is_err());
    }

    #[test]
    fn matching_crc_is_accepted() {
        let crc = chunk_crc(ChunkTag::tEXt, b"a\0b");
        let policy = CrcPolicy::strict();
        assert_eq!(policy.evaluate(ChunkTag::tEXt, b"a\0b", crc), CrcVerdict::Accept);
    }

    #[test]
    fn mismatch_per_class() {
        let policy = CrcPolicy::default();
        assert!(matches!(
            policy.evaluate(ChunkTag::IDAT, b"x", 0),
            CrcVerdict::Warn { .. }
        ));
        assert!(matches!(
            policy.evaluate(ChunkTag::gAMA, b"x", 0),
            CrcVerdict::Discard { .. }
        ));

        let strict = CrcPolicy::strict();
        assert!(matches!(
            strict.evaluate(ChunkTag::IDAT, b"x", 0),
            CrcVerdict::Error { .. }
        ));
        assert!(matches!(
            strict.evaluate(ChunkTag::gAMA, b"x", 0),
            CrcVerdict::Error { .. }
        ));
    }

    #[test]
    fn ignore_and_absent_input_accept_anything() {
        let lenient = CrcPolicy::lenient();
        assert_eq!(lenient.evaluate(ChunkTag::IDAT, b"x", 0), CrcVerdict::Accept);

        let no_input = CrcPolicy {
            input: CrcInput::None,
            ..CrcPolicy::strict()
        };
        assert_eq!(no_input.evaluate(ChunkTag::IDAT, b"x", 0), CrcVerdict::Accept);
    }
}
