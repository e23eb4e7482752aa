use std::fmt;

/// A 4-byte chunk type code.
///
/// The case of each byte is metadata. Bit 5 (`0x20`) of every byte is
/// the "lowercase" bit:
///
/// ```text
/// ┌──────┬───────────────┬──────────────────────────────────────┐
/// │ Byte │ Property      │ Lowercase (bit 5 set) means          │
/// ├──────┼───────────────┼──────────────────────────────────────┤
/// │ 0    │ ancillary     │ decoder may ignore the chunk         │
/// │ 1    │ private       │ vendor chunk, outside the public set │
/// │ 2    │ reserved      │ must be uppercase in conforming data │
/// │ 3    │ safe-to-copy  │ editors may copy it without knowing  │
/// └──────┴───────────────┴──────────────────────────────────────┘
/// ```
///
/// Tags compare by their raw bytes, so uppercase tags sort before
/// lowercase ones. The registry relies on that order for its binary
/// search.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTag([u8; 4]);

const CASE_BIT: u8 = 0x20;

#[allow(non_upper_case_globals)]
impl ChunkTag {
    // ── PNG ───────────────────────────────────────────────────────────
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const tRNS: Self = Self(*b"tRNS");
    pub const gAMA: Self = Self(*b"gAMA");
    pub const cHRM: Self = Self(*b"cHRM");
    pub const sRGB: Self = Self(*b"sRGB");
    pub const iCCP: Self = Self(*b"iCCP");
    pub const tEXt: Self = Self(*b"tEXt");
    pub const zTXt: Self = Self(*b"zTXt");
    pub const iTXt: Self = Self(*b"iTXt");
    pub const bKGD: Self = Self(*b"bKGD");
    pub const pHYs: Self = Self(*b"pHYs");
    pub const sBIT: Self = Self(*b"sBIT");
    pub const sPLT: Self = Self(*b"sPLT");
    pub const hIST: Self = Self(*b"hIST");
    pub const tIME: Self = Self(*b"tIME");

    // ── JNG ───────────────────────────────────────────────────────────
    pub const JHDR: Self = Self(*b"JHDR");
    pub const JDAT: Self = Self(*b"JDAT");
    pub const JDAA: Self = Self(*b"JDAA");
    pub const JdAA: Self = Self(*b"JdAA");
    pub const JSEP: Self = Self(*b"JSEP");

    // ── MNG ───────────────────────────────────────────────────────────
    pub const MHDR: Self = Self(*b"MHDR");
    pub const MEND: Self = Self(*b"MEND");
    pub const LOOP: Self = Self(*b"LOOP");
    pub const ENDL: Self = Self(*b"ENDL");
    pub const DEFI: Self = Self(*b"DEFI");
    pub const BASI: Self = Self(*b"BASI");
    pub const CLON: Self = Self(*b"CLON");
    pub const PAST: Self = Self(*b"PAST");
    pub const DISC: Self = Self(*b"DISC");
    pub const BACK: Self = Self(*b"BACK");
    pub const FRAM: Self = Self(*b"FRAM");
    pub const MOVE: Self = Self(*b"MOVE");
    pub const CLIP: Self = Self(*b"CLIP");
    pub const SHOW: Self = Self(*b"SHOW");
    pub const TERM: Self = Self(*b"TERM");
    pub const SAVE: Self = Self(*b"SAVE");
    pub const SEEK: Self = Self(*b"SEEK");
    pub const eXPI: Self = Self(*b"eXPI");
    pub const fPRI: Self = Self(*b"fPRI");
    pub const nEED: Self = Self(*b"nEED");
    pub const pHYg: Self = Self(*b"pHYg");
    pub const DHDR: Self = Self(*b"DHDR");
    pub const PROM: Self = Self(*b"PROM");
    pub const IPNG: Self = Self(*b"IPNG");
    pub const PPLT: Self = Self(*b"PPLT");
    pub const IJNG: Self = Self(*b"IJNG");
    pub const DROP: Self = Self(*b"DROP");
    pub const DBYK: Self = Self(*b"DBYK");
    pub const ORDR: Self = Self(*b"ORDR");
    pub const MAGN: Self = Self(*b"MAGN");
    pub const evNT: Self = Self(*b"evNT");
    pub const mpNG: Self = Self(*b"mpNG");

    /// Wrap four raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Build a tag from its big-endian `u32` form.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw.to_be_bytes())
    }

    /// The big-endian `u32` form, as it appears on the wire.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    #[must_use]
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// A critical chunk has an uppercase first byte.
    #[must_use]
    pub const fn is_critical(self) -> bool {
        self.0[0] & CASE_BIT == 0
    }

    #[must_use]
    pub const fn is_ancillary(self) -> bool {
        !self.is_critical()
    }

    #[must_use]
    pub const fn is_private(self) -> bool {
        self.0[1] & CASE_BIT != 0
    }

    #[must_use]
    pub const fn is_reserved_bit_set(self) -> bool {
        self.0[2] & CASE_BIT != 0
    }

    #[must_use]
    pub const fn is_safe_to_copy(self) -> bool {
        self.0[3] & CASE_BIT != 0
    }

    /// Whether every byte is an ASCII letter, as the format requires.
    ///
    /// The engine never rejects a tag on this basis; it is offered to
    /// callers that want to flag garbage before passing it through.
    #[must_use]
    pub fn is_well_formed(self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic)
    }

    /// Tags that open an image or animation and must come first.
    #[must_use]
    pub fn is_header(self) -> bool {
        matches!(self, Self::IHDR | Self::MHDR | Self::JHDR)
    }
}

impl From<[u8; 4]> for ChunkTag {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_bits() {
        assert!(ChunkTag::IHDR.is_critical());
        assert!(!ChunkTag::IHDR.is_safe_to_copy());
        assert!(ChunkTag::tEXt.is_ancillary());
        assert!(ChunkTag::tEXt.is_safe_to_copy());
        assert!(ChunkTag::JdAA.is_critical());
        assert!(ChunkTag::JdAA.is_private());
        assert!(ChunkTag::new(*b"prVt").is_private());
        assert!(!ChunkTag::new(*b"IHDR").is_reserved_bit_set());
        assert!(ChunkTag::new(*b"IHdR").is_reserved_bit_set());
    }

    #[test]
    fn u32_roundtrip() {
        let tag = ChunkTag::MHDR;
        assert_eq!(tag.to_u32(), 0x4D48_4452);
        assert_eq!(ChunkTag::from_u32(0x4D48_4452), tag);
    }

    #[test]
    fn uppercase_sorts_first() {
        assert!(ChunkTag::TERM < ChunkTag::bKGD);
        assert!(ChunkTag::JDAT < ChunkTag::JdAA);
    }

    #[test]
    fn display_escapes_binary() {
        assert_eq!(ChunkTag::IEND.to_string(), "IEND");
        assert_eq!(ChunkTag::new([b'a', 0, b'c', 0xFF]).to_string(), "a\\x00c\\xFF");
    }

    #[test]
    fn well_formed_and_header() {
        assert!(ChunkTag::sRGB.is_well_formed());
        assert!(!ChunkTag::new(*b"12ab").is_well_formed());
        assert!(ChunkTag::JHDR.is_header());
        assert!(!ChunkTag::IEND.is_header());
    }
}
