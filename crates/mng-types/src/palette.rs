use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, put_u16};

/// PLTE: Palette of RGB triples.
///
/// An empty PLTE is legal inside an MNG and means "use the global
/// palette".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plte {
    pub entries: Vec<[u8; 3]>,
}

impl Plte {
    #[must_use]
    pub fn is_global_reference(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        for rgb in &self.entries {
            buf.extend_from_slice(rgb);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] unless the length is a multiple of 3
    /// holding at most 256 entries.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if !buf.len().is_multiple_of(3) || buf.len() > 256 * 3 {
            return Err(TypeError::InvalidLength {
                tag: ChunkTag::PLTE,
                length: buf.len(),
                expected: "a multiple of 3, at most 768",
            });
        }
        let entries = buf
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Ok(Self { entries })
    }
}

/// tRNS: Transparency.
///
/// The layout depends on the colour type of the enclosing image, which
/// the record does not know, so the sample bytes are kept verbatim and
/// interpreted on request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trns {
    pub data: Vec<u8>,
}

impl Trns {
    /// Single gray sample (colour type 0).
    #[must_use]
    pub fn gray(&self) -> Option<u16> {
        match self.data.as_slice() {
            [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }

    /// RGB sample (colour type 2).
    #[must_use]
    pub fn rgb(&self) -> Option<[u16; 3]> {
        match self.data.as_slice() {
            [r0, r1, g0, g1, b0, b1] => Some([
                u16::from_be_bytes([*r0, *r1]),
                u16::from_be_bytes([*g0, *g1]),
                u16::from_be_bytes([*b0, *b1]),
            ]),
            _ => None,
        }
    }

    /// Per-index alpha values (colour type 3).
    #[must_use]
    pub fn alpha(&self) -> &[u8] {
        &self.data
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] above 256 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if buf.len() > 256 {
            return Err(TypeError::InvalidLength {
                tag: ChunkTag::tRNS,
                length: buf.len(),
                expected: "at most 256",
            });
        }
        Ok(Self { data: buf.to_vec() })
    }
}

/// hIST: Palette usage frequencies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hist {
    pub frequencies: Vec<u16>,
}

impl Hist {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        for &f in &self.frequencies {
            put_u16(buf, f);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for an odd length.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if !buf.len().is_multiple_of(2) {
            return Err(TypeError::InvalidLength {
                tag: ChunkTag::hIST,
                length: buf.len(),
                expected: "even",
            });
        }
        let mut r = FieldReader::new(ChunkTag::hIST, buf);
        let mut frequencies = Vec::with_capacity(buf.len() / 2);
        while !r.is_empty() {
            frequencies.push(r.u16()?);
        }
        Ok(Self { frequencies })
    }
}
