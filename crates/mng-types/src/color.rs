use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{
    FieldReader, check_keyword_field, check_range, put_terminated, put_u16, put_u32,
};

/// gAMA: Image gamma times 100 000.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gama {
    pub gamma: u32,
}

impl Gama {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.gamma);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] or [`TypeError::InvalidLength`] unless 4 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::gAMA, buf);
        let gamma = r.u32()?;
        r.finish("4")?;
        Ok(Self { gamma })
    }
}

/// cHRM: Primary chromaticities, each coordinate times 100 000.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chrm {
    pub white: [u32; 2],
    pub red: [u32; 2],
    pub green: [u32; 2],
    pub blue: [u32; 2],
}

impl Chrm {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        for [x, y] in [self.white, self.red, self.green, self.blue] {
            put_u32(buf, x);
            put_u32(buf, y);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] or [`TypeError::InvalidLength`] unless 32 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::cHRM, buf);
        r.require(32)?;
        let mut point = || -> Result<[u32; 2], TypeError> { Ok([r.u32()?, r.u32()?]) };
        let chrm = Self {
            white: point()?,
            red: point()?,
            green: point()?,
            blue: point()?,
        };
        r.finish("32")?;
        Ok(chrm)
    }
}

/// sRGB: Rendering intent. Empty inside an MNG to cancel a global sRGB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Srgb {
    /// 0 perceptual, 1 relative colorimetric, 2 saturation, 3 absolute.
    pub intent: Option<u8>,
}

impl Srgb {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend(self.intent);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] above 1 byte, [`TypeError::InvalidValue`]
    /// for an intent above 3.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::sRGB;
        let mut r = FieldReader::new(tag, buf);
        let intent = r.opt_u8()?;
        r.finish("0 or 1")?;
        if let Some(intent) = intent {
            check_range(tag, "intent", u32::from(intent), 0..=3)?;
        }
        Ok(Self { intent })
    }
}

/// iCCP: Embedded ICC profile. The profile stays compressed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Iccp {
    pub name: String,
    pub method: u8,
    pub profile: Vec<u8>,
}

impl Iccp {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_terminated(buf, &self.name);
        buf.push(self.method);
        buf.extend_from_slice(&self.profile);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        check_keyword_field(ChunkTag::iCCP, "name", &self.name)
    }

    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`], [`TypeError::InvalidKeyword`] or
    /// [`TypeError::TooShort`].
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::iCCP, buf);
        let name = r.keyword()?;
        let method = r.u8()?;
        let profile = r.rest().to_vec();
        Ok(Self {
            name,
            method,
            profile,
        })
    }
}

/// sBIT: Significant bits per channel, 1 to 4 bytes depending on the
/// colour type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sbit {
    pub bits: Vec<u8>,
}

impl Sbit {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.bits);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] outside 1..=4 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if !(1..=4).contains(&buf.len()) {
            return Err(TypeError::InvalidLength {
                tag: ChunkTag::sBIT,
                length: buf.len(),
                expected: "1..=4",
            });
        }
        Ok(Self { bits: buf.to_vec() })
    }
}

/// bKGD: Background colour. The form is chosen by payload length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bkgd {
    /// Empty payload: cancels a global background inside an MNG.
    #[default]
    Empty,
    /// 1 byte: palette index.
    Index(u8),
    /// 2 bytes: gray level.
    Gray(u16),
    /// 6 bytes: RGB.
    Rgb([u16; 3]),
}

impl Bkgd {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        match *self {
            Self::Empty => {}
            Self::Index(i) => buf.push(i),
            Self::Gray(g) => put_u16(buf, g),
            Self::Rgb(rgb) => {
                for c in rgb {
                    put_u16(buf, c);
                }
            }
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for lengths other than 0, 1, 2 or 6.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::bKGD, buf);
        match buf.len() {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Index(r.u8()?)),
            2 => Ok(Self::Gray(r.u16()?)),
            6 => Ok(Self::Rgb([r.u16()?, r.u16()?, r.u16()?])),
            length => Err(TypeError::InvalidLength {
                tag: ChunkTag::bKGD,
                length,
                expected: "0, 1, 2 or 6",
            }),
        }
    }
}
