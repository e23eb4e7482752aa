use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u32};

/// JHDR: Opens a JNG (JPEG image with optional PNG-style alpha).
///
/// 16 bytes: two `u32` dimensions followed by eight single-byte fields.
/// The alpha fields describe the optional IDAT/JDAA alpha channel and
/// are all zero for an opaque image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Jhdr {
    pub width: u32,
    pub height: u32,
    /// 8 gray, 10 color, 12 gray-alpha, 14 color-alpha.
    pub color_type: u8,
    /// 8, 12, or 20 (8 and 12 in separate streams).
    pub sample_depth: u8,
    pub compression: u8,
    /// 0 sequential, 8 progressive.
    pub interlace: u8,
    pub alpha_sample_depth: u8,
    pub alpha_compression: u8,
    pub alpha_filter: u8,
    pub alpha_interlace: u8,
}

pub const JHDR_SIZE: usize = 16;

impl Jhdr {
    /// Baseline 8-bit color JPEG without alpha.
    #[must_use]
    pub fn color8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color_type: 10,
            sample_depth: 8,
            compression: 8,
            interlace: 0,
            alpha_sample_depth: 0,
            alpha_compression: 0,
            alpha_filter: 0,
            alpha_interlace: 0,
        }
    }

    #[must_use]
    pub fn has_alpha(&self) -> bool {
        matches!(self.color_type, 12 | 14)
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.width);
        put_u32(buf, self.height);
        buf.extend_from_slice(&[
            self.color_type,
            self.sample_depth,
            self.compression,
            self.interlace,
            self.alpha_sample_depth,
            self.alpha_compression,
            self.alpha_filter,
            self.alpha_interlace,
        ]);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`], [`TypeError::InvalidLength`] or
    /// [`TypeError::InvalidValue`].
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::JHDR;
        let mut r = FieldReader::new(tag, buf);
        r.require(JHDR_SIZE)?;

        let jhdr = Self {
            width: r.u32()?,
            height: r.u32()?,
            color_type: r.u8()?,
            sample_depth: r.u8()?,
            compression: r.u8()?,
            interlace: r.u8()?,
            alpha_sample_depth: r.u8()?,
            alpha_compression: r.u8()?,
            alpha_filter: r.u8()?,
            alpha_interlace: r.u8()?,
        };
        r.finish("16")?;

        check_range(tag, "width", jhdr.width, 1..=0x7FFF_FFFF)?;
        check_range(tag, "height", jhdr.height, 1..=0x7FFF_FFFF)?;
        check_range(tag, "color_type", u32::from(jhdr.color_type), 8..=16)?;
        check_range(tag, "sample_depth", u32::from(jhdr.sample_depth), 8..=20)?;
        check_range(tag, "compression", u32::from(jhdr.compression), 8..=8)?;
        check_range(tag, "interlace", u32::from(jhdr.interlace), 0..=8)?;
        check_range(
            tag,
            "alpha_sample_depth",
            u32::from(jhdr.alpha_sample_depth),
            0..=16,
        )?;
        check_range(
            tag,
            "alpha_compression",
            u32::from(jhdr.alpha_compression),
            0..=8,
        )?;
        check_range(tag, "alpha_filter", u32::from(jhdr.alpha_filter), 0..=0)?;
        check_range(tag, "alpha_interlace", u32::from(jhdr.alpha_interlace), 0..=1)?;

        Ok(jhdr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut jhdr = Jhdr::color8(32, 16);
        jhdr.color_type = 14;
        jhdr.alpha_sample_depth = 8;
        let mut body = Vec::new();
        jhdr.encode_body(&mut body);
        assert_eq!(body.len(), JHDR_SIZE);
        let decoded = Jhdr::decode_body(&body).unwrap();
        assert_eq!(decoded, jhdr);
        assert!(decoded.has_alpha());
    }

    #[test]
    fn reject_png_color_type() {
        let mut jhdr = Jhdr::color8(1, 1);
        jhdr.color_type = 6;
        let mut body = Vec::new();
        jhdr.encode_body(&mut body);
        assert!(matches!(
            Jhdr::decode_body(&body),
            Err(TypeError::InvalidValue {
                field: "color_type",
                ..
            })
        ));
    }

    #[test]
    fn reject_long_payload() {
        let mut body = Vec::new();
        Jhdr::color8(1, 1).encode_body(&mut body);
        body.push(0);
        assert!(matches!(
            Jhdr::decode_body(&body),
            Err(TypeError::InvalidLength { length: 17, .. })
        ));
    }
}
