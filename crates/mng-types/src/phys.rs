use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u32};

/// pHYs / pHYg: Pixel dimensions. Both share one layout; pHYg is the
/// MNG-global default.
///
/// Empty inside an MNG to cancel a previous global value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Phys {
    pub dimensions: Option<PixelDimensions>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelDimensions {
    pub x: u32,
    pub y: u32,
    /// 0 unknown (aspect ratio only), 1 metre.
    pub unit: u8,
}

impl Phys {
    #[must_use]
    pub fn per_metre(x: u32, y: u32) -> Self {
        Self {
            dimensions: Some(PixelDimensions { x, y, unit: 1 }),
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        if let Some(d) = &self.dimensions {
            put_u32(buf, d.x);
            put_u32(buf, d.y);
            buf.push(d.unit);
        }
    }

    /// `tag` selects which of pHYs and pHYg is reported in errors.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for lengths other than 0 or 9,
    /// [`TypeError::InvalidValue`] for a unit above 1.
    pub fn decode_body(tag: ChunkTag, buf: &[u8]) -> Result<Self, TypeError> {
        if buf.is_empty() {
            return Ok(Self::default());
        }
        let mut r = FieldReader::new(tag, buf);
        r.require(9)?;
        let d = PixelDimensions {
            x: r.u32()?,
            y: r.u32()?,
            unit: r.u8()?,
        };
        r.finish("0 or 9")?;
        check_range(tag, "unit", u32::from(d.unit), 0..=1)?;
        Ok(Self {
            dimensions: Some(d),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let phys = Phys::per_metre(2835, 2835);
        let mut body = Vec::new();
        phys.encode_body(&mut body);
        assert_eq!(body.len(), 9);
        assert_eq!(Phys::decode_body(ChunkTag::pHYs, &body).unwrap(), phys);
    }

    #[test]
    fn empty_cancels() {
        let phys = Phys::decode_body(ChunkTag::pHYg, &[]).unwrap();
        assert_eq!(phys.dimensions, None);
    }

    #[test]
    fn errors_name_the_tag() {
        assert!(matches!(
            Phys::decode_body(ChunkTag::pHYg, &[0; 5]),
            Err(TypeError::TooShort {
                tag: ChunkTag::pHYg,
                ..
            })
        ));
        let mut body = vec![0; 8];
        body.push(2);
        assert!(matches!(
            Phys::decode_body(ChunkTag::pHYs, &body),
            Err(TypeError::InvalidValue { field: "unit", .. })
        ));
    }
}
