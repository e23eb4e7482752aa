use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u16};

/// BACK: Background colour and optional background image.
///
/// ```text
/// red u16, green u16, blue u16
///   [ mandatory u8 [ image_id u16 [ tile u8 ] ] ]
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Back {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub mandatory: Option<u8>,
    pub image_id: Option<u16>,
    pub tile: Option<u8>,
}

impl Back {
    #[must_use]
    pub fn rgb(red: u16, green: u16, blue: u16) -> Self {
        Self {
            red,
            green,
            blue,
            ..Self::default()
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.red);
        put_u16(buf, self.green);
        put_u16(buf, self.blue);
        let Some(mandatory) = self.mandatory else {
            return;
        };
        buf.push(mandatory);
        let Some(image_id) = self.image_id else {
            return;
        };
        put_u16(buf, image_id);
        buf.extend(self.tile);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] below 6 bytes, [`TypeError::InvalidLength`]
    /// for lengths other than 6, 7, 9 or 10.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::BACK;
        let mut r = FieldReader::new(tag, buf);
        r.require(6)?;
        if !matches!(buf.len(), 6 | 7 | 9 | 10) {
            return Err(TypeError::InvalidLength {
                tag,
                length: buf.len(),
                expected: "6, 7, 9 or 10",
            });
        }
        let mut back = Self::rgb(r.u16()?, r.u16()?, r.u16()?);
        back.mandatory = r.opt_u8()?;
        if !r.is_empty() {
            back.image_id = Some(r.u16()?);
        }
        back.tile = r.opt_u8()?;

        if let Some(m) = back.mandatory {
            check_range(tag, "mandatory", u32::from(m), 0..=3)?;
        }
        if let Some(t) = back.tile {
            check_range(tag, "tile", u32::from(t), 0..=1)?;
        }
        Ok(back)
    }
}
