use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u32};

/// IHDR: Opens a still image (or an embedded image inside an MNG).
///
/// ```text
/// ┌────────┬──────┬──────────────┬────────────────────────────┐
/// │ Offset │ Size │ Field        │ Allowed                    │
/// ├────────┼──────┼──────────────┼────────────────────────────┤
/// │ 0      │ 4    │ width        │ 1..=2^31-1                 │
/// │ 4      │ 4    │ height       │ 1..=2^31-1                 │
/// │ 8      │ 1    │ bit_depth    │ 1, 2, 4, 8, 16             │
/// │ 9      │ 1    │ color_type   │ 0, 2, 3, 4, 6              │
/// │ 10     │ 1    │ compression  │ 0                          │
/// │ 11     │ 1    │ filter       │ 0, or 64 inside MNG        │
/// │ 12     │ 1    │ interlace    │ 0, 1                       │
/// └────────┴──────┴──────────────┴────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ihdr {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

pub const IHDR_SIZE: usize = 13;

/// Filter method 64 is the MNG intrapixel-differencing extension.
pub const FILTER_ADAPTIVE: u8 = 0;
pub const FILTER_INTRAPIXEL: u8 = 64;

impl Ihdr {
    /// An 8-bit RGBA, non-interlaced header.
    #[must_use]
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type: 6,
            compression: 0,
            filter: FILTER_ADAPTIVE,
            interlace: 0,
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.width);
        put_u32(buf, self.height);
        buf.extend_from_slice(&[
            self.bit_depth,
            self.color_type,
            self.compression,
            self.filter,
            self.interlace,
        ]);
    }

    /// Parse a 13-byte IHDR payload.
    ///
    /// # Errors
    ///
    /// - [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless the
    ///   payload is exactly 13 bytes.
    /// - [`TypeError::InvalidValue`] for out-of-range fields.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::IHDR;
        let mut r = FieldReader::new(tag, buf);
        r.require(IHDR_SIZE)?;

        let width = r.u32()?;
        let height = r.u32()?;
        let bit_depth = r.u8()?;
        let color_type = r.u8()?;
        let compression = r.u8()?;
        let filter = r.u8()?;
        let interlace = r.u8()?;
        r.finish("13")?;

        check_range(tag, "width", width, 1..=0x7FFF_FFFF)?;
        check_range(tag, "height", height, 1..=0x7FFF_FFFF)?;
        if !matches!(bit_depth, 1 | 2 | 4 | 8 | 16) {
            return Err(TypeError::InvalidValue {
                tag,
                field: "bit_depth",
                value: u32::from(bit_depth),
            });
        }
        if !matches!(color_type, 0 | 2 | 3 | 4 | 6) {
            return Err(TypeError::InvalidValue {
                tag,
                field: "color_type",
                value: u32::from(color_type),
            });
        }
        check_range(tag, "compression", u32::from(compression), 0..=0)?;
        if !matches!(filter, FILTER_ADAPTIVE | FILTER_INTRAPIXEL) {
            return Err(TypeError::InvalidValue {
                tag,
                field: "filter",
                value: u32::from(filter),
            });
        }
        check_range(tag, "interlace", u32::from(interlace), 0..=1)?;

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            compression,
            filter,
            interlace,
        })
    }
}
