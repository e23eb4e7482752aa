use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, put_u32};

/// MHDR: Opens an MNG stream.
///
/// ```text
/// ┌────────┬──────────────┬──────────────────────────────────┐
/// │ Offset │ Field        │ Notes                            │
/// ├────────┼──────────────┼──────────────────────────────────┤
/// │ 0      │ frame_width  │ u32                              │
/// │ 4      │ frame_height │ u32                              │
/// │ 8      │ ticks        │ u32, ticks per second            │
/// │ 12     │ layer_count  │ u32 ┐                            │
/// │ 16     │ frame_count  │ u32 │ absent in the early 12-byte  │
/// │ 20     │ play_time    │ u32 │ form of the chunk            │
/// │ 24     │ simplicity   │ u32 ┘                            │
/// └────────┴──────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mhdr {
    pub frame_width: u32,
    pub frame_height: u32,
    pub ticks_per_second: u32,
    /// `None` for the 12-byte form.
    pub profile: Option<MhdrProfile>,
}

/// The trailing 16 bytes of a full MHDR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MhdrProfile {
    pub layer_count: u32,
    pub frame_count: u32,
    pub play_time: u32,
    pub simplicity: u32,
}

pub const MHDR_SIZE: usize = 28;
pub const MHDR_SHORT_SIZE: usize = 12;

impl Mhdr {
    /// A full-size MHDR with all counts unspecified (zero).
    #[must_use]
    pub fn new(frame_width: u32, frame_height: u32, ticks_per_second: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            ticks_per_second,
            profile: Some(MhdrProfile::default()),
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.frame_width);
        put_u32(buf, self.frame_height);
        put_u32(buf, self.ticks_per_second);
        if let Some(p) = &self.profile {
            put_u32(buf, p.layer_count);
            put_u32(buf, p.frame_count);
            put_u32(buf, p.play_time);
            put_u32(buf, p.simplicity);
        }
    }

    /// Parse a 28-byte or 12-byte MHDR.
    ///
    /// # Errors
    ///
    /// [`TypeError::TooShort`] below 12 bytes, [`TypeError::InvalidLength`]
    /// for any length other than 12 or 28.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::MHDR, buf);
        r.require(MHDR_SHORT_SIZE)?;

        let frame_width = r.u32()?;
        let frame_height = r.u32()?;
        let ticks_per_second = r.u32()?;

        let profile = match buf.len() {
            MHDR_SHORT_SIZE => None,
            MHDR_SIZE => Some(MhdrProfile {
                layer_count: r.u32()?,
                frame_count: r.u32()?,
                play_time: r.u32()?,
                simplicity: r.u32()?,
            }),
            _ => {
                return Err(TypeError::InvalidLength {
                    tag: ChunkTag::MHDR,
                    length: buf.len(),
                    expected: "12 or 28",
                });
            }
        };

        Ok(Self {
            frame_width,
            frame_height,
            ticks_per_second,
            profile,
        })
    }
}
