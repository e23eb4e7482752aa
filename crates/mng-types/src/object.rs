use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_i32, put_u16};

// MNG object chunks: define, position, clip, show and discard numbered
// image objects. Object 0 is the unnamed "current" image.

/// DEFI: Define an object and its placement.
///
/// ```text
/// object_id u16
///   [ do_not_show u8
///     [ concrete u8
///       [ x i32, y i32
///         [ clip left, right, top, bottom i32 ] ] ] ]
/// ```
///
/// Allowed lengths: 2, 3, 4, 12, 28.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Defi {
    pub object_id: u16,
    pub do_not_show: Option<u8>,
    pub concrete: Option<u8>,
    pub location: Option<(i32, i32)>,
    pub clip: Option<ClipBounds>,
}

/// Left, right, top, bottom; right and bottom are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipBounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl ClipBounds {
    fn encode(&self, buf: &mut Vec<u8>) {
        put_i32(buf, self.left);
        put_i32(buf, self.right);
        put_i32(buf, self.top);
        put_i32(buf, self.bottom);
    }

    fn decode(r: &mut FieldReader<'_>) -> Result<Self, TypeError> {
        Ok(Self {
            left: r.i32()?,
            right: r.i32()?,
            top: r.i32()?,
            bottom: r.i32()?,
        })
    }
}

impl Defi {
    #[must_use]
    pub fn new(object_id: u16) -> Self {
        Self {
            object_id,
            ..Self::default()
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.object_id);
        let Some(do_not_show) = self.do_not_show else {
            return;
        };
        buf.push(do_not_show);
        let Some(concrete) = self.concrete else {
            return;
        };
        buf.push(concrete);
        let Some((x, y)) = self.location else {
            return;
        };
        put_i32(buf, x);
        put_i32(buf, y);
        if let Some(clip) = &self.clip {
            clip.encode(buf);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] below 2 bytes, [`TypeError::InvalidLength`]
    /// for lengths other than 2, 3, 4, 12 or 28,
    /// [`TypeError::InvalidValue`] for flags above 1.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::DEFI;
        let mut r = FieldReader::new(tag, buf);
        r.require(2)?;
        if !matches!(buf.len(), 2 | 3 | 4 | 12 | 28) {
            return Err(TypeError::InvalidLength {
                tag,
                length: buf.len(),
                expected: "2, 3, 4, 12 or 28",
            });
        }

        let mut defi = Self::new(r.u16()?);
        defi.do_not_show = r.opt_u8()?;
        defi.concrete = r.opt_u8()?;
        if !r.is_empty() {
            defi.location = Some((r.i32()?, r.i32()?));
        }
        if !r.is_empty() {
            defi.clip = Some(ClipBounds::decode(&mut r)?);
        }

        if let Some(v) = defi.do_not_show {
            check_range(tag, "do_not_show", u32::from(v), 0..=1)?;
        }
        if let Some(v) = defi.concrete {
            check_range(tag, "concrete", u32::from(v), 0..=1)?;
        }
        Ok(defi)
    }
}

/// MOVE: Reposition a range of objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Move {
    pub first_id: u16,
    pub last_id: u16,
    /// 0 absolute, 1 relative to the previous position.
    pub kind: u8,
    pub x: i32,
    pub y: i32,
}

impl Move {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.first_id);
        put_u16(buf, self.last_id);
        buf.push(self.kind);
        put_i32(buf, self.x);
        put_i32(buf, self.y);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless 13 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::MOVE;
        let mut r = FieldReader::new(tag, buf);
        r.require(13)?;
        let mv = Self {
            first_id: r.u16()?,
            last_id: r.u16()?,
            kind: r.u8()?,
            x: r.i32()?,
            y: r.i32()?,
        };
        r.finish("13")?;
        check_range(tag, "kind", u32::from(mv.kind), 0..=1)?;
        Ok(mv)
    }
}

/// CLIP: Set the clipping boundaries of a range of objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clip {
    pub first_id: u16,
    pub last_id: u16,
    pub kind: u8,
    pub bounds: ClipBounds,
}

impl Clip {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.first_id);
        put_u16(buf, self.last_id);
        buf.push(self.kind);
        self.bounds.encode(buf);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless 21 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::CLIP;
        let mut r = FieldReader::new(tag, buf);
        r.require(21)?;
        let clip = Self {
            first_id: r.u16()?,
            last_id: r.u16()?,
            kind: r.u8()?,
            bounds: ClipBounds::decode(&mut r)?,
        };
        r.finish("21")?;
        check_range(tag, "kind", u32::from(clip.kind), 0..=1)?;
        Ok(clip)
    }
}

/// SHOW: Make a range of objects visible. Every field is optional;
/// an empty SHOW applies to all objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Show {
    pub first_id: Option<u16>,
    pub last_id: Option<u16>,
    pub mode: Option<u8>,
}

impl Show {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        let Some(first) = self.first_id else {
            return;
        };
        put_u16(buf, first);
        let Some(last) = self.last_id else {
            return;
        };
        put_u16(buf, last);
        buf.extend(self.mode);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for lengths other than 0, 2, 4 or 5,
    /// [`TypeError::InvalidValue`] for a mode above 7.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::SHOW;
        if !matches!(buf.len(), 0 | 2 | 4 | 5) {
            return Err(TypeError::InvalidLength {
                tag,
                length: buf.len(),
                expected: "0, 2, 4 or 5",
            });
        }
        let mut r = FieldReader::new(tag, buf);
        let mut show = Self::default();
        if !r.is_empty() {
            show.first_id = Some(r.u16()?);
        }
        if !r.is_empty() {
            show.last_id = Some(r.u16()?);
        }
        show.mode = r.opt_u8()?;
        if let Some(mode) = show.mode {
            check_range(tag, "mode", u32::from(mode), 0..=7)?;
        }
        Ok(show)
    }
}

/// DISC: Discard objects. An empty list discards every object except 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Disc {
    pub object_ids: Vec<u16>,
}

impl Disc {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        for &id in &self.object_ids {
            put_u16(buf, id);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for an odd length.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if !buf.len().is_multiple_of(2) {
            return Err(TypeError::InvalidLength {
                tag: ChunkTag::DISC,
                length: buf.len(),
                expected: "even",
            });
        }
        let mut r = FieldReader::new(ChunkTag::DISC, buf);
        let mut object_ids = Vec::with_capacity(buf.len() / 2);
        while !r.is_empty() {
            object_ids.push(r.u16()?);
        }
        Ok(Self { object_ids })
    }
}
