use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u16};

/// tIME: Last modification time, UTC.
///
/// Hour 24 and second 60 are not errors: the ranges follow what
/// encoders in the wild produce rather than a strict clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Time {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Time {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.year);
        buf.extend_from_slice(&[self.month, self.day, self.hour, self.minute, self.second]);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless 7
    /// bytes, [`TypeError::InvalidValue`] for an out-of-range component.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::tIME;
        let mut r = FieldReader::new(tag, buf);
        r.require(7)?;
        let time = Self {
            year: r.u16()?,
            month: r.u8()?,
            day: r.u8()?,
            hour: r.u8()?,
            minute: r.u8()?,
            second: r.u8()?,
        };
        r.finish("7")?;

        check_range(tag, "month", u32::from(time.month), 1..=12)?;
        check_range(tag, "day", u32::from(time.day), 1..=31)?;
        check_range(tag, "hour", u32::from(time.hour), 0..=24)?;
        check_range(tag, "minute", u32::from(time.minute), 0..=60)?;
        check_range(tag, "second", u32::from(time.second), 0..=60)?;
        Ok(time)
    }
}
