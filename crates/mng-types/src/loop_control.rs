use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u32};

/// LOOP: Start of a repeated section.
///
/// ```text
/// level u8, repeat u32
///   [ termination u8
///     [ min_iterations u32
///       [ max_iterations u32
///         [ signal u32 ... ] ] ] ]
/// ```
///
/// Each optional field is written only when every field before it is
/// present; a `None` cuts the tail off at that point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Loop {
    pub level: u8,
    pub repeat: u32,
    pub termination: Option<u8>,
    pub min_iterations: Option<u32>,
    pub max_iterations: Option<u32>,
    pub signals: Vec<u32>,
}

impl Loop {
    #[must_use]
    pub fn new(level: u8, repeat: u32) -> Self {
        Self {
            level,
            repeat,
            ..Self::default()
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.level);
        put_u32(buf, self.repeat);
        let Some(termination) = self.termination else {
            return;
        };
        buf.push(termination);
        let Some(min) = self.min_iterations else {
            return;
        };
        put_u32(buf, min);
        let Some(max) = self.max_iterations else {
            return;
        };
        put_u32(buf, max);
        for &signal in &self.signals {
            put_u32(buf, signal);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] below 5 bytes or when an optional field is
    /// cut in the middle, [`TypeError::InvalidLength`] when the signal
    /// list is not a whole number of `u32`s.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::LOOP;
        let mut r = FieldReader::new(tag, buf);
        r.require(5)?;
        let mut lp = Self::new(r.u8()?, r.u32()?);

        lp.termination = r.opt_u8()?;
        if r.is_empty() {
            return Ok(lp);
        }
        lp.min_iterations = Some(r.u32()?);
        if r.is_empty() {
            return Ok(lp);
        }
        lp.max_iterations = Some(r.u32()?);

        if !r.remaining().is_multiple_of(4) {
            return Err(TypeError::InvalidLength {
                tag,
                length: buf.len(),
                expected: "14 plus a multiple of 4",
            });
        }
        while !r.is_empty() {
            lp.signals.push(r.u32()?);
        }
        if let Some(termination) = lp.termination {
            check_range(tag, "termination", u32::from(termination), 0..=5)?;
        }
        Ok(lp)
    }
}

/// ENDL: End of the LOOP with the same nesting level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Endl {
    pub level: u8,
}

impl Endl {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.level);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless 1 byte.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::ENDL, buf);
        let level = r.u8()?;
        r.finish("1")?;
        Ok(Self { level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_loop() {
        let lp = Loop::new(0, 10);
        let mut body = Vec::new();
        lp.encode_body(&mut body);
        assert_eq!(body, [0, 0, 0, 0, 10]);
        assert_eq!(Loop::decode_body(&body).unwrap(), lp);
    }

    #[test]
    fn full_loop_with_signals() {
        let lp = Loop {
            level: 1,
            repeat: 0x7FFF_FFFF,
            termination: Some(3),
            min_iterations: Some(1),
            max_iterations: Some(5),
            signals: vec![7, 9],
        };
        let mut body = Vec::new();
        lp.encode_body(&mut body);
        assert_eq!(body.len(), 14 + 8);
        assert_eq!(Loop::decode_body(&body).unwrap(), lp);
    }

    #[test]
    fn none_cuts_the_tail() {
        let lp = Loop {
            termination: None,
            min_iterations: Some(4),
            ..Loop::new(0, 1)
        };
        let mut body = Vec::new();
        lp.encode_body(&mut body);
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn reject_ragged_signals() {
        let mut body = Vec::new();
        Loop {
            termination: Some(0),
            min_iterations: Some(0),
            max_iterations: Some(0),
            ..Loop::new(0, 1)
        }
        .encode_body(&mut body);
        body.extend_from_slice(&[1, 2]);
        assert!(matches!(
            Loop::decode_body(&body),
            Err(TypeError::InvalidLength { length: 16, .. })
        ));
    }

    #[test]
    fn endl_roundtrip() {
        let mut body = Vec::new();
        Endl { level: 2 }.encode_body(&mut body);
        assert_eq!(Endl::decode_body(&body).unwrap().level, 2);
        assert!(Endl::decode_body(&[1, 2]).is_err());
    }
}
