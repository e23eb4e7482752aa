use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{FieldReader, check_range, put_u32};

/// TERM: What a viewer does after the last frame.
///
/// ```text
/// action            0 show last frame   1 show frame 0 (cease)
///                   2 show frame 0      3 repeat
/// iteration_action  (only with action 3) what to do once iterations
///                   are exhausted: 0, 1 or 2 as above
/// ```
///
/// The iteration group is present (10 bytes total) or absent (1 byte).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Term {
    pub action: u8,
    pub repeat: Option<TermRepeat>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TermRepeat {
    pub iteration_action: u8,
    pub delay: u32,
    pub max_iterations: u32,
}

pub const TERM_ACTION_REPEAT: u8 = 3;

impl Term {
    /// Repeat `max_iterations` times with `delay` ticks between loops.
    #[must_use]
    pub fn repeat(delay: u32, max_iterations: u32) -> Self {
        Self {
            action: TERM_ACTION_REPEAT,
            repeat: Some(TermRepeat {
                iteration_action: 0,
                delay,
                max_iterations,
            }),
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.push(self.action);
        if let Some(rep) = &self.repeat {
            buf.push(rep.iteration_action);
            put_u32(buf, rep.delay);
            put_u32(buf, rep.max_iterations);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidLength`] for lengths other than 1 or 10,
    /// [`TypeError::InvalidValue`] for out-of-range actions.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::TERM;
        let mut r = FieldReader::new(tag, buf);
        let action = r.u8()?;
        check_range(tag, "action", u32::from(action), 0..=3)?;

        let repeat = match r.remaining() {
            0 => None,
            9 => {
                let iteration_action = r.u8()?;
                check_range(tag, "iteration_action", u32::from(iteration_action), 0..=2)?;
                Some(TermRepeat {
                    iteration_action,
                    delay: r.u32()?,
                    max_iterations: r.u32()?,
                })
            }
            _ => {
                return Err(TypeError::InvalidLength {
                    tag,
                    length: buf.len(),
                    expected: "1 or 10",
                });
            }
        };
        Ok(Self { action, repeat })
    }
}
