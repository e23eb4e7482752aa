use std::fmt;

/// Which buffer a body is staged in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// The reusable staging buffer, for framed lengths below its size.
    Default,
    /// A buffer sized for this one frame, dropped after the chunk.
    Overflow,
}

/// Where the read loop is within the stream.
///
/// ```text
///   Signature ──▶ Length ──▶ Body ──▶ (dispatch) ──┐
///                   ▲                              │
///                   └──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Signature,
    Length,
    Body { length: u32, tier: Tier },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signature => f.write_str("signature"),
            Self::Length => f.write_str("chunk length"),
            Self::Body { length, .. } => write!(f, "chunk body ({length} bytes)"),
        }
    }
}

/// Snapshot of a suspended read: the step in flight and how many of its
/// bytes are already staged. Resuming continues from exactly here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub step: Step,
    pub filled: usize,
}

impl Step {
    /// The buffer tier the step reads into.
    #[must_use]
    pub fn tier(self) -> Tier {
        match self {
            Self::Signature | Self::Length => Tier::Default,
            Self::Body { tier, .. } => tier,
        }
    }
}
