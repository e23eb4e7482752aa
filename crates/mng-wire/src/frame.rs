use crate::crc::chunk_crc;
use crate::crc_policy::CrcOutput;
use crate::error::WireError;
use crate::signature::SIGNATURE_SIZE;
use crate::tag::ChunkTag;

pub const LENGTH_SIZE: usize = 4;
pub const TAG_SIZE: usize = 4;
pub const CRC_SIZE: usize = 4;

/// Largest payload length the format allows (2^31 - 1).
pub const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// Chunk frame on the wire.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ length   (u32 BE, payload bytes only)            │
/// │ tag      (4 bytes)                               │
/// │ payload  [length bytes]                          │
/// │ crc      (u32 BE over tag + payload, optional)   │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// The "framed length" used for buffering decisions is everything after
/// the length field: tag, payload and, when present, the CRC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkFrame {
    pub tag: ChunkTag,
    pub payload: Vec<u8>,
    /// Stored CRC. `None` for streams written without CRCs.
    pub crc: Option<u32>,
}

/// Borrowed view of a framed body after the length field was consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameParts<'a> {
    pub tag: ChunkTag,
    pub payload: &'a [u8],
    pub crc: Option<u32>,
}

/// Decode and validate a 4-byte length field.
///
/// # Errors
///
/// Returns [`WireError::InvalidLength`] above [`MAX_CHUNK_LENGTH`].
pub fn read_length(bytes: [u8; LENGTH_SIZE]) -> Result<u32, WireError> {
    let length = u32::from_be_bytes(bytes);
    if length > MAX_CHUNK_LENGTH {
        return Err(WireError::InvalidLength {
            length,
            limit: MAX_CHUNK_LENGTH,
        });
    }
    Ok(length)
}

/// Bytes that follow the length field for a payload of `length` bytes.
#[must_use]
pub fn framed_length(length: u32, crc_present: bool) -> usize {
    let crc = if crc_present { CRC_SIZE } else { 0 };
    TAG_SIZE + length as usize + crc
}

/// Split a framed body (tag + payload [+ crc]) into its parts.
///
/// # Errors
///
/// Returns [`WireError::TruncatedFrame`] if the slice cannot hold the
/// tag (and CRC, when expected).
pub fn split_frame(frame: &[u8], crc_present: bool) -> Result<FrameParts<'_>, WireError> {
    let overhead = TAG_SIZE + if crc_present { CRC_SIZE } else { 0 };
    if frame.len() < overhead {
        let mut tag = [0_u8; 4];
        let n = frame.len().min(TAG_SIZE);
        tag[..n].copy_from_slice(&frame[..n]);
        return Err(WireError::TruncatedFrame {
            tag: ChunkTag::new(tag),
            needed: overhead,
            available: frame.len(),
        });
    }

    let (tag_bytes, rest) = frame.split_at(TAG_SIZE);
    let mut tag = [0_u8; 4];
    tag.copy_from_slice(tag_bytes);

    let (payload, crc) = if crc_present {
        let (payload, crc_bytes) = rest.split_at(rest.len() - CRC_SIZE);
        let mut raw = [0_u8; 4];
        raw.copy_from_slice(crc_bytes);
        (payload, Some(u32::from_be_bytes(raw)))
    } else {
        (rest, None)
    };

    Ok(FrameParts {
        tag: ChunkTag::new(tag),
        payload,
        crc,
    })
}

/// Write one chunk: length, tag, payload and the CRC slot.
///
/// # Returns
///
/// Total number of bytes written.
///
/// # Errors
///
/// - [`WireError::InvalidLength`] if the payload exceeds [`MAX_CHUNK_LENGTH`].
/// - [`WireError::Io`] from the writer.
pub fn write_chunk(
    w: &mut impl std::io::Write,
    tag: ChunkTag,
    payload: &[u8],
    crc: CrcOutput,
) -> Result<usize, WireError> {
    let length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    if length > MAX_CHUNK_LENGTH {
        return Err(WireError::InvalidLength {
            length,
            limit: MAX_CHUNK_LENGTH,
        });
    }

    w.write_all(&length.to_be_bytes())?;
    w.write_all(tag.as_bytes())?;
    w.write_all(payload)?;
    let mut written = LENGTH_SIZE + TAG_SIZE + payload.len();

    match crc {
        CrcOutput::None => {}
        CrcOutput::Generate => {
            w.write_all(&chunk_crc(tag, payload).to_be_bytes())?;
            written += CRC_SIZE;
        }
        CrcOutput::Dummy => {
            w.write_all(&[0; CRC_SIZE])?;
            written += CRC_SIZE;
        }
    }

    Ok(written)
}

impl ChunkFrame {
    /// Build a frame whose CRC is computed from the tag and payload.
    #[must_use]
    pub fn new(tag: ChunkTag, payload: Vec<u8>) -> Self {
        let crc = Some(chunk_crc(tag, &payload));
        Self { tag, payload, crc }
    }

    /// Whether the stored CRC matches the contents. Frames without a
    /// CRC are considered valid.
    #[must_use]
    pub fn crc_matches(&self) -> bool {
        self.crc.is_none_or(|crc| crc == chunk_crc(self.tag, &self.payload))
    }

    /// Write this frame, emitting the stored CRC verbatim when present.
    ///
    /// # Errors
    ///
    /// Same as [`write_chunk`].
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        match self.crc {
            None => write_chunk(w, self.tag, &self.payload, CrcOutput::None),
            Some(crc) => {
                let n = write_chunk(w, self.tag, &self.payload, CrcOutput::None)?;
                w.write_all(&crc.to_be_bytes())?;
                Ok(n + CRC_SIZE)
            }
        }
    }

    /// Read one complete frame from the start of `buf`.
    ///
    /// # Returns
    ///
    /// The frame and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the slice ends inside the frame.
    /// - [`WireError::InvalidLength`] for lengths above [`MAX_CHUNK_LENGTH`].
    pub fn read_from(buf: &[u8], crc_present: bool) -> Result<(Self, usize), WireError> {
        let Some(len_bytes) = buf.get(..LENGTH_SIZE) else {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        };
        let mut raw = [0_u8; LENGTH_SIZE];
        raw.copy_from_slice(len_bytes);
        let length = read_length(raw)?;

        let end = LENGTH_SIZE
            .checked_add(framed_length(length, crc_present))
            .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
        let Some(body) = buf.get(LENGTH_SIZE..end) else {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        };

        let parts = split_frame(body, crc_present)?;
        Ok((
            Self {
                tag: parts.tag,
                payload: parts.payload.to_vec(),
                crc: parts.crc,
            },
            end,
        ))
    }
}

/// Iterator over the raw frames of a complete, in-memory stream.
///
/// Meant for inspection and tests: it stops at the first frame that
/// does not fit rather than reporting why. The engine proper never uses
/// it because it cannot suspend.
#[derive(Clone, Debug)]
pub struct RawFrameIter<'b> {
    rest: &'b [u8],
    crc_present: bool,
}

impl<'b> RawFrameIter<'b> {
    /// Pass the full stream; the 8-byte signature is skipped.
    #[must_use]
    pub fn new(stream: &'b [u8], crc_present: bool) -> Self {
        Self {
            rest: stream.get(SIGNATURE_SIZE..).unwrap_or(&[]),
            crc_present,
        }
    }
}

impl Iterator for RawFrameIter<'_> {
    type Item = ChunkFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let (frame, consumed) = ChunkFrame::read_from(self.rest, self.crc_present).ok()?;
        self.rest = &self.rest[consumed..];
        Some(frame)
    }
}
