use mng_wire::ChunkTag;

use crate::error::TypeError;

/// Longest keyword the text and profile chunks allow.
pub const MAX_KEYWORD_LEN: usize = 79;

// ── Decoding ──────────────────────────────────────────────────────────
//
// Every fixed-layout payload is read through a `FieldReader`: a cursor
// over the payload that knows which chunk it belongs to, so that a
// short read can report the tag and how many bytes were needed.

/// Cursor over one chunk payload.
#[derive(Clone, Debug)]
pub struct FieldReader<'a> {
    tag: ChunkTag,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    #[must_use]
    pub fn new(tag: ChunkTag, buf: &'a [u8]) -> Self {
        Self { tag, buf, pos: 0 }
    }

    #[must_use]
    pub fn tag(&self) -> ChunkTag {
        self.tag
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless the whole payload is at least `needed` bytes.
    ///
    /// # Errors
    ///
    /// [`TypeError::TooShort`].
    pub fn require(&self, needed: usize) -> Result<(), TypeError> {
        if self.buf.len() < needed {
            return Err(TypeError::TooShort {
                tag: self.tag,
                needed,
                actual: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Take the next `n` bytes.
    ///
    /// # Errors
    ///
    /// [`TypeError::TooShort`] if fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], TypeError> {
        let end = self.pos + n;
        let Some(bytes) = self.buf.get(self.pos..end) else {
            return Err(TypeError::TooShort {
                tag: self.tag,
                needed: end,
                actual: self.buf.len(),
            });
        };
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], TypeError> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`].
    pub fn u8(&mut self) -> Result<u8, TypeError> {
        Ok(self.array::<1>()?[0])
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`].
    pub fn u16(&mut self) -> Result<u16, TypeError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`].
    pub fn u32(&mut self) -> Result<u32, TypeError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`].
    pub fn i32(&mut self) -> Result<i32, TypeError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    /// Read an optional `u8`: `None` at end of payload.
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible so call sites read like the
    /// mandatory readers.
    pub fn opt_u8(&mut self) -> Result<Option<u8>, TypeError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.u8().map(Some)
    }

    /// Read the rest of the payload.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }

    /// Read a NUL-terminated Latin-1 string and consume the NUL.
    ///
    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`] if no NUL follows.
    pub fn terminated(&mut self, field: &'static str) -> Result<String, TypeError> {
        self.terminated_raw(field).map(latin1_to_string)
    }

    /// Read the bytes up to the next NUL and consume the NUL.
    ///
    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`] if no NUL follows.
    pub fn terminated_raw(&mut self, field: &'static str) -> Result<&'a [u8], TypeError> {
        let rest = &self.buf[self.pos..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(TypeError::MissingTerminator {
                tag: self.tag,
                field,
            });
        };
        self.pos += nul + 1;
        Ok(&rest[..nul])
    }

    /// Read a NUL-terminated keyword and check its length.
    ///
    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`] or [`TypeError::InvalidKeyword`].
    pub fn keyword(&mut self) -> Result<String, TypeError> {
        let keyword = self.terminated("keyword")?;
        check_keyword(self.tag, &keyword)?;
        Ok(keyword)
    }

    /// Fail if anything is left unread.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidLength`].
    pub fn finish(&self, expected: &'static str) -> Result<(), TypeError> {
        if !self.is_empty() {
            return Err(TypeError::InvalidLength {
                tag: self.tag,
                length: self.buf.len(),
                expected,
            });
        }
        Ok(())
    }
}

/// Check a keyword is 1 to 79 bytes.
///
/// # Errors
///
/// [`TypeError::InvalidKeyword`].
pub fn check_keyword(tag: ChunkTag, keyword: &str) -> Result<(), TypeError> {
    let length = keyword.chars().count();
    if length == 0 || length > MAX_KEYWORD_LEN {
        return Err(TypeError::InvalidKeyword { tag, length });
    }
    Ok(())
}

/// Check `value` can be written as Latin-1. In a `terminated` field a
/// NUL would end the field early, so it is refused as well.
///
/// # Errors
///
/// [`TypeError::Unencodable`] naming the first offending character.
pub fn check_latin1(
    tag: ChunkTag,
    field: &'static str,
    value: &str,
    terminated: bool,
) -> Result<(), TypeError> {
    match value
        .chars()
        .find(|&c| u32::from(c) > 0xFF || (terminated && c == '\0'))
    {
        Some(found) => Err(TypeError::Unencodable { tag, field, found }),
        None => Ok(()),
    }
}

/// A keyword that reads back unchanged: 1 to 79 Latin-1 characters
/// without NUL.
///
/// # Errors
///
/// [`TypeError::Unencodable`] or [`TypeError::InvalidKeyword`].
pub fn check_keyword_field(
    tag: ChunkTag,
    field: &'static str,
    keyword: &str,
) -> Result<(), TypeError> {
    check_latin1(tag, field, keyword, true)?;
    check_keyword(tag, keyword)
}

/// Fail with [`TypeError::InvalidValue`] unless `value` is in `range`.
///
/// # Errors
///
/// [`TypeError::InvalidValue`].
pub fn check_range(
    tag: ChunkTag,
    field: &'static str,
    value: u32,
    range: std::ops::RangeInclusive<u32>,
) -> Result<(), TypeError> {
    if !range.contains(&value) {
        return Err(TypeError::InvalidValue { tag, field, value });
    }
    Ok(())
}

// ── Encoding ──────────────────────────────────────────────────────────

pub fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Append a Latin-1 string followed by a NUL byte.
pub fn put_terminated(buf: &mut Vec<u8>, value: &str) {
    put_latin1(buf, value);
    buf.push(0);
}

/// Append a Latin-1 string without terminator.
///
/// Characters outside Latin-1 cannot be represented and become `?`;
/// [`check_latin1`] rejects them up front.
pub fn put_latin1(buf: &mut Vec<u8>, value: &str) {
    buf.extend(value.chars().map(|c| u8::try_from(c).unwrap_or(b'?')));
}

/// Latin-1 maps each byte to the code point of the same value, so this
/// conversion never fails and round-trips through [`put_latin1`].
#[must_use]
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
