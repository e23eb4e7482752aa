use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{
    FieldReader, check_keyword_field, check_latin1, latin1_to_string, put_latin1, put_terminated,
};

// Textual metadata. All three chunks start with a NUL-terminated Latin-1
// keyword of 1 to 79 characters.
//
// ┌──────┬──────────────────────────────────────────────────────────────┐
// │ tEXt │ keyword \0 text                                              │
// │ zTXt │ keyword \0 method(u8) compressed...                          │
// │ iTXt │ keyword \0 flag(u8) method(u8) lang \0 translated \0 text... │
// └──────┴──────────────────────────────────────────────────────────────┘

/// tEXt: Uncompressed Latin-1 text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    pub keyword: String,
    pub text: String,
}

impl Text {
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
        }
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_terminated(buf, &self.keyword);
        put_latin1(buf, &self.text);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        check_keyword_field(ChunkTag::tEXt, "keyword", &self.keyword)?;
        check_latin1(ChunkTag::tEXt, "text", &self.text, false)
    }

    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`] or [`TypeError::InvalidKeyword`].
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::tEXt, buf);
        let keyword = r.keyword()?;
        let text = latin1_to_string(r.rest());
        Ok(Self { keyword, text })
    }
}

/// zTXt: Compressed Latin-1 text. The compressed stream is kept as is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ztxt {
    pub keyword: String,
    pub method: u8,
    pub compressed: Vec<u8>,
}

impl Ztxt {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_terminated(buf, &self.keyword);
        buf.push(self.method);
        buf.extend_from_slice(&self.compressed);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        check_keyword_field(ChunkTag::zTXt, "keyword", &self.keyword)
    }

    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`], [`TypeError::InvalidKeyword`] or
    /// [`TypeError::TooShort`] without the method byte.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::zTXt, buf);
        let keyword = r.keyword()?;
        let method = r.u8()?;
        let compressed = r.rest().to_vec();
        Ok(Self {
            keyword,
            method,
            compressed,
        })
    }
}

/// iTXt: International text.
///
/// The translated keyword and the text are UTF-8 on the wire but are
/// kept as bytes: when `compressed` is set the text is a zlib stream, and
/// a malformed sequence must still survive a round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Itxt {
    pub keyword: String,
    pub compressed: bool,
    pub method: u8,
    pub language: String,
    pub translated_keyword: Vec<u8>,
    pub text: Vec<u8>,
}

impl Itxt {
    /// Uncompressed international text with no language tag.
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: &str) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    /// The text as UTF-8, if it is uncompressed and well formed.
    #[must_use]
    pub fn text_str(&self) -> Option<&str> {
        if self.compressed {
            return None;
        }
        std::str::from_utf8(&self.text).ok()
    }

    #[must_use]
    pub fn translated_keyword_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.translated_keyword).ok()
    }

    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_terminated(buf, &self.keyword);
        buf.push(u8::from(self.compressed));
        buf.push(self.method);
        put_terminated(buf, &self.language);
        buf.extend_from_slice(&self.translated_keyword);
        buf.push(0);
        buf.extend_from_slice(&self.text);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        let tag = ChunkTag::iTXt;
        check_keyword_field(tag, "keyword", &self.keyword)?;
        check_latin1(tag, "language", &self.language, true)?;
        if self.translated_keyword.contains(&0) {
            return Err(TypeError::Unencodable {
                tag,
                field: "translated_keyword",
                found: '\0',
            });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`TypeError::MissingTerminator`], [`TypeError::InvalidKeyword`],
    /// [`TypeError::TooShort`] or [`TypeError::InvalidValue`] for a
    /// compression flag other than 0 or 1.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::iTXt;
        let mut r = FieldReader::new(tag, buf);
        let keyword = r.keyword()?;
        let flag = r.u8()?;
        if flag > 1 {
            return Err(TypeError::InvalidValue {
                tag,
                field: "compression_flag",
                value: u32::from(flag),
            });
        }
        let method = r.u8()?;
        let language = r.terminated("language")?;
        let translated_keyword = r.terminated_raw("translated_keyword")?.to_vec();
        let text = r.rest().to_vec();
        Ok(Self {
            keyword,
            compressed: flag == 1,
            method,
            language,
            translated_keyword,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_roundtrip() {
        let text = Text::new("Title", "Sunset over \u{e9}tang");
        let mut body = Vec::new();
        text.encode_body(&mut body);
        assert_eq!(&body[..6], b"Title\0");
        assert_eq!(Text::decode_body(&body).unwrap(), text);
    }

    #[test]
    fn text_without_terminator() {
        assert!(matches!(
            Text::decode_body(b"Title"),
            Err(TypeError::MissingTerminator {
                field: "keyword",
                ..
            })
        ));
    }

    #[test]
    fn ztxt_requires_method() {
        assert!(matches!(
            Ztxt::decode_body(b"Comment\0"),
            Err(TypeError::TooShort { .. })
        ));
        let z = Ztxt::decode_body(b"Comment\0\0\x78\x9c").unwrap();
        assert_eq!(z.method, 0);
        assert_eq!(z.compressed, [0x78, 0x9c]);
    }

    #[test]
    fn itxt_roundtrip() {
        let itxt = Itxt {
            keyword: "Author".into(),
            compressed: false,
            method: 0,
            language: "ja".into(),
            translated_keyword: "著者".as_bytes().to_vec(),
            text: "写真家".as_bytes().to_vec(),
        };
        let mut body = Vec::new();
        itxt.encode_body(&mut body);
        let decoded = Itxt::decode_body(&body).unwrap();
        assert_eq!(decoded, itxt);
        assert_eq!(decoded.text_str(), Some("写真家"));
        assert_eq!(decoded.translated_keyword_str(), Some("著者"));
    }

    #[test]
    fn itxt_rejects_bad_flag() {
        assert!(matches!(
            Itxt::decode_body(b"K\0\x02\0\0\0"),
            Err(TypeError::InvalidValue { value: 2, .. })
        ));
    }
}
