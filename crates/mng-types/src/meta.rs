use mng_wire::ChunkTag;

use crate::error::TypeError;
use crate::fields::{
    FieldReader, check_keyword, check_keyword_field, latin1_to_string, put_latin1, put_u16,
};

/// SEEK: A point a viewer may jump to. The name is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seek {
    pub name: Option<String>,
}

impl Seek {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        if let Some(name) = &self.name {
            put_latin1(buf, name);
        }
    }

    /// An empty name would read back as no name at all.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        match &self.name {
            Some(name) => check_keyword_field(ChunkTag::SEEK, "name", name),
            None => Ok(()),
        }
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] for a name over 79 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        if buf.is_empty() {
            return Ok(Self { name: None });
        }
        let name = latin1_to_string(buf);
        check_keyword(ChunkTag::SEEK, &name)?;
        Ok(Self { name: Some(name) })
    }
}

/// eXPI: Export a snapshot under a name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expi {
    pub snapshot_id: u16,
    pub name: String,
}

impl Expi {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        put_u16(buf, self.snapshot_id);
        put_latin1(buf, &self.name);
    }

    /// # Errors
    ///
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        check_keyword_field(ChunkTag::eXPI, "name", &self.name)
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] without a name, [`TypeError::InvalidKeyword`]
    /// for a name over 79 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::eXPI;
        let mut r = FieldReader::new(tag, buf);
        r.require(3)?;
        let snapshot_id = r.u16()?;
        let name = latin1_to_string(r.rest());
        check_keyword(tag, &name)?;
        Ok(Self { snapshot_id, name })
    }
}

/// fPRI: Frame priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fpri {
    /// 0 absolute, 1 relative.
    pub delta: u8,
    pub priority: u8,
}

impl Fpri {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&[self.delta, self.priority]);
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] / [`TypeError::InvalidLength`] unless 2 bytes.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let mut r = FieldReader::new(ChunkTag::fPRI, buf);
        let fpri = Self {
            delta: r.u8()?,
            priority: r.u8()?,
        };
        r.finish("2")?;
        Ok(fpri)
    }
}

/// nEED: Resources the decoder must support, NUL-separated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Need {
    pub keywords: Vec<String>,
}

impl Need {
    pub fn encode_body(&self, buf: &mut Vec<u8>) {
        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 {
                buf.push(0);
            }
            put_latin1(buf, keyword);
        }
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] without keywords, otherwise
    /// [`TypeError::InvalidKeyword`] or [`TypeError::Unencodable`].
    pub fn validate(&self) -> Result<(), TypeError> {
        let tag = ChunkTag::nEED;
        if self.keywords.is_empty() {
            return Err(TypeError::TooShort {
                tag,
                needed: 1,
                actual: 0,
            });
        }
        self.keywords
            .iter()
            .try_for_each(|k| check_keyword_field(tag, "keyword", k))
    }

    /// # Errors
    ///
    /// [`TypeError::TooShort`] when empty, [`TypeError::InvalidKeyword`]
    /// for an empty or over-long entry.
    pub fn decode_body(buf: &[u8]) -> Result<Self, TypeError> {
        let tag = ChunkTag::nEED;
        FieldReader::new(tag, buf).require(1)?;
        let keywords = buf
            .split(|&b| b == 0)
            .map(|k| {
                let keyword = latin1_to_string(k);
                check_keyword(tag, &keyword).map(|()| keyword)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { keywords })
    }

    #[must_use]
    pub fn requires(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_optional_name() {
        assert_eq!(Seek::decode_body(&[]).unwrap().name, None);
        let seek = Seek {
            name: Some("chapter 2".into()),
        };
        let mut body = Vec::new();
        seek.encode_body(&mut body);
        assert_eq!(Seek::decode_body(&body).unwrap(), seek);
    }

    #[test]
    fn expi_roundtrip() {
        let expi = Expi {
            snapshot_id: 3,
            name: "intro".into(),
        };
        let mut body = Vec::new();
        expi.encode_body(&mut body);
        assert_eq!(Expi::decode_body(&body).unwrap(), expi);
        assert!(matches!(
            Expi::decode_body(&[0, 3]),
            Err(TypeError::TooShort { .. })
        ));
    }

    #[test]
    fn fpri_fixed_size() {
        assert_eq!(
            Fpri::decode_body(&[1, 200]).unwrap(),
            Fpri {
                delta: 1,
                priority: 200
            }
        );
        assert!(Fpri::decode_body(&[1]).is_err());
        assert!(Fpri::decode_body(&[1, 2, 3]).is_err());
    }

    #[test]
    fn need_keywords() {
        let need = Need::decode_body(b"MNG-1.0\0draft 99").unwrap();
        assert_eq!(need.keywords, ["MNG-1.0", "draft 99"]);
        assert!(need.requires("draft 99"));
        let mut body = Vec::new();
        need.encode_body(&mut body);
        assert_eq!(body, b"MNG-1.0\0draft 99");
        assert!(Need::decode_body(b"a\0\0b").is_err());
    }
}
