use mng_wire::ChunkTag;

use crate::back::Back;
use crate::color::{Bkgd, Chrm, Gama, Iccp, Sbit, Srgb};
use crate::error::TypeError;
use crate::ihdr::Ihdr;
use crate::image_data::ImageData;
use crate::jhdr::Jhdr;
use crate::loop_control::{Endl, Loop};
use crate::meta::{Expi, Fpri, Need, Seek};
use crate::mhdr::Mhdr;
use crate::object::{Clip, Defi, Disc, Move, Show};
use crate::palette::{Hist, Plte, Trns};
use crate::phys::Phys;
use crate::raw::RawChunk;
use crate::registry::ChunkRegistry;
use crate::term::Term;
use crate::text::{Itxt, Text, Ztxt};
use crate::time::Time;

/// One chunk record: the tag plus its typed payload.
///
/// The tag is implied by the variant, so it cannot drift from the
/// payload after construction. Two variants carry the tag explicitly:
///
/// ```text
/// ┌──────────┬──────────────────────────────────────────────────────┐
/// │ Opaque   │ a registered tag whose fields are not modelled       │
/// │          │ (BASI CLON DBYK DHDR DROP FRAM MAGN ORDR PAST PPLT   │
/// │          │  PROM SAVE evNT mpNG sPLT)                           │
/// │ Unknown  │ any tag the registry does not know                   │
/// └──────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// Both keep the payload byte-for-byte so the chunk survives a
/// decode/encode round trip untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
  // ── PNG ──
  Ihdr(Ihdr),
  Plte(Plte),
  Idat(ImageData),
  Iend,
  Trns(Trns),
  Gama(Gama),
  Chrm(Chrm),
  Srgb(Srgb),
  Iccp(Iccp),
  Text(Text),
  Ztxt(Ztxt),
  Itxt(Itxt),
  Bkgd(Bkgd),
  Phys(Phys),
  Sbit(Sbit),
  Time(Time),
  Hist(Hist),

  // ── JNG ──
  Jhdr(Jhdr),
  Jdat(ImageData),
  Jdaa(ImageData),
  JdAA(ImageData),
  Jsep,

  // ── MNG ──
  Mhdr(Mhdr),
  Mend,
  Term(Term),
  Loop(Loop),
  Endl(Endl),
  Defi(Defi),
  Back(Back),
  Move(Move),
  Clip(Clip),
  Show(Show),
  Disc(Disc),
  Seek(Seek),
  Expi(Expi),
  Fpri(Fpri),
  Need(Need),
  Phyg(Phys),
  Ijng,
  Ipng,

  Opaque(RawChunk),
  Unknown(RawChunk),
}

impl Chunk {
  #[must_use]
  pub fn tag(&self) -> ChunkTag {
    match self {
      Self::Ihdr(_) => ChunkTag::IHDR,
      Self::Plte(_) => ChunkTag::PLTE,
      Self::Idat(_) => ChunkTag::IDAT,
      Self::Iend => ChunkTag::IEND,
      Self::Trns(_) => ChunkTag::tRNS,
      Self::Gama(_) => ChunkTag::gAMA,
      Self::Chrm(_) => ChunkTag::cHRM,
      Self::Srgb(_) => ChunkTag::sRGB,
      Self::Iccp(_) => ChunkTag::iCCP,
      Self::Text(_) => ChunkTag::tEXt,
      Self::Ztxt(_) => ChunkTag::zTXt,
      Self::Itxt(_) => ChunkTag::iTXt,
      Self::Bkgd(_) => ChunkTag::bKGD,
      Self::Phys(_) => ChunkTag::pHYs,
      Self::Sbit(_) => ChunkTag::sBIT,
      Self::Time(_) => ChunkTag::tIME,
      Self::Hist(_) => ChunkTag::hIST,
      Self::Jhdr(_) => ChunkTag::JHDR,
      Self::Jdat(_) => ChunkTag::JDAT,
      Self::Jdaa(_) => ChunkTag::JDAA,
      Self::JdAA(_) => ChunkTag::JdAA,
      Self::Jsep => ChunkTag::JSEP,
      Self::Mhdr(_) => ChunkTag::MHDR,
      Self::Mend => ChunkTag::MEND,
      Self::Term(_) => ChunkTag::TERM,
      Self::Loop(_) => ChunkTag::LOOP,
      Self::Endl(_) => ChunkTag::ENDL,
      Self::Defi(_) => ChunkTag::DEFI,
      Self::Back(_) => ChunkTag::BACK,
      Self::Move(_) => ChunkTag::MOVE,
      Self::Clip(_) => ChunkTag::CLIP,
      Self::Show(_) => ChunkTag::SHOW,
      Self::Disc(_) => ChunkTag::DISC,
      Self::Seek(_) => ChunkTag::SEEK,
      Self::Expi(_) => ChunkTag::eXPI,
      Self::Fpri(_) => ChunkTag::fPRI,
      Self::Need(_) => ChunkTag::nEED,
      Self::Phyg(_) => ChunkTag::pHYg,
      Self::Ijng => ChunkTag::IJNG,
      Self::Ipng => ChunkTag::IPNG,
      Self::Opaque(raw) | Self::Unknown(raw) => raw.tag(),
    }
  }

  /// Append the payload bytes (no length, tag or CRC) to `buf`.
  ///
  /// Deterministic: decoding the output with [`Chunk::decode`] yields a
  /// record equal to `self`.
  pub fn encode_body(&self, buf: &mut Vec<u8>) {
    match self {
      Self::Ihdr(c) => c.encode_body(buf),
      Self::Plte(c) => c.encode_body(buf),
      Self::Idat(c) | Self::Jdat(c) | Self::Jdaa(c) | Self::JdAA(c) => c.encode_body(buf),
      Self::Trns(c) => c.encode_body(buf),
      Self::Gama(c) => c.encode_body(buf),
      Self::Chrm(c) => c.encode_body(buf),
      Self::Srgb(c) => c.encode_body(buf),
      Self::Iccp(c) => c.encode_body(buf),
      Self::Text(c) => c.encode_body(buf),
      Self::Ztxt(c) => c.encode_body(buf),
      Self::Itxt(c) => c.encode_body(buf),
      Self::Bkgd(c) => c.encode_body(buf),
      Self::Phys(c) | Self::Phyg(c) => c.encode_body(buf),
      Self::Sbit(c) => c.encode_body(buf),
      Self::Time(c) => c.encode_body(buf),
      Self::Hist(c) => c.encode_body(buf),
      Self::Jhdr(c) => c.encode_body(buf),
      Self::Mhdr(c) => c.encode_body(buf),
      Self::Term(c) => c.encode_body(buf),
      Self::Loop(c) => c.encode_body(buf),
      Self::Endl(c) => c.encode_body(buf),
      Self::Defi(c) => c.encode_body(buf),
      Self::Back(c) => c.encode_body(buf),
      Self::Move(c) => c.encode_body(buf),
      Self::Clip(c) => c.encode_body(buf),
      Self::Show(c) => c.encode_body(buf),
      Self::Disc(c) => c.encode_body(buf),
      Self::Seek(c) => c.encode_body(buf),
      Self::Expi(c) => c.encode_body(buf),
      Self::Fpri(c) => c.encode_body(buf),
      Self::Need(c) => c.encode_body(buf),
      Self::Iend | Self::Jsep | Self::Mend | Self::Ijng | Self::Ipng => {}
      Self::Opaque(raw) | Self::Unknown(raw) => buf.extend_from_slice(raw.data()),
    }
  }

  /// Payload bytes as a fresh vector.
  #[must_use]
  pub fn to_body(&self) -> Vec<u8> {
    let mut buf = Vec::new();
    self.encode_body(&mut buf);
    buf
  }

  /// Parse a payload through the standard registry.
  ///
  /// # Errors
  ///
  /// The [`TypeError`] of the matching chunk type. Unknown tags never
  /// fail.
  pub fn decode(tag: ChunkTag, payload: &[u8]) -> Result<Self, TypeError> {
    ChunkRegistry::standard().parse(tag, payload)
  }

  /// Check the record reads back unchanged once written.
  ///
  /// String fields are checked directly. Fixed-layout records are
  /// encoded and parsed again, so every range the parser enforces
  /// applies. Image data, opaque and unknown payloads always pass.
  ///
  /// # Errors
  ///
  /// The [`TypeError`] the parser would raise, or
  /// [`TypeError::Unencodable`] for a string the payload cannot carry.
  pub fn validate(&self) -> Result<(), TypeError> {
    match self {
      Self::Text(c) => c.validate(),
      Self::Ztxt(c) => c.validate(),
      Self::Itxt(c) => c.validate(),
      Self::Iccp(c) => c.validate(),
      Self::Seek(c) => c.validate(),
      Self::Expi(c) => c.validate(),
      Self::Need(c) => c.validate(),
      Self::Idat(_)
      | Self::Jdat(_)
      | Self::Jdaa(_)
      | Self::JdAA(_)
      | Self::Opaque(_)
      | Self::Unknown(_) => Ok(()),
      _ => ChunkRegistry::standard()
        .parse(self.tag(), &self.to_body())
        .map(drop),
    }
  }

  /// IHDR, JHDR or MHDR.
  #[must_use]
  pub fn is_header(&self) -> bool {
    matches!(self, Self::Ihdr(_) | Self::Jhdr(_) | Self::Mhdr(_))
  }

  #[must_use]
  pub fn is_unknown(&self) -> bool {
    matches!(self, Self::Unknown(_))
  }

  /// The raw record, for `Opaque` and `Unknown` chunks.
  #[must_use]
  pub fn as_raw(&self) -> Option<&RawChunk> {
    match self {
      Self::Opaque(raw) | Self::Unknown(raw) => Some(raw),
      _ => None,
    }
  }
}

macro_rules! impl_from_body {
  ($($ty:ty => $variant:ident),* $(,)?) => {
    $(
      impl From<$ty> for Chunk {
        fn from(body: $ty) -> Self {
          Self::$variant(body)
        }
      }
    )*
  };
}

impl_from_body! {
  Ihdr => Ihdr,
  Plte => Plte,
  Trns => Trns,
  Gama => Gama,
  Chrm => Chrm,
  Srgb => Srgb,
  Iccp => Iccp,
  Text => Text,
  Ztxt => Ztxt,
  Itxt => Itxt,
  Bkgd => Bkgd,
  Sbit => Sbit,
  Time => Time,
  Hist => Hist,
  Jhdr => Jhdr,
  Mhdr => Mhdr,
  Term => Term,
  Loop => Loop,
  Endl => Endl,
  Defi => Defi,
  Back => Back,
  Move => Move,
  Clip => Clip,
  Show => Show,
  Disc => Disc,
  Seek => Seek,
  Expi => Expi,
  Fpri => Fpri,
  Need => Need,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tag_follows_variant() {
    assert_eq!(Chunk::Iend.tag(), ChunkTag::IEND);
    assert_eq!(Chunk::Phyg(Phys::default()).tag(), ChunkTag::pHYg);
    assert_eq!(Chunk::JdAA(ImageData::default()).tag(), ChunkTag::JdAA);
    let raw = RawChunk::new(ChunkTag::new(*b"prVt"), vec![1, 2, 3]);
    assert_eq!(Chunk::Unknown(raw).tag().as_bytes(), b"prVt");
  }

  #[test]
  fn decode_dispatches_on_tag() {
    let chunk = Chunk::decode(ChunkTag::gAMA, &[0, 0, 0xB1, 0x8F]).unwrap();
    assert_eq!(chunk, Chunk::Gama(Gama { gamma: 45_455 }));

    let chunk = Chunk::decode(ChunkTag::IDAT, &[1, 2, 3]).unwrap();
    assert_eq!(chunk, Chunk::Idat(ImageData::new(vec![1, 2, 3])));
  }

  #[test]
  fn decode_unknown_keeps_bytes() {
    let tag = ChunkTag::new(*b"zzZz");
    let chunk = Chunk::decode(tag, &[9, 8, 7, 6, 5]).unwrap();
    assert!(chunk.is_unknown());
    assert_eq!(chunk.tag(), tag);
    assert_eq!(chunk.to_body(), [9, 8, 7, 6, 5]);
  }

  #[test]
  fn decode_opaque_known_tag() {
    let chunk = Chunk::decode(ChunkTag::FRAM, &[1, 0]).unwrap();
    assert!(matches!(&chunk, Chunk::Opaque(raw) if raw.data() == [1, 0]));
    assert!(!chunk.is_unknown());
  }

  #[test]
  fn marker_rejects_payload() {
    assert!(matches!(
      Chunk::decode(ChunkTag::IEND, &[0]),
      Err(TypeError::InvalidLength { length: 1, .. })
    ));
  }

  #[test]
  fn validate_catches_what_the_parser_rejects() {
    assert!(Chunk::from(Text::new("Title", "plain")).validate().is_ok());
    assert!(matches!(
      Chunk::from(Text::new("", "x")).validate(),
      Err(TypeError::InvalidKeyword { length: 0, .. })
    ));
    assert!(matches!(
      Chunk::from(Ztxt {
        keyword: "k".repeat(80),
        ..Ztxt::default()
      })
      .validate(),
      Err(TypeError::InvalidKeyword { length: 80, .. })
    ));
    assert!(matches!(
      Chunk::from(Text::new("Title", "\u{4e2d}")).validate(),
      Err(TypeError::Unencodable { field: "text", .. })
    ));
    assert!(matches!(
      Chunk::from(Seek {
        name: Some(String::new())
      })
      .validate(),
      Err(TypeError::InvalidKeyword { .. })
    ));

    let mut ihdr = Ihdr::rgba8(1, 1);
    ihdr.width = 0;
    assert!(matches!(
      Chunk::from(ihdr).validate(),
      Err(TypeError::InvalidValue { field: "width", .. })
    ));
    assert!(Chunk::Unknown(RawChunk::new(ChunkTag::new(*b"zzZz"), vec![])).validate().is_ok());
  }

  #[test]
  fn header_detection() {
    assert!(Chunk::from(Ihdr::rgba8(1, 1)).is_header());
    assert!(Chunk::from(Mhdr::new(1, 1, 1)).is_header());
    assert!(!Chunk::Iend.is_header());
  }
}
