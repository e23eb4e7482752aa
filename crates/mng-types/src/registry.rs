use std::sync::{Arc, LazyLock};

use mng_wire::ChunkTag;

use crate::back::Back;
use crate::chunk::Chunk;
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
use crate::term::Term;
use crate::text::{Itxt, Text, Ztxt};
use crate::time::Time;

/// Handlers for one chunk type.
///
/// Copying a record is `Clone` and releasing it is `Drop`, so the entry
/// only carries the three operations that depend on the type.
#[derive(Clone, Copy, Debug)]
pub struct RegistryEntry {
  pub tag: ChunkTag,
  pub name: &'static str,
  /// Build an empty record of the right shape.
  pub allocate: fn(ChunkTag) -> Chunk,
  /// Build a record from payload bytes.
  pub parse: fn(ChunkTag, &[u8]) -> Result<Chunk, TypeError>,
  /// Append the payload bytes of a record.
  pub serialize: fn(&Chunk, &mut Vec<u8>),
}

/// Immutable table of chunk handlers, sorted by tag.
///
/// Lookup never fails: a tag that is not in the table resolves to the
/// generic unknown entry, which keeps the raw payload and the real tag.
/// A registry is read-only once built and is shared between decoders
/// through an `Arc`.
#[derive(Clone, Debug)]
pub struct ChunkRegistry {
  entries: Vec<RegistryEntry>,
  unknown: RegistryEntry,
}

static STANDARD: LazyLock<Arc<ChunkRegistry>> =
  LazyLock::new(|| Arc::new(ChunkRegistry::new(standard_entries())));

impl ChunkRegistry {
  /// Build a registry from `entries`.
  ///
  /// When a tag appears more than once the last entry wins, so a caller
  /// can extend [`standard_entries`] with overrides.
  #[must_use]
  pub fn new(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
    let mut table: Vec<RegistryEntry> = Vec::new();
    for entry in entries {
      match table.binary_search_by_key(&entry.tag, |e| e.tag) {
        Ok(i) => table[i] = entry,
        Err(i) => table.insert(i, entry),
      }
    }
    Self {
      entries: table,
      unknown: UNKNOWN_ENTRY,
    }
  }

  /// The built-in table covering every PNG, JNG and MNG chunk type.
  /// Built once per process.
  #[must_use]
  pub fn standard() -> Arc<Self> {
    Arc::clone(&STANDARD)
  }

  /// Entry for `tag`, or the unknown entry.
  #[must_use]
  pub fn lookup(&self, tag: ChunkTag) -> &RegistryEntry {
    self.get(tag).unwrap_or(&self.unknown)
  }

  /// Entry for `tag` only if it is registered.
  #[must_use]
  pub fn get(&self, tag: ChunkTag) -> Option<&RegistryEntry> {
    self
      .entries
      .binary_search_by_key(&tag, |e| e.tag)
      .ok()
      .map(|i| &self.entries[i])
  }

  #[must_use]
  pub fn is_known(&self, tag: ChunkTag) -> bool {
    self.get(tag).is_some()
  }

  /// # Errors
  ///
  /// The [`TypeError`] of the matching chunk type.
  pub fn parse(&self, tag: ChunkTag, payload: &[u8]) -> Result<Chunk, TypeError> {
    (self.lookup(tag).parse)(tag, payload)
  }

  #[must_use]
  pub fn allocate(&self, tag: ChunkTag) -> Chunk {
    (self.lookup(tag).allocate)(tag)
  }

  pub fn serialize(&self, chunk: &Chunk, buf: &mut Vec<u8>) {
    (self.lookup(chunk.tag()).serialize)(chunk, buf);
  }

  pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
    self.entries.iter()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl Default for ChunkRegistry {
  fn default() -> Self {
    Self::new(standard_entries())
  }
}

// ── Entry tables ──────────────────────────────────────────────────────

const UNKNOWN_ENTRY: RegistryEntry = RegistryEntry {
  tag: ChunkTag::new([0; 4]),
  name: "unknown",
  allocate: |tag| Chunk::Unknown(RawChunk::new(tag, Vec::new())),
  parse: |tag, body| Ok(Chunk::Unknown(RawChunk::new(tag, body.to_vec()))),
  serialize: Chunk::encode_body,
};

/// Typed chunk whose body has a `decode_body(&[u8]) -> Result<_, TypeError>`.
macro_rules! typed {
  ($tag:ident, $name:literal, $variant:ident, $ty:ty) => {
    RegistryEntry {
      tag: ChunkTag::$tag,
      name: $name,
      allocate: |_| Chunk::$variant(<$ty>::default()),
      parse: |_, body| <$ty>::decode_body(body).map(Chunk::$variant),
      serialize: Chunk::encode_body,
    }
  };
}

/// Chunk carrying opaque pixel data.
macro_rules! image_data {
  ($tag:ident, $name:literal, $variant:ident) => {
    RegistryEntry {
      tag: ChunkTag::$tag,
      name: $name,
      allocate: |_| Chunk::$variant(ImageData::default()),
      parse: |_, body| Ok(Chunk::$variant(ImageData::decode_body(body))),
      serialize: Chunk::encode_body,
    }
  };
}

/// Chunk with an empty payload.
macro_rules! marker {
  ($tag:ident, $name:literal, $variant:ident) => {
    RegistryEntry {
      tag: ChunkTag::$tag,
      name: $name,
      allocate: |_| Chunk::$variant,
      parse: |tag, body| expect_empty(tag, body).map(|()| Chunk::$variant),
      serialize: Chunk::encode_body,
    }
  };
}

/// Registered chunk kept as raw bytes.
macro_rules! opaque {
  ($tag:ident, $name:literal) => {
    RegistryEntry {
      tag: ChunkTag::$tag,
      name: $name,
      allocate: |tag| Chunk::Opaque(RawChunk::new(tag, Vec::new())),
      parse: |tag, body| Ok(Chunk::Opaque(RawChunk::new(tag, body.to_vec()))),
      serialize: Chunk::encode_body,
    }
  };
}

fn expect_empty(tag: ChunkTag, body: &[u8]) -> Result<(), TypeError> {
  if body.is_empty() {
    Ok(())
  } else {
    Err(TypeError::InvalidLength {
      tag,
      length: body.len(),
      expected: "0",
    })
  }
}

/// Every chunk type the standard registry knows, in no particular order.
#[must_use]
pub fn standard_entries() -> Vec<RegistryEntry> {
  vec![
    // PNG
    typed!(IHDR, "image header", Ihdr, Ihdr),
    typed!(PLTE, "palette", Plte, Plte),
    image_data!(IDAT, "image data", Idat),
    marker!(IEND, "image end", Iend),
    typed!(tRNS, "transparency", Trns, Trns),
    typed!(gAMA, "gamma", Gama, Gama),
    typed!(cHRM, "chromaticities", Chrm, Chrm),
    typed!(sRGB, "standard RGB", Srgb, Srgb),
    typed!(iCCP, "ICC profile", Iccp, Iccp),
    typed!(tEXt, "text", Text, Text),
    typed!(zTXt, "compressed text", Ztxt, Ztxt),
    typed!(iTXt, "international text", Itxt, Itxt),
    typed!(bKGD, "background", Bkgd, Bkgd),
    RegistryEntry {
      tag: ChunkTag::pHYs,
      name: "physical dimensions",
      allocate: |_| Chunk::Phys(Phys::default()),
      parse: |tag, body| Phys::decode_body(tag, body).map(Chunk::Phys),
      serialize: Chunk::encode_body,
    },
    typed!(sBIT, "significant bits", Sbit, Sbit),
    opaque!(sPLT, "suggested palette"),
    typed!(hIST, "histogram", Hist, Hist),
    typed!(tIME, "modification time", Time, Time),
    // JNG
    typed!(JHDR, "JNG header", Jhdr, Jhdr),
    image_data!(JDAT, "JPEG data", Jdat),
    image_data!(JDAA, "JPEG alpha data", Jdaa),
    image_data!(JdAA, "JPEG alpha data (separate)", JdAA),
    marker!(JSEP, "JPEG separator", Jsep),
    // MNG
    typed!(MHDR, "MNG header", Mhdr, Mhdr),
    marker!(MEND, "MNG end", Mend),
    typed!(LOOP, "loop start", Loop, Loop),
    typed!(ENDL, "loop end", Endl, Endl),
    typed!(DEFI, "define object", Defi, Defi),
    opaque!(BASI, "basis object"),
    opaque!(CLON, "clone object"),
    opaque!(PAST, "paste image"),
    typed!(DISC, "discard objects", Disc, Disc),
    typed!(BACK, "background", Back, Back),
    opaque!(FRAM, "frame definition"),
    typed!(MOVE, "move objects", Move, Move),
    typed!(CLIP, "clip objects", Clip, Clip),
    typed!(SHOW, "show objects", Show, Show),
    typed!(TERM, "termination action", Term, Term),
    opaque!(SAVE, "save point"),
    typed!(SEEK, "seek point", Seek, Seek),
    typed!(eXPI, "export image", Expi, Expi),
    typed!(fPRI, "frame priority", Fpri, Fpri),
    typed!(nEED, "resources needed", Need, Need),
    RegistryEntry {
      tag: ChunkTag::pHYg,
      name: "global physical dimensions",
      allocate: |_| Chunk::Phyg(Phys::default()),
      parse: |tag, body| Phys::decode_body(tag, body).map(Chunk::Phyg),
      serialize: Chunk::encode_body,
    },
    opaque!(DHDR, "delta-PNG header"),
    opaque!(PROM, "promote image"),
    marker!(IPNG, "incomplete PNG", Ipng),
    opaque!(PPLT, "partial palette"),
    marker!(IJNG, "incomplete JNG", Ijng),
    opaque!(DROP, "drop chunks"),
    opaque!(DBYK, "drop by keyword"),
    opaque!(ORDR, "ordering restrictions"),
    opaque!(MAGN, "magnify object"),
    opaque!(evNT, "event list"),
    opaque!(mpNG, "multiple-image PNG"),
  ]
}
