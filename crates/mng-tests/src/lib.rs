//! Shared fixtures for the integration tests and benchmarks.
//!
//! Streams are either built through [`MngEncoder`] or given as hex so a
//! test reads like the bytes it feeds the decoder.

#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]

use std::fmt::Write as _;

use mng_decoder::{DataSource, MngDecoder, ReadStatus, SliceSource};
use mng_encoder::MngEncoder;
use mng_types::{
    Back, Bkgd, Chrm, Chunk, ChunkDocument, Clip, ClipBounds, Defi, Disc, Endl, Expi, Fpri, Gama,
    Hist, Iccp, Ihdr, ImageData, Itxt, Jhdr, Loop, Mhdr, MhdrProfile, Move, Need, Phys, Plte,
    RawChunk, Sbit, Seek, Show, Srgb, Term, Text, Time, Trns, Ztxt,
};
use mng_wire::frame::write_chunk;
use mng_wire::{ChunkTag, CrcOutput, Flavor};
use tracing_subscriber::EnvFilter;

/// 1×1 grayscale PNG: IHDR, one IDAT, IEND.
pub const PNG_1X1_HEX: &str = "
    89504e470d0a1a0a
    0000000d 49484452 00000001000000010800000000 3a7e9b55
    0000000a 49444154 789c6360000000020001 48afa471
    00000000 49454e44 ae426082";

/// MNG with a full MHDR, TERM repeat, one embedded PNG and MEND.
pub const MNG_TERM_HEX: &str = "
    8a4d4e470d0a1a0a
    0000001c 4d484452 00000001000000010000 03e8000000000000000000000000000000 01 2091ed78
    0000000a 5445524d 03000000006400 00000a e5720c12
    0000000d 49484452 00000001000000010800000000 3a7e9b55
    0000000a 49444154 789c6360000000020001 48afa471
    00000000 49454e44 ae426082
    00000000 4d454e44 2120f7d5";

/// Baseline JNG: JHDR, a four-byte JDAT, IEND.
pub const JNG_HEX: &str = "
    8b4a4e470d0a1a0a
    00000010 4a484452 00000001000000010a080800 000000 00 820ebc24
    00000004 4a444154 ffd8ffd9 5518159f
    00000000 49454e44 ae426082";

/// Decode a hex fixture. Whitespace is ignored.
#[must_use]
pub fn from_hex(text: &str) -> Vec<u8> {
    let compact: String = text.split_whitespace().collect();
    hex::decode(compact).expect("fixture is valid hex")
}

/// Install a `fmt` subscriber honouring `RUST_LOG`. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One framed chunk with a generated CRC.
#[must_use]
pub fn frame(tag: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + payload.len());
    write_chunk(&mut out, ChunkTag::new(tag), payload, CrcOutput::Generate)
        .expect("payload fits in a chunk");
    out
}

/// Signature followed by the given frames.
#[must_use]
pub fn stream(flavor: Flavor, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut out = flavor.signature().to_vec();
    for f in frames {
        out.extend_from_slice(f);
    }
    out
}

/// A still PNG whose image data is `idat_len` bytes split over `idats`
/// chunks.
#[must_use]
pub fn still_png(idats: usize, idat_len: usize) -> Vec<u8> {
    let mut enc = MngEncoder::new();
    enc.put_ihdr(Ihdr::rgba8(64, 64)).unwrap();
    enc.put_text("Software", "mng-tests").unwrap();
    for i in 0..idats {
        let byte = u8::try_from(i % 251).unwrap_or(0);
        enc.put_idat(vec![byte; idat_len]).unwrap();
    }
    enc.put_iend().unwrap();
    enc.encode().unwrap()
}

/// An MNG animation with `frames` embedded PNGs.
#[must_use]
pub fn animation(frames: usize) -> Vec<u8> {
    let mut enc = MngEncoder::new();
    enc.put_mhdr(Mhdr::new(32, 32, 25)).unwrap();
    enc.put_term(Term::repeat(4, 0x7FFF_FFFF)).unwrap();
    enc.put_back(Back::rgb(0, 0, 0)).unwrap();
    enc.put_loop(0, 3).unwrap();
    for _ in 0..frames {
        enc.put_ihdr(Ihdr::rgba8(32, 32)).unwrap();
        enc.put_idat(vec![0x5A; 128]).unwrap();
        enc.put_iend().unwrap();
    }
    enc.put_endl(0).unwrap();
    enc.put_mend().unwrap();
    enc.encode().unwrap()
}

/// One valid record of every modelled chunk type, plus an opaque and an
/// unknown chunk, ordered so the whole list forms a legal MNG.
#[must_use]
pub fn every_typed_chunk() -> Vec<Chunk> {
    let bounds = ClipBounds {
        left: -4,
        right: 40,
        top: -2,
        bottom: 20,
    };
    vec![
        Chunk::Mhdr(Mhdr {
            profile: Some(MhdrProfile {
                layer_count: 3,
                frame_count: 2,
                play_time: 100,
                simplicity: 1,
            }),
            ..Mhdr::new(64, 32, 1000)
        }),
        Chunk::Term(Term::repeat(10, 3)),
        Chunk::Need(Need {
            keywords: vec!["MNG-1.0".into(), "CACHEOFF".into()],
        }),
        Chunk::Back(Back {
            mandatory: Some(1),
            image_id: Some(7),
            tile: Some(0),
            ..Back::rgb(1, 2, 3)
        }),
        Chunk::Loop(Loop {
            termination: Some(1),
            min_iterations: Some(1),
            max_iterations: Some(9),
            signals: vec![42],
            ..Loop::new(0, 5)
        }),
        Chunk::Defi(Defi {
            do_not_show: Some(0),
            concrete: Some(1),
            location: Some((10, -10)),
            clip: Some(bounds),
            ..Defi::new(1)
        }),
        Chunk::Move(Move {
            first_id: 1,
            last_id: 1,
            kind: 1,
            x: -3,
            y: 3,
        }),
        Chunk::Clip(Clip {
            first_id: 1,
            last_id: 2,
            kind: 0,
            bounds,
        }),
        Chunk::Show(Show {
            first_id: Some(1),
            last_id: Some(2),
            mode: Some(3),
        }),
        Chunk::Disc(Disc {
            object_ids: vec![1, 2],
        }),
        Chunk::Seek(Seek {
            name: Some("start".into()),
        }),
        Chunk::Expi(Expi {
            snapshot_id: 4,
            name: "frame".into(),
        }),
        Chunk::Fpri(Fpri {
            delta: 1,
            priority: 128,
        }),
        Chunk::Phyg(Phys::per_metre(2835, 2835)),
        Chunk::Ipng,
        Chunk::Ihdr(Ihdr::rgba8(4, 4)),
        Chunk::Plte(Plte {
            entries: vec![[0, 0, 0], [255, 255, 255]],
        }),
        Chunk::Trns(Trns { data: vec![0, 255] }),
        Chunk::Gama(Gama { gamma: 45455 }),
        Chunk::Chrm(Chrm {
            white: [31270, 32900],
            red: [64000, 33000],
            green: [30000, 60000],
            blue: [15000, 6000],
        }),
        Chunk::Srgb(Srgb { intent: Some(0) }),
        Chunk::Iccp(Iccp {
            name: "ICC".into(),
            method: 0,
            profile: vec![0x78, 0x9C, 0x03, 0x00],
        }),
        Chunk::Text(Text::new("Title", "every chunk")),
        Chunk::Ztxt(Ztxt {
            keyword: "Comment".into(),
            method: 0,
            compressed: vec![0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01],
        }),
        Chunk::Itxt(Itxt {
            language: "en".into(),
            translated_keyword: b"Author".to_vec(),
            ..Itxt::new("Author", "Ünïcödé")
        }),
        Chunk::Bkgd(Bkgd::Rgb([10, 20, 30])),
        Chunk::Phys(Phys::per_metre(3780, 3780)),
        Chunk::Sbit(Sbit {
            bits: vec![8, 8, 8, 8],
        }),
        Chunk::Time(Time {
            year: 2024,
            month: 2,
            day: 29,
            hour: 23,
            minute: 59,
            second: 60,
        }),
        Chunk::Hist(Hist {
            frequencies: vec![3, 1],
        }),
        Chunk::Idat(ImageData::new(vec![0x78, 0x9C, 0x63, 0x60])),
        Chunk::Iend,
        Chunk::Ijng,
        Chunk::Jhdr(Jhdr::color8(4, 4)),
        Chunk::Jdat(ImageData::new(vec![0xFF, 0xD8])),
        Chunk::Jsep,
        Chunk::Jdat(ImageData::new(vec![0xFF, 0xD9])),
        Chunk::Jdaa(ImageData::new(vec![1, 2, 3])),
        Chunk::JdAA(ImageData::new(vec![4, 5, 6])),
        Chunk::Iend,
        Chunk::Endl(Endl { level: 0 }),
        Chunk::Opaque(RawChunk::new(ChunkTag::new(*b"FRAM"), vec![1, 0])),
        Chunk::Unknown(RawChunk::new(ChunkTag::new(*b"zzZz"), vec![0xDE, 0xAD])),
        Chunk::Mend,
    ]
}

/// Drive a decoder to the end, resuming after every suspension.
///
/// # Returns
///
/// The number of times the decoder suspended.
pub fn drive<S: DataSource>(decoder: &mut MngDecoder<S>) -> usize {
    let mut suspensions = 0;
    let mut status = decoder.read().expect("decode failed");
    while status == ReadStatus::NeedMoreData {
        suspensions += 1;
        status = decoder.resume().expect("decode failed");
    }
    suspensions
}

/// Decode `bytes` handing the decoder `step` bytes per pull.
#[must_use]
pub fn decode_dripping(bytes: &[u8], step: usize) -> ChunkDocument {
    let mut decoder = MngDecoder::new(SliceSource::drip(bytes.to_vec(), step));
    drive(&mut decoder);
    decoder.into_document()
}

/// One line per record: sequence number, tag and payload length.
#[must_use]
pub fn dump(doc: &ChunkDocument) -> String {
    let mut out = format!("flavor: {:?}\n", doc.flavor());
    doc.iterate_chunks(0, |_, chunk, sequence| {
        let _ = writeln!(out, "{sequence} {} {}", chunk.tag(), chunk.to_body().len());
        true
    });
    out
}
