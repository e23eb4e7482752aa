//! Conformance tests: hand-checked hex fixtures decoded and rendered to
//! inline insta snapshots.
//!
//! Each fixture is a complete stream whose CRCs were computed
//! independently of this workspace. The `dump` snapshot pins what the
//! decoder produces; the `frames` snapshot pins what the encoder writes
//! back, CRCs included. A diff in either signals a deliberate format
//! change (accept via `cargo insta review`) or a regression.

use std::fmt::Write as _;

use insta::{assert_debug_snapshot, assert_snapshot};
use mng_decoder::MngDecoder;
use mng_encoder::{ChunkWriter, MngEncoder};
use mng_tests::{JNG_HEX, MNG_TERM_HEX, PNG_1X1_HEX, dump, from_hex, init_tracing};
use mng_types::{Chunk, ChunkDocument, Term};
use mng_wire::frame::RawFrameIter;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn decode_fixture(hex: &str) -> ChunkDocument {
    init_tracing();
    MngDecoder::decode(&from_hex(hex)).unwrap_or_else(|e| panic!("fixture failed to decode: {e}"))
}

/// Re-encode and list every frame as `tag length crc`.
fn frames(doc: &ChunkDocument) -> String {
    let mut out = Vec::new();
    ChunkWriter::new().write_document(doc, &mut out).unwrap();
    let mut text = String::new();
    for frame in RawFrameIter::new(&out, true) {
        let crc = frame.crc.unwrap_or_default();
        let _ = writeln!(text, "{} {} {crc:08x}", frame.tag, frame.payload.len());
    }
    text
}

// ── PNG ─────────────────────────────────────────────────────────────────────

#[test]
fn png_dump() {
    let doc = decode_fixture(PNG_1X1_HEX);
    assert_snapshot!(dump(&doc), @r"
    flavor: Some(Png)
    0 IHDR 13
    1 IDAT 10
    2 IEND 0
    ");
}

#[test]
fn png_frames() {
    let doc = decode_fixture(PNG_1X1_HEX);
    assert_snapshot!(frames(&doc), @r"
    IHDR 13 3a7e9b55
    IDAT 10 48afa471
    IEND 0 ae426082
    ");
}

// ── MNG ─────────────────────────────────────────────────────────────────────

#[test]
fn mng_dump() {
    let doc = decode_fixture(MNG_TERM_HEX);
    assert_snapshot!(dump(&doc), @r"
    flavor: Some(Mng)
    0 MHDR 28
    1 TERM 10
    2 IHDR 13
    3 IDAT 10
    4 IEND 0
    5 MEND 0
    ");
}

#[test]
fn mng_frames() {
    let doc = decode_fixture(MNG_TERM_HEX);
    assert_snapshot!(frames(&doc), @r"
    MHDR 28 2091ed78
    TERM 10 e5720c12
    IHDR 13 3a7e9b55
    IDAT 10 48afa471
    IEND 0 ae426082
    MEND 0 2120f7d5
    ");
}

#[test]
fn mng_term_fields() {
    let doc = decode_fixture(MNG_TERM_HEX);
    let Some(Chunk::Term(term)) = doc.chunks().nth(1) else {
        panic!("second record is not TERM");
    };
    assert_eq!(*term, Term::repeat(100, 10));
    assert_debug_snapshot!(term, @r"
    Term {
        action: 3,
        repeat: Some(
            TermRepeat {
                iteration_action: 0,
                delay: 100,
                max_iterations: 10,
            },
        ),
    }
    ");
}

// ── JNG ─────────────────────────────────────────────────────────────────────

#[test]
fn jng_dump() {
    let doc = decode_fixture(JNG_HEX);
    assert_snapshot!(dump(&doc), @r"
    flavor: Some(Jng)
    0 JHDR 16
    1 JDAT 4
    2 IEND 0
    ");
}

#[test]
fn jng_frames() {
    let doc = decode_fixture(JNG_HEX);
    assert_snapshot!(frames(&doc), @r"
    JHDR 16 820ebc24
    JDAT 4 5518159f
    IEND 0 ae426082
    ");
}

// ── Encoder output ──────────────────────────────────────────────────────────

#[test]
fn encoder_reproduces_fixture_bytes() {
    for hex in [PNG_1X1_HEX, MNG_TERM_HEX, JNG_HEX] {
        let bytes = from_hex(hex);
        let doc = MngDecoder::decode(&bytes).unwrap();
        let mut enc = MngEncoder::new();
        for (id, _) in &doc {
            enc.copy_chunk(&doc, id).unwrap();
        }
        assert!(enc.is_finished());
        assert_eq!(enc.encode().unwrap(), bytes);
    }
}
