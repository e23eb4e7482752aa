//! Push-mode input: data and whole chunks handed to the decoder ahead of
//! the host pull, and the release of caller-owned buffers.

use std::io;

use bytes::Bytes;
use mng_decoder::{DataSource, DecodeError, MngDecoder, Ownership, Pull, ReadStatus, SliceSource, Step};
use mng_tests::{MNG_TERM_HEX, PNG_1X1_HEX, from_hex, init_tracing};
use mng_types::{Chunk, Ihdr};
use mng_wire::{ChunkTag, Flavor};

/// A host that must never be pulled from.
struct Refusing;

impl DataSource for Refusing {
    fn read_data(&mut self, _buf: &mut [u8]) -> io::Result<Pull> {
        Err(io::Error::other("host pull not expected"))
    }
}

fn pieces(bytes: &[u8], sizes: &[usize]) -> Vec<Bytes> {
    let mut out = Vec::new();
    let mut rest = Bytes::copy_from_slice(bytes);
    for &n in sizes {
        out.push(rest.split_to(n.min(rest.len())));
    }
    out.push(rest);
    out
}

#[test]
fn fully_pushed_stream_never_pulls() {
    init_tracing();
    let bytes = from_hex(MNG_TERM_HEX);
    let mut decoder = MngDecoder::new(Refusing);
    decoder.push_data(bytes.clone(), Ownership::Engine);
    assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);
    assert_eq!(decoder.document(), &MngDecoder::decode(&bytes).unwrap());
}

#[test]
fn short_push_falls_through_to_the_host() {
    let bytes = from_hex(MNG_TERM_HEX);
    let mut decoder = MngDecoder::new(Refusing);
    decoder.push_data(bytes[..20].to_vec(), Ownership::Engine);
    assert!(matches!(decoder.read(), Err(DecodeError::Io(_))));
}

#[test]
fn caller_buffers_released_in_push_order() {
    let bytes = from_hex(MNG_TERM_HEX);
    let parts = pieces(&bytes, &[5, 30, 1, 40]);
    let mut decoder = MngDecoder::new(SliceSource::new(Bytes::new()));
    for part in &parts {
        decoder.push_data(part.clone(), Ownership::Caller);
    }
    assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);
    assert_eq!(decoder.source().released(), &parts[..]);
}

#[test]
fn engine_buffers_are_not_released() {
    let bytes = from_hex(PNG_1X1_HEX);
    let mut decoder = MngDecoder::new(SliceSource::new(Bytes::new()));
    decoder.push_data(bytes, Ownership::Engine);
    decoder.read().unwrap();
    assert!(decoder.source().released().is_empty());
}

#[test]
fn unconsumed_caller_buffers_released_on_drop() {
    let bytes = from_hex(PNG_1X1_HEX);
    let mut host = SliceSource::new(Bytes::new());
    {
        let mut decoder = MngDecoder::new(&mut host);
        decoder.push_data(bytes.clone(), Ownership::Caller);
        decoder.push_data(b"trailing".to_vec(), Ownership::Caller);
        assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);
        assert_eq!(decoder.source().released().len(), 1);
    }
    let released = host.released();
    assert_eq!(released.len(), 2);
    assert_eq!(released[0], bytes);
    assert_eq!(released[1], &b"trailing"[..]);
    assert_eq!(host.close_count(), 1);
}

#[test]
fn push_end_on_a_chunk_boundary_with_header_open() {
    let bytes = from_hex(PNG_1X1_HEX);
    // Signature, IHDR and IDAT, but no IEND.
    let cut = bytes.len() - 12;
    let mut decoder = MngDecoder::push_only();
    decoder.push_data(bytes[..cut].to_vec(), Ownership::Engine);
    assert_eq!(decoder.read().unwrap(), ReadStatus::NeedMoreData);
    decoder.push_end();
    assert!(matches!(
        decoder.resume(),
        Err(DecodeError::UnexpectedEof { step: Step::Length })
    ));
    assert_eq!(decoder.document().len(), 2);
}

#[test]
fn push_end_mid_chunk() {
    let bytes = from_hex(PNG_1X1_HEX);
    let mut decoder = MngDecoder::push_only();
    decoder.push_data(bytes[..30].to_vec(), Ownership::Engine);
    decoder.push_end();
    assert!(matches!(
        decoder.read(),
        Err(DecodeError::UnexpectedEof { step: Step::Body { length: 13, .. } })
    ));
}

#[test]
fn push_end_before_any_data_is_a_clean_end() {
    let mut decoder = MngDecoder::push_only();
    decoder.push_end();
    assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);
    assert!(decoder.document().is_empty());
    assert!(decoder.document().is_complete());
}

fn chunk_bytes(tag: ChunkTag, chunk: &Chunk) -> Bytes {
    let mut out = tag.as_bytes().to_vec();
    out.extend_from_slice(&chunk.to_body());
    out.into()
}

#[test]
fn pushed_chunks_build_a_document() {
    let ihdr = Chunk::Ihdr(Ihdr::rgba8(3, 3));
    let mut host = SliceSource::new(Bytes::new());
    let mut decoder = MngDecoder::new(&mut host);
    decoder.push_sig(Flavor::Png).unwrap();
    decoder.push_chunk(chunk_bytes(ChunkTag::IHDR, &ihdr), Ownership::Caller);
    decoder.push_chunk(&b"tEXtTitle\0pushed"[..], Ownership::Engine);
    decoder.push_chunk(&b"IEND"[..], Ownership::Caller);
    assert_eq!(decoder.read().unwrap(), ReadStatus::Finished);

    let doc = decoder.into_document();
    assert_eq!(doc.flavor(), Some(Flavor::Png));
    assert_eq!(doc.chunks().next(), Some(&ihdr));
    assert_eq!(doc.tags().last(), Some(ChunkTag::IEND));
    assert_eq!(host.released().len(), 2);
}

#[test]
fn pushed_chunks_precede_pulled_bytes() {
    // The host supplies everything after IHDR.
    let bytes = from_hex(PNG_1X1_HEX);
    let ihdr_end = 8 + 12 + 13;
    let mut decoder = MngDecoder::new(SliceSource::drip(bytes[ihdr_end..].to_vec(), 4));
    decoder.push_sig(Flavor::Png).unwrap();
    decoder.push_chunk(
        chunk_bytes(ChunkTag::IHDR, &Chunk::Ihdr(Ihdr::rgba8(1, 1))),
        Ownership::Engine,
    );
    let mut status = decoder.read().unwrap();
    while status == ReadStatus::NeedMoreData {
        status = decoder.resume().unwrap();
    }
    let tags: Vec<_> = decoder.document().tags().collect();
    assert_eq!(tags, [ChunkTag::IHDR, ChunkTag::IDAT, ChunkTag::IEND]);
}

#[test]
fn truncated_pushed_chunk_is_rejected() {
    let mut decoder = MngDecoder::push_only();
    decoder.push_sig(Flavor::Mng).unwrap();
    decoder.push_chunk(&b"MH"[..], Ownership::Engine);
    assert!(matches!(decoder.read(), Err(DecodeError::Wire(_))));
}

#[test]
fn push_sig_rules() {
    let bytes = from_hex(PNG_1X1_HEX);

    let mut mid = MngDecoder::push_only();
    mid.push_data(bytes[..3].to_vec(), Ownership::Engine);
    assert_eq!(mid.read().unwrap(), ReadStatus::NeedMoreData);
    assert!(matches!(mid.push_sig(Flavor::Png), Err(DecodeError::SignatureAlreadyRead)));

    let mut twice = MngDecoder::push_only();
    twice.push_sig(Flavor::Jng).unwrap();
    assert!(matches!(twice.push_sig(Flavor::Jng), Err(DecodeError::SignatureAlreadyRead)));

    // A declared signature means the data starts at the first length.
    let mut declared = MngDecoder::push_only();
    declared.push_sig(Flavor::Png).unwrap();
    declared.push_data(bytes[8..].to_vec(), Ownership::Engine);
    assert_eq!(declared.read().unwrap(), ReadStatus::Finished);
    assert_eq!(declared.document().len(), 3);
}
