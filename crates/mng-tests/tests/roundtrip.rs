//! Round-trip tests: documents built in memory, written by the encoder and
//! read back by the decoder must come back record for record.

use mng_decoder::{DecoderConfig, MngDecoder};
use mng_encoder::{MngEncoder, WriterConfig};
use mng_tests::{animation, every_typed_chunk, init_tracing, still_png};
use mng_types::{Chunk, ChunkDocument, ChunkRegistry, RawChunk};
use mng_wire::{ChunkTag, CrcInput, CrcOutput, CrcPolicy, Flavor};

fn encode_all(chunks: Vec<Chunk>, config: WriterConfig) -> Vec<u8> {
    let mut enc = MngEncoder::with_config(config);
    for chunk in chunks {
        enc.put_chunk(chunk).unwrap();
    }
    assert!(enc.is_finished());
    enc.encode().unwrap()
}

// ── Every type ────────────────────────────────────────────────────────────────

#[test]
fn every_typed_chunk_survives() {
    init_tracing();
    let chunks = every_typed_chunk();
    let bytes = encode_all(chunks.clone(), WriterConfig::default());

    let doc = MngDecoder::decode(&bytes).unwrap();
    assert_eq!(doc.flavor(), Some(Flavor::Mng));
    assert_eq!(doc.chunks().cloned().collect::<Vec<_>>(), chunks);
}

#[test]
fn every_registered_tag_is_covered() {
    let registry = ChunkRegistry::standard();
    let chunks = every_typed_chunk();
    let modelled: Vec<ChunkTag> = chunks
        .iter()
        .filter(|c| !matches!(c, Chunk::Opaque(_) | Chunk::Unknown(_)))
        .map(Chunk::tag)
        .collect();
    for tag in modelled {
        assert!(registry.is_known(tag), "{tag} missing from the registry");
    }
}

#[test]
fn reencoding_is_byte_identical() {
    let bytes = encode_all(every_typed_chunk(), WriterConfig::default());
    let doc = MngDecoder::decode(&bytes).unwrap();

    let mut enc = MngEncoder::new();
    for (id, _) in &doc {
        enc.copy_chunk(&doc, id).unwrap();
    }
    assert_eq!(enc.encode().unwrap(), bytes);
}

// ── Unknown and opaque passthrough ────────────────────────────────────────────

#[test]
fn unknown_and_opaque_payloads_are_exact() {
    let payload: Vec<u8> = (0..=255).collect();
    let mut enc = MngEncoder::new();
    enc.put_ihdr(mng_types::Ihdr::rgba8(1, 1))
        .unwrap()
        .put_unknown(ChunkTag::new(*b"quUX"), payload.clone())
        .unwrap()
        .put_chunk(Chunk::Opaque(RawChunk::new(ChunkTag::new(*b"sPLT"), payload.clone())))
        .unwrap()
        .put_iend()
        .unwrap();
    let doc = MngDecoder::decode(&enc.encode().unwrap()).unwrap();

    let raws: Vec<&RawChunk> = doc.chunks().filter_map(Chunk::as_raw).collect();
    assert_eq!(raws.len(), 2);
    assert_eq!(raws[0].tag(), ChunkTag::new(*b"quUX"));
    assert_eq!(raws[0].data(), payload.as_slice());
    assert_eq!(raws[1].tag(), ChunkTag::new(*b"sPLT"));
    assert_eq!(raws[1].data(), payload.as_slice());
    assert!(doc.chunks().nth(1).unwrap().is_unknown());
    assert!(!doc.chunks().nth(2).unwrap().is_unknown());
}

// ── CRC modes ─────────────────────────────────────────────────────────────────

#[test]
fn crc_free_streams_roundtrip() {
    let chunks = every_typed_chunk();
    let bytes = encode_all(
        chunks.clone(),
        WriterConfig::default().with_crc_output(CrcOutput::None),
    );
    let config = DecoderConfig::default().with_crc(CrcPolicy {
        input: CrcInput::None,
        ..CrcPolicy::default()
    });
    let doc = MngDecoder::decode_with_config(&bytes, config).unwrap();
    assert_eq!(doc.chunks().cloned().collect::<Vec<_>>(), chunks);
}

#[test]
fn dummy_crcs_need_a_lenient_reader() {
    let bytes = encode_all(
        every_typed_chunk(),
        WriterConfig::default().with_crc_output(CrcOutput::Dummy),
    );
    let config = DecoderConfig::default().with_crc(CrcPolicy::lenient());
    let doc = MngDecoder::decode_with_config(&bytes, config).unwrap();
    assert_eq!(doc.len(), every_typed_chunk().len());

    // Under the default policy every ancillary chunk is dropped.
    let mut decoder = MngDecoder::new(mng_decoder::SliceSource::new(bytes));
    mng_tests::drive(&mut decoder);
    assert!(decoder.document().chunks().all(|c| c.tag().is_critical()));
    assert!(!decoder.warnings().is_empty());
}

// ── Larger streams ────────────────────────────────────────────────────────────

#[test]
fn animation_roundtrip() {
    let bytes = animation(12);
    let doc = MngDecoder::decode(&bytes).unwrap();
    assert_eq!(doc.len(), 4 + 12 * 3 + 2);

    let mut copy = ChunkDocument::new();
    copy.extend(doc.chunks().cloned());
    let mut out = Vec::new();
    mng_encoder::ChunkWriter::new()
        .write_document(&copy, &mut out)
        .unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn large_idats_roundtrip() {
    let bytes = still_png(3, 64 * 1024);
    let doc = MngDecoder::decode(&bytes).unwrap();
    assert_eq!(doc.len(), 6);
    let idat_sizes: Vec<usize> = doc
        .chunks()
        .filter(|c| c.tag() == ChunkTag::IDAT)
        .map(|c| c.to_body().len())
        .collect();
    assert_eq!(idat_sizes, [65536; 3]);
}
