//! Suspend/resume equivalence: however the input is split, the decoder
//! must produce the same document as a one-shot decode.

use std::io::{self, Read};

use bytes::Bytes;
use mng_decoder::{
    AsyncChunkReader, Checkpoint, MngDecoder, Ownership, ReadSource, ReadStatus, SliceSource, Step,
};
use mng_tests::{
    MNG_TERM_HEX, animation, decode_dripping, drive, every_typed_chunk, from_hex, init_tracing,
    still_png,
};
use mng_encoder::MngEncoder;

fn every_chunk_stream() -> Vec<u8> {
    let mut enc = MngEncoder::new();
    for chunk in every_typed_chunk() {
        enc.put_chunk(chunk).unwrap();
    }
    enc.encode().unwrap()
}

#[test]
fn one_byte_per_pull_matches_one_shot() {
    init_tracing();
    let bytes = every_chunk_stream();
    let expected = MngDecoder::decode(&bytes).unwrap();
    assert_eq!(decode_dripping(&bytes, 1), expected);
}

#[test]
fn every_step_size_matches_one_shot() {
    let bytes = from_hex(MNG_TERM_HEX);
    let expected = MngDecoder::decode(&bytes).unwrap();
    for step in 1..=bytes.len() {
        assert_eq!(decode_dripping(&bytes, step), expected, "step {step}");
    }
}

#[test]
fn every_two_way_push_split_matches() {
    let bytes = from_hex(MNG_TERM_HEX);
    let expected = MngDecoder::decode(&bytes).unwrap();
    for at in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(at);
        let mut decoder = MngDecoder::push_only();
        decoder.push_data(head.to_vec(), Ownership::Engine);
        let mut status = decoder.read().unwrap();
        if status == ReadStatus::NeedMoreData {
            decoder.push_data(tail.to_vec(), Ownership::Engine);
            status = decoder.resume().unwrap();
        }
        assert_eq!(status, ReadStatus::Finished, "split at {at}");
        assert_eq!(decoder.document(), &expected, "split at {at}");
    }
}

#[test]
fn sequence_numbers_follow_stream_order() {
    let bytes = animation(5);
    let doc = decode_dripping(&bytes, 7);
    let mut sequences = Vec::new();
    doc.iterate_chunks(0, |id, _, sequence| {
        assert_eq!(doc.sequence_of(id), Some(sequence));
        sequences.push(sequence);
        true
    });
    let expected: Vec<u64> = (0..doc.len() as u64).collect();
    assert_eq!(sequences, expected);
}

#[test]
fn checkpoint_tracks_partial_body() {
    let bytes = from_hex(MNG_TERM_HEX);
    // Signature, MHDR length and 10 of the 36 framed MHDR bytes.
    let mut decoder = MngDecoder::push_only();
    decoder.push_data(bytes[..8 + 4 + 10].to_vec(), Ownership::Engine);
    assert_eq!(decoder.read().unwrap(), ReadStatus::NeedMoreData);
    let Checkpoint { step, filled } = decoder.checkpoint();
    assert!(matches!(step, Step::Body { length: 28, .. }));
    assert_eq!(filled, 10);
    assert!(decoder.document().is_empty());

    decoder.push_data(bytes[8 + 4 + 10..].to_vec(), Ownership::Engine);
    assert_eq!(decoder.resume().unwrap(), ReadStatus::Finished);
    assert_eq!(decoder.document().len(), 6);
}

#[test]
fn overflow_bodies_resume_correctly() {
    let bytes = still_png(2, 10_000);
    let expected = MngDecoder::decode(&bytes).unwrap();
    for step in [1_usize, 333, 4199, 4200, 4201, 9999] {
        assert_eq!(decode_dripping(&bytes, step), expected, "step {step}");
    }
}

#[test]
fn mixed_push_and_pull() {
    let bytes = animation(3);
    let (head, tail) = bytes.split_at(bytes.len() / 2);
    let mut decoder = MngDecoder::new(SliceSource::drip(Bytes::copy_from_slice(tail), 64));
    decoder.push_data(head.to_vec(), Ownership::Engine);
    drive(&mut decoder);
    assert_eq!(decoder.document(), &MngDecoder::decode(&bytes).unwrap());
}

/// Reader that alternates `WouldBlock` with short reads.
struct Flaky {
    data: Vec<u8>,
    pos: usize,
    block_next: bool,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.block_next = !self.block_next;
        if !self.block_next {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = buf.len().min(3).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[test]
fn non_blocking_reader() {
    let bytes = every_chunk_stream();
    let mut decoder = MngDecoder::new(ReadSource::new(Flaky {
        data: bytes.clone(),
        pos: 0,
        block_next: false,
    }));
    let suspensions = drive(&mut decoder);
    assert!(suspensions >= bytes.len() / 4);
    assert!(decoder.source().is_closed());
    assert_eq!(decoder.document(), &MngDecoder::decode(&bytes).unwrap());
}

#[tokio::test]
async fn async_reader_over_duplex() {
    use tokio::io::AsyncWriteExt;

    let bytes = every_chunk_stream();
    let expected = MngDecoder::decode(&bytes).unwrap();
    let (mut tx, rx) = tokio::io::duplex(16);
    let writer = tokio::spawn(async move {
        for piece in bytes.chunks(11) {
            tx.write_all(piece).await.unwrap();
        }
    });
    let doc = AsyncChunkReader::new(rx).read_document().await.unwrap();
    writer.await.unwrap();
    assert_eq!(doc, expected);
}
