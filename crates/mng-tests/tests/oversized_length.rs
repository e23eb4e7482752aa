//! Declared lengths far beyond the data must be refused before any
//! buffer of that size exists. A counting allocator records the largest
//! single allocation made while decoding.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use mng_decoder::{DecodeError, DecoderConfig, MngDecoder, Ownership, ReadStatus, Step};
use mng_wire::Flavor;

struct Tracking;

static LARGEST: AtomicUsize = AtomicUsize::new(0);

// Serializes tests so one test's allocations do not leak into another's
// measurement.
static SERIAL: Mutex<()> = Mutex::new(());

unsafe impl GlobalAlloc for Tracking {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        LARGEST.fetch_max(layout.size(), Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        LARGEST.fetch_max(new_size, Ordering::Relaxed);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOCATOR: Tracking = Tracking;

const LIMIT: usize = 1024 * 1024;

fn header(length: u32) -> Vec<u8> {
    let mut out = Flavor::Png.signature().to_vec();
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"IDAT");
    out.extend_from_slice(&[0; 16]);
    out
}

fn decode_measured(bytes: Vec<u8>, config: DecoderConfig) -> Result<ReadStatus, DecodeError> {
    let mut decoder = MngDecoder::push_only_with_config(config);
    decoder.push_data(bytes, Ownership::Engine);
    decoder.push_end();
    LARGEST.store(0, Ordering::Relaxed);
    let result = decoder.read();
    assert!(
        LARGEST.load(Ordering::Relaxed) < LIMIT,
        "largest allocation {} bytes",
        LARGEST.load(Ordering::Relaxed)
    );
    result
}

#[test]
fn improbable_length_is_refused() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let result = decode_measured(header(0x7FFF_FFF0), DecoderConfig::default());
    assert!(matches!(
        result,
        Err(DecodeError::ImprobableLength {
            framed: 0x7FFF_FFF8,
            ceiling: 0x0100_0000,
        })
    ));
}

#[test]
fn length_above_format_limit_is_invalid() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let result = decode_measured(header(0x8000_0000), DecoderConfig::default());
    assert!(matches!(
        result,
        Err(DecodeError::InvalidLength {
            length: 0x8000_0000,
            limit: 0x7FFF_FFFF,
        })
    ));
}

#[test]
fn configured_limit_applies() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let config = DecoderConfig::default().with_max_chunk_length(100);
    let result = decode_measured(header(101), config);
    assert!(matches!(
        result,
        Err(DecodeError::InvalidLength {
            length: 101,
            limit: 100
        })
    ));
}

#[test]
fn lowered_ceiling_applies() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    let config = DecoderConfig::default().with_improbable_frame_length(LIMIT / 2);
    let result = decode_measured(header(0x0010_0000), config);
    assert!(matches!(result, Err(DecodeError::ImprobableLength { .. })));
}

#[test]
fn plausible_but_truncated_length_hits_eof() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    // Under the ceiling: the overflow buffer is sized for the frame and
    // the stream ends before it fills.
    let result = decode_measured(header(64 * 1024), DecoderConfig::default());
    assert!(matches!(
        result,
        Err(DecodeError::UnexpectedEof {
            step: Step::Body { length: 0x1_0000, .. }
        })
    ));
}

#[test]
fn lengths_between_the_two_limits() {
    let _guard = SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    // Under the format limit but over the ceiling.
    let result = decode_measured(header(0x0800_0000), DecoderConfig::default());
    assert!(matches!(
        result,
        Err(DecodeError::ImprobableLength {
            framed: 0x0800_0008,
            ..
        })
    ));

    // A tighter length limit is checked first.
    let config = DecoderConfig::default().with_max_chunk_length(0x07FF_FFFF);
    let result = decode_measured(header(0x0800_0000), config);
    assert!(matches!(
        result,
        Err(DecodeError::InvalidLength {
            length: 0x0800_0000,
            limit: 0x07FF_FFFF,
        })
    ));
}
