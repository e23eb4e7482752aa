#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: one-shot decoder entry point.
//
// Calls `MngDecoder::decode(data)` on arbitrary input bytes.
// Catches bugs in:
// - Signature and line-ending validation
// - Length limits and the improbable-length ceiling
// - Staging/overflow tier selection
// - CRC policy evaluation
// - Per-chunk payload parsing
// - Header open/close tracking and end-of-stream detection
fuzz_target!(|data: &[u8]| {
    let _ = mng_decoder::MngDecoder::decode(data);
});
