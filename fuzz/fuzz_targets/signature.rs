#![no_main]

use libfuzzer_sys::fuzz_target;
use mng_wire::Flavor;

// Fuzz target: signature recognition.
//
// Any accepted signature must be exactly the canonical bytes of the
// flavor it was recognised as.
fuzz_target!(|data: &[u8]| {
    if let Ok(flavor) = Flavor::read_signature(data) {
        assert_eq!(&data[..8], &flavor.signature());
    }
});
