#![no_main]

use libfuzzer_sys::fuzz_target;
use mng_wire::CrcPolicy;

// Fuzz target: packed CRC mode word.
//
// Every accepted mode word must pack back to itself.
fuzz_target!(|bits: u32| {
    if let Ok(policy) = CrcPolicy::from_bits(bits) {
        assert_eq!(policy.bits(), bits);
    }
});
