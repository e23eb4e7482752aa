#![no_main]

use libfuzzer_sys::fuzz_target;
use mng_wire::frame::{split_frame, ChunkFrame};

// Fuzz target: raw chunk framing.
//
// Reads consecutive frames with and without CRC slots and splits the
// input as a framed body. Every frame that reads back must re-serialize
// to exactly the bytes it was read from.
fuzz_target!(|data: &[u8]| {
    for crc_present in [true, false] {
        let _ = split_frame(data, crc_present);

        let mut offset = 0;
        while let Ok((frame, used)) = ChunkFrame::read_from(&data[offset..], crc_present) {
            let mut out = Vec::with_capacity(used);
            frame.write_to(&mut out).unwrap();
            assert_eq!(out, &data[offset..offset + used]);
            offset += used;
        }
    }
});
