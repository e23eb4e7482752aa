#![no_main]

use libfuzzer_sys::fuzz_target;
use mng_types::ChunkRegistry;
use mng_wire::ChunkTag;

// Fuzz target: per-type payload parsing through the registry.
//
// The first 4 bytes select the tag, the rest is the payload. Whatever
// parses must serialize to a payload that parses to the same record.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (tag, payload) = data.split_at(4);
    let tag = ChunkTag::new([tag[0], tag[1], tag[2], tag[3]]);
    let registry = ChunkRegistry::standard();

    let Ok(chunk) = registry.parse(tag, payload) else {
        return;
    };
    assert_eq!(chunk.tag(), tag);

    let mut body = Vec::new();
    registry.serialize(&chunk, &mut body);
    let reparsed = registry.parse(tag, &body).expect("serialized payload must parse");
    assert_eq!(reparsed, chunk);
});
