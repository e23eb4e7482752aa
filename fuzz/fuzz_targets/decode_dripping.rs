#![no_main]

use libfuzzer_sys::fuzz_target;
use mng_decoder::{MngDecoder, ReadStatus, SliceSource};

// Fuzz target: pull-mode suspension.
//
// The first byte picks how many bytes each pull delivers. Decoding in
// pieces must succeed or fail exactly like decoding in one shot, and
// produce the same document when it succeeds.
fuzz_target!(|data: &[u8]| {
    let Some((&step, stream)) = data.split_first() else {
        return;
    };
    let one_shot = MngDecoder::decode(stream);

    let mut decoder = MngDecoder::new(SliceSource::drip(stream.to_vec(), usize::from(step)));
    let mut status = decoder.read();
    while let Ok(ReadStatus::NeedMoreData) = status {
        status = decoder.resume();
    }

    match (one_shot, status) {
        (Ok(doc), Ok(ReadStatus::Finished)) => assert_eq!(&doc, decoder.document()),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("one-shot {a:?} but dripping {b:?}"),
    }
});
