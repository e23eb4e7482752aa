#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mng_decoder::{MngDecoder, Ownership, ReadStatus};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    stream: Vec<u8>,
    cuts: Vec<u16>,
    caller_owned: bool,
}

// Fuzz target: push-mode input.
//
// Splits the stream at arbitrary points, pushes each piece and resumes.
// The result must match a one-shot decode.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };
    let ownership = if input.caller_owned {
        Ownership::Caller
    } else {
        Ownership::Engine
    };

    let mut decoder = MngDecoder::push_only();
    let mut rest = input.stream.as_slice();
    let mut status = Ok(ReadStatus::NeedMoreData);
    let mut started = false;
    for cut in input.cuts.iter().take(64) {
        let n = usize::from(*cut).min(rest.len());
        let (piece, tail) = rest.split_at(n);
        decoder.push_data(piece.to_vec(), ownership);
        rest = tail;
        status = if started { decoder.resume() } else { decoder.read() };
        started = true;
        if !matches!(status, Ok(ReadStatus::NeedMoreData)) {
            break;
        }
    }
    if matches!(status, Ok(ReadStatus::NeedMoreData)) {
        decoder.push_data(rest.to_vec(), ownership);
        decoder.push_end();
        status = if started { decoder.resume() } else { decoder.read() };
    }

    match (MngDecoder::decode(&input.stream), status) {
        (Ok(doc), Ok(ReadStatus::Finished)) => assert_eq!(&doc, decoder.document()),
        (Err(_), Err(_)) => {}
        (a, b) => panic!("one-shot {a:?} but pushed {b:?}"),
    }
});
