#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mng_decoder::MngDecoder;
use mng_encoder::MngEncoder;
use mng_types::{Back, ChunkRegistry, Defi, Ihdr, Jhdr, Mhdr, Term};
use mng_wire::ChunkTag;

#[derive(Debug, Arbitrary)]
enum FuzzChunk {
    Idat(Vec<u8>),
    Text { keyword: String, text: String },
    Itxt { keyword: String, text: String },
    Loop { level: u8, repeat: u32 },
    Endl { level: u8 },
    Defi { id: u16 },
    Back { r: u16, g: u16, b: u16 },
    Seek { name: Option<String> },
    Unknown { tag: [u8; 4], data: Vec<u8> },
}

#[derive(Debug, Arbitrary)]
enum Container {
    Png { width: u32, height: u32 },
    Jng { width: u32, height: u32 },
    Mng { width: u32, height: u32, ticks: u32, term: Option<(u32, u32)> },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    container: Container,
    chunks: Vec<FuzzChunk>,
}

// Fuzz target: MngEncoder -> MngDecoder roundtrip.
//
// Builds documents through the encoder's ordering and content checks;
// anything it accepts and writes must decode back to the same document.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let registry = ChunkRegistry::standard();
    let mut enc = MngEncoder::new();
    let opened = match input.container {
        Container::Png { width, height } => enc.put_ihdr(Ihdr::rgba8(width, height)).is_ok(),
        Container::Jng { width, height } => enc.put_jhdr(Jhdr::color8(width, height)).is_ok(),
        Container::Mng { width, height, ticks, term } => {
            let mut ok = enc.put_mhdr(Mhdr::new(width, height, ticks)).is_ok();
            if let Some((delay, max)) = term {
                ok &= enc.put_term(Term::repeat(delay, max)).is_ok();
            }
            ok
        }
    };
    if !opened {
        return;
    }

    for chunk in input.chunks.iter().take(32) {
        let _ = match chunk {
            FuzzChunk::Idat(data) => enc.put_idat(data.clone()),
            FuzzChunk::Text { keyword: k, text } => enc.put_text(k, text),
            FuzzChunk::Itxt { keyword: k, text } => enc.put_itxt(k, text),
            FuzzChunk::Loop { level, repeat } => enc.put_loop(*level, *repeat),
            FuzzChunk::Endl { level } => enc.put_endl(*level),
            FuzzChunk::Defi { id } => enc.put_defi(Defi::new(*id)),
            FuzzChunk::Back { r, g, b } => enc.put_back(Back::rgb(*r, *g, *b)),
            FuzzChunk::Seek { name } => enc.put_seek(name.as_deref()),
            FuzzChunk::Unknown { tag, data } => {
                let tag = ChunkTag::new(*tag);
                if registry.is_known(tag) {
                    continue;
                }
                enc.put_unknown(tag, data.clone())
            }
        };
    }
    let _ = enc.put_iend();
    let _ = enc.put_mend();

    let Ok(bytes) = enc.encode() else {
        return;
    };
    // Every record passed validation on put, so the decoder must accept
    // the output and rebuild the same document.
    match MngDecoder::decode(&bytes) {
        Ok(doc) => assert_eq!(&doc, enc.document()),
        Err(e) => panic!("decoder failed on encoder output: {e:?}"),
    }
});
