use mng_decoder::{DecoderConfig, MngDecoder};
use mng_tests::{MNG_TERM_HEX, animation, from_hex, still_png};
use mng_wire::CrcPolicy;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_decode_small(c: &mut Criterion) {
    let stream = from_hex(MNG_TERM_HEX);

    c.bench_function("decode_small", |b| {
        b.iter(|| MngDecoder::decode(&stream).unwrap());
    });
}

fn bench_decode_animation(c: &mut Criterion) {
    let stream = animation(50);

    c.bench_function("decode_animation_50", |b| {
        b.iter(|| MngDecoder::decode(&stream).unwrap());
    });
}

fn bench_decode_crc(c: &mut Criterion) {
    let stream = still_png(8, 8 * 1024);
    let checked = DecoderConfig::default().with_crc(CrcPolicy::strict());
    let unchecked = DecoderConfig::default().with_crc(CrcPolicy::lenient());

    let mut group = c.benchmark_group("decode_crc");

    group.bench_function("strict", |b| {
        b.iter(|| MngDecoder::decode_with_config(&stream, checked).unwrap());
    });
    group.bench_function("lenient", |b| {
        b.iter(|| MngDecoder::decode_with_config(&stream, unchecked).unwrap());
    });

    group.finish();
}

fn bench_decode_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_throughput");

    // 1 KiB stays in the staging buffer, the larger sizes take the
    // overflow path.
    for size_kb in [1, 10, 100] {
        let stream = still_png(4, size_kb * 1024);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("decode", format!("{size_kb}kb")),
            &stream,
            |b, s| b.iter(|| MngDecoder::decode(s).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_small,
    bench_decode_animation,
    bench_decode_crc,
    bench_decode_throughput
);
criterion_main!(benches);
