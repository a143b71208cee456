// File: crates/plotkit-core/benches/png_bench.rs
// Purpose: Encode/decode throughput of the PNG codec at typical chart sizes.

use plotkit_core::png::{decode, encode, get_image_info};
use plotkit_core::{Color, PixelBuffer, PngEncoderOptions};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput, black_box};

fn gradient(w: usize, h: usize) -> PixelBuffer {
    PixelBuffer::from_fn(w, h, |x, y| Color::from_rgb((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8))
}

fn bench_png(c: &mut Criterion) {
    let opts = PngEncoderOptions::default();
    let mut group = c.benchmark_group("png");
    for &(w, h) in &[(256usize, 256usize), (1024, 640), (1920, 1080)] {
        let buf = gradient(w, h);
        let bytes = encode(&buf, &opts).expect("encode");
        group.throughput(Throughput::Bytes((w * h * 4) as u64));
        group.bench_with_input(BenchmarkId::new("encode", format!("{w}x{h}")), &buf, |b, buf| {
            b.iter(|| black_box(encode(buf, &opts).map(|v| v.len())));
        });
        group.bench_with_input(BenchmarkId::new("decode", format!("{w}x{h}")), &bytes, |b, bytes| {
            b.iter(|| black_box(decode(bytes).map(|p| p.width())));
        });
        group.bench_with_input(BenchmarkId::new("info", format!("{w}x{h}")), &bytes, |b, bytes| {
            b.iter(|| black_box(get_image_info(bytes)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_png);
criterion_main!(benches);
