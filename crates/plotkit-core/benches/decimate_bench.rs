// File: crates/plotkit-core/benches/decimate_bench.rs
// Purpose: Per-column decimation cost for dense runs, alone and inside the full data-line pipeline.

use plotkit_core::{decimate, draw_data_line, Axis, DataPoint, LineOptions, PlotAxes, RecordingContext, Rect, ScreenPoint, Stroke};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, black_box};

fn gen_xy(n: usize) -> Vec<DataPoint> {
    (0..n)
        .map(|i| {
            // simple waveform with drift
            let y = (i as f64 * 0.01).sin() * 10.0 + (i as f64 * 0.0001);
            DataPoint::new(i as f64, y)
        })
        .collect()
}

fn bench_decimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("decimate");
    for &n in &[100_000usize, 1_000_000usize] {
        // n points squeezed into 1000 pixel columns
        let run: Vec<ScreenPoint> =
            gen_xy(n).iter().map(|p| ScreenPoint::new(p.x * 1000.0 / n as f64, 320.0 - p.y * 20.0)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &run, |b, run| {
            b.iter_batched(
                || Vec::with_capacity(4_096),
                |mut out| {
                    decimate(run, &mut out);
                    black_box(out.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let area = Rect::new(72.0, 24.0, 928.0, 560.0);
    let mut group = c.benchmark_group("data_line");
    for &n in &[100_000usize, 1_000_000usize] {
        let data = gen_xy(n);
        let axes = PlotAxes::new(Axis::new("x", 0.0, n as f64), Axis::new("y", -12.0, 12.0 + n as f64 * 0.0001), area, false);
        for reduce in [true, false] {
            let options = LineOptions { decimate: reduce, ..LineOptions::default() };
            group.bench_with_input(BenchmarkId::new(if reduce { "decimated" } else { "raw" }, n), &data, |b, data| {
                let stroke = Stroke::default();
                b.iter(|| {
                    let mut rc = RecordingContext::new();
                    black_box(draw_data_line(&mut rc, area, &axes, data, &stroke, options))
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_decimate, bench_pipeline);
criterion_main!(benches);
