//! Benchmarks for the chromatic quantizer.

use std::hint::black_box;

use criterion::Criterion;
use ridgeline_dsp::quantize;

pub fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/quantize");

    group.bench_function("full_sweep", |b| {
        b.iter(|| {
            let mut acc = 0i32;
            for raw in (-32768i32..=32767).step_by(7) {
                acc += quantize(black_box(raw as i16)) as i32;
            }
            acc
        })
    });

    group.finish();
}
