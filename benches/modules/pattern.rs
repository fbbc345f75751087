//! Benchmarks for the pattern generator.

use std::hint::black_box;

use criterion::Criterion;
use ridgeline_dsp::pattern::PatternGenerator;
use ridgeline_dsp::{ControlMode, Modulator, Parameters};

use crate::{modules::gate_stream, TICKS};

pub fn bench_pattern(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/pattern");

    group.bench_function("busy_masks", |b| {
        b.iter(|| {
            let mut generator = PatternGenerator::new();
            // Combination 24 in both slots: every mask bit in play.
            let parameters = Parameters::new([62_928, 62_928, 20_000, 50_000]);
            generator.configure(&parameters, ControlMode::Full);
            let mut acc = 0i32;
            for tick in 0..TICKS {
                acc += generator.process(black_box(gate_stream(tick))) as i32;
            }
            acc
        })
    });

    group.finish();
}
