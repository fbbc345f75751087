//! Benchmarks for the accent sequencer family.

use std::hint::black_box;

use criterion::Criterion;
use ridgeline_dsp::accent::{AccentOverdub, AccentPalimpsest, AccentSet};
use ridgeline_dsp::{ControlMode, Modulator, Parameters};

use crate::{modules::gate_stream, TICKS};

fn run<M: Modulator>(mut algorithm: M) -> i32 {
    let parameters = Parameters::new([65_535, 48_000, 40_000, 32_768]);
    algorithm.configure(&parameters, ControlMode::Full);
    let mut acc = 0i32;
    for tick in 0..TICKS {
        acc += algorithm.process(black_box(gate_stream(tick))) as i32;
    }
    acc
}

pub fn bench_accent(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/accent");

    group.bench_function("set", |b| b.iter(|| run(AccentSet::new())));
    group.bench_function("overdub", |b| b.iter(|| run(AccentOverdub::new())));
    group.bench_function("palimpsest", |b| b.iter(|| run(AccentPalimpsest::new())));

    group.finish();
}
