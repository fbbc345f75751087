//! Benchmarks for the chromatic sequencer family.

use std::hint::black_box;

use criterion::Criterion;
use ridgeline_dsp::chromatic::{FrameSequencer, GridSequencer, OctaveSequencer, VariSequencer};
use ridgeline_dsp::{ControlMode, Modulator, Parameters};

use crate::{modules::gate_stream, TICKS};

fn run<M: Modulator>(mut sequencer: M) -> i32 {
    let parameters = Parameters::new([40_000, 28_000, 50_000, 22_000]);
    // Two passes: the paged sequencers treat the first as knob priming.
    sequencer.configure(&parameters, ControlMode::Full);
    sequencer.configure(&Parameters::new([41_000, 28_000, 50_000, 22_000]), ControlMode::Full);
    let mut acc = 0i32;
    for tick in 0..TICKS {
        acc += sequencer.process(black_box(gate_stream(tick))) as i32;
    }
    acc
}

pub fn bench_chromatic(c: &mut Criterion) {
    let mut group = c.benchmark_group("modules/chromatic");

    group.bench_function("octave", |b| b.iter(|| run(OctaveSequencer::new())));
    group.bench_function("frame", |b| b.iter(|| run(FrameSequencer::new())));
    group.bench_function("grid", |b| b.iter(|| run(GridSequencer::new())));
    group.bench_function("vari", |b| b.iter(|| run(VariSequencer::new())));

    group.finish();
}
