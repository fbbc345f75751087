//! Benchmarks for the engine dispatch and buffering paths.

use std::hint::black_box;

use criterion::Criterion;
use ridgeline_dsp::{Engine, Function, BLOCK_SIZE};

use crate::{modules::gate_stream, TICKS};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");

    group.bench_function("per_sample_tick", |b| {
        let mut engine = Engine::new();
        engine.init(0);
        b.iter(|| {
            let mut acc = 0i32;
            for tick in 0..TICKS {
                acc += engine.process(black_box(gate_stream(tick))) as i32;
            }
            acc
        })
    });

    group.bench_function("buffered_tick_and_refill", |b| {
        let mut engine = Engine::new();
        engine.init(0);
        engine.set_function(Function::External);
        b.iter(|| {
            let mut acc = 0i32;
            for tick in 0..TICKS {
                acc += engine.process(black_box(gate_stream(tick))) as i32;
                if tick % BLOCK_SIZE == 0 {
                    engine.buffer();
                }
            }
            acc
        })
    });

    group.bench_function("knob_scan_reconfigure", |b| {
        let mut engine = Engine::new();
        engine.init(0);
        b.iter(|| {
            for value in (0..=65_535u32).step_by(257) {
                engine.set_parameter(1, black_box(value as u16));
            }
        })
    });

    group.finish();
}
