mod accent;
mod chromatic;
mod engine;
mod pattern;
mod quantize;

pub use accent::bench_accent;
pub use chromatic::bench_chromatic;
pub use engine::bench_engine;
pub use pattern::bench_pattern;
pub use quantize::bench_quantize;

use ridgeline_dsp::Control;

/// A realistic gate stream: gate 1 fires every 16th tick, gate 2 every 48th.
pub fn gate_stream(tick: usize) -> Control {
    let mut control = Control::NONE;
    if tick % 16 == 0 {
        control = control.with_gate_rising();
    }
    if tick % 48 == 0 {
        control = control.with_aux_rising();
    }
    control
}
