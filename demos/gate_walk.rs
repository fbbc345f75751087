/// Drives one engine channel with a synthetic gate pattern and prints the
/// CV stream for a few functions.
/// Run with: cargo run --example gate_walk
use ridgeline_dsp::{Control, ControlMode, Engine, Function};

/// Gate 1 every 4th tick, gate 2 every 10th.
fn gates(tick: usize) -> Control {
    let mut control = Control::NONE;
    if tick % 4 == 0 {
        control = control.with_gate_rising();
    }
    if tick % 10 == 0 {
        control = control.with_aux_rising();
    }
    control
}

fn walk(engine: &mut Engine, function: Function, ticks: usize) {
    engine.set_function(function);
    println!("\n{:?}:", function);
    print!("  ");
    for tick in 0..ticks {
        print!("{:6} ", engine.process(gates(tick)));
        if tick % 8 == 7 {
            print!("\n  ");
        }
    }
    println!();
}

fn main() {
    println!("=== Gate Walk ===");
    println!("gate 1 fires every 4 ticks, gate 2 every 10\n");

    let mut engine = Engine::new();
    engine.init(0);

    // Knobs: long loop, strength above center, a little extra on knob 2.
    engine
        .copy_parameters(&[65_535, 45_000, 40_000, 32_768])
        .unwrap();

    walk(&mut engine, Function::AccentOverdub, 32);
    walk(&mut engine, Function::Pattern, 32);
    walk(&mut engine, Function::Octave, 32);

    // The same knobs played as a palindrome on two of them.
    engine.set_control_mode(ControlMode::Half);
    walk(&mut engine, Function::Vari, 16);
}
