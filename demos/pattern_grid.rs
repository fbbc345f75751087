/// Prints every rhythm-pattern combination the pattern generator can play.
/// Run with: cargo run --example pattern_grid
use ridgeline_dsp::pattern::{PatternGenerator, PATTERN_COMBINATIONS, PATTERN_STEPS};
use ridgeline_dsp::{Control, ControlMode, Modulator, Parameters};

/// Play one full bar and mark which steps come out non-silent.
fn bar(parameters: [u16; 4]) -> String {
    let mut generator = PatternGenerator::new();
    generator.configure(&Parameters::new(parameters), ControlMode::Full);

    let mut row = String::new();
    // The first tick reads step 0 with no edge; the rest advance.
    for step in 0..PATTERN_STEPS {
        let control = if step == 0 {
            Control::NONE
        } else {
            Control::NONE.with_gate_rising()
        };
        row.push(if generator.process(control) != 0 { 'x' } else { '.' });
        if step == 3 {
            row.push(' ');
        }
    }
    row
}

fn main() {
    // 65536 / 25: centers each selection inside its knob bucket.
    let select = |combination: u16| combination * 2622 + 1311;

    println!("=== Pattern Grid ===");
    println!("25 combinations per slot, two hand-authored figure tables\n");

    println!("combo  slot A     slot B");
    for combination in 0..PATTERN_COMBINATIONS {
        let a = bar([select(combination), 0, 32_768, 32_768]);
        let b = bar([0, select(combination), 32_768, 65_535]);
        println!("  {:2}   {}  {}", combination, a, b);
    }

    println!("\nEach row is one bar of eight steps; 'x' carries level.");
    println!("Slot A leans on downbeats, slot B fills the offbeats.");
}
