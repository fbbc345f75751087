//! The processor contract every modulation algorithm implements.
//!
//! Algorithms come in two styles. Per-sample processors do all their work
//! inside the tick and hand back one sample. Block processors are too heavy
//! for that; they render [`BLOCK_SIZE`](crate::BLOCK_SIZE) samples at a time
//! into a ring buffer from a lower-priority context, and the tick path just
//! drains the buffer. An algorithm implements exactly one of the two traits.

use rtrb::{Consumer, Producer};

use crate::control::{Control, ControlMode, Parameters};
use crate::BLOCK_SIZE;

/// A per-sample modulation source.
pub trait Modulator {
    /// Reset all internal state to power-on defaults.
    fn init(&mut self);

    /// Re-derive internal fields from the current knob values.
    ///
    /// Called from the parameter-scan context, interleaved between ticks, so
    /// it may observe a torn vector (one knob updated, the rest stale).
    /// Implementations only ever rewrite derived values here, never step
    /// indices, so a torn read can mis-tune a parameter for one scan pass but
    /// can never corrupt sequencer position.
    fn configure(&mut self, parameters: &Parameters, mode: ControlMode);

    /// Advance one tick and produce one bipolar sample.
    ///
    /// Runs inside the sample-period deadline: O(1), no allocation, no
    /// blocking.
    fn process(&mut self, control: Control) -> i16;
}

/// A block-rendering modulation source.
///
/// The engine feeds control bytes through the input ring and consumes
/// samples from the output ring; `fill_block` is only invoked when the
/// output side has at least one block of free capacity.
pub trait BlockModulator {
    fn init(&mut self);

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode);

    /// Render one block: consume up to [`BLOCK_SIZE`](crate::BLOCK_SIZE)
    /// control bytes, produce exactly that many samples.
    fn fill_block(&mut self, input: &mut Consumer<Control>, output: &mut Producer<i16>);
}

/// The default block collaborator: renders silence.
///
/// External voices (drums, LFOs, noise generators) plug into the engine's
/// block slot; when none is supplied this stands in, keeping the buffered
/// path well-defined instead of special-cased.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl BlockModulator for Silence {
    fn init(&mut self) {}

    fn configure(&mut self, _parameters: &Parameters, _mode: ControlMode) {}

    fn fill_block(&mut self, input: &mut Consumer<Control>, output: &mut Producer<i16>) {
        for _ in 0..BLOCK_SIZE {
            let _ = input.pop();
            let _ = output.push(0);
        }
    }
}
