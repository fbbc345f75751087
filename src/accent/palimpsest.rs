//! Reinforce/decay accent sequencer.

use super::{advance, scale_output, step_count, MAX_STEPS};
use crate::control::{Control, ControlMode, Parameters};
use crate::modulator::Modulator;

// Amount knobs are unipolar; dividing keeps a full-travel knob at a few
// hundred counts per pass so sequences evolve over bars, not ticks.
const AMOUNT_DIVISOR: u16 = 16;

/// Accent sequencer that grows where you play and fades where you don't.
///
/// While gate 2 is held, the step under the playhead is reinforced once per
/// visit by the compose amount. When the playhead leaves a step that was not
/// reinforced during that visit, the decompose amount is subtracted from it.
/// Hold the gate through the steps you want to keep and the rest of the
/// sequence wears away underneath them.
///
/// A step accumulates at most once per gate-2 assertion window: holding the
/// gate across a whole visit writes once, releasing and re-pressing on the
/// same step opens a new window and writes again.
pub struct AccentPalimpsest {
    values: [i16; MAX_STEPS],
    num_steps: u8,
    step: u8,
    compose: i16,
    decompose: i16,
    // Accent landed on the current step during this visit.
    reinforced: bool,
    // Accent landed during the current gate-2 assertion window.
    written: bool,
}

impl AccentPalimpsest {
    pub fn new() -> Self {
        AccentPalimpsest {
            values: [0; MAX_STEPS],
            num_steps: MAX_STEPS as u8,
            step: 0,
            compose: 0,
            decompose: 0,
            reinforced: false,
            written: false,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn num_steps(&self) -> u8 {
        self.num_steps
    }

    fn reinforce(&mut self) {
        let index = self.step as usize;
        let value = self.values[index] as i32 + self.compose as i32;
        self.values[index] = value.clamp(0, i16::MAX as i32) as i16;
    }

    fn decay(&mut self, index: usize) {
        let value = self.values[index] as i32 - self.decompose as i32;
        self.values[index] = value.clamp(0, i16::MAX as i32) as i16;
    }
}

impl Default for AccentPalimpsest {
    fn default() -> Self {
        Self::new()
    }
}

impl Modulator for AccentPalimpsest {
    fn init(&mut self) {
        *self = Self::new();
    }

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode) {
        self.num_steps = step_count(parameters.unipolar(0));
        self.compose = (parameters.unipolar(1) / AMOUNT_DIVISOR) as i16;
        self.decompose = match mode {
            ControlMode::Full => (parameters.unipolar(2) / AMOUNT_DIVISOR) as i16,
            ControlMode::Half => self.compose / 2,
        };
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            // Leaving the step: unreinforced values wear away.
            if !self.reinforced {
                self.decay(self.step as usize);
            }
            advance(&mut self.step, self.num_steps);
            self.reinforced = false;
            // A held gate may write again on the fresh step.
            self.written = false;
        }

        if control.aux_gate() {
            if !self.written {
                self.reinforce();
                self.written = true;
                self.reinforced = true;
            }
        } else {
            self.written = false;
        }

        let stored = self.values[self.step as usize];
        let value = if self.compose > stored {
            self.compose
        } else {
            stored
        };

        scale_output(value as i32)
    }
}
