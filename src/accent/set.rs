//! Direct-write accent sequencer.

use super::{advance, scale_output, step_count, MAX_STEPS};
use crate::control::{Control, ControlMode, Parameters};
use crate::modulator::Modulator;

/// Accent sequencer whose write gate replaces the current step outright.
///
/// The one family member that keeps full bipolar step values, so it doubles
/// as a trigger-programmable pitch/offset source. Knobs: step count,
/// write strength, output offset (FULL mode only).
pub struct AccentSet {
    values: [i16; MAX_STEPS],
    num_steps: u8,
    step: u8,
    strength: i16,
    offset: i16,
}

impl AccentSet {
    pub fn new() -> Self {
        AccentSet {
            values: [0; MAX_STEPS],
            num_steps: MAX_STEPS as u8,
            step: 0,
            strength: 0,
            offset: 0,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn num_steps(&self) -> u8 {
        self.num_steps
    }
}

impl Default for AccentSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Modulator for AccentSet {
    fn init(&mut self) {
        *self = Self::new();
    }

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode) {
        self.num_steps = step_count(parameters.unipolar(0));
        self.strength = parameters.bipolar(1);
        self.offset = match mode {
            ControlMode::Full => parameters.bipolar(2),
            ControlMode::Half => 0,
        };
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            advance(&mut self.step, self.num_steps);
        }

        if control.aux_rising() {
            self.values[self.step as usize] = self.strength;
        }

        let stored = self.values[self.step as usize];
        // Knob motion is audible right away: a raised knob previews over the
        // stored value until the next write lands.
        let value = if self.strength > stored {
            self.strength
        } else {
            stored
        };

        scale_output(value as i32 + self.offset as i32)
    }
}
