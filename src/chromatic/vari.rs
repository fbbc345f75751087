//! Four-step sequencer with knob-derived sequence length.

use super::{frame_ramp, note_ramp, FRAME_SIZE, SENTINEL_THRESHOLD};
use crate::control::{Control, ControlMode, Parameters};
use crate::modulator::Modulator;
use crate::quantize::quantize;

/// Knob-per-step pitch sequencer with a live step count.
///
/// Steps come straight off the knobs like [`OctaveSequencer`], but gate 2 is
/// a plain reset to the downbeat and the knobs double as the length control:
/// the first knob sitting in the sentinel band ends the sequence at that
/// position, so sweeping a knob fully counterclockwise shortens the loop on
/// the fly (down to a single repeating step).
///
/// [`OctaveSequencer`]: super::OctaveSequencer
pub struct VariSequencer {
    steps: [i16; FRAME_SIZE],
    num_steps: u8,
    step: u8,
    last_note: i16,
}

impl VariSequencer {
    pub fn new() -> Self {
        VariSequencer {
            steps: [0; FRAME_SIZE],
            num_steps: FRAME_SIZE as u8,
            step: 0,
            last_note: 0,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn num_steps(&self) -> u8 {
        self.num_steps
    }

    /// Brightness follows the active length: longer loop, brighter LED.
    pub fn frame_brightness(&self) -> u8 {
        frame_ramp(self.num_steps.saturating_sub(1), FRAME_SIZE as u8)
    }

    pub fn note_brightness(&self) -> u8 {
        note_ramp(self.last_note)
    }
}

impl Default for VariSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Modulator for VariSequencer {
    fn init(&mut self) {
        *self = Self::new();
    }

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode) {
        match mode {
            ControlMode::Full => {
                for slot in 0..FRAME_SIZE {
                    self.steps[slot] = parameters.bipolar(slot);
                }
            }
            ControlMode::Half => {
                self.steps[0] = parameters.bipolar(0);
                self.steps[1] = parameters.bipolar(1);
                self.steps[2] = parameters.bipolar(0).saturating_neg();
                self.steps[3] = parameters.bipolar(1).saturating_neg();
            }
        }

        // Derive the length: the first sentinel knob ends the loop there.
        // Only derived state changes here; the playhead re-validates itself
        // against the new count on its own tick.
        self.num_steps = FRAME_SIZE as u8;
        for (slot, &value) in self.steps.iter().enumerate() {
            if value <= SENTINEL_THRESHOLD {
                self.num_steps = (slot as u8).max(1);
                break;
            }
        }
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            self.step += 1;
        }
        if control.aux_rising() {
            self.step = 0;
        }
        if self.step >= self.num_steps {
            self.step = 0;
        }

        self.last_note = quantize(self.steps[self.step as usize]);
        self.last_note
    }
}
