//! Four-step sequencer with an octave toggle.

use super::{frame_ramp, note_ramp, FRAME_SIZE, SENTINEL_THRESHOLD};
use crate::control::{clip, Control, ControlMode, Parameters};
use crate::modulator::Modulator;
use crate::quantize::quantize;

/// Knob-per-step pitch sequencer where gate 2 flips the octave.
///
/// The four knobs write their steps directly on every configure pass, so the
/// panel always reflects the sequence. Gate 1 advances the playhead and
/// returns the octave to its base polarity. Gate 2 toggles a x(-1) octave
/// flip; when the flip returns to base the playhead advances too, so a full
/// up/down pair consumes one logical step.
///
/// In half mode the two real knobs drive steps 0 and 1, with steps 2 and 3
/// as their negated mirrors, turning two knobs into a four-step palindrome.
///
/// Driving a step fully counterclockwise marks the end of the sequence:
/// reaching a sentinel step snaps the playhead home, truncating the loop
/// live from the panel.
pub struct OctaveSequencer {
    steps: [i16; FRAME_SIZE],
    step: u8,
    octave: i8,
    last_note: i16,
}

impl OctaveSequencer {
    pub fn new() -> Self {
        OctaveSequencer {
            steps: [0; FRAME_SIZE],
            step: 0,
            octave: 1,
            last_note: 0,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Full brightness in the base octave, dimmed while flipped.
    pub fn frame_brightness(&self) -> u8 {
        if self.octave > 0 {
            frame_ramp(0, 1)
        } else {
            128
        }
    }

    pub fn note_brightness(&self) -> u8 {
        note_ramp(self.last_note)
    }
}

impl Default for OctaveSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Modulator for OctaveSequencer {
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
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            self.step += 1;
            self.octave = 1;
        }

        if control.aux_rising() {
            if self.octave < 0 {
                // Second half of the up/down pair: move on.
                self.step += 1;
            }
            self.octave = -self.octave;
        }

        if self.step as usize >= FRAME_SIZE
            || self.steps[self.step as usize] <= SENTINEL_THRESHOLD
        {
            self.step = 0;
        }

        let value = clip(self.steps[self.step as usize] as i32 * self.octave as i32);
        self.last_note = quantize(value);
        self.last_note
    }
}
