//! Binary rhythm pattern generator.
//!
//! Two knobs each select one of 25 eight-step accent masks, built by pairing
//! hand-authored half-bar figures; the other two knobs set how the two masks
//! are weighted into a single bipolar accent stream.
//!
//! # How It Works
//!
//! 1. Gate 1 advances an eight-step counter, gate 2 resets it to the downbeat
//! 2. Each pattern-select knob maps to a base-5 digit pair (25 combinations)
//! 3. Each digit picks a 4-bit half-bar figure from that slot's table
//! 4. The two figures concatenate into an 8-bit mask over the bar
//! 5. Set bits contribute level, weighted by the balance and level knobs

use crate::control::{clip, Control, ControlMode, Parameters};
use crate::modulator::Modulator;

/// Steps per bar.
pub const PATTERN_STEPS: u8 = 8;

/// Distinct mask selections per pattern knob (a base-5 digit pair).
pub const PATTERN_COMBINATIONS: u16 = 25;

// 65536 / 25, so full knob travel sweeps every combination exactly once.
const SELECT_DIVISOR: u16 = 2622;

/*
Half-bar figures, 4 bits each, bit 0 = first step of the half.

Slot A (downbeat-oriented):
  0  0000  rest-rest-rest-rest
  1  0001  1-rest-rest-rest
  2  0011  1-and-rest-rest
  3  0101  1-2
  4  1111  1-and-2-and

Slot B (offbeat-oriented):
  0  0000  rest-rest-rest-rest
  1  1000  rest-rest-rest-and
  2  1011  1-and-rest-and
  3  1100  rest-rest-2-and
  4  1101  1-rest-2-and
*/
const HALF_FIGURES_A: [u8; 5] = [0x00, 0x01, 0x03, 0x05, 0x0f];
const HALF_FIGURES_B: [u8; 5] = [0x00, 0x08, 0x0b, 0x0c, 0x0d];

fn half_figure(table: &[u8; 5], digit: u16) -> u8 {
    // Unrecognized digits fall back to silence rather than noise.
    table.get(digit as usize).copied().unwrap_or(0)
}

/// Expand a pattern-select value into an 8-bit accent mask.
///
/// The high base-5 digit fills the first half of the bar (low nibble), the
/// low digit the second half. Selections past the table are clamped to the
/// last combination.
fn accent_mask(select: u16, table: &[u8; 5]) -> u8 {
    let select = select.min(PATTERN_COMBINATIONS - 1);
    let first = half_figure(table, select / 5);
    let second = half_figure(table, select % 5);
    (second << 4) | first
}

/// Two-pattern accent generator.
pub struct PatternGenerator {
    values: [u16; 4],
    step: u8,
}

impl PatternGenerator {
    pub fn new() -> Self {
        PatternGenerator {
            values: [0; 4],
            step: 0,
        }
    }

    /// Step currently playing, 0..8. Host display reads this.
    pub fn step(&self) -> u8 {
        self.step
    }
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Modulator for PatternGenerator {
    fn init(&mut self) {
        *self = Self::new();
    }

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode) {
        match mode {
            ControlMode::Full => {
                self.values = parameters.as_array();
            }
            ControlMode::Half => {
                // Two knobs pick the patterns; balance sits left of center
                // and level B lands moderately hot.
                self.values = [
                    parameters.unipolar(0),
                    parameters.unipolar(1),
                    8_192,
                    48_192,
                ];
            }
        }
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            self.step += 1;
        }
        if control.aux_rising() {
            // Reset wins over advance when both land on one tick.
            self.step = 0;
        }
        if self.step >= PATTERN_STEPS {
            self.step = 0;
        }

        let select_a = self.values[0] / SELECT_DIVISOR;
        let select_b = self.values[1] / SELECT_DIVISOR;
        let balance = (self.values[2] / 2) as i32;
        let level_b = self.values[3] as i32 - 32768;

        let bit = 1u8 << self.step;
        let mut sum: i32 = 0;

        // Pattern A: the balance knob moves its level between the first and
        // second half of the bar.
        if accent_mask(select_a, &HALF_FIGURES_A) & bit != 0 {
            sum += if self.step < 4 {
                32767 - balance
            } else {
                balance
            };
        }

        // Pattern B: one bipolar level across the whole bar, so it can
        // push accents up or carve them down.
        if accent_mask(select_b, &HALF_FIGURES_B) & bit != 0 {
            sum += level_b / 2;
        }

        clip(sum)
    }
}
