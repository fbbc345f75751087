//! Paged step sequencers: one set of knobs, several frames of steps.

use super::{frame_ramp, note_ramp, FRAME_SIZE, SENTINEL_THRESHOLD};
use crate::control::{Control, ControlMode, Parameters};
use crate::modulator::Modulator;
use crate::quantize::quantize;

/// Step-array capacity shared by all page counts.
const CAPACITY: usize = 16;

/// Multi-frame pitch sequencer: gate 2 turns the page.
///
/// The sequence is split into `FRAMES` independent 4-step pages sharing the
/// same four physical knobs. Gate 1 walks the selected page; gate 2 advances
/// the page selector. Knobs latch rather than write: a step is only
/// overwritten when its knob actually moves, so turning the page does not
/// smear the old page's knob positions onto the new one. The first configure
/// pass after init only records knob positions, since those are leftover
/// state, not a performance.
///
/// Reaching a step driven to the sentinel band snaps the playhead to the top
/// of the page, truncating that page live.
pub struct PagedSequencer<const FRAMES: usize> {
    steps: [i16; CAPACITY],
    frame: u8,
    step: u8,
    snapshot: [u16; 4],
    primed: bool,
    last_note: i16,
}

/// Two pages, eight steps.
pub type FrameSequencer = PagedSequencer<2>;

/// Three pages, twelve steps.
pub type GridSequencer = PagedSequencer<3>;

impl<const FRAMES: usize> PagedSequencer<FRAMES> {
    pub fn new() -> Self {
        PagedSequencer {
            steps: [0; CAPACITY],
            frame: 0,
            step: 0,
            snapshot: [0; 4],
            primed: false,
            last_note: 0,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn frame_brightness(&self) -> u8 {
        frame_ramp(self.frame, FRAMES as u8)
    }

    pub fn note_brightness(&self) -> u8 {
        note_ramp(self.last_note)
    }

    /// Store a latched knob value into the selected frame.
    ///
    /// The frame count is a type parameter today, but the addressing is
    /// bounds-checked against the real array regardless: an out-of-range
    /// frame/slot combination drops the write instead of corrupting a
    /// neighbouring page.
    fn latch(&mut self, slot: usize, value: i16) {
        let index = self.frame as usize * FRAME_SIZE + slot;
        if index < FRAMES * FRAME_SIZE {
            if let Some(step) = self.steps.get_mut(index) {
                *step = value;
            }
        }
    }

    /// Value under the playhead; out-of-range addressing reads as silence.
    fn current_value(&self) -> i16 {
        let index = self.frame as usize * FRAME_SIZE + self.step as usize;
        self.steps.get(index).copied().unwrap_or(0)
    }
}

impl<const FRAMES: usize> Default for PagedSequencer<FRAMES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const FRAMES: usize> Modulator for PagedSequencer<FRAMES> {
    fn init(&mut self) {
        *self = Self::new();
    }

    fn configure(&mut self, parameters: &Parameters, mode: ControlMode) {
        if !self.primed {
            self.snapshot = parameters.as_array();
            self.primed = true;
            return;
        }

        let slots = match mode {
            ControlMode::Full => FRAME_SIZE,
            ControlMode::Half => FRAME_SIZE / 2,
        };

        for slot in 0..slots {
            let value = parameters.unipolar(slot);
            if value != self.snapshot[slot] {
                self.snapshot[slot] = value;
                self.latch(slot, parameters.bipolar(slot));
                if mode == ControlMode::Half {
                    // The missing knobs mirror the real ones, negated.
                    self.latch(slot + 2, parameters.bipolar(slot).saturating_neg());
                }
            }
        }
    }

    fn process(&mut self, control: Control) -> i16 {
        if control.gate_rising() {
            self.step += 1;
            if self.step as usize >= FRAME_SIZE {
                self.step = 0;
            }
        }

        if control.aux_rising() {
            self.frame = (self.frame + 1) % FRAMES as u8;
        }

        if self.current_value() <= SENTINEL_THRESHOLD {
            self.step = 0;
        }

        self.last_note = quantize(self.current_value());
        self.last_note
    }
}
