//! Per-channel dispatch and buffering engine.

/*
One Tick, One Sample
====================

The host timer fires once per audio sample and calls [`Engine::process`]
with that tick's control byte. The engine routes the tick to whichever
algorithm is selected and hands back one bipolar sample. Everything on that
path is O(1): the tick must finish well inside the sample period, every
sample, or the output audibly glitches.

Algorithms come in two styles and the engine owns the machinery for both:

  per-sample   The algorithm runs inside the tick. All the sequencers in
               this crate work this way; they are a handful of compares and
               adds each.

  block        The algorithm is too heavy for the tick and renders
               BLOCK_SIZE samples at a time from a lower-priority context
               (external voices: drums, noise sources, shaped LFOs). The
               tick path only moves bytes: push the control byte into the
               input ring, pop one finished sample off the output ring.

The block side is refilled by [`Engine::buffer`], called opportunistically
from the service loop. It renders only when the output ring has a full
block of free space, and reports `false` otherwise - "try again next tick",
never an error. Role discipline keeps the rings coherent without locks:
`process` is the sole writer of the input ring and sole reader of the
output ring; `buffer` is the sole reader of input and sole writer of
output. rtrb's split producer/consumer halves encode exactly that.

Selecting a function re-initializes the newly selected algorithm and drains
both rings, so the first sample after a switch can never be a leftover from
the previous algorithm.
*/

use std::fmt;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::accent::{AccentOverdub, AccentPalimpsest, AccentSet};
use crate::chromatic::{FrameSequencer, GridSequencer, OctaveSequencer, VariSequencer};
use crate::control::{Control, ControlMode, Parameters};
use crate::modulator::{BlockModulator, Modulator, Silence};
use crate::pattern::PatternGenerator;
use crate::{BLOCK_SIZE, RING_CAPACITY};

/// The closed set of selectable algorithms.
///
/// `External` is the block-rendered collaborator slot; which voice sits
/// there is fixed when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Function {
    AccentSet,
    AccentOverdub,
    AccentPalimpsest,
    Pattern,
    Octave,
    Frame,
    Grid,
    Vari,
    External,
}

impl Function {
    pub const ALL: [Function; 9] = [
        Function::AccentSet,
        Function::AccentOverdub,
        Function::AccentPalimpsest,
        Function::Pattern,
        Function::Octave,
        Function::Frame,
        Function::Grid,
        Function::Vari,
        Function::External,
    ];

    /// Block-rendered functions go through the ring buffers instead of the
    /// direct per-sample call.
    pub fn is_block(self) -> bool {
        matches!(self, Function::External)
    }
}

impl TryFrom<u8> for Function {
    type Error = EngineError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Function::ALL
            .get(raw as usize)
            .copied()
            .ok_or(EngineError::UnknownFunction(raw))
    }
}

/// CPU-budget safety valve.
///
/// Some collaborator voices only fit the sample-period budget for part of
/// their parameter space. The policy watches the two mode-dependent
/// tone/snappy knobs while `guarded` is selected: with both at or above
/// `high` the expensive voice is allowed, and once either falls to `low` or
/// below the engine swaps to the cheaper `fallback`. This is data, not a
/// hard-coded voice pair; the default engine runs without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetPolicy {
    pub guarded: Function,
    pub fallback: Function,
    pub low: u16,
    pub high: u16,
}

impl BudgetPolicy {
    fn verdict(&self, current: Function, tone: u16, snappy: u16) -> Option<Function> {
        if current != self.guarded && current != self.fallback {
            return None;
        }
        if tone >= self.high && snappy >= self.high {
            Some(self.guarded)
        } else if tone <= self.low || snappy <= self.low {
            Some(self.fallback)
        } else {
            None
        }
    }
}

/// Errors from the host-facing configuration surface. The tick path itself
/// is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A raw function selector with no algorithm behind it.
    UnknownFunction(u8),
    /// A bulk parameter copy wider than the knob vector.
    TooManyParameters { supplied: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownFunction(raw) => {
                write!(f, "unknown function selector: {}", raw)
            }
            EngineError::TooManyParameters { supplied } => {
                write!(
                    f,
                    "parameter copy of {} values exceeds the 4-knob vector",
                    supplied
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// One channel's modulation engine: every algorithm instance, the knob
/// state, and the ring buffers, behind the per-tick entry point.
pub struct Engine<V: BlockModulator = Silence> {
    function: Function,
    control_mode: ControlMode,
    parameters: Parameters,
    policy: Option<BudgetPolicy>,

    input_tx: Producer<Control>,
    input_rx: Consumer<Control>,
    output_tx: Producer<i16>,
    output_rx: Consumer<i16>,

    accent_set: AccentSet,
    accent_overdub: AccentOverdub,
    accent_palimpsest: AccentPalimpsest,
    pattern: PatternGenerator,
    octave: OctaveSequencer,
    frame: FrameSequencer,
    grid: GridSequencer,
    vari: VariSequencer,
    external: V,
}

impl Engine<Silence> {
    /// Engine with the silent default in the external slot.
    pub fn new() -> Self {
        Engine::with_external(Silence)
    }
}

impl Default for Engine<Silence> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: BlockModulator> Engine<V> {
    /// Engine with a block-rendered collaborator voice plugged in.
    pub fn with_external(external: V) -> Self {
        let (input_tx, input_rx) = RingBuffer::new(RING_CAPACITY);
        let (output_tx, output_rx) = RingBuffer::new(RING_CAPACITY);
        Engine {
            function: Function::AccentOverdub,
            control_mode: ControlMode::Full,
            parameters: Parameters::default(),
            policy: None,
            input_tx,
            input_rx,
            output_tx,
            output_rx,
            accent_set: AccentSet::new(),
            accent_overdub: AccentOverdub::new(),
            accent_palimpsest: AccentPalimpsest::new(),
            pattern: PatternGenerator::new(),
            octave: OctaveSequencer::new(),
            frame: FrameSequencer::new(),
            grid: GridSequencer::new(),
            vari: VariSequencer::new(),
            external,
        }
    }

    /// Reset the whole channel to power-on state.
    ///
    /// `index` is the channel number; each channel wakes up with a
    /// musically distinct default so a freshly patched module does
    /// something audible on both outputs.
    pub fn init(&mut self, index: u8) {
        self.parameters = Parameters::default();
        self.control_mode = ControlMode::Full;

        self.accent_set.init();
        self.accent_overdub.init();
        self.accent_palimpsest.init();
        self.pattern.init();
        self.octave.init();
        self.frame.init();
        self.grid.init();
        self.vari.init();
        self.external.init();

        self.set_function(if index == 0 {
            Function::AccentOverdub
        } else {
            Function::Octave
        });
    }

    pub fn function(&self) -> Function {
        self.function
    }

    pub fn control_mode(&self) -> ControlMode {
        self.control_mode
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Select the active algorithm.
    ///
    /// The newly selected algorithm is re-initialized and both rings are
    /// drained, so no sample computed under the old function survives the
    /// switch. Runs from the control context, between ticks.
    pub fn set_function(&mut self, function: Function) {
        self.function = function;
        match function {
            Function::AccentSet => self.accent_set.init(),
            Function::AccentOverdub => self.accent_overdub.init(),
            Function::AccentPalimpsest => self.accent_palimpsest.init(),
            Function::Pattern => self.pattern.init(),
            Function::Octave => self.octave.init(),
            Function::Frame => self.frame.init(),
            Function::Grid => self.grid.init(),
            Function::Vari => self.vari.init(),
            Function::External => self.external.init(),
        }
        while self.input_rx.pop().is_ok() {}
        while self.output_rx.pop().is_ok() {}
        self.configure();
    }

    /// Install or clear the CPU-budget policy.
    pub fn set_budget_policy(&mut self, policy: Option<BudgetPolicy>) {
        self.policy = policy;
        self.configure();
    }

    pub fn set_control_mode(&mut self, control_mode: ControlMode) {
        self.control_mode = control_mode;
        self.configure();
    }

    /// Update one knob and reconfigure the active algorithm. Out-of-range
    /// indices are ignored, matching the knob-scan code's wider mux.
    pub fn set_parameter(&mut self, index: usize, value: u16) {
        self.parameters.set(index, value);
        self.configure();
    }

    /// Bulk-load the parameter vector WITHOUT reconfiguring.
    ///
    /// Used by the host while restoring state; call
    /// [`set_function`](Engine::set_function) (or any setter) afterwards to
    /// push the values into the active algorithm.
    pub fn copy_parameters(&mut self, values: &[u16]) -> Result<(), EngineError> {
        if values.len() > 4 {
            return Err(EngineError::TooManyParameters {
                supplied: values.len(),
            });
        }
        for (slot, &value) in values.iter().enumerate() {
            self.parameters.set(slot, value);
        }
        Ok(())
    }

    /// One audio tick: route the control byte, return one sample.
    pub fn process(&mut self, control: Control) -> i16 {
        match self.function {
            Function::AccentSet => self.accent_set.process(control),
            Function::AccentOverdub => self.accent_overdub.process(control),
            Function::AccentPalimpsest => self.accent_palimpsest.process(control),
            Function::Pattern => self.pattern.process(control),
            Function::Octave => self.octave.process(control),
            Function::Frame => self.frame.process(control),
            Function::Grid => self.grid.process(control),
            Function::Vari => self.vari.process(control),
            Function::External => {
                // A full input ring means the service loop has stalled for a
                // whole ring's worth of ticks; dropping the byte here keeps
                // the tick wait-free and the ring roles clean.
                let _ = self.input_tx.push(control);
                self.output_rx.pop().unwrap_or(0)
            }
        }
    }

    /// Opportunistic block refill, called from the service loop.
    ///
    /// Returns `false` when the output ring lacks space for a full block;
    /// the caller just tries again next service tick. Idempotent and
    /// lossless either way. Per-sample functions have nothing to refill and
    /// report `true`.
    pub fn buffer(&mut self) -> bool {
        if !self.function.is_block() {
            return true;
        }
        if self.output_tx.slots() < BLOCK_SIZE {
            return false;
        }
        self.external
            .fill_block(&mut self.input_rx, &mut self.output_tx);
        true
    }

    /// Frame LED level for the host display. Pure read.
    pub fn frame_brightness(&self) -> u8 {
        match self.function {
            Function::Octave => self.octave.frame_brightness(),
            Function::Frame => self.frame.frame_brightness(),
            Function::Grid => self.grid.frame_brightness(),
            Function::Vari => self.vari.frame_brightness(),
            _ => 0,
        }
    }

    /// Note LED level for the host display. Pure read.
    pub fn note_brightness(&self) -> u8 {
        match self.function {
            Function::Octave => self.octave.note_brightness(),
            Function::Frame => self.frame.note_brightness(),
            Function::Grid => self.grid.note_brightness(),
            Function::Vari => self.vari.note_brightness(),
            _ => 0,
        }
    }

    /// Re-derive the active algorithm's internals from the knob vector.
    fn configure(&mut self) {
        if let Some(policy) = self.policy {
            let (tone, snappy) = match self.control_mode {
                ControlMode::Full => (self.parameters.unipolar(1), self.parameters.unipolar(2)),
                ControlMode::Half => (self.parameters.unipolar(0), self.parameters.unipolar(1)),
            };
            if let Some(target) = policy.verdict(self.function, tone, snappy) {
                if target != self.function {
                    // set_function re-enters configure with the new target.
                    self.set_function(target);
                    return;
                }
            }
        }

        let parameters = self.parameters;
        let mode = self.control_mode;
        match self.function {
            Function::AccentSet => self.accent_set.configure(&parameters, mode),
            Function::AccentOverdub => self.accent_overdub.configure(&parameters, mode),
            Function::AccentPalimpsest => self.accent_palimpsest.configure(&parameters, mode),
            Function::Pattern => self.pattern.configure(&parameters, mode),
            Function::Octave => self.octave.configure(&parameters, mode),
            Function::Frame => self.frame.configure(&parameters, mode),
            Function::Grid => self.grid.configure(&parameters, mode),
            Function::Vari => self.vari.configure(&parameters, mode),
            Function::External => self.external.configure(&parameters, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Block collaborator that renders a fixed value, for exercising the
    /// buffered path.
    struct Tone(i16);

    impl BlockModulator for Tone {
        fn init(&mut self) {}

        fn configure(&mut self, _parameters: &Parameters, _mode: ControlMode) {}

        fn fill_block(&mut self, input: &mut Consumer<Control>, output: &mut Producer<i16>) {
            for _ in 0..BLOCK_SIZE {
                let _ = input.pop();
                let _ = output.push(self.0);
            }
        }
    }

    #[test]
    fn test_per_sample_function_ticks_directly() {
        let mut engine = Engine::new();
        engine.set_function(Function::Octave);
        engine.set_parameter(0, 32768 + 12_000);
        let out = engine.process(Control::NONE);
        assert_eq!(out, crate::quantize::quantize(12_000));
    }

    #[test]
    fn test_function_selector_roundtrip() {
        for (raw, function) in Function::ALL.iter().enumerate() {
            assert_eq!(Function::try_from(raw as u8).unwrap(), *function);
        }
        assert!(matches!(
            Function::try_from(200),
            Err(EngineError::UnknownFunction(200))
        ));
    }

    #[test]
    fn test_block_function_streams_through_rings() {
        let mut engine = Engine::with_external(Tone(123));
        engine.set_function(Function::External);
        // Nothing rendered yet: the tick path reads silence, never blocks.
        assert_eq!(engine.process(Control::NONE), 0);
        assert!(engine.buffer());
        for _ in 0..BLOCK_SIZE {
            assert_eq!(engine.process(Control::NONE), 123);
        }
    }

    #[test]
    fn test_buffer_backs_off_when_ring_is_full() {
        let mut engine = Engine::with_external(Tone(7));
        engine.set_function(Function::External);
        // Fill the output ring to capacity.
        for _ in 0..(RING_CAPACITY / BLOCK_SIZE) {
            assert!(engine.buffer());
        }
        assert!(!engine.buffer(), "no room for a block: try again later");
        // Nothing was lost; every buffered sample still arrives.
        for _ in 0..RING_CAPACITY {
            assert_eq!(engine.process(Control::NONE), 7);
        }
        assert!(engine.buffer(), "space freed, refill resumes");
    }

    #[test]
    fn test_function_switch_discards_buffered_samples() {
        let mut engine = Engine::with_external(Tone(99));
        engine.set_function(Function::External);
        engine.buffer();
        // Switch away and back: the old render must not leak through.
        engine.set_function(Function::Pattern);
        engine.set_function(Function::External);
        assert_eq!(
            engine.process(Control::NONE),
            0,
            "first sample after a switch is never stale"
        );
    }

    #[test]
    fn test_selecting_a_function_reinitializes_it() {
        let mut engine = Engine::new();
        engine.set_function(Function::Pattern);
        for _ in 0..5 {
            engine.process(Control::NONE.with_gate_rising());
        }
        engine.set_function(Function::Octave);
        engine.set_function(Function::Pattern);
        assert_eq!(engine.pattern.step(), 0, "reselection starts from scratch");
    }

    #[test]
    fn test_set_parameter_configures_active_only() {
        let mut engine = Engine::new();
        engine.set_function(Function::AccentSet);
        engine.set_parameter(0, 0); // 10 steps on the active algorithm
        assert_eq!(engine.accent_set.num_steps(), 10);
        // The inactive overdub sequencer holds its power-on derivation.
        assert_eq!(engine.accent_overdub.num_steps(), 16);
    }

    #[test]
    fn test_copy_parameters_defers_configuration() {
        let mut engine = Engine::new();
        engine.set_function(Function::AccentSet);
        engine.copy_parameters(&[0, 32768, 32768, 32768]).unwrap();
        assert_eq!(
            engine.accent_set.num_steps(),
            12,
            "bulk copy alone must not reconfigure"
        );
        engine.set_function(Function::AccentSet);
        assert_eq!(engine.accent_set.num_steps(), 10);
    }

    #[test]
    fn test_copy_parameters_rejects_wide_vectors() {
        let mut engine = Engine::new();
        let result = engine.copy_parameters(&[0; 5]);
        assert_eq!(
            result,
            Err(EngineError::TooManyParameters { supplied: 5 })
        );
    }

    #[test]
    fn test_init_assigns_channel_defaults() {
        let mut engine = Engine::new();
        engine.init(0);
        assert_eq!(engine.function(), Function::AccentOverdub);
        engine.init(1);
        assert_eq!(engine.function(), Function::Octave);
    }

    #[test]
    fn test_budget_policy_swaps_to_fallback() {
        let mut engine = Engine::new();
        engine.set_budget_policy(Some(BudgetPolicy {
            guarded: Function::External,
            fallback: Function::Pattern,
            low: 64_500,
            high: 65_000,
        }));
        engine.set_function(Function::External);
        // Knobs at center sit under the low threshold, so the guarded voice
        // is not allowed.
        assert_eq!(engine.function(), Function::Pattern);
    }

    #[test]
    fn test_budget_policy_allows_guarded_at_the_top() {
        let mut engine = Engine::new();
        engine.set_budget_policy(Some(BudgetPolicy {
            guarded: Function::External,
            fallback: Function::Pattern,
            low: 64_500,
            high: 65_000,
        }));
        engine.copy_parameters(&[32768, 65_200, 65_300, 32768]).unwrap();
        engine.set_function(Function::External);
        assert_eq!(engine.function(), Function::External);
        // Easing one knob down past the low threshold drops back.
        engine.set_parameter(1, 60_000);
        assert_eq!(engine.function(), Function::Pattern);
    }

    #[test]
    fn test_budget_policy_ignores_unrelated_functions() {
        let mut engine = Engine::new();
        engine.set_budget_policy(Some(BudgetPolicy {
            guarded: Function::External,
            fallback: Function::Pattern,
            low: 64_500,
            high: 65_000,
        }));
        engine.set_function(Function::Vari);
        assert_eq!(engine.function(), Function::Vari);
    }

    #[test]
    fn test_brightness_is_zero_off_the_chromatic_family() {
        let mut engine = Engine::new();
        engine.set_function(Function::Pattern);
        assert_eq!(engine.frame_brightness(), 0);
        assert_eq!(engine.note_brightness(), 0);
        engine.set_function(Function::Grid);
        assert_eq!(engine.frame_brightness(), 85);
    }
}
