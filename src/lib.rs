//! Realtime-safe modulation and sequencing engine for eurorack control
//! voltages.
//!
//! Four knobs and two gate inputs in, one bipolar CV/gate sample out, once
//! per audio tick. The [`engine::Engine`] owns the algorithm instances and
//! routes each tick to the selected one; the algorithms themselves live in
//! [`accent`], [`pattern`] and [`chromatic`], all built on saturating
//! fixed-point arithmetic and the shared [`quantize`] stage.
//!
//! Everything on the tick path is allocation-free and O(1) so it fits a
//! hard per-sample deadline; heavyweight collaborator voices render in
//! blocks through ring buffers instead (see [`modulator`]).

pub mod accent;
pub mod chromatic;
pub mod control;
pub mod engine;
pub mod modulator;
pub mod pattern;
pub mod quantize;

pub use control::{clip, Control, ControlMode, Parameters};
pub use engine::{BudgetPolicy, Engine, EngineError, Function};
pub use modulator::{BlockModulator, Modulator, Silence};
pub use quantize::quantize;

/// Samples rendered per block-refill of a buffered algorithm.
pub const BLOCK_SIZE: usize = 16;

/// Ring-buffer depth, per direction. Sized so the service loop can miss a
/// few refill opportunities before the tick path runs dry.
pub const RING_CAPACITY: usize = 64;
