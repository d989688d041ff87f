//! Manta Engine - the three-lane band-pass effect core
//!
//! This crate assembles the manta-core primitives into the effect's DSP
//! path: three independently modulated band-pass/drive/delay lanes, an
//! optional 2× oversampled signal path, and the host-facing block processor
//! that drives both from atomically published parameters.
//!
//! # Components
//!
//! - [`Lane`] - One filter cascade → soft drive → fractional delay → gain path
//! - [`MantaEngine`] - Exactly three lanes sharing one write head; output is
//!   the lane sum (all lanes disabled means silence, not bypass)
//! - [`Oversampler`] - Windowed-sinc 2× up/down conversion with shared ring
//!   addressing and reported round-trip latency
//! - [`MantaProcessor`] - Once-per-block glue: parameter snapshot →
//!   (upsample) → engine → (downsample)
//!
//! # Real-time Contract
//!
//! Every buffer is allocated during `prepare` while the audio graph is
//! suspended; the `process`/`upsample`/`downsample` entry points never
//! allocate, lock, or block, and `num_samples == 0` is a valid no-op
//! everywhere. Parameters cross the thread boundary through
//! [`ParamBank`]'s atomic cells, read once per block.
//!
//! # Example
//!
//! ```rust
//! use manta_core::Tuning;
//! use manta_engine::{MantaProcessor, ParamBank};
//!
//! let bank = ParamBank::default();
//! let mut processor = MantaProcessor::new(Tuning::default());
//! processor.prepare(48000.0, 256);
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! let mut buffer: [&mut [f32]; 2] = [&mut left, &mut right];
//! processor.process(&bank, &mut buffer, 256);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod engine;
pub mod lane;
pub mod oversample;
pub mod processor;

// Re-export main types at crate root
pub use engine::{MAX_DELAY_MS, MantaEngine, NUM_LANES};
pub use lane::{Lane, LaneParams, MAX_CHANNELS, MIN_DELAY_MS};
pub use oversample::{OVERSAMPLE_FACTOR, Oversampler, design_kernel};
pub use processor::{LaneParamCells, MantaProcessor, ParamBank};
