//! Manta Core - DSP primitives for the manta multi-lane band-pass effect
//!
//! This crate provides the allocation-free building blocks the manta engine
//! is assembled from. Everything here is designed for a hard real-time audio
//! callback: buffers are sized once during `prepare`, processing entry points
//! never allocate, never lock, and never throw.
//!
//! # Core Abstractions
//!
//! ## Ring Addressing
//!
//! - [`WriteHead`] - Circular write-position counter shared by several ring
//!   buffers so they stay index-synchronized
//! - [`DelayRing`] - Fractional delay ring addressed by an external head
//!
//! ## Control Signals
//!
//! - [`Ramp`] - Two-stage smoother (block-linear ramp + one-pole lowpass)
//!   turning a scalar target into a click-free per-sample control buffer
//! - [`AtomicParam`] - Lock-free parameter cell with raw and modulated views
//!   for cross-thread automation
//!
//! ## Filters
//!
//! - [`BandPass`] - Second-order band-pass section with per-sample
//!   coefficient recomputation (RBJ cookbook, constant 0 dB peak gain)
//! - [`BandPassCascade`] - Up to four identical sections for steeper slopes
//!
//! ## Utilities
//!
//! - [`Tuning`] - Pitch-to-frequency conversion with configurable
//!   notes-per-octave and reference pitch
//! - Math functions: [`db_to_linear`], [`soft_drive`], [`lerp`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature in
//! your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! manta-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Compile-time-bounded collections**: Fixed section counts instead of
//!   dynamic dispatch, so per-sample cost stays predictable
//! - **Never fail at runtime**: numeric hot spots degrade to pass-through
//!   instead of producing NaN/Inf or raising errors

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod bandpass;
pub mod delay;
pub mod math;
pub mod param;
pub mod ramp;
pub mod tuning;
pub mod write_head;

// Re-export main types at crate root
pub use bandpass::{BandPass, BandPassCascade, MAX_STAGES};
pub use delay::DelayRing;
pub use math::{
    db_to_linear, flush_denormal, lerp, linear_to_db, ms_to_samples, samples_to_ms, soft_drive,
};
pub use param::{AtomicParam, ParamScale};
pub use ramp::Ramp;
pub use tuning::Tuning;
pub use write_head::WriteHead;
