//! Two-stage parameter ramp for click-free modulation.
//!
//! Audio parameters (cutoff, gain, delay time) need smooth transitions to
//! avoid audible "zipper noise" when values change. [`Ramp`] turns one scalar
//! target per block into a per-sample control buffer in two stages:
//!
//! 1. **Block-linear ramp**: interpolate from the last emitted sample to the
//!    target, reaching it exactly at the final sample of the block.
//! 2. **One-pole lowpass**: filter the ramp in place, which rounds the corner
//!    at block boundaries so consecutive blocks join without a slope
//!    discontinuity.
//!
//! The one-pole has the difference equation
//!
//! ```text
//! y[n] = a0 * x[n] + b1 * y[n-1],    a0 + b1 = 1
//! ```
//!
//! with `b1 = exp(-1 / tau_samples)`. Because `a0 + b1 = 1` the filter is
//! unity-gain at DC: holding a constant target converges to it exponentially
//! and never overshoots.
//!
//! ## Usage
//!
//! ```rust
//! use manta_core::Ramp;
//!
//! let mut gain = Ramp::new(1.0);
//! gain.prepare(48000.0, 256, 10.0); // 10 ms smoothing
//!
//! // In the audio callback, once per block:
//! let control = gain.apply(0.5, 256);
//! assert_eq!(control.len(), 256);
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;
use libm::expf;

/// Two-stage (block-linear + one-pole lowpass) control-signal generator.
///
/// The emitted sequence is continuous across block boundaries: the first
/// sample of any block continues the lowpass state left by the previous
/// block, no matter how the target jumped in between.
#[derive(Debug, Clone)]
pub struct Ramp {
    buffer: Vec<f32>,
    /// Last emitted sample; doubles as the lowpass state.
    current: f32,
    /// Input coefficient of the one-pole.
    a0: f32,
    /// Feedback coefficient of the one-pole (`a0 + b1 = 1`).
    b1: f32,
    sample_rate: f32,
}

impl Ramp {
    /// Create a ramp resting at `initial`. Smoothing is effectively instant
    /// until [`prepare`](Self::prepare) configures a time constant.
    pub fn new(initial: f32) -> Self {
        Self {
            buffer: Vec::new(),
            current: initial,
            a0: 1.0,
            b1: 0.0,
            sample_rate: 44100.0,
        }
    }

    /// Size the internal control buffer and derive the lowpass coefficient.
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `max_block` - Largest block `apply`/`hold` will be called with
    /// * `smoothing_time_ms` - Lowpass time constant in milliseconds
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize, smoothing_time_ms: f32) {
        self.sample_rate = sample_rate;
        self.buffer.clear();
        self.buffer.resize(max_block, 0.0);
        self.set_time_constant_ms(smoothing_time_ms);
    }

    /// Set the lowpass time constant directly in samples.
    ///
    /// `b1 = exp(-1 / samples)`, `a0 = 1 - b1`. A non-positive value makes
    /// the filter instant (`a0 = 1`).
    pub fn set_time_constant_samples(&mut self, samples: f32) {
        if samples <= 0.0 {
            self.b1 = 0.0;
        } else {
            self.b1 = expf(-1.0 / samples);
        }
        self.a0 = 1.0 - self.b1;
    }

    /// Set the lowpass time constant in milliseconds.
    pub fn set_time_constant_ms(&mut self, time_ms: f32) {
        self.set_time_constant_samples(time_ms * self.sample_rate / 1000.0);
    }

    /// Set the lowpass by its equivalent cutoff frequency in Hz
    /// (`tau = 1 / (2π·freq)`).
    pub fn set_cutoff_hz(&mut self, freq_hz: f32) {
        if freq_hz <= 0.0 {
            self.set_time_constant_samples(0.0);
        } else {
            self.set_time_constant_samples(self.sample_rate / (core::f32::consts::TAU * freq_hz));
        }
    }

    /// Produce `num_samples` of smoothed control signal approaching `target`.
    ///
    /// The linear stage reaches `target` exactly at the last sample of the
    /// block; the lowpass stage then filters the ramp in place, so the
    /// *emitted* final sample lags the target by the filter's step response.
    /// The last output sample becomes the new resume point.
    pub fn apply(&mut self, target: f32, num_samples: usize) -> &[f32] {
        if num_samples == 0 {
            return &self.buffer[..0];
        }
        debug_assert!(num_samples <= self.buffer.len());

        let start = self.current;
        let step = (target - start) / num_samples as f32;
        let mut y = self.current;
        for (i, slot) in self.buffer[..num_samples].iter_mut().enumerate() {
            let ramped = start + step * (i + 1) as f32;
            y = self.a0 * ramped + self.b1 * y;
            *slot = y;
        }
        self.current = y;
        &self.buffer[..num_samples]
    }

    /// Re-emit the held value for `num_samples` samples.
    ///
    /// Used when no new target is supplied for a block. The lowpass holding
    /// its own state is a fixed point, so the output is a constant fill of
    /// [`current`](Self::current).
    pub fn hold(&mut self, num_samples: usize) -> &[f32] {
        debug_assert!(num_samples <= self.buffer.len());
        self.buffer[..num_samples].fill(self.current);
        &self.buffer[..num_samples]
    }

    /// Snap the ramp state to `value` (e.g. when re-preparing a lane).
    pub fn reset_to(&mut self, value: f32) {
        self.current = value;
    }

    /// Last emitted sample.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// One-pole coefficients `(a0, b1)`; always sums to 1.
    #[inline]
    pub fn coefficients(&self) -> (f32, f32) {
        (self.a0, self.b1)
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(0.0)
    }
}
