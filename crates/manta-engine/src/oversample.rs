//! 2× oversampling around the engine's nonlinear path.
//!
//! The drive stage generates harmonics that can exceed Nyquist and alias
//! back into the audible range. Running the engine at twice the host rate
//! pushes those harmonics below the working Nyquist; the round trip is:
//!
//! ```text
//! Input → zero-stuff ×2 → up FIR → engine at 2×fs → down FIR → decimate ÷2 → Output
//! ```
//!
//! Both FIR low-passes are windowed-sinc kernels (ideal sinc × Blackman
//! window) designed at prepare time against the 2× rate, so their shape
//! tracks the negotiated sample rate instead of being baked in. The up- and
//! down-filter state rings share one [`WriteHead`], advanced once per 2×
//! block, which keeps their addressing aligned with zero bookkeeping.
//!
//! The kernels are symmetric (linear phase); a kernel's group delay is half
//! its length, and the reported round-trip latency is the sum of both halves
//! expressed at the base rate.

use crate::lane::MAX_CHANNELS;
use core::f32::consts::{PI, TAU};
use libm::{ceilf, cosf, fabsf, sinf};
use manta_core::WriteHead;

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Fixed oversampling ratio. Only 2× is modeled.
pub const OVERSAMPLE_FACTOR: usize = 2;

// Default kernel design, as fractions of the base sample rate. The stopband
// edge lands exactly on the base Nyquist: 0.45·fs + 0.10·fs / 2 = 0.5·fs.
const KERNEL_CUTOFF_RATIO: f32 = 0.45;
const KERNEL_TRANSITION_RATIO: f32 = 0.10;

/// Design a windowed-sinc low-pass FIR for the oversampled rate.
///
/// The kernel length is chosen so the requested transition band is
/// achievable (`length ≈ 4 / transition_normalized`), rounded up to an even
/// count. DC gain is normalized to 2 for the upsampling kernel — zero
/// stuffing halves the signal energy and the passband gain restores it — and
/// to 1 for the downsampling kernel.
///
/// Latency of a kernel is `length / 2`, valid because the result is
/// symmetric (linear phase).
pub fn design_kernel(
    sample_rate: f32,
    cutoff_hz: f32,
    transition_hz: f32,
    upsampling: bool,
) -> Vec<f32> {
    let oversampled_rate = sample_rate * OVERSAMPLE_FACTOR as f32;
    let transition_norm = transition_hz / oversampled_rate;

    let mut len = ceilf(4.0 / transition_norm) as usize;
    len += len & 1;
    len = len.max(4);

    // Cutoff as a fraction of the oversampled Nyquist for the sinc argument.
    let cutoff = cutoff_hz / (oversampled_rate * 0.5);
    let m = (len - 1) as f32;

    let mut kernel = Vec::with_capacity(len);
    for n in 0..len {
        let x = n as f32 - m * 0.5;
        let sinc = if fabsf(x) < 1e-7 {
            cutoff
        } else {
            sinf(PI * cutoff * x) / (PI * x)
        };
        // Blackman window: 0.42 - 0.5*cos(2πn/M) + 0.08*cos(4πn/M)
        let phase = TAU * n as f32 / m;
        let window = 0.42 - 0.5 * cosf(phase) + 0.08 * cosf(2.0 * phase);
        kernel.push(sinc * window);
    }

    let dc_gain = if upsampling { 2.0 } else { 1.0 };
    let sum: f32 = kernel.iter().sum();
    if fabsf(sum) > 1e-10 {
        let scale = dc_gain / sum;
        for coeff in &mut kernel {
            *coeff *= scale;
        }
    }

    kernel
}

/// FIR state ring addressed by the shared write head.
#[derive(Debug, Clone, Default)]
struct FirRing {
    buffer: Vec<f32>,
}

impl FirRing {
    fn prepare(&mut self, len: usize) {
        self.buffer.clear();
        self.buffer.resize(len, 0.0);
    }

    #[inline]
    fn write(&mut self, pos: usize, sample: f32) {
        self.buffer[pos] = sample;
    }

    /// Direct-form FIR sum over the whole kernel, newest sample first.
    #[inline]
    fn convolve(&self, kernel: &[f32], pos: usize) -> f32 {
        debug_assert!(kernel.len() <= self.buffer.len());
        let len = self.buffer.len();
        let mut acc = 0.0;
        let mut idx = pos;
        for &coeff in kernel {
            acc += coeff * self.buffer[idx];
            idx = if idx == 0 { len - 1 } else { idx - 1 };
        }
        acc
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
    }
}

/// 2× up/down conversion pair with shared ring addressing.
pub struct Oversampler {
    up_kernel: Vec<f32>,
    down_kernel: Vec<f32>,
    up_rings: [FirRing; MAX_CHANNELS],
    down_rings: [FirRing; MAX_CHANNELS],
    head: WriteHead,
    scratch: [Vec<f32>; MAX_CHANNELS],
    enabled: bool,
    sample_rate: f32,
}

impl Oversampler {
    /// Create a disabled oversampler. Call [`prepare`](Self::prepare) before
    /// enabling or processing.
    pub fn new() -> Self {
        Self {
            up_kernel: Vec::new(),
            down_kernel: Vec::new(),
            up_rings: [FirRing::default(), FirRing::default()],
            down_rings: [FirRing::default(), FirRing::default()],
            head: WriteHead::new(),
            scratch: [Vec::new(), Vec::new()],
            enabled: false,
            sample_rate: 44100.0,
        }
    }

    /// Design both kernels for `sample_rate` and size every ring and the 2×
    /// scratch for `max_block`. Only valid while processing is suspended.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize) {
        self.sample_rate = sample_rate;
        let cutoff = KERNEL_CUTOFF_RATIO * sample_rate;
        let transition = KERNEL_TRANSITION_RATIO * sample_rate;
        self.up_kernel = design_kernel(sample_rate, cutoff, transition, true);
        self.down_kernel = design_kernel(sample_rate, cutoff, transition, false);

        // Both state rings use the down-kernel length so one head serves both.
        let ring_len = self.down_kernel.len();
        debug_assert!(self.up_kernel.len() <= ring_len);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            kernel_len = ring_len,
            latency = ring_len / 2 / OVERSAMPLE_FACTOR,
            "oversampler prepare"
        );

        for ring in &mut self.up_rings {
            ring.prepare(ring_len);
        }
        for ring in &mut self.down_rings {
            ring.prepare(ring_len);
        }
        self.head.prepare(max_block * OVERSAMPLE_FACTOR, ring_len);
        for channel in &mut self.scratch {
            channel.clear();
            channel.resize(max_block * OVERSAMPLE_FACTOR, 0.0);
        }
    }

    /// Switch the oversampled path on or off.
    ///
    /// Only valid while the surrounding audio graph is suspended: toggling
    /// with a block in flight leaves the ring sizes inconsistent with
    /// in-flight read/write positions. That gate is owned by the caller and
    /// is not re-checked here.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether blocks currently route through the 2× path.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Round-trip latency in base-rate samples:
    /// `(up_latency + down_latency) / 2`. Zero while disabled.
    pub fn latency_samples(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        (self.up_kernel.len() / 2 + self.down_kernel.len() / 2) / OVERSAMPLE_FACTOR
    }

    /// Zero-stuff and filter one block into the internal 2× scratch.
    ///
    /// Advances the shared head by `2 * num_samples`; the following
    /// [`downsample`](Self::downsample) reuses the same position sequence.
    /// Disabled or zero-length calls are no-ops (the caller processes the
    /// input at the base rate instead).
    ///
    /// The interposed zero is written *before* each input sample, which
    /// together with the even kernel lengths keeps the round-trip delay on
    /// an integer base-rate sample.
    pub fn upsample(&mut self, input: &[&mut [f32]], num_samples: usize) {
        if !self.enabled || num_samples == 0 {
            return;
        }
        let channels = input.len().min(MAX_CHANNELS);
        self.head.advance(num_samples * OVERSAMPLE_FACTOR);

        for c in 0..channels {
            let ring = &mut self.up_rings[c];
            for i in 0..num_samples {
                let zero_pos = self.head[OVERSAMPLE_FACTOR * i];
                ring.write(zero_pos, 0.0);
                self.scratch[c][OVERSAMPLE_FACTOR * i] = ring.convolve(&self.up_kernel, zero_pos);

                let pos = self.head[OVERSAMPLE_FACTOR * i + 1];
                ring.write(pos, input[c][i]);
                self.scratch[c][OVERSAMPLE_FACTOR * i + 1] = ring.convolve(&self.up_kernel, pos);
            }
        }
    }

    /// Filter the 2× scratch and decimate into the caller's block.
    ///
    /// Every 2×-rate sample is pushed through the down filter's state ring;
    /// the convolution sum is only evaluated at the decimation points.
    pub fn downsample(&mut self, output: &mut [&mut [f32]], num_samples: usize) {
        if !self.enabled || num_samples == 0 {
            return;
        }
        let channels = output.len().min(MAX_CHANNELS);
        let total = num_samples * OVERSAMPLE_FACTOR;

        for c in 0..channels {
            let ring = &mut self.down_rings[c];
            for m in 0..total {
                let pos = self.head[m];
                ring.write(pos, self.scratch[c][m]);
                if m % OVERSAMPLE_FACTOR == 0 {
                    output[c][m / OVERSAMPLE_FACTOR] = ring.convolve(&self.down_kernel, pos);
                }
            }
        }
    }

    /// Mutable channel views of the 2× scratch, for running the engine on
    /// the oversampled signal between `upsample` and `downsample`.
    pub fn scratch_views(&mut self) -> [&mut [f32]; MAX_CHANNELS] {
        let (left, right) = self.scratch.split_at_mut(1);
        [left[0].as_mut_slice(), right[0].as_mut_slice()]
    }

    /// Clear filter state and scratch without redesigning kernels.
    pub fn reset(&mut self) {
        for ring in &mut self.up_rings {
            ring.clear();
        }
        for ring in &mut self.down_rings {
            ring.clear();
        }
        for channel in &mut self.scratch {
            channel.fill(0.0);
        }
        self.head.reset();
    }
}

impl Default for Oversampler {
    fn default() -> Self {
        Self::new()
    }
}
