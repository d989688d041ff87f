//! Band-pass biquad section and uniform cascade.
//!
//! A second-order IIR band-pass with the RBJ cookbook "constant 0 dB peak
//! gain" coefficients, in Direct Form I:
//!
//! ```text
//! y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
//!                - a1*y[n-1] - a2*y[n-2]
//! ```
//!
//! Coefficient recomputation is a sine, a cosine, and a handful of multiplies;
//! cheap enough to run every sample, which is how the lanes drive it when
//! cutoff and resonance are modulated at audio rate.
//!
//! [`BandPassCascade`] chains up to four identical sections for steeper
//! roll-off. Only the first section computes trig; the rest mirror its
//! coefficients via [`BandPass::copy_coefficients_from`] while keeping their
//! own two-sample history.

use core::f32::consts::TAU;
use libm::{cosf, sinf};

/// Maximum number of sections in a cascade.
pub const MAX_STAGES: usize = 4;

/// One band-pass biquad section.
///
/// Cutoff is normalized to the sample rate (`fc ∈ [0, 0.5)`), quality factor
/// `q ≥ 1`. Values outside those ranges are the caller's responsibility: the
/// section performs no internal clamping and can become numerically unstable
/// when driven past Nyquist or below unity Q.
#[derive(Debug, Clone)]
pub struct BandPass {
    // Feedforward coefficients (b1 is structurally 0 for this topology but
    // kept so sections copy as a full coefficient set).
    b0: f32,
    b1: f32,
    b2: f32,
    // Feedback coefficients, normalized by a0.
    a1: f32,
    a2: f32,
    // Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,
    // Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl BandPass {
    /// Create a section tuned to the given startup cutoff and Q.
    pub fn new(cutoff: f32, q: f32) -> Self {
        let mut section = Self {
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        section.set_cutoff_and_q(cutoff, q);
        section
    }

    /// Recompute coefficients for a normalized cutoff and quality factor.
    ///
    /// `alpha = sin(ω) / (2q)` with `ω = 2π·cutoff`; the five coefficients
    /// are normalized by `a0 = 1 + alpha` so the section is unity-gain at
    /// the center frequency.
    #[inline]
    pub fn set_cutoff_and_q(&mut self, cutoff: f32, q: f32) {
        let omega = TAU * cutoff;
        let sin_omega = sinf(omega);
        let cos_omega = cosf(omega);
        let alpha = sin_omega / (2.0 * q);

        let a0_inv = 1.0 / (1.0 + alpha);
        self.b0 = alpha * a0_inv;
        self.b1 = 0.0;
        self.b2 = -alpha * a0_inv;
        self.a1 = -2.0 * cos_omega * a0_inv;
        self.a2 = (1.0 - alpha) * a0_inv;
    }

    /// Mirror another section's coefficients without recomputing trig.
    ///
    /// History is untouched: the receiving section keeps filtering its own
    /// signal, just with the donor's instantaneous response.
    #[inline]
    pub fn copy_coefficients_from(&mut self, other: &Self) {
        self.b0 = other.b0;
        self.b1 = other.b1;
        self.b2 = other.b2;
        self.a1 = other.a1;
        self.a2 = other.a2;
    }

    /// Process a single sample through the Direct Form I difference equation.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clear the two-sample input/output history without touching
    /// coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for BandPass {
    fn default() -> Self {
        Self::new(0.25, 1.0)
    }
}

/// Cascade of up to [`MAX_STAGES`] identical band-pass sections.
///
/// Each additional active section adds roughly 12 dB/octave of extra
/// roll-off symmetric around the same center frequency while the response at
/// the center stays near unity. The section array is fixed-size; the active
/// count selects how many are chained.
#[derive(Debug, Clone)]
pub struct BandPassCascade {
    sections: [BandPass; MAX_STAGES],
    stages: usize,
}

impl BandPassCascade {
    /// Create a cascade with all sections tuned to the startup cutoff/Q and
    /// one active stage.
    pub fn new(cutoff: f32, q: f32) -> Self {
        Self {
            sections: [
                BandPass::new(cutoff, q),
                BandPass::new(cutoff, q),
                BandPass::new(cutoff, q),
                BandPass::new(cutoff, q),
            ],
            stages: 1,
        }
    }

    /// Select how many sections are chained, clamped to `[1, MAX_STAGES]`.
    pub fn set_active_stages(&mut self, stages: usize) {
        self.stages = stages.clamp(1, MAX_STAGES);
    }

    /// Number of active sections.
    #[inline]
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Retune the cascade: the first section recomputes coefficients, the
    /// remaining active sections copy them.
    #[inline]
    pub fn set_cutoff_and_q(&mut self, cutoff: f32, q: f32) {
        let (first, rest) = self.sections.split_at_mut(1);
        first[0].set_cutoff_and_q(cutoff, q);
        for section in &mut rest[..self.stages.saturating_sub(1)] {
            section.copy_coefficients_from(&first[0]);
        }
    }

    /// Mirror another cascade's coefficients section-by-section.
    ///
    /// Used by secondary channels so only one channel per lane pays for
    /// trig recomputation.
    #[inline]
    pub fn copy_coefficients_from(&mut self, other: &Self) {
        for (section, donor) in self.sections[..self.stages]
            .iter_mut()
            .zip(&other.sections[..self.stages])
        {
            section.copy_coefficients_from(donor);
        }
    }

    /// Run one sample through the active sections in series.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut signal = input;
        for section in &mut self.sections[..self.stages] {
            signal = section.process(signal);
        }
        signal
    }

    /// Clear every section's history.
    pub fn clear(&mut self) {
        for section in &mut self.sections {
            section.clear();
        }
    }
}

impl Default for BandPassCascade {
    fn default() -> Self {
        Self::new(0.25, 1.0)
    }
}
