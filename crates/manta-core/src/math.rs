//! Mathematical utility functions for the manta DSP path.
//!
//! All functions are allocation-free and suitable for `no_std`; transcendental
//! math goes through `libm` so the core builds without a platform libm.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Waveshaping
//!
//! - [`soft_drive`] - The lanes' soft distortion stage: a unity-slope tanh
//!   ratio shaper crossfaded with the dry sample
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`ms_to_samples`] / [`samples_to_ms`] - Time conversions
//! - [`flush_denormal`] - Subnormal float protection for feedback paths

use libm::{expf, fabsf, logf, tanhf};

/// Slope of the drive waveshaper's tanh ratio.
pub const DRIVE_RATIO: f32 = 128.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use manta_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// # Example
/// ```rust
/// use manta_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Soft distortion stage: `tanh(128x)/128` crossfaded with the dry sample.
///
/// The shaped signal is the ratio form `x · tanh(kx)/(kx)` with
/// `k = DRIVE_RATIO`, which has unity slope at the origin and saturates at
/// `±1/k`. When the denominator `kx` underflows, the shaper returns the input
/// unchanged instead of dividing by zero.
///
/// `amount` selects the blend: 0.0 = bypass, 1.0 = fully driven.
#[inline]
pub fn soft_drive(x: f32, amount: f32) -> f32 {
    let denom = DRIVE_RATIO * x;
    let shaped = if fabsf(denom) < 1e-12 {
        x
    } else {
        tanhf(denom) / DRIVE_RATIO
    };
    lerp(x, shaped, amount)
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Convert samples to milliseconds.
#[inline]
pub fn samples_to_ms(samples: f32, sample_rate: f32) -> f32 {
    samples * 1000.0 / sample_rate
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU performance degradation on most
/// architectures. This replaces values below 1e-20 with zero, providing
/// margin before the IEEE 754 subnormal range begins. Use in recursive
/// filter state that can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if fabsf(x) < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!(
            (original - back).abs() < 1e-5,
            "roundtrip failed: {original} -> {db} -> {back}"
        );
    }

    #[test]
    fn db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((db_to_linear(6.0206) - 2.0).abs() < 0.001);
    }

    #[test]
    fn soft_drive_bypass_at_zero_amount() {
        for x in [-0.9f32, -0.1, 0.0, 0.3, 1.0] {
            assert_eq!(soft_drive(x, 0.0), x);
        }
    }

    #[test]
    fn soft_drive_saturates_when_fully_driven() {
        // tanh(128x)/128 is bounded by 1/128 in magnitude.
        for x in [0.5f32, 1.0, 4.0] {
            let y = soft_drive(x, 1.0);
            assert!(y > 0.0 && y <= 1.0 / DRIVE_RATIO + 1e-6, "got {y}");
        }
    }

    #[test]
    fn soft_drive_unity_slope_near_origin() {
        // For tiny inputs the ratio tends to 1, so full drive ~= identity.
        let x = 1e-4f32;
        let y = soft_drive(x, 1.0);
        assert!((y - x).abs() < x * 0.01, "expected ~{x}, got {y}");
    }

    #[test]
    fn soft_drive_guard_returns_input() {
        assert_eq!(soft_drive(0.0, 1.0), 0.0);
        let tiny = 1e-16f32;
        assert_eq!(soft_drive(tiny, 1.0), tiny);
    }

    #[test]
    fn soft_drive_is_odd() {
        for x in [0.01f32, 0.2, 0.8] {
            let pos = soft_drive(x, 1.0);
            let neg = soft_drive(-x, 1.0);
            assert!((pos + neg).abs() < 1e-7);
        }
    }

    #[test]
    fn ms_samples_conversion() {
        let sample_rate = 48000.0;
        assert_eq!(ms_to_samples(10.0, sample_rate), 480.0);
        assert!((samples_to_ms(480.0, sample_rate) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn denormal_flush() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-21), 0.0);
    }
}
