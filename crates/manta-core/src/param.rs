//! Lock-free automation parameter cells.
//!
//! Parameters originate on a UI or host-automation thread while the audio
//! thread consumes them inside a hard real-time callback. [`AtomicParam`]
//! bridges the two with plain atomic loads and stores — no locks, no
//! blocking, no allocation. Each cell carries two independently atomic views:
//!
//! - the **raw** normalized value, as last set by the user or host
//! - the **modulated** normalized value, the raw value after macro/LFO
//!   combination by the automation layer
//!
//! The audio thread reads each view at most once per block and feeds it into
//! a [`Ramp`](crate::Ramp); a one-block-stale value is acceptable because the
//! smoothing stage absorbs the discontinuity. There is no consistency
//! requirement across different cells read in the same block.
//!
//! f32 values are stored bit-cast in `AtomicU32`, the portable way to get an
//! atomic float on stable Rust.

use core::sync::atomic::{AtomicU32, Ordering};

/// Mapping from the normalized `[0, 1]` range to parameter units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// `min + v * (max - min)`
    #[default]
    Linear,
    /// `min * (max/min)^v` — requires `min > 0`; natural for frequencies
    /// and delay times.
    Logarithmic,
}

/// One automated parameter: normalized raw + modulated views plus the
/// denormalization range.
///
/// Setters take `&self` (interior mutability through atomics) so a single
/// shared reference can serve both the writer and the reader thread.
#[derive(Debug)]
pub struct AtomicParam {
    raw: AtomicU32,
    modulated: AtomicU32,
    min: f32,
    max: f32,
    scale: ParamScale,
}

impl AtomicParam {
    /// Create a cell with a denormalization range and a default value given
    /// in parameter units. Both views start at the default.
    pub fn new(min: f32, max: f32, default: f32, scale: ParamScale) -> Self {
        let cell = Self {
            raw: AtomicU32::new(0),
            modulated: AtomicU32::new(0),
            min,
            max,
            scale,
        };
        let normalized = cell.normalize(default);
        cell.set_raw(normalized);
        cell.set_modulated(normalized);
        cell
    }

    /// Store a new raw normalized value (writer thread).
    #[inline]
    pub fn set_raw(&self, normalized: f32) {
        self.raw
            .store(normalized.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    /// Store a new modulated normalized value (writer thread).
    #[inline]
    pub fn set_modulated(&self, normalized: f32) {
        self.modulated
            .store(normalized.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    /// Raw normalized value in `[0, 1]`.
    #[inline]
    pub fn raw(&self) -> f32 {
        f32::from_bits(self.raw.load(Ordering::Relaxed))
    }

    /// Modulated normalized value in `[0, 1]`.
    #[inline]
    pub fn modulated(&self) -> f32 {
        f32::from_bits(self.modulated.load(Ordering::Relaxed))
    }

    /// Raw value mapped into parameter units.
    #[inline]
    pub fn value(&self) -> f32 {
        self.denormalize(self.raw())
    }

    /// Modulated value mapped into parameter units. This is what the audio
    /// thread feeds into the ramps, once per block.
    #[inline]
    pub fn modulated_value(&self) -> f32 {
        self.denormalize(self.modulated())
    }

    /// Map a normalized value into parameter units.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let v = normalized.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => self.min + v * (self.max - self.min),
            ParamScale::Logarithmic => {
                debug_assert!(self.min > 0.0);
                self.min * libm::powf(self.max / self.min, v)
            }
        }
    }

    /// Map a value in parameter units back to `[0, 1]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let v = value.clamp(self.min.min(self.max), self.max.max(self.min));
        match self.scale {
            ParamScale::Linear => {
                if (self.max - self.min).abs() < f32::EPSILON {
                    0.0
                } else {
                    (v - self.min) / (self.max - self.min)
                }
            }
            ParamScale::Logarithmic => {
                debug_assert!(self.min > 0.0);
                libm::logf(v / self.min) / libm::logf(self.max / self.min)
            }
        }
    }
}
