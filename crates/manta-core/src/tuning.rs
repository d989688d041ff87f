//! Pitch-to-frequency conversion.
//!
//! The lanes express their filter cutoff as a pitch (note number plus detune
//! in cents) rather than a raw frequency, so sweeping a lane tracks musical
//! intervals. [`Tuning`] performs the conversion with a configurable
//! notes-per-octave and reference pitch; it is plain immutable data, injected
//! into the engine at construction and shared by reference — never reached
//! through global state.

use libm::exp2f;

/// Equal-tempered pitch-to-frequency table.
///
/// `hz = reference_hz · 2^((note + cents/100 − reference_note) / notes_per_octave)`
///
/// The default is 12-TET with A4 = 440 Hz at note 69.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    notes_per_octave: f32,
    reference_hz: f32,
    reference_note: f32,
}

impl Tuning {
    /// Create a tuning with the given division of the octave and reference.
    pub fn new(notes_per_octave: f32, reference_hz: f32, reference_note: f32) -> Self {
        Self {
            notes_per_octave,
            reference_hz,
            reference_note,
        }
    }

    /// Convert a note number plus a detune offset in cents to Hz.
    ///
    /// "Cents" are hundredths of one note step, whatever the octave division.
    #[inline]
    pub fn pitch_to_hz(&self, note: f32, detune_cents: f32) -> f32 {
        let steps = note + detune_cents / 100.0 - self.reference_note;
        self.reference_hz * exp2f(steps / self.notes_per_octave)
    }

    /// Notes per octave of this tuning.
    #[inline]
    pub fn notes_per_octave(&self) -> f32 {
        self.notes_per_octave
    }

    /// Reference frequency in Hz.
    #[inline]
    pub fn reference_hz(&self) -> f32 {
        self.reference_hz
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(12.0, 440.0, 69.0)
    }
}
