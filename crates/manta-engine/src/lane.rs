//! One lane of the multi-lane engine.
//!
//! A lane is an independent signal path: band-pass cascade → soft drive →
//! feed-forward fractional delay → output gain. Each of its five continuous
//! controls (cutoff-as-pitch, resonance, drive, delay time, gain) runs
//! through its own [`Ramp`], so the per-sample loop only ever sees smoothed
//! values.
//!
//! Lanes never read each other's state. The only thing they share is the
//! engine's [`WriteHead`], which guarantees identical ring addressing for
//! every delay ring of the same size.

use manta_core::{
    BandPassCascade, DelayRing, Ramp, Tuning, WriteHead, db_to_linear, ms_to_samples,
    samples_to_ms, soft_drive,
};

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Channel capacity of a lane (stereo).
pub const MAX_CHANNELS: usize = 2;

/// Lowest delay time a lane will smooth toward, in milliseconds.
///
/// Reads below one sample of delay would land on the ring slot about to be
/// overwritten, so the floor keeps the read strictly behind the write.
pub const MIN_DELAY_MS: f32 = 1.0;

// Per-control smoothing time constants. Cutoff and resonance move slowly so
// audio-rate retuning stays clean; the rest can be snappier.
const CUTOFF_SMOOTH_MS: f32 = 20.0;
const RESONANCE_SMOOTH_MS: f32 = 20.0;
const DRIVE_SMOOTH_MS: f32 = 10.0;
const DELAY_SMOOTH_MS: f32 = 30.0;
const GAIN_SMOOTH_MS: f32 = 10.0;

/// Highest normalized cutoff a lane will ask of the filter. The cascade
/// itself does not clamp, so the lane enforces its side of that contract.
const MAX_NORMALIZED_CUTOFF: f32 = 0.49;

/// Lowest quality factor the cascade is stable at.
const MIN_RESONANCE: f32 = 1.0;

/// Per-block parameter targets for one lane.
#[derive(Debug, Clone, Copy)]
pub struct LaneParams {
    /// A disabled lane contributes silence and skips all processing.
    pub enabled: bool,
    /// Filter center as a pitch (note number for the engine's [`Tuning`]).
    pub pitch: f32,
    /// Quality factor, `>= 1`.
    pub resonance: f32,
    /// Active cascade sections, 1–4.
    pub stages: usize,
    /// Drive blend: 0.0 = bypass, 1.0 = fully driven.
    pub drive: f32,
    /// Delay time in milliseconds.
    pub delay_ms: f32,
    /// Output gain in dB.
    pub gain_db: f32,
}

impl Default for LaneParams {
    fn default() -> Self {
        Self {
            enabled: true,
            pitch: 69.0,
            resonance: 1.0,
            stages: 1,
            drive: 0.0,
            delay_ms: 50.0,
            gain_db: 0.0,
        }
    }
}

/// One filter/drive/delay/gain signal path.
pub struct Lane {
    scratch: [Vec<f32>; MAX_CHANNELS],
    cascades: [BandPassCascade; MAX_CHANNELS],
    delays: [DelayRing; MAX_CHANNELS],
    cutoff: Ramp,
    resonance: Ramp,
    drive: Ramp,
    delay_time: Ramp,
    gain: Ramp,
    sample_rate: f32,
    max_delay_ms: f32,
}

impl Lane {
    /// Create a lane resting at neutral settings. Call
    /// [`prepare`](Self::prepare) before processing.
    pub fn new() -> Self {
        Self {
            scratch: [Vec::new(), Vec::new()],
            cascades: [BandPassCascade::default(), BandPassCascade::default()],
            delays: [DelayRing::new(), DelayRing::new()],
            cutoff: Ramp::new(0.1),
            resonance: Ramp::new(MIN_RESONANCE),
            drive: Ramp::new(0.0),
            delay_time: Ramp::new(MIN_DELAY_MS),
            gain: Ramp::new(0.0),
            sample_rate: 44100.0,
            max_delay_ms: 0.0,
        }
    }

    /// Allocate scratch and delay storage for a sample rate, block size and
    /// shared ring length. Only valid while processing is suspended.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize, ring_len: usize) {
        self.sample_rate = sample_rate;
        self.max_delay_ms = samples_to_ms(ring_len.saturating_sub(1) as f32, sample_rate);

        for channel in &mut self.scratch {
            channel.clear();
            channel.resize(max_block, 0.0);
        }
        for delay in &mut self.delays {
            delay.prepare(ring_len);
        }
        for cascade in &mut self.cascades {
            cascade.clear();
        }

        self.cutoff.prepare(sample_rate, max_block, CUTOFF_SMOOTH_MS);
        self.resonance
            .prepare(sample_rate, max_block, RESONANCE_SMOOTH_MS);
        self.drive.prepare(sample_rate, max_block, DRIVE_SMOOTH_MS);
        self.delay_time
            .prepare(sample_rate, max_block, DELAY_SMOOTH_MS);
        self.gain.prepare(sample_rate, max_block, GAIN_SMOOTH_MS);
    }

    /// Process one block into the lane's scratch buffer.
    ///
    /// The engine advances `head` once per block before any lane runs; every
    /// lane indexes the same position sequence.
    pub fn process(
        &mut self,
        input: &[&mut [f32]],
        head: &WriteHead,
        tuning: &Tuning,
        params: &LaneParams,
        num_samples: usize,
    ) {
        let channels = input.len().min(MAX_CHANNELS);
        if num_samples == 0 || channels == 0 {
            return;
        }
        if !params.enabled {
            for channel in &mut self.scratch[..channels] {
                channel[..num_samples].fill(0.0);
            }
            return;
        }

        for (channel, source) in self.scratch[..channels].iter_mut().zip(input) {
            channel[..num_samples].copy_from_slice(&source[..num_samples]);
        }
        for cascade in &mut self.cascades[..channels] {
            cascade.set_active_stages(params.stages);
        }

        // Caller-side clamps: the cascade has no internal guards.
        let hz = tuning.pitch_to_hz(params.pitch, 0.0);
        let cutoff_target = (hz / self.sample_rate).clamp(0.0, MAX_NORMALIZED_CUTOFF);
        let resonance_target = params.resonance.max(MIN_RESONANCE);
        let delay_target = params.delay_ms.clamp(MIN_DELAY_MS, self.max_delay_ms);

        let cutoff = self.cutoff.apply(cutoff_target, num_samples);
        let resonance = self.resonance.apply(resonance_target, num_samples);
        let drive = self.drive.apply(params.drive.clamp(0.0, 1.0), num_samples);
        let delay_ms = self.delay_time.apply(delay_target, num_samples);
        let gain_db = self.gain.apply(params.gain_db, num_samples);

        let positions = head.positions();
        let sample_rate = self.sample_rate;

        for i in 0..num_samples {
            let pos = positions[i];
            let delay_samples = ms_to_samples(delay_ms[i], sample_rate);
            let gain = db_to_linear(gain_db[i]);

            // Channel 0 pays for the trig; the other channel mirrors the
            // instantaneous coefficients against its own history.
            let (first, rest) = self.cascades.split_at_mut(1);
            first[0].set_cutoff_and_q(cutoff[i], resonance[i]);
            for cascade in &mut rest[..channels - 1] {
                cascade.copy_coefficients_from(&first[0]);
            }

            for c in 0..channels {
                let x = self.scratch[c][i];
                let shaped = soft_drive(self.cascades[c].process(x), drive[i]);
                let delayed = self.delays[c].read(pos, delay_samples);
                self.delays[c].write(pos, shaped);
                self.scratch[c][i] = delayed * gain;
            }
        }
    }

    /// The lane's contribution for the current block (valid up to the block's
    /// sample count).
    #[inline]
    pub fn output(&self, channel: usize) -> &[f32] {
        &self.scratch[channel]
    }

    /// Clear filter history, delay rings and scratch without reallocating.
    pub fn reset(&mut self) {
        for cascade in &mut self.cascades {
            cascade.clear();
        }
        for delay in &mut self.delays {
            delay.clear();
        }
        for channel in &mut self.scratch {
            channel.fill(0.0);
        }
    }
}

impl Default for Lane {
    fn default() -> Self {
        Self::new()
    }
}
