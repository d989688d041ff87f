//! Host-facing block processor.
//!
//! Ties the parameter bank, the oversampler and the three-lane engine into
//! the once-per-block control flow a plugin wrapper drives:
//!
//! 1. read each automated parameter cell once (one relaxed atomic load per
//!    view, never a lock),
//! 2. optionally upsample the block to the 2× path,
//! 3. run the engine — at the 2× rate when oversampling is on,
//! 4. optionally downsample back to the host rate.
//!
//! The host glue negotiates sample rate and maximum block size through
//! [`prepare`](MantaProcessor::prepare) and reports
//! [`latency_samples`](MantaProcessor::latency_samples) back for delay
//! compensation. Reconfiguration — `prepare` and
//! [`set_oversampling`](MantaProcessor::set_oversampling) — is only valid
//! while the host guarantees the audio thread is parked; that suspension
//! gate lives outside this crate and is not re-checked here.

use crate::engine::{MantaEngine, NUM_LANES};
use crate::lane::{LaneParams, MAX_CHANNELS};
use crate::oversample::{OVERSAMPLE_FACTOR, Oversampler};
use manta_core::{AtomicParam, ParamScale, Tuning};

/// The atomic cells for one lane's automated parameters.
///
/// Continuous controls are consumed through their modulated view; the
/// enabled switch and the stage count use the raw view (macro modulation of
/// a toggle would be meaningless).
#[derive(Debug)]
pub struct LaneParamCells {
    /// Lane on/off switch (0 or 1).
    pub enabled: AtomicParam,
    /// Filter center as a note number.
    pub pitch: AtomicParam,
    /// Quality factor.
    pub resonance: AtomicParam,
    /// Active cascade sections.
    pub stages: AtomicParam,
    /// Drive blend.
    pub drive: AtomicParam,
    /// Delay time in milliseconds.
    pub delay_ms: AtomicParam,
    /// Output gain in dB.
    pub gain_db: AtomicParam,
}

impl Default for LaneParamCells {
    fn default() -> Self {
        Self {
            enabled: AtomicParam::new(0.0, 1.0, 1.0, ParamScale::Linear),
            pitch: AtomicParam::new(12.0, 132.0, 69.0, ParamScale::Linear),
            resonance: AtomicParam::new(1.0, 40.0, 1.0, ParamScale::Logarithmic),
            stages: AtomicParam::new(1.0, 4.0, 1.0, ParamScale::Linear),
            drive: AtomicParam::new(0.0, 1.0, 0.0, ParamScale::Linear),
            delay_ms: AtomicParam::new(1.0, 1000.0, 50.0, ParamScale::Logarithmic),
            gain_db: AtomicParam::new(-60.0, 12.0, 0.0, ParamScale::Linear),
        }
    }
}

impl LaneParamCells {
    /// Collapse the cells into plain per-block targets.
    fn snapshot(&self) -> LaneParams {
        LaneParams {
            enabled: self.enabled.value() > 0.5,
            pitch: self.pitch.modulated_value(),
            resonance: self.resonance.modulated_value(),
            stages: libm::roundf(self.stages.value()) as usize,
            drive: self.drive.modulated_value(),
            delay_ms: self.delay_ms.modulated_value(),
            gain_db: self.gain_db.modulated_value(),
        }
    }
}

/// All automated parameters of the effect, one cell group per lane.
///
/// The bank is owned by the host glue and shared between the writer thread
/// (UI/automation) and the audio thread; every accessor takes `&self`.
#[derive(Debug, Default)]
pub struct ParamBank {
    lanes: [LaneParamCells; NUM_LANES],
}

impl ParamBank {
    /// Cells for one lane, `index < NUM_LANES`.
    pub fn lane(&self, index: usize) -> &LaneParamCells {
        &self.lanes[index]
    }
}

/// The complete DSP core behind the plugin's process callback.
pub struct MantaProcessor {
    engine: MantaEngine,
    oversampler: Oversampler,
    sample_rate: f32,
    max_block: usize,
}

impl MantaProcessor {
    /// Create a processor around an injected tuning. Oversampling starts
    /// disabled.
    pub fn new(tuning: Tuning) -> Self {
        Self {
            engine: MantaEngine::new(tuning),
            oversampler: Oversampler::new(),
            sample_rate: 0.0,
            max_block: 0,
        }
    }

    /// Size every buffer for the negotiated sample rate and maximum block.
    ///
    /// When the oversampled path is active the engine is prepared at the 2×
    /// rate and block size, so lane delays and cutoff normalization stay
    /// correct. Only valid while processing is suspended.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize) {
        self.sample_rate = sample_rate;
        self.max_block = max_block;

        self.oversampler.prepare(sample_rate, max_block);
        if self.oversampler.is_enabled() {
            self.engine.prepare(
                sample_rate * OVERSAMPLE_FACTOR as f32,
                max_block * OVERSAMPLE_FACTOR,
            );
        } else {
            self.engine.prepare(sample_rate, max_block);
        }
    }

    /// Toggle the 2× path and re-prepare the graph for the new effective
    /// rate. Only valid while processing is suspended (caller contract).
    pub fn set_oversampling(&mut self, enabled: bool) {
        self.oversampler.set_enabled(enabled);
        if self.sample_rate > 0.0 {
            self.prepare(self.sample_rate, self.max_block);
        }
    }

    /// Whether blocks currently route through the 2× path.
    pub fn is_oversampling(&self) -> bool {
        self.oversampler.is_enabled()
    }

    /// Added latency to report to the host, in base-rate samples.
    pub fn latency_samples(&self) -> usize {
        self.oversampler.latency_samples()
    }

    /// Process one block in place.
    ///
    /// Reads every parameter cell exactly once, then routes the audio
    /// through the oversampled or the direct path. `num_samples == 0` is a
    /// valid no-op.
    pub fn process(&mut self, bank: &ParamBank, buffer: &mut [&mut [f32]], num_samples: usize) {
        if num_samples == 0 {
            return;
        }
        let params = [
            bank.lane(0).snapshot(),
            bank.lane(1).snapshot(),
            bank.lane(2).snapshot(),
        ];

        if self.oversampler.is_enabled() {
            let channels = buffer.len().min(MAX_CHANNELS);
            self.oversampler.upsample(&*buffer, num_samples);
            let mut views = self.oversampler.scratch_views();
            self.engine.process(
                &mut views[..channels],
                num_samples * OVERSAMPLE_FACTOR,
                &params,
            );
            self.oversampler.downsample(buffer, num_samples);
        } else {
            self.engine.process(buffer, num_samples, &params);
        }
    }

    /// Clear all DSP state (filters, delays, FIR rings) without resizing.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.oversampler.reset();
    }

    /// The engine's tuning.
    pub fn tuning(&self) -> &Tuning {
        self.engine.tuning()
    }
}
