//! The three-lane engine.
//!
//! Owns exactly three [`Lane`]s, one shared [`WriteHead`] and one shared
//! delay-ring size derived from a fixed maximum delay length. Per block the
//! head advances once, every lane processes the same input against the same
//! position sequence, and the output buffer is *overwritten* with the sum of
//! the lane contributions.
//!
//! Consequence of that overwrite: with all three lanes disabled the engine
//! produces silence, not a dry pass-through. That replace-not-mix behavior
//! is deliberate and callers relying on a bypass must route around the
//! engine instead.

use crate::lane::{Lane, LaneParams, MAX_CHANNELS};
use manta_core::{Tuning, WriteHead, ms_to_samples};

/// Number of lanes; fixed so the per-sample cost stays compile-time bounded.
pub const NUM_LANES: usize = 3;

/// Longest supported lane delay, sizing the shared ring at prepare time.
pub const MAX_DELAY_MS: f32 = 1000.0;

/// Three independent filter/drive/delay/gain lanes summed to one output.
pub struct MantaEngine {
    lanes: [Lane; NUM_LANES],
    head: WriteHead,
    tuning: Tuning,
    sample_rate: f32,
    ring_len: usize,
}

impl MantaEngine {
    /// Create an engine around an injected tuning. The tuning is read-only
    /// for the engine's lifetime.
    pub fn new(tuning: Tuning) -> Self {
        Self {
            lanes: [Lane::new(), Lane::new(), Lane::new()],
            head: WriteHead::new(),
            tuning,
            sample_rate: 44100.0,
            ring_len: 0,
        }
    }

    /// Allocate every lane's buffers for a sample rate and maximum block
    /// size. Only valid while processing is suspended.
    ///
    /// The shared delay ring is sized from [`MAX_DELAY_MS`] and rounded up
    /// to an even number of samples.
    pub fn prepare(&mut self, sample_rate: f32, max_block: usize) {
        self.sample_rate = sample_rate;

        let mut ring_len = ms_to_samples(MAX_DELAY_MS, sample_rate) as usize;
        ring_len += ring_len & 1;
        self.ring_len = ring_len;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block, ring_len, "engine prepare");

        self.head.prepare(max_block, ring_len);
        for lane in &mut self.lanes {
            lane.prepare(sample_rate, max_block, ring_len);
        }
    }

    /// Process one block in place.
    ///
    /// `buffer` holds one slice per channel (1 or 2 supported); its first
    /// `num_samples` samples are consumed as input and replaced by the lane
    /// sum. `num_samples == 0` is a no-op that leaves all state untouched.
    pub fn process(
        &mut self,
        buffer: &mut [&mut [f32]],
        num_samples: usize,
        params: &[LaneParams; NUM_LANES],
    ) {
        if num_samples == 0 {
            return;
        }
        let channels = buffer.len().min(MAX_CHANNELS);

        self.head.advance(num_samples);
        for (lane, lane_params) in self.lanes.iter_mut().zip(params.iter()) {
            lane.process(&*buffer, &self.head, &self.tuning, lane_params, num_samples);
        }

        for channel in buffer[..channels].iter_mut() {
            channel[..num_samples].fill(0.0);
        }
        for lane in &self.lanes {
            for (c, channel) in buffer[..channels].iter_mut().enumerate() {
                let contribution = lane.output(c);
                for (out, &sample) in channel[..num_samples].iter_mut().zip(contribution) {
                    *out += sample;
                }
            }
        }
    }

    /// The tuning the lanes convert pitch through.
    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Shared delay-ring length in samples (even, see [`prepare`](Self::prepare)).
    #[inline]
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    /// Clear all lane state (filter history, delay rings, scratch).
    pub fn reset(&mut self) {
        self.head.reset();
        for lane in &mut self.lanes {
            lane.reset();
        }
    }
}
