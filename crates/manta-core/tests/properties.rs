//! Property-based tests for manta-core DSP primitives.
//!
//! Tests write-head wraparound arithmetic, ramp continuity and convergence,
//! band-pass stability, and delay-ring integrity using proptest for
//! randomized input generation.

use manta_core::{BandPassCascade, DelayRing, Ramp, WriteHead};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any ring size and any sequence of advances, every emitted index
    /// lies in [0, ring) and the cursor equals the total emitted count mod
    /// ring.
    #[test]
    fn write_head_wraparound(
        ring in 1usize..=4096,
        advances in prop::collection::vec(0usize..=256, 1..=16),
    ) {
        let mut head = WriteHead::new();
        head.prepare(256, ring);

        let mut total = 0usize;
        for n in advances {
            head.advance(n);
            total += n;
            for &p in &head.positions()[..n] {
                prop_assert!(p < ring, "index {} out of range for ring {}", p, ring);
            }
            prop_assert_eq!(head.cursor(), total % ring);
        }
    }

    /// The first sample of a block continues the lowpass from the last
    /// sample of the previous block, for any pair of targets.
    #[test]
    fn ramp_continuity(
        first_target in -10.0f32..10.0,
        second_target in -10.0f32..10.0,
        block in 1usize..=256,
    ) {
        let mut ramp = Ramp::new(0.0);
        ramp.prepare(48000.0, 256, 10.0);

        let last = ramp.apply(first_target, block)[block - 1];
        let (a0, b1) = ramp.coefficients();
        let step = (second_target - last) / block as f32;
        let expected = a0 * (last + step) + b1 * last;

        let first = ramp.apply(second_target, block)[0];
        prop_assert!(
            (first - expected).abs() < 1e-4,
            "discontinuity: expected {}, got {}", expected, first
        );
    }

    /// Repeatedly applying the same target drives the output arbitrarily
    /// close to it, from any starting value.
    ///
    /// f32 precision limits exact convergence for large values: the one-pole
    /// step `a0 * (x - y)` stalls once it rounds to zero, so the tolerance
    /// scales with the target's ULP.
    #[test]
    fn ramp_convergence(
        initial in -100.0f32..100.0,
        target in -100.0f32..100.0,
    ) {
        let mut ramp = Ramp::new(initial);
        ramp.prepare(48000.0, 256, 5.0);

        // ~270 ms, far past 5 tau of the 5 ms constant.
        let mut last = initial;
        for _ in 0..50 {
            last = ramp.apply(target, 256)[255];
        }

        let tolerance = target.abs() * f32::EPSILON / 0.004 + 1e-3;
        prop_assert!(
            (last - target).abs() < tolerance,
            "did not converge: target {}, got {}, tol {}", target, last, tolerance
        );
    }

    /// For any cutoff safely below Nyquist and q >= 1, the cascade produces
    /// finite output for random finite input at every stage count.
    #[test]
    fn cascade_stability(
        cutoff in 0.001f32..0.45,
        q in 1.0f32..20.0,
        stages in 1usize..=4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut cascade = BandPassCascade::new(cutoff, q);
        cascade.set_active_stages(stages);
        cascade.set_cutoff_and_q(cutoff, q);

        for &sample in &input {
            let out = cascade.process(sample);
            prop_assert!(
                out.is_finite(),
                "cascade (fc={}, q={}, stages={}) produced {}", cutoff, q, stages, out
            );
        }
    }

    /// Write N random samples through a head-driven ring, read them back at
    /// the matching integer delays — they must match exactly.
    #[test]
    fn delay_ring_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let n = samples.len();
        let mut ring = DelayRing::new();
        ring.prepare(n + 1);
        let mut head = WriteHead::new();
        head.prepare(n, n + 1);

        head.advance(n);
        for (i, &s) in samples.iter().enumerate() {
            ring.write(head[i], s);
        }

        // From the last written position, sample i sits at integer delay
        // (n - 1 - i).
        let last = head[n - 1];
        for (i, &expected) in samples.iter().enumerate() {
            let got = ring.read(last, (n - 1 - i) as f32);
            prop_assert!(
                (got - expected).abs() < 1e-6,
                "delay mismatch at {}: expected {}, got {}", i, expected, got
            );
        }
    }
}
