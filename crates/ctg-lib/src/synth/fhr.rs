use crate::random::RandomSource;
use crate::strip::{VariabilityBand, TOTAL_POINTS};

/// Bounded random walk around `baseline`.
///
/// Each tick adds a fresh uniform delta in `[-step, step)`. A sample that
/// leaves `[baseline - amplitude, baseline + amplitude]` is pulled back
/// inside by a random fraction of one step rather than pinned to the rail.
pub fn synthesize_fhr<R: RandomSource + ?Sized>(
    rng: &mut R,
    baseline: i64,
    band: &VariabilityBand,
) -> Vec<f64> {
    let baseline = baseline as f64;
    let lower = baseline - band.amplitude;
    let upper = baseline + band.amplitude;
    let step = band.step;

    let mut trace = Vec::with_capacity(TOTAL_POINTS);
    let mut current = baseline;
    trace.push(current);
    for _ in 1..TOTAL_POINTS {
        current += rng.signed_unit() * step;
        if current < lower {
            current = lower + rng.next_unit() * step;
        }
        if current > upper {
            current = upper - rng.next_unit() * step;
        }
        trace.push(current);
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{rng_from_seed, ScriptedSource};
    use crate::strip::VariabilityKind;
    use crate::synth::variability::pick_variability;

    fn band(kind: VariabilityKind, amplitude: f64, step: f64) -> VariabilityBand {
        VariabilityBand {
            kind,
            amplitude,
            step,
        }
    }

    #[test]
    fn starts_at_baseline_with_full_length() {
        let mut rng = rng_from_seed(Some(1));
        let trace = synthesize_fhr(&mut rng, 140, &band(VariabilityKind::Moderate, 8.0, 4.0));
        assert_eq!(trace.len(), TOTAL_POINTS);
        assert_eq!(trace[0], 140.0);
        assert!(trace.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn walk_stays_inside_band() {
        let mut rng = rng_from_seed(Some(99));
        for _ in 0..100 {
            let band = pick_variability(&mut rng);
            let trace = synthesize_fhr(&mut rng, 150, &band);
            let eps = 1e-9;
            for v in trace {
                assert!(v >= 150.0 - band.amplitude - eps, "{v} below band {band:?}");
                assert!(v <= 150.0 + band.amplitude + eps, "{v} above band {band:?}");
            }
        }
    }

    #[test]
    fn floor_reflection_reinjects_offset() {
        // Always step down by the full step, then reflect by a quarter step.
        let mut src = ScriptedSource::new(vec![0.0, 0.25]);
        let trace = synthesize_fhr(&mut src, 120, &band(VariabilityKind::Minimal, 1.0, 2.0));
        // 120 - 2 = 118 < 119, reflected to 119 + 0.25 * 2
        assert!((trace[1] - 119.5).abs() < 1e-9);
        assert!(trace.iter().all(|&v| v >= 119.0));
    }

    #[test]
    fn neutral_draws_keep_flat_trace() {
        let mut src = ScriptedSource::constant(0.5);
        let trace = synthesize_fhr(&mut src, 130, &band(VariabilityKind::Absent, 0.5, 0.2));
        assert!(trace.iter().all(|&v| (v - 130.0).abs() < 1e-12));
    }
}
