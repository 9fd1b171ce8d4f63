use crate::random::RandomSource;
use crate::strip::{Contraction, Strip, TocoTrace, TOTAL_POINTS};

pub const TOCO_MIN: f64 = 0.0;
pub const TOCO_MAX: f64 = 100.0;
const TONUS_FLOOR: f64 = 8.0;
const TONUS_CEILING: f64 = 25.0;
const TONUS_STEP: f64 = 1.5;
const NOISE: f64 = 1.0;

/// Draws at most one contraction centred between minutes 3 and 7.
pub fn draw_contraction<R: RandomSource + ?Sized>(rng: &mut R) -> Option<Contraction> {
    if rng.int_in(0, 1) == 0 {
        return None;
    }
    let center_sec = rng.float_in(3.0, 7.0) * 60.0;
    let duration_sec = rng.int_in(60, 120) as f64;
    let amp = rng.int_in(35, 70);
    Some(Contraction {
        start_sec: center_sec - duration_sec / 2.0,
        end_sec: center_sec + duration_sec / 2.0,
        amp,
    })
}

/// Uterine activity trace, independent of the FHR strip.
pub fn synthesize_toco<R: RandomSource + ?Sized>(rng: &mut R) -> TocoTrace {
    let contraction = draw_contraction(rng);
    synthesize_toco_with(rng, contraction)
}

/// Resting tonus walk (hard-clamped to 8..=25) plus the contraction dome
/// plus ±1 noise, clamped to 0..=100.
pub fn synthesize_toco_with<R: RandomSource + ?Sized>(
    rng: &mut R,
    contraction: Option<Contraction>,
) -> TocoTrace {
    let mut tonus = rng.float_in(10.0, 15.0);
    let mut samples = Vec::with_capacity(TOTAL_POINTS);
    for i in 0..TOTAL_POINTS {
        let t_sec = Strip::sample_time(i);
        tonus = (tonus + rng.signed_unit() * TONUS_STEP).clamp(TONUS_FLOOR, TONUS_CEILING);
        let dome = contraction
            .iter()
            .map(|c| c.height_at(t_sec))
            .fold(0.0, f64::max);
        let value = tonus + dome + rng.signed_unit() * NOISE;
        samples.push(value.clamp(TOCO_MIN, TOCO_MAX));
    }
    TocoTrace {
        samples,
        contraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{rng_from_seed, ScriptedSource};

    #[test]
    fn traces_are_bounded() {
        let mut rng = rng_from_seed(Some(8));
        for _ in 0..200 {
            let toco = synthesize_toco(&mut rng);
            assert_eq!(toco.samples.len(), TOTAL_POINTS);
            assert!(toco
                .samples
                .iter()
                .all(|v| (TOCO_MIN..=TOCO_MAX).contains(v)));
            if let Some(c) = toco.contraction {
                let width = c.end_sec - c.start_sec;
                assert!((60.0..=120.0).contains(&width));
                assert!((35..=70).contains(&c.amp));
                let center = (c.start_sec + c.end_sec) / 2.0;
                assert!((180.0..=420.0).contains(&center));
            }
        }
    }

    #[test]
    fn no_contraction_on_zero_count() {
        let mut src = ScriptedSource::constant(0.2);
        assert!(draw_contraction(&mut src).is_none());
    }

    #[test]
    fn dome_peaks_at_contraction_center() {
        let contraction = Contraction {
            start_sec: 255.0,
            end_sec: 345.0,
            amp: 50,
        };
        // neutral draws: tonus fixed at 12.5 and no noise
        let mut src = ScriptedSource::constant(0.5);
        let toco = synthesize_toco_with(&mut src, Some(contraction));
        let center = toco.samples[299] - 12.5;
        assert!((center - 50.0).abs() < 0.01, "{center}");
        assert!((toco.samples[100] - 12.5).abs() < 1e-9);
        assert!((toco.samples[500] - 12.5).abs() < 1e-9);
    }

    #[test]
    fn tonus_is_hard_clamped() {
        // every draw pushes the tonus up by the full step
        let mut src = ScriptedSource::constant(0.999_999);
        let toco = synthesize_toco_with(&mut src, None);
        let last = *toco.samples.last().unwrap();
        assert!(last <= TONUS_CEILING + NOISE + 1e-6);
        assert!(last >= TONUS_CEILING);
    }
}
