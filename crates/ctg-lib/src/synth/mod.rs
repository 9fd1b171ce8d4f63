pub mod accel;
pub mod baseline;
pub mod fhr;
pub mod toco;
pub mod variability;

pub use accel::inject_accelerations;
pub use baseline::select_baseline;
pub use fhr::synthesize_fhr;
pub use toco::synthesize_toco;
pub use variability::pick_variability;

use crate::random::RandomSource;
use crate::strip::{CorrectAnswer, Strip};
use log::debug;

/// Runs one full generation cycle: baseline, band, walk, accelerations, TOCO.
pub fn generate_strip<R: RandomSource + ?Sized>(rng: &mut R) -> Strip {
    let baseline = select_baseline(rng);
    let band = pick_variability(rng);
    let answer = CorrectAnswer::new(baseline, &band);

    let mut fhr = synthesize_fhr(rng, baseline, &band);
    let accelerations =
        inject_accelerations(rng, &mut fhr, baseline, band.kind.allows_accelerations());
    let toco = synthesize_toco(rng);

    debug!(
        "generated strip: baseline={} band={:?} amplitude={:.2} accels={} contraction={}",
        baseline,
        band.kind,
        band.amplitude,
        accelerations.len(),
        toco.contraction.is_some()
    );

    Strip {
        baseline,
        band,
        fhr,
        accelerations,
        toco,
        answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::rng_from_seed;
    use crate::strip::TOTAL_POINTS;

    #[test]
    fn generated_strips_hold_invariants() {
        let mut rng = rng_from_seed(Some(2024));
        for _ in 0..200 {
            let strip = generate_strip(&mut rng);
            assert_eq!(strip.fhr.len(), TOTAL_POINTS);
            assert_eq!(strip.toco.samples.len(), TOTAL_POINTS);
            assert_eq!(strip.baseline % 5, 0);
            assert!((90..=180).contains(&strip.baseline));
            assert!(strip.accelerations.len() <= 2);
            if !strip.band.kind.allows_accelerations() {
                assert!(strip.accelerations.is_empty());
            }
            assert_eq!(strip.answer.baseline, strip.baseline);
            assert_eq!(strip.answer.variability_name, strip.band.kind.label());
        }
    }
}
