use crate::random::RandomSource;
use crate::strip::{VariabilityBand, VariabilityKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmplitudeRule {
    Fixed { amplitude: f64, step: f64 },
    /// Amplitude uniform in `[lo, hi)`, step = amplitude × `step_ratio`.
    Range { lo: f64, hi: f64, step_ratio: f64 },
}

/// One row of the weighted selection table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRule {
    pub kind: VariabilityKind,
    /// Cumulative probability upper bound (exclusive).
    pub upper_bound: f64,
    pub amplitude: AmplitudeRule,
}

pub const BAND_TABLE: [BandRule; 4] = [
    BandRule {
        kind: VariabilityKind::Absent,
        upper_bound: 0.15,
        amplitude: AmplitudeRule::Fixed {
            amplitude: 0.5,
            step: 0.2,
        },
    },
    BandRule {
        kind: VariabilityKind::Minimal,
        upper_bound: 0.45,
        amplitude: AmplitudeRule::Range {
            lo: 0.8,
            hi: 2.5,
            step_ratio: 0.6,
        },
    },
    BandRule {
        kind: VariabilityKind::Moderate,
        upper_bound: 0.80,
        amplitude: AmplitudeRule::Range {
            lo: 3.0,
            hi: 12.5,
            step_ratio: 0.5,
        },
    },
    BandRule {
        kind: VariabilityKind::Marked,
        upper_bound: 1.0,
        amplitude: AmplitudeRule::Range {
            lo: 13.0,
            hi: 25.0,
            step_ratio: 0.4,
        },
    },
];

pub fn rule_for(kind: VariabilityKind) -> &'static BandRule {
    BAND_TABLE
        .iter()
        .find(|rule| rule.kind == kind)
        .unwrap_or(&BAND_TABLE[0])
}

impl BandRule {
    pub fn realize<R: RandomSource + ?Sized>(&self, rng: &mut R) -> VariabilityBand {
        let (amplitude, step) = match self.amplitude {
            AmplitudeRule::Fixed { amplitude, step } => (amplitude, step),
            AmplitudeRule::Range { lo, hi, step_ratio } => {
                let amplitude = rng.float_in(lo, hi);
                (amplitude, amplitude * step_ratio)
            }
        };
        VariabilityBand {
            kind: self.kind,
            amplitude,
            step,
        }
    }
}

/// Weighted draw of a variability band from [`BAND_TABLE`].
pub fn pick_variability<R: RandomSource + ?Sized>(rng: &mut R) -> VariabilityBand {
    let r = rng.next_unit();
    let rule = BAND_TABLE
        .iter()
        .find(|rule| r < rule.upper_bound)
        .unwrap_or(&BAND_TABLE[BAND_TABLE.len() - 1]);
    rule.realize(rng)
}
