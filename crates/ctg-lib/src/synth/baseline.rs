use crate::random::RandomSource;

/// Draws a baseline in 90..=180 bpm, 80% of the time from 110..=160,
/// rounded to the nearest 5 bpm.
pub fn select_baseline<R: RandomSource + ?Sized>(rng: &mut R) -> i64 {
    let raw = if rng.next_unit() < 0.8 {
        rng.int_in(110, 160)
    } else if rng.next_unit() < 0.5 {
        rng.int_in(90, 109)
    } else {
        rng.int_in(161, 180)
    };
    round_to_five(raw)
}

pub fn round_to_five(bpm: i64) -> i64 {
    (bpm as f64 / 5.0).round() as i64 * 5
}
