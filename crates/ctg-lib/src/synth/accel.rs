use crate::random::RandomSource;
use crate::strip::{AccelerationEvent, TOTAL_SECONDS};

const MIN_DURATION_SEC: i64 = 15;
const MAX_DURATION_SEC: i64 = 90;
const MIN_ONSET_TO_PEAK_SEC: i64 = 5;
const MAX_ONSET_TO_PEAK_SEC: i64 = 30;
const MIN_AMP_BPM: i64 = 15;
const MAX_AMP_BPM: i64 = 30;
const EDGE_MARGIN_SEC: i64 = 10;

/// Maps a time offset to a sample index of a `total_points` trace.
pub fn sec_to_index(sec: f64, total_points: usize) -> usize {
    if total_points == 0 {
        return 0;
    }
    (sec / TOTAL_SECONDS * (total_points - 1) as f64).floor() as usize
}

/// Adds a triangular rise of `amp` bpm over `start..=end`, peaking at `peak`.
///
/// Indices past the end of the trace are skipped.
pub fn apply_ramp(trace: &mut [f64], start: usize, peak: usize, end: usize, amp: f64) {
    if trace.is_empty() {
        return;
    }
    let rise = peak.saturating_sub(start).max(1) as f64;
    let fall = end.saturating_sub(peak).max(1) as f64;
    for i in start..=end.min(trace.len() - 1) {
        let t = if i <= peak {
            (i - start) as f64 / rise
        } else {
            1.0 - (i - peak) as f64 / fall
        };
        trace[i] += amp * t.clamp(0.0, 1.0);
    }
}

/// Overlays 0–2 accelerations on `trace` when `allow` is set and returns
/// their ground truth in generation order.
///
/// Events are independent draws; overlapping windows add together.
pub fn inject_accelerations<R: RandomSource + ?Sized>(
    rng: &mut R,
    trace: &mut [f64],
    baseline: i64,
    allow: bool,
) -> Vec<AccelerationEvent> {
    if trace.is_empty() || !allow {
        return Vec::new();
    }
    let total_points = trace.len();
    let total_seconds = TOTAL_SECONDS as i64;

    let count = rng.int_in(0, 2);
    let mut events = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let duration = rng.int_in(MIN_DURATION_SEC, MAX_DURATION_SEC);
        let max_onset = MAX_ONSET_TO_PEAK_SEC.min(duration - 5);
        let onset_to_peak = rng.int_in(MIN_ONSET_TO_PEAK_SEC, max_onset);
        let amp = rng.int_in(MIN_AMP_BPM, MAX_AMP_BPM);
        let start = rng.int_in(EDGE_MARGIN_SEC, total_seconds - duration - EDGE_MARGIN_SEC);

        let start_sec = start as f64;
        let peak_sec = (start + onset_to_peak) as f64;
        let end_sec = (start + duration) as f64;
        let start_idx = sec_to_index(start_sec, total_points);
        let peak_idx = sec_to_index(peak_sec, total_points);
        let end_idx = sec_to_index(end_sec, total_points);

        apply_ramp(trace, start_idx, peak_idx, end_idx, amp as f64);
        events.push(AccelerationEvent {
            start_sec,
            peak_sec,
            end_sec,
            amp,
            start_idx,
            peak_idx,
            end_idx,
            baseline,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{rng_from_seed, ScriptedSource};
    use crate::strip::{VariabilityBand, VariabilityKind, TOTAL_POINTS};
    use crate::synth::fhr::synthesize_fhr;

    #[test]
    fn gate_blocks_accelerations() {
        let mut rng = rng_from_seed(Some(3));
        let mut trace = vec![140.0; TOTAL_POINTS];
        let events = inject_accelerations(&mut rng, &mut trace, 140, false);
        assert!(events.is_empty());
        assert!(trace.iter().all(|&v| v == 140.0));
    }

    #[test]
    fn empty_trace_is_untouched() {
        let mut src = ScriptedSource::constant(0.9);
        let mut trace: Vec<f64> = Vec::new();
        assert!(inject_accelerations(&mut src, &mut trace, 140, true).is_empty());
        apply_ramp(&mut trace, 0, 0, 5, 20.0);
    }

    #[test]
    fn scripted_event_geometry() {
        // count=1, duration=15+floor(0.5*76)=53, onset=5+floor(0.5*26)=18,
        // amp=15+floor(0.5*16)=23, start=10+floor(0.5*528)=274
        let mut src = ScriptedSource::new(vec![0.5]);
        let mut trace = vec![140.0; TOTAL_POINTS];
        let events = inject_accelerations(&mut src, &mut trace, 140, true);
        assert_eq!(events.len(), 1);
        let ev = events[0];
        assert_eq!(ev.start_sec, 274.0);
        assert_eq!(ev.peak_sec, 292.0);
        assert_eq!(ev.end_sec, 327.0);
        assert_eq!(ev.amp, 23);
        assert_eq!(ev.baseline, 140);
        assert_eq!(ev.start_idx, 273);
        assert_eq!(ev.peak_idx, 291);
        assert_eq!(ev.end_idx, 326);
        assert!((trace[ev.peak_idx] - 163.0).abs() < 1e-9);
        assert_eq!(trace[ev.start_idx], 140.0);
    }

    #[test]
    fn ramp_scenario_exceeds_band_ceiling() {
        let band = VariabilityBand {
            kind: VariabilityKind::Moderate,
            amplitude: 8.0,
            step: 4.0,
        };
        let mut rng = rng_from_seed(Some(150));
        let mut trace = synthesize_fhr(&mut rng, 150, &band);
        apply_ramp(&mut trace, 100, 120, 160, 20.0);
        // walk floor is 142, so the peak sits at least 162
        assert!(trace[120] >= 150.0 + 8.0);
        assert!(trace[120] >= trace[100]);
    }

    #[test]
    fn degenerate_ramp_uses_unit_denominator() {
        let mut trace = vec![0.0; 10];
        apply_ramp(&mut trace, 4, 4, 4, 10.0);
        assert_eq!(trace[4], 0.0);
        let mut trace = vec![0.0; 10];
        apply_ramp(&mut trace, 2, 3, 3, 10.0);
        assert_eq!(trace[3], 10.0);
        assert_eq!(trace[4], 0.0);
    }

    #[test]
    fn injection_is_additive_and_bounded() {
        let mut rng = rng_from_seed(Some(77));
        for _ in 0..300 {
            let before = vec![150.0; TOTAL_POINTS];
            let mut after = before.clone();
            let events = inject_accelerations(&mut rng, &mut after, 150, true);
            assert!(events.len() <= 2);
            for ev in &events {
                assert!(ev.start_idx <= ev.peak_idx && ev.peak_idx <= ev.end_idx);
                assert!(ev.end_idx < TOTAL_POINTS);
                assert!((5.0..=30.0).contains(&(ev.peak_sec - ev.start_sec)));
                assert!((15.0..=90.0).contains(&(ev.end_sec - ev.start_sec)));
                assert!((15..=30).contains(&ev.amp));
            }
            for (i, (b, a)) in before.iter().zip(&after).enumerate() {
                let inside = events
                    .iter()
                    .any(|ev| (ev.start_idx..=ev.end_idx).contains(&i));
                if inside {
                    assert!(a >= b);
                } else {
                    assert_eq!(a, b);
                }
            }
        }
    }
}
