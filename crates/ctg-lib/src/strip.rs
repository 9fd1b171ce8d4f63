use serde::{Deserialize, Serialize};

/// Length of one strip in minutes.
pub const TOTAL_MINUTES: usize = 10;
/// Width of one small grid box in seconds.
pub const SECONDS_PER_BOX: usize = 10;
pub const BOXES_PER_MINUTE: usize = 60 / SECONDS_PER_BOX;
pub const TOTAL_BOXES: usize = TOTAL_MINUTES * BOXES_PER_MINUTE;
pub const POINTS_PER_BOX: usize = 10;
/// Samples in every FHR and TOCO trace.
pub const TOTAL_POINTS: usize = TOTAL_BOXES * POINTS_PER_BOX;
pub const TOTAL_SECONDS: f64 = (TOTAL_MINUTES * 60) as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariabilityKind {
    Absent,
    Minimal,
    Moderate,
    Marked,
}

impl VariabilityKind {
    pub fn label(&self) -> &'static str {
        match self {
            VariabilityKind::Absent => "Absent",
            VariabilityKind::Minimal => "Minimal (1–5 bpm)",
            VariabilityKind::Moderate => "Moderate (6–25 bpm)",
            VariabilityKind::Marked => "Marked (> 25 bpm)",
        }
    }

    /// True accelerations need at least moderate underlying variability.
    pub fn allows_accelerations(&self) -> bool {
        matches!(self, VariabilityKind::Moderate | VariabilityKind::Marked)
    }

    pub fn all() -> [VariabilityKind; 4] {
        [
            VariabilityKind::Absent,
            VariabilityKind::Minimal,
            VariabilityKind::Moderate,
            VariabilityKind::Marked,
        ]
    }
}

/// Short-term variability around baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariabilityBand {
    pub kind: VariabilityKind,
    /// ± bpm from baseline
    pub amplitude: f64,
    /// Largest per-sample delta of the walk
    pub step: f64,
}

/// Ground truth for one injected acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationEvent {
    pub start_sec: f64,
    pub peak_sec: f64,
    pub end_sec: f64,
    pub amp: i64,
    pub start_idx: usize,
    pub peak_idx: usize,
    pub end_idx: usize,
    pub baseline: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contraction {
    pub start_sec: f64,
    pub end_sec: f64,
    pub amp: i64,
}

impl Contraction {
    /// Half-sine dome height at `t_sec`, zero outside the window.
    pub fn height_at(&self, t_sec: f64) -> f64 {
        if t_sec < self.start_sec || t_sec > self.end_sec {
            return 0.0;
        }
        let phase = ((t_sec - self.start_sec) / (self.end_sec - self.start_sec)).clamp(0.0, 1.0);
        self.amp as f64 * (std::f64::consts::PI * phase).sin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocoTrace {
    pub samples: Vec<f64>,
    pub contraction: Option<Contraction>,
}

/// Answer key, fixed when the strip is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectAnswer {
    pub baseline: i64,
    pub variability_name: String,
    pub range_low: f64,
    pub range_high: f64,
}

impl CorrectAnswer {
    pub fn new(baseline: i64, band: &VariabilityBand) -> Self {
        Self {
            baseline,
            variability_name: band.kind.label().to_string(),
            range_low: baseline as f64 - band.amplitude,
            range_high: baseline as f64 + band.amplitude,
        }
    }

    pub fn baseline_label(&self) -> String {
        format!("{} bpm", self.baseline)
    }

    /// Range ends in whole bpm, halves rounded up.
    pub fn rounded_range(&self) -> (i64, i64) {
        (self.range_low.round() as i64, self.range_high.round() as i64)
    }

    pub fn range_label(&self) -> String {
        let (low, high) = self.rounded_range();
        format!("{low} – {high} bpm")
    }
}

/// One generated 10 minute strip with its ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strip {
    pub baseline: i64,
    pub band: VariabilityBand,
    pub fhr: Vec<f64>,
    pub accelerations: Vec<AccelerationEvent>,
    pub toco: TocoTrace,
    pub answer: CorrectAnswer,
}

impl Strip {
    /// Seconds from strip start for sample `index`.
    pub fn sample_time(index: usize) -> f64 {
        index as f64 / (TOTAL_POINTS - 1) as f64 * TOTAL_SECONDS
    }
}
