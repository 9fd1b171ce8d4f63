use crate::strip::{BOXES_PER_MINUTE, TOTAL_BOXES, TOTAL_MINUTES};
use serde::{Deserialize, Serialize};

/// On-screen widths below this get smaller responsive labels.
pub const NARROW_BREAKPOINT: f64 = 700.0;
pub const NARROW_FONT_FACTOR: f64 = 0.85;
/// Minutes that carry the value labels.
pub const LABEL_MINUTES: [usize; 3] = [1, 4, 7];
const LABEL_INSET: f64 = 4.0;

/// Backing resolution versus on-screen size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetrics {
    pub backing_width: f64,
    pub css_width: f64,
}

impl SurfaceMetrics {
    pub fn unscaled(width: f64) -> Self {
        Self {
            backing_width: width,
            css_width: width,
        }
    }

    pub fn scale(&self) -> f64 {
        if self.css_width > 0.0 {
            self.backing_width / self.css_width
        } else {
            1.0
        }
    }

    pub fn is_narrow(&self) -> bool {
        self.css_width < NARROW_BREAKPOINT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelFont {
    pub css_px: f64,
    /// Compensate for surface scaling and shrink on narrow screens.
    pub responsive: bool,
}

impl LabelFont {
    pub const fn responsive(css_px: f64) -> Self {
        Self {
            css_px,
            responsive: true,
        }
    }

    pub const fn fixed(px: f64) -> Self {
        Self {
            css_px: px,
            responsive: false,
        }
    }

    /// Font size in backing pixels.
    pub fn size_on(&self, surface: &SurfaceMetrics) -> f64 {
        if !self.responsive {
            return self.css_px;
        }
        let factor = if surface.is_narrow() {
            NARROW_FONT_FACTOR
        } else {
            1.0
        };
        self.css_px * factor * surface.scale()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub value_min: f64,
    pub value_max: f64,
    pub minor_step: f64,
    pub major_step: f64,
    pub label_step: f64,
    pub label_font: LabelFont,
}

pub const FHR_GRID: GridSpec = GridSpec {
    value_min: 30.0,
    value_max: 240.0,
    minor_step: 10.0,
    major_step: 30.0,
    label_step: 30.0,
    label_font: LabelFont::responsive(14.0),
};

pub const TOCO_GRID: GridSpec = GridSpec {
    value_min: 0.0,
    value_max: 100.0,
    minor_step: 10.0,
    major_step: 20.0,
    label_step: 20.0,
    label_font: LabelFont::fixed(10.0),
};

impl GridSpec {
    /// Values `min, min + step, ...` up to and including `max`.
    pub fn steps(&self, step: f64) -> Vec<f64> {
        if step <= 0.0 || self.value_max < self.value_min {
            return Vec::new();
        }
        let count = ((self.value_max - self.value_min) / step + 1e-9).floor() as usize;
        (0..=count)
            .map(|k| self.value_min + k as f64 * step)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    /// x for vertical lines, y for horizontal ones
    pub position: f64,
    pub major: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Maps the strip's time axis and a value domain onto a pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub value_min: f64,
    pub value_max: f64,
}

impl ChartGeometry {
    pub fn new(width: f64, height: f64, spec: &GridSpec) -> Self {
        Self {
            width,
            height,
            value_min: spec.value_min,
            value_max: spec.value_max,
        }
    }

    pub fn pixels_per_value(&self) -> f64 {
        self.height / (self.value_max - self.value_min)
    }

    pub fn value_to_y(&self, value: f64) -> f64 {
        self.height - (value - self.value_min) * self.pixels_per_value()
    }

    pub fn y_to_value(&self, y: f64) -> f64 {
        self.value_min + (self.height - y) / self.pixels_per_value()
    }

    /// Like [`value_to_y`](Self::value_to_y) but pins out-of-domain values to the edge.
    pub fn clamped_value_to_y(&self, value: f64) -> f64 {
        self.value_to_y(value.clamp(self.value_min, self.value_max))
    }

    /// Horizontal spacing between samples; `None` for an empty trace.
    pub fn x_step(&self, total_points: usize) -> Option<f64> {
        match total_points {
            0 => None,
            1 => Some(self.width),
            n => Some(self.width / (n - 1) as f64),
        }
    }

    pub fn index_to_x(&self, index: usize, total_points: usize) -> Option<f64> {
        self.x_step(total_points).map(|step| index as f64 * step)
    }

    pub fn box_width(&self) -> f64 {
        self.width / TOTAL_BOXES as f64
    }

    pub fn minute_width(&self) -> f64 {
        self.box_width() * BOXES_PER_MINUTE as f64
    }

    /// Minor line every 10 s box, major every minute.
    pub fn vertical_lines(&self) -> Vec<GridLine> {
        let minor = (0..=TOTAL_BOXES).map(|i| GridLine {
            position: i as f64 * self.box_width(),
            major: false,
        });
        let major = (0..=TOTAL_MINUTES).map(|i| GridLine {
            position: i as f64 * self.minute_width(),
            major: true,
        });
        minor.chain(major).collect()
    }

    pub fn horizontal_lines(&self, spec: &GridSpec) -> Vec<GridLine> {
        let minor = spec.steps(spec.minor_step).into_iter().map(|v| GridLine {
            position: self.value_to_y(v),
            major: false,
        });
        let major = spec.steps(spec.major_step).into_iter().map(|v| GridLine {
            position: self.value_to_y(v),
            major: true,
        });
        minor.chain(major).collect()
    }

    pub fn value_labels(&self, spec: &GridSpec) -> Vec<ValueLabel> {
        let mut labels = Vec::new();
        for value in spec.steps(spec.label_step) {
            let y = self.value_to_y(value);
            for minute in LABEL_MINUTES {
                labels.push(ValueLabel {
                    x: minute as f64 * self.minute_width() + LABEL_INSET,
                    y,
                    text: format!("{}", value),
                });
            }
        }
        labels
    }
}
