use super::grid::{ChartGeometry, GridSpec, LabelFont, SurfaceMetrics, FHR_GRID, TOCO_GRID};
use super::{Color, Figure, HAlign, Primitive, Style, TextLabel, VAlign};
use crate::markers::UserMarker;
use crate::strip::AccelerationEvent;
use serde::{Deserialize, Serialize};

/// Half-pixel offset that keeps 1px lines crisp.
const CRISP: f64 = 0.5;
const OVERLAY_FONT: LabelFont = LabelFont::responsive(15.0);

const GRID_RGB: u32 = 0xFF0000;
const LABEL_RGB: u32 = 0xEF4444;
const TRACE_RGB: u32 = 0x111827;
const GUESS_RGB: u32 = 0x2563EB;
const TRUTH_RGB: u32 = 0xDC2626;

/// Truth overlays the learner has asked to see. Both only ever turn on
/// within a strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub show_baseline: bool,
    pub show_accel_truth: bool,
}

/// Everything the FHR chart reads on a repaint.
#[derive(Debug, Clone, Copy)]
pub struct FhrScene<'a> {
    pub trace: &'a [f64],
    pub baseline: i64,
    pub accelerations: &'a [AccelerationEvent],
    pub overlays: OverlayState,
    pub markers: &'a [UserMarker],
}

fn minor_style() -> Style {
    Style {
        width: 0.5,
        dash: None,
        color: Color::rgba(GRID_RGB, 0.25),
    }
}

fn major_style() -> Style {
    Style {
        width: 1.0,
        dash: None,
        color: Color::rgba(GRID_RGB, 0.75),
    }
}

fn trace_style() -> Style {
    Style {
        width: 1.5,
        dash: None,
        color: Color::rgb(TRACE_RGB),
    }
}

fn draw_grid(fig: &mut Figure, geom: &ChartGeometry, spec: &GridSpec, surface: &SurfaceMetrics) {
    let (width, height) = (geom.width, geom.height);
    let vertical = geom.vertical_lines();
    let horizontal = geom.horizontal_lines(spec);

    // minor lines first so majors paint over them
    for major in [false, true] {
        let style = if major { major_style() } else { minor_style() };
        for line in vertical.iter().filter(|l| l.major == major) {
            let x = line.position + CRISP;
            fig.line([x, 0.0], [x, height], style);
        }
        for line in horizontal.iter().filter(|l| l.major == major) {
            let y = line.position + CRISP;
            fig.line([0.0, y], [width, y], style);
        }
    }

    let size = spec.label_font.size_on(surface);
    for label in geom.value_labels(spec) {
        fig.text(TextLabel {
            pos: [label.x, label.y],
            text: label.text,
            size,
            h_align: HAlign::Left,
            v_align: VAlign::Middle,
            color: Color::rgb(LABEL_RGB),
        });
    }
}

fn trace_polyline(geom: &ChartGeometry, trace: &[f64]) -> Option<Primitive> {
    let step = geom.x_step(trace.len())?;
    let points = trace
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64 * step, geom.clamped_value_to_y(v)])
        .collect();
    Some(Primitive::Polyline {
        points,
        style: trace_style(),
    })
}

/// FHR chart: grid, trace, baseline truth, acceleration truth, learner markers.
///
/// An empty trace yields the bare grid.
pub fn render_fhr_chart(
    scene: &FhrScene<'_>,
    width: f64,
    height: f64,
    surface: &SurfaceMetrics,
) -> Figure {
    let geom = ChartGeometry::new(width, height, &FHR_GRID);
    let mut fig = Figure::new(Some("FHR (bpm)".to_string()), width, height);
    draw_grid(&mut fig, &geom, &FHR_GRID, surface);

    let Some(trace) = trace_polyline(&geom, scene.trace) else {
        return fig;
    };
    fig.add(trace);

    let overlay_size = OVERLAY_FONT.size_on(surface);

    if scene.overlays.show_baseline {
        let y = geom.clamped_value_to_y(scene.baseline as f64);
        fig.line(
            [0.0, y + CRISP],
            [width, y + CRISP],
            Style {
                width: 1.0,
                dash: Some([6.0, 4.0]),
                color: Color::rgba(GUESS_RGB, 0.9),
            },
        );
        fig.text(TextLabel {
            pos: [4.0, y - 2.0],
            text: format!("{} bpm", scene.baseline),
            size: overlay_size,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
            color: Color::rgba(GUESS_RGB, 0.95),
        });
    }

    if scene.overlays.show_accel_truth {
        let truth = |pos: [f64; 2], text: &str| TextLabel {
            pos,
            text: text.to_string(),
            size: overlay_size,
            h_align: HAlign::Center,
            v_align: VAlign::Top,
            color: Color::rgba(TRUTH_RGB, 0.98),
        };
        if scene.accelerations.is_empty() {
            fig.text(truth([width / 2.0, 2.0], "NO ACCELS"));
        } else {
            for event in scene.accelerations {
                if let Some(x) = geom.index_to_x(event.peak_idx, scene.trace.len()) {
                    fig.text(truth([x, 2.0], "ACCEL"));
                }
            }
        }
    }

    let marker_style = Style {
        width: 1.0,
        dash: Some([4.0, 4.0]),
        color: Color::rgba(GUESS_RGB, 0.9),
    };
    for marker in scene.markers {
        let x = marker.x_norm * width;
        fig.line([x + CRISP, 0.0], [x + CRISP, height], marker_style);
    }
    for marker in scene.markers {
        fig.text(TextLabel {
            pos: [marker.x_norm * width, height - 2.0],
            text: "accel".to_string(),
            size: overlay_size,
            h_align: HAlign::Center,
            v_align: VAlign::Bottom,
            color: Color::rgba(GUESS_RGB, 0.95),
        });
    }

    fig
}

/// TOCO chart: grid with fixed-size labels and the activity trace.
pub fn render_toco_chart(
    samples: &[f64],
    width: f64,
    height: f64,
    surface: &SurfaceMetrics,
) -> Figure {
    let geom = ChartGeometry::new(width, height, &TOCO_GRID);
    let mut fig = Figure::new(Some("TOCO".to_string()), width, height);
    draw_grid(&mut fig, &geom, &TOCO_GRID, surface);
    if let Some(trace) = trace_polyline(&geom, samples) {
        fig.add(trace);
    }
    fig
}
