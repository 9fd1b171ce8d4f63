//! Backend-neutral chart description.
//!
//! Renderers build a [`Figure`] of pixel-space primitives; a
//! [`PlotBackend`] turns it into pixels on a real surface.

pub mod grid;
pub mod render;

pub use grid::{ChartGeometry, GridLine, GridSpec, LabelFont, SurfaceMetrics, ValueLabel};
pub use render::{render_fhr_chart, render_toco_chart, FhrScene, OverlayState};

use serde::{Deserialize, Serialize};

/// Packed `0xRRGGBBAA`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(rgb: u32) -> Self {
        Color((rgb << 8) | 0xFF)
    }

    pub fn rgba(rgb: u32, alpha: f32) -> Self {
        let a = (alpha * 255.0 + 0.5) as u32;
        Color((rgb << 8) | (a & 0xFF))
    }

    pub fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }
    pub fn g(&self) -> u8 {
        (self.0 >> 16) as u8
    }
    pub fn b(&self) -> u8 {
        (self.0 >> 8) as u8
    }
    pub fn a(&self) -> u8 {
        self.0 as u8
    }

    pub fn alpha_f64(&self) -> f64 {
        self.a() as f64 / 255.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    /// `[on, off]` lengths in pixels
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub pos: [f64; 2],
    pub text: String,
    pub size: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line {
        from: [f64; 2],
        to: [f64; 2],
        style: Style,
    },
    Polyline {
        points: Vec<[f64; 2]>,
        style: Style,
    },
    Text(TextLabel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>, width: f64, height: f64) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn add(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn line(&mut self, from: [f64; 2], to: [f64; 2], style: Style) {
        self.add(Primitive::Line { from, to, style });
    }

    pub fn text(&mut self, label: TextLabel) {
        self.add(Primitive::Text(label));
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextLabel> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(label) => Some(label),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[[f64; 2]]> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

/// Splits a dashed segment into its visible pieces.
pub fn dash_segments(from: [f64; 2], to: [f64; 2], dash: [f32; 2]) -> Vec<([f64; 2], [f64; 2])> {
    let (on, off) = (dash[0] as f64, dash[1] as f64);
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 || on <= 0.0 {
        return vec![(from, to)];
    }
    let (ux, uy) = (dx / length, dy / length);
    let mut pieces = Vec::new();
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + on).min(length);
        pieces.push((
            [from[0] + ux * offset, from[1] + uy * offset],
            [from[0] + ux * end, from[1] + uy * end],
        ));
        offset = end + off.max(0.0);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_packs_channels() {
        let c = Color::rgba(0x2563EB, 0.9);
        assert_eq!((c.r(), c.g(), c.b()), (0x25, 0x63, 0xEB));
        assert_eq!(c.a(), 230);
        assert_eq!(Color::rgb(0x111827).a(), 255);
    }

    #[test]
    fn dashes_cover_segment() {
        let pieces = dash_segments([0.0, 0.0], [0.0, 20.0], [6.0, 4.0]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], ([0.0, 0.0], [0.0, 6.0]));
        assert_eq!(pieces[1], ([0.0, 10.0], [0.0, 16.0]));
    }

    #[test]
    fn zero_length_dash_is_single_piece() {
        let pieces = dash_segments([3.0, 3.0], [3.0, 3.0], [4.0, 4.0]);
        assert_eq!(pieces.len(), 1);
    }
}
