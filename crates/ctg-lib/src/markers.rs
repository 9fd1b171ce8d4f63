//! Learner-placed acceleration guesses and their drag gesture.
//!
//! Positions are stored normalized to the chart width; pointer coordinates
//! arrive in on-screen units relative to the chart's top-left corner.

use log::trace;
use serde::{Deserialize, Serialize};

pub const MAX_MARKERS: usize = 3;
/// Height of the strip along the chart bottom where a drag can start.
pub const GRAB_BAND_HEIGHT: f64 = 40.0;
/// Horizontal distance from a marker that still grabs it.
pub const GRAB_TOLERANCE: f64 = 10.0;
const NEW_MARKER_X: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserMarker {
    pub x_norm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Mouse,
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Touch,
        }
    }
}

/// On-screen size of the chart receiving pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartExtent {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerOutcome {
    /// A marker moved and the chart needs repainting.
    pub moved: bool,
    /// Host should suppress native scrolling for this event.
    pub suppress_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MarkerBoard {
    markers: Vec<UserMarker>,
    drag: DragState,
}

impl MarkerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[UserMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Adds a marker at mid-chart; returns `false` once the board is full.
    pub fn add(&mut self) -> bool {
        if self.markers.len() >= MAX_MARKERS {
            return false;
        }
        self.markers.push(UserMarker {
            x_norm: NEW_MARKER_X,
        });
        true
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.drag = DragState::Idle;
    }

    pub fn pointer_down(&mut self, event: PointerEvent, extent: ChartExtent) -> PointerOutcome {
        let in_band = event.y > extent.height - GRAB_BAND_HEIGHT;
        if in_band {
            let hit = self
                .markers
                .iter()
                .position(|m| (event.x - m.x_norm * extent.width).abs() < GRAB_TOLERANCE);
            if let Some(index) = hit {
                trace!("grabbed marker {index}");
                self.drag = DragState::Dragging(index);
            }
        }
        PointerOutcome {
            moved: false,
            suppress_default: event.kind == PointerKind::Touch,
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent, extent: ChartExtent) -> PointerOutcome {
        let suppress_default = event.kind == PointerKind::Touch;
        let DragState::Dragging(index) = self.drag else {
            return PointerOutcome {
                moved: false,
                suppress_default,
            };
        };
        let Some(marker) = self.markers.get_mut(index) else {
            self.drag = DragState::Idle;
            return PointerOutcome {
                moved: false,
                suppress_default,
            };
        };
        if extent.width <= 0.0 || !event.x.is_finite() {
            return PointerOutcome {
                moved: false,
                suppress_default,
            };
        }
        marker.x_norm = (event.x / extent.width).clamp(0.0, 1.0);
        trace!("marker {index} -> {:.3}", marker.x_norm);
        PointerOutcome {
            moved: true,
            suppress_default,
        }
    }

    /// Pointer up, leave or cancel: always ends the gesture.
    pub fn pointer_end(&mut self) {
        self.drag = DragState::Idle;
    }
}
