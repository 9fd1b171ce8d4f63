//! One learner's working state: the current strip and everything they
//! have revealed or placed on it.

use crate::chart::{render_fhr_chart, render_toco_chart, FhrScene, Figure, OverlayState};
use crate::config::SimulatorConfig;
use crate::markers::{ChartExtent, DragState, MarkerBoard, PointerEvent};
use crate::random::{rng_from_seed, RandomSource};
use crate::strip::{CorrectAnswer, Strip};
use crate::synth::generate_strip;
use log::{debug, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Which charts a command invalidated.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Repaint {
    pub fhr: bool,
    pub toco: bool,
}

impl Repaint {
    pub const NONE: Repaint = Repaint {
        fhr: false,
        toco: false,
    };
    pub const FHR: Repaint = Repaint {
        fhr: true,
        toco: false,
    };
    pub const ALL: Repaint = Repaint {
        fhr: true,
        toco: true,
    };

    pub fn any(&self) -> bool {
        self.fhr || self.toco
    }
}

impl BitOr for Repaint {
    type Output = Repaint;

    fn bitor(self, rhs: Repaint) -> Repaint {
        Repaint {
            fhr: self.fhr || rhs.fhr,
            toco: self.toco || rhs.toco,
        }
    }
}

/// Answer-panel items the learner has checked on this strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerReveal {
    pub baseline: bool,
    pub variability: bool,
    pub range: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckTarget {
    Baseline,
    Variability,
    Range,
    Accelerations,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    pub repaint: Repaint,
    pub suppress_default: bool,
}

pub struct StripSession<R = StdRng> {
    rng: R,
    strip: Strip,
    overlays: OverlayState,
    reveal: AnswerReveal,
    markers: MarkerBoard,
}

impl StripSession<StdRng> {
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self::with_source(rng_from_seed(seed))
    }

    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::from_seed(config.seed)
    }
}

impl<R: RandomSource> StripSession<R> {
    /// Starts a session with a freshly generated strip.
    pub fn with_source(mut rng: R) -> Self {
        let strip = generate_strip(&mut rng);
        Self {
            rng,
            strip,
            overlays: OverlayState::default(),
            reveal: AnswerReveal::default(),
            markers: MarkerBoard::new(),
        }
    }

    /// Replaces the strip and forgets every reveal and marker.
    pub fn regenerate(&mut self) -> Repaint {
        self.strip = generate_strip(&mut self.rng);
        self.overlays = OverlayState::default();
        self.reveal = AnswerReveal::default();
        self.markers.clear();
        Repaint::ALL
    }

    pub fn strip(&self) -> &Strip {
        &self.strip
    }

    pub fn correct_answer(&self) -> &CorrectAnswer {
        &self.strip.answer
    }

    pub fn overlays(&self) -> OverlayState {
        self.overlays
    }

    pub fn reveal(&self) -> AnswerReveal {
        self.reveal
    }

    pub fn markers(&self) -> &MarkerBoard {
        &self.markers
    }

    pub fn reveal_baseline(&mut self) -> Repaint {
        if self.overlays.show_baseline {
            return Repaint::NONE;
        }
        self.overlays.show_baseline = true;
        Repaint::FHR
    }

    pub fn reveal_acceleration_truth(&mut self) -> Repaint {
        if self.overlays.show_accel_truth {
            return Repaint::NONE;
        }
        self.overlays.show_accel_truth = true;
        Repaint::FHR
    }

    /// Answer-panel check. Checking the baseline also draws it on the chart.
    pub fn check(&mut self, target: CheckTarget) -> Repaint {
        debug!("check {:?}", target);
        match target {
            CheckTarget::Baseline => {
                self.reveal.baseline = true;
                self.reveal_baseline()
            }
            CheckTarget::Variability => {
                self.reveal.variability = true;
                Repaint::NONE
            }
            CheckTarget::Range => {
                self.reveal.range = true;
                Repaint::NONE
            }
            CheckTarget::Accelerations => self.reveal_acceleration_truth(),
        }
    }

    pub fn add_marker(&mut self) -> Repaint {
        if self.markers.add() {
            Repaint::FHR
        } else {
            warn!("marker limit reached, ignoring add");
            Repaint::NONE
        }
    }

    pub fn pointer_down(&mut self, event: PointerEvent, extent: ChartExtent) -> PointerResponse {
        let outcome = self.markers.pointer_down(event, extent);
        PointerResponse {
            repaint: Repaint::NONE,
            suppress_default: outcome.suppress_default,
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent, extent: ChartExtent) -> PointerResponse {
        let outcome = self.markers.pointer_move(event, extent);
        PointerResponse {
            repaint: if outcome.moved {
                Repaint::FHR
            } else {
                Repaint::NONE
            },
            suppress_default: outcome.suppress_default,
        }
    }

    /// Pointer up, leave or touch cancel.
    pub fn pointer_end(&mut self) {
        self.markers.pointer_end();
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.markers.drag_state(), DragState::Dragging(_))
    }

    pub fn fhr_scene(&self) -> FhrScene<'_> {
        FhrScene {
            trace: &self.strip.fhr,
            baseline: self.strip.baseline,
            accelerations: &self.strip.accelerations,
            overlays: self.overlays,
            markers: self.markers.markers(),
        }
    }

    pub fn render_fhr(&self, config: &SimulatorConfig) -> Figure {
        let surface = config.fhr_chart;
        render_fhr_chart(
            &self.fhr_scene(),
            surface.width,
            surface.height,
            &surface.metrics(),
        )
    }

    pub fn render_toco(&self, config: &SimulatorConfig) -> Figure {
        let surface = config.toco_chart;
        render_toco_chart(
            &self.strip.toco.samples,
            surface.width,
            surface.height,
            &surface.metrics(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;
    use crate::strip::TOTAL_POINTS;

    const EXTENT: ChartExtent = ChartExtent {
        width: 1000.0,
        height: 400.0,
    };

    #[test]
    fn regenerate_resets_everything() {
        let mut session = StripSession::from_seed(Some(31));
        let _ = session.check(CheckTarget::Baseline);
        let _ = session.check(CheckTarget::Range);
        let _ = session.reveal_acceleration_truth();
        let _ = session.add_marker();
        let _ = session.add_marker();
        let _ = session.pointer_down(PointerEvent::mouse(500.0, 390.0), EXTENT);
        assert!(session.is_dragging());
        let first = session.strip().clone();

        assert_eq!(session.regenerate(), Repaint::ALL);
        assert_eq!(session.overlays(), OverlayState::default());
        assert_eq!(session.reveal(), AnswerReveal::default());
        assert!(session.markers().is_empty());
        assert!(!session.is_dragging());
        assert_eq!(session.strip().fhr.len(), TOTAL_POINTS);
        assert_ne!(session.strip().fhr, first.fhr);

        let _ = session.regenerate();
        assert!(session.markers().is_empty());
        assert_eq!(session.correct_answer().baseline, session.strip().baseline);
    }

    #[test]
    fn overlays_turn_on_once() {
        let mut session = StripSession::with_source(ScriptedSource::new(vec![0.3, 0.7, 0.1]));
        assert_eq!(session.reveal_baseline(), Repaint::FHR);
        assert_eq!(session.reveal_baseline(), Repaint::NONE);
        assert!(session.overlays().show_baseline);
        assert_eq!(session.check(CheckTarget::Accelerations), Repaint::FHR);
        assert_eq!(session.reveal_acceleration_truth(), Repaint::NONE);
    }

    #[test]
    fn answer_checks_are_independent() {
        let mut session = StripSession::from_seed(Some(4));
        assert_eq!(session.check(CheckTarget::Variability), Repaint::NONE);
        let reveal = session.reveal();
        assert!(reveal.variability && !reveal.range && !reveal.baseline);
        assert!(!session.overlays().show_baseline);
        assert_eq!(session.check(CheckTarget::Baseline), Repaint::FHR);
        assert!(session.overlays().show_baseline && session.reveal().baseline);
    }

    #[test]
    fn marker_commands_signal_repaint() {
        let mut session = StripSession::from_seed(Some(9));
        for _ in 0..3 {
            assert_eq!(session.add_marker(), Repaint::FHR);
        }
        assert_eq!(session.add_marker(), Repaint::NONE);
        assert_eq!(session.markers().len(), 3);

        let down = session.pointer_down(PointerEvent::touch(502.0, 395.0), EXTENT);
        assert!(down.suppress_default);
        assert!(!down.repaint.any());
        let moved = session.pointer_move(PointerEvent::touch(100.0, 10.0), EXTENT);
        assert_eq!(moved.repaint, Repaint::FHR);
        assert_eq!(session.markers().markers()[0].x_norm, 0.1);
        session.pointer_end();
        let idle = session.pointer_move(PointerEvent::touch(900.0, 10.0), EXTENT);
        assert_eq!(idle.repaint, Repaint::NONE);
        assert_eq!(session.markers().markers()[0].x_norm, 0.1);
    }

    #[test]
    fn rendering_reflects_session_state() {
        let mut session = StripSession::from_seed(Some(12));
        let config = SimulatorConfig::default();
        let before = session.render_fhr(&config);
        assert!(before.texts().all(|t| t.text != "accel"));
        let _ = session.add_marker();
        let _ = session.reveal_acceleration_truth();
        let after = session.render_fhr(&config);
        assert_eq!(after.texts().filter(|t| t.text == "accel").count(), 1);
        let truth = after
            .texts()
            .filter(|t| t.text == "ACCEL" || t.text == "NO ACCELS")
            .count();
        assert_eq!(truth, session.strip().accelerations.len().max(1));
        let toco = session.render_toco(&config);
        assert_eq!(toco.polylines().next().map(|p| p.len()), Some(TOTAL_POINTS));
    }

    #[test]
    fn repaint_union() {
        assert_eq!(Repaint::FHR | Repaint::NONE, Repaint::FHR);
        assert_eq!(
            Repaint::FHR
                | Repaint {
                    fhr: false,
                    toco: true
                },
            Repaint::ALL
        );
        assert!(!Repaint::NONE.any());
    }
}
