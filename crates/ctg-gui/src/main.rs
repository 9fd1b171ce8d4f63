use ctg_lib::{
    chart::{render_fhr_chart, render_toco_chart, Figure, PlotBackend, SurfaceMetrics},
    config::SimulatorConfig,
    markers::{ChartExtent, PointerEvent, PointerKind, MAX_MARKERS},
    CheckTarget, Repaint, StripSession, VariabilityKind,
};
use eframe::{egui, egui::ViewportBuilder};
use log::{error, info};
use std::env;
use std::path::Path;

mod painter;
mod quiz;

use painter::EguiPlot;
use quiz::{grade_baseline, grade_range, grade_variability, LearnerGuess};

const FHR_ASPECT: f32 = 0.35;
const TOCO_ASPECT: f32 = 0.17;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = match env::args().nth(1) {
        Some(path) => match SimulatorConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}; falling back to defaults");
                SimulatorConfig::default()
            }
        },
        None => SimulatorConfig::default(),
    };
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([1100.0, 820.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CTG Strip Trainer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(CtgApp::new(&config)))),
    )
}

/// A figure plus the surface it was built for.
#[derive(Default)]
struct ChartCache {
    figure: Option<Figure>,
    surface: Option<(f64, f64, f64)>,
}

impl ChartCache {
    fn invalidate(&mut self) {
        self.figure = None;
    }

    fn get_or_build(
        &mut self,
        width: f64,
        height: f64,
        surface: SurfaceMetrics,
        build: impl FnOnce() -> Figure,
    ) -> &Figure {
        let key = (width, height, surface.css_width);
        if self.surface != Some(key) {
            self.figure = None;
            self.surface = Some(key);
        }
        self.figure.get_or_insert_with(build)
    }
}

struct CtgApp {
    session: StripSession,
    guess: LearnerGuess,
    fhr_cache: ChartCache,
    toco_cache: ChartCache,
    suppress_scroll: bool,
}

impl CtgApp {
    fn new(config: &SimulatorConfig) -> Self {
        info!("starting session (seed {:?})", config.seed);
        Self {
            session: StripSession::from_config(config),
            guess: LearnerGuess::default(),
            fhr_cache: ChartCache::default(),
            toco_cache: ChartCache::default(),
            suppress_scroll: false,
        }
    }

    fn apply(&mut self, repaint: Repaint) {
        if repaint.fhr {
            self.fhr_cache.invalidate();
        }
        if repaint.toco {
            self.toco_cache.invalidate();
        }
    }

    fn new_strip(&mut self) {
        let repaint = self.session.regenerate();
        self.apply(repaint);
        self.guess.reset();
    }

    fn check(&mut self, target: CheckTarget) {
        let repaint = self.session.check(target);
        self.apply(repaint);
    }

    fn show_fhr_chart(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let size = egui::vec2(width, width * FHR_ASPECT);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let ppp = ui.ctx().pixels_per_point();
        self.handle_pointer(ui, rect, &response);

        let surface = SurfaceMetrics {
            backing_width: (rect.width() * ppp) as f64,
            css_width: rect.width() as f64,
        };
        let (w, h) = ((rect.width() * ppp) as f64, (rect.height() * ppp) as f64);
        let session = &self.session;
        let figure = self.fhr_cache.get_or_build(w, h, surface, || {
            render_fhr_chart(&session.fhr_scene(), w, h, &surface)
        });
        paint_figure(ui, rect, ppp, figure);
    }

    fn show_toco_chart(&mut self, ui: &mut egui::Ui) {
        let width = ui.available_width();
        let size = egui::vec2(width, width * TOCO_ASPECT);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let ppp = ui.ctx().pixels_per_point();
        let surface = SurfaceMetrics {
            backing_width: (rect.width() * ppp) as f64,
            css_width: rect.width() as f64,
        };
        let (w, h) = ((rect.width() * ppp) as f64, (rect.height() * ppp) as f64);
        let samples = &self.session.strip().toco.samples;
        let figure = self
            .toco_cache
            .get_or_build(w, h, surface, || render_toco_chart(samples, w, h, &surface));
        paint_figure(ui, rect, ppp, figure);
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response) {
        let extent = ChartExtent {
            width: rect.width() as f64,
            height: rect.height() as f64,
        };
        let kind = if ui.input(|i| i.any_touches()) {
            PointerKind::Touch
        } else {
            PointerKind::Mouse
        };
        let to_event = |pos: egui::Pos2| PointerEvent {
            x: (pos.x - rect.left()) as f64,
            y: (pos.y - rect.top()) as f64,
            kind,
        };
        let local = response.interact_pointer_pos().map(to_event);

        if response.drag_started() {
            // egui reports the drag after a small movement; grab where the press began
            let origin = ui.input(|i| i.pointer.press_origin()).map(to_event);
            if let Some(event) = origin.or(local) {
                let out = self.session.pointer_down(event, extent);
                self.suppress_scroll = out.suppress_default;
                self.apply(out.repaint);
            }
        } else if response.dragged() {
            if let Some(event) = local {
                let out = self.session.pointer_move(event, extent);
                self.suppress_scroll = out.suppress_default && self.session.is_dragging();
                self.apply(out.repaint);
            }
        }

        let left_chart = self.session.is_dragging() && !response.contains_pointer();
        if response.drag_stopped() || left_chart {
            self.session.pointer_end();
            self.suppress_scroll = false;
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let markers = self.session.markers().len();
            if ui
                .add_enabled(markers < MAX_MARKERS, egui::Button::new("Add accel marker"))
                .clicked()
            {
                let repaint = self.session.add_marker();
                self.apply(repaint);
            }
            if ui.button("Check accels").clicked() {
                self.check(CheckTarget::Accelerations);
            }
            ui.label(format!(
                "Markers: {markers}/{MAX_MARKERS} (drag the tag along the bottom edge)"
            ));
        });
    }

    fn show_quiz(&mut self, ui: &mut egui::Ui) {
        let answer = self.session.correct_answer().clone();
        let reveal = self.session.reveal();

        ui.group(|ui| {
            ui.heading("Baseline");
            ui.horizontal(|ui| {
                ui.label("Your baseline (bpm)");
                ui.text_edit_singleline(&mut self.guess.baseline);
                if ui.button("Check").clicked() {
                    self.check(CheckTarget::Baseline);
                }
                if reveal.baseline {
                    let verdict = grade_baseline(&self.guess, &answer);
                    ui.strong(format!("{} {}", answer.baseline_label(), verdict.symbol()));
                }
            });
        });

        ui.group(|ui| {
            ui.heading("Variability");
            ui.horizontal_wrapped(|ui| {
                for kind in VariabilityKind::all() {
                    ui.radio_value(&mut self.guess.variability, Some(kind), kind.label());
                }
                if ui.button("Check").clicked() {
                    self.check(CheckTarget::Variability);
                }
                if reveal.variability {
                    let verdict = grade_variability(&self.guess, &answer);
                    ui.strong(format!("{} {}", answer.variability_name, verdict.symbol()));
                }
            });
        });

        ui.group(|ui| {
            ui.heading("Amplitude range");
            ui.horizontal(|ui| {
                ui.label("Low");
                ui.add(egui::TextEdit::singleline(&mut self.guess.range_low).desired_width(60.0));
                ui.label("High");
                ui.add(egui::TextEdit::singleline(&mut self.guess.range_high).desired_width(60.0));
                if ui.button("Check").clicked() {
                    self.check(CheckTarget::Range);
                }
                if reveal.range {
                    let verdict = grade_range(&self.guess, &answer);
                    ui.strong(format!("{} {}", answer.range_label(), verdict.symbol()));
                }
            });
        });
    }
}

fn paint_figure(ui: &egui::Ui, rect: egui::Rect, ppp: f32, figure: &Figure) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
    let mut plot = EguiPlot {
        painter: &painter,
        origin: rect.min,
        pixels_per_point: ppp,
    };
    if let Err(err) = plot.draw(figure) {
        error!("chart paint failed: {err}");
    }
}

impl eframe::App for CtgApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("CTG Strip Trainer");
                if ui.button("New strip").clicked() {
                    self.new_strip();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .enable_scrolling(!self.suppress_scroll)
                .show(ui, |ui| {
                    ui.label("Fetal heart rate (bpm), 10 minutes, 10 s per small box");
                    self.show_fhr_chart(ui);
                    self.show_controls(ui);
                    ui.separator();
                    ui.label("Uterine activity (TOCO)");
                    self.show_toco_chart(ui);
                    ui.separator();
                    self.show_quiz(ui);
                });
        });

        egui::TopBottomPanel::bottom("bottom").show(ctx, |ui| {
            ui.label("Synthetic teaching strips only; not a clinical model.");
        });
    }
}
