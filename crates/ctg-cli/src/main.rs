use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csv::WriterBuilder;
use ctg_lib::{
    chart::{dash_segments, Figure, HAlign, PlotBackend, Primitive, Style, VAlign},
    config::SimulatorConfig,
    markers::{ChartExtent, PointerEvent},
    CheckTarget, Strip, StripSession,
};
use env_logger::Env;
use log::info;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "ctg",
    version,
    about = "CTG strip trainer: synthetic fetal heart rate and TOCO strips"
)]
struct Cli {
    /// Logging verbosity (e.g., debug, info, warn)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// TOML file with seed and chart surface sizes
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for a reproducible strip (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one strip (traces and ground truth) as JSON
    Generate,
    /// Print the answer key for one strip
    Answer,
    /// Write the FHR and TOCO traces of one strip to CSV
    ExportCsv {
        #[arg(long)]
        out: PathBuf,
    },
    /// Render the FHR and TOCO charts of one strip to PNG
    Render {
        #[arg(long)]
        fhr_out: PathBuf,
        #[arg(long)]
        toco_out: PathBuf,
        /// Draw the baseline truth overlay
        #[arg(long)]
        reveal_baseline: bool,
        /// Draw the acceleration truth labels
        #[arg(long)]
        reveal_accels: bool,
        /// Place a learner marker at this fraction of the chart width (repeatable)
        #[arg(long = "marker")]
        markers: Vec<f64>,
    },
}

#[derive(Serialize)]
struct AnswerOutput<'a> {
    baseline: i64,
    variability_name: &'a str,
    range_low: f64,
    range_high: f64,
    range_label: String,
    accelerations: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulatorConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    info!("seed={:?}", config.seed);

    let mut session = StripSession::from_config(&config);
    match cli.command {
        Commands::Generate => cmd_generate(session.strip())?,
        Commands::Answer => cmd_answer(session.strip())?,
        Commands::ExportCsv { out } => cmd_export_csv(session.strip(), &out)?,
        Commands::Render {
            fhr_out,
            toco_out,
            reveal_baseline,
            reveal_accels,
            markers,
        } => {
            if reveal_baseline {
                let _ = session.check(CheckTarget::Baseline);
            }
            if reveal_accels {
                let _ = session.check(CheckTarget::Accelerations);
            }
            for x_norm in markers {
                place_marker(&mut session, &config, x_norm)?;
            }
            write_png(&fhr_out, &session.render_fhr(&config))?;
            write_png(&toco_out, &session.render_toco(&config))?;
        }
    }
    Ok(())
}

fn cmd_generate(strip: &Strip) -> Result<()> {
    println!("{}", serde_json::to_string(strip)?);
    Ok(())
}

fn cmd_answer(strip: &Strip) -> Result<()> {
    let answer = &strip.answer;
    let out = AnswerOutput {
        baseline: answer.baseline,
        variability_name: &answer.variability_name,
        range_low: answer.range_low,
        range_high: answer.range_high,
        range_label: answer.range_label(),
        accelerations: strip.accelerations.len(),
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_export_csv(strip: &Strip, out: &Path) -> Result<()> {
    let file =
        fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(["index", "time_s", "fhr_bpm", "toco"])?;
    for (i, (fhr, toco)) in strip.fhr.iter().zip(&strip.toco.samples).enumerate() {
        writer.write_record(&[
            i.to_string(),
            format!("{:.3}", Strip::sample_time(i)),
            format!("{:.3}", fhr),
            format!("{:.3}", toco),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Adds a marker and drags it from mid-chart to `x_norm`, the way a
/// pointer would.
fn place_marker(
    session: &mut StripSession,
    config: &SimulatorConfig,
    x_norm: f64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&x_norm) {
        bail!("marker position {x_norm} is outside 0..=1");
    }
    if !session.add_marker().any() {
        bail!("at most three markers can be placed");
    }
    let extent = ChartExtent {
        width: config.fhr_chart.metrics().css_width,
        height: config.fhr_chart.height / config.fhr_chart.metrics().scale(),
    };
    let grab_y = extent.height - 1.0;
    let _ = session.pointer_down(PointerEvent::mouse(extent.width * 0.5, grab_y), extent);
    let _ = session.pointer_move(PointerEvent::mouse(extent.width * x_norm, grab_y), extent);
    session.pointer_end();
    Ok(())
}

struct BitmapPlot<'a> {
    root: DrawingArea<BitMapBackend<'a>, Shift>,
}

fn rgba(color: ctg_lib::chart::Color) -> RGBAColor {
    RGBAColor(color.r(), color.g(), color.b(), color.alpha_f64())
}

fn px(point: [f64; 2]) -> (i32, i32) {
    (point[0].round() as i32, point[1].round() as i32)
}

fn shape(style: &Style) -> ShapeStyle {
    rgba(style.color).stroke_width(style.width.round().max(1.0) as u32)
}

impl PlotBackend for BitmapPlot<'_> {
    fn draw(&mut self, fig: &Figure) -> Result<()> {
        self.root.fill(&WHITE)?;
        for primitive in &fig.primitives {
            match primitive {
                Primitive::Line { from, to, style } => {
                    let pieces = match style.dash {
                        Some(dash) => dash_segments(*from, *to, dash),
                        None => vec![(*from, *to)],
                    };
                    for (a, b) in pieces {
                        self.root
                            .draw(&PathElement::new(vec![px(a), px(b)], shape(style)))?;
                    }
                }
                Primitive::Polyline { points, style } => {
                    let path: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
                    self.root.draw(&PathElement::new(path, shape(style)))?;
                }
                Primitive::Text(label) => {
                    let h = match label.h_align {
                        HAlign::Left => HPos::Left,
                        HAlign::Center => HPos::Center,
                    };
                    let v = match label.v_align {
                        VAlign::Top => VPos::Top,
                        VAlign::Middle => VPos::Center,
                        VAlign::Bottom => VPos::Bottom,
                    };
                    let color = rgba(label.color);
                    let style = FontDesc::new(FontFamily::SansSerif, label.size, FontStyle::Normal)
                        .color(&color)
                        .pos(Pos::new(h, v));
                    self.root
                        .draw(&Text::new(label.text.clone(), px(label.pos), style))?;
                }
            }
        }
        self.root.present()?;
        Ok(())
    }
}

fn write_png(path: &Path, fig: &Figure) -> Result<()> {
    let size = (fig.width.round() as u32, fig.height.round() as u32);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    let mut plot = BitmapPlot { root };
    plot.draw(fig)
        .with_context(|| format!("rendering {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
