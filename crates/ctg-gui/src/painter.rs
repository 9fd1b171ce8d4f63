use ctg_lib::chart::{Color, Figure, HAlign, PlotBackend, Primitive, Style, VAlign};
use egui::{Align, Align2, Color32, FontId, Pos2, Shape, Stroke};

/// Paints a backing-pixel [`Figure`] into an egui rect.
pub struct EguiPlot<'a> {
    pub painter: &'a egui::Painter,
    pub origin: Pos2,
    pub pixels_per_point: f32,
}

impl EguiPlot<'_> {
    fn pos(&self, point: [f64; 2]) -> Pos2 {
        to_screen(self.origin, self.pixels_per_point, point)
    }
}

pub fn to_screen(origin: Pos2, pixels_per_point: f32, point: [f64; 2]) -> Pos2 {
    let ppp = pixels_per_point.max(f32::EPSILON);
    Pos2::new(
        origin.x + point[0] as f32 / ppp,
        origin.y + point[1] as f32 / ppp,
    )
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}

pub fn align(h: HAlign, v: VAlign) -> Align2 {
    let x = match h {
        HAlign::Left => Align::Min,
        HAlign::Center => Align::Center,
    };
    let y = match v {
        VAlign::Top => Align::Min,
        VAlign::Middle => Align::Center,
        VAlign::Bottom => Align::Max,
    };
    Align2([x, y])
}

impl EguiPlot<'_> {
    fn stroke(&self, style: &Style) -> Stroke {
        Stroke::new(style.width / self.pixels_per_point.max(f32::EPSILON), color32(style.color))
    }
}

impl PlotBackend for EguiPlot<'_> {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()> {
        let ppp = self.pixels_per_point.max(f32::EPSILON);
        for primitive in &fig.primitives {
            match primitive {
                Primitive::Line { from, to, style } => {
                    let ends = [self.pos(*from), self.pos(*to)];
                    let stroke = self.stroke(style);
                    match style.dash {
                        Some([on, off]) => {
                            self.painter.extend(Shape::dashed_line(
                                &ends,
                                stroke,
                                on / ppp,
                                off / ppp,
                            ));
                        }
                        None => {
                            self.painter.line_segment(ends, stroke);
                        }
                    }
                }
                Primitive::Polyline { points, style } => {
                    let points: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
                    self.painter.add(Shape::line(points, self.stroke(style)));
                }
                Primitive::Text(label) => {
                    self.painter.text(
                        self.pos(label.pos),
                        align(label.h_align, label.v_align),
                        &label.text,
                        FontId::proportional(label.size as f32 / ppp),
                        color32(label.color),
                    );
                }
            }
        }
        Ok(())
    }
}
