// File: crates/plotkit-core/src/recording.rs
// Summary: Display-list sink that records primitives (skip rules applied) for replay or inspection.

use crate::color::Color;
use crate::geometry::{Rect, ScreenPoint, Size};
use crate::image::RasterImage;
use crate::render_context::{approximate_text_size, visible_fill, Font, RenderContext, Stroke, TextLayout};

/// One recorded drawing operation. Invisible fills/strokes are stored as `None`.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line { points: Vec<ScreenPoint>, stroke: Stroke },
    LineSegments { points: Vec<ScreenPoint>, stroke: Stroke },
    Polygon { points: Vec<ScreenPoint>, fill: Option<Color>, stroke: Option<Stroke> },
    Ellipse { rect: Rect, fill: Option<Color>, stroke: Option<Stroke> },
    Rectangle { rect: Rect, fill: Option<Color>, stroke: Option<Stroke> },
    Text { p: ScreenPoint, text: String, color: Color, font: Font, layout: TextLayout },
    Image { image: RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool },
    Clip(Rect),
    ResetClip,
    Tooltip(String),
}

#[derive(Clone, Debug, Default)]
pub struct RecordingContext {
    primitives: Vec<Primitive>,
    renders_to_screen: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen_flag(renders_to_screen: bool) -> Self {
        Self { primitives: Vec::new(), renders_to_screen }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<Primitive> {
        self.primitives
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    /// All poly-lines recorded so far, in order.
    pub fn lines(&self) -> impl Iterator<Item = &[ScreenPoint]> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    /// Send every recorded primitive to `target`.
    pub fn replay(&self, target: &mut dyn RenderContext) {
        let none = Stroke::none();
        for primitive in &self.primitives {
            match primitive {
                Primitive::Line { points, stroke } => target.draw_line(points, stroke),
                Primitive::LineSegments { points, stroke } => target.draw_line_segments(points, stroke),
                Primitive::Polygon { points, fill, stroke } => {
                    target.draw_polygon(points, fill.unwrap_or(Color::UNDEFINED), stroke.as_ref().unwrap_or(&none))
                }
                Primitive::Ellipse { rect, fill, stroke } => {
                    target.draw_ellipse(*rect, fill.unwrap_or(Color::UNDEFINED), stroke.as_ref().unwrap_or(&none))
                }
                Primitive::Rectangle { rect, fill, stroke } => {
                    target.draw_rectangle(*rect, fill.unwrap_or(Color::UNDEFINED), stroke.as_ref().unwrap_or(&none))
                }
                Primitive::Text { p, text, color, font, layout } => target.draw_text(*p, text, *color, font, layout),
                Primitive::Image { image, src, dest, opacity, interpolate } => {
                    target.draw_image(image, *src, *dest, *opacity, *interpolate)
                }
                Primitive::Clip(rect) => {
                    target.set_clip(*rect);
                }
                Primitive::ResetClip => target.reset_clip(),
                Primitive::Tooltip(text) => target.set_tooltip(text),
            }
        }
    }

    fn shape_styles(fill: Color, stroke: &Stroke) -> Option<(Option<Color>, Option<Stroke>)> {
        let fill = visible_fill(fill);
        let stroke = stroke.visible().cloned();
        (fill.is_some() || stroke.is_some()).then_some((fill, stroke))
    }
}

impl RenderContext for RecordingContext {
    fn renders_to_screen(&self) -> bool {
        self.renders_to_screen
    }

    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        self.primitives.push(Primitive::Line { points: points.to_vec(), stroke: stroke.clone() });
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        let even = points.len() & !1;
        self.primitives.push(Primitive::LineSegments { points: points[..even].to_vec(), stroke: stroke.clone() });
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &Stroke) {
        if points.is_empty() {
            return;
        }
        if let Some((fill, stroke)) = Self::shape_styles(fill, stroke) {
            self.primitives.push(Primitive::Polygon { points: points.to_vec(), fill, stroke });
        }
    }

    fn draw_ellipse(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        if let Some((fill, stroke)) = Self::shape_styles(fill, stroke) {
            self.primitives.push(Primitive::Ellipse { rect, fill, stroke });
        }
    }

    fn draw_rectangle(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        if let Some((fill, stroke)) = Self::shape_styles(fill, stroke) {
            self.primitives.push(Primitive::Rectangle { rect, fill, stroke });
        }
    }

    fn draw_text(&mut self, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout) {
        if text.is_empty() || !color.is_visible() {
            return;
        }
        self.primitives.push(Primitive::Text {
            p,
            text: text.to_owned(),
            color,
            font: font.clone(),
            layout: *layout,
        });
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        approximate_text_size(text, font)
    }

    fn draw_image(&mut self, image: &RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool) {
        if opacity <= 0.0 {
            return;
        }
        self.primitives.push(Primitive::Image { image: image.clone(), src, dest, opacity, interpolate });
    }

    fn set_clip(&mut self, rect: Rect) -> bool {
        self.primitives.push(Primitive::Clip(rect));
        true
    }

    fn reset_clip(&mut self) {
        self.primitives.push(Primitive::ResetClip);
    }

    fn set_tooltip(&mut self, text: &str) {
        self.primitives.push(Primitive::Tooltip(text.to_owned()));
    }
}
