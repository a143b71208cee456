// File: crates/plotkit-core/src/render_context.rs
// Summary: Output-agnostic drawing sink contract (vector or raster) and its style types.

use crate::color::Color;
use crate::geometry::{Rect, ScreenPoint, Size};
use crate::image::RasterImage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Aliasing hint; sinks may ignore it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeRendering {
    #[default]
    Automatic,
    Aliased,
    Antialiased,
    PreferSharpness,
    PreferSpeed,
}

impl EdgeRendering {
    /// Resolve the hint to an antialiasing decision. `Automatic` follows `default`.
    pub fn antialias(self, default: bool) -> bool {
        match self {
            EdgeRendering::Automatic => default,
            EdgeRendering::Aliased | EdgeRendering::PreferSpeed => false,
            EdgeRendering::Antialiased => true,
            EdgeRendering::PreferSharpness => false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Stroke style for outlines and poly-lines.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub thickness: f64,
    /// Dash pattern in units of `thickness`; empty for a solid line.
    pub dash: Vec<f64>,
    pub join: LineJoin,
    pub edge: EdgeRendering,
}

impl Stroke {
    pub fn new(color: Color, thickness: f64) -> Self {
        Self { color, thickness, dash: Vec::new(), join: LineJoin::Miter, edge: EdgeRendering::Automatic }
    }

    /// A stroke that never paints.
    pub fn none() -> Self {
        Self::new(Color::UNDEFINED, 0.0)
    }

    pub fn with_dash(mut self, dash: Vec<f64>) -> Self {
        self.dash = dash;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_edge(mut self, edge: EdgeRendering) -> Self {
        self.edge = edge;
        self
    }

    /// Undefined/transparent color or non-positive thickness means "skip the stroke".
    pub fn is_visible(&self) -> bool {
        self.color.is_visible() && self.thickness > 0.0
    }

    /// `Some(self)` when the stroke paints anything.
    pub fn visible(&self) -> Option<&Stroke> {
        self.is_visible().then_some(self)
    }

    /// Dash pattern scaled to pixels.
    pub fn dash_px(&self) -> Vec<f64> {
        self.dash.iter().map(|d| d * self.thickness).collect()
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(Color::BLACK, 1.0)
    }
}

/// `Some(color)` when the fill paints anything.
#[inline]
pub fn visible_fill(fill: Color) -> Option<Color> {
    fill.is_visible().then_some(fill)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f64,
    /// CSS-style weight, 400 normal, 700 bold.
    pub weight: f64,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self { family: family.into(), size, weight: 400.0 }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 700.0;
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600.0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", 12.0)
    }
}

/// Deterministic text extent for sinks without a font engine: 0.6 em per character
/// (widest line) and 1.2 em line height.
pub fn approximate_text_size(text: &str, font: &Font) -> Size {
    if text.is_empty() {
        return Size::default();
    }
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = text.lines().count().max(1);
    Size::new(widest as f64 * font.size * 0.6, lines as f64 * font.size * 1.2)
}

/// Offset from the anchor to the top-left corner of a text box of `size`.
pub fn alignment_offset(size: Size, h: HorizontalAlignment, v: VerticalAlignment) -> ScreenPoint {
    let dx = match h {
        HorizontalAlignment::Left => 0.0,
        HorizontalAlignment::Center => -size.width * 0.5,
        HorizontalAlignment::Right => -size.width,
    };
    let dy = match v {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Middle => -size.height * 0.5,
        VerticalAlignment::Bottom => -size.height,
    };
    ScreenPoint::new(dx, dy)
}

/// Text placement parameters shared by every `draw_text` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextLayout {
    /// Clockwise rotation in degrees around the anchor.
    pub rotation: f64,
    pub halign: HorizontalAlignment,
    pub valign: VerticalAlignment,
    /// Text beyond this box is cut off.
    pub max_size: Option<Size>,
}

/// A drawing sink.
///
/// Every call honors the skip rules: an invisible fill is not painted, an invisible
/// stroke (see [`Stroke::is_visible`]) is not painted. The batched methods are
/// semantically identical to looping the singular ones; sinks override them to
/// avoid per-call setup.
pub trait RenderContext {
    /// True for interactive targets; callers may trade quality for speed.
    fn renders_to_screen(&self) -> bool;

    /// Poly-line through `points`.
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &Stroke);

    /// Disjoint segments `(p0,p1), (p2,p3), ...`; a trailing odd point is ignored.
    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        for pair in points.chunks_exact(2) {
            self.draw_line(pair, stroke);
        }
    }

    /// Closed polygon.
    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &Stroke);

    fn draw_polygons(&mut self, polygons: &[Vec<ScreenPoint>], fill: Color, stroke: &Stroke) {
        for polygon in polygons {
            self.draw_polygon(polygon, fill, stroke);
        }
    }

    /// Ellipse inscribed in `rect`.
    fn draw_ellipse(&mut self, rect: Rect, fill: Color, stroke: &Stroke);

    fn draw_ellipses(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        for &rect in rects {
            self.draw_ellipse(rect, fill, stroke);
        }
    }

    fn draw_rectangle(&mut self, rect: Rect, fill: Color, stroke: &Stroke);

    fn draw_rectangles(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        for &rect in rects {
            self.draw_rectangle(rect, fill, stroke);
        }
    }

    fn draw_text(&mut self, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout);

    fn measure_text(&self, text: &str, font: &Font) -> Size;

    /// Draw the `src` pixel region of `image` into `dest`.
    fn draw_image(&mut self, image: &RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool);

    /// Restrict subsequent drawing to `rect`. Returns false if the sink cannot clip.
    fn set_clip(&mut self, rect: Rect) -> bool;

    fn reset_clip(&mut self);

    /// Tooltip hint for subsequent elements.
    fn set_tooltip(&mut self, _text: &str) {}
}
