// File: crates/plotkit-skia/src/lib.rs
// Summary: Skia raster sink crate; hosts the CPU surface context, text shaping and the raster/vector sink selector.

use skia_safe as skia;

use plotkit_core::{Color, Insets, Rect};

mod context;
mod surface;
pub mod text;

pub use context::SkiaRenderContext;
pub use surface::{RenderSurface, SurfaceKind};
pub use text::TextShaper;

/// Default surface width in pixels.
pub const WIDTH: i32 = 1024;
/// Default surface height in pixels.
pub const HEIGHT: i32 = 640;

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub insets: Insets,
    pub background: Color,
    /// Resolution recorded in encoded PNGs.
    pub dpi: f64,
    pub renders_to_screen: bool,
}

impl RenderOptions {
    /// Plot area: the surface minus the insets.
    pub fn plot_area(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64).inset(self.insets)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: Insets::default(),
            background: Color::from_argb(255, 18, 18, 20), // near-black
            dpi: 96.0,
            renders_to_screen: false,
        }
    }
}

pub(crate) fn to_skia_color(c: Color) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

pub(crate) fn sk_rect(r: Rect) -> skia::Rect {
    skia::Rect::from_xywh(r.left as f32, r.top as f32, r.width as f32, r.height as f32)
}
