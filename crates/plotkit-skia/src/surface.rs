// File: crates/plotkit-skia/src/surface.rs
// Summary: Sink chosen at construction (raster or SVG), driven through one RenderContext.

use anyhow::Result;

use plotkit_core::{
    Color, Font, RasterImage, Rect, RenderContext, ScreenPoint, Size, Stroke, SvgRenderContext, TextLayout,
};

use crate::{RenderOptions, SkiaRenderContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Raster,
    Vector,
}

pub enum RenderSurface {
    Raster(SkiaRenderContext),
    Vector(SvgRenderContext),
}

impl RenderSurface {
    pub fn new(kind: SurfaceKind, opts: &RenderOptions) -> Result<Self> {
        Ok(match kind {
            SurfaceKind::Raster => Self::Raster(SkiaRenderContext::new(opts)?),
            SurfaceKind::Vector => {
                let mut svg = SvgRenderContext::new(opts.width as f64, opts.height as f64);
                svg.background(opts.background);
                Self::Vector(svg)
            }
        })
    }

    pub fn kind(&self) -> SurfaceKind {
        match self {
            Self::Raster(_) => SurfaceKind::Raster,
            Self::Vector(_) => SurfaceKind::Vector,
        }
    }

    /// Usual file extension for [`RenderSurface::finish`] output.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Raster(_) => "png",
            Self::Vector(_) => "svg",
        }
    }

    /// Encoded output: PNG bytes or SVG text.
    pub fn finish(self) -> Result<Vec<u8>> {
        match self {
            Self::Raster(mut ctx) => ctx.encode_png(),
            Self::Vector(svg) => Ok(svg.finish().into_bytes()),
        }
    }

    fn ctx(&mut self) -> &mut dyn RenderContext {
        match self {
            Self::Raster(ctx) => ctx,
            Self::Vector(ctx) => ctx,
        }
    }

    fn ctx_ref(&self) -> &dyn RenderContext {
        match self {
            Self::Raster(ctx) => ctx,
            Self::Vector(ctx) => ctx,
        }
    }
}

impl RenderContext for RenderSurface {
    fn renders_to_screen(&self) -> bool {
        self.ctx_ref().renders_to_screen()
    }

    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        self.ctx().draw_line(points, stroke)
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        self.ctx().draw_line_segments(points, stroke)
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &Stroke) {
        self.ctx().draw_polygon(points, fill, stroke)
    }

    fn draw_polygons(&mut self, polygons: &[Vec<ScreenPoint>], fill: Color, stroke: &Stroke) {
        self.ctx().draw_polygons(polygons, fill, stroke)
    }

    fn draw_ellipse(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        self.ctx().draw_ellipse(rect, fill, stroke)
    }

    fn draw_ellipses(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        self.ctx().draw_ellipses(rects, fill, stroke)
    }

    fn draw_rectangle(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        self.ctx().draw_rectangle(rect, fill, stroke)
    }

    fn draw_rectangles(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        self.ctx().draw_rectangles(rects, fill, stroke)
    }

    fn draw_text(&mut self, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout) {
        self.ctx().draw_text(p, text, color, font, layout)
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        self.ctx_ref().measure_text(text, font)
    }

    fn draw_image(&mut self, image: &RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool) {
        self.ctx().draw_image(image, src, dest, opacity, interpolate)
    }

    fn set_clip(&mut self, rect: Rect) -> bool {
        self.ctx().set_clip(rect)
    }

    fn reset_clip(&mut self) {
        self.ctx().reset_clip()
    }

    fn set_tooltip(&mut self, text: &str) {
        self.ctx().set_tooltip(text)
    }
}
