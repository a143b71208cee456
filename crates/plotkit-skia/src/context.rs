// File: crates/plotkit-skia/src/context.rs
// Summary: RenderContext implementation drawing onto a Skia CPU raster surface.

use anyhow::Result;
use skia_safe as skia;
use tracing::{debug, warn};

use plotkit_core::png::{self, PngEncoderOptions};
use plotkit_core::{
    Color, Font, LineJoin, PixelBuffer, RasterImage, Rect, RenderContext, ScreenPoint, Size, Stroke, TextLayout,
};

use crate::text::TextShaper;
use crate::{sk_rect, to_skia_color, RenderOptions};

pub struct SkiaRenderContext {
    surface: skia::Surface,
    shaper: TextShaper,
    width: i32,
    height: i32,
    dpi: f64,
    renders_to_screen: bool,
    /// Save count to restore when the active clip is reset.
    clip_save: Option<usize>,
}

impl SkiaRenderContext {
    /// Create a raster surface and clear it to `opts.background`.
    pub fn new(opts: &RenderOptions) -> Result<Self> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
            .ok_or_else(|| anyhow::anyhow!("failed to create {}x{} raster surface", opts.width, opts.height))?;
        surface.canvas().clear(to_skia_color(opts.background));
        debug!(width = opts.width, height = opts.height, "created raster surface");
        Ok(Self {
            surface,
            shaper: TextShaper::new(),
            width: opts.width,
            height: opts.height,
            dpi: opts.dpi,
            renders_to_screen: opts.renders_to_screen,
            clip_save: None,
        })
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn canvas(&mut self) -> &skia::Canvas {
        self.surface.canvas()
    }

    fn antialias(&self, stroke: &Stroke) -> bool {
        // static output always antialiases unless the stroke asks otherwise
        stroke.edge.antialias(true)
    }

    /// Read the surface back as an RGBA buffer (`y = 0` at the bottom).
    pub fn to_pixels(&mut self) -> Result<PixelBuffer> {
        let (w, h) = (self.width as usize, self.height as usize);
        let info = skia::ImageInfo::new(
            (self.width, self.height),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let row_bytes = w * 4;
        let mut rgba = vec![0u8; row_bytes * h];
        if !self.surface.read_pixels(&info, &mut rgba, row_bytes, (0, 0)) {
            anyhow::bail!("failed to read back raster surface");
        }
        PixelBuffer::from_rgba8_top_down(w, h, &rgba).ok_or_else(|| anyhow::anyhow!("pixel readback size mismatch"))
    }

    /// Encode the current surface with the built-in PNG codec, tagged with the configured DPI.
    pub fn encode_png(&mut self) -> Result<Vec<u8>> {
        let pixels = self.to_pixels()?;
        Ok(png::encode(&pixels, &PngEncoderOptions::with_dpi(self.dpi))?)
    }

    /// Write the surface as a PNG file, creating parent directories as needed.
    pub fn save_png(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.encode_png()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn fill_paint(color: Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(to_skia_color(color));
    paint
}

fn stroke_paint(stroke: &Stroke, antialias: bool) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(antialias);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(stroke.thickness as f32);
    paint.set_color(to_skia_color(stroke.color));
    paint.set_stroke_join(match stroke.join {
        LineJoin::Miter => skia::paint::Join::Miter,
        LineJoin::Round => skia::paint::Join::Round,
        LineJoin::Bevel => skia::paint::Join::Bevel,
    });
    if !stroke.dash.is_empty() {
        let mut intervals: Vec<f32> = stroke.dash_px().into_iter().map(|d| d as f32).collect();
        // Skia wants an even number of on/off intervals
        if intervals.len() % 2 == 1 {
            intervals.extend_from_within(..);
        }
        paint.set_path_effect(skia::PathEffect::dash(&intervals, 0.0));
    }
    paint
}

fn polyline_path(points: &[ScreenPoint], close: bool) -> skia::Path {
    let mut path = skia::Path::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to((first.x as f32, first.y as f32));
        for p in rest {
            path.line_to((p.x as f32, p.y as f32));
        }
        if close {
            path.close();
        }
    }
    path
}

impl RenderContext for SkiaRenderContext {
    fn renders_to_screen(&self) -> bool {
        self.renders_to_screen
    }

    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        let paint = stroke_paint(stroke, self.antialias(stroke));
        let path = polyline_path(points, false);
        self.canvas().draw_path(&path, &paint);
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        let paint = stroke_paint(stroke, self.antialias(stroke));
        let mut path = skia::Path::new();
        for pair in points.chunks_exact(2) {
            path.move_to((pair[0].x as f32, pair[0].y as f32));
            path.line_to((pair[1].x as f32, pair[1].y as f32));
        }
        self.canvas().draw_path(&path, &paint);
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let path = polyline_path(points, true);
        let outline = stroke.visible().map(|s| stroke_paint(s, self.antialias(s)));
        let canvas = self.canvas();
        if fill.is_visible() {
            canvas.draw_path(&path, &fill_paint(fill));
        }
        if let Some(paint) = outline {
            canvas.draw_path(&path, &paint);
        }
    }

    fn draw_polygons(&mut self, polygons: &[Vec<ScreenPoint>], fill: Color, stroke: &Stroke) {
        // one path, one paint per style
        let mut path = skia::Path::new();
        for polygon in polygons.iter().filter(|p| p.len() >= 2) {
            path.add_path(&polyline_path(polygon, true), (0.0, 0.0), None);
        }
        let outline = stroke.visible().map(|s| stroke_paint(s, self.antialias(s)));
        let canvas = self.canvas();
        if fill.is_visible() {
            canvas.draw_path(&path, &fill_paint(fill));
        }
        if let Some(paint) = outline {
            canvas.draw_path(&path, &paint);
        }
    }

    fn draw_ellipse(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        self.draw_ellipses(&[rect], fill, stroke);
    }

    fn draw_ellipses(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        let fill = fill.is_visible().then(|| fill_paint(fill));
        let stroke = stroke.visible().map(|s| stroke_paint(s, self.antialias(s)));
        if fill.is_none() && stroke.is_none() {
            return;
        }
        let canvas = self.canvas();
        for &rect in rects {
            let oval = sk_rect(rect);
            if let Some(paint) = &fill {
                canvas.draw_oval(oval, paint);
            }
            if let Some(paint) = &stroke {
                canvas.draw_oval(oval, paint);
            }
        }
    }

    fn draw_rectangle(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        self.draw_rectangles(&[rect], fill, stroke);
    }

    fn draw_rectangles(&mut self, rects: &[Rect], fill: Color, stroke: &Stroke) {
        let fill = fill.is_visible().then(|| fill_paint(fill));
        let stroke = stroke.visible().map(|s| stroke_paint(s, self.antialias(s)));
        if fill.is_none() && stroke.is_none() {
            return;
        }
        let canvas = self.canvas();
        for &rect in rects {
            let r = sk_rect(rect);
            if let Some(paint) = &fill {
                canvas.draw_rect(r, paint);
            }
            if let Some(paint) = &stroke {
                canvas.draw_rect(r, paint);
            }
        }
    }

    fn draw_text(&mut self, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout) {
        if text.is_empty() || !color.is_visible() {
            return;
        }
        let canvas = self.surface.canvas();
        self.shaper.draw(canvas, p, text, color, font, layout);
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        self.shaper.measure(text, font)
    }

    fn draw_image(&mut self, image: &RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool) {
        if opacity <= 0.0 {
            return;
        }
        let pixels = match image.pixels() {
            Ok(p) => p,
            Err(err) => {
                warn!(%err, "skipping undecodable image");
                return;
            }
        };
        let info = skia::ImageInfo::new(
            (pixels.width() as i32, pixels.height() as i32),
            skia::ColorType::RGBA8888,
            skia::AlphaType::Unpremul,
            None,
        );
        let data = skia::Data::new_copy(&pixels.to_rgba8_top_down());
        let Some(sk_image) = skia::images::raster_from_data(&info, data, pixels.width() * 4) else {
            warn!("failed to wrap image pixels");
            return;
        };
        let sampling = if interpolate {
            skia::SamplingOptions::new(skia::FilterMode::Linear, skia::MipmapMode::None)
        } else {
            skia::SamplingOptions::new(skia::FilterMode::Nearest, skia::MipmapMode::None)
        };
        let mut paint = skia::Paint::default();
        paint.set_alpha_f(opacity.min(1.0) as f32);
        let src = sk_rect(src);
        self.canvas().draw_image_rect_with_sampling_options(
            &sk_image,
            Some((&src, skia::canvas::SrcRectConstraint::Fast)),
            sk_rect(dest),
            sampling,
            &paint,
        );
    }

    fn set_clip(&mut self, rect: Rect) -> bool {
        self.reset_clip();
        let canvas = self.surface.canvas();
        let saved = canvas.save();
        canvas.clip_rect(sk_rect(rect), skia::ClipOp::Intersect, true);
        self.clip_save = Some(saved);
        true
    }

    fn reset_clip(&mut self) {
        if let Some(saved) = self.clip_save.take() {
            self.surface.canvas().restore_to_count(saved);
        }
    }
}
