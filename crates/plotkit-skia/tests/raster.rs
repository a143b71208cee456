// File: crates/plotkit-skia/tests/raster.rs
// Purpose: Validate the raster sink's pixels, clipping, PNG output and the raster/vector selector.

use plotkit_core::png;
use plotkit_core::{Color, Insets, Rect, RenderContext, Stroke};
use plotkit_skia::{RenderOptions, RenderSurface, SkiaRenderContext, SurfaceKind};

fn small() -> RenderOptions {
    RenderOptions { width: 64, height: 48, background: Color::WHITE, ..RenderOptions::default() }
}

/// Screen (x, y) to buffer coordinates (y = 0 at the bottom).
fn at(ctx: &mut SkiaRenderContext, x: usize, y: usize) -> Color {
    let px = ctx.to_pixels().expect("readback");
    px[(x, px.height() - 1 - y)]
}

#[test]
fn background_and_filled_rectangle() {
    let mut ctx = SkiaRenderContext::new(&small()).expect("surface");
    ctx.draw_rectangle(Rect::new(10.0, 10.0, 20.0, 10.0), Color::RED, &Stroke::none());
    assert_eq!(at(&mut ctx, 0, 0), Color::WHITE);
    assert_eq!(at(&mut ctx, 15, 15), Color::RED);
    assert_eq!(at(&mut ctx, 15, 25), Color::WHITE);
}

#[test]
fn clip_limits_drawing() {
    let mut ctx = SkiaRenderContext::new(&small()).expect("surface");
    assert!(ctx.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0)));
    ctx.draw_rectangle(Rect::new(0.0, 0.0, 64.0, 48.0), Color::RED, &Stroke::none());
    ctx.reset_clip();
    assert_eq!(at(&mut ctx, 5, 5), Color::RED);
    assert_eq!(at(&mut ctx, 20, 20), Color::WHITE);

    // after reset the whole surface is drawable again
    ctx.draw_rectangle(Rect::new(30.0, 30.0, 4.0, 4.0), Color::BLACK, &Stroke::none());
    assert_eq!(at(&mut ctx, 31, 31), Color::BLACK);
}

#[test]
fn invisible_styles_leave_the_surface_untouched() {
    let mut ctx = SkiaRenderContext::new(&small()).expect("surface");
    let before = ctx.to_pixels().unwrap();
    ctx.draw_rectangle(Rect::new(0.0, 0.0, 64.0, 48.0), Color::UNDEFINED, &Stroke::none());
    ctx.draw_line(&[(0.0, 0.0).into(), (63.0, 47.0).into()], &Stroke::new(Color::BLACK, 0.0));
    assert_eq!(ctx.to_pixels().unwrap(), before);
}

#[test]
fn png_output_matches_surface() {
    let mut ctx = SkiaRenderContext::new(&small()).expect("surface");
    ctx.draw_ellipse(Rect::new(8.0, 8.0, 30.0, 20.0), Color::from_rgb(30, 120, 220), &Stroke::default());
    let bytes = ctx.encode_png().unwrap();
    let info = png::get_image_info(&bytes).unwrap();
    assert_eq!((info.width, info.height), (64, 48));
    assert_eq!(png::decode(&bytes).unwrap(), ctx.to_pixels().unwrap());
}

#[test]
fn text_is_measured_by_the_shaper() {
    let ctx = SkiaRenderContext::new(&small()).expect("surface");
    let font = plotkit_core::Font::new("Arial", 14.0);
    let short = ctx.measure_text("ab", &font);
    let long = ctx.measure_text("abcdefgh", &font);
    assert!(long.width > short.width);
    assert_eq!(ctx.measure_text("", &font).width, 0.0);
}

#[test]
fn plot_area_applies_insets() {
    let opts = RenderOptions { insets: Insets::new(10, 20, 5, 15), ..small() };
    assert_eq!(opts.plot_area(), Rect::new(10.0, 5.0, 34.0, 28.0));
}

#[test]
fn surface_selector_produces_png_or_svg() {
    let mut raster = RenderSurface::new(SurfaceKind::Raster, &small()).unwrap();
    raster.draw_rectangle(Rect::new(1.0, 1.0, 4.0, 4.0), Color::RED, &Stroke::none());
    assert_eq!(raster.extension(), "png");
    let bytes = raster.finish().unwrap();
    assert_eq!(&bytes[..8], &png::SIGNATURE);

    let mut vector = RenderSurface::new(SurfaceKind::Vector, &small()).unwrap();
    vector.draw_rectangle(Rect::new(1.0, 1.0, 4.0, 4.0), Color::RED, &Stroke::none());
    assert_eq!(vector.kind(), SurfaceKind::Vector);
    let text = String::from_utf8(vector.finish().unwrap()).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("fill=\"#ff0000\""));
}
