// File: crates/plotkit-core/tests/svg.rs
// Purpose: Validate the SVG sink's document structure, skip rules, clipping groups and embedded images.

use plotkit_core::{
    Color, Font, HorizontalAlignment, LineJoin, PixelBuffer, PngEncoderOptions, RasterImage, Rect, RenderContext, ScreenPoint,
    Stroke, SvgRenderContext, TextLayout,
};

fn pt(x: f64, y: f64) -> ScreenPoint {
    ScreenPoint::new(x, y)
}

#[test]
fn empty_document_is_well_formed() {
    let svg = SvgRenderContext::new(320.0, 200.0).finish();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<svg width=\"320\" height=\"200\""));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn primitives_become_elements() {
    let mut svg = SvgRenderContext::new(100.0, 100.0);
    svg.background(Color::WHITE);
    svg.draw_line(&[pt(0.0, 0.0), pt(10.5, 20.25)], &Stroke::new(Color::RED, 2.0).with_dash(vec![3.0, 1.0]));
    svg.draw_polygon(&[pt(1.0, 1.0), pt(5.0, 1.0), pt(3.0, 4.0)], Color::from_rgba(0, 0, 255, 128), &Stroke::none());
    svg.draw_ellipse(Rect::new(10.0, 10.0, 20.0, 10.0), Color::BLACK, &Stroke::none());
    let doc = svg.finish();

    assert!(doc.contains("<rect x=\"0\" y=\"0\" width=\"100\" height=\"100\" fill=\"#ffffff\""));
    assert!(doc.contains("<polyline points=\"0,0 10.5,20.25\" fill=\"none\" stroke=\"#ff0000\" stroke-width=\"2\""));
    assert!(doc.contains("stroke-dasharray=\"6,2\""));
    assert!(doc.contains("fill=\"#0000ff\" fill-opacity=\"0.5\""));
    assert!(doc.contains("<ellipse cx=\"20\" cy=\"15\" rx=\"10\" ry=\"5\""));
}

#[test]
fn line_join_is_written_only_when_not_miter() {
    let mut svg = SvgRenderContext::new(10.0, 10.0);
    let corner = [pt(0.0, 0.0), pt(5.0, 5.0), pt(10.0, 0.0)];
    svg.draw_line(&corner, &Stroke::default());
    svg.draw_line(&corner, &Stroke::default().with_join(LineJoin::Round));
    svg.draw_line(&corner, &Stroke::default().with_join(LineJoin::Bevel));
    let doc = svg.finish();
    assert_eq!(doc.matches("stroke-linejoin=\"round\"").count(), 1);
    assert_eq!(doc.matches("stroke-linejoin=\"bevel\"").count(), 1);
    assert_eq!(doc.matches("stroke-linejoin").count(), 2);
}

#[test]
fn invisible_styles_emit_nothing() {
    let mut svg = SvgRenderContext::new(10.0, 10.0);
    svg.draw_line(&[pt(0.0, 0.0), pt(1.0, 1.0)], &Stroke::new(Color::BLACK, 0.0));
    svg.draw_rectangle(Rect::new(0.0, 0.0, 5.0, 5.0), Color::UNDEFINED, &Stroke::none());
    svg.draw_text(pt(1.0, 1.0), "x", Color::UNDEFINED, &Font::default(), &TextLayout::default());
    let doc = svg.finish();
    assert!(!doc.contains("<polyline"));
    assert!(!doc.contains("<rect"));
    assert!(!doc.contains("<text"));
}

#[test]
fn segments_share_one_path() {
    let mut svg = SvgRenderContext::new(10.0, 10.0);
    svg.draw_line_segments(&[pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0), pt(3.0, 3.0)], &Stroke::default());
    let doc = svg.finish();
    assert_eq!(doc.matches("<path").count(), 1);
    assert!(doc.contains("d=\"M0,0 L1,1 M2,2 L3,3\""));
}

#[test]
fn clip_opens_and_closes_groups() {
    let mut svg = SvgRenderContext::new(50.0, 50.0);
    assert!(svg.set_clip(Rect::new(5.0, 5.0, 40.0, 40.0)));
    svg.draw_rectangle(Rect::new(0.0, 0.0, 50.0, 50.0), Color::RED, &Stroke::none());
    svg.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
    svg.draw_rectangle(Rect::new(0.0, 0.0, 50.0, 50.0), Color::RED, &Stroke::none());
    let doc = svg.finish();
    assert!(doc.contains("<clipPath id=\"clip0\">"));
    assert!(doc.contains("<clipPath id=\"clip1\">"));
    assert_eq!(doc.matches("<g clip-path=").count(), doc.matches("</g>").count());
}

#[test]
fn text_is_escaped_and_aligned() {
    let mut svg = SvgRenderContext::new(50.0, 50.0);
    let layout = TextLayout { rotation: -90.0, halign: HorizontalAlignment::Center, ..TextLayout::default() };
    svg.draw_text(pt(10.0, 20.0), "a<b & c", Color::BLACK, &Font::new("Inter", 10.0).bold(), &layout);
    let doc = svg.finish();
    assert!(doc.contains(">a&lt;b &amp; c</text>"));
    assert!(doc.contains("text-anchor=\"middle\""));
    assert!(doc.contains("rotate(-90)"));
    assert!(doc.contains("font-weight=\"bold\""));
}

#[test]
fn images_are_embedded_as_png_data_uris() {
    let pixels = PixelBuffer::filled(2, 2, Color::RED);
    let image = RasterImage::from_pixels(&pixels, &PngEncoderOptions::default()).unwrap();
    let mut svg = SvgRenderContext::new(50.0, 50.0);
    svg.draw_image(&image, Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(10.0, 10.0, 20.0, 20.0), 0.5, false);
    let doc = svg.finish();
    // base64 of the PNG signature
    assert!(doc.contains("xlink:href=\"data:image/png;base64,iVBORw0KGgo"));
    assert!(doc.contains("opacity=\"0.5\""));
    assert!(doc.contains("image-rendering:pixelated"));
}

#[test]
fn tooltip_wraps_elements_in_titled_groups() {
    let mut svg = SvgRenderContext::new(10.0, 10.0);
    svg.set_tooltip("peak");
    svg.draw_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, &Stroke::none());
    svg.set_tooltip("");
    svg.draw_rectangle(Rect::new(2.0, 0.0, 1.0, 1.0), Color::BLACK, &Stroke::none());
    let doc = svg.finish();
    assert_eq!(doc.matches("<title>peak</title>").count(), 1);
    assert_eq!(doc.matches("<rect").count(), 2);
}

#[test]
fn text_measurement_is_approximate_but_positive() {
    let svg = SvgRenderContext::new(10.0, 10.0);
    let size = svg.measure_text("abc", &Font::new("Arial", 10.0));
    assert!((size.width - 18.0).abs() < 1e-9);
    assert!((size.height - 12.0).abs() < 1e-9);
}
