// File: crates/plotkit-core/src/svg.rs
// Summary: Vector sink writing an SVG 1.1 document; raster images are embedded as PNG data URIs.

use base64::Engine as _;

use crate::color::Color;
use crate::geometry::{Rect, ScreenPoint, Size};
use crate::image::RasterImage;
use crate::render_context::{
    approximate_text_size, visible_fill, EdgeRendering, Font, HorizontalAlignment, LineJoin, RenderContext,
    Stroke, TextLayout, VerticalAlignment,
};

pub struct SvgRenderContext {
    width: f64,
    height: f64,
    body: String,
    next_clip_id: usize,
    clip_open: bool,
    tooltip: Option<String>,
}

impl SvgRenderContext {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, body: String::new(), next_clip_id: 0, clip_open: false, tooltip: None }
    }

    /// Fill the whole canvas, typically called first.
    pub fn background(&mut self, color: Color) {
        let rect = Rect::new(0.0, 0.0, self.width, self.height);
        self.draw_rectangle(rect, color, &Stroke::none());
    }

    /// Close open groups and return the complete document.
    pub fn finish(mut self) -> String {
        if self.clip_open {
            self.body.push_str("</g>\n");
        }
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
                "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" version=\"1.1\" ",
                "xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
                "{body}</svg>\n"
            ),
            w = num(self.width),
            h = num(self.height),
            body = self.body,
        )
    }

    fn element(&mut self, element: String) {
        match &self.tooltip {
            Some(tip) => {
                self.body.push_str(&format!("<g><title>{}</title>{element}</g>\n", escape(tip)));
            }
            None => {
                self.body.push_str(&element);
                self.body.push('\n');
            }
        }
    }
}

fn num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 { "0".to_owned() } else { format!("{r}") }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn points_attr(points: &[ScreenPoint]) -> String {
    points.iter().map(|p| format!("{},{}", num(p.x), num(p.y))).collect::<Vec<_>>().join(" ")
}

fn fill_attr(fill: Color) -> String {
    match visible_fill(fill) {
        Some(c) if c.a == 255 => format!("fill=\"{}\"", c.to_hex_rgb()),
        Some(c) => format!("fill=\"{}\" fill-opacity=\"{}\"", c.to_hex_rgb(), num(c.opacity())),
        None => "fill=\"none\"".to_owned(),
    }
}

fn stroke_attr(stroke: &Stroke) -> String {
    let Some(s) = stroke.visible() else {
        return "stroke=\"none\"".to_owned();
    };
    let mut attr = format!("stroke=\"{}\" stroke-width=\"{}\"", s.color.to_hex_rgb(), num(s.thickness));
    if s.color.a != 255 {
        attr.push_str(&format!(" stroke-opacity=\"{}\"", num(s.color.opacity())));
    }
    if !s.dash.is_empty() {
        let dash: Vec<String> = s.dash_px().into_iter().map(num).collect();
        attr.push_str(&format!(" stroke-dasharray=\"{}\"", dash.join(",")));
    }
    match s.join {
        LineJoin::Miter => {}
        LineJoin::Round => attr.push_str(" stroke-linejoin=\"round\""),
        LineJoin::Bevel => attr.push_str(" stroke-linejoin=\"bevel\""),
    }
    attr.push_str(edge_attr(s.edge));
    attr
}

fn edge_attr(edge: EdgeRendering) -> &'static str {
    match edge {
        EdgeRendering::Aliased | EdgeRendering::PreferSharpness => " shape-rendering=\"crispEdges\"",
        EdgeRendering::PreferSpeed => " shape-rendering=\"optimizeSpeed\"",
        EdgeRendering::Antialiased => " shape-rendering=\"geometricPrecision\"",
        EdgeRendering::Automatic => "",
    }
}

impl RenderContext for SvgRenderContext {
    fn renders_to_screen(&self) -> bool {
        false
    }

    fn draw_line(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        let el = format!("<polyline points=\"{}\" fill=\"none\" {} />", points_attr(points), stroke_attr(stroke));
        self.element(el);
    }

    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        // one path for the whole batch
        let mut d = String::new();
        for pair in points.chunks_exact(2) {
            d.push_str(&format!("M{},{} L{},{} ", num(pair[0].x), num(pair[0].y), num(pair[1].x), num(pair[1].y)));
        }
        let el = format!("<path d=\"{}\" fill=\"none\" {} />", d.trim_end(), stroke_attr(stroke));
        self.element(el);
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: &Stroke) {
        if points.is_empty() || (visible_fill(fill).is_none() && !stroke.is_visible()) {
            return;
        }
        let el = format!("<polygon points=\"{}\" {} {} />", points_attr(points), fill_attr(fill), stroke_attr(stroke));
        self.element(el);
    }

    fn draw_ellipse(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        if visible_fill(fill).is_none() && !stroke.is_visible() {
            return;
        }
        let c = rect.center();
        let el = format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {} {} />",
            num(c.x),
            num(c.y),
            num(rect.width * 0.5),
            num(rect.height * 0.5),
            fill_attr(fill),
            stroke_attr(stroke),
        );
        self.element(el);
    }

    fn draw_rectangle(&mut self, rect: Rect, fill: Color, stroke: &Stroke) {
        if visible_fill(fill).is_none() && !stroke.is_visible() {
            return;
        }
        let el = format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {} {} />",
            num(rect.left),
            num(rect.top),
            num(rect.width),
            num(rect.height),
            fill_attr(fill),
            stroke_attr(stroke),
        );
        self.element(el);
    }

    /// `max_size` is not enforced; SVG text is not measured here.
    fn draw_text(&mut self, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout) {
        if text.is_empty() || !color.is_visible() {
            return;
        }
        let anchor = match layout.halign {
            HorizontalAlignment::Left => "start",
            HorizontalAlignment::Center => "middle",
            HorizontalAlignment::Right => "end",
        };
        // baseline offset from the anchor, in ems
        let dy = match layout.valign {
            VerticalAlignment::Top => 0.8,
            VerticalAlignment::Middle => 0.3,
            VerticalAlignment::Bottom => -0.2,
        } * font.size;
        let mut el = format!(
            "<text x=\"0\" y=\"{}\" transform=\"translate({},{})",
            num(dy),
            num(p.x),
            num(p.y)
        );
        if layout.rotation != 0.0 {
            el.push_str(&format!(" rotate({})", num(layout.rotation)));
        }
        el.push_str(&format!(
            "\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{}\"",
            escape(&font.family),
            num(font.size)
        ));
        if font.is_bold() {
            el.push_str(" font-weight=\"bold\"");
        }
        el.push_str(&format!(" {}>{}</text>", fill_attr(color), escape(text)));
        self.element(el);
    }

    fn measure_text(&self, text: &str, font: &Font) -> Size {
        approximate_text_size(text, font)
    }

    fn draw_image(&mut self, image: &RasterImage, src: Rect, dest: Rect, opacity: f64, interpolate: bool) {
        if opacity <= 0.0 || src.width <= 0.0 || src.height <= 0.0 {
            return;
        }
        let data = base64::engine::general_purpose::STANDARD.encode(image.bytes());
        let rendering = if interpolate { "" } else { " style=\"image-rendering:pixelated\"" };
        // The nested viewport selects the source region and scales it onto `dest`.
        let el = format!(
            concat!(
                "<svg x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" preserveAspectRatio=\"none\">",
                "<image width=\"{}\" height=\"{}\" opacity=\"{}\"{} xlink:href=\"data:image/png;base64,{}\" /></svg>"
            ),
            num(dest.left),
            num(dest.top),
            num(dest.width),
            num(dest.height),
            num(src.left),
            num(src.top),
            num(src.width),
            num(src.height),
            image.width(),
            image.height(),
            num(opacity.min(1.0)),
            rendering,
            data,
        );
        self.element(el);
    }

    fn set_clip(&mut self, rect: Rect) -> bool {
        if self.clip_open {
            self.body.push_str("</g>\n");
        }
        let id = self.next_clip_id;
        self.next_clip_id += 1;
        self.body.push_str(&format!(
            "<defs><clipPath id=\"clip{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" /></clipPath></defs>\n<g clip-path=\"url(#clip{id})\">\n",
            num(rect.left),
            num(rect.top),
            num(rect.width),
            num(rect.height),
        ));
        self.clip_open = true;
        true
    }

    fn reset_clip(&mut self) {
        if self.clip_open {
            self.body.push_str("</g>\n");
            self.clip_open = false;
        }
    }

    fn set_tooltip(&mut self, text: &str) {
        self.tooltip = (!text.is_empty()).then(|| text.to_owned());
    }
}
