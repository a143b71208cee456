// File: crates/plotkit-skia/src/text.rs
// Summary: Paragraph-based text shaping for the raster sink: measure, align, rotate and paint.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

use plotkit_core::render_context::alignment_offset;
use plotkit_core::{Color, Font, HorizontalAlignment, ScreenPoint, Size, TextLayout};

/// Layout width used when the text box is unbounded.
const UNBOUNDED_WIDTH: f32 = 10_000.0;

const FALLBACK_FAMILIES: [&str; 5] = ["Segoe UI", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"];

pub struct TextShaper {
    fonts: FontCollection,
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(font: &Font, color: Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size((font.size as f32).max(1.0));
        ts.set_color(crate::to_skia_color(color));
        let mut families: Vec<&str> = vec![font.family.as_str()];
        families.extend(FALLBACK_FAMILIES.iter().copied().filter(|f| *f != font.family));
        ts.set_font_families(&families);
        if font.is_bold() {
            ts.set_font_style(skia::FontStyle::bold());
        }
        ts
    }

    fn layout(&self, text: &str, font: &Font, color: Color, align: TextAlign, width: f32) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(align);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(font, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(width);
        paragraph
    }

    /// Extent of the widest line and the total height of all lines.
    pub fn measure(&self, text: &str, font: &Font) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let p = self.layout(text, font, Color::UNDEFINED, TextAlign::Left, UNBOUNDED_WIDTH);
        Size::new(p.longest_line() as f64, p.height() as f64)
    }

    /// Paint `text` anchored at `p`. Rotation is about the anchor; `max_size`
    /// clips the text box (after alignment, before rotation).
    pub fn draw(&self, canvas: &skia::Canvas, p: ScreenPoint, text: &str, color: Color, font: &Font, layout: &TextLayout) {
        let measured = self.measure(text, font);
        let size = match layout.max_size {
            Some(max) => Size::new(measured.width.min(max.width), measured.height.min(max.height)),
            None => measured,
        };
        let align = match layout.halign {
            HorizontalAlignment::Left => TextAlign::Left,
            HorizontalAlignment::Center => TextAlign::Center,
            HorizontalAlignment::Right => TextAlign::Right,
        };
        // Lay out in a box exactly as wide as the text so TextAlign positions each line.
        let mut paragraph = self.layout(text, font, color, align, (measured.width as f32).max(1.0));
        let offset = alignment_offset(size, layout.halign, layout.valign);

        let saved = canvas.save();
        canvas.translate((p.x as f32, p.y as f32));
        if layout.rotation != 0.0 {
            canvas.rotate(layout.rotation as f32, None);
        }
        if layout.max_size.is_some() {
            let clip = skia::Rect::from_xywh(offset.x as f32, offset.y as f32, size.width as f32, size.height as f32);
            canvas.clip_rect(clip, skia::ClipOp::Intersect, true);
        }
        paragraph.paint(canvas, (offset.x as f32, offset.y as f32));
        canvas.restore_to_count(saved);
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}
