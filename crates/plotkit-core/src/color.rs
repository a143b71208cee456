// File: crates/plotkit-core/src/color.rs
// Summary: 8-bit RGBA color with an explicit "undefined" value meaning "do not paint".

use crate::geometry::clamp;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Skip marker for fills and strokes.
    pub const UNDEFINED: Self = Self::from_rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const RED: Self = Self::from_rgb(255, 0, 0);

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Argument order matches `skia::Color::from_argb`.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }

    /// False for undefined or fully transparent colors.
    pub fn is_visible(&self) -> bool {
        self.a > 0
    }

    /// Scale alpha by `opacity` in `0.0..=1.0`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = clamp(self.a as f64 * opacity, 0.0, 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// `#rrggbb` form, alpha dropped (see [`Color::opacity`]).
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_rgba8(px: [u8; 4]) -> Self {
        Self { r: px[0], g: px[1], b: px[2], a: px[3] }
    }
}
