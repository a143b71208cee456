// File: crates/plotkit-core/src/image.rs
// Summary: RGBA pixel buffer (y = 0 is the bottom row) and encoded raster images.

use std::ops::{Index, IndexMut};

use crate::color::Color;
use crate::error::PngResult;
use crate::png::{self, ImageInfo, PngEncoderOptions};

/// `width x height` RGBA pixels indexed `[(x, y)]`, `y = 0` being the bottom row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::UNDEFINED)
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    /// Build from tightly packed RGBA8 rows ordered top row first, the layout raster
    /// surfaces produce. Returns `None` when `data` is not `width * height * 4` bytes.
    pub fn from_rgba8_top_down(width: usize, height: usize, data: &[u8]) -> Option<Self> {
        if data.len() != width * height * 4 {
            return None;
        }
        let mut buf = Self::new(width, height);
        for (row, line) in data.chunks_exact(width * 4).enumerate() {
            let y = height - 1 - row;
            for (x, px) in line.chunks_exact(4).enumerate() {
                buf[(x, y)] = Color::from_rgba8([px[0], px[1], px[2], px[3]]);
            }
        }
        Some(buf)
    }

    /// Inverse of [`PixelBuffer::from_rgba8_top_down`].
    pub fn to_rgba8_top_down(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for y in (0..self.height).rev() {
            for c in self.row(y) {
                out.extend_from_slice(&c.to_rgba8());
            }
        }
        out
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        self[(x, y)] = color;
    }

    /// Row `y` (0 = bottom), left to right.
    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

impl Index<(usize, usize)> for PixelBuffer {
    type Output = Color;

    fn index(&self, (x, y): (usize, usize)) -> &Color {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        &self.pixels[y * self.width + x]
    }
}

impl IndexMut<(usize, usize)> for PixelBuffer {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Color {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        &mut self.pixels[y * self.width + x]
    }
}

/// An encoded PNG plus the header facts needed to lay it out, read without inflating.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    bytes: Vec<u8>,
    info: ImageInfo,
}

impl RasterImage {
    pub fn from_png(bytes: Vec<u8>) -> PngResult<Self> {
        let info = png::get_image_info(&bytes)?;
        Ok(Self { bytes, info })
    }

    pub fn from_pixels(pixels: &PixelBuffer, options: &PngEncoderOptions) -> PngResult<Self> {
        Self::from_png(png::encode(pixels, options)?)
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fully decode the pixels.
    pub fn pixels(&self) -> PngResult<PixelBuffer> {
        png::decode(&self.bytes)
    }
}
