// File: crates/plotkit-core/src/transform.rs
// Summary: Pure data <-> screen coordinate transforms (screen = (data - offset) * scale).

use crate::geometry::{DataPoint, ScreenPoint};

/// Linear mapping for one axis. No clamping or validation; NaN/inf propagate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisTransform {
    pub scale: f64,
    pub offset: f64,
}

impl AxisTransform {
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// Map `[data_min, data_max]` onto `[screen_min, screen_max]`.
    /// `screen_min` may be the larger pixel value (e.g. the bottom edge for a y axis),
    /// which yields a negative scale. A zero-width data range maps with scale 1.
    pub fn from_ranges(data_min: f64, data_max: f64, screen_min: f64, screen_max: f64) -> Self {
        let span = data_max - data_min;
        let scale = if span == 0.0 { 1.0 } else { (screen_max - screen_min) / span };
        Self { scale, offset: data_min - screen_min / scale }
    }

    #[inline]
    pub fn transform(&self, v: f64) -> f64 {
        (v - self.offset) * self.scale
    }

    #[inline]
    pub fn inverse_transform(&self, s: f64) -> f64 {
        s / self.scale + self.offset
    }
}

/// Map a data point to screen space, each axis independently.
#[inline]
pub fn transform(p: DataPoint, scale_x: f64, offset_x: f64, scale_y: f64, offset_y: f64) -> ScreenPoint {
    ScreenPoint::new((p.x - offset_x) * scale_x, (p.y - offset_y) * scale_y)
}

/// Exact algebraic inverse of [`transform`].
#[inline]
pub fn inverse_transform(s: ScreenPoint, scale_x: f64, offset_x: f64, scale_y: f64, offset_y: f64) -> DataPoint {
    DataPoint::new(s.x / scale_x + offset_x, s.y / scale_y + offset_y)
}

/// [`transform`] with per-axis parameters bundled.
#[inline]
pub fn transform_point(p: DataPoint, x: &AxisTransform, y: &AxisTransform) -> ScreenPoint {
    transform(p, x.scale, x.offset, y.scale, y.offset)
}

/// [`inverse_transform`] with per-axis parameters bundled.
#[inline]
pub fn inverse_transform_point(s: ScreenPoint, x: &AxisTransform, y: &AxisTransform) -> DataPoint {
    inverse_transform(s, x.scale, x.offset, y.scale, y.offset)
}
