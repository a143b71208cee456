// File: crates/plotkit-core/src/axis.rs
// Summary: Axis ranges that hand out screen transforms, plus orientation handling.

use crate::geometry::{DataPoint, Rect, ScreenPoint};
use crate::transform::AxisTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Log10,
}

#[derive(Clone, Debug)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub kind: ScaleKind,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Linear }
    }

    pub fn log10(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Log10 }
    }

    /// Map a data value into the axis' internal (linearized) coordinate.
    /// Non-positive values on a log axis become NaN, i.e. a gap.
    #[inline]
    pub fn to_internal(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log10 if v > 0.0 => v.log10(),
            ScaleKind::Log10 => f64::NAN,
        }
    }

    #[inline]
    pub fn from_internal(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log10 => 10f64.powf(v),
        }
    }

    /// Transform over internal coordinates mapping `min..max` onto `screen_min..screen_max`.
    pub fn screen_transform(&self, screen_min: f64, screen_max: f64) -> AxisTransform {
        AxisTransform::from_ranges(
            self.to_internal(self.min),
            self.to_internal(self.max),
            screen_min,
            screen_max,
        )
    }
}

/// A horizontal/vertical axis pair with their screen transforms.
///
/// The transforms themselves stay orientation-agnostic; `transposed` is applied here,
/// once, so every caller swaps axes the same way. When transposed, data x lands on
/// screen y (through `x`) and data y on screen x (through `y`).
#[derive(Clone, Debug)]
pub struct PlotAxes {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub x: AxisTransform,
    pub y: AxisTransform,
    pub transposed: bool,
}

impl PlotAxes {
    /// Build transforms for a plot area spanning `left..right` and `top..bottom` pixels.
    /// The y axis (or x axis, when transposed) grows upward.
    pub fn new(x_axis: Axis, y_axis: Axis, area: Rect, transposed: bool) -> Self {
        let (x, y) = if transposed {
            (
                x_axis.screen_transform(area.bottom(), area.top),
                y_axis.screen_transform(area.left, area.right()),
            )
        } else {
            (
                x_axis.screen_transform(area.left, area.right()),
                y_axis.screen_transform(area.bottom(), area.top),
            )
        };
        Self { x_axis, y_axis, x, y, transposed }
    }

    pub fn to_screen(&self, p: DataPoint) -> ScreenPoint {
        let ix = self.x.transform(self.x_axis.to_internal(p.x));
        let iy = self.y.transform(self.y_axis.to_internal(p.y));
        if self.transposed {
            ScreenPoint::new(iy, ix)
        } else {
            ScreenPoint::new(ix, iy)
        }
    }

    pub fn to_data(&self, s: ScreenPoint) -> DataPoint {
        let (sx, sy) = if self.transposed { (s.y, s.x) } else { (s.x, s.y) };
        DataPoint::new(
            self.x_axis.from_internal(self.x.inverse_transform(sx)),
            self.y_axis.from_internal(self.y.inverse_transform(sy)),
        )
    }
}
