// File: crates/plotkit-core/src/line_clip.rs
// Summary: Cohen-Sutherland segment clipping against an axis-aligned rectangle.

use crate::geometry::{Rect, ScreenPoint};

/// Region bits. `BELOW`/`ABOVE` refer to numeric y, so `BELOW` is the top edge on screen.
pub const INSIDE: u8 = 0;
pub const LEFT: u8 = 1;
pub const RIGHT: u8 = 2;
pub const BELOW: u8 = 4;
pub const ABOVE: u8 = 8;

/// Result of clipping one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineClip {
    /// No part of the segment is visible.
    Outside,
    /// Both endpoints were already inside; the segment is unchanged.
    Inside,
    /// At least one endpoint was moved onto the boundary.
    Clipped(ScreenPoint, ScreenPoint),
}

impl LineClip {
    /// Resolve to the visible segment, given the endpoints that were clipped.
    pub fn segment(self, p0: ScreenPoint, p1: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        match self {
            LineClip::Outside => None,
            LineClip::Inside => Some((p0, p1)),
            LineClip::Clipped(a, b) => Some((a, b)),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, LineClip::Outside)
    }
}

/// Clips segments against bounds fixed at construction.
#[derive(Clone, Copy, Debug)]
pub struct LineClipper {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl LineClipper {
    pub fn new(rect: Rect) -> Self {
        Self { xmin: rect.left, xmax: rect.right(), ymin: rect.top, ymax: rect.bottom() }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_ltrb(self.xmin, self.ymin, self.xmax, self.ymax)
    }

    /// 4-bit region code of `p`.
    #[inline]
    pub fn outcode(&self, p: ScreenPoint) -> u8 {
        let mut code = INSIDE;
        if p.x < self.xmin {
            code |= LEFT;
        } else if p.x > self.xmax {
            code |= RIGHT;
        }
        if p.y < self.ymin {
            code |= BELOW;
        } else if p.y > self.ymax {
            code |= ABOVE;
        }
        code
    }

    /// Inclusive on all four edges.
    #[inline]
    pub fn is_inside(&self, p: ScreenPoint) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    pub fn clip_line(&self, mut p0: ScreenPoint, mut p1: ScreenPoint) -> LineClip {
        let mut code0 = self.outcode(p0);
        let mut code1 = self.outcode(p1);
        if (code0 | code1) == INSIDE {
            return LineClip::Inside;
        }

        loop {
            if (code0 | code1) == INSIDE {
                return LineClip::Clipped(p0, p1);
            }
            if (code0 & code1) != 0 {
                return LineClip::Outside;
            }

            let code_out = if code0 != INSIDE { code0 } else { code1 };

            // The chosen bit implies the endpoints straddle that edge, so the
            // perpendicular delta below is never zero.
            let p = if (code_out & ABOVE) != 0 {
                ScreenPoint::new(p0.x + (p1.x - p0.x) * (self.ymax - p0.y) / (p1.y - p0.y), self.ymax)
            } else if (code_out & BELOW) != 0 {
                ScreenPoint::new(p0.x + (p1.x - p0.x) * (self.ymin - p0.y) / (p1.y - p0.y), self.ymin)
            } else if (code_out & RIGHT) != 0 {
                ScreenPoint::new(self.xmax, p0.y + (p1.y - p0.y) * (self.xmax - p0.x) / (p1.x - p0.x))
            } else {
                ScreenPoint::new(self.xmin, p0.y + (p1.y - p0.y) * (self.xmin - p0.x) / (p1.x - p0.x))
            };

            if code_out == code0 {
                p0 = p;
                code0 = self.outcode(p0);
            } else {
                p1 = p;
                code1 = self.outcode(p1);
            }
        }
    }

    /// Convenience over [`LineClipper::clip_line`] returning the visible part only.
    pub fn clip_segment(&self, p0: ScreenPoint, p1: ScreenPoint) -> Option<(ScreenPoint, ScreenPoint)> {
        self.clip_line(p0, p1).segment(p0, p1)
    }
}
