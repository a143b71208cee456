// File: crates/plotkit-core/src/polygon_clip.rs
// Summary: Sutherland-Hodgman polygon clipping against an axis-aligned rectangle.

use crate::geometry::{Rect, ScreenPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RectEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl RectEdge {
    /// Order in which [`clip_polygon`] applies the passes.
    pub const ALL: [RectEdge; 4] = [RectEdge::Left, RectEdge::Right, RectEdge::Top, RectEdge::Bottom];

    /// Min edges are inclusive, max edges exclusive, so a vertex sitting on the
    /// shared boundary of two adjacent clip rectangles belongs to exactly one.
    #[inline]
    fn contains(self, bounds: &Rect, p: ScreenPoint) -> bool {
        match self {
            RectEdge::Left => p.x >= bounds.left,
            RectEdge::Right => p.x < bounds.right(),
            RectEdge::Top => p.y >= bounds.top,
            RectEdge::Bottom => p.y < bounds.bottom(),
        }
    }

    fn intercept(self, bounds: &Rect, a: ScreenPoint, b: ScreenPoint) -> ScreenPoint {
        if a == b {
            return a;
        }
        match self {
            RectEdge::Left | RectEdge::Right => {
                let x = if self == RectEdge::Left { bounds.left } else { bounds.right() };
                if b.x == a.x {
                    return a;
                }
                ScreenPoint::new(x, a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x))
            }
            RectEdge::Top | RectEdge::Bottom => {
                let y = if self == RectEdge::Top { bounds.top } else { bounds.bottom() };
                if b.y == a.y {
                    return a;
                }
                ScreenPoint::new(a.x + (b.x - a.x) * (y - a.y) / (b.y - a.y), y)
            }
        }
    }
}

/// Clip a closed polygon to `bounds`. The result may be empty.
pub fn clip_polygon(bounds: Rect, vertices: &[ScreenPoint]) -> Vec<ScreenPoint> {
    let mut current = vertices.to_vec();
    for edge in RectEdge::ALL {
        current = clip_polygon_edge(bounds, edge, &current);
        if current.is_empty() {
            break;
        }
    }
    current
}

/// One Sutherland-Hodgman pass against a single edge.
pub fn clip_polygon_edge(bounds: Rect, edge: RectEdge, vertices: &[ScreenPoint]) -> Vec<ScreenPoint> {
    let Some(&last) = vertices.last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(vertices.len() + 2);
    let mut s = last;
    let mut s_in = edge.contains(&bounds, s);
    for &p in vertices {
        let p_in = edge.contains(&bounds, p);
        match (s_in, p_in) {
            (true, true) => out.push(p),
            (true, false) => out.push(edge.intercept(&bounds, s, p)),
            (false, false) => {}
            (false, true) => {
                out.push(edge.intercept(&bounds, s, p));
                out.push(p);
            }
        }
        s = p;
        s_in = p_in;
    }
    out
}
