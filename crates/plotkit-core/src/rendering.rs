// File: crates/plotkit-core/src/rendering.rs
// Summary: Clip-aware drawing helpers over any RenderContext, and the data -> screen
//          line pipeline (transform, split at gaps, decimate, clip, draw).

use crate::axis::PlotAxes;
use crate::color::Color;
use crate::decimate::decimate;
use crate::geometry::{DataPoint, Rect, ScreenPoint};
use crate::line_clip::LineClipper;
use crate::polygon_clip::clip_polygon;
use crate::render_context::{Font, RenderContext, Stroke, TextLayout};

/// Poly-line through `points`, clipped to `clip`.
///
/// Each visible stretch becomes one `draw_line` call. Points closer than
/// `sqrt(min_distance_squared)` to the previously kept point are dropped, except the
/// last point of a stretch.
pub fn draw_clipped_line(
    ctx: &mut dyn RenderContext,
    clip: Rect,
    points: &[ScreenPoint],
    min_distance_squared: f64,
    stroke: &Stroke,
) {
    if points.len() < 2 || !stroke.is_visible() {
        return;
    }
    let clipper = LineClipper::new(clip);
    let mut run = Run::default();

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let Some((c0, c1)) = clipper.clip_segment(a, b) else {
            run.finish(ctx, stroke);
            continue;
        };
        if run.tail != Some(c0) {
            run.finish(ctx, stroke);
            run.start(c0);
        }
        run.extend(c1, min_distance_squared);
        if c1 != b {
            // left the clip rectangle
            run.finish(ctx, stroke);
        }
    }
    run.finish(ctx, stroke);
}

/// A visible stretch being accumulated by [`draw_clipped_line`].
#[derive(Default)]
struct Run {
    kept: Vec<ScreenPoint>,
    /// Most recent visible point, whether kept or skipped as too close.
    tail: Option<ScreenPoint>,
}

impl Run {
    fn start(&mut self, p: ScreenPoint) {
        self.kept.push(p);
        self.tail = Some(p);
    }

    fn extend(&mut self, p: ScreenPoint, min_distance_squared: f64) {
        // repeated vertices are never kept, even with no minimum distance
        let far_enough = self
            .kept
            .last()
            .map_or(true, |last| *last != p && last.distance_to_squared(p) >= min_distance_squared);
        if far_enough {
            self.kept.push(p);
        }
        self.tail = Some(p);
    }

    fn finish(&mut self, ctx: &mut dyn RenderContext, stroke: &Stroke) {
        if let Some(tail) = self.tail.take() {
            if self.kept.last() != Some(&tail) {
                self.kept.push(tail);
            }
        }
        // consecutive points are distinct, so two or more always span a visible length
        if self.kept.len() >= 2 {
            ctx.draw_line(&self.kept, stroke);
        }
        self.kept.clear();
    }
}

/// Disjoint segments `(p0,p1), (p2,p3), ...` clipped independently and drawn in one batch.
pub fn draw_clipped_line_segments(ctx: &mut dyn RenderContext, clip: Rect, points: &[ScreenPoint], stroke: &Stroke) {
    let clipper = LineClipper::new(clip);
    let mut visible = Vec::with_capacity(points.len());
    for pair in points.chunks_exact(2) {
        if let Some((a, b)) = clipper.clip_segment(pair[0], pair[1]) {
            visible.push(a);
            visible.push(b);
        }
    }
    if !visible.is_empty() {
        ctx.draw_line_segments(&visible, stroke);
    }
}

pub fn draw_clipped_polygon(
    ctx: &mut dyn RenderContext,
    clip: Rect,
    points: &[ScreenPoint],
    fill: Color,
    stroke: &Stroke,
) {
    if points.is_empty() {
        return;
    }
    let clipper = LineClipper::new(clip);
    if points.iter().all(|&p| clipper.is_inside(p)) {
        ctx.draw_polygon(points, fill, stroke);
        return;
    }
    let clipped = clip_polygon(clip, points);
    if !clipped.is_empty() {
        ctx.draw_polygon(&clipped, fill, stroke);
    }
}

pub fn draw_clipped_rectangle(ctx: &mut dyn RenderContext, clip: Rect, rect: Rect, fill: Color, stroke: &Stroke) {
    if let Some(visible) = clip.intersect(&rect) {
        ctx.draw_rectangle(visible, fill, stroke);
    }
}

/// Ellipse inscribed in `rect`; when it crosses the clip it is approximated by an
/// `n`-gon (at least 3 vertices) and polygon-clipped.
pub fn draw_clipped_ellipse(
    ctx: &mut dyn RenderContext,
    clip: Rect,
    rect: Rect,
    fill: Color,
    stroke: &Stroke,
    n: usize,
) {
    if clip.contains_rect(&rect) {
        ctx.draw_ellipse(rect, fill, stroke);
        return;
    }
    let n = n.max(3);
    let c = rect.center();
    let (rx, ry) = (rect.width * 0.5, rect.height * 0.5);
    let polygon: Vec<ScreenPoint> = (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64;
            ScreenPoint::new(c.x + rx * t.cos(), c.y + ry * t.sin())
        })
        .collect();
    let clipped = clip_polygon(clip, &polygon);
    if !clipped.is_empty() {
        ctx.draw_polygon(&clipped, fill, stroke);
    }
}

/// Text is drawn only when its anchor lies inside `clip`.
pub fn draw_clipped_text(
    ctx: &mut dyn RenderContext,
    clip: Rect,
    p: ScreenPoint,
    text: &str,
    color: Color,
    font: &Font,
    layout: &TextLayout,
) {
    if clip.contains(p) {
        ctx.draw_text(p, text, color, font, layout);
    }
}

/// Options for [`draw_data_line`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineOptions {
    /// Collapse each pixel column to its envelope before clipping.
    pub decimate: bool,
    /// Minimum screen distance between consecutive kept points.
    pub min_distance: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self { decimate: true, min_distance: 0.0 }
    }
}

/// Screen-space runs of `data`, split wherever a point is undefined or maps to a
/// non-finite screen position (e.g. a non-positive value on a log axis).
pub fn screen_runs(axes: &PlotAxes, data: &[DataPoint]) -> Vec<Vec<ScreenPoint>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    for &p in data {
        let s = axes.to_screen(p);
        if p.is_defined() && s.x.is_finite() && s.y.is_finite() {
            run.push(s);
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }
    runs
}

/// Draw a data series as a line: transform, split at gaps, optionally decimate,
/// then clip to `clip`. Returns the number of points handed to the clipper.
pub fn draw_data_line(
    ctx: &mut dyn RenderContext,
    clip: Rect,
    axes: &PlotAxes,
    data: &[DataPoint],
    stroke: &Stroke,
    options: LineOptions,
) -> usize {
    let min_distance_squared = options.min_distance * options.min_distance;
    let mut emitted = 0;
    let mut reduced = Vec::new();
    for run in screen_runs(axes, data) {
        // Transposed plots have their pixel columns along y; decimation is by x only.
        let points = if options.decimate && !axes.transposed {
            reduced.clear();
            decimate(&run, &mut reduced);
            &reduced
        } else {
            &run
        };
        emitted += points.len();
        draw_clipped_line(ctx, clip, points, min_distance_squared, stroke);
    }
    emitted
}
