// File: crates/plotkit-core/src/decimate.rs
// Summary: Per-pixel-column decimation of dense screen-space point runs.

use crate::geometry::ScreenPoint;

/// Running envelope of the pixel column currently being accumulated.
#[derive(Clone, Copy, Debug)]
struct Column {
    x: f64,
    first: f64,
    last: f64,
    min: f64,
    max: f64,
}

impl Column {
    fn start(x: f64, y: f64) -> Self {
        Self { x, first: y, last: y, min: y, max: y }
    }

    fn push(&mut self, y: f64) {
        if y < self.min {
            self.min = y;
        }
        if y > self.max {
            self.max = y;
        }
        self.last = y;
    }

    /// Emit first/min/max/last in an order that keeps the stroke continuous
    /// into the next column, skipping values that coincide.
    fn flush(&self, out: &mut Vec<ScreenPoint>) {
        let Column { x, first, last, min, max } = *self;
        let mut emit = |y: f64| out.push(ScreenPoint::new(x, y));

        emit(first);
        if first == min {
            if min != max {
                emit(max);
            }
            if max != last {
                emit(last);
            }
            return;
        }
        if first == max {
            if max != min {
                emit(min);
            }
            if min != last {
                emit(last);
            }
            return;
        }
        // first is strictly between min and max
        if last == min {
            emit(max);
        } else if last == max {
            emit(min);
        } else {
            emit(min);
            emit(max);
        }
        emit(last);
    }
}

/// Pixel column of a screen x. Ties round to even so that x = 0.5, 1.5, ...
/// split evenly between neighbours.
#[inline]
pub fn column_of(x: f64) -> f64 {
    x.round_ties_even()
}

/// Collapse consecutive points that share a rounded x column into at most four
/// points (first, min, max, last), appending the result to `output`.
///
/// Input must be a single continuous run of finite points; split at gaps first.
pub fn decimate(input: &[ScreenPoint], output: &mut Vec<ScreenPoint>) {
    let Some((head, rest)) = input.split_first() else {
        return;
    };

    let mut col = Column::start(column_of(head.x), head.y);
    for p in rest {
        let x = column_of(p.x);
        if x != col.x {
            col.flush(output);
            col = Column::start(x, p.y);
            continue;
        }
        col.push(p.y);
    }

    // The trailing column ends on its extreme instead of repeating one.
    col.last = if col.first == col.min { col.max } else { col.min };
    col.flush(output);
}

/// Allocating variant of [`decimate`].
pub fn decimated(input: &[ScreenPoint]) -> Vec<ScreenPoint> {
    let mut out = Vec::with_capacity(input.len().min(4096));
    decimate(input, &mut out);
    out
}
