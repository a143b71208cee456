// File: crates/plotkit-core/tests/decimate.rs
// Purpose: Per-column decimation keeps at most four points per column and preserves each column's envelope.

use std::collections::BTreeMap;

use plotkit_core::decimate::column_of;
use plotkit_core::{decimate, decimated, ScreenPoint};

/// Small deterministic generator so the test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn noisy_run(n: usize, seed: u64) -> Vec<ScreenPoint> {
    let mut rng = Lcg(seed);
    let mut x = 0.0;
    (0..n)
        .map(|_| {
            x += rng.next_f64() * 0.3;
            ScreenPoint::new(x, rng.next_f64() * 480.0)
        })
        .collect()
}

fn envelopes(points: &[ScreenPoint]) -> BTreeMap<i64, (f64, f64, usize)> {
    let mut cols = BTreeMap::new();
    for p in points {
        let e = cols.entry(column_of(p.x) as i64).or_insert((f64::INFINITY, f64::NEG_INFINITY, 0));
        e.0 = e.0.min(p.y);
        e.1 = e.1.max(p.y);
        e.2 += 1;
    }
    cols
}

#[test]
fn column_envelope_is_preserved() {
    for seed in [1, 7, 42, 1234] {
        let input = noisy_run(5_000, seed);
        let output = decimated(&input);
        assert!(output.len() < input.len());

        let before = envelopes(&input);
        let after = envelopes(&output);
        assert_eq!(before.len(), after.len());
        for (col, (min, max, _)) in &before {
            let (omin, omax, count) = after[col];
            assert_eq!((omin, omax), (*min, *max), "column {col}");
            assert!(count <= 4, "column {col} emitted {count} points");
        }
    }
}

#[test]
fn emitted_x_is_the_column() {
    let output = decimated(&noisy_run(500, 99));
    for p in &output {
        assert_eq!(p.x, p.x.round());
    }
}

#[test]
fn interior_first_and_last_emit_four_points() {
    let input = [
        ScreenPoint::new(0.0, 5.0),
        ScreenPoint::new(0.1, 1.0),
        ScreenPoint::new(0.2, 9.0),
        ScreenPoint::new(0.3, 4.0),
        ScreenPoint::new(1.0, 3.0),
        ScreenPoint::new(1.1, 3.0),
    ];
    let out = decimated(&input);
    let expected = [(0.0, 5.0), (0.0, 1.0), (0.0, 9.0), (0.0, 4.0), (1.0, 3.0)];
    assert_eq!(out, expected.map(ScreenPoint::from).to_vec());
}

#[test]
fn last_at_extreme_keeps_continuity() {
    // first is interior and the column ends on its minimum: max comes before the final min
    let input = [
        ScreenPoint::new(0.0, 5.0),
        ScreenPoint::new(0.2, 9.0),
        ScreenPoint::new(0.4, 1.0),
        ScreenPoint::new(3.0, 0.0),
    ];
    let out = decimated(&input);
    assert_eq!(out[..3], [ScreenPoint::new(0.0, 5.0), ScreenPoint::new(0.0, 9.0), ScreenPoint::new(0.0, 1.0)]);
    assert_eq!(out[3], ScreenPoint::new(3.0, 0.0));
}

#[test]
fn trailing_column_ends_on_extreme() {
    let input = [
        ScreenPoint::new(0.0, 2.0),
        ScreenPoint::new(0.1, 8.0),
        ScreenPoint::new(0.2, 5.0),
    ];
    // first == min, so the trailing column closes on max without repeating the last sample
    assert_eq!(decimated(&input), vec![ScreenPoint::new(0.0, 2.0), ScreenPoint::new(0.0, 8.0)]);
}

#[test]
fn ties_round_to_even_columns() {
    assert_eq!(column_of(0.5), 0.0);
    assert_eq!(column_of(1.5), 2.0);
    assert_eq!(column_of(2.5), 2.0);
    assert_eq!(column_of(-0.4), 0.0);
}

#[test]
fn appends_to_existing_output() {
    let mut out = vec![ScreenPoint::new(-1.0, -1.0)];
    decimate(&[ScreenPoint::new(3.0, 3.0)], &mut out);
    assert_eq!(out, vec![ScreenPoint::new(-1.0, -1.0), ScreenPoint::new(3.0, 3.0)]);

    decimate(&[], &mut out);
    assert_eq!(out.len(), 2);
}
