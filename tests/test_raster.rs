use std::collections::BTreeSet;

use car_destroyer::raster::{circle, line, Pixel};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn pixels(it: impl Iterator<Item = Pixel>) -> Vec<(i32, i32)> {
    it.map(|p| (p.x, p.y)).collect()
}

fn pixel_set(it: impl Iterator<Item = Pixel>) -> BTreeSet<(i32, i32)> {
    it.map(|p| (p.x, p.y)).collect()
}

// ── line ──────────────────────────────────────────────────────────────────────

#[test]
fn line_degenerate_is_one_pixel() {
    assert_eq!(pixels(line(4, -3, 4, -3)), vec![(4, -3)]);
}

#[test]
fn line_shallow_matches_midpoint_walk() {
    assert_eq!(
        pixels(line(0, 0, 5, 2)),
        vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2)]
    );
}

#[test]
fn line_horizontal_and_vertical() {
    assert_eq!(pixels(line(2, 7, 5, 7)), vec![(2, 7), (3, 7), (4, 7), (5, 7)]);
    let vertical = pixel_set(line(1, 5, 1, 1));
    let expected: BTreeSet<_> = (1..=5).map(|y| (1, y)).collect();
    assert_eq!(vertical, expected);
}

#[test]
fn line_diagonal_steps_both_axes() {
    assert_eq!(pixels(line(0, 0, 3, -3)), vec![(0, 0), (1, -1), (2, -2), (3, -3)]);
}

#[test]
fn line_covers_all_octants_with_inclusive_endpoints() {
    let targets = [
        (9, 4), (4, 9), (-4, 9), (-9, 4),
        (-9, -4), (-4, -9), (4, -9), (9, -4),
    ];
    for (tx, ty) in targets {
        let px = pixels(line(0, 0, tx, ty));
        let set: BTreeSet<_> = px.iter().copied().collect();
        assert!(set.contains(&(0, 0)), "start missing for ({tx},{ty})");
        assert!(set.contains(&(tx, ty)), "end missing for ({tx},{ty})");
        // One pixel per step along the major axis.
        assert_eq!(px.len() as i32, tx.abs().max(ty.abs()) + 1);
        // Consecutive pixels are 8-connected.
        for w in px.windows(2) {
            assert!((w[0].0 - w[1].0).abs() <= 1 && (w[0].1 - w[1].1).abs() <= 1);
        }
    }
}

#[test]
fn line_is_symmetric_in_its_endpoints() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let (x0, y0, x1, y1) = (
            rng.gen_range(-60..60),
            rng.gen_range(-60..60),
            rng.gen_range(-60..60),
            rng.gen_range(-60..60),
        );
        assert_eq!(
            pixel_set(line(x0, y0, x1, y1)),
            pixel_set(line(x1, y1, x0, y0)),
            "({x0},{y0})-({x1},{y1})"
        );
    }
}

// ── circle ────────────────────────────────────────────────────────────────────

#[test]
fn circle_zero_radius_is_the_centre() {
    assert_eq!(pixels(circle(3, -2, 0)), vec![(3, -2)]);
}

#[test]
fn circle_radius_one_is_a_plus() {
    let expected: BTreeSet<_> = [(1, 0), (-1, 0), (0, 1), (0, -1)].into_iter().collect();
    assert_eq!(pixel_set(circle(0, 0, 1)), expected);
}

#[test]
fn circle_emits_eight_points_per_step() {
    for r in 1..30u32 {
        assert_eq!(circle(0, 0, r).count() % 8, 0);
    }
}

#[test]
fn circle_stays_within_one_of_radius() {
    for r in 0..50u32 {
        for p in circle(10, -20, r) {
            let (dx, dy) = ((p.x - 10) as f64, (p.y + 20) as f64);
            let d = (dx * dx + dy * dy).sqrt();
            assert!((d - r as f64).abs() <= 1.0, "r={r} gave {:?} at distance {d}", p);
        }
    }
}

#[test]
fn circle_is_eightfold_symmetric() {
    for r in 0..40u32 {
        let set = pixel_set(circle(0, 0, r));
        for &(x, y) in &set {
            for q in [
                (x, y), (-x, y), (x, -y), (-x, -y),
                (y, x), (-y, x), (y, -x), (-y, -x),
            ] {
                assert!(set.contains(&q), "r={r}: {:?} missing reflection {:?}", (x, y), q);
            }
        }
    }
}

#[test]
fn circle_huge_radius_saturates() {
    let first: Vec<_> = pixels(circle(0, 0, u32::MAX).take(8));
    assert_eq!(first.len(), 8);
    assert_eq!(first[0], (i32::MAX, 0));
    assert_eq!(first[4], (0, i32::MAX));
}

#[test]
fn circle_is_translated_by_its_centre() {
    let origin = pixel_set(circle(0, 0, 12));
    let moved: BTreeSet<_> = circle(100, -40, 12).map(|p| (p.x - 100, p.y + 40)).collect();
    assert_eq!(origin, moved);
}
