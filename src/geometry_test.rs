#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn square() -> Vec<Point> {
    vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)]
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_from_pair() {
    let p: Point = [1.5, -2.0].into();
    assert_eq!(p, Point::new(1.5, -2.0));
}

#[test]
fn point_is_finite_rejects_nan() {
    assert!(Point::new(1.0, 2.0).is_finite());
    assert!(!Point::new(f64::NAN, 2.0).is_finite());
    assert!(!Point::new(1.0, f64::INFINITY).is_finite());
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn bounds_dimensions() {
    let b = Bounds::new(10.0, 20.0, 110.0, 70.0);
    assert_eq!(b.width(), 100.0);
    assert_eq!(b.height(), 50.0);
}

#[test]
fn bounds_contains_strict_excludes_edges() {
    let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
    assert!(b.contains_strict(Point::new(5.0, 5.0)));
    assert!(!b.contains_strict(Point::new(0.0, 5.0)));
    assert!(!b.contains_strict(Point::new(5.0, 10.0)));
}

#[test]
fn bounds_union_encloses_both() {
    let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
    let b = Bounds::new(-5.0, 3.0, 8.0, 20.0);
    assert_eq!(a.union(&b), Bounds::new(-5.0, 0.0, 10.0, 20.0));
}

// =============================================================
// Size
// =============================================================

#[test]
fn size_center_is_half_extent() {
    assert_eq!(Size::new(800.0, 600.0).center(), Point::new(400.0, 300.0));
}

#[test]
fn size_is_empty_for_zero_negative_and_nan() {
    assert!(!Size::new(1.0, 1.0).is_empty());
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(Size::new(10.0, -1.0).is_empty());
    assert!(Size::new(f64::NAN, 10.0).is_empty());
}

// =============================================================
// Affine
// =============================================================

#[test]
fn affine_identity_is_noop() {
    let p = Point::new(3.0, -7.0);
    assert_eq!(Affine::IDENTITY.apply(p), p);
}

#[test]
fn affine_then_local_applies_inner_first() {
    // translate(10, 0) then scale(2) in canvas order: scale applies to the point first.
    let m = Affine::translate(10.0, 0.0).then_local(&Affine::scale(2.0, 2.0));
    let p = m.apply(Point::new(1.0, 1.0));
    assert!(approx_eq(p.x, 12.0));
    assert!(approx_eq(p.y, 2.0));
}

#[test]
fn affine_rotate_quarter_turn() {
    let p = Affine::rotate(std::f64::consts::FRAC_PI_2).apply(Point::new(1.0, 0.0));
    assert!(approx_eq(p.x, 0.0));
    assert!(approx_eq(p.y, 1.0));
}

#[test]
fn affine_coeffs_order() {
    let m = Affine::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
    assert_eq!(m.coeffs(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

// =============================================================
// inside
// =============================================================

#[test]
fn inside_square_contains_center() {
    assert!(inside(Point::new(5.0, 5.0), &square(), false));
}

#[test]
fn inside_square_excludes_outside_point() {
    assert!(!inside(Point::new(15.0, 5.0), &square(), false));
}

#[test]
fn inside_edge_outcomes_are_deterministic() {
    let ring = square();
    assert!(inside(Point::new(0.0, 5.0), &ring, false));
    assert!(inside(Point::new(5.0, 0.0), &ring, false));
    assert!(!inside(Point::new(10.0, 5.0), &ring, false));
    assert!(!inside(Point::new(5.0, 10.0), &ring, false));
    // Repeated calls agree.
    for _ in 0..3 {
        assert!(inside(Point::new(0.0, 5.0), &ring, false));
    }
}

#[test]
fn inside_outside_seed_inverts_result() {
    let ring = square();
    assert!(!inside(Point::new(5.0, 5.0), &ring, true));
    assert!(inside(Point::new(15.0, 5.0), &ring, true));
}

#[test]
fn inside_empty_ring_returns_seed() {
    assert!(!inside(Point::new(0.0, 0.0), &[], false));
    assert!(inside(Point::new(0.0, 0.0), &[], true));
}

#[test]
fn inside_degenerate_ring_does_not_flip() {
    let flat = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 0.0)];
    assert!(!inside(Point::new(5.0, 0.0), &flat, false));
    assert!(!inside(Point::new(5.0, 1.0), &flat, false));
}

#[test]
fn inside_concave_ring() {
    // U shape opening upwards.
    let ring = [
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(30.0, 30.0),
        Point::new(20.0, 30.0),
        Point::new(20.0, 10.0),
        Point::new(10.0, 10.0),
        Point::new(10.0, 30.0),
        Point::new(0.0, 30.0),
    ];
    assert!(inside(Point::new(5.0, 20.0), &ring, false));
    assert!(!inside(Point::new(15.0, 20.0), &ring, false));
    assert!(inside(Point::new(15.0, 5.0), &ring, false));
}

// =============================================================
// random_color
// =============================================================

#[test]
fn random_color_is_hex_triplet() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let c = random_color(&mut rng);
        assert_eq!(c.len(), 7);
        assert!(c.starts_with('#'));
        assert!(c[1..].chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_lowercase()));
    }
}

#[test]
fn random_color_is_seed_deterministic() {
    let a = random_color(&mut StdRng::seed_from_u64(42));
    let b = random_color(&mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}
