//! Geometry primitives: points, rectangles, affine transforms, and the
//! ray-casting containment test used by every hit test in the crate.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A point in any of the viewer's coordinate spaces.
///
/// The space is implied by the function that produced it: canvas pixels,
/// HPL pixels, world units, or tour map units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Strict containment: points on an edge are outside.
    #[must_use]
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }

    /// Smallest box enclosing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Width and height of a canvas, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether either side is zero, negative, or not a number.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// 2D affine transform in canvas `setTransform(a, b, c, d, e, f)` order.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Compose like the canvas `transform()` call: `other` is applied to
    /// points first, then `self`.
    #[must_use]
    pub fn then_local(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point { x: self.a * p.x + self.c * p.y + self.e, y: self.b * p.x + self.d * p.y + self.f }
    }

    /// Coefficients in `setTransform` order.
    #[must_use]
    pub fn coeffs(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Even-odd ray-casting containment test over a closed ring.
///
/// `outside` seeds the parity: with `true` the result is inverted, which is
/// how well polygons are tested (a point is accepted when it is *not* inside
/// the ring). For an axis-aligned ring, points exactly on the minimum-x or
/// minimum-y edge count as inside and points on the maximum-x or maximum-y
/// edge as outside. Empty and degenerate rings never flip the seed.
#[must_use]
pub fn inside(point: Point, ring: &[Point], outside: bool) -> bool {
    let mut result = outside;
    let Some(mut prev) = ring.last().copied() else {
        return result;
    };
    for &cur in ring {
        let crosses = (cur.y > point.y) != (prev.y > point.y);
        if crosses {
            let x_at = (prev.x - cur.x) * (point.y - cur.y) / (prev.y - cur.y) + cur.x;
            if point.x < x_at {
                result = !result;
            }
        }
        prev = cur;
    }
    result
}

/// Random `#RRGGBB` colour, used for debug room outlines.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut color = String::with_capacity(7);
    color.push('#');
    for _ in 0..6 {
        color.push(char::from(HEX[rng.random_range(0..16)]));
    }
    color
}
