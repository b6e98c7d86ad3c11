//! Various math tools that are mostly useful for the path crates.

use crate::math::{vector, Point, Vector};
use crate::numerical::TRIGONOMETRIC_EPSILON;

#[inline]
pub fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
pub fn tangent(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Whether two vectors point in the same or opposite directions within
/// `TRIGONOMETRIC_EPSILON` of their normalized cross product.
#[inline]
pub fn is_collinear(v1: Vector, v2: Vector) -> bool {
    let cross = v1.cross(v2);
    cross * cross <= TRIGONOMETRIC_EPSILON * v1.square_length() * v2.square_length()
}

/// Angle of a vector against the x axis, in radians in `(-PI, PI]`.
#[inline]
pub fn vector_angle(v: Vector) -> f64 {
    v.y.atan2(v.x)
}

/// Angle between vectors v1 and v2 (oriented clockwise assuming y points
/// downwards). The result is a number between `0` and `2 * PI`.
#[inline]
pub fn directed_angle(v1: Vector, v2: Vector) -> f64 {
    let angle = v2.y.atan2(v2.x) - v1.y.atan2(v1.x);
    if angle < 0.0 {
        angle + 2.0 * core::f64::consts::PI
    } else {
        angle
    }
}

/// Whether two points are closer to each other than `tolerance`.
#[inline]
pub fn points_close(p1: Point, p2: Point, tolerance: f64) -> bool {
    (p1 - p2).square_length() <= tolerance * tolerance
}

#[test]
fn collinear_vectors() {
    assert!(is_collinear(vector(1.0, 2.0), vector(-2.0, -4.0)));
    assert!(is_collinear(vector(1.0, 0.0), vector(1e5, 0.0)));
    assert!(!is_collinear(vector(1.0, 0.0), vector(1.0, 0.1)));
}

#[test]
fn directed_angles() {
    let quarter = core::f64::consts::FRAC_PI_2;
    assert!((directed_angle(vector(0.0, 1.0), vector(1.0, 0.0)) - 3.0 * quarter).abs() < 1e-12);
    assert!((directed_angle(vector(1.0, 0.0), vector(0.0, 1.0)) - quarter).abs() < 1e-12);
}
