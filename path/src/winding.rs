//! Winding numbers of a point with respect to a set of curves.
//!
//! The winding is accumulated separately for crossings left and right of
//! the point. For a point that does not lie on any curve both sides agree
//! and equal the classic winding number (positive for clockwise loops in
//! y-down coordinates); for a point on a curve each on-curve crossing
//! contributes one half to both sides, so that a boundary shared by two
//! filled regions still accumulates a full winding.
//!
//! Crossings are counted per y-monotonic piece with a half-open interval
//! predicate, so that a crossing through a segment anchor is counted
//! exactly once and a tangent touch cancels out.

use crate::geom::numerical::{EPSILON, GEOMETRIC_EPSILON};
use crate::geom::CubicBezierSegment;
use crate::math::{point, Point};
use crate::FillRule;

/// The winding record of one sampled point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Winding {
    /// The combined winding number, `max(|winding_l|, |winding_r|)`.
    pub winding: f64,
    pub winding_l: f64,
    pub winding_r: f64,
    /// Whether a crossing coincided with the point itself.
    pub on_path: bool,
    /// 1 for a clean sample, 0 when the point sat on a curve; used to
    /// retry the sampling at a different offset.
    pub quality: f64,
}

impl Winding {
    pub fn is_inside(&self, rule: FillRule) -> bool {
        match rule {
            FillRule::EvenOdd => {
                (round_i64(self.winding_l) & 1 == 1) || (round_i64(self.winding_r) & 1 == 1)
            }
            FillRule::NonZero => round_i64(self.winding) != 0,
        }
    }
}

#[inline]
fn round_i64(v: f64) -> i64 {
    v.round() as i64
}

#[inline]
fn swap_xy(v: &CubicBezierSegment) -> CubicBezierSegment {
    CubicBezierSegment {
        from: point(v.from.y, v.from.x),
        ctrl1: point(v.ctrl1.y, v.ctrl1.x),
        ctrl2: point(v.ctrl2.y, v.ctrl2.x),
        to: point(v.to.y, v.to.x),
    }
}

// The time within [ta, tb] (monotonic in y over that range) at which the
// curve reaches `y`.
fn monotone_time_at_y(v: &CubicBezierSegment, ta: f64, tb: f64, y: f64, increasing: bool) -> f64 {
    let (mut lo, mut hi) = (ta, tb);
    for _ in 0..48 {
        let mid = (lo + hi) * 0.5;
        if (v.y(mid) < y) == increasing {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) * 0.5
}

/// Compute the winding of `p` with respect to `curves` by casting a
/// horizontal ray (or a vertical one when `vertical` is set, which is more
/// reliable when the curve through the sample runs mostly horizontally).
pub fn winding_at(p: Point, curves: &[CubicBezierSegment], vertical: bool) -> Winding {
    // The vertical case mirrors the plane across the diagonal, which flips
    // orientations; the contribution sign compensates so both directions
    // report the same winding.
    let (p, orientation) = if vertical {
        (point(p.y, p.x), -1.0)
    } else {
        (p, 1.0)
    };

    let mut winding_l: f64 = 0.0;
    let mut winding_r: f64 = 0.0;
    let mut on_path = false;

    for curve in curves {
        let v = if vertical { swap_xy(curve) } else { *curve };

        let (min_y, max_y) = v.fast_bounding_range_y();
        if p.y < min_y || p.y > max_y {
            continue;
        }

        if max_y - min_y < EPSILON {
            // A curve running along the ray contributes no crossing, but a
            // point on it is on the path.
            let (min_x, max_x) = v.fast_bounding_range_x();
            if p.x >= min_x - GEOMETRIC_EPSILON && p.x <= max_x + GEOMETRIC_EPSILON {
                on_path = true;
            }
            continue;
        }

        // Cut the curve at its y extrema and count one crossing per
        // monotonic piece whose half-open y interval contains the ray.
        let mut ts = [0.0, 1.0, 1.0, 1.0];
        let mut count = 1;
        v.for_each_local_y_extremum_t(&mut |t| {
            ts[count] = t;
            count += 1;
        });
        ts[count] = 1.0;
        ts[..=count].sort_by(|a, b| a.partial_cmp(b).unwrap());

        for piece in 0..count {
            let (ta, tb) = (ts[piece], ts[piece + 1]);
            let y0 = v.y(ta);
            let y1 = v.y(tb);
            if (y0 <= p.y) == (y1 <= p.y) {
                continue;
            }
            let increasing = y1 > y0;
            let t = monotone_time_at_y(&v, ta, tb, p.y, increasing);
            let s = orientation * if increasing { 1.0 } else { -1.0 };
            let x = v.x(t);
            if x < p.x - GEOMETRIC_EPSILON {
                winding_l -= s;
            } else if x > p.x + GEOMETRIC_EPSILON {
                winding_r += s;
            } else {
                on_path = true;
                winding_l -= s * 0.5;
                winding_r += s * 0.5;
            }
        }
    }

    Winding {
        winding: winding_l.abs().max(winding_r.abs()),
        winding_l,
        winding_r,
        on_path,
        quality: if on_path { 0.0 } else { 1.0 },
    }
}
