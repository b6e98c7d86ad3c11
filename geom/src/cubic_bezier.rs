use crate::line::{Line, LineSegment};
use crate::math::{point, rect, Point, Rect, Transform, Vector};
use crate::numerical::{
    clamp, is_zero, solve_cubic, solve_quadratic, CURVETIME_EPSILON, EPSILON, GEOMETRIC_EPSILON,
};
use crate::utils::{is_collinear, min_max, points_close};
use arrayvec::ArrayVec;

use std::ops::Range;

/// A 2d curve segment defined by four points: the beginning of the segment,
/// two control points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

/// The shape class of a cubic bézier curve.
///
/// Only a `Loop` has a self-intersection, at the two reported parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveKind {
    Line,
    Quadratic,
    Serpentine,
    Cusp,
    Loop,
    /// An inflection-free arch: the curve class had solutions, but none
    /// within `(0, 1)`.
    Arch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurveClassification {
    pub kind: CurveKind,
    /// Inflection parameters (or the double-point parameters of a loop)
    /// within `(0, 1)`, sorted.
    pub roots: ArrayVec<f64, 2>,
}

impl CubicBezierSegment {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;
        self.from * one_t3
            + self.ctrl1.to_vector() * 3.0 * one_t2 * t
            + self.ctrl2.to_vector() * 3.0 * one_t * t2
            + self.to.to_vector() * t3
    }

    /// Sample the x coordinate of the curve at t (expecting t between 0 and 1).
    pub fn x(&self, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;
        self.from.x * one_t3
            + self.ctrl1.x * 3.0 * one_t2 * t
            + self.ctrl2.x * 3.0 * one_t * t2
            + self.to.x * t3
    }

    /// Sample the y coordinate of the curve at t (expecting t between 0 and 1).
    pub fn y(&self, t: f64) -> f64 {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;
        self.from.y * one_t3
            + self.ctrl1.y * 3.0 * one_t2 * t
            + self.ctrl2.y * 3.0 * one_t * t2
            + self.to.y * t3
    }

    #[inline]
    fn derivative_coefficients(&self, t: f64) -> (f64, f64, f64, f64) {
        let t2 = t * t;
        (
            -3.0 * t2 + 6.0 * t - 3.0,
            9.0 * t2 - 12.0 * t + 3.0,
            -9.0 * t2 + 6.0 * t,
            3.0 * t2,
        )
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn derivative(&self, t: f64) -> Vector {
        let (c0, c1, c2, c3) = self.derivative_coefficients(t);
        self.from.to_vector() * c0
            + self.ctrl1.to_vector() * c1
            + self.ctrl2.to_vector() * c2
            + self.to.to_vector() * c3
    }

    /// Sample the x coordinate of the curve's derivative at t.
    pub fn dx(&self, t: f64) -> f64 {
        let (c0, c1, c2, c3) = self.derivative_coefficients(t);
        self.from.x * c0 + self.ctrl1.x * c1 + self.ctrl2.x * c2 + self.to.x * c3
    }

    /// Sample the y coordinate of the curve's derivative at t.
    pub fn dy(&self, t: f64) -> f64 {
        let (c0, c1, c2, c3) = self.derivative_coefficients(t);
        self.from.y * c0 + self.ctrl1.y * c1 + self.ctrl2.y * c2 + self.to.y * c3
    }

    /// The unit tangent at t, pointing in the direction of increasing t.
    ///
    /// Curves with a retracted handle have a vanishing derivative at the
    /// corresponding endpoint; the tangent is then taken from a sample just
    /// inside the curve.
    pub fn tangent(&self, t: f64) -> Vector {
        let d = self.derivative(t);
        if d.square_length() >= EPSILON {
            return d.normalize();
        }
        let (t2, sign) = if t < 0.5 {
            (clamp(t + 1e-4, 0.0, 1.0), 1.0)
        } else {
            (clamp(t - 1e-4, 0.0, 1.0), -1.0)
        };
        let d = (self.sample(t2) - self.sample(t)) * sign;
        if d.square_length() >= EPSILON * EPSILON {
            d.normalize()
        } else {
            crate::math::vector(0.0, 0.0)
        }
    }

    /// Split this curve into two sub-curves.
    pub fn split(&self, t: f64) -> (CubicBezierSegment, CubicBezierSegment) {
        let ctrl1a = self.from + (self.ctrl1 - self.from) * t;
        let ctrl2a = self.ctrl1 + (self.ctrl2 - self.ctrl1) * t;
        let ctrl1aa = ctrl1a + (ctrl2a - ctrl1a) * t;
        let ctrl3a = self.ctrl2 + (self.to - self.ctrl2) * t;
        let ctrl2aa = ctrl2a + (ctrl3a - ctrl2a) * t;
        let ctrl1aaa = ctrl1aa + (ctrl2aa - ctrl1aa) * t;
        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: ctrl1aaa,
            },
            CubicBezierSegment {
                from: ctrl1aaa,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Return the curve before the split point.
    pub fn before_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).0
    }

    /// Return the curve after the split point.
    pub fn after_split(&self, t: f64) -> CubicBezierSegment {
        self.split(t).1
    }

    /// Return the sub-curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        let (t0, t1) = (t_range.start, t_range.end);
        let mut v = *self;
        if t0 > 0.0 {
            v = v.after_split(t0);
        }
        if t1 < 1.0 {
            let t = if t0 > 0.0 { (t1 - t0) / (1.0 - t0) } else { t1 };
            v = v.before_split(t);
        }
        v
    }

    #[inline]
    pub fn baseline(&self) -> LineSegment {
        LineSegment {
            from: self.from,
            to: self.to,
        }
    }

    /// Whether the control points lie on the baseline within `tolerance`.
    pub fn is_linear(&self, tolerance: f64) -> bool {
        if (self.from - self.to).square_length() < EPSILON {
            return false;
        }
        self.non_point_is_linear(tolerance)
    }

    #[inline]
    fn non_point_is_linear(&self, tolerance: f64) -> bool {
        let line = self.baseline().to_line().equation();
        line.distance_to_point(self.ctrl1) <= tolerance
            && line.distance_to_point(self.ctrl2) <= tolerance
    }

    pub fn is_a_point(&self, tolerance: f64) -> bool {
        let tolerance_squared = tolerance * tolerance;
        // Use <= so that tolerance can be zero.
        (self.from - self.to).square_length() <= tolerance_squared
            && (self.from - self.ctrl1).square_length() <= tolerance_squared
            && (self.to - self.ctrl2).square_length() <= tolerance_squared
    }

    /// Whether the curve is geometrically a straight segment from `from` to
    /// `to`: both handles either retracted or collinear with the chord and
    /// not overshooting it.
    pub fn is_straight(&self) -> bool {
        let h1 = self.ctrl1 - self.from;
        let h2 = self.ctrl2 - self.to;
        if h1.square_length() == 0.0 && h2.square_length() == 0.0 {
            return true;
        }
        let v = self.to - self.from;
        if v.square_length() == 0.0 {
            return false;
        }
        if is_collinear(v, h1) && is_collinear(v, h2) {
            let line = Line {
                point: self.from,
                vector: v,
            }
            .equation();
            if line.distance_to_point(self.ctrl1) < GEOMETRIC_EPSILON
                && line.distance_to_point(self.ctrl2) < GEOMETRIC_EPSILON
            {
                let div = v.dot(v);
                let s1 = v.dot(h1) / div;
                let s2 = v.dot(h2) / div;
                return (0.0..=1.0).contains(&s1) && (-1.0..=0.0).contains(&s2);
            }
        }
        false
    }

    #[inline]
    pub fn has_handles(&self) -> bool {
        self.ctrl1 != self.from || self.ctrl2 != self.to
    }

    /// Computes the signed distances (min <= 0 and max >= 0) from the
    /// baseline of this curve to its two "fat line" boundary lines.
    ///
    /// A fat line is two conservative lines between which the segment is
    /// fully contained.
    pub(crate) fn fat_line_min_max(&self) -> (f64, f64) {
        let baseline = self.baseline().to_line().equation();
        let (d1, d2) = min_max(
            baseline.signed_distance_to_point(self.ctrl1),
            baseline.signed_distance_to_point(self.ctrl2),
        );

        let factor = if d1 * d2 > 0.0 { 3.0 / 4.0 } else { 4.0 / 9.0 };

        (factor * d1.min(0.0), factor * d2.max(0.0))
    }

    /// Applies the transform to this curve and returns the results.
    #[inline]
    pub fn transformed(&self, transform: &Transform) -> Self {
        CubicBezierSegment {
            from: transform.transform_point(self.from),
            ctrl1: transform.transform_point(self.ctrl1),
            ctrl2: transform.transform_point(self.ctrl2),
            to: transform.transform_point(self.to),
        }
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&self) -> Self {
        CubicBezierSegment {
            from: self.to,
            ctrl1: self.ctrl2,
            ctrl2: self.ctrl1,
            to: self.from,
        }
    }

    /// Return the parameter values corresponding to a given x coordinate,
    /// within `[0, 1]`.
    pub fn solve_t_for_x(&self, x: f64) -> ArrayVec<f64, 3> {
        self.parameters_for_value(x, self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x)
    }

    /// Return the parameter values corresponding to a given y coordinate,
    /// within `[0, 1]`.
    pub fn solve_t_for_y(&self, y: f64) -> ArrayVec<f64, 3> {
        self.parameters_for_value(y, self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y)
    }

    fn parameters_for_value(
        &self,
        value: f64,
        from: f64,
        ctrl1: f64,
        ctrl2: f64,
        to: f64,
    ) -> ArrayVec<f64, 3> {
        let a = -from + 3.0 * ctrl1 - 3.0 * ctrl2 + to;
        let b = 3.0 * from - 6.0 * ctrl1 + 3.0 * ctrl2;
        let c = -3.0 * from + 3.0 * ctrl1;
        let d = from - value;
        solve_cubic(a, b, c, d, Some((0.0, 1.0)))
    }

    fn for_each_local_extremum<F>(p0: f64, p1: f64, p2: f64, p3: f64, cb: &mut F)
    where
        F: FnMut(f64),
    {
        // The derivative of a cubic bezier curve along one coordinate is a
        // second degree polynomial a·t² + b·t + c.
        let a = 3.0 * (p3 + 3.0 * (p1 - p2) - p0);
        let b = 6.0 * (p2 - 2.0 * p1 + p0);
        let c = 3.0 * (p1 - p0);

        for t in solve_quadratic(a, b, c, None) {
            if t > 0.0 && t < 1.0 {
                cb(t);
            }
        }
    }

    /// Invoke a callback at each local x extremum in `(0, 1)`.
    pub fn for_each_local_x_extremum_t<F>(&self, cb: &mut F)
    where
        F: FnMut(f64),
    {
        Self::for_each_local_extremum(self.from.x, self.ctrl1.x, self.ctrl2.x, self.to.x, cb)
    }

    /// Invoke a callback at each local y extremum in `(0, 1)`.
    pub fn for_each_local_y_extremum_t<F>(&self, cb: &mut F)
    where
        F: FnMut(f64),
    {
        Self::for_each_local_extremum(self.from.y, self.ctrl1.y, self.ctrl2.y, self.to.y, cb)
    }

    /// Returns a conservative rectangle the curve is contained in.
    ///
    /// This method is faster than `bounding_rect` but more conservative.
    pub fn fast_bounding_rect(&self) -> Rect {
        let (min_x, max_x) = self.fast_bounding_range_x();
        let (min_y, max_y) = self.fast_bounding_range_y();
        rect(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[inline]
    pub fn fast_bounding_range_x(&self) -> (f64, f64) {
        let min_x = self.from.x.min(self.ctrl1.x).min(self.ctrl2.x).min(self.to.x);
        let max_x = self.from.x.max(self.ctrl1.x).max(self.ctrl2.x).max(self.to.x);
        (min_x, max_x)
    }

    #[inline]
    pub fn fast_bounding_range_y(&self) -> (f64, f64) {
        let min_y = self.from.y.min(self.ctrl1.y).min(self.ctrl2.y).min(self.to.y);
        let max_y = self.from.y.max(self.ctrl1.y).max(self.ctrl2.y).max(self.to.y);
        (min_y, max_y)
    }

    /// Returns the smallest rectangle the curve is contained in: the
    /// endpoints extended by the curve's extrema.
    pub fn bounding_rect(&self) -> Rect {
        let (min_x, max_x) = self.bounding_range_x();
        let (min_y, max_y) = self.bounding_range_y();
        rect(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// The bounding rectangle, padded on all sides.
    pub fn bounding_rect_padded(&self, padding: f64) -> Rect {
        self.bounding_rect().inflate(padding, padding)
    }

    #[inline]
    pub fn bounding_range_x(&self) -> (f64, f64) {
        let (mut min_x, mut max_x) = min_max(self.from.x, self.to.x);
        self.for_each_local_x_extremum_t(&mut |t| {
            let x = self.x(t);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        });
        (min_x, max_x)
    }

    #[inline]
    pub fn bounding_range_y(&self) -> (f64, f64) {
        let (mut min_y, mut max_y) = min_max(self.from.y, self.to.y);
        self.for_each_local_y_extremum_t(&mut |t| {
            let y = self.y(t);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        });
        (min_y, max_y)
    }

    /// The signed area between the curve and the origin, as the line
    /// integral `½ ∫ (x·y′ − y·x′) dt`.
    ///
    /// Summed over a closed loop of curves this yields the enclosed signed
    /// area, positive for clockwise loops in y-down coordinates.
    pub fn signed_area(&self) -> f64 {
        let (x0, y0) = (self.from.x, self.from.y);
        let (x1, y1) = (self.ctrl1.x, self.ctrl1.y);
        let (x2, y2) = (self.ctrl2.x, self.ctrl2.y);
        let (x3, y3) = (self.to.x, self.to.y);
        3.0 * ((y3 - y0) * (x1 + x2) - (x3 - x0) * (y1 + y2)
            + y1 * (x0 - x2)
            - x1 * (y0 - y2)
            + y3 * (x2 + x0 / 3.0)
            - x3 * (y2 + y0 / 3.0))
            / 20.0
    }

    /// The arc length of the curve, by adaptive subdivision.
    pub fn length(&self) -> f64 {
        fn recurse(v: &CubicBezierSegment, tolerance: f64, depth: u32) -> f64 {
            let chord = (v.to - v.from).length();
            let poly = (v.ctrl1 - v.from).length()
                + (v.ctrl2 - v.ctrl1).length()
                + (v.to - v.ctrl2).length();
            if poly - chord <= tolerance || depth >= 24 {
                return (2.0 * chord + poly) / 3.0;
            }
            let (a, b) = v.split(0.5);
            recurse(&a, tolerance * 0.5, depth + 1) + recurse(&b, tolerance * 0.5, depth + 1)
        }
        recurse(self, GEOMETRIC_EPSILON, 0)
    }

    /// The curve time at which the arc length from the start equals
    /// `length`, clamped to `[0, 1]`.
    pub fn time_at_length(&self, length: f64) -> f64 {
        let total = self.length();
        if length <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        if length >= total {
            return 1.0;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..32 {
            let mid = (lo + hi) * 0.5;
            if self.before_split(mid).length() < length {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        (lo + hi) * 0.5
    }

    /// The point at arc length `offset` from the start of the curve;
    /// negative offsets measure from the end.
    pub fn point_at_length(&self, offset: f64) -> Point {
        let t = if offset < 0.0 {
            self.time_at_length(self.length() + offset)
        } else {
            self.time_at_length(offset)
        };
        self.sample(t)
    }

    /// Classify the curve by its inflections and double point.
    ///
    /// Uses the coefficients of the inflection polynomial `I(s, t)`; see
    /// "Resolution independent curve rendering using programmable graphics
    /// hardware" (Loop & Blinn) for the derivation.
    pub fn classify(&self) -> CurveClassification {
        let (x0, y0) = (self.from.x, self.from.y);
        let (x1, y1) = (self.ctrl1.x, self.ctrl1.y);
        let (x2, y2) = (self.ctrl2.x, self.ctrl2.y);
        let (x3, y3) = (self.to.x, self.to.y);

        let a1 = x0 * (y3 - y2) + y0 * (x2 - x3) + x3 * y2 - y3 * x2;
        let a2 = x1 * (y0 - y3) + y1 * (x3 - x0) + x0 * y3 - y0 * x3;
        let a3 = x2 * (y1 - y0) + y2 * (x0 - x1) + x1 * y0 - x0 * y1;
        let mut d3 = 3.0 * a3;
        let mut d2 = d3 - a2;
        let mut d1 = d2 - a2 + a1;
        // Normalize the vector (d1, d2, d3) to keep the discriminant
        // comparable across curve sizes.
        let l = (d1 * d1 + d2 * d2 + d3 * d3).sqrt();
        let s = if l != 0.0 { 1.0 / l } else { 0.0 };
        d1 *= s;
        d2 *= s;
        d3 *= s;

        fn result(kind: CurveKind, t1: Option<f64>, t2: Option<f64>) -> CurveClassification {
            let t1_ok = t1.map_or(false, |t| t > 0.0 && t < 1.0);
            let t2_ok = t2.map_or(false, |t| t > 0.0 && t < 1.0);
            // Degrade to Arch when the solutions fall outside (0, 1); a
            // loop needs both parameters inside to self-intersect.
            let (kind, t1_ok, t2_ok) = if t1.is_some()
                && (!(t1_ok || t2_ok) || (kind == CurveKind::Loop && !(t1_ok && t2_ok)))
            {
                (CurveKind::Arch, false, false)
            } else {
                (kind, t1_ok, t2_ok)
            };
            let mut roots = ArrayVec::new();
            if t1_ok {
                roots.push(t1.unwrap());
            }
            if t2_ok {
                roots.push(t2.unwrap());
            }
            roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
            CurveClassification { kind, roots }
        }

        if is_zero(d1) {
            return if is_zero(d2) {
                result(
                    if is_zero(d3) {
                        CurveKind::Line
                    } else {
                        CurveKind::Quadratic
                    },
                    None,
                    None,
                )
            } else {
                result(CurveKind::Serpentine, Some(d3 / (3.0 * d2)), None)
            };
        }
        let d = 3.0 * d2 * d2 - 4.0 * d1 * d3;
        if is_zero(d) {
            return result(CurveKind::Cusp, Some(d2 / (2.0 * d1)), None);
        }
        let f1 = if d > 0.0 { (d / 3.0).sqrt() } else { (-d).sqrt() };
        let f2 = 2.0 * d1;
        result(
            if d > 0.0 {
                CurveKind::Serpentine
            } else {
                CurveKind::Loop
            },
            Some((d2 + f1) / f2),
            Some((d2 - f1) / f2),
        )
    }

    /// The curve time of a point on the curve, or `None` if the point does
    /// not lie on it within `GEOMETRIC_EPSILON`.
    pub fn time_of(&self, p: Point) -> Option<f64> {
        // Compare against the endpoints with a zero-like epsilon first.
        if points_close(p, self.from, EPSILON) {
            return Some(0.0);
        }
        if points_close(p, self.to, EPSILON) {
            return Some(1.0);
        }
        // Solve the cubic for both coordinates and keep candidates that
        // actually land on the point.
        let coords = [self.solve_t_for_x(p.x), self.solve_t_for_y(p.y)];
        for roots in &coords {
            for &t in roots {
                if points_close(p, self.sample(t), GEOMETRIC_EPSILON) {
                    return Some(t);
                }
            }
        }
        // A point very close to an endpoint deserves the geometric epsilon
        // as well, now that the interior candidates are exhausted.
        if points_close(p, self.from, GEOMETRIC_EPSILON) {
            Some(0.0)
        } else if points_close(p, self.to, GEOMETRIC_EPSILON) {
            Some(1.0)
        } else {
            None
        }
    }

    /// Parameters at which the squared speed of the curve is stationary,
    /// sorted. Used to pick tangent sampling offsets near intersections.
    pub fn peaks(&self) -> ArrayVec<f64, 3> {
        let ax = -self.from.x + 3.0 * self.ctrl1.x - 3.0 * self.ctrl2.x + self.to.x;
        let bx = 3.0 * self.from.x - 6.0 * self.ctrl1.x + 3.0 * self.ctrl2.x;
        let cx = -3.0 * self.from.x + 3.0 * self.ctrl1.x;
        let ay = -self.from.y + 3.0 * self.ctrl1.y - 3.0 * self.ctrl2.y + self.to.y;
        let by = 3.0 * self.from.y - 6.0 * self.ctrl1.y + 3.0 * self.ctrl2.y;
        let cy = -3.0 * self.from.y + 3.0 * self.ctrl1.y;
        let t_min = CURVETIME_EPSILON;
        let mut roots = solve_cubic(
            9.0 * (ax * ax + ay * ay),
            9.0 * (ax * bx + ay * by),
            2.0 * (bx * bx + by * by) + 3.0 * (ax * cx + ay * cy),
            bx * cx + by * cy,
            Some((t_min, 1.0 - t_min)),
        );
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_at_endpoints() {
        let c = CubicBezierSegment {
            from: point(1.0, 2.0),
            ctrl1: point(3.0, 4.0),
            ctrl2: point(5.0, 6.0),
            to: point(7.0, 8.0),
        };
        assert_eq!(c.sample(0.0), c.from);
        assert_eq!(c.sample(1.0), c.to);
    }

    #[test]
    fn subdivide_identity() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 40.0),
            ctrl2: point(60.0, -10.0),
            to: point(100.0, 30.0),
        };
        let (left, right) = c.split(0.3);
        assert!(points_close(left.to, c.sample(0.3), 1e-12));
        assert!(points_close(right.from, c.sample(0.3), 1e-12));
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(points_close(left.sample(t), c.sample(t * 0.3), 1e-9));
            assert!(points_close(
                right.sample(t),
                c.sample(0.3 + t * 0.7),
                1e-9
            ));
        }
    }

    #[test]
    fn split_range_matches_double_split() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 40.0),
            ctrl2: point(60.0, -10.0),
            to: point(100.0, 30.0),
        };
        let part = c.split_range(0.2..0.7);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(points_close(part.sample(t), c.sample(0.2 + t * 0.5), 1e-9));
        }
    }

    #[test]
    fn minimum_bounding_rect() {
        let a = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.5, 2.0),
            ctrl2: point(1.5, -2.0),
            to: point(2.0, 0.0),
        };
        let bigger: Rect = rect(0.0, -0.6, 2.0, 1.2);
        let smaller: Rect = rect(0.1, -0.5, 1.9, 1.0);
        let actual = a.bounding_rect();
        assert!(bigger.contains_rect(&actual));
        assert!(actual.contains_rect(&smaller));
    }

    #[test]
    fn extrema_in_bounds() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 2.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 0.0),
        };
        let mut n = 0;
        c.for_each_local_y_extremum_t(&mut |t| {
            assert!((t - 0.5).abs() < 1e-12);
            n += 1;
        });
        assert_eq!(n, 1);
        let bounds = c.bounding_rect();
        assert!((bounds.max_y() - c.y(0.5)).abs() < 1e-12);
    }

    #[test]
    fn signed_area_of_straight_edges() {
        // A clockwise unit square in y-down coordinates, one edge at a
        // time; the curve contributions sum to the enclosed area.
        let edges = [
            (point(0.0, 0.0), point(1.0, 0.0)),
            (point(1.0, 0.0), point(1.0, 1.0)),
            (point(1.0, 1.0), point(0.0, 1.0)),
            (point(0.0, 1.0), point(0.0, 0.0)),
        ];
        let mut area = 0.0;
        for &(from, to) in &edges {
            let third = (to - from) / 3.0;
            area += CubicBezierSegment {
                from,
                ctrl1: from + third,
                ctrl2: to - third,
                to,
            }
            .signed_area();
        }
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn length_of_known_curves() {
        let line = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 0.0),
            ctrl2: point(20.0, 0.0),
            to: point(30.0, 0.0),
        };
        assert!((line.length() - 30.0).abs() < 1e-6);

        // A quarter circle approximation of radius 100.
        let kappa = crate::numerical::KAPPA * 100.0;
        let quarter = CubicBezierSegment {
            from: point(100.0, 0.0),
            ctrl1: point(100.0, kappa),
            ctrl2: point(kappa, 100.0),
            to: point(0.0, 100.0),
        };
        let expected = core::f64::consts::FRAC_PI_2 * 100.0;
        assert!((quarter.length() - expected).abs() < 0.1);
    }

    #[test]
    fn time_at_length_inverts_length() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 40.0),
            ctrl2: point(60.0, -10.0),
            to: point(100.0, 30.0),
        };
        let total = c.length();
        for i in 1..10 {
            let target = total * i as f64 / 10.0;
            let t = c.time_at_length(target);
            assert!((c.before_split(t).length() - target).abs() < 1e-6 * total);
        }
    }

    #[test]
    fn classify_loop() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(100.0, 100.0),
            ctrl2: point(-50.0, 100.0),
            to: point(50.0, 0.0),
        };
        let info = c.classify();
        assert_eq!(info.kind, CurveKind::Loop);
        assert_eq!(info.roots.len(), 2);
        let p1 = c.sample(info.roots[0]);
        let p2 = c.sample(info.roots[1]);
        assert!(points_close(p1, p2, 1e-6));
    }

    #[test]
    fn classify_line_and_arch() {
        let line = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 1.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 3.0),
        };
        assert_eq!(line.classify().kind, CurveKind::Line);

        let arch = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 1.0),
            ctrl2: point(1.0, 1.0),
            to: point(1.0, 0.0),
        };
        let info = arch.classify();
        assert!(info.roots.is_empty());
    }

    #[test]
    fn time_of_points() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 40.0),
            ctrl2: point(60.0, -10.0),
            to: point(100.0, 30.0),
        };
        assert_eq!(c.time_of(c.from), Some(0.0));
        assert_eq!(c.time_of(c.to), Some(1.0));
        let t = c.time_of(c.sample(0.37)).expect("point is on the curve");
        assert!(points_close(c.sample(t), c.sample(0.37), 1e-9));
        assert_eq!(c.time_of(point(500.0, 500.0)), None);
    }

    #[test]
    fn straightness() {
        let straight = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 1.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 3.0),
        };
        assert!(straight.is_straight());

        // Collinear handles that overshoot the chord are not straight.
        let overshooting = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(4.0, 4.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 3.0),
        };
        assert!(!overshooting.is_straight());

        let curved = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(1.0, 2.0),
            ctrl2: point(2.0, 2.0),
            to: point(3.0, 3.0),
        };
        assert!(!curved.is_straight());
    }

    #[test]
    fn tangent_with_retracted_handle() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 0.0),
            ctrl2: point(0.0, 10.0),
            to: point(10.0, 10.0),
        };
        let t = c.tangent(0.0);
        assert!(t.square_length() > 0.9);
        assert!((c.tangent(0.5).length() - 1.0).abs() < 1e-9);
    }
}
