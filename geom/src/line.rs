use crate::math::{point, Point, Rect, Vector};
use crate::numerical::{EPSILON, GEOMETRIC_EPSILON};
use crate::utils::min_max;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn to_line(&self) -> Line {
        Line {
            point: self.from,
            vector: self.to - self.from,
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    #[inline]
    pub fn square_length(&self) -> f64 {
        self.to_vector().square_length()
    }

    /// Swap the beginning and the end of the segment.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    #[inline]
    pub fn bounding_range_x(&self) -> (f64, f64) {
        min_max(self.from.x, self.to.x)
    }

    #[inline]
    pub fn bounding_range_y(&self) -> (f64, f64) {
        min_max(self.from.y, self.to.y)
    }

    pub fn bounding_rect(&self) -> Rect {
        let (min_x, max_x) = self.bounding_range_x();
        let (min_y, max_y) = self.bounding_range_y();
        crate::math::rect(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// The intersection of the segment with the horizontal line at `y`, if
    /// the segment's y range contains it.
    pub fn horizontal_line_intersection(&self, y: f64) -> Option<Point> {
        let dy = self.to.y - self.from.y;
        if dy == 0.0 {
            return None;
        }
        let t = (y - self.from.y) / dy;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(self.sample(t))
    }

    /// The intersection with another segment, restricted to both segments.
    pub fn intersection(&self, other: &Self) -> Option<Point> {
        let v1 = self.to_vector();
        let v2 = other.to_vector();
        let det = v1.cross(v2);
        if det.abs() <= EPSILON {
            return None;
        }
        let w = other.from - self.from;
        let t1 = w.cross(v2) / det;
        let t2 = w.cross(v1) / det;
        if (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2) {
            Some(self.sample(t1))
        } else {
            None
        }
    }

    /// Distance of a point to the infinite line carrying the segment.
    #[inline]
    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.to_line().distance_to_point(p)
    }
}

/// An infinite line defined by a point and a direction vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub point: Point,
    pub vector: Vector,
}

impl Line {
    /// The intersection point of two lines, or `None` when they are
    /// parallel (within `EPSILON` of their cross product).
    pub fn intersection(&self, other: &Self) -> Option<Point> {
        let det = self.vector.cross(other.vector);
        if det.abs() <= EPSILON {
            return None;
        }
        let w = other.point - self.point;
        let t = w.cross(other.vector) / det;
        Some(self.point + self.vector * t)
    }

    #[inline]
    pub fn signed_distance_to_point(&self, p: Point) -> f64 {
        self.equation().signed_distance_to_point(p)
    }

    #[inline]
    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.signed_distance_to_point(p).abs()
    }

    /// The normalized implicit equation `a·x + b·y + c = 0` of this line.
    pub fn equation(&self) -> LineEquation {
        let a = -self.vector.y;
        let b = self.vector.x;
        let c = -(a * self.point.x + b * self.point.y);
        LineEquation::new(a, b, c)
    }
}

/// A line defined by the equation `a·x + b·y + c = 0`, with `a² + b² = 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct LineEquation {
    a: f64,
    b: f64,
    c: f64,
}

impl LineEquation {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        debug_assert!(a != 0.0 || b != 0.0);
        let div = 1.0 / (a * a + b * b).sqrt();
        LineEquation {
            a: a * div,
            b: b * div,
            c: c * div,
        }
    }

    /// The same line, offset by `d` along its normal.
    #[inline]
    pub fn offset(&self, d: f64) -> Self {
        LineEquation {
            a: self.a,
            b: self.b,
            c: self.c - d,
        }
    }

    #[inline]
    pub fn signed_distance_to_point(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    #[inline]
    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.signed_distance_to_point(p).abs()
    }

    /// Whether the point lies on the line within `GEOMETRIC_EPSILON`.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.distance_to_point(p) < GEOMETRIC_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vector;

    #[test]
    fn intersect_segments() {
        let a = LineSegment {
            from: point(0.0, 0.0),
            to: point(10.0, 10.0),
        };
        let b = LineSegment {
            from: point(0.0, 10.0),
            to: point(10.0, 0.0),
        };
        assert_eq!(a.intersection(&b), Some(point(5.0, 5.0)));

        let c = LineSegment {
            from: point(6.0, 0.0),
            to: point(6.0, 4.0),
        };
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn parallel_lines() {
        let l1 = Line {
            point: point(0.0, 0.0),
            vector: vector(1.0, 1.0),
        };
        let l2 = Line {
            point: point(0.0, 1.0),
            vector: vector(2.0, 2.0),
        };
        assert_eq!(l1.intersection(&l2), None);
    }

    #[test]
    fn signed_distance() {
        let l = Line {
            point: point(0.0, 3.0),
            vector: vector(1.0, 0.0),
        };
        let eq = l.equation();
        assert!((eq.distance_to_point(point(100.0, 5.0)) - 2.0).abs() < 1e-12);
        assert!(eq.contains_point(point(-40.0, 3.0)));
        assert!(
            (eq.signed_distance_to_point(point(0.0, 5.0))
                + eq.signed_distance_to_point(point(0.0, 1.0)))
            .abs()
                < 1e-12
        );
    }

    #[test]
    fn horizontal_intersection() {
        let s = LineSegment {
            from: point(1.0, 0.0),
            to: point(3.0, 4.0),
        };
        assert_eq!(s.horizontal_line_intersection(2.0), Some(point(2.0, 2.0)));
        assert_eq!(s.horizontal_line_intersection(5.0), None);
    }
}
