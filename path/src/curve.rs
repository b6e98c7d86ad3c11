use crate::geom::numerical::GEOMETRIC_EPSILON;
use crate::geom::CubicBezierSegment;
use crate::path::Path;
use crate::segment::Segment;

/// A view of the cubic bézier arc between two consecutive segments of a
/// path.
///
/// Curves do not own anything; they derive the control points from the
/// segments on demand. Two curves are equal when they view the same index
/// of the same path.
#[derive(Copy, Clone, Debug)]
pub struct Curve<'a> {
    path: &'a Path,
    index: usize,
}

impl<'a> Curve<'a> {
    pub(crate) fn new(path: &'a Path, index: usize) -> Self {
        debug_assert!(index < path.curve_count());
        Curve { path, index }
    }

    #[inline]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn segment1(&self) -> &'a Segment {
        &self.path.segments()[self.index]
    }

    #[inline]
    pub fn segment2(&self) -> &'a Segment {
        let segments = self.path.segments();
        &segments[(self.index + 1) % segments.len()]
    }

    /// The 8-value control polygon of the curve.
    #[inline]
    pub fn values(&self) -> CubicBezierSegment {
        self.path.curve_values(self.index)
    }

    pub fn length(&self) -> f64 {
        self.values().length()
    }

    #[inline]
    pub fn has_handles(&self) -> bool {
        self.segment1().handle_out != crate::math::Vector::zero()
            || self.segment2().handle_in != crate::math::Vector::zero()
    }

    /// Whether the endpoints or any handle vector exceed `epsilon`.
    pub fn has_length(&self, epsilon: f64) -> bool {
        let v = self.values();
        (v.to - v.from).length() > epsilon
            || self.segment1().handle_out.length() > epsilon
            || self.segment2().handle_in.length() > epsilon
    }

    pub fn is_straight(&self) -> bool {
        self.values().is_straight()
    }

    /// Whether this curve and the next describe collinear straight lines.
    pub fn is_collinear(&self, other: &Curve) -> bool {
        let a = self.values();
        let b = other.values();
        a.is_straight()
            && b.is_straight()
            && crate::geom::utils::is_collinear(a.to - a.from, b.to - b.from)
    }

    /// The next curve of the path, wrapping on closed paths.
    pub fn next(&self) -> Option<Curve<'a>> {
        let count = self.path.curve_count();
        if self.index + 1 < count {
            Some(Curve::new(self.path, self.index + 1))
        } else if self.path.is_closed() {
            Some(Curve::new(self.path, 0))
        } else {
            None
        }
    }

    /// The previous curve of the path, wrapping on closed paths.
    pub fn previous(&self) -> Option<Curve<'a>> {
        let count = self.path.curve_count();
        if self.index > 0 {
            Some(Curve::new(self.path, self.index - 1))
        } else if self.path.is_closed() {
            Some(Curve::new(self.path, count - 1))
        } else {
            None
        }
    }

    /// Whether the curve is degenerate within `GEOMETRIC_EPSILON`.
    pub fn is_degenerate(&self) -> bool {
        !self.has_length(GEOMETRIC_EPSILON)
    }
}

impl<'a> PartialEq for Curve<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.path, other.path) && self.index == other.index
    }
}
