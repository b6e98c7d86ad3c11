use crate::math::{Point, Transform, Vector};

/// An anchor point of a path, with two handle vectors describing the
/// incoming and outgoing cubic bézier tangents.
///
/// The handles are relative to the anchor; a zero vector means "no handle"
/// and produces a straight seam on that side.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub point: Point,
    pub handle_in: Vector,
    pub handle_out: Vector,
}

impl Segment {
    /// A corner segment without handles.
    #[inline]
    pub fn new(point: Point) -> Self {
        debug_assert!(point.x.is_finite() && point.y.is_finite());
        Segment {
            point,
            handle_in: Vector::zero(),
            handle_out: Vector::zero(),
        }
    }

    #[inline]
    pub fn with_handles(point: Point, handle_in: Vector, handle_out: Vector) -> Self {
        debug_assert!(point.x.is_finite() && point.y.is_finite());
        Segment {
            point,
            handle_in,
            handle_out,
        }
    }

    #[inline]
    pub fn has_handles(&self) -> bool {
        self.handle_in != Vector::zero() || self.handle_out != Vector::zero()
    }

    #[inline]
    pub fn clear_handles(&mut self) {
        self.handle_in = Vector::zero();
        self.handle_out = Vector::zero();
    }

    /// The same segment traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Self {
        Segment {
            point: self.point,
            handle_in: self.handle_out,
            handle_out: self.handle_in,
        }
    }

    /// Apply an affine transform: the anchor as a point, the handles as
    /// vectors (rotated and scaled but not translated).
    #[inline]
    pub fn transformed(&self, transform: &Transform) -> Self {
        Segment {
            point: transform.transform_point(self.point),
            handle_in: transform.transform_vector(self.handle_in),
            handle_out: transform.transform_vector(self.handle_out),
        }
    }

    /// The absolute position of the incoming handle.
    #[inline]
    pub fn handle_in_abs(&self) -> Point {
        self.point + self.handle_in
    }

    /// The absolute position of the outgoing handle.
    #[inline]
    pub fn handle_out_abs(&self) -> Point {
        self.point + self.handle_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, vector, Angle};

    #[test]
    fn reversed_swaps_handles() {
        let s = Segment::with_handles(point(1.0, 2.0), vector(-1.0, 0.0), vector(2.0, 3.0));
        let r = s.reversed();
        assert_eq!(r.point, s.point);
        assert_eq!(r.handle_in, s.handle_out);
        assert_eq!(r.handle_out, s.handle_in);
    }

    #[test]
    fn transform_does_not_translate_handles() {
        let s = Segment::with_handles(point(1.0, 0.0), vector(0.0, 1.0), vector(0.0, -1.0));
        let m = Transform::rotation(Angle::radians(core::f64::consts::FRAC_PI_2))
            .then_translate(vector(10.0, 0.0));
        let t = s.transformed(&m);
        assert!((t.point.x - 10.0).abs() < 1e-12);
        assert!((t.point.y - 1.0).abs() < 1e-12);
        assert!((t.handle_in.x + 1.0).abs() < 1e-12);
        assert!(t.handle_in.y.abs() < 1e-12);
    }
}
