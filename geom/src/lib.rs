#![deny(bare_trait_objects)]
#![allow(clippy::many_single_char_names)]

//! f64 geometric primitives for 2D vector paths, on top of euclid.
//!
//! This crate is reexported in [vellum](../vellum/index.html).
//!
//! # Overview
//!
//! This crate implements the maths to work with:
//!
//! - lines and line segments,
//! - cubic bézier curves: evaluation, subdivision, extrema, signed area,
//!   arc length, classification,
//! - pairwise curve intersection via bézier clipping ("fat line" clipping),
//!   curve overlap detection and self-intersection,
//! - affine transforms and axis-aligned rectangles.
//!
//! All types are concrete `f64`. The tolerances used throughout the curve
//! code form a fixed tower (see the [`numerical`](numerical/index.html)
//! module); they are chosen for the stability of cubic bézier computations
//! and are not configurable.

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

pub mod cubic_bezier;
mod cubic_bezier_intersections;
mod line;
pub mod numerical;
pub mod utils;

#[doc(inline)]
pub use crate::cubic_bezier::{CubicBezierSegment, CurveClassification, CurveKind};
#[doc(inline)]
pub use crate::cubic_bezier_intersections::{
    cubic_bezier_intersections_t, cubic_bezier_overlaps_t, cubic_bezier_self_intersection_t,
    Intersections,
};
#[doc(inline)]
pub use crate::line::{Line, LineEquation, LineSegment};

pub mod math {
    //! Basic f64 types that are used everywhere. The other vellum crates
    //! reexport them.

    /// Alias for `euclid::default::Point2D<f64>`.
    pub type Point = euclid::default::Point2D<f64>;

    /// Alias for `euclid::default::Vector2D<f64>`.
    pub type Vector = euclid::default::Vector2D<f64>;

    /// Alias for `euclid::default::Size2D<f64>`.
    pub type Size = euclid::default::Size2D<f64>;

    /// Alias for `euclid::default::Rect<f64>`.
    pub type Rect = euclid::default::Rect<f64>;

    /// Alias for `euclid::default::Transform2D<f64>`.
    pub type Transform = euclid::default::Transform2D<f64>;

    /// An angle in radians.
    pub type Angle = euclid::Angle<f64>;

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f64, y: f64) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Size::new(w, h)`.
    #[inline]
    pub fn size(w: f64, h: f64) -> Size {
        Size::new(w, h)
    }

    /// Shorthand for `Rect::new(Point::new(x, y), Size::new(w, h))`.
    #[inline]
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(point(x, y), size(w, h))
    }

    /// The center of a rectangle.
    #[inline]
    pub fn rect_center(r: &Rect) -> Point {
        point(
            r.origin.x + r.size.width * 0.5,
            r.origin.y + r.size.height * 0.5,
        )
    }

    /// The axis-aligned bounding rectangle of the four transformed corners
    /// of `r`.
    pub fn transformed_bounds(r: &Rect, transform: &Transform) -> Rect {
        let corners = [
            transform.transform_point(r.origin),
            transform.transform_point(point(r.max_x(), r.min_y())),
            transform.transform_point(point(r.max_x(), r.max_y())),
            transform.transform_point(point(r.min_x(), r.max_y())),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Rect::new(min, (max - min).to_size())
    }

    /// The result of decomposing an affine transform into translation,
    /// rotation, scaling and skew, in the manner of the CSS 2-D matrix
    /// decomposition.
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub struct Decomposition {
        pub translation: Vector,
        pub rotation: Angle,
        pub scaling: Vector,
        pub skew: Angle,
    }

    /// Decompose a transform, or `None` when its determinant is zero or
    /// non-finite (the same condition under which inversion fails).
    pub fn decompose(m: &Transform) -> Option<Decomposition> {
        let det = m.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let (a, b, c, d) = (m.m11, m.m12, m.m21, m.m22);
        let denom = a * a + b * b;
        let scale_x = denom.sqrt();
        Some(Decomposition {
            translation: vector(m.m31, m.m32),
            rotation: Angle::radians(b.atan2(a)),
            scaling: vector(scale_x, det / scale_x),
            skew: Angle::radians((a * c + b * d).atan2(denom)),
        })
    }

    #[test]
    fn decompose_translate_rotate_scale() {
        let m = Transform::scale(2.0, 3.0)
            .then_rotate(Angle::radians(core::f64::consts::FRAC_PI_2))
            .then_translate(vector(10.0, 20.0));
        let d = decompose(&m).unwrap();
        assert!((d.translation.x - 10.0).abs() < 1e-12);
        assert!((d.translation.y - 20.0).abs() < 1e-12);
        assert!((d.rotation.radians - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((d.scaling.x - 2.0).abs() < 1e-12);
        assert!((d.scaling.y - 3.0).abs() < 1e-12);
        assert!(d.skew.radians.abs() < 1e-12);
    }

    #[test]
    fn decompose_singular() {
        assert_eq!(decompose(&Transform::scale(0.0, 1.0)), None);
    }

    #[test]
    fn transformed_bounds_contains_corners() {
        let r = rect(1.0, 2.0, 3.0, 4.0);
        let m = Transform::rotation(Angle::radians(0.3)).then_translate(vector(-5.0, 2.0));
        let bounds = transformed_bounds(&r, &m);
        for &(x, y) in &[
            (r.min_x(), r.min_y()),
            (r.max_x(), r.min_y()),
            (r.max_x(), r.max_y()),
            (r.min_x(), r.max_y()),
        ] {
            let p = m.transform_point(point(x, y));
            assert!(p.x >= bounds.min_x() - 1e-12 && p.x <= bounds.max_x() + 1e-12);
            assert!(p.y >= bounds.min_y() - 1e-12 && p.y <= bounds.max_y() + 1e-12);
        }
    }
}
