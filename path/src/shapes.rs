//! Constructors for primitive shapes, producing closed clockwise paths in
//! y-down coordinates.

use crate::geom::numerical::{EPSILON, GEOMETRIC_EPSILON, KAPPA};
use crate::geom::utils::{tangent, vector_angle};
use crate::geom::Line;
use crate::math::{point, vector, Point, Rect, Vector};
use crate::path::Path;
use crate::segment::Segment;

use std::f64::consts::{FRAC_PI_2, PI};

impl Path {
    /// A closed rectangle, clockwise.
    pub fn rectangle(r: Rect) -> Path {
        Path::with_segments(
            vec![
                Segment::new(point(r.min_x(), r.min_y())),
                Segment::new(point(r.max_x(), r.min_y())),
                Segment::new(point(r.max_x(), r.max_y())),
                Segment::new(point(r.min_x(), r.max_y())),
            ],
            true,
        )
    }

    /// A straight open line.
    pub fn line(from: Point, to: Point) -> Path {
        Path::with_segments(vec![Segment::new(from), Segment::new(to)], false)
    }

    /// A closed circle of four KAPPA-handled quarter arcs, clockwise.
    pub fn circle(center: Point, radius: f64) -> Path {
        Path::ellipse(center, vector(radius, radius))
    }

    /// A closed ellipse with the given half-axes, clockwise.
    pub fn ellipse(center: Point, radius: Vector) -> Path {
        let (rx, ry) = (radius.x, radius.y);
        let (kx, ky) = (KAPPA * rx, KAPPA * ry);
        Path::with_segments(
            vec![
                Segment::with_handles(
                    center + vector(rx, 0.0),
                    vector(0.0, -ky),
                    vector(0.0, ky),
                ),
                Segment::with_handles(
                    center + vector(0.0, ry),
                    vector(kx, 0.0),
                    vector(-kx, 0.0),
                ),
                Segment::with_handles(
                    center + vector(-rx, 0.0),
                    vector(0.0, ky),
                    vector(0.0, -ky),
                ),
                Segment::with_handles(
                    center + vector(0.0, -ry),
                    vector(-kx, 0.0),
                    vector(kx, 0.0),
                ),
            ],
            true,
        )
    }

    /// A closed regular polygon, first vertex at the top, clockwise.
    pub fn regular_polygon(center: Point, sides: usize, radius: f64) -> Path {
        debug_assert!(sides >= 3);
        let step = 2.0 * PI / sides as f64;
        let segments = (0..sides)
            .map(|i| {
                let theta = -FRAC_PI_2 + step * i as f64;
                Segment::new(center + vector(theta.cos(), theta.sin()) * radius)
            })
            .collect();
        Path::with_segments(segments, true)
    }

    /// A closed star with `points` spikes alternating between the two
    /// radii, first spike at the top, clockwise.
    pub fn star(center: Point, points: usize, radius1: f64, radius2: f64) -> Path {
        debug_assert!(points >= 3);
        let step = PI / points as f64;
        let segments = (0..points * 2)
            .map(|i| {
                let theta = -FRAC_PI_2 + step * i as f64;
                let radius = if i % 2 == 0 { radius1 } else { radius2 };
                Segment::new(center + vector(theta.cos(), theta.sin()) * radius)
            })
            .collect();
        Path::with_segments(segments, true)
    }

    /// An open circular arc from `from` through `through` to `to`.
    ///
    /// When the three points are collinear (or the radius degenerates) the
    /// result is a straight line.
    pub fn arc(from: Point, through: Point, to: Point) -> Path {
        let mut path = Path::new();
        path.move_to(from).expect("empty path accepts move_to");
        match arc_center(from, through, to) {
            Some((center, _)) => add_arc_segments(&mut path, from, center, through, to),
            None => {
                let _ = path.line_to(to);
            }
        }
        path
    }
}

/// The center and radius of the circle through three points, or `None` when
/// they are collinear or the radius degenerates.
pub(crate) fn arc_center(from: Point, through: Point, to: Point) -> Option<(Point, f64)> {
    let l1 = Line {
        point: from.lerp(through, 0.5),
        vector: tangent(through - from),
    };
    let l2 = Line {
        point: through.lerp(to, 0.5),
        vector: tangent(to - through),
    };
    if l1.vector.square_length() < EPSILON || l2.vector.square_length() < EPSILON {
        return None;
    }
    let center = l1.intersection(&l2)?;
    let radius = (from - center).length();
    if radius <= GEOMETRIC_EPSILON {
        return None;
    }
    Some((center, radius))
}

/// Append cubic segments approximating the circular arc from `from`
/// (already the path's last anchor) through `through` to `to`, one slice
/// per quarter turn at most.
pub(crate) fn add_arc_segments(
    path: &mut Path,
    from: Point,
    center: Point,
    through: Point,
    to: Point,
) {
    let radius = (from - center).length();
    let a1 = vector_angle(from - center);
    let at = vector_angle(through - center);
    let a2 = vector_angle(to - center);

    let tau = 2.0 * PI;
    let norm = |a: f64| {
        let a = a % tau;
        if a < 0.0 {
            a + tau
        } else {
            a
        }
    };
    // Pick the sweep direction that passes through the through-point.
    let sweep_ccw = norm(a2 - a1);
    let through_ccw = norm(at - a1);
    let sweep = if through_ccw <= sweep_ccw + EPSILON {
        sweep_ccw
    } else {
        sweep_ccw - tau
    };
    if sweep == 0.0 {
        let _ = path.line_to(to);
        return;
    }

    let count = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let d_theta = sweep / count as f64;
    // Handle length of a cubic approximating one slice; the sign of the
    // sweep carries through the tangent direction.
    let h = radius * (4.0 / 3.0) * (d_theta / 4.0).tan();

    let arc_tangent = |theta: f64| vector(-theta.sin(), theta.cos());

    if let Some(last) = path.last_mut() {
        last.handle_out = arc_tangent(a1) * h;
    }
    for i in 1..=count {
        let theta = a1 + d_theta * i as f64;
        let anchor = if i == count {
            to
        } else {
            center + vector(theta.cos(), theta.sin()) * radius
        };
        let t = arc_tangent(theta);
        let handle_out = if i == count { Vector::zero() } else { t * h };
        path.push(Segment::with_handles(anchor, t * -h, handle_out));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FillRule;

    #[test]
    fn circle_area_and_bounds() {
        let c = Path::circle(point(110.0, 110.0), 80.0);
        let bounds = c.bounds();
        assert!((bounds.min_x() - 30.0).abs() < 1e-9);
        assert!((bounds.max_y() - 190.0).abs() < 1e-9);
        // The KAPPA approximation overshoots pi r^2 by well under 0.1%.
        let expected = PI * 80.0 * 80.0;
        assert!((c.area() - expected).abs() / expected < 1e-3);
        assert!(c.is_clockwise());
        assert!(c.contains(point(110.0, 110.0), FillRule::EvenOdd));
    }

    #[test]
    fn regular_polygon_and_star() {
        let hexagon = Path::regular_polygon(point(0.0, 0.0), 6, 10.0);
        assert_eq!(hexagon.segment_count(), 6);
        assert!(hexagon.is_clockwise());
        assert!(hexagon.contains(point(0.0, 0.0), FillRule::NonZero));

        let star = Path::star(point(0.0, 0.0), 5, 10.0, 4.0);
        assert_eq!(star.segment_count(), 10);
        assert!(star.is_clockwise());
        assert!(star.contains(point(0.0, 0.0), FillRule::EvenOdd));
    }

    #[test]
    fn arc_through_point() {
        // A half circle of radius 10 around the origin.
        let arc = Path::arc(point(-10.0, 0.0), point(0.0, -10.0), point(10.0, 0.0));
        assert!(!arc.is_closed());
        assert!(arc.segment_count() >= 3);
        // Everything on the arc stays at distance 10 from the center.
        for i in 0..arc.curve_count() {
            let v = arc.curve_values(i);
            for step in 0..=4 {
                let p = v.sample(step as f64 / 4.0);
                assert!((p.to_vector().length() - 10.0).abs() < 0.05, "{:?}", p);
            }
        }
    }

    #[test]
    fn collinear_arc_becomes_a_line() {
        let arc = Path::arc(point(0.0, 0.0), point(5.0, 0.0), point(10.0, 0.0));
        assert_eq!(arc.segment_count(), 2);
        assert!(!arc.has_handles());
        assert_eq!(arc.last_segment().unwrap().point, point(10.0, 0.0));
    }
}
