//! Least-squares cubic fitting of a sequence of points, after the curve
//! fitting algorithm of the Graphics Gems "Piecewise Cubic Fitting" chapter
//! (Philip J. Schneider).

use crate::geom::numerical::is_machine_zero;
use crate::math::{Point, Vector};
use crate::path::Path;
use crate::segment::Segment;

/// Fit a smooth sequence of segments through the path's anchor points,
/// keeping the maximum deviation within `error`. Returns `None` when there
/// is nothing to fit.
pub(crate) fn fit(path: &Path, error: f64) -> Option<Vec<Segment>> {
    // Collect the distinct anchors.
    let mut points: Vec<Point> = Vec::new();
    for segment in path.segments() {
        if points.last() != Some(&segment.point) {
            points.push(segment.point);
        }
    }
    let closed = path.is_closed();
    if closed && points.len() > 2 {
        // Wrap the ends around so the fit carries across the seam.
        points.insert(0, points[points.len() - 1]);
        points.push(points[1]);
    }
    if points.len() < 2 {
        return None;
    }

    let length = points.len();
    let mut segments = vec![Segment::new(points[0])];
    fit_cubic(
        &points,
        error * error,
        &mut segments,
        0,
        length - 1,
        points[1] - points[0],
        points[length - 2] - points[length - 1],
    );
    if closed {
        if segments.len() > 2 {
            segments.remove(0);
            segments.pop();
        }
    }
    Some(segments)
}

// Fit a cubic to points[first..=last]; on failure split at the point of
// maximum error and recurse.
fn fit_cubic(
    points: &[Point],
    error_sq: f64,
    segments: &mut Vec<Segment>,
    first: usize,
    last: usize,
    tan1: Vector,
    tan2: Vector,
) {
    if last - first == 1 {
        // Two points: use the heuristic of handles at a third of the chord.
        let pt1 = points[first];
        let pt2 = points[last];
        let dist = (pt2 - pt1).length() / 3.0;
        add_curve(
            segments,
            &[pt1, pt1 + scaled(tan1, dist), pt2 + scaled(tan2, dist), pt2],
        );
        return;
    }

    let mut u = chord_length_parameterize(points, first, last);
    let mut max_error_sq = error_sq.max(error_sq * error_sq);
    let mut split = (first + last) / 2;
    let mut parameters_in_order = true;

    // Try a few iterations of fitting and reparameterization.
    for _ in 0..=4 {
        let curve = generate_bezier(points, first, last, &u, tan1, tan2);
        let (err_sq, index) = find_max_error(points, first, last, &curve, &u);
        if err_sq < error_sq && parameters_in_order {
            add_curve(segments, &curve);
            return;
        }
        split = index;
        if err_sq >= max_error_sq {
            break;
        }
        parameters_in_order = reparameterize(points, first, last, &mut u, &curve);
        max_error_sq = err_sq;
    }

    // Fitting failed: split at the worst point and fit both sides.
    let tan_center = points[split - 1] - points[split + 1];
    fit_cubic(points, error_sq, segments, first, split, tan1, tan_center);
    fit_cubic(points, error_sq, segments, split, last, -tan_center, tan2);
}

fn add_curve(segments: &mut Vec<Segment>, curve: &[Point; 4]) {
    let prev = segments.last_mut().unwrap();
    prev.handle_out = curve[1] - curve[0];
    segments.push(Segment::with_handles(
        curve[3],
        curve[2] - curve[3],
        Vector::zero(),
    ));
}

#[inline]
fn scaled(v: Vector, length: f64) -> Vector {
    let l = v.length();
    if l == 0.0 {
        v
    } else {
        v * (length / l)
    }
}

// Solve the least squares problem for the two handle lengths along the
// fixed endpoint tangents.
fn generate_bezier(
    points: &[Point],
    first: usize,
    last: usize,
    u: &[f64],
    tan1: Vector,
    tan2: Vector,
) -> [Point; 4] {
    let epsilon = crate::geom::numerical::EPSILON;
    let pt1 = points[first];
    let pt2 = points[last];
    let mut c = [[0.0; 2]; 2];
    let mut x = [0.0; 2];

    for (i, &up) in u.iter().enumerate().take(last - first + 1) {
        let t = 1.0 - up;
        let b = 3.0 * up * t;
        let b0 = t * t * t;
        let b1 = b * t;
        let b2 = b * up;
        let b3 = up * up * up;
        let a1 = scaled(tan1, b1);
        let a2 = scaled(tan2, b2);
        let tmp = points[first + i].to_vector()
            - pt1.to_vector() * (b0 + b1)
            - pt2.to_vector() * (b2 + b3);
        c[0][0] += a1.dot(a1);
        c[0][1] += a1.dot(a2);
        c[1][0] = c[0][1];
        c[1][1] += a2.dot(a2);
        x[0] += a1.dot(tmp);
        x[1] += a2.dot(tmp);
    }

    let det_c0_c1 = c[0][0] * c[1][1] - c[1][0] * c[0][1];
    let (mut alpha1, mut alpha2);
    if det_c0_c1.abs() > epsilon {
        let det_c0_x = c[0][0] * x[1] - c[1][0] * x[0];
        let det_x_c1 = x[0] * c[1][1] - x[1] * c[0][1];
        alpha1 = det_x_c1 / det_c0_c1;
        alpha2 = det_c0_x / det_c0_c1;
    } else {
        // The matrix is underdetermined, try assuming alpha1 == alpha2.
        let c0 = c[0][0] + c[0][1];
        let c1 = c[1][0] + c[1][1];
        let alpha = if c0.abs() > epsilon {
            x[0] / c0
        } else if c1.abs() > epsilon {
            x[1] / c1
        } else {
            0.0
        };
        alpha1 = alpha;
        alpha2 = alpha;
    }

    // Negative or wildly overshooting handle lengths fall back to the
    // Wu/Barsky heuristic of a third of the chord.
    let seg_length = (pt2 - pt1).length();
    let eps = epsilon * seg_length;
    let mut handle1 = None;
    let mut handle2 = None;
    if alpha1 < eps || alpha2 < eps {
        alpha1 = seg_length / 3.0;
        alpha2 = alpha1;
    } else {
        let line = pt2 - pt1;
        let h1 = scaled(tan1, alpha1);
        let h2 = scaled(tan2, alpha2);
        if h1.dot(line) - h2.dot(line) > seg_length * seg_length {
            alpha1 = seg_length / 3.0;
            alpha2 = alpha1;
        } else {
            handle1 = Some(h1);
            handle2 = Some(h2);
        }
    }

    [
        pt1,
        pt1 + handle1.unwrap_or_else(|| scaled(tan1, alpha1)),
        pt2 + handle2.unwrap_or_else(|| scaled(tan2, alpha2)),
        pt2,
    ]
}

// Newton-Raphson step of the parameter of `point` on the curve.
fn find_root(curve: &[Point; 4], pt: Point, u: f64) -> f64 {
    let mut curve1 = [Vector::zero(); 3];
    let mut curve2 = [Vector::zero(); 2];
    for i in 0..3 {
        curve1[i] = (curve[i + 1] - curve[i]) * 3.0;
    }
    for i in 0..2 {
        curve2[i] = (curve1[i + 1] - curve1[i]) * 2.0;
    }
    let p = evaluate(curve, u);
    let p1 = evaluate_vec3(&curve1, u);
    let p2 = evaluate_vec2(&curve2, u);
    let diff = p - pt;
    let df = p1.dot(p1) + diff.dot(p2);
    if is_machine_zero(df) {
        u
    } else {
        u - diff.dot(p1) / df
    }
}

fn evaluate(curve: &[Point; 4], t: f64) -> Point {
    let mut tmp = *curve;
    for i in 1..4 {
        for j in 0..4 - i {
            tmp[j] = tmp[j].lerp(tmp[j + 1], t);
        }
    }
    tmp[0]
}

fn evaluate_vec3(curve: &[Vector; 3], t: f64) -> Vector {
    let mut tmp = *curve;
    for i in 1..3 {
        for j in 0..3 - i {
            tmp[j] = tmp[j].lerp(tmp[j + 1], t);
        }
    }
    tmp[0]
}

fn evaluate_vec2(curve: &[Vector; 2], t: f64) -> Vector {
    curve[0].lerp(curve[1], t)
}

fn reparameterize(
    points: &[Point],
    first: usize,
    last: usize,
    u: &mut [f64],
    curve: &[Point; 4],
) -> bool {
    for i in first..=last {
        u[i - first] = find_root(curve, points[i], u[i - first]);
    }
    // Detect the parameters running out of order, which happens when the
    // fit is hopeless and the curve would fold back on itself.
    for i in 1..u.len() {
        if u[i] <= u[i - 1] {
            return false;
        }
    }
    true
}

fn chord_length_parameterize(points: &[Point], first: usize, last: usize) -> Vec<f64> {
    let mut u = vec![0.0; last - first + 1];
    for i in first + 1..=last {
        u[i - first] = u[i - first - 1] + (points[i] - points[i - 1]).length();
    }
    let m = last - first;
    for i in 1..=m {
        u[i] /= u[m];
    }
    u
}

fn find_max_error(
    points: &[Point],
    first: usize,
    last: usize,
    curve: &[Point; 4],
    u: &[f64],
) -> (f64, usize) {
    let mut index = (last - first + 1) / 2 + first;
    let mut max_dist_sq = 0.0;
    for i in first + 1..last {
        let p = evaluate(curve, u[i - first]);
        let v = p - points[i];
        let dist_sq = v.square_length();
        if dist_sq >= max_dist_sq {
            max_dist_sq = dist_sq;
            index = i;
        }
    }
    (max_dist_sq, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;

    #[test]
    fn fit_points_on_a_known_cubic() {
        let reference = crate::geom::CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(30.0, 60.0),
            ctrl2: point(70.0, 60.0),
            to: point(100.0, 0.0),
        };
        let mut path = Path::new();
        path.move_to(reference.sample(0.0)).unwrap();
        for i in 1..=32 {
            path.line_to(reference.sample(i as f64 / 32.0)).unwrap();
        }
        assert!(path.simplify(0.5));
        // The dense polyline collapses back to very few curves...
        assert!(path.segment_count() <= 4, "{}", path.segment_count());
        // ...that stay close to the source curve.
        for i in 0..path.curve_count() {
            let v = path.curve_values(i);
            for step in 0..=4 {
                let p = v.sample(step as f64 / 4.0);
                let nearest = (0..=64)
                    .map(|k| (reference.sample(k as f64 / 64.0) - p).length())
                    .fold(f64::MAX, f64::min);
                assert!(nearest < 1.0, "{:?} is {} away", p, nearest);
            }
        }
    }

    #[test]
    fn fit_straight_line_is_trivial() {
        let mut path = Path::new();
        path.move_to(point(0.0, 0.0)).unwrap();
        for i in 1..=10 {
            path.line_to(point(i as f64 * 10.0, 0.0)).unwrap();
        }
        assert!(path.simplify(1e-3));
        assert_eq!(path.segment_count(), 2);
    }
}
