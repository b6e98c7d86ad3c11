//! Computes intersection parameters for two cubic bézier curves using
//! bézier clipping, also known as fat line clipping.
//!
//! See "Curve intersection using Bézier clipping" (Sederberg & Nishita) for
//! the motivation and details of how the process works.

use crate::cubic_bezier::{CubicBezierSegment, CurveKind};
use crate::line::Line;
use crate::math::{point, Point};
use crate::numerical::{
    CALL_LIMIT, CLIPPING_EPSILON, CURVETIME_EPSILON, EPSILON, GEOMETRIC_EPSILON, RECURSION_LIMIT,
};
use crate::utils::points_close;
use arrayvec::ArrayVec;

use std::ops::Range;

/// The result buffer of one curve pair: at most nine transversal
/// intersections, plus up to four endpoint coincidences.
pub type Intersections = ArrayVec<(f64, f64), 13>;

// Which endpoint seams of the pair are excluded from the result. When two
// curves are consecutive on a path they always meet at an endpoint; the
// caller excludes that seam by shrinking the accepted parameter window to
// [CURVETIME_EPSILON, 1 - CURVETIME_EPSILON] on the relevant sides.
#[derive(Copy, Clone, Debug, Default)]
struct Exclude {
    start: bool,
    end: bool,
}

/// Computes the intersections (if any) between two cubic bézier curves in
/// the form of the `t` parameters of each intersection point along the
/// curves.
///
/// `exclude_start` excludes matches at the seam `t1 ≈ 0 / t2 ≈ 1` (curve2
/// precedes curve1 on a path); `exclude_end` excludes `t1 ≈ 1 / t2 ≈ 0`.
///
/// Returns no intersections if either curve is a point.
pub fn cubic_bezier_intersections_t(
    curve1: &CubicBezierSegment,
    curve2: &CubicBezierSegment,
    exclude_start: bool,
    exclude_end: bool,
) -> Intersections {
    let mut result = ArrayVec::new();

    // Cheap rejection on the control point bounds, with a little slack so
    // that touching boxes still count.
    let (min_x1, max_x1) = curve1.fast_bounding_range_x();
    let (min_y1, max_y1) = curve1.fast_bounding_range_y();
    let (min_x2, max_x2) = curve2.fast_bounding_range_x();
    let (min_y2, max_y2) = curve2.fast_bounding_range_y();
    if max_x1 + EPSILON < min_x2
        || max_x2 + EPSILON < min_x1
        || max_y1 + EPSILON < min_y2
        || max_y2 + EPSILON < min_y1
    {
        return result;
    }

    if curve1.is_a_point(0.0) || curve2.is_a_point(0.0) {
        // There is no fat line for a point, and a short nearly straight
        // curve can produce an empty fat line long before its domain is
        // small enough to register an intersection.
        return result;
    }

    let exclude = Exclude {
        start: exclude_start,
        end: exclude_end,
    };

    let linear1 = curve1.is_linear(EPSILON);
    let linear2 = curve2.is_linear(EPSILON);
    if linear1 && linear2 {
        line_line_intersections(curve1, curve2, exclude, &mut result);
    } else if linear1 {
        line_curve_intersections(curve1, curve2, /* flip */ false, exclude, &mut result);
    } else if linear2 {
        line_curve_intersections(curve2, curve1, /* flip */ true, exclude, &mut result);
    } else {
        add_curve_intersections(
            curve1,
            curve2,
            &(0.0..1.0),
            &(0.0..1.0),
            &mut result,
            /* flip */ false,
            /* recursion */ 0,
            /* calls */ 0,
            exclude,
        );
    }

    // The curves may meet exactly at their endpoints without the clipping
    // pass reporting it (the fat line degenerates there).
    if curve1.from != curve1.to || curve2.from != curve2.to {
        if points_close(curve1.from, curve2.from, EPSILON) {
            add_intersection(0.0, 0.0, false, exclude, &mut result);
        }
        if points_close(curve1.from, curve2.to, EPSILON) {
            add_intersection(0.0, 1.0, false, exclude, &mut result);
        }
        if points_close(curve1.to, curve2.from, EPSILON) {
            add_intersection(1.0, 0.0, false, exclude, &mut result);
        }
        if points_close(curve1.to, curve2.to, EPSILON) {
            add_intersection(1.0, 1.0, false, exclude, &mut result);
        }
    }

    result
}

/// The two `(t1, t2)` pairs bounding the range over which the curves
/// coincide, or `None` when they do not overlap.
///
/// Straight curves can only overlap when collinear; curved ones when the
/// sub-curves between the probed endpoint times agree handle for handle
/// within `GEOMETRIC_EPSILON`.
pub fn cubic_bezier_overlaps_t(
    v1: &CubicBezierSegment,
    v2: &CubicBezierSegment,
) -> Option<[(f64, f64); 2]> {
    let mut straight1 = v1.is_straight();
    let mut straight2 = v2.is_straight();
    let mut straight_both = straight1 && straight2;

    // Fat-line the longer chord against the shorter curve's endpoints.
    let flip = (v1.to - v1.from).square_length() < (v2.to - v2.from).square_length();
    let (l1, l2) = if flip { (v2, v1) } else { (v1, v2) };
    let chord = l1.to - l1.from;
    if chord.square_length() == 0.0 {
        return None;
    }
    let line = Line {
        point: l1.from,
        vector: chord,
    }
    .equation();
    if line.distance_to_point(l2.from) < GEOMETRIC_EPSILON
        && line.distance_to_point(l2.to) < GEOMETRIC_EPSILON
    {
        // The endpoints are all collinear; when the handles are too, both
        // curves are effectively straight even if their handles differ.
        if !straight_both
            && line.distance_to_point(l1.ctrl1) < GEOMETRIC_EPSILON
            && line.distance_to_point(l1.ctrl2) < GEOMETRIC_EPSILON
            && line.distance_to_point(l2.ctrl1) < GEOMETRIC_EPSILON
            && line.distance_to_point(l2.ctrl2) < GEOMETRIC_EPSILON
        {
            straight1 = true;
            straight2 = true;
            straight_both = true;
        }
    } else if straight_both {
        return None;
    }
    if straight1 != straight2 {
        return None;
    }

    // Probe each curve's endpoints against the other curve; two distinct
    // matches bound the overlap.
    let v = [v1, v2];
    let mut pairs: ArrayVec<(f64, f64), 2> = ArrayVec::new();
    for i in 0..4 {
        if pairs.len() >= 2 {
            break;
        }
        let i1 = i & 1;
        let i2 = i1 ^ 1;
        let t1 = (i >> 1) as f64;
        let probe = if t1 == 0.0 { v[i2].from } else { v[i2].to };
        if let Some(t2) = v[i1].time_of(probe) {
            let pair = if i1 == 1 { (t1, t2) } else { (t2, t1) };
            if pairs.is_empty()
                || ((pair.0 - pairs[0].0).abs() > CURVETIME_EPSILON
                    && (pair.1 - pairs[0].1).abs() > CURVETIME_EPSILON)
            {
                pairs.push(pair);
            }
        }
        if i > 2 && pairs.is_empty() {
            break;
        }
    }
    if pairs.len() != 2 {
        return None;
    }

    if !straight_both {
        // Check that the overlapping ranges describe the same curve.
        let o1 = part(v1, pairs[0].0, pairs[1].0);
        let o2 = part(v2, pairs[0].1, pairs[1].1);
        if (o2.ctrl1.x - o1.ctrl1.x).abs() > GEOMETRIC_EPSILON
            || (o2.ctrl1.y - o1.ctrl1.y).abs() > GEOMETRIC_EPSILON
            || (o2.ctrl2.x - o1.ctrl2.x).abs() > GEOMETRIC_EPSILON
            || (o2.ctrl2.y - o1.ctrl2.y).abs() > GEOMETRIC_EPSILON
        {
            return None;
        }
    }

    Some([pairs[0], pairs[1]])
}

/// The two parameters at which the curve crosses itself, or `None`: only a
/// curve classified as a loop has a self-intersection.
pub fn cubic_bezier_self_intersection_t(v: &CubicBezierSegment) -> Option<(f64, f64)> {
    let info = v.classify();
    if info.kind == CurveKind::Loop && info.roots.len() == 2 {
        Some((info.roots[0], info.roots[1]))
    } else {
        None
    }
}

fn part(v: &CubicBezierSegment, t0: f64, t1: f64) -> CubicBezierSegment {
    if t0 <= t1 {
        v.split_range(t0..t1)
    } else {
        v.split_range(t1..t0).flip()
    }
}

fn line_curve_intersections(
    line_as_curve: &CubicBezierSegment,
    curve: &CubicBezierSegment,
    flip: bool,
    exclude: Exclude,
    result: &mut Intersections,
) {
    let baseline = line_as_curve.baseline();
    let line_is_mostly_vertical =
        (baseline.from.y - baseline.to.y).abs() >= (baseline.from.x - baseline.to.x).abs();

    // Intersect the curve with the infinite line, then recover the line's
    // own curve times from the dominant coordinate.
    let chord = baseline.to_vector();
    let c = baseline.from.y * chord.x - baseline.from.x * chord.y;
    // Power-basis coefficients of the curve.
    let from = curve.from.to_vector();
    let ctrl1 = curve.ctrl1.to_vector();
    let ctrl2 = curve.ctrl2.to_vector();
    let to = curve.to.to_vector();
    let a = to - from + (ctrl1 - ctrl2) * 3.0;
    let b = from * 3.0 + (ctrl2 - ctrl1 * 2.0) * 3.0;
    let d = (ctrl1 - from) * 3.0;

    let roots = crate::numerical::solve_cubic(
        chord.y * a.x - chord.x * a.y,
        chord.y * b.x - chord.x * b.y,
        chord.y * d.x - chord.x * d.y,
        chord.y * from.x - chord.x * from.y + c,
        Some((0.0, 1.0)),
    );

    for curve_t in roots {
        let line_ts = if line_is_mostly_vertical {
            line_as_curve.solve_t_for_y(curve.y(curve_t))
        } else {
            line_as_curve.solve_t_for_x(curve.x(curve_t))
        };
        for line_t in line_ts {
            add_intersection(line_t, curve_t, flip, exclude, result);
        }
    }
}

fn line_line_intersections(
    curve1: &CubicBezierSegment,
    curve2: &CubicBezierSegment,
    exclude: Exclude,
    result: &mut Intersections,
) {
    let intersection = match curve1
        .baseline()
        .to_line()
        .intersection(&curve2.baseline().to_line())
    {
        Some(p) => p,
        None => return,
    };

    #[inline]
    fn parameters_for_line_point(curve: &CubicBezierSegment, pt: Point) -> ArrayVec<f64, 3> {
        let line_is_mostly_vertical =
            (curve.from.y - curve.to.y).abs() >= (curve.from.x - curve.to.x).abs();
        if line_is_mostly_vertical {
            curve.solve_t_for_y(pt.y)
        } else {
            curve.solve_t_for_x(pt.x)
        }
    }

    let line1_params = parameters_for_line_point(curve1, intersection);
    if line1_params.is_empty() {
        return;
    }
    let line2_params = parameters_for_line_point(curve2, intersection);
    if line2_params.is_empty() {
        return;
    }

    for &t1 in &line1_params {
        for &t2 in &line2_params {
            add_intersection(t1, t2, /* flip */ false, exclude, result);
        }
    }
}

// This function implements the main bézier clipping algorithm by recursively
// subdividing curve1 and curve2 in to smaller and smaller portions of the
// original curves with the property that one of the curves intersects the
// fat line of the other curve at each stage.
//
// curve1 and curve2 at each stage are sub-bézier curves of the original
// curves; flip tells us whether curve1 at a given stage is a subcurve of the
// original curve1 or the original curve2; similarly for curve2. domain1 and
// domain2 shrink (or stay the same) at each stage and describe which
// subdomain of an original curve the current curve1 and curve2 correspond
// to. (The domains of curve1 and curve2 are 0..1 at every stage.)
#[allow(clippy::too_many_arguments)]
fn add_curve_intersections(
    curve1: &CubicBezierSegment,
    curve2: &CubicBezierSegment,
    domain1: &Range<f64>,
    domain2: &Range<f64>,
    intersections: &mut Intersections,
    flip: bool,
    mut recursion: u32,
    mut calls: u32,
    exclude: Exclude,
) -> u32 {
    calls += 1;
    recursion += 1;
    if calls >= CALL_LIMIT || recursion >= RECURSION_LIMIT {
        // Exhaustion is not an error: report what was found so far.
        return calls;
    }

    if domain2.start == domain2.end || curve2.is_a_point(0.0) {
        add_point_curve_intersection(
            &curve2.from,
            /* point is curve1 */ false,
            curve1,
            domain2,
            domain1,
            intersections,
            flip,
            exclude,
        );
        return calls;
    } else if curve2.from == curve2.to {
        // There's no curve2 baseline to fat-line against, so split curve2
        // and try again.
        let new_2_curves = curve2.split(0.5);
        let domain2_mid = (domain2.start + domain2.end) * 0.5;
        calls = add_curve_intersections(
            curve1,
            &new_2_curves.0,
            domain1,
            &(domain2.start..domain2_mid),
            intersections,
            flip,
            recursion,
            calls,
            exclude,
        );
        calls = add_curve_intersections(
            curve1,
            &new_2_curves.1,
            domain1,
            &(domain2_mid..domain2.end),
            intersections,
            flip,
            recursion,
            calls,
            exclude,
        );
        return calls;
    }

    // (Don't call this before checking for point curves: points are inexact
    // and can lead to false negatives here.)
    if !fast_rects_overlap(curve1, curve2) {
        return calls;
    }

    let (t_min_clip, t_max_clip) = match restrict_curve_to_fat_line(curve1, curve2) {
        Some((min, max)) => (min, max),
        None => return calls,
    };

    // t_min_clip and t_max_clip are (0, 1)-based, so project them back to
    // get the new restricted range:
    let new_domain1 =
        &(domain_value_at_t(domain1, t_min_clip)..domain_value_at_t(domain1, t_max_clip));

    if f64::max(
        domain2.end - domain2.start,
        new_domain1.end - new_domain1.start,
    ) < CLIPPING_EPSILON
    {
        let t1 = (new_domain1.start + new_domain1.end) * 0.5;
        let t2 = (domain2.start + domain2.end) * 0.5;
        add_intersection_flipped(t1, t2, flip, exclude, intersections);
        return calls;
    }

    // Reduce curve1 to the part that might intersect curve2.
    let curve1 = &curve1.split_range(t_min_clip..t_max_clip);

    // (Note: it's possible for new_domain1 to have become a point, even if
    // t_min_clip < t_max_clip. It's also possible for curve1 to not be a
    // point even if new_domain1 is a point, but then curve1 will be very
    // small.)
    if new_domain1.start == new_domain1.end || curve1.is_a_point(0.0) {
        add_point_curve_intersection(
            &curve1.from,
            /* point is curve1 */ true,
            curve2,
            new_domain1,
            domain2,
            intersections,
            flip,
            exclude,
        );
        return calls;
    }

    if t_max_clip - t_min_clip > 0.8 {
        // The clip didn't shrink curve1 by at least 20%: subdivide the
        // curve which has converged the least and try again.
        if new_domain1.end - new_domain1.start > domain2.end - domain2.start {
            let new_1_curves = curve1.split(0.5);
            let new_domain1_mid = (new_domain1.start + new_domain1.end) * 0.5;
            calls = add_curve_intersections(
                curve2,
                &new_1_curves.0,
                domain2,
                &(new_domain1.start..new_domain1_mid),
                intersections,
                !flip,
                recursion,
                calls,
                exclude,
            );
            calls = add_curve_intersections(
                curve2,
                &new_1_curves.1,
                domain2,
                &(new_domain1_mid..new_domain1.end),
                intersections,
                !flip,
                recursion,
                calls,
                exclude,
            );
        } else {
            let new_2_curves = curve2.split(0.5);
            let domain2_mid = (domain2.start + domain2.end) * 0.5;
            calls = add_curve_intersections(
                &new_2_curves.0,
                curve1,
                &(domain2.start..domain2_mid),
                new_domain1,
                intersections,
                !flip,
                recursion,
                calls,
                exclude,
            );
            calls = add_curve_intersections(
                &new_2_curves.1,
                curve1,
                &(domain2_mid..domain2.end),
                new_domain1,
                intersections,
                !flip,
                recursion,
                calls,
                exclude,
            );
        }
    } else {
        // Iterate, swapping roles so that each level tightens the other
        // curve; when curve2's interval is already tight, keep clipping
        // curve1 against it.
        let u_diff = domain2.end - domain2.start;
        if u_diff == 0.0 || u_diff >= CLIPPING_EPSILON {
            calls = add_curve_intersections(
                curve2,
                curve1,
                domain2,
                new_domain1,
                intersections,
                !flip,
                recursion,
                calls,
                exclude,
            );
        } else {
            calls = add_curve_intersections(
                curve1,
                curve2,
                new_domain1,
                domain2,
                intersections,
                flip,
                recursion,
                calls,
                exclude,
            );
        }
    }

    calls
}

#[allow(clippy::too_many_arguments)]
fn add_point_curve_intersection(
    pt: &Point,
    pt_is_curve1: bool,
    curve: &CubicBezierSegment,
    pt_domain: &Range<f64>,
    curve_domain: &Range<f64>,
    intersections: &mut Intersections,
    flip: bool,
    exclude: Exclude,
) {
    // We assume pt is curve1 when we add intersections below.
    let flip = if pt_is_curve1 { flip } else { !flip };

    // |curve| is typically quite small at this point, so a coarse scan
    // followed by the generic projection is enough.
    let mut t_for_min = 0.0;
    // Tolerance on the squared distance of the sampled candidates.
    let mut min_dist_sq = 1e-8;
    let mut found = false;
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        let d = (*pt - curve.sample(t)).square_length();
        if d < min_dist_sq {
            t_for_min = t;
            min_dist_sq = d;
            found = true;
        }
    }
    if !found {
        return;
    }

    let curve_t = domain_value_at_t(curve_domain, t_for_min);
    let pt_t = (pt_domain.start + pt_domain.end) * 0.5;
    add_intersection_flipped(pt_t, curve_t, flip, exclude, intersections);
}

#[inline]
fn add_intersection_flipped(
    t1: f64,
    t2: f64,
    flip: bool,
    exclude: Exclude,
    intersections: &mut Intersections,
) {
    let (t1, t2) = if flip { (t2, t1) } else { (t1, t2) };
    add_intersection(t1, t2, false, exclude, intersections);
}

// Record an intersection, honouring the excluded endpoint seams and
// dropping repeats. Repeats happen when a curve is split at an intersection
// point, or when two curves are very close together around one.
fn add_intersection(
    t1: f64,
    t2: f64,
    flip: bool,
    exclude: Exclude,
    intersections: &mut Intersections,
) {
    let (t1, t2) = if flip { (t2, t1) } else { (t1, t2) };

    let t_min = CURVETIME_EPSILON;
    let t_max = 1.0 - CURVETIME_EPSILON;
    let t1_lo = if exclude.start { t_min } else { 0.0 };
    let t1_hi = if exclude.end { t_max } else { 1.0 };
    let t2_lo = if exclude.end { t_min } else { 0.0 };
    let t2_hi = if exclude.start { t_max } else { 1.0 };
    if t1 < t1_lo || t1 > t1_hi || t2 < t2_lo || t2 > t2_hi {
        return;
    }

    for intersection in intersections.iter() {
        if (t1 - intersection.0).abs() < CURVETIME_EPSILON
            && (t2 - intersection.1).abs() < CURVETIME_EPSILON
        {
            return;
        }
    }

    if !intersections.is_full() {
        intersections.push((t1, t2));
    }
}

// Returns an interval (t_min, t_max) with the property that for parameter
// values outside that interval, curve1 is guaranteed to not intersect
// curve2; uses the fat line of curve2 as its basis for the guarantee.
fn restrict_curve_to_fat_line(
    curve1: &CubicBezierSegment,
    curve2: &CubicBezierSegment,
) -> Option<(f64, f64)> {
    let baseline2 = curve2.baseline().to_line().equation();

    let d_0 = baseline2.signed_distance_to_point(curve1.from);
    let d_1 = baseline2.signed_distance_to_point(curve1.ctrl1);
    let d_2 = baseline2.signed_distance_to_point(curve1.ctrl2);
    let d_3 = baseline2.signed_distance_to_point(curve1.to);

    let (mut top, mut bottom) = convex_hull_of_distance_curve(d_0, d_1, d_2, d_3);
    let (d_min, d_max) = curve2.fat_line_min_max();

    clip_convex_hull_to_fat_line(&mut top, &mut bottom, d_min, d_max)
}

// Returns the convex hull of the curve that's the graph of the function
// t -> d(curve1(t), baseline(curve2)). The convex hull is described as a top
// and a bottom, where each of top and bottom is described by the list of its
// vertices from left to right.
fn convex_hull_of_distance_curve(
    d0: f64,
    d1: f64,
    d2: f64,
    d3: f64,
) -> (Vec<Point>, Vec<Point>) {
    let p0 = point(0.0, d0);
    let p1 = point(1.0 / 3.0, d1);
    let p2 = point(2.0 / 3.0, d2);
    let p3 = point(1.0, d3);
    // Compute the vertical signed distance of p1 and p2 from [p0, p3].
    let dist1 = d1 - (2.0 * d0 + d3) / 3.0;
    let dist2 = d2 - (d0 + 2.0 * d3) / 3.0;

    // Compute the hull assuming p1 is on top - we'll switch later if needed.
    let mut hull = if dist1 * dist2 < 0.0 {
        // p1 and p2 lie on opposite sides of [p0, p3], so the hull is a
        // quadrilateral:
        (vec![p0, p1, p3], vec![p0, p2, p3])
    } else {
        // p1 and p2 lie on the same side of [p0, p3]. The hull can be a
        // triangle or a quadrilateral, and [p0, p3] is part of the hull.
        // The hull is a triangle if the vertical distance of one of the
        // middle points p1, p2 is <= half the vertical distance of the
        // other middle point.
        let dist1 = dist1.abs();
        let dist2 = dist2.abs();
        if dist1 >= 2.0 * dist2 {
            (vec![p0, p1, p3], vec![p0, p3])
        } else if dist2 >= 2.0 * dist1 {
            (vec![p0, p2, p3], vec![p0, p3])
        } else {
            (vec![p0, p1, p2, p3], vec![p0, p3])
        }
    };

    // Flip the hull if needed:
    if dist1 < 0.0 || (dist1 == 0.0 && dist2 < 0.0) {
        hull = (hull.1, hull.0);
    }

    hull
}

// Returns the min and max values at which the convex hull enters the fat
// line min/max offset lines.
fn clip_convex_hull_to_fat_line(
    hull_top: &mut Vec<Point>,
    hull_bottom: &mut Vec<Point>,
    d_min: f64,
    d_max: f64,
) -> Option<(f64, f64)> {
    // Walk from the left corner of the convex hull until we enter the fat
    // line limits:
    let t_clip_min = walk_convex_hull_start_to_fat_line(hull_top, hull_bottom, d_min, d_max)?;
    // Now walk from the right corner of the convex hull until we enter the
    // fat line limits - to walk right to left we just reverse the order of
    // the hull vertices, so that hull_top and hull_bottom start at the
    // right corner now:
    hull_top.reverse();
    hull_bottom.reverse();
    let t_clip_max = walk_convex_hull_start_to_fat_line(hull_top, hull_bottom, d_min, d_max)?;
    Some((t_clip_min, t_clip_max))
}

// Walk the edges of the convex hull until you hit a fat line offset value,
// starting from the first vertex in hull_top_vertices (== the first vertex
// in hull_bottom_vertices).
fn walk_convex_hull_start_to_fat_line(
    hull_top_vertices: &[Point],
    hull_bottom_vertices: &[Point],
    d_min: f64,
    d_max: f64,
) -> Option<f64> {
    let start_corner = hull_top_vertices[0];

    if start_corner.y < d_min {
        walk_convex_hull_edges_to_fat_line(hull_top_vertices, true, d_min)
    } else if start_corner.y > d_max {
        walk_convex_hull_edges_to_fat_line(hull_bottom_vertices, false, d_max)
    } else {
        Some(start_corner.x)
    }
}

// Do the actual walking, starting from the first vertex of hull_vertices.
fn walk_convex_hull_edges_to_fat_line(
    hull_vertices: &[Point],
    vertices_are_for_top: bool,
    threshold: f64,
) -> Option<f64> {
    for i in 0..hull_vertices.len() - 1 {
        let p = hull_vertices[i];
        let q = hull_vertices[i + 1];
        if (vertices_are_for_top && q.y >= threshold) || (!vertices_are_for_top && q.y <= threshold)
        {
            return if q.y == threshold {
                Some(q.x)
            } else {
                Some(p.x + (threshold - p.y) * (q.x - p.x) / (q.y - p.y))
            };
        }
    }
    // All points of the hull are outside the threshold:
    None
}

// Return the point of domain corresponding to the point t, 0 <= t <= 1.
#[inline]
fn domain_value_at_t(domain: &Range<f64>, t: f64) -> f64 {
    domain.start + (domain.end - domain.start) * t
}

// Rect.intersects doesn't count edge/corner intersections, this version
// does.
#[inline]
fn fast_rects_overlap(c1: &CubicBezierSegment, c2: &CubicBezierSegment) -> bool {
    let (min_x1, max_x1) = c1.fast_bounding_range_x();
    let (min_y1, max_y1) = c1.fast_bounding_range_y();
    let (min_x2, max_x2) = c2.fast_bounding_range_x();
    let (min_y2, max_y2) = c2.fast_bounding_range_y();
    min_x1 <= max_x2 && min_x2 <= max_x1 && min_y1 <= max_y2 && min_y2 <= max_y1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn do_test(c1: &CubicBezierSegment, c2: &CubicBezierSegment, count: usize) {
        do_test_once(c1, c2, count);
        do_test_once(c2, c1, count);
    }

    fn do_test_once(c1: &CubicBezierSegment, c2: &CubicBezierSegment, count: usize) {
        let intersections = cubic_bezier_intersections_t(c1, c2, false, false);
        for &(t1, t2) in &intersections {
            let p1 = c1.sample(t1);
            let p2 = c2.sample(t2);
            assert!(
                (p1 - p2).length() < 0.5,
                "intersection points too far apart: {:?} {:?}",
                p1,
                p2
            );
        }
        assert_eq!(intersections.len(), count);
    }

    #[test]
    fn transversal_crossings() {
        do_test(
            &CubicBezierSegment {
                from: point(0.0, 0.0),
                ctrl1: point(0.5, 1.0),
                ctrl2: point(0.5, 1.0),
                to: point(1.0, 0.0),
            },
            &CubicBezierSegment {
                from: point(0.0, 1.0),
                ctrl1: point(0.5, 0.0),
                ctrl2: point(0.5, 0.0),
                to: point(1.0, 1.0),
            },
            2,
        );
        do_test(
            &CubicBezierSegment {
                from: point(48.0, 84.0),
                ctrl1: point(104.0, 176.0),
                ctrl2: point(190.0, 37.0),
                to: point(121.0, 75.0),
            },
            &CubicBezierSegment {
                from: point(68.0, 145.0),
                ctrl1: point(74.0, 6.0),
                ctrl2: point(143.0, 197.0),
                to: point(138.0, 55.0),
            },
            4,
        );
        do_test(
            &CubicBezierSegment {
                from: point(0.2, 0.0),
                ctrl1: point(0.5, 3.0),
                ctrl2: point(0.5, -2.0),
                to: point(0.8, 1.0),
            },
            &CubicBezierSegment {
                from: point(0.0, 0.0),
                ctrl1: point(2.5, 0.5),
                ctrl2: point(-1.5, 0.5),
                to: point(1.0, 0.0),
            },
            9,
        );
    }

    #[test]
    fn line_curve_crossings() {
        do_test(
            &CubicBezierSegment {
                // A line with a wonky parameterization.
                from: point(1.0, 2.0),
                ctrl1: point(20.0, 1.0),
                ctrl2: point(1.0, 2.0),
                to: point(20.0, 1.0),
            },
            &CubicBezierSegment {
                from: point(1.0, 0.0),
                ctrl1: point(1.0, 5.0),
                ctrl2: point(20.0, 25.0),
                to: point(20.0, 0.0),
            },
            2,
        );
    }

    #[test]
    fn line_line_crossing() {
        do_test(
            &CubicBezierSegment {
                from: point(0.0, 0.0),
                ctrl1: point(1.0, 1.0),
                ctrl2: point(2.0, 2.0),
                to: point(3.0, 3.0),
            },
            &CubicBezierSegment {
                from: point(0.0, 3.0),
                ctrl1: point(1.0, 2.0),
                ctrl2: point(2.0, 1.0),
                to: point(3.0, 0.0),
            },
            1,
        );
    }

    #[test]
    fn endpoint_coincidence_is_reported() {
        let c1 = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 10.0),
            ctrl2: point(20.0, 10.0),
            to: point(30.0, 0.0),
        };
        let c2 = CubicBezierSegment {
            from: point(30.0, 0.0),
            ctrl1: point(40.0, 10.0),
            ctrl2: point(50.0, 10.0),
            to: point(60.0, 0.0),
        };
        let found = cubic_bezier_intersections_t(&c1, &c2, false, false);
        assert_eq!(found.len(), 1);
        assert!((found[0].0 - 1.0).abs() < CURVETIME_EPSILON);
        assert!(found[0].1.abs() < CURVETIME_EPSILON);

        // The same pair with the seam excluded, as for two consecutive
        // curves of one path.
        let excluded = cubic_bezier_intersections_t(&c1, &c2, false, true);
        assert!(excluded.is_empty());
    }

    #[test]
    fn tangent_touch_is_not_doubled() {
        // (A naive version returns two practically identical intersection
        // points here.)
        do_test(
            &CubicBezierSegment {
                from: point(718133.1363092018, 673674.987999388),
                ctrl1: point(-53014.13135835016, 286988.87959900266),
                ctrl2: point(-900630.1880107201, -7527.6889376943),
                to: point(417822.48349384824, -149039.14932848653),
            },
            &CubicBezierSegment {
                from: point(924715.3309247112, 719414.5221912428),
                ctrl1: point(965365.9679664494, -563421.3040676294),
                ctrl2: point(273552.85484064696, 643090.0890117711),
                to: point(-113963.134524995, 732017.9466050486),
            },
            1,
        );
    }

    #[test]
    fn overlaps_of_identical_ranges() {
        let c = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(10.0, 40.0),
            ctrl2: point(60.0, -10.0),
            to: point(100.0, 30.0),
        };
        let part = c.split_range(0.25..0.75);
        let pairs = cubic_bezier_overlaps_t(&c, &part).expect("overlap expected");
        let t0 = pairs[0];
        let t1 = pairs[1];
        assert!((c.sample(t0.0) - part.sample(t0.1)).length() < 1e-6);
        assert!((c.sample(t1.0) - part.sample(t1.1)).length() < 1e-6);
    }

    #[test]
    fn collinear_segments_overlap() {
        let a = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 0.0),
            ctrl2: point(10.0, 0.0),
            to: point(10.0, 0.0),
        };
        let b = CubicBezierSegment {
            from: point(5.0, 0.0),
            ctrl1: point(5.0, 0.0),
            ctrl2: point(15.0, 0.0),
            to: point(15.0, 0.0),
        };
        assert!(cubic_bezier_overlaps_t(&a, &b).is_some());

        let c = CubicBezierSegment {
            from: point(5.0, 1.0),
            ctrl1: point(5.0, 1.0),
            ctrl2: point(15.0, 1.0),
            to: point(15.0, 1.0),
        };
        assert!(cubic_bezier_overlaps_t(&a, &c).is_none());
    }

    #[test]
    fn self_intersection_of_a_loop() {
        let looped = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(100.0, 100.0),
            ctrl2: point(-50.0, 100.0),
            to: point(50.0, 0.0),
        };
        let (t1, t2) = cubic_bezier_self_intersection_t(&looped).expect("loop expected");
        assert!((looped.sample(t1) - looped.sample(t2)).length() < 1e-6);

        let arch = CubicBezierSegment {
            from: point(0.0, 0.0),
            ctrl1: point(0.0, 8.0),
            ctrl2: point(10.0, 8.0),
            to: point(10.0, 0.0),
        };
        assert!(cubic_bezier_self_intersection_t(&arch).is_none());
    }
}
