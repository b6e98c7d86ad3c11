use crate::curve::Curve;
use crate::fitter;
use crate::geom::numerical::{CURVETIME_EPSILON, EPSILON, GEOMETRIC_EPSILON};
use crate::geom::CubicBezierSegment;
use crate::math::{point, rect_center, Angle, Point, Rect, Transform, Vector};
use crate::segment::Segment;
use crate::smooth::{self, SmoothOptions};
use crate::winding::{winding_at, Winding};
use crate::{FillRule, PathError};

use std::cell::Cell;

/// An ordered list of segments describing one continuous outline.
///
/// A closed path of `n` segments has `n` curves (the last one joining the
/// last segment back to the first); an open path has `n - 1`.
///
/// Derived data (length, signed area, bounds) is cached and invalidated
/// whenever the geometry changes.
#[derive(Clone, Debug, Default)]
pub struct Path {
    segments: Vec<Segment>,
    closed: bool,
    length: Cell<Option<f64>>,
    area: Cell<Option<f64>>,
    bounds: Cell<Option<Rect>>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed && self.segments == other.segments
    }
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn with_segments(segments: Vec<Segment>, closed: bool) -> Self {
        Path {
            segments,
            closed,
            ..Path::default()
        }
    }

    // Invalidate the cached geometry. Every mutation funnels through here.
    pub(crate) fn changed(&self) {
        self.length.set(None);
        self.area.set(None);
        self.bounds.set(None);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        if self.closed != closed {
            self.closed = closed;
            self.changed();
        }
    }

    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
        self.changed();
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Segment> {
        self.changed();
        self.segments.last_mut()
    }

    pub fn set_segment(&mut self, index: usize, segment: Segment) {
        self.segments[index] = segment;
        self.changed();
    }

    /// Append a segment at the end of the path.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
        self.changed();
    }

    /// Splice a segment in at `index`; later segments shift up.
    pub fn insert(&mut self, index: usize, segment: Segment) {
        self.segments.insert(index, segment);
        self.changed();
    }

    pub fn insert_segments(&mut self, index: usize, segments: Vec<Segment>) {
        self.segments.splice(index..index, segments);
        self.changed();
    }

    /// Remove the segments in `[start, end)` and return them.
    pub fn remove_segments(&mut self, start: usize, end: usize) -> Vec<Segment> {
        let removed = self.segments.drain(start..end).collect();
        self.changed();
        removed
    }

    /// The index of the segment before `index`, honouring closedness.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if index > 0 {
            Some(index - 1)
        } else if self.closed && !self.segments.is_empty() {
            Some(self.segments.len() - 1)
        } else {
            None
        }
    }

    /// The index of the segment after `index`, honouring closedness.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.segments.len() {
            Some(index + 1)
        } else if self.closed && !self.segments.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    // --- building ---------------------------------------------------------

    /// Begin the path at `to`. Only valid on an empty path.
    pub fn move_to(&mut self, to: Point) -> Result<(), PathError> {
        if !self.segments.is_empty() {
            return Err(PathError::UnexpectedMoveTo);
        }
        self.push(Segment::new(to));
        Ok(())
    }

    pub fn line_to(&mut self, to: Point) -> Result<(), PathError> {
        if self.segments.is_empty() {
            return Err(PathError::MissingMoveTo);
        }
        self.push(Segment::new(to));
        Ok(())
    }

    pub fn cubic_curve_to(
        &mut self,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    ) -> Result<(), PathError> {
        let last = self.segments.last_mut().ok_or(PathError::MissingMoveTo)?;
        last.handle_out = ctrl1 - last.point;
        self.push(Segment::with_handles(to, ctrl2 - to, Vector::zero()));
        Ok(())
    }

    /// Add a quadratic arc, converted to the equivalent cubic through the
    /// exact `B = E + 2/3·(A - E)` identity.
    pub fn quadratic_curve_to(&mut self, ctrl: Point, to: Point) -> Result<(), PathError> {
        let current = self.segments.last().ok_or(PathError::MissingMoveTo)?.point;
        let ctrl1 = current + (ctrl - current) * (2.0 / 3.0);
        let ctrl2 = to + (ctrl - to) * (2.0 / 3.0);
        self.cubic_curve_to(ctrl1, ctrl2, to)
    }

    /// Add a circular arc from the current point through `through` to `to`.
    ///
    /// A collinear through-point (or a zero radius) degrades to a straight
    /// line; non-finite input is refused.
    pub fn arc_to(&mut self, through: Point, to: Point) -> Result<(), PathError> {
        let from = self.segments.last().ok_or(PathError::MissingMoveTo)?.point;
        if !(through.x.is_finite()
            && through.y.is_finite()
            && to.x.is_finite()
            && to.y.is_finite())
        {
            return Err(PathError::InvalidArc);
        }
        match crate::shapes::arc_center(from, through, to) {
            Some((center, _radius)) => {
                crate::shapes::add_arc_segments(self, from, center, through, to);
                self.changed();
                Ok(())
            }
            None => self.line_to(to),
        }
    }

    /// Close the path. Fails on an empty path.
    pub fn close(&mut self) -> Result<(), PathError> {
        if self.segments.is_empty() {
            return Err(PathError::MissingMoveTo);
        }
        self.close_path(0.0);
        Ok(())
    }

    /// Mark the path as closed, merging the last segment into the first
    /// when the two anchors are within `tolerance`.
    pub fn close_path(&mut self, tolerance: f64) {
        if self.segments.len() > 1 {
            let first = self.segments[0];
            let last = *self.segments.last().unwrap();
            if (first.point - last.point).length() <= tolerance.max(EPSILON) {
                self.segments[0].handle_in = last.handle_in;
                self.segments.pop();
            }
        }
        self.closed = true;
        self.changed();
    }

    // --- curves -----------------------------------------------------------

    #[inline]
    pub fn curve_count(&self) -> usize {
        let n = self.segments.len();
        if self.closed {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    pub fn curve(&self, index: usize) -> Curve {
        Curve::new(self, index)
    }

    pub fn curves(&self) -> impl Iterator<Item = Curve<'_>> + '_ {
        (0..self.curve_count()).map(move |i| Curve::new(self, i))
    }

    /// The control polygon of curve `index`.
    pub fn curve_values(&self, index: usize) -> CubicBezierSegment {
        let n = self.segments.len();
        let s1 = &self.segments[index];
        let s2 = &self.segments[(index + 1) % n];
        CubicBezierSegment {
            from: s1.point,
            ctrl1: s1.point + s1.handle_out,
            ctrl2: s2.point + s2.handle_in,
            to: s2.point,
        }
    }

    /// The control polygons of all curves.
    pub fn collect_curve_values(&self) -> Vec<CubicBezierSegment> {
        (0..self.curve_count())
            .map(|i| self.curve_values(i))
            .collect()
    }

    // --- derived geometry -------------------------------------------------

    /// The signed area enclosed by the path, positive for clockwise
    /// orientation in y-down coordinates. Open paths are closed by a
    /// virtual chord.
    pub fn area(&self) -> f64 {
        if let Some(area) = self.area.get() {
            return area;
        }
        let mut area = 0.0;
        for i in 0..self.curve_count() {
            area += self.curve_values(i).signed_area();
        }
        if !self.closed && self.segments.len() > 1 {
            let first = self.segments[0].point;
            let last = self.segments.last().unwrap().point;
            area += 0.5 * (last.x * first.y - first.x * last.y);
        }
        self.area.set(Some(area));
        area
    }

    /// The total arc length of the path's curves.
    pub fn length(&self) -> f64 {
        if let Some(length) = self.length.get() {
            return length;
        }
        let length = (0..self.curve_count())
            .map(|i| self.curve_values(i).length())
            .sum();
        self.length.set(Some(length));
        length
    }

    /// The bounding rectangle of the path's curves.
    pub fn bounds(&self) -> Rect {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let bounds = self.bounds_with(None, 0.0);
        self.bounds.set(Some(bounds));
        bounds
    }

    /// The bounding rectangle under an optional transform, padded on all
    /// sides (pass half the stroke width to get stroke bounds).
    pub fn bounds_with(&self, matrix: Option<&Transform>, padding: f64) -> Rect {
        if self.segments.is_empty() {
            return Rect::zero();
        }
        let mut bounds: Option<Rect> = None;
        let mut add = |r: Rect| {
            bounds = Some(match bounds {
                Some(b) => b.union(&r),
                None => r,
            });
        };
        if self.curve_count() == 0 {
            let p = match matrix {
                Some(m) => m.transform_point(self.segments[0].point),
                None => self.segments[0].point,
            };
            add(Rect::new(p, crate::math::size(0.0, 0.0)));
        }
        for i in 0..self.curve_count() {
            let mut v = self.curve_values(i);
            if let Some(m) = matrix {
                v = v.transformed(m);
            }
            add(v.bounding_rect_padded(padding));
        }
        bounds.unwrap_or_else(Rect::zero)
    }

    /// Whether the path is oriented clockwise (in y-down coordinates).
    pub fn is_clockwise(&self) -> bool {
        self.area() >= 0.0
    }

    pub fn set_clockwise(&mut self, clockwise: bool) {
        if self.is_clockwise() != clockwise {
            self.reverse();
        }
    }

    /// Reverse the direction of the path: segment order flips and each
    /// segment swaps its handles.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for segment in &mut self.segments {
            *segment = segment.reversed();
        }
        self.changed();
    }

    // --- transforms -------------------------------------------------------

    pub fn transform(&mut self, matrix: &Transform) {
        for segment in &mut self.segments {
            *segment = segment.transformed(matrix);
        }
        self.changed();
    }

    pub fn translate(&mut self, delta: Vector) {
        self.transform(&Transform::translation(delta.x, delta.y));
    }

    pub fn rotate(&mut self, angle: Angle, center: Point) {
        let m = Transform::translation(-center.x, -center.y)
            .then_rotate(angle)
            .then_translate(center.to_vector());
        self.transform(&m);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, center: Point) {
        let m = Transform::translation(-center.x, -center.y)
            .then_scale(sx, sy)
            .then_translate(center.to_vector());
        self.transform(&m);
    }

    // --- hit testing ------------------------------------------------------

    /// The winding record of a point against this path's curves.
    pub fn winding_at(&self, p: Point, vertical: bool) -> Winding {
        winding_at(p, &self.collect_curve_values(), vertical)
    }

    /// Whether the path contains `p` under the given fill rule. Points
    /// lying on the path (within `GEOMETRIC_EPSILON`) are outside.
    pub fn contains(&self, p: Point, rule: FillRule) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let bounds = self.bounds().inflate(GEOMETRIC_EPSILON, GEOMETRIC_EPSILON);
        if !rect_contains_closed(&bounds, p) {
            return false;
        }
        if self.is_on_path(p) {
            return false;
        }
        self.winding_at(p, false).is_inside(rule)
    }

    /// Whether `p` lies on the outline within `GEOMETRIC_EPSILON`.
    pub fn is_on_path(&self, p: Point) -> bool {
        for segment in &self.segments {
            if (segment.point - p).length() <= GEOMETRIC_EPSILON {
                return true;
            }
        }
        for i in 0..self.curve_count() {
            if self.curve_values(i).time_of(p).is_some() {
                return true;
            }
        }
        false
    }

    /// A point in the interior of the path: the bounds center when it is
    /// contained, otherwise the midpoint of the first two intercepts of a
    /// horizontal ray through the center.
    pub fn interior_point(&self) -> Point {
        let center = rect_center(&self.bounds());
        if self.contains(center, FillRule::NonZero) {
            return center;
        }
        let y = center.y;
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..self.curve_count() {
            let v = self.curve_values(i);
            for t in v.solve_t_for_y(y) {
                xs.push(v.x(t));
            }
        }
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs.dedup_by(|a, b| (*a - *b).abs() < GEOMETRIC_EPSILON);
        if xs.len() > 1 {
            point((xs[0] + xs[1]) * 0.5, y)
        } else {
            center
        }
    }

    // --- splitting and joining --------------------------------------------

    /// Divide curve `curve_index` at time `t`, inserting a segment at the
    /// split point (or reusing the boundary segment when `t` is within
    /// `CURVETIME_EPSILON` of 0 or 1). Returns the index of the segment at
    /// the split point.
    pub fn divide_at(&mut self, curve_index: usize, t: f64) -> usize {
        let n = self.segments.len();
        debug_assert!(curve_index < self.curve_count());
        if t < CURVETIME_EPSILON {
            return curve_index;
        }
        if t > 1.0 - CURVETIME_EPSILON {
            return (curve_index + 1) % n;
        }
        let v = self.curve_values(curve_index);
        let i2 = (curve_index + 1) % n;
        let segment = if v.has_handles() {
            let (left, right) = v.split(t);
            self.segments[curve_index].handle_out = left.ctrl1 - left.from;
            self.segments[i2].handle_in = right.ctrl2 - right.to;
            Segment::with_handles(left.to, left.ctrl2 - left.to, right.ctrl1 - right.from)
        } else {
            Segment::new(v.sample(t))
        };
        self.segments.insert(curve_index + 1, segment);
        self.changed();
        curve_index + 1
    }

    /// Split the path at `(curve_index, t)`.
    ///
    /// An open path keeps the part before the split and returns the suffix;
    /// a closed path becomes open at the split and `None` is returned.
    pub fn split_at(&mut self, curve_index: usize, t: f64) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        let i = self.divide_at(curve_index, t);
        if self.closed {
            self.segments.rotate_left(i);
            let mut end = self.segments[0];
            end.handle_out = Vector::zero();
            self.segments[0].handle_in = Vector::zero();
            self.segments.push(end);
            self.closed = false;
            self.changed();
            None
        } else {
            let mut suffix: Vec<Segment> = self.segments.split_off(i);
            // The split segment belongs to both halves.
            let mut start = suffix[0];
            self.segments.push(Segment::with_handles(
                start.point,
                start.handle_in,
                Vector::zero(),
            ));
            start.handle_in = Vector::zero();
            suffix[0] = start;
            self.changed();
            Some(Path::with_segments(suffix, false))
        }
    }

    /// Append another path, connecting matching endpoints (reversing either
    /// path when needed). Returns false when the two paths do not touch
    /// within `tolerance`.
    pub fn join(&mut self, other: &Path, tolerance: f64) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.segments.is_empty() {
            *self = other.clone();
            return true;
        }
        let eps = tolerance.max(EPSILON);
        let close = |a: &Segment, b: &Segment| (a.point - b.point).length() <= eps;

        let mut other = other.clone();
        if close(self.last_segment().unwrap(), other.last_segment().unwrap())
            || close(self.first_segment().unwrap(), other.first_segment().unwrap())
        {
            other.reverse();
        }
        if close(self.first_segment().unwrap(), other.last_segment().unwrap()) {
            std::mem::swap(&mut self.segments, &mut other.segments);
        }
        if !close(self.last_segment().unwrap(), other.first_segment().unwrap()) {
            return false;
        }
        let joint = other.segments[0];
        let last = self.segments.last_mut().unwrap();
        last.handle_out = joint.handle_out;
        self.segments.extend_from_slice(&other.segments[1..]);
        if self.segments.len() > 1
            && (self.segments[0].point - self.segments.last().unwrap().point).length() <= eps
        {
            self.close_path(eps);
        } else {
            self.changed();
        }
        true
    }

    // --- simplification ---------------------------------------------------

    /// Remove degenerate curves: handle-free curves with no length, and
    /// (when `simplify` is set) handle-free curves collinear with their
    /// successor.
    pub fn reduce(&mut self, simplify: bool) {
        let tolerance = if simplify { GEOMETRIC_EPSILON } else { 0.0 };
        let mut i = self.curve_count();
        while i > 0 {
            i -= 1;
            if self.segments.len() <= 1 || i >= self.curve_count() {
                continue;
            }
            let v = self.curve_values(i);
            if v.has_handles() {
                continue;
            }
            let collinear = simplify && {
                let count = self.curve_count();
                let next = (i + 1) % count;
                let has_next = self.closed || i + 1 < count;
                has_next && next != i && {
                    let w = self.curve_values(next);
                    !w.has_handles()
                        && crate::geom::utils::is_collinear(v.to - v.from, w.to - w.from)
                }
            };
            if (v.to - v.from).length() <= tolerance || collinear {
                let n = self.segments.len();
                let i2 = (i + 1) % n;
                let handle_out = self.segments[i2].handle_out;
                self.segments[i].handle_out = handle_out;
                self.segments.remove(i2);
                self.changed();
            }
        }
    }

    /// Whether any segment carries a handle.
    pub fn has_handles(&self) -> bool {
        self.segments.iter().any(|s| s.has_handles())
    }

    pub fn clear_handles(&mut self) {
        for segment in &mut self.segments {
            segment.clear_handles();
        }
        self.changed();
    }

    /// Replace the curves by straight segments such that no piece deviates
    /// from its chord by more than `flatness`.
    pub fn flatten(&mut self, flatness: f64) {
        if self.segments.is_empty() {
            return;
        }
        let mut points = vec![self.segments[0].point];
        for i in 0..self.curve_count() {
            flatten_curve(&self.curve_values(i), flatness, 0, &mut points);
        }
        if self.closed {
            points.pop();
        }
        self.segments = points.into_iter().map(Segment::new).collect();
        self.changed();
    }

    /// Fit a new sequence of smooth segments through the current segment
    /// points, within `tolerance`. Returns false when fitting failed and
    /// the path is left unchanged.
    pub fn simplify(&mut self, tolerance: f64) -> bool {
        match fitter::fit(self, tolerance) {
            Some(segments) => {
                self.segments = segments;
                self.changed();
                true
            }
            None => false,
        }
    }

    /// Recompute handles so that the path runs smoothly through its
    /// anchors; see [`SmoothOptions`](struct.SmoothOptions.html).
    pub fn smooth(&mut self, options: &SmoothOptions) {
        smooth::smooth(self, options);
        self.changed();
    }
}

fn flatten_curve(v: &CubicBezierSegment, flatness: f64, depth: u32, out: &mut Vec<Point>) {
    if depth >= 16 || v.is_a_point(flatness) || v.is_linear(flatness) {
        out.push(v.to);
        return;
    }
    let (a, b) = v.split(0.5);
    flatten_curve(&a, flatness, depth + 1, out);
    flatten_curve(&b, flatness, depth + 1, out);
}

// Rect::contains is exclusive on the max edges; the hit testing wants the
// closure of the rectangle.
fn rect_contains_closed(r: &Rect, p: Point) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}
