//! Handle smoothing over a range of segments.

use crate::math::Vector;
use crate::path::Path;

/// How [`Path::smooth`](struct.Path.html#method.smooth) computes handles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SmoothType {
    /// Catmull-Rom style handles: each anchor's tangent follows the chord
    /// between its neighbours. Continuous in direction only.
    Asymmetric,
    /// Globally solved handles producing a curvature-continuous spline
    /// through the anchors (the tridiagonal first-control-point system).
    Continuous,
}

/// Option bag for smoothing; `from`/`to` restrict the affected segment
/// range, other segments keep their handles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothOptions {
    pub smooth_type: SmoothType,
    pub from: Option<usize>,
    pub to: Option<usize>,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        SmoothOptions {
            smooth_type: SmoothType::Continuous,
            from: None,
            to: None,
        }
    }
}

pub(crate) fn smooth(path: &mut Path, options: &SmoothOptions) {
    let n = path.segment_count();
    if n < 2 {
        return;
    }
    let from = options.from.unwrap_or(0).min(n - 1);
    let to = options.to.unwrap_or(n - 1).min(n - 1);
    if to < from {
        return;
    }
    match options.smooth_type {
        SmoothType::Asymmetric => smooth_asymmetric(path, from, to),
        SmoothType::Continuous => smooth_continuous(path, from, to),
    }
}

fn smooth_asymmetric(path: &mut Path, from: usize, to: usize) {
    let n = path.segment_count();
    let closed = path.is_closed();
    for i in from..=to {
        let prev = if i > 0 {
            Some(i - 1)
        } else if closed {
            Some(n - 1)
        } else {
            None
        };
        let next = if i + 1 < n {
            Some(i + 1)
        } else if closed {
            Some(0)
        } else {
            None
        };
        let p = path.segments()[i].point;
        let pv = prev.map(|j| path.segments()[j].point).unwrap_or(p);
        let nx = next.map(|j| path.segments()[j].point).unwrap_or(p);
        let d = (nx - pv) / 6.0;
        let mut segment = path.segments()[i];
        if prev.is_some() {
            segment.handle_in = -d;
        }
        if next.is_some() {
            segment.handle_out = d;
        }
        path.set_segment(i, segment);
    }
}

// The approach of https://www.particleincell.com/2012/bezier-splines/ :
// solve the tridiagonal system for the first control points, with wrapped
// padding knots on closed paths so the seam stays smooth.
fn smooth_continuous(path: &mut Path, from: usize, to: usize) {
    let n = path.segment_count();
    let closed = path.is_closed();
    let amount = to - from + 1;
    let padding = if closed { amount.min(4) } else { 1 };
    let (pad_left, pad_right) = if closed {
        (padding, padding)
    } else {
        (from.min(1), (n - 1 - to).min(1))
    };
    let count = amount - 1 + pad_left + pad_right;
    if count <= 1 {
        return;
    }

    let wrap = |j: isize| -> usize {
        let n = n as isize;
        (((j % n) + n) % n) as usize
    };
    let knots: Vec<Vector> = (0..=count)
        .map(|i| {
            let j = from as isize - pad_left as isize + i as isize;
            path.segments()[wrap(j)].point.to_vector()
        })
        .collect();

    // Tridiagonal coefficients of the open spline system.
    let mut a = vec![0.0; count];
    let mut b = vec![0.0; count];
    let mut c = vec![0.0; count];
    let mut r = vec![Vector::zero(); count];
    b[0] = 2.0;
    c[0] = 1.0;
    r[0] = knots[0] + knots[1] * 2.0;
    for i in 1..count - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        c[i] = 1.0;
        r[i] = knots[i] * 4.0 + knots[i + 1] * 2.0;
    }
    a[count - 1] = 2.0;
    b[count - 1] = 7.0;
    r[count - 1] = knots[count - 1] * 8.0 + knots[count];

    // Thomas algorithm.
    for i in 1..count {
        let m = a[i] / b[i - 1];
        b[i] -= m * c[i - 1];
        r[i] = r[i] - r[i - 1] * m;
    }
    let mut p1 = vec![Vector::zero(); count];
    p1[count - 1] = r[count - 1] / b[count - 1];
    for i in (0..count - 1).rev() {
        p1[i] = (r[i] - p1[i + 1] * c[i]) / b[i];
    }
    let mut p2 = vec![Vector::zero(); count];
    for i in 0..count - 1 {
        p2[i] = knots[i + 1] * 2.0 - p1[i + 1];
    }
    p2[count - 1] = (knots[count] + p1[count - 1]) * 0.5;

    // Only the central, unpadded portion of the solution is applied; the
    // padded knots merely anchor the system.
    for k in pad_left..=count - pad_right {
        let j = wrap(from as isize - pad_left as isize + k as isize);
        if j < from || j > to {
            continue;
        }
        let mut segment = path.segments()[j];
        let anchor = knots[k];
        if k < count && (closed || j < n - 1) {
            segment.handle_out = p1[k] - anchor;
        }
        if k > 0 && (closed || j > 0) {
            segment.handle_in = p2[k - 1] - anchor;
        }
        path.set_segment(j, segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point;
    use crate::Segment;

    fn zigzag() -> Path {
        Path::with_segments(
            vec![
                Segment::new(point(0.0, 0.0)),
                Segment::new(point(10.0, 10.0)),
                Segment::new(point(20.0, 0.0)),
                Segment::new(point(30.0, 10.0)),
                Segment::new(point(40.0, 0.0)),
            ],
            false,
        )
    }

    #[test]
    fn continuous_smoothing_matches_tangents() {
        let mut p = zigzag();
        p.smooth(&SmoothOptions::default());
        // Interior segments have opposing handles: the spline is smooth.
        for i in 1..4 {
            let s = p.segments()[i];
            assert!(s.has_handles());
            let cross = s.handle_in.cross(s.handle_out);
            let dot = s.handle_in.dot(s.handle_out);
            assert!(cross.abs() < 1e-9, "handles not collinear at {}", i);
            assert!(dot < 0.0, "handles point the same way at {}", i);
        }
        // The open ends keep no incoming/outgoing handle respectively.
        assert_eq!(p.segments()[0].handle_in, Vector::zero());
        assert_eq!(p.segments()[4].handle_out, Vector::zero());
        // The spline passes through the original anchors.
        assert_eq!(p.segments()[2].point, point(20.0, 0.0));
    }

    #[test]
    fn asymmetric_smoothing_uses_neighbour_chords() {
        let mut p = zigzag();
        p.smooth(&SmoothOptions {
            smooth_type: SmoothType::Asymmetric,
            from: None,
            to: None,
        });
        let s = p.segments()[1];
        let chord = point(20.0, 0.0) - point(0.0, 0.0);
        assert!((s.handle_out - chord / 6.0).length() < 1e-12);
        assert!((s.handle_in + chord / 6.0).length() < 1e-12);
    }

    #[test]
    fn range_restricts_the_affected_segments() {
        let mut p = zigzag();
        p.smooth(&SmoothOptions {
            smooth_type: SmoothType::Continuous,
            from: Some(1),
            to: Some(3),
        });
        assert!(!p.segments()[0].has_handles());
        assert!(!p.segments()[4].has_handles());
        assert!(p.segments()[2].has_handles());
    }

    #[test]
    fn closed_path_smooths_across_the_seam() {
        let mut p = Path::with_segments(
            vec![
                Segment::new(point(0.0, 0.0)),
                Segment::new(point(10.0, 0.0)),
                Segment::new(point(10.0, 10.0)),
                Segment::new(point(0.0, 10.0)),
            ],
            true,
        );
        p.smooth(&SmoothOptions::default());
        for s in p.segments() {
            assert!(s.has_handles());
        }
    }
}
