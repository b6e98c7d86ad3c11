//! Intersection records ("locations") and the curve table they refer to.
//!
//! A location pins a point on one curve of one operand by `(curve, time)`;
//! its counterpart on the other curve is a second location, cross-linked.
//! During division the locations get bound to concrete segments and chained
//! (`next`/`previous`) with other locations that coincide spatially.

use crate::geom::numerical::{CURVETIME_EPSILON, GEOMETRIC_EPSILON};
use crate::geom::utils::{is_collinear, points_close, vector_angle};
use crate::geom::CubicBezierSegment;
use crate::math::Point;
use crate::path::Path;

pub(crate) const NO_CURVE: usize = usize::MAX;

/// One flattened curve of the operands, with its neighbourhood.
pub(crate) struct CurveEntry {
    pub values: CubicBezierSegment,
    pub operand: u8,
    /// Flat path index across both operands; equals the ring index of the
    /// boolean working graph built from the same path list.
    pub path: usize,
    /// Curve index within its path.
    pub index: usize,
    /// Global indices of the neighbouring curves on the same path
    /// (`NO_CURVE` at the open ends).
    pub prev: usize,
    pub next: usize,
}

pub(crate) struct CurveTable {
    pub entries: Vec<CurveEntry>,
    /// Number of curves contributed by the first operand.
    pub split: usize,
    /// Curve count per flat path index.
    pub path_curve_counts: Vec<usize>,
}

impl CurveTable {
    pub fn build(paths: &[(&Path, u8)]) -> CurveTable {
        let mut entries = Vec::new();
        let mut split = 0;
        let mut path_curve_counts = Vec::with_capacity(paths.len());
        for (path_index, (path, operand)) in paths.iter().enumerate() {
            let count = path.curve_count();
            path_curve_counts.push(count);
            let base = entries.len();
            for index in 0..count {
                let prev = if index > 0 {
                    base + index - 1
                } else if path.is_closed() && count > 1 {
                    base + count - 1
                } else {
                    NO_CURVE
                };
                let next = if index + 1 < count {
                    base + index + 1
                } else if path.is_closed() && count > 1 {
                    base
                } else {
                    NO_CURVE
                };
                entries.push(CurveEntry {
                    values: path.curve_values(index),
                    operand: *operand,
                    path: path_index,
                    index,
                    prev,
                    next,
                });
            }
            if *operand == 0 {
                split = entries.len();
            }
        }
        CurveTable {
            entries,
            split,
            path_curve_counts,
        }
    }

    pub fn values(&self, i: usize) -> &CubicBezierSegment {
        &self.entries[i].values
    }
}

/// An intersection record.
#[derive(Clone, Debug)]
pub(crate) struct Location {
    /// The curve the location lies on, as a curve-table index; this is the
    /// pre-division identity of the curve.
    pub curve: usize,
    pub time: f64,
    pub point: Point,
    pub overlap: bool,
    /// The counterpart location on the other curve.
    pub other: usize,
    /// Whether the two paths actually cross here (derived after
    /// collection).
    pub crossing: bool,
    /// The graph node starting the (possibly divided) curve this location
    /// currently lies on; kept current by the division pass.
    pub cnode: usize,
    /// The segment node the location was bound to by the division pass.
    pub segment: Option<usize>,
    /// Chain of locations that coincide spatially but lie on different
    /// curve pairs.
    pub next: Option<usize>,
    pub prev: Option<usize>,
}

#[derive(Default)]
pub(crate) struct LocationSet {
    pub locs: Vec<Location>,
}

impl LocationSet {
    /// Append a cross-linked pair of locations, unless an equal pair is
    /// already recorded; a merged duplicate carries its overlap flag over
    /// to the surviving pair.
    pub fn add_pair(
        &mut self,
        table: &CurveTable,
        c1: usize,
        t1: f64,
        c2: usize,
        t2: f64,
        overlap: bool,
    ) {
        let p1 = table.values(c1).sample(t1);
        let p2 = table.values(c2).sample(t2);

        // De-duplicate against the existing pairs, in both orientations.
        let mut i = 0;
        while i < self.locs.len() {
            let a = &self.locs[i];
            let b = &self.locs[a.other];
            if (self.matches(table, a, c1, t1, p1) && self.matches(table, b, c2, t2, p2))
                || (self.matches(table, a, c2, t2, p2) && self.matches(table, b, c1, t1, p1))
            {
                if overlap {
                    let other = self.locs[i].other;
                    self.locs[i].overlap = true;
                    self.locs[other].overlap = true;
                }
                return;
            }
            i += 2;
        }

        let i1 = self.locs.len();
        let i2 = i1 + 1;
        self.locs.push(Location {
            curve: c1,
            time: t1,
            point: p1,
            overlap,
            other: i2,
            crossing: false,
            cnode: NO_CURVE,
            segment: None,
            next: None,
            prev: None,
        });
        self.locs.push(Location {
            curve: c2,
            time: t2,
            point: p2,
            overlap,
            other: i1,
            crossing: false,
            cnode: NO_CURVE,
            segment: None,
            next: None,
            prev: None,
        });
    }

    // Whether an existing location describes the same point of the same
    // path, allowing the curve-time to wrap around closed paths.
    fn matches(&self, table: &CurveTable, loc: &Location, curve: usize, time: f64, point: Point) -> bool {
        let ea = &table.entries[loc.curve];
        let eb = &table.entries[curve];
        if ea.path != eb.path {
            return false;
        }
        if !points_close(loc.point, point, GEOMETRIC_EPSILON) {
            return false;
        }
        let diff = ((ea.index as f64 + loc.time) - (eb.index as f64 + time)).abs();
        let wrap = table.path_curve_counts[ea.path] as f64;
        diff < CURVETIME_EPSILON || (wrap - diff).abs() < CURVETIME_EPSILON
    }

    /// Derive the crossing flag of every location.
    pub fn classify(&mut self, table: &CurveTable) {
        for i in 0..self.locs.len() {
            self.locs[i].crossing = is_crossing(table, &self.locs, i);
        }
    }

    /// The indices of the locations passing `filter`, together with their
    /// counterparts.
    pub fn expand<F: Fn(&Location) -> bool>(&self, filter: F) -> Vec<usize> {
        let mut included = vec![false; self.locs.len()];
        for (i, loc) in self.locs.iter().enumerate() {
            if filter(loc) {
                included[i] = true;
                included[loc.other] = true;
            }
        }
        (0..self.locs.len()).filter(|&i| included[i]).collect()
    }
}

// Whether the two paths genuinely cross at this location, i.e. entering
// each other's side, as opposed to merely touching. Around a segment
// boundary the branches of both paths are compared by the circular
// interleaving of their tangent directions.
pub(crate) fn is_crossing(table: &CurveTable, locs: &[Location], li: usize) -> bool {
    let loc = &locs[li];
    let other = &locs[loc.other];
    let t1 = loc.time;
    let t2 = other.time;
    let t_min = CURVETIME_EPSILON;
    let t_max = 1.0 - t_min;
    let t1_inside = t1 >= t_min && t1 <= t_max;
    let t2_inside = t2 >= t_min && t2 <= t_max;

    if t1_inside && t2_inside {
        return !is_touching(table, locs, li);
    }

    // The four curves around the intersection point: c1/c2 are the
    // incoming and outgoing curves of this location's path, c3/c4 of the
    // counterpart's.
    let entry = |i: usize| -> Option<&CurveEntry> {
        if i == NO_CURVE {
            None
        } else {
            Some(&table.entries[i])
        }
    };
    let c2i = if t1 > t_max {
        table.entries[loc.curve].next
    } else {
        loc.curve
    };
    let c1i = if t1 < t_min {
        table.entries[loc.curve].prev
    } else {
        loc.curve
    };
    let c4i = if t2 > t_max {
        table.entries[other.curve].next
    } else {
        other.curve
    };
    let c3i = if t2 < t_min {
        table.entries[other.curve].prev
    } else {
        other.curve
    };
    let (c1, c2, c3, c4) = match (entry(c1i), entry(c2i), entry(c3i), entry(c4i)) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return false,
    };

    // How far to step away from the intersection when sampling the branch
    // directions: stay within the span up to the nearest inflection or
    // speed peak, so the sampled direction is representative.
    fn add_offsets(v: &CubicBezierSegment, end: bool, offsets: &mut Vec<f64>) {
        let info = v.classify();
        let roots: Vec<f64> = if !info.roots.is_empty() {
            info.roots.iter().cloned().collect()
        } else {
            v.peaks().iter().cloned().collect()
        };
        let count = roots.len();
        let from = if end && count > 0 { roots[count - 1] } else { 0.0 };
        let to = if !end && count > 0 { roots[0] } else { 1.0 };
        let offset = v.split_range(from..to).length();
        offsets.push(if count > 0 { offset } else { offset / 32.0 });
    }

    let mut offsets = Vec::new();
    if !t1_inside {
        add_offsets(&c1.values, true, &mut offsets);
        add_offsets(&c2.values, false, &mut offsets);
    }
    if !t2_inside {
        add_offsets(&c3.values, true, &mut offsets);
        add_offsets(&c4.values, false, &mut offsets);
    }
    let pt = loc.point;
    let offset = offsets.iter().cloned().fold(f64::MAX, f64::min);

    let v2 = if t1_inside {
        c2.values.tangent(t1)
    } else {
        c2.values.point_at_length(offset) - pt
    };
    let v1 = if t1_inside {
        -v2
    } else {
        c1.values.point_at_length(-offset) - pt
    };
    let v4 = if t2_inside {
        c4.values.tangent(t2)
    } else {
        c4.values.point_at_length(offset) - pt
    };
    let v3 = if t2_inside {
        -v4
    } else {
        c3.values.point_at_length(-offset) - pt
    };

    let a1 = vector_angle(v1);
    let a2 = vector_angle(v2);
    let a3 = vector_angle(v3);
    let a4 = vector_angle(v4);

    // Whether `angle` lies within the circular range (min, max).
    fn in_range(angle: f64, min: f64, max: f64) -> bool {
        if min < max {
            angle > min && angle < max
        } else {
            angle > min || angle < max
        }
    }

    if t1_inside {
        (in_range(a1, a3, a4) != in_range(a2, a3, a4))
            && (in_range(a1, a4, a3) != in_range(a2, a4, a3))
    } else {
        (in_range(a3, a1, a2) != in_range(a4, a1, a2))
            && (in_range(a3, a2, a1) != in_range(a4, a2, a1))
    }
}

// A tangential meeting of the two curves; two straight lines whose carrier
// lines do intersect still count as crossing.
fn is_touching(table: &CurveTable, locs: &[Location], li: usize) -> bool {
    let loc = &locs[li];
    let other = &locs[loc.other];
    let tan1 = table.values(loc.curve).tangent(loc.time);
    let tan2 = table.values(other.curve).tangent(other.time);
    if is_collinear(tan1, tan2) {
        let v1 = table.values(loc.curve);
        let v2 = table.values(other.curve);
        if v1.is_straight() && v2.is_straight() {
            return v1
                .baseline()
                .to_line()
                .intersection(&v2.baseline().to_line())
                .is_none();
        }
        return true;
    }
    false
}
