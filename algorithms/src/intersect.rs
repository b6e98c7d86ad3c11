//! Collecting the intersections between (or within) path items.

use crate::geom::numerical::GEOMETRIC_EPSILON;
use crate::geom::{
    cubic_bezier_intersections_t, cubic_bezier_overlaps_t, cubic_bezier_self_intersection_t,
    CubicBezierSegment,
};
use crate::location::{CurveTable, LocationSet};
use crate::math::Point;
use crate::path::{Path, PathItem};

/// One intersection between two paths, as reported by the public API.
///
/// `path1`/`path2` index the flat sub-path lists of the two operands (they
/// refer to the same operand for self-intersections); `curve` and `time`
/// pin the location on each side.
#[derive(Clone, Debug, PartialEq)]
pub struct PathIntersection {
    pub path1: usize,
    pub curve1: usize,
    pub time1: f64,
    pub path2: usize,
    pub curve2: usize,
    pub time2: f64,
    pub point: Point,
    /// The curves coincide over a range around this location instead of
    /// meeting transversally.
    pub overlap: bool,
    /// The paths genuinely cross into each other's side here.
    pub crossing: bool,
}

// Collect the intersections over a curve table: candidate pairs from the
// bounds sweep, the clipping kernel per pair (with the endpoint seams of
// curves adjacent on their path excluded), overlaps, and per-curve
// self-intersections in self mode.
pub(crate) fn collect(table: &CurveTable, self_mode: bool) -> LocationSet {
    let mut set = LocationSet::default();
    let entries = &table.entries;

    if self_mode {
        for i in 0..entries.len() {
            if let Some((t1, t2)) = cubic_bezier_self_intersection_t(&entries[i].values) {
                set.add_pair(table, i, t1, i, t2, false);
            }
        }
        let values: Vec<CubicBezierSegment> = entries.iter().map(|e| e.values).collect();
        let collisions =
            crate::collision::find_curve_bounds_collisions(&values, None, GEOMETRIC_EPSILON);
        for (i, list) in collisions.iter().enumerate() {
            for &j in list {
                if j > i {
                    add_pair_intersections(&mut set, table, i, j);
                }
            }
        }
    } else {
        let values1: Vec<CubicBezierSegment> = entries[..table.split]
            .iter()
            .map(|e| e.values)
            .collect();
        let values2: Vec<CubicBezierSegment> = entries[table.split..]
            .iter()
            .map(|e| e.values)
            .collect();
        let collisions = crate::collision::find_curve_bounds_collisions(
            &values1,
            Some(&values2),
            GEOMETRIC_EPSILON,
        );
        for (i, list) in collisions.iter().enumerate() {
            for &j in list {
                add_pair_intersections(&mut set, table, i, table.split + j);
            }
        }
    }

    set.classify(table);
    set
}

fn add_pair_intersections(set: &mut LocationSet, table: &CurveTable, i: usize, j: usize) {
    let e1 = &table.entries[i];
    let e2 = &table.entries[j];
    if let Some(pairs) = cubic_bezier_overlaps_t(&e1.values, &e2.values) {
        for &(t1, t2) in pairs.iter() {
            set.add_pair(table, i, t1, j, t2, true);
        }
    } else {
        let exclude_start = e1.prev == j;
        let exclude_end = e1.next == j && i != j;
        for (t1, t2) in
            cubic_bezier_intersections_t(&e1.values, &e2.values, exclude_start, exclude_end)
        {
            set.add_pair(table, i, t1, j, t2, false);
        }
    }
}

fn report(table: &CurveTable, set: &LocationSet, operand_paths: usize) -> Vec<PathIntersection> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < set.locs.len() {
        let mut a = &set.locs[i];
        let mut b = &set.locs[a.other];
        // Report from the first operand's perspective.
        if table.entries[a.curve].operand == 1 && table.entries[b.curve].operand == 0 {
            std::mem::swap(&mut a, &mut b);
        }
        let ea = &table.entries[a.curve];
        let eb = &table.entries[b.curve];
        out.push(PathIntersection {
            path1: ea.path,
            curve1: ea.index,
            time1: a.time,
            path2: if eb.operand == 1 {
                eb.path - operand_paths
            } else {
                eb.path
            },
            curve2: eb.index,
            time2: b.time,
            point: a.point,
            overlap: a.overlap,
            crossing: a.crossing || b.crossing,
        });
        i += 2;
    }
    out.sort_by(|x, y| {
        (x.path1, x.curve1)
            .cmp(&(y.path1, y.curve1))
            .then(x.time1.partial_cmp(&y.time1).unwrap())
    });
    out
}

/// All intersections between two path items.
pub fn path_intersections(a: &PathItem, b: &PathItem) -> Vec<PathIntersection> {
    let e = GEOMETRIC_EPSILON;
    let ba = a.bounds().inflate(e, e);
    if !ba.intersects(&b.bounds().inflate(e, e)) {
        return Vec::new();
    }
    let paths1 = a.child_paths();
    let paths2 = b.child_paths();
    let operand_paths = paths1.len();
    let flat: Vec<(&Path, u8)> = paths1
        .iter()
        .map(|p| (*p, 0u8))
        .chain(paths2.iter().map(|p| (*p, 1u8)))
        .collect();
    let table = CurveTable::build(&flat);
    let set = collect(&table, false);
    report(&table, &set, operand_paths)
}

/// All self-intersections of a path item, including crossings between its
/// sub-paths. Meeting points of adjacent curves are not intersections.
pub fn self_intersections(a: &PathItem) -> Vec<PathIntersection> {
    let paths = a.child_paths();
    let flat: Vec<(&Path, u8)> = paths.iter().map(|p| (*p, 0u8)).collect();
    let table = CurveTable::build(&flat);
    let set = collect(&table, true);
    report(&table, &set, paths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, rect};

    #[test]
    fn rectangle_edge_crossings() {
        let a = PathItem::Path(Path::rectangle(rect(0.0, 0.0, 100.0, 100.0)));
        let b = PathItem::Path(Path::rectangle(rect(50.0, 50.0, 100.0, 100.0)));
        let crossings = path_intersections(&a, &b);
        assert_eq!(crossings.len(), 2);
        for c in &crossings {
            assert!(c.crossing, "{:?}", c);
            assert!(!c.overlap);
        }
        let mut points: Vec<_> = crossings.iter().map(|c| c.point).collect();
        points.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap());
        assert!((points[0] - point(50.0, 100.0)).length() < 1e-9);
        assert!((points[1] - point(100.0, 50.0)).length() < 1e-9);
    }

    #[test]
    fn circle_and_square_scenario() {
        // A circle centered at (110, 110) with radius 80 against the
        // square spanning (110, 110) to (210, 210).
        let circle = PathItem::Path(Path::circle(point(110.0, 110.0), 80.0));
        let square = PathItem::Path(Path::rectangle(rect(110.0, 110.0, 100.0, 100.0)));
        let crossings = path_intersections(&circle, &square);
        assert_eq!(crossings.len(), 2);
        let mut points: Vec<_> = crossings.iter().map(|c| c.point).collect();
        points.sort_by(|p, q| p.x.partial_cmp(&q.x).unwrap());
        assert!((points[0] - point(110.0, 190.0)).length() < 1.0, "{:?}", points);
        assert!((points[1] - point(190.0, 110.0)).length() < 1.0, "{:?}", points);
    }

    #[test]
    fn disjoint_items_have_no_intersections() {
        let a = PathItem::Path(Path::rectangle(rect(0.0, 0.0, 100.0, 100.0)));
        let b = PathItem::Path(Path::rectangle(rect(200.0, 200.0, 100.0, 100.0)));
        assert!(path_intersections(&a, &b).is_empty());
    }

    #[test]
    fn adjacent_curve_seams_are_not_self_intersections() {
        let item = PathItem::Path(Path::rectangle(rect(0.0, 0.0, 100.0, 100.0)));
        assert!(self_intersections(&item).is_empty());
        let circle = PathItem::Path(Path::circle(point(0.0, 0.0), 50.0));
        assert!(self_intersections(&circle).is_empty());
    }

    #[test]
    fn bowtie_self_crossing() {
        use crate::path::Segment;
        let bowtie = Path::with_segments(
            vec![
                Segment::new(point(0.0, 0.0)),
                Segment::new(point(100.0, 100.0)),
                Segment::new(point(0.0, 100.0)),
                Segment::new(point(100.0, 0.0)),
            ],
            true,
        );
        let crossings = self_intersections(&PathItem::Path(bowtie));
        assert_eq!(crossings.len(), 1);
        assert!((crossings[0].point - point(50.0, 50.0)).length() < 1e-9);
        assert!(crossings[0].crossing);
    }

    #[test]
    fn overlapping_edges_are_flagged() {
        let a = PathItem::Path(Path::rectangle(rect(0.0, 0.0, 100.0, 100.0)));
        let b = PathItem::Path(Path::rectangle(rect(0.0, 50.0, 100.0, 100.0)));
        let found = path_intersections(&a, &b);
        assert!(found.iter().any(|c| c.overlap), "{:?}", found);
    }

    #[test]
    fn touching_circles_meet_without_crossing() {
        let a = PathItem::Path(Path::circle(point(0.0, 0.0), 50.0));
        let b = PathItem::Path(Path::circle(point(100.0, 0.0), 50.0));
        let found = path_intersections(&a, &b);
        for c in &found {
            assert!(!c.crossing, "touching circles must not cross: {:?}", c);
        }
    }
}
