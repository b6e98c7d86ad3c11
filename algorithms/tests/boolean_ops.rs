//! End to end checks of the boolean operations.

use vellum_algorithms::geom::CubicBezierSegment;
use vellum_algorithms::math::{point, rect, vector, Angle, Transform};
use vellum_algorithms::path::{CompoundPath, FillRule, Path, PathItem, Segment};
use vellum_algorithms::{
    divide, exclude, intersect, path_intersections, resolve_crossings, subtract, unite,
    BooleanOptions,
};

fn rect_item(x: f64, y: f64, w: f64, h: f64) -> PathItem {
    PathItem::Path(Path::rectangle(rect(x, y, w, h)))
}

fn options() -> BooleanOptions {
    BooleanOptions::default()
}

fn child_count(item: &PathItem) -> usize {
    match item {
        PathItem::Path(p) => {
            if p.is_empty() {
                0
            } else {
                1
            }
        }
        PathItem::Compound(c) => c.children().len(),
    }
}

// The unsigned area covered by the sub-paths; orientation-independent
// (exclusion traces its two pieces with opposite windings).
fn coverage(item: &PathItem) -> f64 {
    item.child_paths().iter().map(|p| p.area().abs()).sum()
}

#[test]
fn matrix_composition_property() {
    // (M · N) · p == M · (N · p), and the S1 fixture: translating by
    // (10, 20) after scaling by (2, 3) maps (1, 1) to (12, 23).
    let m = Transform::scale(2.0, 3.0).then_translate(vector(10.0, 20.0));
    let p = m.transform_point(point(1.0, 1.0));
    assert!((p - point(12.0, 23.0)).length() < 1e-12);

    let n = Transform::rotation(Angle::radians(0.7)).then_translate(vector(-3.0, 5.0));
    let composed = n.then(&m);
    for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (-4.5, 12.25)] {
        let q = point(x, y);
        let lhs = composed.transform_point(q);
        let rhs = m.transform_point(n.transform_point(q));
        assert!((lhs - rhs).length() < 1e-10);
    }
}

#[test]
fn matrix_inversion_property() {
    let m = Transform::scale(2.0, 3.0)
        .then_rotate(Angle::radians(1.1))
        .then_translate(vector(10.0, 20.0));
    let inv = m.inverse().unwrap();
    for &(x, y) in &[(0.0, 0.0), (17.0, -3.0), (1e3, 1e3)] {
        let p = point(x, y);
        let q = inv.transform_point(m.transform_point(p));
        assert!((q - p).length() < 1e-9);
    }
    assert!(Transform::scale(0.0, 1.0).inverse().is_none());
}

#[test]
fn nested_rectangles_intersect_is_the_inner() {
    // S2: the inner rectangle is returned whole.
    let a = rect_item(0.0, 0.0, 200.0, 200.0);
    let b = rect_item(50.0, 50.0, 100.0, 100.0);
    let result = intersect(&a, &b, &options());
    assert_eq!(child_count(&result), 1);
    assert!((result.area() - 10000.0).abs() < 1e-6);
    let bounds = result.bounds();
    assert!((bounds.min_x() - 50.0).abs() < 1e-9);
    assert!((bounds.min_y() - 50.0).abs() < 1e-9);
    assert!((bounds.size.width - 100.0).abs() < 1e-9);
    assert!((bounds.size.height - 100.0).abs() < 1e-9);
}

#[test]
fn disjoint_rectangles() {
    // S3: union keeps both, intersection is empty.
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let b = rect_item(200.0, 200.0, 100.0, 100.0);
    let union = unite(&a, &b, &options());
    assert_eq!(child_count(&union), 2);
    assert!((union.area() - 20000.0).abs() < 1e-6);
    let inter = intersect(&a, &b, &options());
    assert!(inter.is_empty());
}

#[test]
fn nested_rectangles_subtract_leaves_a_ring() {
    // S4: subtracting the inner rectangle punches a hole.
    let a = rect_item(0.0, 0.0, 200.0, 200.0);
    let b = rect_item(50.0, 50.0, 100.0, 100.0);
    let ring = subtract(&a, &b, &options());
    assert_eq!(child_count(&ring), 2);
    assert!((ring.area() - 30000.0).abs() < 1e-6);
    assert!(ring.contains(point(25.0, 25.0), FillRule::EvenOdd));
    assert!(ring.contains(point(25.0, 25.0), FillRule::NonZero));
    assert!(!ring.contains(point(100.0, 100.0), FillRule::EvenOdd));
    assert!(!ring.contains(point(100.0, 100.0), FillRule::NonZero));
}

#[test]
fn overlapping_rectangles_all_operations() {
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let b = rect_item(50.0, 50.0, 100.0, 100.0);

    let union = unite(&a, &b, &options());
    assert_eq!(child_count(&union), 1);
    assert!((union.area() - 17500.0).abs() < 1e-6, "{}", union.area());

    let inter = intersect(&a, &b, &options());
    assert_eq!(child_count(&inter), 1);
    assert!((inter.area() - 2500.0).abs() < 1e-6, "{}", inter.area());
    let bounds = inter.bounds();
    assert!((bounds.min_x() - 50.0).abs() < 1e-9);
    assert!((bounds.max_x() - 100.0).abs() < 1e-9);

    let diff = subtract(&a, &b, &options());
    assert!((diff.area() - 7500.0).abs() < 1e-6, "{}", diff.area());
    assert!(diff.contains(point(25.0, 25.0), FillRule::NonZero));
    assert!(!diff.contains(point(75.0, 75.0), FillRule::NonZero));

    let sym = exclude(&a, &b, &options());
    assert!((coverage(&sym) - 15000.0).abs() < 1e-6, "{}", coverage(&sym));
    assert!(sym.contains(point(25.0, 25.0), FillRule::NonZero));
    assert!(sym.contains(point(125.0, 125.0), FillRule::NonZero));
    assert!(!sym.contains(point(75.0, 75.0), FillRule::NonZero));

    let pieces = divide(&a, &b, &options());
    assert!((pieces.area() - 10000.0).abs() < 1e-6, "{}", pieces.area());
    assert!(child_count(&pieces) >= 2);
}

#[test]
fn edge_sharing_rectangles_unite_into_one() {
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let b = rect_item(100.0, 0.0, 100.0, 100.0);
    let union = unite(&a, &b, &options());
    assert_eq!(child_count(&union), 1);
    assert!((union.area() - 20000.0).abs() < 1e-6, "{}", union.area());
    let bounds = union.bounds();
    assert!((bounds.max_x() - 200.0).abs() < 1e-9);
}

#[test]
fn bowtie_resolves_into_two_triangles() {
    // S5: the self-crossing quadrilateral splits at (50, 50).
    let bowtie = Path::with_segments(
        vec![
            Segment::new(point(0.0, 0.0)),
            Segment::new(point(100.0, 100.0)),
            Segment::new(point(0.0, 100.0)),
            Segment::new(point(100.0, 0.0)),
        ],
        true,
    );
    let resolved = resolve_crossings(&PathItem::Path(bowtie));
    let children = resolved.child_paths();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(child.segment_count(), 3);
        assert!(child.is_closed());
        assert!((child.area().abs() - 2500.0).abs() < 1e-6);
        assert!(child
            .segments()
            .iter()
            .any(|s| (s.point - point(50.0, 50.0)).length() < 1e-9));
    }
}

#[test]
fn resolve_crossings_leaves_simple_paths_alone() {
    let simple = PathItem::Path(Path::circle(point(0.0, 0.0), 10.0));
    let resolved = resolve_crossings(&simple);
    assert_eq!(resolved, simple);
}

#[test]
fn circle_and_square() {
    // S8: the circle centered on the square's corner.
    let circle = PathItem::Path(Path::circle(point(110.0, 110.0), 80.0));
    let square = rect_item(110.0, 110.0, 100.0, 100.0);
    let inter = intersect(&circle, &square, &options());
    // A quarter disc (the square covers one quadrant of the circle).
    let quarter = std::f64::consts::PI * 80.0 * 80.0 / 4.0;
    assert!(
        (inter.area() - quarter).abs() / quarter < 1e-2,
        "{} vs {}",
        inter.area(),
        quarter
    );
    let union = unite(&circle, &square, &options());
    let expected = std::f64::consts::PI * 80.0 * 80.0 * 0.75 + 10000.0;
    assert!((union.area() - expected).abs() / expected < 1e-2);
}

#[test]
fn two_cubics_cross_twice() {
    // Two arching curves crossing in two points; the reported locations
    // agree on both curves within 1e-5.
    let c1 = CubicBezierSegment {
        from: point(0.0, 0.0),
        ctrl1: point(50.0, 100.0),
        ctrl2: point(50.0, 100.0),
        to: point(100.0, 0.0),
    };
    let c2 = CubicBezierSegment {
        from: point(0.0, 100.0),
        ctrl1: point(50.0, 0.0),
        ctrl2: point(50.0, 0.0),
        to: point(100.0, 100.0),
    };
    let mut p1 = Path::new();
    p1.move_to(c1.from).unwrap();
    p1.cubic_curve_to(c1.ctrl1, c1.ctrl2, c1.to).unwrap();
    let mut p2 = Path::new();
    p2.move_to(c2.from).unwrap();
    p2.cubic_curve_to(c2.ctrl1, c2.ctrl2, c2.to).unwrap();

    let found = path_intersections(&PathItem::Path(p1), &PathItem::Path(p2));
    assert_eq!(found.len(), 2);
    for hit in &found {
        assert!(hit.crossing);
        let on1 = c1.sample(hit.time1);
        let on2 = c2.sample(hit.time2);
        assert!((on1 - on2).length() < 1e-5);
        assert!((on1 - hit.point).length() < 1e-5);
    }
}

#[test]
fn boolean_idempotence() {
    let a = rect_item(10.0, 10.0, 80.0, 60.0);
    let union = unite(&a, &a, &options());
    assert!((union.area() - a.area()).abs() < 1e-6, "{}", union.area());
    let inter = intersect(&a, &a, &options());
    assert!((inter.area() - a.area()).abs() < 1e-6, "{}", inter.area());
    let diff = subtract(&a, &a, &options());
    assert!(diff.is_empty() || diff.area().abs() < 1e-6);
    let sym = exclude(&a, &a, &options());
    assert!(sym.is_empty() || sym.area().abs() < 1e-6);
}

#[test]
fn boolean_symmetry() {
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let b = PathItem::Path(Path::circle(point(100.0, 50.0), 40.0));
    let ops: [fn(&PathItem, &PathItem, &BooleanOptions) -> PathItem; 3] =
        [unite, intersect, exclude];
    for op in &ops {
        let ab = op(&a, &b, &options());
        let ba = op(&b, &a, &options());
        assert!(
            (coverage(&ab) - coverage(&ba)).abs() < 1e-6,
            "{} vs {}",
            coverage(&ab),
            coverage(&ba)
        );
    }
}

#[test]
fn de_morgan_identity() {
    // exclude(A, B) == subtract(unite(A, B), intersect(A, B))
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let b = rect_item(50.0, 50.0, 100.0, 100.0);
    let lhs = exclude(&a, &b, &options());
    let rhs = subtract(
        &unite(&a, &b, &options()),
        &intersect(&a, &b, &options()),
        &options(),
    );
    assert!(
        (coverage(&lhs) - coverage(&rhs)).abs() < 1e-6,
        "{} vs {}",
        coverage(&lhs),
        coverage(&rhs)
    );
}

#[test]
fn area_monotonicity() {
    let a = PathItem::Path(Path::circle(point(50.0, 50.0), 50.0));
    let b = rect_item(40.0, 0.0, 120.0, 90.0);
    let inter = intersect(&a, &b, &options()).area().abs();
    let union = unite(&a, &b, &options()).area().abs();
    let min = a.area().abs().min(b.area().abs());
    let max = a.area().abs().max(b.area().abs());
    assert!(inter <= min + 1e-6);
    assert!(max <= union + 1e-6);
}

#[test]
fn fill_rules_change_what_counts_as_inside() {
    // Two same-oriented nested rectangles: under even-odd the inner one
    // is a hole, under non-zero it is redundant.
    let nested = PathItem::Compound(CompoundPath::with_children(vec![
        Path::rectangle(rect(0.0, 0.0, 200.0, 200.0)),
        Path::rectangle(rect(50.0, 50.0, 100.0, 100.0)),
    ]));
    let far = rect_item(300.0, 0.0, 50.0, 50.0);

    let even_odd = unite(
        &nested,
        &far,
        &BooleanOptions {
            fill_rule1: FillRule::EvenOdd,
            fill_rule2: FillRule::NonZero,
        },
    );
    assert!((even_odd.area() - 32500.0).abs() < 1e-6, "{}", even_odd.area());

    let non_zero = unite(&nested, &far, &options());
    assert!((non_zero.area() - 42500.0).abs() < 1e-6, "{}", non_zero.area());
}

#[test]
fn open_paths_are_closed_before_tracing() {
    // An open L-shaped path is closed with a straight seam first.
    let mut open = Path::new();
    open.move_to(point(0.0, 0.0)).unwrap();
    open.line_to(point(100.0, 0.0)).unwrap();
    open.line_to(point(100.0, 100.0)).unwrap();
    open.line_to(point(0.0, 100.0)).unwrap();
    let a = PathItem::Path(open);
    let b = rect_item(50.0, 50.0, 100.0, 100.0);
    let union = unite(&a, &b, &options());
    assert!((union.area() - 17500.0).abs() < 1e-6, "{}", union.area());
}

#[test]
fn empty_operands() {
    let a = rect_item(0.0, 0.0, 100.0, 100.0);
    let empty = PathItem::Path(Path::new());
    let union = unite(&a, &empty, &options());
    assert!((union.area() - 10000.0).abs() < 1e-6);
    let inter = intersect(&a, &empty, &options());
    assert!(inter.is_empty());
    let diff = subtract(&empty, &a, &options());
    assert!(diff.is_empty());
}

#[test]
fn curved_operands_unite() {
    let a = PathItem::Path(Path::circle(point(0.0, 0.0), 50.0));
    let b = PathItem::Path(Path::circle(point(60.0, 0.0), 50.0));
    let union = unite(&a, &b, &options());
    assert_eq!(child_count(&union), 1);
    let area_circle = std::f64::consts::PI * 2500.0;
    // Union of two overlapping discs: 2A - lens; the lens of two r=50
    // circles at distance 60 has area 2r²·acos(d/2r) - d/2·sqrt(4r²-d²).
    let lens = 2.0 * 2500.0 * (0.6f64).acos() - 30.0 * (10000.0f64 - 3600.0).sqrt();
    let expected = 2.0 * area_circle - lens;
    assert!(
        (union.area() - expected).abs() / expected < 1e-2,
        "{} vs {}",
        union.area(),
        expected
    );
    let inter = intersect(&a, &b, &options());
    assert!((inter.area() - lens).abs() / lens < 2e-2, "{} vs {}", inter.area(), lens);
}
