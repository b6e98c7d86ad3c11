use crate::geom::CubicBezierSegment;
use crate::math::{Point, Rect, Transform};
use crate::path::Path;
use crate::winding::{winding_at, Winding};
use crate::FillRule;

/// An ordered list of paths that fill as one shape (outer outlines and
/// holes under a fill rule).
///
/// Child order is preserved by every operation that does not explicitly
/// re-sort.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundPath {
    children: Vec<Path>,
}

impl CompoundPath {
    pub fn new() -> Self {
        CompoundPath::default()
    }

    pub fn with_children(children: Vec<Path>) -> Self {
        CompoundPath { children }
    }

    #[inline]
    pub fn children(&self) -> &[Path] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Path> {
        &mut self.children
    }

    pub fn push(&mut self, child: Path) {
        self.children.push(child);
    }

    /// Remove all children and return them.
    pub fn remove_children(&mut self) -> Vec<Path> {
        std::mem::take(&mut self.children)
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|c| c.is_empty())
    }

    /// The aggregate signed area: the sum of the children's areas.
    pub fn area(&self) -> f64 {
        self.children.iter().map(|c| c.area()).sum()
    }

    pub fn length(&self) -> f64 {
        self.children.iter().map(|c| c.length()).sum()
    }

    /// The union of the children's bounds.
    pub fn bounds(&self) -> Rect {
        let mut bounds: Option<Rect> = None;
        for child in &self.children {
            if child.is_empty() {
                continue;
            }
            let b = child.bounds();
            bounds = Some(match bounds {
                Some(u) => u.union(&b),
                None => b,
            });
        }
        bounds.unwrap_or_else(Rect::zero)
    }

    /// The orientation of the first child.
    pub fn is_clockwise(&self) -> bool {
        self.children.first().map_or(true, |c| c.is_clockwise())
    }

    pub fn reverse(&mut self) {
        for child in &mut self.children {
            child.reverse();
        }
    }

    pub fn transform(&mut self, matrix: &Transform) {
        for child in &mut self.children {
            child.transform(matrix);
        }
    }

    pub fn collect_curve_values(&self) -> Vec<CubicBezierSegment> {
        let mut values = Vec::new();
        for child in &self.children {
            values.extend(child.collect_curve_values());
        }
        values
    }

    pub fn winding_at(&self, p: Point, vertical: bool) -> Winding {
        winding_at(p, &self.collect_curve_values(), vertical)
    }

    /// Whether the compound contains `p`: the fill rule is applied to the
    /// winding accumulated over all children, so holes subtract.
    pub fn contains(&self, p: Point, rule: FillRule) -> bool {
        if self.children.iter().any(|c| c.is_on_path(p)) {
            return false;
        }
        self.winding_at(p, false).is_inside(rule)
    }

    /// Drop empty children and collapse to the simplest equivalent item.
    pub fn reduce(mut self) -> PathItem {
        self.children.retain(|c| !c.is_empty());
        match self.children.len() {
            0 => PathItem::Path(Path::new()),
            1 => PathItem::Path(self.children.pop().unwrap()),
            _ => PathItem::Compound(self),
        }
    }
}

/// Either a single path or a compound path; the operand and result type of
/// the boolean operations.
#[derive(Clone, Debug, PartialEq)]
pub enum PathItem {
    Path(Path),
    Compound(CompoundPath),
}

impl PathItem {
    pub fn is_empty(&self) -> bool {
        match self {
            PathItem::Path(p) => p.is_empty(),
            PathItem::Compound(c) => c.is_empty(),
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            PathItem::Path(p) => p.area(),
            PathItem::Compound(c) => c.area(),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            PathItem::Path(p) => p.length(),
            PathItem::Compound(c) => c.length(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            PathItem::Path(p) => p.bounds(),
            PathItem::Compound(c) => c.bounds(),
        }
    }

    pub fn is_clockwise(&self) -> bool {
        match self {
            PathItem::Path(p) => p.is_clockwise(),
            PathItem::Compound(c) => c.is_clockwise(),
        }
    }

    pub fn reverse(&mut self) {
        match self {
            PathItem::Path(p) => p.reverse(),
            PathItem::Compound(c) => c.reverse(),
        }
    }

    pub fn transform(&mut self, matrix: &Transform) {
        match self {
            PathItem::Path(p) => p.transform(matrix),
            PathItem::Compound(c) => c.transform(matrix),
        }
    }

    pub fn contains(&self, p: Point, rule: FillRule) -> bool {
        match self {
            PathItem::Path(path) => path.contains(p, rule),
            PathItem::Compound(c) => c.contains(p, rule),
        }
    }

    pub fn collect_curve_values(&self) -> Vec<CubicBezierSegment> {
        match self {
            PathItem::Path(p) => p.collect_curve_values(),
            PathItem::Compound(c) => c.collect_curve_values(),
        }
    }

    /// The flat list of sub-paths.
    pub fn child_paths(&self) -> Vec<&Path> {
        match self {
            PathItem::Path(p) => vec![p],
            PathItem::Compound(c) => c.children().iter().collect(),
        }
    }

    pub fn into_paths(self) -> Vec<Path> {
        match self {
            PathItem::Path(p) => vec![p],
            PathItem::Compound(mut c) => std::mem::take(c.children_mut()),
        }
    }

    /// Collapse single-child compounds and drop empty children.
    pub fn reduce(self) -> PathItem {
        match self {
            PathItem::Path(p) => PathItem::Path(p),
            PathItem::Compound(c) => c.reduce(),
        }
    }
}

impl From<Path> for PathItem {
    fn from(p: Path) -> Self {
        PathItem::Path(p)
    }
}

impl From<CompoundPath> for PathItem {
    fn from(c: CompoundPath) -> Self {
        PathItem::Compound(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, rect};

    #[test]
    fn ring_contains_under_even_odd() {
        let outer = Path::rectangle(rect(0.0, 0.0, 200.0, 200.0));
        let mut hole = Path::rectangle(rect(50.0, 50.0, 100.0, 100.0));
        hole.reverse();
        let ring = CompoundPath::with_children(vec![outer, hole]);
        assert!(ring.contains(point(25.0, 25.0), FillRule::EvenOdd));
        assert!(!ring.contains(point(100.0, 100.0), FillRule::EvenOdd));
        assert!(!ring.contains(point(100.0, 100.0), FillRule::NonZero));
        assert!((ring.area() - (40000.0 - 10000.0)).abs() < 1e-9);
    }

    #[test]
    fn reduce_collapses_single_child() {
        let mut c = CompoundPath::new();
        c.push(Path::new());
        c.push(Path::rectangle(rect(0.0, 0.0, 10.0, 10.0)));
        match c.reduce() {
            PathItem::Path(p) => assert_eq!(p.segment_count(), 4),
            PathItem::Compound(_) => panic!("expected a single path"),
        }
    }

    #[test]
    fn compound_bounds_union() {
        let c = CompoundPath::with_children(vec![
            Path::rectangle(rect(0.0, 0.0, 10.0, 10.0)),
            Path::rectangle(rect(20.0, 20.0, 10.0, 10.0)),
        ]);
        let b = c.bounds();
        assert_eq!(b.min_x(), 0.0);
        assert_eq!(b.max_x(), 30.0);
    }
}
