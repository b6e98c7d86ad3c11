//! Boolean operations between two path items, and self-crossing
//! resolution.
//!
//! The pipeline: both operands are cloned, closed and resolved to
//! non-self-intersecting outlines, then divided at their mutual crossings;
//! each resulting segment chain gets a winding contribution, and the
//! result contour is traced along the segments the operator keeps. When
//! the operands do not cross at all, re-orienting the sub-paths under the
//! operator's winding predicate answers directly.

use crate::collision::find_item_bounds_collisions;
use crate::divide::divide_locations;
use crate::geom::numerical::{EPSILON, GEOMETRIC_EPSILON};
use crate::geom::CubicBezierSegment;
use crate::graph::{Graph, NodeId};
use crate::intersect::collect;
use crate::location::{CurveTable, Location};
use crate::math::{Rect, Vector};
use crate::path::{CompoundPath, FillRule, Path, PathItem};
use crate::propagate::{propagate_winding, Operator, WindingContext};
use crate::trace::trace_paths;

pub use crate::propagate::BooleanOpKind;

/// Options of the boolean operations; the fill rules of both operands are
/// explicit and never inferred from the inputs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BooleanOptions {
    pub fill_rule1: FillRule,
    pub fill_rule2: FillRule,
}

/// The union of the areas of `a` and `b`.
pub fn unite(a: &PathItem, b: &PathItem, options: &BooleanOptions) -> PathItem {
    trace_boolean(a, b, BooleanOpKind::Unite, options)
}

/// The area common to both `a` and `b`.
pub fn intersect(a: &PathItem, b: &PathItem, options: &BooleanOptions) -> PathItem {
    trace_boolean(a, b, BooleanOpKind::Intersect, options)
}

/// The area of `a` not covered by `b`.
pub fn subtract(a: &PathItem, b: &PathItem, options: &BooleanOptions) -> PathItem {
    trace_boolean(a, b, BooleanOpKind::Subtract, options)
}

/// The area covered by exactly one of `a` and `b`.
pub fn exclude(a: &PathItem, b: &PathItem, options: &BooleanOptions) -> PathItem {
    trace_boolean(a, b, BooleanOpKind::Exclude, options)
}

/// Split `a` along `b`: the pieces of `subtract` and `intersect` combined
/// into one compound result.
pub fn divide(a: &PathItem, b: &PathItem, options: &BooleanOptions) -> PathItem {
    let mut paths = subtract(a, b, options).into_paths();
    paths.extend(intersect(a, b, options).into_paths());
    create_result(paths)
}

/// Re-assign orientations to an item's sub-paths so that outer outlines
/// and holes are consistent under the fill rule, dropping sub-paths that
/// do not change coverage; `clockwise` forces the orientation of the
/// outermost paths (default: keep the largest sub-path's orientation).
///
/// The sub-paths are expected not to intersect each other; resolve
/// crossings first otherwise.
pub fn reorient(item: &PathItem, rule: FillRule, clockwise: Option<bool>) -> PathItem {
    match item.clone() {
        PathItem::Path(mut p) => {
            if let Some(cw) = clockwise {
                p.set_clockwise(cw);
            }
            PathItem::Path(p)
        }
        PathItem::Compound(mut c) => {
            let children = c.remove_children();
            let is_inside = move |w: i64| rule.is_inside(w as i32);
            let kept = reorient_paths(children, &is_inside, clockwise);
            PathItem::Compound(CompoundPath::with_children(kept)).reduce()
        }
    }
}

/// Resolve the self-crossings of an item: divide it at its own crossings,
/// remove overlapped doubled runs and re-knit the segments into
/// non-self-intersecting outlines.
pub fn resolve_crossings(item: &PathItem) -> PathItem {
    let paths: Vec<Path> = item.clone().into_paths();
    let flat: Vec<(&Path, u8)> = paths.iter().map(|p| (p, 0u8)).collect();
    let table = CurveTable::build(&flat);
    let mut set = collect(&table, true);

    let has_overlaps = set.locs.iter().any(|l| l.overlap);
    let has_crossings = set.locs.iter().any(|l| !l.overlap && l.crossing);
    if !has_overlaps && !has_crossings {
        return item.clone();
    }

    let expanded = set.expand(|l| l.overlap || l.crossing);
    let mut graph = Graph::from_paths(&flat);
    bind_location_nodes(&graph, &table, &mut set.locs);
    let mut locs = set.locs;

    if has_overlaps {
        // Divide at the overlap boundaries first, then drop the doubled
        // interior runs, straightening the seams left behind.
        let overlap_filter: &dyn Fn(&Graph, &[Location], usize) -> bool = &|_, l, i| l[i].overlap;
        let overlaps = divide_locations(&mut graph, &mut locs, &expanded, Some(overlap_filter));
        for &oi in overlaps.iter().rev() {
            let seg = match locs[oi].segment {
                Some(s) => s,
                None => continue,
            };
            if graph.nodes[seg].removed {
                continue;
            }
            let ring = graph.nodes[seg].ring;
            let prev = graph.prev(seg);
            let next = graph.next(seg);
            let overlap_on_ring = |g: &Graph, l: &[Location], n: Option<NodeId>| -> bool {
                n.and_then(|n| g.nodes[n].inter).map_or(false, |ix| {
                    l[ix].overlap && {
                        let owner = l[ix].segment.unwrap_or(l[ix].cnode);
                        g.nodes[owner].ring == ring
                    }
                })
            };
            if overlap_on_ring(&graph, &locs, prev) && overlap_on_ring(&graph, &locs, next) {
                let prev = prev.unwrap();
                let next = next.unwrap();
                graph.remove(seg);
                graph.nodes[prev].handle_out = Vector::zero();
                graph.nodes[next].handle_in = Vector::zero();
                if prev != seg {
                    // Collapse the curve left behind when it has no length.
                    let degenerate = graph
                        .curve_values(prev)
                        .map_or(false, |v| (v.to - v.from).length() <= EPSILON);
                    if degenerate {
                        graph.nodes[next].handle_in = graph.nodes[prev].handle_in;
                        graph.remove(prev);
                    }
                }
            }
        }
    }

    if has_crossings {
        // Divide the remaining crossings; when overlaps were removed,
        // only locations whose both curves are still alive take part.
        let alive = |g: &Graph, l: &[Location], i: usize| {
            !g.nodes[l[i].cnode].removed && !g.nodes[l[l[i].other].cnode].removed
        };
        let filter: Option<&dyn Fn(&Graph, &[Location], usize) -> bool> = if has_overlaps {
            Some(&alive)
        } else {
            None
        };
        divide_locations(&mut graph, &mut locs, &expanded, filter);
        let traced = trace_paths(&mut graph, &locs, None);
        create_result(traced)
    } else {
        let rebuilt: Vec<Path> = (0..graph.rings.len())
            .map(|r| graph.ring_to_path(r))
            .collect();
        create_result(rebuilt)
    }
}

/// Extension methods running the boolean operations with default options.
pub trait BooleanOps {
    fn to_path_item(&self) -> PathItem;

    fn unite(&self, other: &dyn BooleanOps) -> PathItem {
        unite(&self.to_path_item(), &other.to_path_item(), &Default::default())
    }
    fn intersect(&self, other: &dyn BooleanOps) -> PathItem {
        intersect(&self.to_path_item(), &other.to_path_item(), &Default::default())
    }
    fn subtract(&self, other: &dyn BooleanOps) -> PathItem {
        subtract(&self.to_path_item(), &other.to_path_item(), &Default::default())
    }
    fn exclude(&self, other: &dyn BooleanOps) -> PathItem {
        exclude(&self.to_path_item(), &other.to_path_item(), &Default::default())
    }
    fn divide(&self, other: &dyn BooleanOps) -> PathItem {
        divide(&self.to_path_item(), &other.to_path_item(), &Default::default())
    }
    fn resolve_crossings(&self) -> PathItem {
        resolve_crossings(&self.to_path_item())
    }
}

impl BooleanOps for Path {
    fn to_path_item(&self) -> PathItem {
        PathItem::Path(self.clone())
    }
}

impl BooleanOps for CompoundPath {
    fn to_path_item(&self) -> PathItem {
        PathItem::Compound(self.clone())
    }
}

impl BooleanOps for PathItem {
    fn to_path_item(&self) -> PathItem {
        self.clone()
    }
}

fn trace_boolean(
    a: &PathItem,
    b: &PathItem,
    kind: BooleanOpKind,
    options: &BooleanOptions,
) -> PathItem {
    let operator = Operator { kind };
    let item1 = prepare_path(a, options.fill_rule1);
    let mut item2 = prepare_path(b, options.fill_rule2);

    // Subtraction and exclusion expect the operands wound against each
    // other, union and intersection alike.
    let se = matches!(kind, BooleanOpKind::Subtract | BooleanOpKind::Exclude);
    if !item2.is_empty() && se == (item1.is_clockwise() == item2.is_clockwise()) {
        item2.reverse();
    }

    let paths1: Vec<Path> = item1.into_paths();
    let paths2: Vec<Path> = item2.into_paths();
    let flat: Vec<(&Path, u8)> = paths1
        .iter()
        .map(|p| (p, 0u8))
        .chain(paths2.iter().map(|p| (p, 1u8)))
        .collect();
    let table = CurveTable::build(&flat);
    let mut set = collect(&table, false);
    let filtered = set.expand(|l| l.overlap || l.crossing);

    if filtered.is_empty() {
        // No crossings: each sub-path is kept or dropped as a whole.
        drop(flat);
        let mut all = paths1;
        all.extend(paths2);
        let kept = reorient_paths(all, &|w| operator.contains_winding(w as i64), None);
        return create_result(kept);
    }

    let mut graph = Graph::from_paths(&flat);
    bind_location_nodes(&graph, &table, &mut set.locs);
    let mut locs = set.locs;
    divide_locations(&mut graph, &mut locs, &filtered, None);

    // Rings made purely of overlap segments get special treatment in the
    // tracer.
    for r in 0..graph.rings.len() {
        let all_overlap = graph.rings[r].nodes.iter().all(|&n| {
            graph.nodes[n]
                .inter
                .map_or(false, |i| locs[i].overlap)
        });
        graph.rings[r].overlaps_only = all_overlap && !graph.rings[r].nodes.is_empty();
    }

    // The divided curves of both operands, their per-axis collision
    // candidates, and the winding context for the propagation.
    let mut values: Vec<CubicBezierSegment> = Vec::new();
    let mut operand_of: Vec<u8> = Vec::new();
    let mut slot_of_node: Vec<Option<usize>> = vec![None; graph.nodes.len()];
    for r in 0..graph.rings.len() {
        for pos in 0..graph.rings[r].curve_count() {
            let node = graph.rings[r].nodes[pos];
            if let Some(v) = graph.curve_values(node) {
                slot_of_node[node] = Some(values.len());
                values.push(v);
                operand_of.push(graph.rings[r].operand);
            }
        }
    }
    let collisions = crate::collision::find_curve_bounds_collisions_both_axes(&values, None, 0.0);
    let mut operand_values: [Vec<CubicBezierSegment>; 2] = [Vec::new(), Vec::new()];
    for (v, &o) in values.iter().zip(&operand_of) {
        operand_values[o as usize].push(*v);
    }
    let ctx = WindingContext {
        values,
        operand_of,
        collisions,
        slot_of_node,
        operand_values,
        two_operands: !paths2.is_empty(),
    };

    for r in 0..graph.rings.len() {
        for pos in 0..graph.rings[r].nodes.len() {
            let node = graph.rings[r].nodes[pos];
            if graph.nodes[node].winding.is_none() {
                propagate_winding(&mut graph, node, &ctx, operator);
            }
        }
    }

    let traced = trace_paths(&mut graph, &locs, Some(operator));
    create_result(traced)
}

// Point the locations at the graph nodes starting their curves.
fn bind_location_nodes(graph: &Graph, table: &CurveTable, locs: &mut [Location]) {
    for loc in locs.iter_mut() {
        let entry = &table.entries[loc.curve];
        loc.cnode = graph.rings[entry.path].nodes[entry.index];
    }
}

fn create_result(paths: Vec<Path>) -> PathItem {
    let mut paths: Vec<Path> = paths.into_iter().filter(|p| !p.is_empty()).collect();
    match paths.len() {
        0 => PathItem::Path(Path::new()),
        1 => PathItem::Path(paths.pop().unwrap()),
        _ => PathItem::Compound(CompoundPath::with_children(paths)),
    }
}

// Clone, drop degenerate curves, close open sub-paths with a straight
// seam, resolve self-crossings and re-orient under the operand's fill
// rule.
fn prepare_path(item: &PathItem, rule: FillRule) -> PathItem {
    let was_single = matches!(item, PathItem::Path(_));
    let mut paths: Vec<Path> = item.clone().into_paths();
    for p in &mut paths {
        p.reduce(true);
    }
    paths.retain(|p| !p.is_empty());
    for p in &mut paths {
        if !p.is_closed() {
            p.close_path(EPSILON);
            let last = p.segment_count() - 1;
            let mut first = p.segments()[0];
            first.handle_in = Vector::zero();
            p.set_segment(0, first);
            let mut end = p.segments()[last];
            end.handle_out = Vector::zero();
            p.set_segment(last, end);
        }
    }
    let item = if was_single && paths.len() == 1 {
        PathItem::Path(paths.pop().unwrap())
    } else {
        PathItem::Compound(CompoundPath::with_children(paths))
    };
    let resolved = resolve_crossings(&item);
    reorient(&resolved, rule, Some(true))
}

// Re-assign orientations to a set of non-intersecting paths so that outer
// outlines and holes are consistent under `is_inside`, dropping sub-paths
// that do not change coverage. Retained paths keep their input order.
fn reorient_paths(
    mut paths: Vec<Path>,
    is_inside: &dyn Fn(i64) -> bool,
    clockwise: Option<bool>,
) -> Vec<Path> {
    let len = paths.len();
    if len == 0 {
        return paths;
    }

    // Process from the largest to the smallest sub-path; containers come
    // first, so each path inherits the winding of its container.
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&x, &y| {
        paths[y]
            .area()
            .abs()
            .partial_cmp(&paths[x].area().abs())
            .unwrap()
    });
    let clockwise = clockwise.unwrap_or_else(|| paths[order[0]].is_clockwise());

    let mut winding: Vec<i64> = paths
        .iter()
        .map(|p| if p.is_clockwise() { 1 } else { -1 })
        .collect();
    let mut container: Vec<Option<usize>> = vec![None; len];
    let mut exclude = vec![false; len];

    let bounds: Vec<Rect> = order.iter().map(|&i| paths[i].bounds()).collect();
    let collisions = find_item_bounds_collisions(&bounds, None, GEOMETRIC_EPSILON);

    for si in 0..len {
        let oi = order[si];
        let mut container_winding = 0;
        let mut interior = None;
        for &sj in collisions[si].iter().rev() {
            if sj >= si {
                continue;
            }
            let point = *interior.get_or_insert_with(|| paths[oi].interior_point());
            let oj = order[sj];
            if paths[oj].contains(point, FillRule::NonZero) {
                container_winding = winding[oj];
                winding[oi] += container_winding;
                container[oi] = if exclude[oj] { container[oj] } else { Some(oj) };
                break;
            }
        }
        if is_inside(winding[oi]) == is_inside(container_winding) {
            exclude[oi] = true;
        } else {
            let cw = match container[oi] {
                Some(c) => !paths[c].is_clockwise(),
                None => clockwise,
            };
            paths[oi].set_clockwise(cw);
        }
    }

    paths
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !exclude[*i])
        .map(|(_, p)| p)
        .collect()
}
