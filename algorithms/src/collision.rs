//! Sweep-line collision detection on axis-aligned bounding boxes.
//!
//! The sweep runs along a primary axis over the boxes sorted by their lower
//! bound; an active set ordered by upper bound is pruned as the sweep
//! advances, and the secondary axis is checked per active pair (unless only
//! the sweep axis is of interest).

use crate::geom::CubicBezierSegment;
use crate::math::Rect;

/// The collision candidates of one curve, separated by axis: `hor` holds
/// the indices whose bounds overlap in x, `ver` those overlapping in y.
#[derive(Clone, Debug, Default)]
pub struct CurveBoundsCollisions {
    pub hor: Vec<usize>,
    pub ver: Vec<usize>,
}

struct Side {
    lo: f64,
    hi: f64,
}

fn sides(bounds: &[Rect], vertical: bool) -> (Vec<Side>, Vec<Side>) {
    let pri = bounds
        .iter()
        .map(|b| {
            if vertical {
                Side {
                    lo: b.min_y(),
                    hi: b.max_y(),
                }
            } else {
                Side {
                    lo: b.min_x(),
                    hi: b.max_x(),
                }
            }
        })
        .collect();
    let sec = bounds
        .iter()
        .map(|b| {
            if vertical {
                Side {
                    lo: b.min_x(),
                    hi: b.max_x(),
                }
            } else {
                Side {
                    lo: b.min_y(),
                    hi: b.max_y(),
                }
            }
        })
        .collect();
    (pri, sec)
}

/// For each box of `bounds1`, the sorted indices of the boxes of `bounds2`
/// (or of `bounds1` itself when `bounds2` is `None`, including the box's
/// own index) whose bounds collide within `tolerance`.
///
/// `sweep_vertical` makes y the primary axis; `only_sweep_axis` skips the
/// secondary-axis check, reporting one-dimensional interval overlaps.
pub fn find_bounds_collisions(
    bounds1: &[Rect],
    bounds2: Option<&[Rect]>,
    tolerance: f64,
    sweep_vertical: bool,
    only_sweep_axis: bool,
) -> Vec<Vec<usize>> {
    let self_mode = bounds2.is_none();
    let length1 = bounds1.len();
    let all_bounds: Vec<Rect> = match bounds2 {
        Some(b2) => bounds1.iter().chain(b2.iter()).cloned().collect(),
        None => bounds1.to_vec(),
    };
    let length_all = all_bounds.len();
    let (pri, sec) = sides(&all_bounds, sweep_vertical);

    let mut order: Vec<usize> = (0..length_all).collect();
    order.sort_by(|&a, &b| pri[a].lo.partial_cmp(&pri[b].lo).unwrap());

    // The active set, ordered by upper primary bound.
    let mut active: Vec<usize> = Vec::new();
    let mut collisions: Vec<Vec<usize>> = vec![Vec::new(); length1];

    for &cur in &order {
        let cur_is_a = cur < length1;
        let cur_is_b = self_mode || cur >= length1;
        let orig = if self_mode { cur } else { cur.wrapping_sub(length1) };

        if !active.is_empty() {
            // Prune entries whose upper bound fell behind the sweep.
            let threshold = pri[cur].lo - tolerance;
            let prune = active.partition_point(|&i| pri[i].hi < threshold);
            active.drain(..prune);

            for &act in &active {
                let act_is_a = act < length1;
                let act_is_b = self_mode || act >= length1;
                if !(cur_is_a && act_is_b || cur_is_b && act_is_a) {
                    continue;
                }
                if !only_sweep_axis
                    && !(sec[cur].hi >= sec[act].lo - tolerance
                        && sec[cur].lo <= sec[act].hi + tolerance)
                {
                    continue;
                }
                if cur_is_a && act_is_b {
                    collisions[cur].push(if self_mode { act } else { act - length1 });
                }
                if cur_is_b && act_is_a {
                    collisions[act].push(orig);
                }
            }
        }

        if cur_is_a && self_mode {
            // A box always collides with itself in self mode.
            collisions[cur].push(cur);
        }

        let at = active.partition_point(|&i| pri[i].hi < pri[cur].hi);
        active.insert(at, cur);
    }

    for list in &mut collisions {
        list.sort_unstable();
    }
    collisions
}

/// Candidate curve pairs whose (tight) bounds collide on both axes.
pub fn find_curve_bounds_collisions(
    curves1: &[CubicBezierSegment],
    curves2: Option<&[CubicBezierSegment]>,
    tolerance: f64,
) -> Vec<Vec<usize>> {
    let bounds1: Vec<Rect> = curves1.iter().map(|c| c.bounding_rect()).collect();
    let bounds2: Option<Vec<Rect>> = curves2.map(|c| c.iter().map(|c| c.bounding_rect()).collect());
    find_bounds_collisions(&bounds1, bounds2.as_deref(), tolerance, false, false)
}

/// Per-curve one-dimensional collision candidates on each axis separately,
/// as consumed by the winding propagation.
pub fn find_curve_bounds_collisions_both_axes(
    curves1: &[CubicBezierSegment],
    curves2: Option<&[CubicBezierSegment]>,
    tolerance: f64,
) -> Vec<CurveBoundsCollisions> {
    let bounds1: Vec<Rect> = curves1.iter().map(|c| c.bounding_rect()).collect();
    let bounds2: Option<Vec<Rect>> = curves2.map(|c| c.iter().map(|c| c.bounding_rect()).collect());
    let hor = find_bounds_collisions(&bounds1, bounds2.as_deref(), tolerance, false, true);
    let ver = find_bounds_collisions(&bounds1, bounds2.as_deref(), tolerance, true, true);
    hor.into_iter()
        .zip(ver)
        .map(|(hor, ver)| CurveBoundsCollisions { hor, ver })
        .collect()
}

/// Collisions over whole-item bounding boxes.
pub fn find_item_bounds_collisions(
    bounds1: &[Rect],
    bounds2: Option<&[Rect]>,
    tolerance: f64,
) -> Vec<Vec<usize>> {
    find_bounds_collisions(bounds1, bounds2, tolerance, false, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rect;

    #[test]
    fn separate_lists() {
        let a = [rect(0.0, 0.0, 10.0, 10.0), rect(100.0, 0.0, 10.0, 10.0)];
        let b = [
            rect(5.0, 5.0, 10.0, 10.0),
            rect(50.0, 50.0, 10.0, 10.0),
            rect(105.0, -5.0, 10.0, 10.0),
        ];
        let collisions = find_bounds_collisions(&a, Some(&b), 0.0, false, false);
        assert_eq!(collisions, vec![vec![0], vec![2]]);
    }

    #[test]
    fn self_mode_includes_own_index() {
        let a = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(5.0, 5.0, 10.0, 10.0),
            rect(100.0, 100.0, 1.0, 1.0),
        ];
        let collisions = find_bounds_collisions(&a, None, 0.0, false, false);
        assert_eq!(collisions[0], vec![0, 1]);
        assert_eq!(collisions[1], vec![0, 1]);
        assert_eq!(collisions[2], vec![2]);
    }

    #[test]
    fn touching_boxes_collide_within_tolerance() {
        let a = [rect(0.0, 0.0, 10.0, 10.0)];
        let b = [rect(10.0, 0.0, 10.0, 10.0), rect(20.5, 0.0, 10.0, 10.0)];
        let collisions = find_bounds_collisions(&a, Some(&b), 0.0, false, false);
        assert_eq!(collisions[0], vec![0]);
        let collisions = find_bounds_collisions(&a, Some(&b), 11.0, false, false);
        assert_eq!(collisions[0], vec![0, 1]);
    }

    #[test]
    fn sweep_axis_only_ignores_the_secondary_axis() {
        let a = [rect(0.0, 0.0, 10.0, 10.0)];
        let b = [rect(5.0, 500.0, 10.0, 10.0)];
        let full = find_bounds_collisions(&a, Some(&b), 0.0, false, false);
        assert!(full[0].is_empty());
        let x_only = find_bounds_collisions(&a, Some(&b), 0.0, false, true);
        assert_eq!(x_only[0], vec![0]);
    }

    #[test]
    fn vertical_sweep_matches_horizontal() {
        let a = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(3.0, 3.0, 10.0, 10.0),
            rect(30.0, 2.0, 5.0, 5.0),
        ];
        let h = find_bounds_collisions(&a, None, 0.0, false, false);
        let v = find_bounds_collisions(&a, None, 0.0, true, false);
        assert_eq!(h, v);
    }
}
