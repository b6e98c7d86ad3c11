//! Dividing curves at a batch of intersection locations.

use crate::geom::numerical::CURVETIME_EPSILON;
use crate::graph::{Graph, NodeId};
use crate::location::Location;

// Link `to`'s chain onto the end of `from`'s chain, unless the link already
// exists (walking the chain both ways avoids building cycles).
fn link_intersections(locs: &mut Vec<Location>, from: usize, to: usize) {
    let mut prev = Some(from);
    while let Some(p) = prev {
        if p == to {
            return;
        }
        prev = locs[p].prev;
    }
    let mut from = from;
    loop {
        match locs[from].next {
            Some(n) if n == to => return,
            Some(n) => from = n,
            None => break,
        }
    }
    let mut to = to;
    while let Some(p) = locs[to].prev {
        to = p;
    }
    locs[from].next = Some(to);
    locs[to].prev = Some(from);
}

/// Divide the curves at the given locations (location-arena indices,
/// counterparts included), bind each location to the segment at its point
/// and wire the segment ↔ intersection links.
///
/// The locations are processed per curve from the highest time down, so
/// earlier times stay valid on the left part of each split; filtered
/// locations are re-normalised into whichever part they fall.
///
/// Returns the processed (non-filtered) locations in ascending order.
pub(crate) fn divide_locations(
    graph: &mut Graph,
    locs: &mut Vec<Location>,
    indices: &[usize],
    include: Option<&dyn Fn(&Graph, &[Location], usize) -> bool>,
) -> Vec<usize> {
    let t_min = CURVETIME_EPSILON;
    let t_max = 1.0 - t_min;

    // Sort by (ring, curve position, time) descending; the keys are read
    // before any division so the positions are still the original ones.
    let mut sorted: Vec<usize> = indices.to_vec();
    sorted.sort_by(|&a, &b| {
        let ka = sort_key(graph, &locs[a]);
        let kb = sort_key(graph, &locs[b]);
        kb.partial_cmp(&ka).unwrap()
    });

    let mut results = Vec::new();
    let mut prev_cnode: Option<NodeId> = None;
    let mut prev_time: Option<f64> = None;
    let mut no_handles = false;
    let mut renormalize: Vec<usize> = Vec::new();

    for &li in &sorted {
        let cnode = locs[li].cnode;
        let orig_time = locs[li].time;
        let mut time = orig_time;

        if prev_cnode != Some(cnode) {
            prev_cnode = Some(cnode);
            prev_time = None;
            renormalize.clear();
            no_handles = !graph.curve_has_handles(cnode);
        } else if let Some(pt) = prev_time {
            if pt >= t_min {
                time /= pt;
            }
        }

        if let Some(filter) = include {
            if !filter(graph, locs, li) {
                renormalize.push(li);
                continue;
            }
        }
        results.push(li);
        prev_time = Some(orig_time);

        let segment = if time < t_min {
            cnode
        } else if time > t_max {
            graph.next(cnode).unwrap_or(cnode)
        } else {
            let mid = graph.divide_curve(cnode, time, no_handles);
            // Filtered locations with larger times now live on the new
            // curve to the right of the split.
            for &ri in renormalize.iter().rev() {
                locs[ri].time = (locs[ri].time - time) / (1.0 - time);
                locs[ri].cnode = mid;
            }
            mid
        };

        locs[li].segment = Some(segment);

        // Wire the segment to its counterpart chain. A segment that
        // already carries an intersection absorbs the new chain instead.
        let dest = locs[li].other;
        match graph.nodes[segment].inter {
            Some(inter) => {
                link_intersections(locs, inter, dest);
                let mut cursor = Some(inter);
                while let Some(c) = cursor {
                    let counterpart = locs[c].other;
                    link_intersections(locs, counterpart, inter);
                    cursor = locs[c].next;
                }
            }
            None => graph.nodes[segment].inter = Some(dest),
        }
    }

    results.reverse();
    results
}

fn sort_key(graph: &Graph, loc: &Location) -> (usize, usize, f64) {
    let node = &graph.nodes[loc.cnode];
    (node.ring, node.index, loc.time)
}
