//! Tracing the boolean result outlines: walk valid segments along their
//! rings, switching rings at crossings, backtracking over branches whose
//! continuation turns out invalid.

use crate::graph::{Graph, NodeId};
use crate::location::Location;
use crate::math::Vector;
use crate::path::{Path, Segment};
use crate::propagate::{BooleanOpKind, Operator};

struct Branch {
    /// Length of the result path when the branch was entered.
    start: usize,
    /// Remaining alternatives at the branch point.
    crossings: Vec<NodeId>,
    /// Segments visited while this branch was current.
    visited: Vec<NodeId>,
    handle_in: Vector,
}

struct Tracer<'a> {
    graph: &'a mut Graph,
    locs: &'a [Location],
    operator: Option<Operator>,
    starts: Vec<NodeId>,
}

impl<'a> Tracer<'a> {
    // A segment is valid when it is still available and its winding record
    // satisfies the operator. Unite excludes windings of two that have
    // both sides filled: those lie inside the union, not on its contour.
    fn is_valid(&self, node: NodeId) -> bool {
        let n = &self.graph.nodes[node];
        if n.removed || n.visited {
            return false;
        }
        match self.operator {
            None => true,
            Some(op) => match n.winding {
                None => false,
                Some(w) => {
                    let wi = w.winding.round() as i64;
                    op.contains_winding(wi)
                        && !(op.kind == BooleanOpKind::Unite
                            && wi == 2
                            && w.winding_l.round() as i64 != 0
                            && w.winding_r.round() as i64 != 0)
                }
            },
        }
    }

    fn is_start(&self, node: Option<NodeId>) -> bool {
        node.map_or(false, |n| self.starts.contains(&n))
    }

    // The segments reachable through the intersection chain of `segment`
    // that are worth switching to.
    fn crossing_segments(&mut self, segment: NodeId, collect_starts: bool) -> Vec<NodeId> {
        let mut crossings = Vec::new();
        if collect_starts {
            self.starts.clear();
            self.starts.push(segment);
        }
        if let Some(head) = self.graph.nodes[segment].inter {
            self.collect(segment, head, None, collect_starts, &mut crossings);
            // Walk from the beginning of the chain back up to the head.
            let mut begin = head;
            while let Some(p) = self.locs[begin].prev {
                begin = p;
            }
            if begin != head {
                self.collect(segment, begin, Some(head), collect_starts, &mut crossings);
            }
        }
        crossings
    }

    fn collect(
        &mut self,
        segment: NodeId,
        from: usize,
        end: Option<usize>,
        collect_starts: bool,
        crossings: &mut Vec<NodeId>,
    ) {
        let mut cursor = Some(from);
        while let Some(ix) = cursor {
            if Some(ix) == end {
                break;
            }
            let loc = &self.locs[ix];
            if let Some(other) = loc.segment {
                if !self.graph.nodes[other].removed {
                    let next = self
                        .graph
                        .next(other)
                        .unwrap_or_else(|| self.graph.first_of_ring(other));
                    let next_inter = self.graph.nodes[next].inter;
                    let next_inter_valid = next_inter
                        .and_then(|ni| self.locs[ni].segment)
                        .map_or(false, |s| {
                            !self.graph.nodes[s].removed && self.is_valid(s)
                        });
                    if other != segment
                        && (self.is_start(Some(other))
                            || self.is_start(Some(next))
                            || (self.is_valid(other)
                                && (self.is_valid(next) || next_inter_valid)))
                    {
                        crossings.push(other);
                    }
                    if collect_starts {
                        self.starts.push(other);
                    }
                }
            }
            cursor = self.locs[ix].next;
        }
    }
}

/// Trace the outlines of the valid segments into result paths. With no
/// operator every unvisited segment is valid (the self-crossing resolution
/// case).
pub(crate) fn trace_paths(
    graph: &mut Graph,
    locs: &[Location],
    operator: Option<Operator>,
) -> Vec<Path> {
    let mut paths: Vec<Path> = Vec::new();
    let mut tracer = Tracer {
        graph,
        locs,
        operator,
        starts: Vec::new(),
    };

    // Seed order: plain segments first, segments on intersections later,
    // overlap segments last; ties by ring and position.
    let mut seeds: Vec<NodeId> = (0..tracer.graph.nodes.len())
        .filter(|&n| !tracer.graph.nodes[n].removed)
        .collect();
    seeds.sort_by_key(|&n| {
        let node = &tracer.graph.nodes[n];
        let overlap = node
            .inter
            .map_or(false, |i| tracer.locs[i].overlap);
        (overlap as u8, node.inter.is_some() as u8, node.ring, node.index)
    });

    for &seed in &seeds {
        let mut valid = tracer.is_valid(seed);

        // Two fully overlapping rings collapse to a single copy.
        if valid && tracer.graph.rings[tracer.graph.nodes[seed].ring].overlaps_only {
            let r1 = tracer.graph.nodes[seed].ring;
            if let Some(other_seg) = tracer.graph.nodes[seed]
                .inter
                .and_then(|i| tracer.locs[i].segment)
            {
                let r2 = tracer.graph.nodes[other_seg].ring;
                if r1 != r2 && tracer.graph.rings_equal(r1, r2) {
                    let ring_path = tracer.graph.ring_to_path(r1);
                    if ring_path.area() != 0.0 {
                        paths.push(ring_path);
                    }
                    for ring in [r1, r2] {
                        for i in 0..tracer.graph.rings[ring].nodes.len() {
                            let n = tracer.graph.rings[ring].nodes[i];
                            tracer.graph.nodes[n].visited = true;
                        }
                    }
                    valid = false;
                }
            }
        }

        let mut segments: Vec<Segment> = Vec::new();
        let mut started = false;
        let mut finished = false;
        let mut closed = true;
        let mut branches: Vec<Branch> = Vec::new();
        let mut branch: Option<Branch> = None;
        let mut handle_in = Vector::zero();
        let mut seg = seed;

        while valid {
            let first = !started;
            started = true;
            let mut crossings = tracer.crossing_segments(seg, first);
            let other = if crossings.is_empty() {
                None
            } else {
                Some(crossings.remove(0))
            };
            finished = !first && (tracer.is_start(Some(seg)) || tracer.is_start(other));
            let cross = !finished && other.is_some();

            if finished {
                let node = &tracer.graph.nodes[seg];
                let ring = &tracer.graph.rings[node.ring];
                if node.index == 0 || node.index + 1 == ring.nodes.len() {
                    closed = ring.closed;
                }
                tracer.graph.nodes[seg].visited = true;
                break;
            }
            if cross && branch.is_some() {
                branches.push(branch.take().unwrap());
            }
            if branch.is_none() {
                if cross {
                    crossings.push(seg);
                }
                branch = Some(Branch {
                    start: segments.len(),
                    crossings,
                    visited: Vec::new(),
                    handle_in,
                });
            }
            if cross {
                seg = other.unwrap();
            }

            if !tracer.is_valid(seg) {
                // Roll the current branch back and try its alternatives;
                // when they are exhausted, pop back to the outer branches.
                let mut aborted = false;
                {
                    let b = branch.as_mut().unwrap();
                    segments.truncate(b.start);
                    for &v in &b.visited {
                        tracer.graph.nodes[v].visited = false;
                    }
                    b.visited.clear();
                    handle_in = b.handle_in;
                }
                loop {
                    let candidate = {
                        let b = branch.as_mut().unwrap();
                        if b.crossings.is_empty() {
                            None
                        } else {
                            Some(b.crossings.remove(0))
                        }
                    };
                    match candidate {
                        Some(c) => {
                            if !tracer.graph.nodes[c].removed && tracer.is_valid(c) {
                                seg = c;
                                break;
                            }
                        }
                        None => match branches.pop() {
                            Some(outer) => {
                                segments.truncate(outer.start);
                                for &v in &outer.visited {
                                    tracer.graph.nodes[v].visited = false;
                                }
                                handle_in = outer.handle_in;
                                branch = Some(Branch {
                                    visited: Vec::new(),
                                    ..outer
                                });
                            }
                            None => {
                                aborted = true;
                                break;
                            }
                        },
                    }
                }
                if aborted {
                    break;
                }
            }

            // Add the segment to the path and continue along its ring.
            let next = tracer.graph.next(seg);
            let node = &tracer.graph.nodes[seg];
            segments.push(Segment::with_handles(
                node.point,
                handle_in,
                if next.is_some() {
                    node.handle_out
                } else {
                    Vector::zero()
                },
            ));
            tracer.graph.nodes[seg].visited = true;
            branch.as_mut().unwrap().visited.push(seg);
            handle_in = next
                .map(|n| tracer.graph.nodes[n].handle_in)
                .unwrap_or_else(Vector::zero);
            seg = next.unwrap_or_else(|| tracer.graph.first_of_ring(seg));
        }

        if finished {
            if closed {
                if let Some(segment) = segments.first_mut() {
                    segment.handle_in = handle_in;
                }
            }
            let path = Path::with_segments(segments, closed);
            if path.area().abs() > 1e-12 {
                paths.push(path);
            }
        }
    }

    paths
}
