//! The working arena of the boolean pipeline.
//!
//! Rings are the sub-paths of the (prepared, cloned) operands; nodes are
//! their segments, stored in one arena so that intersection records can
//! hold stable ids across curve division. Each node tracks its ring and
//! position; positions are re-indexed on insertion and removal.

use crate::geom::CubicBezierSegment;
use crate::math::Vector;
use crate::path::winding::Winding;
use crate::path::{Path, Segment};

pub(crate) type NodeId = usize;

pub(crate) struct Node {
    pub point: crate::math::Point,
    pub handle_in: Vector,
    pub handle_out: Vector,
    pub ring: usize,
    pub index: usize,
    pub removed: bool,
    // Transient analysis state of the running operation.
    pub winding: Option<Winding>,
    /// The head of the chain of counterpart locations bound to this
    /// segment (an index into the operation's location arena).
    pub inter: Option<usize>,
    pub visited: bool,
}

pub(crate) struct Ring {
    pub nodes: Vec<NodeId>,
    pub closed: bool,
    pub operand: u8,
    /// Set when every segment of the ring sits on an overlap; such rings
    /// are candidates for the fully-overlapping-paths shortcut.
    pub overlaps_only: bool,
}

impl Ring {
    pub fn curve_count(&self) -> usize {
        if self.closed {
            self.nodes.len()
        } else {
            self.nodes.len().saturating_sub(1)
        }
    }
}

#[derive(Default)]
pub(crate) struct Graph {
    pub nodes: Vec<Node>,
    pub rings: Vec<Ring>,
}

impl Graph {
    pub fn from_paths(paths: &[(&Path, u8)]) -> Graph {
        let mut graph = Graph::default();
        for (ring_index, (path, operand)) in paths.iter().enumerate() {
            let mut ring = Ring {
                nodes: Vec::with_capacity(path.segment_count()),
                closed: path.is_closed(),
                operand: *operand,
                overlaps_only: false,
            };
            for (index, segment) in path.segments().iter().enumerate() {
                let id = graph.nodes.len();
                graph.nodes.push(Node {
                    point: segment.point,
                    handle_in: segment.handle_in,
                    handle_out: segment.handle_out,
                    ring: ring_index,
                    index,
                    removed: false,
                    winding: None,
                    inter: None,
                    visited: false,
                });
                ring.nodes.push(id);
            }
            graph.rings.push(ring);
        }
        graph
    }

    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let n = &self.nodes[node];
        let ring = &self.rings[n.ring];
        if n.index + 1 < ring.nodes.len() {
            Some(ring.nodes[n.index + 1])
        } else if ring.closed && !ring.nodes.is_empty() {
            Some(ring.nodes[0])
        } else {
            None
        }
    }

    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        let n = &self.nodes[node];
        let ring = &self.rings[n.ring];
        if n.index > 0 {
            Some(ring.nodes[n.index - 1])
        } else if ring.closed && !ring.nodes.is_empty() {
            Some(*ring.nodes.last().unwrap())
        } else {
            None
        }
    }

    pub fn first_of_ring(&self, node: NodeId) -> NodeId {
        self.rings[self.nodes[node].ring].nodes[0]
    }

    /// The control polygon of the curve starting at `node`, or `None` for
    /// the last node of an open ring.
    pub fn curve_values(&self, node: NodeId) -> Option<CubicBezierSegment> {
        let next = self.next(node)?;
        let n1 = &self.nodes[node];
        let n2 = &self.nodes[next];
        Some(CubicBezierSegment {
            from: n1.point,
            ctrl1: n1.point + n1.handle_out,
            ctrl2: n2.point + n2.handle_in,
            to: n2.point,
        })
    }

    pub fn curve_has_handles(&self, node: NodeId) -> bool {
        match self.next(node) {
            Some(next) => {
                self.nodes[node].handle_out != Vector::zero()
                    || self.nodes[next].handle_in != Vector::zero()
            }
            None => false,
        }
    }

    /// Divide the curve starting at `node` at `time`, inserting a new node
    /// at the split point and returning its id. `clear_handles` keeps a
    /// handle-free curve handle-free.
    pub fn divide_curve(&mut self, node: NodeId, time: f64, clear_handles: bool) -> NodeId {
        let values = self
            .curve_values(node)
            .expect("dividing the curve of a terminal node");
        let next = self.next(node).unwrap();
        let (left, right) = values.split(time);

        let ring = self.nodes[node].ring;
        let index = self.nodes[node].index;
        let id = self.nodes.len();
        self.nodes[node].handle_out = left.ctrl1 - left.from;
        self.nodes[next].handle_in = right.ctrl2 - right.to;
        self.nodes.push(Node {
            point: left.to,
            handle_in: left.ctrl2 - left.to,
            handle_out: right.ctrl1 - right.from,
            ring,
            index: index + 1,
            removed: false,
            winding: None,
            inter: None,
            visited: false,
        });
        self.rings[ring].nodes.insert(index + 1, id);
        for i in index + 2..self.rings[ring].nodes.len() {
            let n = self.rings[ring].nodes[i];
            self.nodes[n].index = i;
        }
        if clear_handles {
            self.nodes[node].handle_out = Vector::zero();
            self.nodes[next].handle_in = Vector::zero();
            self.nodes[id].handle_in = Vector::zero();
            self.nodes[id].handle_out = Vector::zero();
        }
        id
    }

    /// Detach a node from its ring; the node stays in the arena, marked
    /// removed.
    pub fn remove(&mut self, node: NodeId) {
        if self.nodes[node].removed {
            return;
        }
        let ring = self.nodes[node].ring;
        let index = self.nodes[node].index;
        self.rings[ring].nodes.remove(index);
        for i in index..self.rings[ring].nodes.len() {
            let n = self.rings[ring].nodes[i];
            self.nodes[n].index = i;
        }
        self.nodes[node].removed = true;
    }

    pub fn segment_of(&self, node: NodeId) -> Segment {
        let n = &self.nodes[node];
        Segment::with_handles(n.point, n.handle_in, n.handle_out)
    }

    /// Reassemble a ring into a path.
    pub fn ring_to_path(&self, ring: usize) -> Path {
        let r = &self.rings[ring];
        let segments = r.nodes.iter().map(|&n| self.segment_of(n)).collect();
        Path::with_segments(segments, r.closed)
    }

    /// Geometric equality of two rings, allowing a rotated starting
    /// segment (but not a reversed direction).
    pub fn rings_equal(&self, r1: usize, r2: usize) -> bool {
        use crate::geom::numerical::GEOMETRIC_EPSILON;
        use crate::geom::utils::points_close;
        let a = &self.rings[r1].nodes;
        let b = &self.rings[r2].nodes;
        if a.len() != b.len() || a.is_empty() {
            return false;
        }
        let len = a.len();
        'offsets: for offset in 0..len {
            for i in 0..len {
                let na = &self.nodes[a[i]];
                let nb = &self.nodes[b[(i + offset) % len]];
                if !points_close(na.point, nb.point, GEOMETRIC_EPSILON)
                    || (na.handle_in - nb.handle_in).length() > GEOMETRIC_EPSILON
                    || (na.handle_out - nb.handle_out).length() > GEOMETRIC_EPSILON
                {
                    continue 'offsets;
                }
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{point, rect};

    #[test]
    fn divide_updates_indices_and_handles() {
        let path = Path::rectangle(rect(0.0, 0.0, 10.0, 10.0));
        let mut graph = Graph::from_paths(&[(&path, 0)]);
        let start = graph.rings[0].nodes[1];
        let mid = graph.divide_curve(start, 0.5, true);
        assert_eq!(graph.nodes[mid].point, point(10.0, 5.0));
        assert_eq!(graph.nodes[mid].index, 2);
        assert_eq!(graph.rings[0].nodes.len(), 5);
        // Later nodes were re-indexed.
        for (i, &n) in graph.rings[0].nodes.iter().enumerate() {
            assert_eq!(graph.nodes[n].index, i);
        }
        // The curve following the split runs to the old endpoint.
        let v = graph.curve_values(mid).unwrap();
        assert_eq!(v.to, point(10.0, 10.0));
    }

    #[test]
    fn remove_detaches_from_ring() {
        let path = Path::rectangle(rect(0.0, 0.0, 10.0, 10.0));
        let mut graph = Graph::from_paths(&[(&path, 0)]);
        let n1 = graph.rings[0].nodes[1];
        graph.remove(n1);
        assert!(graph.nodes[n1].removed);
        assert_eq!(graph.rings[0].nodes.len(), 3);
        let rebuilt = graph.ring_to_path(0);
        assert_eq!(rebuilt.segment_count(), 3);
    }

    #[test]
    fn ring_equality_with_rotation() {
        let path = Path::rectangle(rect(0.0, 0.0, 10.0, 10.0));
        let mut rotated = path.clone();
        let mut segments = rotated.segments().to_vec();
        segments.rotate_left(2);
        rotated.set_segments(segments);
        let graph = Graph::from_paths(&[(&path, 0), (&rotated, 1)]);
        assert!(graph.rings_equal(0, 1));

        let mut reversed = path.clone();
        reversed.reverse();
        let graph = Graph::from_paths(&[(&path, 0), (&reversed, 1)]);
        assert!(!graph.rings_equal(0, 1));
    }
}
