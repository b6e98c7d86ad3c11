//! Winding propagation along the curve chains between crossings.

use crate::collision::CurveBoundsCollisions;
use crate::geom::numerical::clamp;
use crate::geom::CubicBezierSegment;
use crate::graph::{Graph, NodeId};
use crate::path::winding::{winding_at, Winding};

use std::f64::consts::FRAC_1_SQRT_2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BooleanOpKind {
    Unite,
    Intersect,
    Subtract,
    Exclude,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Operator {
    pub kind: BooleanOpKind,
}

impl Operator {
    /// The winding numbers that keep a segment in the result.
    pub fn contains_winding(&self, w: i64) -> bool {
        match self.kind {
            BooleanOpKind::Unite => w == 1 || w == 2,
            BooleanOpKind::Intersect => w == 2,
            BooleanOpKind::Subtract => w == 1,
            BooleanOpKind::Exclude => w == 1 || w == -1,
        }
    }
}

/// Everything the propagation needs to sample windings: the divided curves
/// of both operands and their per-axis collision candidates.
pub(crate) struct WindingContext {
    /// One slot per (post-division) curve, in ring order.
    pub values: Vec<CubicBezierSegment>,
    pub operand_of: Vec<u8>,
    /// Per-slot collision candidates, separated by axis.
    pub collisions: Vec<CurveBoundsCollisions>,
    /// Slot of the curve starting at a node, if any.
    pub slot_of_node: Vec<Option<usize>>,
    /// All curve values of each operand, for the subtract tests.
    pub operand_values: [Vec<CubicBezierSegment>; 2],
    pub two_operands: bool,
}

struct ChainEntry {
    node: NodeId,
    slot: usize,
    length: f64,
}

/// Determine the winding contribution for the curve chain starting at
/// `segment` and running up to the next crossing, and assign it to every
/// segment of the chain.
pub(crate) fn propagate_winding(
    graph: &mut Graph,
    segment: NodeId,
    ctx: &WindingContext,
    operator: Operator,
) {
    // Collect the chain of curves between crossings.
    let mut chain: Vec<ChainEntry> = Vec::new();
    let mut total_length = 0.0;
    let start = segment;
    let mut node = segment;
    loop {
        if let Some(slot) = ctx.slot_of_node[node] {
            let length = ctx.values[slot].length();
            chain.push(ChainEntry { node, slot, length });
            total_length += length;
        }
        node = match graph.next(node) {
            Some(next) => next,
            None => break,
        };
        if node == start || graph.nodes[node].inter.is_some() {
            break;
        }
    }

    // Sample the winding at a few offsets along the chain until a sample
    // of sufficient quality is found; don't go too close to the chain's
    // ends, to avoid special winding cases.
    let offsets = [0.5, 0.25, 0.75];
    let t_min = 1e-3;
    let t_max = 1.0 - t_min;
    let mut best = Winding {
        quality: -1.0,
        ..Winding::default()
    };

    for &offset in &offsets {
        if best.quality >= 0.5 {
            break;
        }
        let mut length = total_length * offset;
        for entry in &chain {
            if length <= entry.length {
                let values = &ctx.values[entry.slot];
                let t = clamp(values.time_at_length(length), t_min, t_max);
                let pt = values.sample(t);
                // Cast the ray across the curve, not along it.
                let vertical = values.tangent(t).y.abs() < FRAC_1_SQRT_2;

                let operand = ctx.operand_of[entry.slot];
                let mut wind: Option<Winding> = None;
                if operator.kind == BooleanOpKind::Subtract && ctx.two_operands {
                    // A chain of the minuend inside the subtrahend (or of
                    // the subtrahend outside the minuend) contributes
                    // nothing; a low-quality probe defers to another
                    // offset.
                    let other = (1 - operand) as usize;
                    let path_winding = winding_at(pt, &ctx.operand_values[other], vertical);
                    let inside_other = path_winding.winding.round() as i64 != 0;
                    if (operand == 0 && inside_other) || (operand == 1 && !inside_other) {
                        if path_winding.quality < 1.0 {
                            continue;
                        }
                        wind = Some(Winding {
                            winding: 0.0,
                            winding_l: 0.0,
                            winding_r: 0.0,
                            on_path: false,
                            quality: path_winding.quality,
                        });
                    }
                }

                let w = wind.unwrap_or_else(|| {
                    let candidates = if vertical {
                        &ctx.collisions[entry.slot].hor
                    } else {
                        &ctx.collisions[entry.slot].ver
                    };
                    let curves: Vec<CubicBezierSegment> =
                        candidates.iter().map(|&i| ctx.values[i]).collect();
                    winding_at(pt, &curves, vertical)
                });
                if w.quality > best.quality {
                    best = w;
                }
                break;
            }
            length -= entry.length;
        }
    }

    for entry in &chain {
        graph.nodes[entry.node].winding = Some(best);
    }
}
