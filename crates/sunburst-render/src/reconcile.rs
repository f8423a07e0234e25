use crate::bounds::{ArcBounds, HasArcBounds};
use crate::hierarchy::{LayoutTree, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentBounds {
    pub node: NodeId,
    pub bounds: ArcBounds,
}

impl HasArcBounds for SegmentBounds {
    fn arc_bounds(&self) -> ArcBounds {
        self.bounds
    }
}

/// Segments grouped by depth (≥ 1), each group in render order.
pub type SegmentBoundsByDepth = BTreeMap<usize, Vec<SegmentBounds>>;

/// Aligns the trailing edge of every ring with the ring directly inside it.
///
/// For each depth `d > 1`, when the last segment at `d` ends before the last segment at `d - 1`,
/// its `x1` is raised to match. Only the last segment per depth changes. Depths are processed
/// inside-out over the corrected map, so a fix on ring `d` carries to ring `d + 1`.
pub fn reconcile_last_node_bounds(by_depth: &SegmentBoundsByDepth) -> SegmentBoundsByDepth {
    let mut out = by_depth.clone();
    let depths: Vec<usize> = out.keys().copied().filter(|d| *d > 1).collect();
    for depth in depths {
        let Some(prev_x1) = out
            .get(&(depth - 1))
            .and_then(|segs| segs.last())
            .map(|s| s.bounds.x1)
        else {
            continue;
        };
        let Some(last) = out.get_mut(&depth).and_then(|segs| segs.last_mut()) else {
            continue;
        };
        if last.bounds.x1 < prev_x1 {
            tracing::debug!(
                depth,
                node = last.node.0,
                from = last.bounds.x1,
                to = prev_x1,
                "extending trailing segment"
            );
            last.bounds.x1 = prev_x1;
        }
    }
    out
}

impl LayoutTree<'_> {
    /// Groups every non-root node by depth, in arena (left-to-right) order.
    pub fn segments_by_depth(&self) -> SegmentBoundsByDepth {
        let mut out = SegmentBoundsByDepth::new();
        for (id, n) in self.iter().filter(|(_, n)| n.depth >= 1) {
            out.entry(n.depth).or_default().push(SegmentBounds {
                node: id,
                bounds: n.arc_bounds(),
            });
        }
        out
    }

    /// Writes corrected bounds back. Must complete before anything reads the tree for rendering.
    pub fn apply_bounds(&mut self, by_depth: &SegmentBoundsByDepth) {
        for seg in by_depth.values().flatten() {
            if self.get(seg.node).is_none() {
                continue;
            }
            let n = self.node_mut(seg.node);
            n.x0 = seg.bounds.x0;
            n.x1 = seg.bounds.x1;
            n.y0 = seg.bounds.y0;
            n.y1 = seg.bounds.y1;
        }
    }

    /// The reconciled bounds written back into the tree.
    pub fn reconcile(&mut self) {
        let corrected = reconcile_last_node_bounds(&self.segments_by_depth());
        self.apply_bounds(&corrected);
    }
}
