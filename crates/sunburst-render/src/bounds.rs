use crate::hierarchy::{LayoutTree, NodeId};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Angular span `[x0, x1]` (radians, clockwise from 12 o'clock) and radial span `[y0, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcBounds {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl ArcBounds {
    pub fn mid_angle(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn mid_radius(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn angular_width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Anything carrying sunburst segment bounds.
pub trait HasArcBounds {
    fn arc_bounds(&self) -> ArcBounds;
}

impl HasArcBounds for ArcBounds {
    fn arc_bounds(&self) -> ArcBounds {
        *self
    }
}

/// Bounds `node` would get if every ancestor below the category ring had a single child.
///
/// Depth 0 and 1 span the whole circle; deeper nodes inherit the actual angular span of their
/// depth-1 ancestor unchanged. The radial band splits `radius` into `max_depth + 1` equal rings.
pub fn theoretical_bounds(
    tree: &LayoutTree<'_>,
    node: NodeId,
    max_depth: usize,
    radius: f64,
) -> ArcBounds {
    let depth = tree.node(node).depth;
    let (x0, x1) = if depth > 1 {
        let ancestor = tree.node(tree.ancestor_at_depth(node, 1));
        (ancestor.x0, ancestor.x1)
    } else {
        (0.0, TAU)
    };

    let thickness = radius / (max_depth + 1) as f64;
    ArcBounds {
        x0,
        x1,
        y0: depth as f64 * thickness,
        y1: (depth + 1) as f64 * thickness,
    }
}
