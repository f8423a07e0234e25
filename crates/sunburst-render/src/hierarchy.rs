//! Hierarchy layout seam and the default partition layout.
//!
//! The layout assigns every node of a normalized tree an angular span `[x0, x1]` (radians,
//! clockwise from 12 o'clock) and a radial band `[y0, y1]`. Nodes live in an arena addressed by
//! [`NodeId`]; the parent link is an index used for traversal only.

use crate::bounds::{ArcBounds, HasArcBounds};
use serde::Serialize;
use std::collections::VecDeque;
use sunburst_core::NormalizedNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone)]
pub struct LayoutNode<'a> {
    pub data: &'a NormalizedNode,
    pub depth: usize,
    /// Height of the subtree rooted here (0 for leaves).
    pub height: usize,
    /// Number of leaves below (1 for a leaf).
    pub value: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl HasArcBounds for LayoutNode<'_> {
    fn arc_bounds(&self) -> ArcBounds {
        ArcBounds {
            x0: self.x0,
            x1: self.x1,
            y0: self.y0,
            y1: self.y1,
        }
    }
}

/// Arena of laid-out nodes in pre-order (parents before children, siblings left to right).
#[derive(Debug, Clone)]
pub struct LayoutTree<'a> {
    nodes: Vec<LayoutNode<'a>>,
}

impl<'a> LayoutTree<'a> {
    /// Builds the arena with zeroed bounds and leaf-count values.
    pub fn from_normalized(root: &'a NormalizedNode) -> Self {
        let mut nodes = Vec::new();
        push_node(&mut nodes, root, None, 0);
        let mut tree = Self { nodes };
        if !tree.nodes.is_empty() {
            tree.compute_value_and_height(NodeId(0));
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &LayoutNode<'a> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode<'a> {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode<'a>> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &LayoutNode<'a>)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Node ids in breadth-first order, root first. Segments are drawn and indexed in this order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return out;
        }
        let mut queue = VecDeque::from([self.root()]);
        while let Some(id) = queue.pop_front() {
            out.push(id);
            queue.extend(self.node(id).children.iter().copied());
        }
        out
    }

    /// Deepest depth present in the tree (the root's height).
    pub fn max_depth(&self) -> usize {
        self.nodes.first().map(|n| n.height).unwrap_or(0)
    }

    /// Walks up from `id` to the ancestor at `depth` (or `id` itself when already that shallow).
    pub fn ancestor_at_depth(&self, id: NodeId, depth: usize) -> NodeId {
        let mut cur = id;
        while self.node(cur).depth > depth {
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        cur
    }

    fn compute_value_and_height(&mut self, id: NodeId) -> (f64, usize) {
        let children = self.nodes[id.0].children.clone();
        if children.is_empty() {
            self.nodes[id.0].value = 1.0;
            self.nodes[id.0].height = 0;
            return (1.0, 0);
        }
        let mut sum = 0.0;
        let mut height = 0;
        for c in children {
            let (v, h) = self.compute_value_and_height(c);
            sum += v;
            height = height.max(h + 1);
        }
        self.nodes[id.0].value = sum;
        self.nodes[id.0].height = height;
        (sum, height)
    }
}

fn push_node<'a>(
    nodes: &mut Vec<LayoutNode<'a>>,
    node: &'a NormalizedNode,
    parent: Option<NodeId>,
    depth: usize,
) {
    let idx = nodes.len();
    nodes.push(LayoutNode {
        data: node,
        depth,
        height: 0,
        value: 0.0,
        parent,
        children: Vec::new(),
        x0: 0.0,
        x1: 0.0,
        y0: 0.0,
        y1: 0.0,
    });

    if let Some(parent_idx) = parent {
        nodes[parent_idx.0].children.push(NodeId(idx));
    }

    for child in node.children() {
        push_node(nodes, child, Some(NodeId(idx)), depth + 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionSize {
    /// Angular extent of the whole chart (normally `2π`).
    pub angle: f64,
    pub radius: f64,
}

impl PartitionSize {
    pub fn full_circle(radius: f64) -> Self {
        Self {
            angle: std::f64::consts::TAU,
            radius,
        }
    }
}

/// Assigns preliminary angular/radial bounds to a normalized tree.
pub trait HierarchyLayout {
    fn layout<'a>(&self, root: &'a NormalizedNode, size: PartitionSize) -> LayoutTree<'a>;
}

/// Adjacency partition: sibling spans proportional to leaf count, one equal radial band per
/// depth (`radius / (height + 1)`), input order preserved, no padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Partition;

impl HierarchyLayout for Partition {
    fn layout<'a>(&self, root: &'a NormalizedNode, size: PartitionSize) -> LayoutTree<'a> {
        let mut tree = LayoutTree::from_normalized(root);
        if tree.is_empty() {
            return tree;
        }

        let bands = (tree.max_depth() + 1) as f64;
        let band = size.radius / bands;
        {
            let r = tree.node_mut(NodeId(0));
            r.x0 = 0.0;
            r.x1 = size.angle;
            r.y0 = 0.0;
            r.y1 = band;
        }

        // Pre-order arena: every parent is positioned before its children.
        for idx in 0..tree.len() {
            let (x0, x1, value, depth, children) = {
                let n = tree.node(NodeId(idx));
                (n.x0, n.x1, n.value, n.depth, n.children.clone())
            };
            if children.is_empty() {
                continue;
            }
            let k = if value > 0.0 { (x1 - x0) / value } else { 0.0 };
            let y0 = band * (depth + 1) as f64;
            let y1 = band * (depth + 2) as f64;
            let mut x = x0;
            for c in children {
                let child = tree.node_mut(c);
                child.x0 = x;
                x += child.value * k;
                child.x1 = x;
                child.y0 = y0;
                child.y1 = y1;
            }
        }

        tracing::debug!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            leaves = tree.node(NodeId(0)).value,
            "partitioned hierarchy"
        );
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> NormalizedNode {
        NormalizedNode {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn branch(name: &str, children: Vec<NormalizedNode>) -> NormalizedNode {
        NormalizedNode {
            name: name.to_string(),
            children: Some(children),
            ..Default::default()
        }
    }

    fn sample() -> NormalizedNode {
        branch(
            "root",
            vec![
                branch("a", vec![branch("a*", vec![leaf("a1"), leaf("a2"), leaf("a3")])]),
                leaf("b"),
            ],
        )
    }

    #[test]
    fn arena_is_pre_order_with_parent_links() {
        let root = sample();
        let tree = LayoutTree::from_normalized(&root);
        let order: Vec<&str> = tree.iter().map(|(_, n)| n.data.name.as_str()).collect();
        assert_eq!(order, vec!["root", "a", "a*", "a1", "a2", "a3", "b"]);
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(2)));
        assert_eq!(tree.parent(NodeId(0)), None);
        assert_eq!(tree.node(NodeId(0)).value, 4.0);
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.ancestor_at_depth(NodeId(4), 1), NodeId(1));
    }

    #[test]
    fn descendants_walk_breadth_first() {
        let root = sample();
        let tree = LayoutTree::from_normalized(&root);
        let order: Vec<&str> = tree
            .descendants()
            .into_iter()
            .map(|id| tree.node(id).data.name.as_str())
            .collect();
        assert_eq!(order, vec!["root", "a", "b", "a*", "a1", "a2", "a3"]);
    }

    #[test]
    fn partition_spans_are_contiguous_and_nested() {
        let root = sample();
        let tree = Partition.layout(&root, PartitionSize::full_circle(400.0));

        let r = tree.node(tree.root());
        assert_eq!((r.x0, r.x1), (0.0, std::f64::consts::TAU));
        assert_eq!((r.y0, r.y1), (0.0, 100.0));

        for (_, n) in tree.iter() {
            let mut x = n.x0;
            for &c in &n.children {
                let child = tree.node(c);
                assert!((child.x0 - x).abs() < 1e-12);
                assert!(child.x0 >= n.x0 - 1e-12 && child.x1 <= n.x1 + 1e-12);
                assert_eq!(child.y0, n.y1);
                x = child.x1;
            }
        }

        // `a` holds 3 of 4 leaves.
        let a = tree.node(NodeId(1));
        assert!((a.x1 - 0.75 * std::f64::consts::TAU).abs() < 1e-12);
        let a1 = tree.node(NodeId(3));
        assert_eq!((a1.y0, a1.y1), (300.0, 400.0));
    }

    #[test]
    fn single_leaf_root_fills_the_disc() {
        let root = leaf("alone");
        let tree = Partition.layout(&root, PartitionSize::full_circle(50.0));
        assert_eq!(tree.len(), 1);
        let r = tree.node(tree.root());
        assert_eq!((r.y0, r.y1), (0.0, 50.0));
    }
}
