//! Taxonomy → sunburst-ready tree.
//!
//! The chart draws one ring per depth. Raw taxonomies nest competencies under sub-groups of each
//! category, so a category's grandchildren are lifted into a single synthetic merge node
//! (`TAMPON-<category>`) that occupies the depth-2 ring.

use crate::taxonomy::{Level, NormalizedNode, TaxonomyNode};

pub const MERGE_ID_PREFIX: &str = "TAMPON-";
pub const MERGE_CATEGORY: &str = "Fusion";
pub const MERGE_LEVEL: i64 = 2;


pub fn merge_node_id(category_name: &str) -> String {
    format!("{MERGE_ID_PREFIX}{category_name}")
}

pub fn merge_description(category_name: &str) -> String {
    format!("Regroupe les compétences de {category_name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepthClass {
    Root,
    Category,
    Nested,
}

impl DepthClass {
    fn of(depth: usize) -> Self {
        match depth {
            0 => Self::Root,
            1 => Self::Category,
            _ => Self::Nested,
        }
    }
}

/// Normalizes a raw taxonomy rooted at depth 0.
///
/// The input is never mutated; a fresh tree is built on every call.
pub fn normalize(root: &TaxonomyNode) -> NormalizedNode {
    let out = normalize_at(root, 0);
    tracing::debug!(
        root = %out.name,
        categories = out.children().len(),
        leaves = out.leaf_count(),
        "normalized taxonomy"
    );
    out
}

fn normalize_at(node: &TaxonomyNode, depth: usize) -> NormalizedNode {
    match DepthClass::of(depth) {
        DepthClass::Root => {
            let mut children: Vec<NormalizedNode> = node
                .children()
                .iter()
                .map(|c| normalize_at(c, depth + 1))
                .collect();
            children.sort_by(|a, b| a.name.cmp(&b.name));
            NormalizedNode {
                children: non_empty(children),
                ..copy_fields(node)
            }
        }
        DepthClass::Category => {
            let mut merged: Vec<NormalizedNode> = Vec::new();
            for child in node.children() {
                let grandchildren = child.children();
                if grandchildren.is_empty() {
                    continue;
                }
                if is_merge_node(child) {
                    // Already normalized: keep the merged order as-is.
                    merged.extend(grandchildren.iter().map(|g| normalize_at(g, depth + 2)));
                    continue;
                }
                let mut sorted: Vec<&TaxonomyNode> = grandchildren.iter().collect();
                sorted.sort_by(|a, b| a.name.cmp(&b.name));
                merged.extend(sorted.into_iter().map(|g| normalize_at(g, depth + 2)));
            }

            let children = if merged.is_empty() {
                None
            } else {
                Some(vec![NormalizedNode {
                    id: Some(merge_node_id(&node.name)),
                    name: node.name.clone(),
                    short_description: None,
                    level: Some(Level::Number(MERGE_LEVEL)),
                    category: Some(MERGE_CATEGORY.to_string()),
                    description: Some(merge_description(&node.name)),
                    children: Some(merged),
                }])
            };
            // Categories are labelled by name; their short description is not carried.
            NormalizedNode {
                short_description: None,
                children,
                ..copy_fields(node)
            }
        }
        DepthClass::Nested => {
            let children: Vec<NormalizedNode> = node
                .children()
                .iter()
                .map(|c| normalize_at(c, depth + 1))
                .collect();
            NormalizedNode {
                children: non_empty(children),
                ..copy_fields(node)
            }
        }
    }
}

fn is_merge_node(node: &TaxonomyNode) -> bool {
    node.id
        .as_deref()
        .is_some_and(|id| id.starts_with(MERGE_ID_PREFIX))
}

fn copy_fields(node: &TaxonomyNode) -> NormalizedNode {
    NormalizedNode {
        id: node.id.clone(),
        name: node.name.clone(),
        short_description: node.short_description.clone(),
        level: node.level.clone(),
        category: node.category.clone(),
        description: node.description.clone(),
        children: None,
    }
}

fn non_empty(children: Vec<NormalizedNode>) -> Option<Vec<NormalizedNode>> {
    if children.is_empty() {
        None
    } else {
        Some(children)
    }
}
