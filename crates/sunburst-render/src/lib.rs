#![forbid(unsafe_code)]

//! Headless sunburst layout: partition, bounds correction, arc geometry and curved labels.

pub mod arc;
pub mod bounds;
pub mod config;
pub mod hierarchy;
pub mod labels;
pub mod model;
pub mod path;
pub mod reconcile;
pub mod svg;
pub mod text;

pub use crate::config::{BoundsMode, LabelConfig, SunburstConfig};
pub use crate::model::{SegmentLayout, SunburstLayout};

use crate::arc::make_arc;
use crate::bounds::{HasArcBounds, theoretical_bounds};
use crate::hierarchy::{HierarchyLayout, NodeId, Partition, PartitionSize};
use crate::labels::fit_segment_label;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use sunburst_core::{ChartConfig, NormalizedNode, TaxonomyNode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("render environment unavailable: {message}")]
    RenderEnvironment { message: String },
    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },
    #[error(transparent)]
    Core(#[from] sunburst_core::Error),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    pub hierarchy: Arc<dyn HierarchyLayout + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            hierarchy: Arc::new(Partition),
        }
    }
}

/// Normalizes a raw taxonomy and lays it out.
pub fn layout_taxonomy(
    raw: &TaxonomyNode,
    config: &ChartConfig,
    options: &LayoutOptions,
) -> Result<SunburstLayout> {
    let normalized = sunburst_core::normalize(raw);
    layout_sunburst(&normalized, config, options)
}

pub fn layout_sunburst(
    root: &NormalizedNode,
    config: &ChartConfig,
    options: &LayoutOptions,
) -> Result<SunburstLayout> {
    let cfg = SunburstConfig::from_config(config)?;
    layout_with_config(root, &cfg, options)
}

/// Runs one complete layout pass: partition, trailing-edge reconciliation, then per-segment
/// arc paths and labels. Any label failure aborts the whole pass.
pub fn layout_with_config(
    root: &NormalizedNode,
    cfg: &SunburstConfig,
    options: &LayoutOptions,
) -> Result<SunburstLayout> {
    cfg.validate()?;

    let mut tree = options
        .hierarchy
        .layout(root, PartitionSize::full_circle(cfg.radius));
    if tree.is_empty() {
        return Err(Error::InvalidLayout {
            message: "hierarchy layout produced no nodes".to_string(),
        });
    }
    tree.reconcile();

    let max_depth = tree.max_depth();
    let arc = make_arc(cfg.radius);
    let category_index: FxHashMap<NodeId, usize> = tree
        .node(tree.root())
        .children
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();
    let fallback_palette;
    let palette = if cfg.palette.is_empty() {
        fallback_palette = config::default_palette();
        &fallback_palette
    } else {
        &cfg.palette
    };
    let measurer = options.text_measurer.as_ref();

    let mut segments = Vec::with_capacity(tree.len());
    for id in tree.descendants() {
        let n = tree.node(id);
        if n.depth == 0 && !cfg.show_root {
            continue;
        }
        let index = segments.len();
        let theoretical = theoretical_bounds(&tree, id, max_depth, cfg.radius);
        let bounds = match cfg.bounds {
            BoundsMode::Actual => n.arc_bounds(),
            BoundsMode::Theoretical => theoretical,
        };
        let top_category_index = if n.depth == 0 {
            0
        } else {
            category_index
                .get(&tree.ancestor_at_depth(id, 1))
                .copied()
                .unwrap_or(0)
        };
        let label = fit_segment_label(
            &bounds,
            n.data.label_text(),
            &cfg.chart_id,
            index,
            measurer,
            &cfg.labels,
        )?;

        segments.push(SegmentLayout {
            index,
            id: n.data.id.clone(),
            name: n.data.name.clone(),
            depth: n.depth,
            is_synthetic: n.data.is_synthetic(),
            category: n.data.category.clone(),
            top_category_index,
            fill: palette[top_category_index % palette.len()].clone(),
            bounds,
            theoretical,
            path: arc.path(&bounds),
            label,
        });
    }

    tracing::debug!(
        chart_id = %cfg.chart_id,
        segments = segments.len(),
        max_depth,
        "laid out sunburst"
    );

    let extent = cfg.radius + cfg.padding;
    Ok(SunburstLayout {
        chart_id: cfg.chart_id.clone(),
        radius: cfg.radius,
        padding: cfg.padding,
        max_depth,
        center_x: extent,
        center_y: extent,
        width: 2.0 * extent,
        height: 2.0 * extent,
        label_font_family: cfg.labels.font_family.clone(),
        segments,
    })
}
