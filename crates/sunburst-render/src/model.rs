use crate::bounds::{ArcBounds, HasArcBounds};
use crate::labels::SegmentLabel;
use serde::{Deserialize, Serialize};

/// A laid-out sunburst, ready to be serialized or drawn.
///
/// Coordinates of segments and guide paths are relative to the chart centre
/// (`center_x`, `center_y`) inside a `width` x `height` canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunburstLayout {
    pub chart_id: String,
    pub radius: f64,
    pub padding: f64,
    /// Height of the normalized tree (number of rings below the root).
    pub max_depth: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// Font family labels were measured with, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_font_family: Option<String>,
    pub segments: Vec<SegmentLayout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentLayout {
    /// Position in drawing order; also the segment part of label guide ids.
    pub index: usize,
    pub id: Option<String>,
    pub name: String,
    pub depth: usize,
    pub is_synthetic: bool,
    pub category: Option<String>,
    /// Index of the depth-1 ancestor among the categories (0 for the root).
    pub top_category_index: usize,
    pub fill: String,
    /// Bounds the segment is drawn with.
    pub bounds: ArcBounds,
    pub theoretical: ArcBounds,
    pub path: String,
    pub label: SegmentLabel,
}

impl HasArcBounds for SegmentLayout {
    fn arc_bounds(&self) -> ArcBounds {
        self.bounds
    }
}

impl SunburstLayout {
    pub fn segments_at_depth(&self, depth: usize) -> impl Iterator<Item = &SegmentLayout> + '_ {
        self.segments.iter().filter(move |s| s.depth == depth)
    }
}
