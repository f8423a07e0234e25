//! Curved multi-line labels fitted to a ring segment.
//!
//! A label is measured at the font size chosen for its arc, greedily wrapped on spaces, and laid
//! out as one circular guide path per line. Lower-half segments are flipped so text reads upright.

use crate::Result;
use crate::arc::arc_path;
use crate::bounds::ArcBounds;
use crate::config::LabelConfig;
use crate::text::{MeasureScope, TextMeasurer, TextStyle};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelLine {
    pub text: String,
    /// Radius of the guide circle, flip scaling applied.
    pub radius: f64,
    pub path_id: String,
    /// Guide path `d`; runs `x0 -> x1`, or `x1 -> x0` when flipped.
    pub path: String,
    /// `startOffset` of the `<textPath>`, in percent.
    pub start_offset_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLabel {
    pub text: String,
    pub font_size: f64,
    pub flip: bool,
    pub mid_angle: f64,
    pub mid_radius: f64,
    pub arc_length: f64,
    pub allowed_line_length: f64,
    /// In drawing order (innermost guide first).
    pub lines: Vec<LabelLine>,
}

/// True when the mid-angle lies strictly inside the lower half, `(90°, 270°)`.
pub fn is_flipped(mid_angle: f64) -> bool {
    let deg = mid_angle.to_degrees();
    deg > 90.0 && deg < 270.0
}

/// Font size proportional to the arc length, clamped to the configured range.
pub fn font_size_for_arc(arc_length: f64, cfg: &LabelConfig) -> f64 {
    if !arc_length.is_finite() || arc_length <= 0.0 || !(cfg.max_arc_width > 0.0) {
        return cfg.min_font_size;
    }
    let scaled = arc_length / cfg.max_arc_width * cfg.max_font_size;
    scaled.min(cfg.max_font_size).max(cfg.min_font_size)
}

/// Greedy word wrap on single spaces.
///
/// A line grows while its measured width stays within `allowed`; a word that does not fit starts
/// the next line, and a word wider than `allowed` on its own still gets a whole line. Joining the
/// result with `" "` gives back `text`. A non-positive or non-finite budget yields `text` as the
/// only line.
pub fn wrap_label_lines(text: &str, allowed: f64, mut width: impl FnMut(&str) -> f64) -> Vec<String> {
    if !allowed.is_finite() || allowed <= 0.0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current: Option<String> = None;
    for word in text.split(' ') {
        let candidate = match &current {
            Some(line) => format!("{line} {word}"),
            None => word.to_string(),
        };
        if width(&candidate) <= allowed {
            current = Some(candidate);
        } else {
            lines.extend(current.take());
            current = Some(word.to_string());
        }
    }
    lines.extend(current);
    lines
}

/// Percentage along the guide path where the text midpoint is anchored.
fn start_offset_pct(bounds: &ArcBounds, mid_angle: f64, flip: bool) -> f64 {
    let width = bounds.angular_width();
    if !(width > 0.0) {
        return 25.0;
    }
    let along = if flip {
        bounds.x1 - mid_angle
    } else {
        mid_angle - bounds.x0
    };
    along / width * 50.0
}

pub fn guide_path_id(chart_id: &str, segment_index: usize, line_index: usize) -> String {
    format!("labelArc-{chart_id}-{segment_index}-{line_index}")
}

/// Fits `text` onto the segment with the given bounds.
///
/// All measurements happen inside one [`MeasureScope`]; a measurer that cannot open a scope
/// fails the call with [`crate::Error::RenderEnvironment`].
pub fn fit_segment_label(
    bounds: &ArcBounds,
    text: &str,
    chart_id: &str,
    segment_index: usize,
    measurer: &dyn TextMeasurer,
    cfg: &LabelConfig,
) -> Result<SegmentLabel> {
    let mid_angle = bounds.mid_angle();
    let mid_radius = bounds.mid_radius();
    let flip = is_flipped(mid_angle);

    let arc_length = bounds.angular_width() * mid_radius;
    let allowed_line_length = cfg.fill_ratio * arc_length;
    let font_size = font_size_for_arc(arc_length, cfg);

    let style = TextStyle {
        font_family: cfg.font_family.clone(),
        font_size,
        font_weight: None,
    };
    let mut wrapped = {
        let scope = MeasureScope::open(measurer, style)?;
        wrap_label_lines(text, allowed_line_length, |s| scope.width(s))
    };
    if !flip {
        wrapped.reverse();
    }

    let line_height = font_size;
    let first_offset = -((wrapped.len().saturating_sub(1)) as f64 * line_height) / 2.0;
    let scale = if flip { cfg.flip_scale } else { cfg.unflip_scale };
    let offset_pct = start_offset_pct(bounds, mid_angle, flip);
    let (start, end) = if flip {
        (bounds.x1, bounds.x0)
    } else {
        (bounds.x0, bounds.x1)
    };

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(line_index, text)| {
            let radius = scale * (mid_radius + first_offset + line_index as f64 * line_height);
            LabelLine {
                text,
                radius,
                path_id: guide_path_id(chart_id, segment_index, line_index),
                path: arc_path(start, end, radius, radius),
                start_offset_pct: offset_pct,
            }
        })
        .collect::<Vec<_>>();

    tracing::trace!(
        segment = segment_index,
        font_size,
        flip,
        allowed = allowed_line_length,
        lines = lines.len(),
        "fitted label"
    );

    Ok(SegmentLabel {
        text: text.to_string(),
        font_size,
        flip,
        mid_angle,
        mid_radius,
        arc_length,
        allowed_line_length,
        lines,
    })
}
