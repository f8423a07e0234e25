use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sunburst_core::ChartConfig;

pub const DEFAULT_CHART_ID: &str = "sunburst";

pub fn default_palette() -> Vec<String> {
    [
        "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Which bounds segments are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundsMode {
    /// Partition bounds after trailing-edge reconciliation.
    #[default]
    Actual,
    /// Every segment drawn with its theoretical span (single-child ancestor chains).
    Theoretical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Share of the mid-radius arc length usable by one text line.
    pub fill_ratio: f64,
    /// Arc length at which the font reaches `max_font_size`.
    pub max_arc_width: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Radius factor for guide paths of flipped (lower-half) labels.
    pub flip_scale: f64,
    pub unflip_scale: f64,
    pub font_family: Option<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            fill_ratio: 0.9,
            max_arc_width: 250.0,
            min_font_size: 5.0,
            max_font_size: 10.0,
            flip_scale: 1.02,
            unflip_scale: 0.98,
            font_family: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunburstConfig {
    pub chart_id: String,
    pub radius: f64,
    pub padding: f64,
    pub bounds: BoundsMode,
    pub show_root: bool,
    pub palette: Vec<String>,
    pub labels: LabelConfig,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            chart_id: DEFAULT_CHART_ID.to_string(),
            radius: 300.0,
            padding: 10.0,
            bounds: BoundsMode::Actual,
            show_root: false,
            palette: default_palette(),
            labels: LabelConfig::default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Core(sunburst_core::Error::InvalidConfig {
        message: message.into(),
    })
}

impl SunburstConfig {
    /// Extracts the `sunburst.*` settings, falling back to defaults for missing keys.
    pub fn from_config(cfg: &ChartConfig) -> Result<Self> {
        let d = Self::default();
        let ld = LabelConfig::default();

        let bounds = match cfg.get_str("sunburst.bounds") {
            None => d.bounds,
            Some("actual") => BoundsMode::Actual,
            Some("theoretical") => BoundsMode::Theoretical,
            Some(other) => {
                return Err(invalid(format!(
                    "sunburst.bounds must be \"actual\" or \"theoretical\", got {other:?}"
                )));
            }
        };

        let palette = cfg
            .get_str_list("sunburst.palette")
            .filter(|p| !p.is_empty())
            .unwrap_or(d.palette);

        let labels = LabelConfig {
            fill_ratio: cfg
                .get_f64("sunburst.labels.fillRatio")
                .unwrap_or(ld.fill_ratio),
            max_arc_width: cfg
                .get_f64("sunburst.labels.maxArcWidth")
                .unwrap_or(ld.max_arc_width),
            min_font_size: cfg
                .get_f64("sunburst.labels.minFontSize")
                .unwrap_or(ld.min_font_size),
            max_font_size: cfg
                .get_f64("sunburst.labels.maxFontSize")
                .unwrap_or(ld.max_font_size),
            flip_scale: cfg
                .get_f64("sunburst.labels.flipScale")
                .unwrap_or(ld.flip_scale),
            unflip_scale: cfg
                .get_f64("sunburst.labels.unflipScale")
                .unwrap_or(ld.unflip_scale),
            font_family: cfg
                .get_str("sunburst.labels.fontFamily")
                .map(|s| s.to_string()),
        };

        let out = Self {
            chart_id: cfg
                .get_str("sunburst.chartId")
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.to_string())
                .unwrap_or(d.chart_id),
            radius: cfg.get_f64("sunburst.radius").unwrap_or(d.radius),
            padding: cfg.get_f64("sunburst.padding").unwrap_or(d.padding),
            bounds,
            show_root: cfg.get_bool("sunburst.showRoot").unwrap_or(d.show_root),
            palette,
            labels,
        };
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0) {
            return Err(invalid(format!(
                "sunburst.radius must be positive, got {}",
                self.radius
            )));
        }
        if self.padding < 0.0 {
            return Err(invalid("sunburst.padding must not be negative"));
        }
        let l = &self.labels;
        if !(l.min_font_size > 0.0) || l.min_font_size > l.max_font_size {
            return Err(invalid(format!(
                "label font sizes must satisfy 0 < min <= max, got {}..{}",
                l.min_font_size, l.max_font_size
            )));
        }
        if !(l.max_arc_width > 0.0) {
            return Err(invalid("sunburst.labels.maxArcWidth must be positive"));
        }
        Ok(())
    }
}
