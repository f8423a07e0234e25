#![forbid(unsafe_code)]

//! `sunburst` turns a competency taxonomy into a headless sunburst chart.
//!
//! The core (always available) holds the taxonomy model, the tree normalizer and chart config.
//!
//! # Features
//!
//! - `render`: layout, curved labels and SVG output (`sunburst::render`)
//! - `raster`: PNG/PDF output via pure-Rust SVG rasterization/conversion

pub use sunburst_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use sunburst_render::hierarchy::{HierarchyLayout, Partition};
    pub use sunburst_render::model::{SegmentLayout, SunburstLayout};
    pub use sunburst_render::svg::{SvgRenderOptions, render_sunburst_svg};
    pub use sunburst_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use sunburst_render::{
        BoundsMode, LabelConfig, LayoutOptions, SunburstConfig, layout_sunburst, layout_taxonomy,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    use sunburst_core::{ChartConfig, TaxonomyNode};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] sunburst_core::Error),
        #[error(transparent)]
        Render(#[from] sunburst_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative chart id.
    ///
    /// The chart id prefixes every label guide id (`labelArc-<id>-...`), so it must be a valid
    /// XML id token when several charts share one document. Unsupported characters become `-`,
    /// and ids not starting with an ASCII letter get an `s-` prefix.
    pub fn sanitize_chart_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "s-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "s-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "s" {
            return "s-untitled".to_string();
        }
        out.to_string()
    }

    /// Parses a taxonomy JSON document, normalizes it and lays it out.
    pub fn layout_json_sync(
        json: &str,
        config: &ChartConfig,
        layout_options: &LayoutOptions,
    ) -> Result<SunburstLayout> {
        let raw = TaxonomyNode::from_json_str(json)?;
        Ok(layout_taxonomy(&raw, config, layout_options)?)
    }

    /// Synchronous SVG render helper: taxonomy JSON in, SVG text out.
    pub fn render_svg_sync(
        json: &str,
        config: &ChartConfig,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_json_sync(json, config, layout_options)?;
        Ok(render_sunburst_svg(&layout, svg_options))
    }

    /// Bundles chart config and options for repeated headless renders.
    #[derive(Clone, Default)]
    pub struct HeadlessRenderer {
        pub config: ChartConfig,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: ChartConfig) -> Self {
            self.config = config;
            self
        }

        /// Sets `sunburst.chartId` (sanitized) so several charts can share one page.
        pub fn with_chart_id(mut self, chart_id: &str) -> Self {
            self.config.set_value(
                "sunburst.chartId",
                sanitize_chart_id(chart_id).into(),
            );
            self
        }

        pub fn layout_sync(&self, json: &str) -> Result<SunburstLayout> {
            layout_json_sync(json, &self.config, &self.layout)
        }

        pub fn render_svg_sync(&self, json: &str) -> Result<String> {
            render_svg_sync(json, &self.config, &self.layout, &self.svg)
        }
    }
}
