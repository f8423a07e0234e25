use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 10.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// Measures rendered text extents.
///
/// Measurement may need a temporary resource (a hidden text element, a shaped font face, ...).
/// Label fitting brackets all measurements of one segment between [`TextMeasurer::begin_scope`]
/// and [`TextMeasurer::end_scope`] through [`MeasureScope`]; implementations without such a
/// resource keep the no-op defaults.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Acquires the measurement resource for `style`. An error here means the environment cannot
    /// measure text at all and aborts the render pass.
    fn begin_scope(&self, _style: &TextStyle) -> Result<()> {
        Ok(())
    }

    /// Releases what `begin_scope` acquired. Called exactly once per successful `begin_scope`.
    fn end_scope(&self) {}
}

/// RAII guard over one measurement scope; the resource is released on drop, including on early
/// returns and unwinding.
pub struct MeasureScope<'a> {
    measurer: &'a dyn TextMeasurer,
    style: TextStyle,
}

impl<'a> MeasureScope<'a> {
    pub fn open(measurer: &'a dyn TextMeasurer, style: TextStyle) -> Result<Self> {
        measurer.begin_scope(&style)?;
        Ok(Self { measurer, style })
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn width(&self, text: &str) -> f64 {
        self.measurer.measure(text, &self.style).width
    }
}

impl Drop for MeasureScope<'_> {
    fn drop(&mut self) {
        self.measurer.end_scope();
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<String> {
        let out = text.split('\n').map(|s| s.to_string()).collect::<Vec<_>>();
        if out.is_empty() {
            return vec!["".to_string()];
        }
        out
    }

    /// Display columns of a line: East Asian wide characters count twice, combining marks zero.
    pub fn line_columns(line: &str) -> usize {
        line.chars().map(|ch| ch.width().unwrap_or(0)).sum()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let mut max_cols = 0usize;
        for line in &lines {
            max_cols = max_cols.max(Self::line_columns(line));
        }

        let width = max_cols as f64 * font_size * char_width_factor;
        let height = lines.len() as f64 * font_size * line_height_factor;
        TextMetrics {
            width,
            height,
            line_count: lines.len(),
        }
    }
}

/// Stand-in for an environment with no way to measure text (no font database, no DOM).
#[derive(Debug, Clone, Default)]
pub struct UnavailableTextMeasurer;

impl TextMeasurer for UnavailableTextMeasurer {
    fn measure(&self, _text: &str, style: &TextStyle) -> TextMetrics {
        TextMetrics {
            width: 0.0,
            height: style.font_size,
            line_count: 1,
        }
    }

    fn begin_scope(&self, _style: &TextStyle) -> Result<()> {
        Err(Error::RenderEnvironment {
            message: "no text measurement backend is available".to_string(),
        })
    }
}
