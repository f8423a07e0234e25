use crate::model::{SegmentLayout, SunburstLayout};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Overrides the layout's chart id for the root `<svg id>`; guide ids are never rewritten.
    pub diagram_id: Option<String>,
    /// Font family for label text. A family the labels were measured with takes precedence.
    pub font_family: String,
    /// Segment outline colour.
    pub stroke: String,
    /// Optional CSS background colour for the root element.
    pub background: Option<String>,
    /// When true, emit a `<title>` per segment (hover text in browsers).
    pub include_titles: bool,
    /// When false, only the arcs are drawn.
    pub include_labels: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            stroke: "#ffffff".to_string(),
            background: None,
            include_titles: true,
            include_labels: true,
        }
    }
}

fn sunburst_css(id: &str, font_family: &str, stroke: &str) -> String {
    format!(
        "#{id} .segment path.arc{{stroke:{stroke};stroke-width:1px;}}\
#{id} .segment.tampon path.arc{{stroke-dasharray:3 2;}}\
#{id} .donutText{{fill:#1f1f1f;font-family:{font_family};pointer-events:none;}}\
#{id} .segment:hover path.arc{{opacity:0.85;}}"
    )
}

/// Outer rings fade so the hierarchy stays readable.
fn depth_opacity(depth: usize) -> f64 {
    (1.0 - 0.15 * depth.saturating_sub(1) as f64).max(0.4)
}

pub fn render_sunburst_svg(layout: &SunburstLayout, options: &SvgRenderOptions) -> String {
    let diagram_id = options
        .diagram_id
        .as_deref()
        .unwrap_or(layout.chart_id.as_str());
    let diagram_id_esc = escape_xml(diagram_id);

    let w = layout.width.max(1.0);
    let h = layout.height.max(1.0);
    let background = options
        .background
        .as_deref()
        .map(|bg| format!(r#" style="background-color: {};""#, escape_xml(bg)))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" class="sunburst" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {w} {h}"{background} role="graphics-document document" aria-roledescription="sunburst">"#,
        id = diagram_id_esc,
        w = fmt(w),
        h = fmt(h),
        background = background,
    );

    let font_family = layout
        .label_font_family
        .as_deref()
        .unwrap_or(options.font_family.as_str());
    let css = sunburst_css(
        &diagram_id_esc,
        &escape_xml(font_family),
        &escape_xml(&options.stroke),
    );
    let _ = write!(&mut out, r#"<style>{css}</style>"#);

    let _ = write!(
        &mut out,
        r#"<g transform="translate({x},{y})">"#,
        x = fmt(layout.center_x),
        y = fmt(layout.center_y)
    );
    for segment in &layout.segments {
        render_segment(&mut out, segment, options);
    }
    out.push_str("</g></svg>");
    out
}

fn render_segment(out: &mut String, segment: &SegmentLayout, options: &SvgRenderOptions) {
    let class = if segment.is_synthetic {
        "segment tampon"
    } else {
        "segment"
    };
    let _ = write!(
        out,
        r#"<g class="{class}" data-depth="{depth}""#,
        depth = segment.depth
    );
    if let Some(id) = segment.id.as_deref() {
        let _ = write!(out, r#" data-id="{}""#, escape_xml(id));
    }
    out.push('>');

    if options.include_titles {
        let _ = write!(out, "<title>{}</title>", escape_xml(&segment.name));
    }
    let _ = write!(
        out,
        r#"<path class="arc" d="{d}" fill="{fill}" fill-opacity="{opacity}"/>"#,
        d = segment.path,
        fill = escape_xml(&segment.fill),
        opacity = fmt(depth_opacity(segment.depth)),
    );

    if options.include_labels {
        let label = &segment.label;
        for line in &label.lines {
            let path_id = escape_xml(&line.path_id);
            let _ = write!(
                out,
                r#"<path id="{path_id}" d="{d}" fill="none" stroke="none"/>"#,
                d = line.path,
            );
            let _ = write!(
                out,
                r##"<text class="donutText" font-size="{size}px"><textPath xlink:href="#{path_id}" startOffset="{offset}%" style="text-anchor: middle;">{text}</textPath></text>"##,
                size = fmt(label.font_size),
                offset = fmt(line.start_offset_pct),
                text = escape_xml(&line.text),
            );
        }
    }

    out.push_str("</g>");
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` or float noise near integers.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_drops_float_noise() {
        assert_eq!(fmt(620.0), "620");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(9.999_999_9), "10");
        assert_eq!(fmt(25.5), "25.5");
        assert_eq!(fmt(f64::INFINITY), "0");
    }

    #[test]
    fn escape_xml_covers_markup_and_quotes() {
        assert_eq!(
            escape_xml(r#"Sécurité & <"vol">"#),
            "Sécurité &amp; &lt;&quot;vol&quot;&gt;"
        );
    }

    #[test]
    fn opacity_fades_with_depth_down_to_a_floor() {
        assert_eq!(depth_opacity(1), 1.0);
        assert!((depth_opacity(2) - 0.85).abs() < 1e-12);
        assert_eq!(depth_opacity(10), 0.4);
    }
}
