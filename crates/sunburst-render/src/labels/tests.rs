use super::*;
use crate::Error;
use crate::text::{DeterministicTextMeasurer, TextMetrics, UnavailableTextMeasurer};
use std::cell::Cell;
use std::f64::consts::{FRAC_PI_2, PI};

fn char_count(s: &str) -> f64 {
    s.chars().count() as f64
}

fn bounds(x0: f64, x1: f64, y0: f64, y1: f64) -> ArcBounds {
    ArcBounds { x0, x1, y0, y1 }
}

#[derive(Default)]
struct ScopeCounter {
    opened: Cell<usize>,
    closed: Cell<usize>,
    measured: Cell<usize>,
}

impl TextMeasurer for ScopeCounter {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        self.measured.set(self.measured.get() + 1);
        DeterministicTextMeasurer::default().measure(text, style)
    }

    fn begin_scope(&self, _style: &TextStyle) -> crate::Result<()> {
        self.opened.set(self.opened.get() + 1);
        Ok(())
    }

    fn end_scope(&self) {
        self.closed.set(self.closed.get() + 1);
    }
}

#[test]
fn font_size_follows_arc_length_within_bounds() {
    let cfg = LabelConfig::default();
    assert_eq!(font_size_for_arc(500.0, &cfg), 10.0);
    assert_eq!(font_size_for_arc(25.0, &cfg), 5.0);
    assert!((font_size_for_arc(200.0, &cfg) - 8.0).abs() < 1e-9);
    assert_eq!(font_size_for_arc(0.0, &cfg), 5.0);
    assert_eq!(font_size_for_arc(f64::NAN, &cfg), 5.0);
    assert_eq!(font_size_for_arc(-3.0, &cfg), 5.0);
}

#[test]
fn flip_covers_the_open_lower_half() {
    assert!(!is_flipped(0.45 * PI));
    assert!(is_flipped(0.55 * PI));
    assert!(is_flipped(PI));
    assert!(is_flipped(1.45 * PI));
    assert!(!is_flipped(1.55 * PI));
    assert!(!is_flipped(0.0));
}

#[test]
fn wrap_breaks_greedily_and_rejoins_to_the_input() {
    let text = "Gestion des pannes moteur";
    let lines = wrap_label_lines(text, 12.0, char_count);
    assert_eq!(lines, vec!["Gestion des", "pannes", "moteur"]);
    assert_eq!(lines.join(" "), text);
    for line in &lines {
        assert!(char_count(line) <= 12.0, "{line}");
    }
}

#[test]
fn overlong_word_keeps_its_own_line() {
    let text = "a supercalifragilistic b";
    let lines = wrap_label_lines(text, 5.0, char_count);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn repeated_spaces_survive_wrapping() {
    let text = "un  deux trois";
    let lines = wrap_label_lines(text, 100.0, char_count);
    assert_eq!(lines, vec![text]);
    let lines = wrap_label_lines(text, 4.0, char_count);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn non_positive_budget_yields_the_whole_text() {
    for allowed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert_eq!(
            wrap_label_lines("trop long pour ici", allowed, char_count),
            vec!["trop long pour ici"]
        );
    }
    assert_eq!(wrap_label_lines("", 10.0, char_count), vec![""]);
}

#[test]
fn upper_segment_label_reads_clockwise() {
    let m = DeterministicTextMeasurer::default();
    let cfg = LabelConfig::default();
    let b = bounds(0.0, FRAC_PI_2, 100.0, 200.0);
    let label = fit_segment_label(&b, "Communication", "cat", 3, &m, &cfg).unwrap();

    assert!(!label.flip);
    assert_eq!(label.mid_radius, 150.0);
    assert!((label.arc_length - FRAC_PI_2 * 150.0).abs() < 1e-9);
    assert!((label.allowed_line_length - 0.9 * label.arc_length).abs() < 1e-9);
    assert_eq!(label.lines.len(), 1);

    let line = &label.lines[0];
    assert_eq!(line.text, "Communication");
    assert_eq!(line.path_id, "labelArc-cat-3-0");
    assert!((line.radius - 147.0).abs() < 1e-9);
    assert!(line.path.starts_with("M0,-147A147,147,0,0,1,147,0"), "{}", line.path);
    assert!((line.start_offset_pct - 25.0).abs() < 1e-9);
}

#[test]
fn line_order_depends_on_flip() {
    let m = DeterministicTextMeasurer::default();
    let cfg = LabelConfig::default();
    let text = "Prise de décision en situation dégradée et gestion des ressources";

    // Narrow segments so the text wraps.
    let upper = bounds(0.1, 0.5, 80.0, 120.0);
    let lower = bounds(PI - 0.2, PI + 0.2, 80.0, 120.0);

    for (b, flipped) in [(upper, false), (lower, true)] {
        let label = fit_segment_label(&b, text, "c", 0, &m, &cfg).unwrap();
        assert_eq!(label.flip, flipped);
        let style = TextStyle {
            font_size: label.font_size,
            ..Default::default()
        };
        let mut expected = wrap_label_lines(text, label.allowed_line_length, |s| {
            m.measure(s, &style).width
        });
        assert!(expected.len() > 1);
        if !flipped {
            expected.reverse();
        }
        let got: Vec<&str> = label.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn stacked_lines_center_on_the_mid_radius() {
    let m = DeterministicTextMeasurer::default();
    let cfg = LabelConfig::default();
    let b = bounds(PI - 0.2, PI + 0.2, 80.0, 120.0);
    let label = fit_segment_label(&b, "un deux trois quatre cinq six sept huit", "c", 7, &m, &cfg)
        .unwrap();
    assert!(label.flip);
    let n = label.lines.len();
    assert!(n >= 2);
    let f = label.font_size;
    for (i, line) in label.lines.iter().enumerate() {
        let unscaled = 100.0 - (n - 1) as f64 * f / 2.0 + i as f64 * f;
        assert!((line.radius - 1.02 * unscaled).abs() < 1e-9);
        assert_eq!(line.path_id, format!("labelArc-c-7-{i}"));
        // Flipped guides run from x1 back to x0.
        assert_eq!(line.path, arc_path(b.x1, b.x0, line.radius, line.radius));
        assert!((line.start_offset_pct - 25.0).abs() < 1e-9);
    }
}

#[test]
fn zero_width_segment_still_gets_a_label() {
    let m = DeterministicTextMeasurer::default();
    let cfg = LabelConfig::default();
    let label = fit_segment_label(&bounds(1.0, 1.0, 10.0, 20.0), "Vide", "c", 0, &m, &cfg).unwrap();
    assert_eq!(label.font_size, 5.0);
    assert_eq!(label.lines.len(), 1);
    assert_eq!(label.lines[0].text, "Vide");
    assert_eq!(label.lines[0].start_offset_pct, 25.0);
}

#[test]
fn measurement_scope_wraps_each_segment() {
    let m = ScopeCounter::default();
    let cfg = LabelConfig::default();
    let b = bounds(0.0, 1.0, 50.0, 100.0);
    fit_segment_label(&b, "alpha beta gamma", "c", 0, &m, &cfg).unwrap();
    fit_segment_label(&b, "delta", "c", 1, &m, &cfg).unwrap();
    assert_eq!(m.opened.get(), 2);
    assert_eq!(m.closed.get(), 2);
    assert!(m.measured.get() >= 4);
}

#[test]
fn missing_measurement_backend_aborts() {
    let err = fit_segment_label(
        &bounds(0.0, 1.0, 50.0, 100.0),
        "x",
        "c",
        0,
        &UnavailableTextMeasurer,
        &LabelConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::RenderEnvironment { .. }));
}
