//! Minimal SVG path builder following `d3-path` output conventions.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

const EPSILON: f64 = 1e-6;
const TAU_EPSILON: f64 = TAU - EPSILON;

#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    out: String,
    // Start of the current subpath.
    start: Option<(f64, f64)>,
    // Current point.
    current: Option<(f64, f64)>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(&mut self.out, "M{},{}", fmt_path(x), fmt_path(y));
        self.start = Some((x, y));
        self.current = Some((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(&mut self.out, "L{},{}", fmt_path(x), fmt_path(y));
        self.current = Some((x, y));
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.current = self.start;
            self.out.push('Z');
        }
    }

    /// Circular arc centred on `(x, y)` from angle `a0` to `a1` (radians, standard SVG axes).
    pub fn arc(&mut self, x: f64, y: f64, r: f64, a0: f64, a1: f64, ccw: bool) {
        let r = r.max(0.0);
        let dx = r * a0.cos();
        let dy = r * a0.sin();
        let x0 = x + dx;
        let y0 = y + dy;
        let cw = if ccw { 0 } else { 1 };
        let mut da = if ccw { a0 - a1 } else { a1 - a0 };

        match self.current {
            None => {
                let _ = write!(&mut self.out, "M{},{}", fmt_path(x0), fmt_path(y0));
                self.start = Some((x0, y0));
            }
            Some((cx, cy)) if (cx - x0).abs() > EPSILON || (cy - y0).abs() > EPSILON => {
                let _ = write!(&mut self.out, "L{},{}", fmt_path(x0), fmt_path(y0));
            }
            Some(_) => {}
        }
        self.current = Some((x0, y0));

        if r == 0.0 {
            return;
        }

        if da < 0.0 {
            da = da % TAU + TAU;
        }

        let r_s = fmt_path(r);
        if da > TAU_EPSILON {
            // Full circle: two half arcs through the antipode.
            let _ = write!(
                &mut self.out,
                "A{r},{r},0,1,{cw},{mx},{my}A{r},{r},0,1,{cw},{x0},{y0}",
                r = r_s,
                cw = cw,
                mx = fmt_path(x - dx),
                my = fmt_path(y - dy),
                x0 = fmt_path(x0),
                y0 = fmt_path(y0),
            );
        } else if da > EPSILON {
            let x1 = x + r * a1.cos();
            let y1 = y + r * a1.sin();
            let large = if da >= PI { 1 } else { 0 };
            let _ = write!(
                &mut self.out,
                "A{r},{r},0,{large},{cw},{x1},{y1}",
                r = r_s,
                large = large,
                cw = cw,
                x1 = fmt_path(x1),
                y1 = fmt_path(y1),
            );
            self.current = Some((x1, y1));
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub fn fmt_path(v: f64) -> String {
    // D3's `d3-path` rounds path coordinates to 3 fractional digits (`Math.round(x * 1000) / 1000`).
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.abs() < 0.0005 {
        return "0".to_string();
    }

    let scaled = v * 1000.0;
    let mut r = (scaled + 0.5).floor() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }

    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_path_rounds_to_three_digits() {
        assert_eq!(fmt_path(1.0), "1");
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(-0.0001), "0");
        assert_eq!(fmt_path(-2.5), "-2.5");
        assert_eq!(fmt_path(f64::NAN), "0");
    }

    #[test]
    fn quarter_arc_from_origin_less_builder() {
        let mut p = PathBuilder::new();
        p.arc(0.0, 0.0, 10.0, 0.0, PI / 2.0, false);
        assert_eq!(p.finish(), "M10,0A10,10,0,0,1,0,10");
    }

    #[test]
    fn full_circle_is_two_half_arcs() {
        let mut p = PathBuilder::new();
        p.arc(0.0, 0.0, 5.0, 0.0, TAU, false);
        assert_eq!(p.finish(), "M5,0A5,5,0,1,1,-5,0A5,5,0,1,1,5,0");
    }

    #[test]
    fn arc_connects_from_current_point_with_a_line() {
        let mut p = PathBuilder::new();
        p.move_to(0.0, 0.0);
        p.arc(0.0, 0.0, 4.0, 0.0, PI, true);
        p.close_path();
        assert_eq!(p.finish(), "M0,0L4,0A4,4,0,1,0,-4,0Z");
    }
}
