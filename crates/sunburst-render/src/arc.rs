use crate::bounds::HasArcBounds;
use crate::path::PathBuilder;
use std::f64::consts::{FRAC_PI_2, TAU};

const EPSILON: f64 = 1e-6;

/// Reusable arc shape: maps a segment's bounds to an SVG path (`x0`/`x1` are start/end angles,
/// `y0`/`y1` inner/outer radii).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcFn {
    radius: f64,
}

pub fn make_arc(radius: f64) -> ArcFn {
    ArcFn {
        radius: if radius.is_finite() { radius.max(0.0) } else { 0.0 },
    }
}

impl ArcFn {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn path(&self, segment: &impl HasArcBounds) -> String {
        let b = segment.arc_bounds();
        let clamp = |r: f64| r.clamp(0.0, self.radius);
        arc_path(b.x0, b.x1, clamp(b.y0), clamp(b.y1))
    }

    /// Point at the middle of the segment, in chart coordinates (y grows downwards).
    pub fn centroid(&self, segment: &impl HasArcBounds) -> (f64, f64) {
        let b = segment.arc_bounds();
        let r = (b.y0 + b.y1) / 2.0;
        let a = b.mid_angle() - FRAC_PI_2;
        (a.cos() * r, a.sin() * r)
    }
}

/// Annular sector path matching d3-shape's `arc()` without corner radius or padding.
///
/// Angles are measured clockwise from 12 o'clock; `end < start` draws counter-clockwise.
pub fn arc_path(start_angle: f64, end_angle: f64, inner_radius: f64, outer_radius: f64) -> String {
    let mut r0 = inner_radius.max(0.0);
    let mut r1 = outer_radius.max(0.0);
    let a0 = start_angle - FRAC_PI_2;
    let a1 = end_angle - FRAC_PI_2;
    let da = (a1 - a0).abs();
    let cw = a1 > a0;

    if r1 < r0 {
        std::mem::swap(&mut r0, &mut r1);
    }

    let mut p = PathBuilder::new();

    if !(r1 > EPSILON) {
        p.move_to(0.0, 0.0);
    } else if da > TAU - EPSILON {
        p.move_to(r1 * a0.cos(), r1 * a0.sin());
        p.arc(0.0, 0.0, r1, a0, a1, !cw);
        if r0 > EPSILON {
            p.move_to(r0 * a1.cos(), r0 * a1.sin());
            p.arc(0.0, 0.0, r0, a1, a0, cw);
        }
    } else {
        p.move_to(r1 * a0.cos(), r1 * a0.sin());
        if da > EPSILON {
            p.arc(0.0, 0.0, r1, a0, a1, !cw);
        }
        if !(r0 > EPSILON) || !(da > EPSILON) {
            p.line_to(r0 * a1.cos(), r0 * a1.sin());
        } else {
            p.arc(0.0, 0.0, r0, a1, a0, cw);
        }
    }

    p.close_path();
    p.finish()
}
