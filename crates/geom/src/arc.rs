//! Elliptic arc related maths and tools.

use crate::utils::{clamp, deg_to_rad, round9};
use crate::{point, Point, Vector};
use arrayvec::ArrayVec;
use core::f64::consts::PI;
use num_traits::Float;

// Arcs are cut in chunks of at most this many radians before being approximated.
const MAX_CHUNK_ANGLE: f64 = PI * 120.0 / 180.0;
// A sweep is at most a full turn, plus rounding.
const MAX_CHUNKS: usize = 4;

/// Flag parameters for arcs as described by the SVG specification.
///
/// For most situations using the SVG arc notation, there are four different arcs
/// (two different ellipses, each with two different arc sweeps) that satisfy the
/// arc parameters. The `large_arc` and `sweep` flags indicate which one of the
/// four arcs are drawn.
///
/// See more examples in the [SVG specification](https://svgwg.org/specs/paths/)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    /// Of the four candidate arc sweeps, two will represent an arc sweep of greater
    /// than or equal to 180 degrees (the "large-arc"), and two will represent an arc
    /// sweep of less than or equal to 180 degrees (the "small arc"). If `large_arc`
    /// is `true`, then one of the two larger arc sweeps will be chosen; otherwise, if
    /// `large_arc` is `false`, one of the smaller arc sweeps will be chosen.
    pub large_arc: bool,
    /// If `sweep` is `true`, then the arc will be drawn in a "positive-angle" direction
    /// (the angle increases from the start point to the end point).
    pub sweep: bool,
}

/// An elliptic arc curve segment using the SVG notation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc {
    pub from: Point,
    pub to: Point,
    pub radii: Vector,
    /// Rotation of the ellipse's x axis, in degrees.
    pub x_rotation: f64,
    pub flags: ArcFlags,
}

impl SvgArc {
    /// An arc with a zero radius is drawn as a straight line.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x == 0.0 || self.radii.y == 0.0
    }

    /// Approximates the arc with a sequence of cubic bézier curves.
    ///
    /// The callback receives the two control points and the end point of each curve,
    /// the first curve starting at `self.from`. The last end point is exactly `self.to`.
    ///
    /// A straight-line arc produces a single degenerate curve `(from, to, to)`, an arc
    /// that ends where it starts produces nothing. Radii too small to join the endpoints
    /// are scaled up uniformly until they do.
    pub fn for_each_cubic<F>(&self, cb: &mut F)
    where
        F: FnMut(Point, Point, Point),
    {
        if self.from == self.to {
            return;
        }
        if self.is_straight_line() {
            cb(self.from, self.to, self.to);
            return;
        }

        let (sin_rot, cos_rot) = deg_to_rad(self.x_rotation).sin_cos();
        // Work in the ellipse's frame, where its axes are aligned with x and y.
        let to_local = |p: Point| {
            point(
                p.x * cos_rot + p.y * sin_rot,
                -p.x * sin_rot + p.y * cos_rot,
            )
        };
        let to_global = |x: f64, y: f64| point(x * cos_rot - y * sin_rot, x * sin_rot + y * cos_rot);

        let p1 = to_local(self.from);
        let p2 = to_local(self.to);
        let (x1, y1) = (p1.x, p1.y);
        let (x2, y2) = (p2.x, p2.y);

        let x = (x1 - x2) / 2.0;
        let y = (y1 - y2) / 2.0;
        let mut rx = self.radii.x.abs();
        let mut ry = self.radii.y.abs();
        // Half chord in units of the radii; squaring huge radii would overflow.
        let mut a = x / rx;
        let mut b = y / ry;
        let h = a * a + b * b;
        if h > 1.0 {
            let h = h.sqrt();
            rx *= h;
            ry *= h;
            a = x / rx;
            b = y / ry;
        }

        let sign = if self.flags.large_arc == self.flags.sweep { -1.0 } else { 1.0 };
        let d = a * a + b * b;
        let k = sign * ((1.0 - d) / d).abs().sqrt();
        let cx = k * rx * b + (x1 + x2) / 2.0;
        let cy = -k * ry * a + (y1 + y2) / 2.0;

        let angle_of = |px: f64, py: f64| {
            let mut f = clamp(round9((py - cy) / ry), -1.0, 1.0).0.asin();
            if px < cx {
                f = PI - f;
            }
            if f < 0.0 {
                f += 2.0 * PI;
            }
            f
        };
        let mut f1 = angle_of(x1, y1);
        let mut f2 = angle_of(x2, y2);
        if self.flags.sweep && f1 > f2 {
            f1 -= 2.0 * PI;
        }
        if !self.flags.sweep && f2 > f1 {
            f2 -= 2.0 * PI;
        }

        // Radii so large or so small that the ellipse can't be resolved.
        if ![rx, ry, cx, cy, f1, f2].iter().all(|v| v.is_finite()) {
            cb(self.from, self.to, self.to);
            return;
        }

        let (mut sx, mut sy) = (x1, y1);
        for chunk in 0..MAX_CHUNKS {
            let last = (f2 - f1).abs() <= MAX_CHUNK_ANGLE || chunk + 1 == MAX_CHUNKS;
            let (chunk_end, ex, ey) = if last {
                (f2, x2, y2)
            } else {
                let dir = if self.flags.sweep && f2 > f1 { 1.0 } else { -1.0 };
                let f = f1 + MAX_CHUNK_ANGLE * dir;
                (f, cx + rx * f.cos(), cy + ry * f.sin())
            };

            let t = ((chunk_end - f1) / 4.0).tan();
            let hx = 4.0 / 3.0 * rx * t;
            let hy = 4.0 / 3.0 * ry * t;
            let (s1, c1) = f1.sin_cos();
            let (s2, c2) = chunk_end.sin_cos();

            let ctrl1 = to_global(sx - hx * s1, sy + hy * c1);
            let ctrl2 = to_global(ex + hx * s2, ey - hy * c2);
            if last {
                cb(ctrl1, ctrl2, self.to);
                return;
            }
            cb(ctrl1, ctrl2, to_global(ex, ey));

            f1 = chunk_end;
            sx = ex;
            sy = ey;
        }
    }
}

/// Control points and end point of the cubic curves approximating an arc.
pub type ArcCubics = ArrayVec<[Point; 3], 4>;

/// Approximates the arc going from `from` to `to` with cubic bézier curves.
///
/// See [`SvgArc::for_each_cubic`].
pub fn svg_arc_to_cubic_curves(
    from: Point,
    to: Point,
    radii: Vector,
    x_rotation: f64,
    flags: ArcFlags,
) -> ArcCubics {
    let arc = SvgArc {
        from,
        to,
        radii,
        x_rotation,
        flags,
    };
    let mut curves = ArcCubics::new();
    arc.for_each_cubic(&mut |ctrl1, ctrl2, to| {
        let pushed = curves.try_push([ctrl1, ctrl2, to]);
        debug_assert!(pushed.is_ok(), "more than {} arc chunks", MAX_CHUNKS);
    });

    curves
}

#[cfg(test)]
use crate::{cubic_bezier::CubicCurve2D, vector};
#[cfg(test)]
use approx::assert_relative_eq;

#[cfg(test)]
fn collect_cubics(arc: &SvgArc) -> std::vec::Vec<CubicCurve2D> {
    let mut from = arc.from;
    let mut curves = std::vec::Vec::new();
    arc.for_each_cubic(&mut |ctrl1, ctrl2, to| {
        curves.push(CubicCurve2D::new(from, ctrl1, ctrl2, to));
        from = to;
    });
    curves
}

#[test]
fn quarter_circle() {
    let arc = SvgArc {
        from: point(10.0, 0.0),
        to: point(0.0, 10.0),
        radii: vector(10.0, 10.0),
        x_rotation: 0.0,
        flags: ArcFlags { large_arc: false, sweep: true },
    };
    let curves = collect_cubics(&arc);
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].to(), point(0.0, 10.0));

    let mid = curves[0].sample(0.5);
    assert_relative_eq!(mid.x, 50.0f64.sqrt(), epsilon = 1e-3);
    assert_relative_eq!(mid.y, 50.0f64.sqrt(), epsilon = 1e-3);
}

#[test]
fn half_circle_is_split() {
    let arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(20.0, 0.0),
        radii: vector(10.0, 10.0),
        x_rotation: 0.0,
        flags: ArcFlags { large_arc: false, sweep: true },
    };
    let curves = collect_cubics(&arc);
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[1].to(), point(20.0, 0.0));
    let joint = curves[0].to();
    assert_relative_eq!((joint - point(10.0, 0.0)).length(), 10.0, epsilon = 1e-9);
}

#[test]
fn small_radii_are_scaled() {
    let arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
        radii: vector(1.0, 1.0),
        x_rotation: 0.0,
        flags: ArcFlags { large_arc: false, sweep: true },
    };
    let curves = collect_cubics(&arc);
    assert_eq!(curves.len(), 2);
    let joint = curves[0].to();
    assert_relative_eq!((joint - point(5.0, 0.0)).length(), 5.0, epsilon = 1e-9);
}

#[test]
fn rotated_arc_ends_exactly() {
    let arc = SvgArc {
        from: point(1.0, 2.0),
        to: point(30.0, -7.5),
        radii: vector(20.0, 8.0),
        x_rotation: 30.0,
        flags: ArcFlags { large_arc: true, sweep: false },
    };
    let curves = collect_cubics(&arc);
    assert!(curves.len() >= 2);
    assert_eq!(curves.last().map(|c| c.to()), Some(point(30.0, -7.5)));
}

#[test]
fn degenerate_arcs() {
    let mut arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
        radii: vector(0.0, 5.0),
        x_rotation: 0.0,
        flags: ArcFlags::default(),
    };
    assert!(arc.is_straight_line());
    let curves = collect_cubics(&arc);
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].ctrl1(), point(0.0, 0.0));
    assert_eq!(curves[0].ctrl2(), point(10.0, 0.0));

    arc.radii = vector(5.0, 5.0);
    arc.to = arc.from;
    assert!(collect_cubics(&arc).is_empty());
}

#[test]
fn cubic_curves_array() {
    let curves = svg_arc_to_cubic_curves(
        point(10.0, 0.0),
        point(-10.0, 0.0),
        vector(10.0, 10.0),
        0.0,
        ArcFlags { large_arc: true, sweep: true },
    );
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[1][2], point(-10.0, 0.0));
}

#[test]
fn huge_radii_terminate() {
    let flags = ArcFlags { large_arc: false, sweep: true };
    for radius in &[1.0e150, 1.0e200, f64::MAX, f64::INFINITY] {
        let curves = svg_arc_to_cubic_curves(
            point(0.0, 0.0),
            point(10.0, 0.0),
            vector(*radius, *radius),
            0.0,
            flags,
        );
        assert!(!curves.is_empty(), "radius {}", radius);
        assert!(curves.len() <= 4);
        assert_eq!(curves.last().map(|c| c[2]), Some(point(10.0, 0.0)));
        for p in curves.iter().flatten() {
            assert!(p.x.is_finite() && p.y.is_finite(), "radius {}: {:?}", radius, p);
        }
    }

    // Too flat to resolve, drawn as a line.
    let curves = svg_arc_to_cubic_curves(
        point(0.0, 0.0),
        point(10.0, 0.0),
        vector(1.0e200, 1.0e200),
        0.0,
        flags,
    );
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0], [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 0.0)]);
}

#[test]
fn non_finite_endpoints_terminate() {
    let arc = SvgArc {
        from: point(0.0, 0.0),
        to: point(f64::NAN, 0.0),
        radii: vector(5.0, 5.0),
        x_rotation: 0.0,
        flags: ArcFlags::default(),
    };
    assert_eq!(collect_cubics(&arc).len(), 1);
}
