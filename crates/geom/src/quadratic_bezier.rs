use crate::sampling::{ArcLengthTable, DEFAULT_SAMPLE_STEPS};
use crate::traits::Animator;
use crate::utils::lerp_points;
use crate::{Bounds2D, Point};
use arrayvec::ArrayVec;
use num_traits::Float;

// Position of a coordinate relative to a range, see `tag`.
const BELOW: i32 = -2;
const LOWEDGE: i32 = -1;
const INSIDE: i32 = 0;
const HIGHEDGE: i32 = 1;
const ABOVE: i32 = 2;

/// Real roots of a quadratic equation.
#[derive(Clone, Debug, PartialEq)]
pub enum QuadraticRoots {
    /// The equation is constant, either everything or nothing is a root.
    Constant,
    Real(ArrayVec<f64, 2>),
}

impl QuadraticRoots {
    /// Number of roots, or `-1` for a constant equation.
    pub fn count(&self) -> i32 {
        match self {
            QuadraticRoots::Constant => -1,
            QuadraticRoots::Real(roots) => roots.len() as i32,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            QuadraticRoots::Constant => &[],
            QuadraticRoots::Real(roots) => roots,
        }
    }
}

/// Solves `eqn[2] * t² + eqn[1] * t + eqn[0] = 0`.
///
/// Uses `q = -(b + sign(b) * sqrt(b² - 4ac)) / 2` and the roots `q / a`, `c / q`, which
/// avoids the cancellation of the textbook formula.
pub fn solve_quadratic(eqn: [f64; 3]) -> QuadraticRoots {
    let (c, b, a) = (eqn[0], eqn[1], eqn[2]);
    let mut roots = ArrayVec::new();
    if a == 0.0 {
        // The quadratic parabola has degenerated to a line.
        if b == 0.0 {
            return QuadraticRoots::Constant;
        }
        roots.push(-c / b);
        return QuadraticRoots::Real(roots);
    }

    let mut d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return QuadraticRoots::Real(roots);
    }
    d = d.sqrt();
    if b < 0.0 {
        d = -d;
    }
    let q = (b + d) / -2.0;
    roots.push(q / a);
    if q != 0.0 {
        roots.push(c / q);
    }

    QuadraticRoots::Real(roots)
}

// Coefficients of the equation `curve(t) - val = 0` along one axis.
fn fill_eqn(val: f64, c1: f64, cp: f64, c2: f64) -> [f64; 3] {
    [c1 - val, cp + cp - c1 - c1, c1 - cp - cp + c2]
}

// Replaces the parameters in `vals[..num]` that fall in `[0, 1]` with the curve's
// coordinate at that parameter, compacting them at the front. Returns how many remain.
fn eval_quadratic(vals: &mut [f64], num: usize, c1: f64, cp: f64, c2: f64) -> usize {
    let mut j = 0;
    for i in 0..num {
        let t = vals[i];
        if (0.0..=1.0).contains(&t) {
            let u = 1.0 - t;
            vals[j] = c1 * u * u + 2.0 * cp * t * u + c2 * t * t;
            j += 1;
        }
    }

    j
}

fn tag(coord: f64, low: f64, high: f64) -> i32 {
    if coord <= low {
        return if coord < low { BELOW } else { LOWEDGE };
    }
    if coord >= high {
        return if coord > high { ABOVE } else { HIGHEDGE };
    }

    INSIDE
}

// Whether a point tagged `pttag` on the edge of a range heads inside of it, given the
// tags of the other two control points.
fn inwards(pttag: i32, opt1tag: i32, opt2tag: i32) -> bool {
    match pttag {
        LOWEDGE => opt1tag >= INSIDE || opt2tag >= INSIDE,
        INSIDE => true,
        HIGHEDGE => opt1tag <= INSIDE || opt2tag <= INSIDE,
        _ => false,
    }
}

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
///
/// The curve keeps the bounds of its control points and an arc-length table, both
/// recomputed by [`set_curve`](QuadCurve2D::set_curve).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadCurve2D {
    from: Point,
    ctrl: Point,
    to: Point,
    bounds: Bounds2D,
    table: ArcLengthTable,
}

impl QuadCurve2D {
    pub fn new(from: Point, ctrl: Point, to: Point) -> Self {
        let mut curve = QuadCurve2D {
            from,
            ctrl,
            to,
            bounds: Bounds2D::new(),
            table: ArcLengthTable::default(),
        };
        curve.update();
        curve
    }

    pub fn set_curve(&mut self, from: Point, ctrl: Point, to: Point) {
        self.from = from;
        self.ctrl = ctrl;
        self.to = to;
        self.update();
    }

    fn update(&mut self) {
        self.bounds = Bounds2D::from_points(&[self.from, self.ctrl, self.to]);
        self.table = self.lengths_and_times(DEFAULT_SAMPLE_STEPS);
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn ctrl(&self) -> Point {
        self.ctrl
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    /// Bounds of the control points.
    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    #[inline]
    pub fn arc_length_table(&self) -> &ArcLengthTable {
        &self.table
    }

    #[inline]
    pub fn lengths(&self) -> &[f64] {
        self.table.lengths()
    }

    #[inline]
    pub fn times(&self) -> &[f64] {
        self.table.times()
    }

    /// Approximated length of the curve.
    #[inline]
    pub fn length(&self) -> f64 {
        self.table.total_length()
    }

    /// Evaluates the curve defined by `p1`, `p2`, `p3` at `t`.
    ///
    /// Returns the endpoints exactly for `t <= 0` and `t >= 1`.
    pub fn point_at(p1: Point, p2: Point, p3: Point, t: f64) -> Point {
        if t <= 0.0 {
            return p1;
        }
        if t >= 1.0 {
            return p3;
        }

        let one_t = 1.0 - t;
        let a = one_t * one_t;
        let b = 2.0 * one_t * t;
        let c = t * t;
        Point::new(
            a * p1.x + b * p2.x + c * p3.x,
            a * p1.y + b * p2.y + c * p3.y,
        )
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        QuadCurve2D::point_at(self.from, self.ctrl, self.to, t)
    }

    pub fn lengths_and_times(&self, steps: usize) -> ArcLengthTable {
        let (from, ctrl, to) = (self.from, self.ctrl, self.to);
        ArcLengthTable::sample(steps, |t| QuadCurve2D::point_at(from, ctrl, to, t))
    }

    /// Splits the curve in two halves at `t = 0.5`.
    pub fn subdivide(&self) -> (QuadCurve2D, QuadCurve2D) {
        let ctrl1 = self.from.lerp(self.ctrl, 0.5);
        let ctrl2 = self.ctrl.lerp(self.to, 0.5);
        let mid = ctrl1.lerp(ctrl2, 0.5);

        (
            QuadCurve2D::new(self.from, ctrl1, mid),
            QuadCurve2D::new(mid, ctrl2, self.to),
        )
    }

    /// Whether `(x, y)` is inside the area enclosed by the curve and the chord between
    /// its endpoints.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (x1, y1) = (self.from.x, self.from.y);
        let (xc, yc) = (self.ctrl.x, self.ctrl.y);
        let (x2, y2) = (self.to.x, self.to.y);

        let kx = x1 - 2.0 * xc + x2;
        let ky = y1 - 2.0 * yc + y2;
        let dx = x - x1;
        let dy = y - y1;
        let dxl = x2 - x1;
        let dyl = y2 - y1;

        // Parameter of the curve point on the parabola's axis line through (x, y).
        let t0 = (dx * ky - dy * kx) / (dxl * ky - dyl * kx);
        if !(0.0..=1.0).contains(&t0) {
            // Also rejects NaN.
            return false;
        }

        let xb = kx * t0 * t0 + 2.0 * (xc - x1) * t0 + x1;
        let yb = ky * t0 * t0 + 2.0 * (yc - y1) * t0 + y1;
        let xl = dxl * t0 + x1;
        let yl = dyl * t0 + y1;

        (x >= xb && x < xl) || (x >= xl && x < xb) || (y >= yb && y < yl) || (y >= yl && y < yb)
    }

    /// Whether the curve intersects the interior of the rectangle `(x, y, w, h)`.
    pub fn intersects(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if w <= 0.0 || h <= 0.0 {
            return false;
        }

        let (x1, y1) = (self.from.x, self.from.y);
        let x1tag = tag(x1, x, x + w);
        let y1tag = tag(y1, y, y + h);
        if x1tag == INSIDE && y1tag == INSIDE {
            return true;
        }
        let (x2, y2) = (self.to.x, self.to.y);
        let x2tag = tag(x2, x, x + w);
        let y2tag = tag(y2, y, y + h);
        if x2tag == INSIDE && y2tag == INSIDE {
            return true;
        }
        let (ctrlx, ctrly) = (self.ctrl.x, self.ctrl.y);
        let ctrlxtag = tag(ctrlx, x, x + w);
        let ctrlytag = tag(ctrly, y, y + h);

        // All three points on one side of the rectangle.
        if x1tag < INSIDE && x2tag < INSIDE && ctrlxtag < INSIDE {
            return false;
        }
        if y1tag < INSIDE && y2tag < INSIDE && ctrlytag < INSIDE {
            return false;
        }
        if x1tag > INSIDE && x2tag > INSIDE && ctrlxtag > INSIDE {
            return false;
        }
        if y1tag > INSIDE && y2tag > INSIDE && ctrlytag > INSIDE {
            return false;
        }

        // An endpoint on the border with the curve heading inside.
        if inwards(x1tag, x2tag, ctrlxtag) && inwards(y1tag, y2tag, ctrlytag) {
            return true;
        }
        if inwards(x2tag, x1tag, ctrlxtag) && inwards(y2tag, y1tag, ctrlytag) {
            return true;
        }

        // The endpoints span directly across the rectangle.
        let xoverlap = x1tag * x2tag <= 0;
        let yoverlap = y1tag * y2tag <= 0;
        if x1tag == INSIDE && x2tag == INSIDE && yoverlap {
            return true;
        }
        if y1tag == INSIDE && y2tag == INSIDE && xoverlap {
            return true;
        }

        // Both endpoints are outside and not all on one side. Either the curve crosses
        // the boundary or it does not touch the rectangle at all.
        let mut res = [0.0; 2];
        if !yoverlap {
            // Both endpoints above or below: the curve has to cross the near horizontal
            // edge twice, with crossings spanning the horizontal range.
            let eqn = fill_eqn(if y1tag < INSIDE { y } else { y + h }, y1, ctrly, y2);
            let roots = solve_quadratic(eqn);
            if roots.count() != 2 {
                return false;
            }
            res.copy_from_slice(roots.as_slice());
            return eval_quadratic(&mut res, 2, x1, ctrlx, x2) == 2
                && tag(res[0], x, x + w) * tag(res[1], x, x + w) <= 0;
        }

        if !xoverlap {
            let eqn = fill_eqn(if x1tag < INSIDE { x } else { x + w }, x1, ctrlx, x2);
            let roots = solve_quadratic(eqn);
            if roots.count() != 2 {
                return false;
            }
            res.copy_from_slice(roots.as_slice());
            return eval_quadratic(&mut res, 2, y1, ctrly, y2) == 2
                && tag(res[0], y, y + h) * tag(res[1], y, y + h) <= 0;
        }

        // Both ranges overlap. Find how the chord between the endpoints crosses the
        // vertical range of the rectangle.
        let dx = x2 - x1;
        let dy = y2 - y1;
        let k = y2 * x1 - x2 * y1;
        let c1tag = if y1tag == INSIDE {
            x1tag
        } else {
            tag((k + dx * if y1tag < INSIDE { y } else { y + h }) / dy, x, x + w)
        };
        let c2tag = if y2tag == INSIDE {
            x2tag
        } else {
            tag((k + dx * if y2tag < INSIDE { y } else { y + h }) / dy, x, x + w)
        };
        if c1tag * c2tag <= 0 {
            return true;
        }

        // The chord does not cross the rectangle. It crosses the near vertical side once
        // and the curve crosses it once more: intersect if the two crossings straddle
        // the vertical range.
        let c1tag = if c1tag * x1tag <= 0 { y1tag } else { y2tag };

        let eqn = fill_eqn(if c2tag < INSIDE { x } else { x + w }, x1, ctrlx, x2);
        let roots = solve_quadratic(eqn);
        let num = roots.as_slice().len();
        res[..num].copy_from_slice(roots.as_slice());
        eval_quadratic(&mut res, num, y1, ctrly, y2);
        let c2tag = tag(res[0], y, y + h);

        c1tag * c2tag <= 0
    }
}

impl Animator for QuadCurve2D {
    fn animation_value(&self, t: f64) -> Point {
        let a = lerp_points(self.from, self.ctrl, t);
        let b = lerp_points(self.ctrl, self.to, t);
        lerp_points(a, b, t)
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn endpoints_are_exact() {
    let curves = [
        (point(0.1, 0.3), point(7.7, -3.3), point(1.0e3, 0.7)),
        (point(-5.0, 2.5), point(0.0, 0.0), point(1.0 / 3.0, 2.0 / 3.0)),
        (point(0.0, 0.0), point(0.0, 0.0), point(0.0, 0.0)),
    ];
    for &(from, ctrl, to) in &curves {
        let c = QuadCurve2D::new(from, ctrl, to);
        assert_eq!(c.sample(0.0), from);
        assert_eq!(c.sample(1.0), to);
        assert_eq!(c.animation_value(0.0), from);
        assert_eq!(c.animation_value(1.0), to);
    }
}

#[test]
fn bounds_scenario() {
    let c = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    assert_eq!(c.bounds().min, point(0.0, 0.0));
    assert_eq!(c.bounds().max, point(10.0, 10.0));
    assert_eq!(c.sample(0.5), point(5.0, 5.0));
    assert_eq!(c.animation_value(0.5), point(5.0, 5.0));
}

#[test]
fn arc_length_table() {
    let mut c = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 0.0), point(10.0, 0.0));
    assert_eq!(c.lengths().len(), DEFAULT_SAMPLE_STEPS + 1);
    assert!((c.length() - 10.0).abs() < 1e-9);

    c.set_curve(point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0));
    assert!((c.length() - 20.0).abs() < 1e-9);
    assert_eq!(c.bounds().max, point(20.0, 0.0));

    let curved = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    assert!(curved.length() > 10.0);
    assert!(curved.length() < 20.0);
}

#[test]
fn quadratic_roots() {
    // (t - 1)(t - 2) = t² - 3t + 2
    let roots = solve_quadratic([2.0, -3.0, 1.0]);
    assert_eq!(roots.count(), 2);
    let mut r: ArrayVec<f64, 2> = roots.as_slice().iter().cloned().collect();
    r.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(r.as_slice(), &[1.0, 2.0]);

    assert_eq!(solve_quadratic([1.0, 0.0, 1.0]).count(), 0);
    assert_eq!(solve_quadratic([-4.0, 2.0, 0.0]).as_slice(), &[2.0]);
    assert_eq!(solve_quadratic([3.0, 0.0, 0.0]), QuadraticRoots::Constant);
    assert_eq!(solve_quadratic([3.0, 0.0, 0.0]).count(), -1);
    // Double root.
    assert_eq!(solve_quadratic([0.0, 0.0, 1.0]).as_slice(), &[0.0]);
}

#[test]
fn subdivision() {
    let c = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    let (left, right) = c.subdivide();
    assert_eq!(left.from(), c.from());
    assert_eq!(left.to(), c.sample(0.5));
    assert_eq!(right.from(), c.sample(0.5));
    assert_eq!(right.to(), c.to());
    assert_eq!(left.ctrl(), point(2.5, 5.0));
    assert_eq!(right.ctrl(), point(7.5, 5.0));
}

#[test]
fn containment() {
    let c = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    assert!(c.contains(5.0, 2.0));
    assert!(c.contains(5.0, 4.9));
    assert!(!c.contains(5.0, 5.5));
    assert!(!c.contains(5.0, -1.0));
    assert!(!c.contains(20.0, 1.0));
}

#[test]
fn rectangle_intersections() {
    let c = QuadCurve2D::new(point(0.0, 0.0), point(5.0, 10.0), point(10.0, 0.0));
    // Endpoint inside.
    assert!(c.intersects(-1.0, -1.0, 2.0, 2.0));
    // Rectangle around the apex.
    assert!(c.intersects(4.0, 4.0, 2.0, 2.0));
    // Above the apex.
    assert!(!c.intersects(4.0, 6.0, 2.0, 2.0));
    // Far away.
    assert!(!c.intersects(20.0, 20.0, 5.0, 5.0));
    // Degenerate rectangle.
    assert!(!c.intersects(0.0, 0.0, 0.0, 5.0));
    // Both endpoints below a thin horizontal band that the curve crosses twice.
    assert!(c.intersects(-5.0, 2.0, 20.0, 1.0));
}
