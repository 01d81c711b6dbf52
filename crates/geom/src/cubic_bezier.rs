use crate::quadratic_bezier::solve_quadratic;
use crate::sampling::{ArcLengthTable, DEFAULT_SAMPLE_STEPS};
use crate::traits::Animator;
use crate::utils::lerp_points;
use crate::{point, vector, Bounds2D, Point, Vector};

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicCurve2D {
    from: Point,
    ctrl1: Point,
    ctrl2: Point,
    to: Point,
    bounds: Bounds2D,
    table: ArcLengthTable,
}

impl CubicCurve2D {
    pub fn new(from: Point, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        let mut curve = CubicCurve2D {
            from,
            ctrl1,
            ctrl2,
            to,
            bounds: Bounds2D::new(),
            table: ArcLengthTable::default(),
        };
        curve.update();
        curve
    }

    pub fn set_curve(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point) {
        self.from = from;
        self.ctrl1 = ctrl1;
        self.ctrl2 = ctrl2;
        self.to = to;
        self.update();
    }

    fn update(&mut self) {
        self.bounds = Bounds2D::from_points(&[self.from, self.ctrl1, self.ctrl2, self.to]);
        self.table = self.lengths_and_times(DEFAULT_SAMPLE_STEPS);
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn ctrl1(&self) -> Point {
        self.ctrl1
    }

    #[inline]
    pub fn ctrl2(&self) -> Point {
        self.ctrl2
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    /// Bounds of the control points. See [`tight_bounds`](CubicCurve2D::tight_bounds).
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

    #[inline]
    pub fn length(&self) -> f64 {
        self.table.total_length()
    }

    /// Evaluates the curve defined by the four points at `t`.
    ///
    /// Returns the endpoints exactly for `t <= 0` and `t >= 1`.
    pub fn point_at(p1: Point, p2: Point, p3: Point, p4: Point, t: f64) -> Point {
        if t <= 0.0 {
            return p1;
        }
        if t >= 1.0 {
            return p4;
        }

        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let t2 = t * t;
        let a = one_t2 * one_t;
        let b = 3.0 * one_t2 * t;
        let c = 3.0 * one_t * t2;
        let d = t2 * t;
        point(
            a * p1.x + b * p2.x + c * p3.x + d * p4.x,
            a * p1.y + b * p2.y + c * p3.y + d * p4.y,
        )
    }

    /// Sample the curve at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        CubicCurve2D::point_at(self.from, self.ctrl1, self.ctrl2, self.to, t)
    }

    pub fn lengths_and_times(&self, steps: usize) -> ArcLengthTable {
        let (p1, p2, p3, p4) = (self.from, self.ctrl1, self.ctrl2, self.to);
        ArcLengthTable::sample(steps, |t| CubicCurve2D::point_at(p1, p2, p3, p4, t))
    }

    /// Sample the curve's derivative at t (expecting t between 0 and 1).
    pub fn first_derivative(&self, t: f64) -> Vector {
        let one_t = 1.0 - t;
        let a = 3.0 * one_t * one_t;
        let b = 6.0 * one_t * t;
        let c = 3.0 * t * t;
        (self.ctrl1 - self.from) * a + (self.ctrl2 - self.ctrl1) * b + (self.to - self.ctrl2) * c
    }

    /// Sample the curve's second derivative at t (expecting t between 0 and 1).
    pub fn second_derivative(&self, t: f64) -> Vector {
        let p0 = self.from.to_vector();
        let p1 = self.ctrl1.to_vector();
        let p2 = self.ctrl2.to_vector();
        let p3 = self.to.to_vector();
        (p2 - p1 * 2.0 + p0) * (6.0 * (1.0 - t)) + (p3 - p2 * 2.0 + p1) * (6.0 * t)
    }

    /// Parameters in `(0, 1)` where the derivative along one axis is zero.
    fn for_each_local_extremum_t<F: FnMut(f64)>(p0: f64, p1: f64, p2: f64, p3: f64, cb: &mut F) {
        // B'(t) / 3 = a t² + b t + c
        let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
        let b = 2.0 * (p0 - 2.0 * p1 + p2);
        let c = p1 - p0;
        for &t in solve_quadratic([c, b, a]).as_slice() {
            if t > 0.0 && t < 1.0 {
                cb(t);
            }
        }
    }

    /// The smallest box containing the curve itself, rather than its control points.
    pub fn tight_bounds(&self) -> Bounds2D {
        let mut bounds = Bounds2D::from_points(&[self.from, self.to]);
        let mut add = |t: f64| {
            bounds.add_point(self.sample(t));
        };
        CubicCurve2D::for_each_local_extremum_t(
            self.from.x,
            self.ctrl1.x,
            self.ctrl2.x,
            self.to.x,
            &mut add,
        );
        CubicCurve2D::for_each_local_extremum_t(
            self.from.y,
            self.ctrl1.y,
            self.ctrl2.y,
            self.to.y,
            &mut add,
        );

        bounds
    }

    /// Splits the curve at `t` with De Casteljau's algorithm.
    pub fn split(&self, t: f64) -> (CubicCurve2D, CubicCurve2D) {
        let ab = self.from.lerp(self.ctrl1, t);
        let bc = self.ctrl1.lerp(self.ctrl2, t);
        let cd = self.ctrl2.lerp(self.to, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let abcd = abc.lerp(bcd, t);

        (
            CubicCurve2D::new(self.from, ab, abc, abcd),
            CubicCurve2D::new(abcd, bcd, cd, self.to),
        )
    }

    /// The vector between the endpoints.
    pub fn baseline(&self) -> Vector {
        vector(self.to.x - self.from.x, self.to.y - self.from.y)
    }
}

impl Animator for CubicCurve2D {
    /// De Casteljau evaluation.
    fn animation_value(&self, t: f64) -> Point {
        let ab = lerp_points(self.from, self.ctrl1, t);
        let bc = lerp_points(self.ctrl1, self.ctrl2, t);
        let cd = lerp_points(self.ctrl2, self.to, t);
        let abc = lerp_points(ab, bc, t);
        let bcd = lerp_points(bc, cd, t);
        lerp_points(abc, bcd, t)
    }
}

#[cfg(test)]
use approx::assert_relative_eq;

#[test]
fn de_casteljau_midpoint() {
    let c = CubicCurve2D::new(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    assert_eq!(c.animation_value(0.5), point(5.0, 7.5));
    assert_eq!(c.sample(0.5), point(5.0, 7.5));
    assert_eq!(c.animation_value(0.0), point(0.0, 0.0));
    assert_eq!(c.animation_value(1.0), point(10.0, 0.0));
}

#[test]
fn endpoints_are_exact() {
    let c = CubicCurve2D::new(
        point(0.1, 0.2),
        point(1.0 / 3.0, 7.0),
        point(-3.3, 1e4),
        point(0.7, 0.9),
    );
    assert_eq!(c.sample(0.0), c.from());
    assert_eq!(c.sample(1.0), c.to());
    assert_eq!(c.sample(-1.0), c.from());
    assert_eq!(c.sample(2.0), c.to());
}

#[test]
fn derivatives() {
    let c = CubicCurve2D::new(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    assert_eq!(c.first_derivative(0.0), vector(0.0, 30.0));
    assert_eq!(c.first_derivative(1.0), vector(0.0, -30.0));
    assert_eq!(c.first_derivative(0.5), vector(15.0, 0.0));
    assert_eq!(c.second_derivative(0.0), vector(60.0, -60.0));
    assert_eq!(c.second_derivative(1.0), vector(-60.0, -60.0));

    // Finite differences agree with the analytic derivative.
    let t = 0.3;
    let h = 1e-6;
    let fd = (c.sample(t + h) - c.sample(t - h)) / (2.0 * h);
    let d = c.first_derivative(t);
    assert_relative_eq!(fd.x, d.x, epsilon = 1e-4);
    assert_relative_eq!(fd.y, d.y, epsilon = 1e-4);
}

#[test]
fn tight_bounds() {
    let c = CubicCurve2D::new(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    assert_eq!(c.bounds().max, point(10.0, 10.0));

    let tight = c.tight_bounds();
    assert_eq!(tight.min, point(0.0, 0.0));
    assert_relative_eq!(tight.max.x, 10.0);
    assert_relative_eq!(tight.max.y, 7.5);
}

#[test]
fn split_and_length() {
    let c = CubicCurve2D::new(
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    );
    let (a, b) = c.split(0.5);
    assert_eq!(a.to(), point(5.0, 7.5));
    assert_eq!(b.from(), point(5.0, 7.5));
    assert_relative_eq!(a.length() + b.length(), c.length(), epsilon = 5e-2);
    assert!(c.length() > c.baseline().length());

    let line = CubicCurve2D::new(
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(2.0, 0.0),
        point(3.0, 0.0),
    );
    assert_relative_eq!(line.length(), 3.0, epsilon = 1e-9);
}
