use crate::utils::points_equal;
use crate::{point, Box2D, Point};
use num_traits::Float;

/// An axis-aligned bounding box accumulator.
///
/// A new box is empty: its minimum is `(+∞, +∞)` and its maximum `(-∞, -∞)`, so it
/// contains no point until one is added. Adding points only ever grows the box.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Bounds2D {
    pub min: Point,
    pub max: Point,
}

impl Default for Bounds2D {
    fn default() -> Self {
        Bounds2D::new()
    }
}

impl Bounds2D {
    pub fn new() -> Self {
        Bounds2D {
            min: point(f64::INFINITY, f64::INFINITY),
            max: point(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_corners(min: Point, max: Point) -> Self {
        Bounds2D { min, max }
    }

    /// The smallest box containing all of the points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bounds = Bounds2D::new();
        bounds.add_points(points);
        bounds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max.y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(self.max, 0.5)
    }

    /// Area of the box, zero for empty or flat boxes.
    pub fn volume(&self) -> f64 {
        self.width() * self.height()
    }

    /// Epsilon comparison of both corners.
    pub fn compare(&self, other: &Bounds2D) -> bool {
        points_equal(self.min, other.min) && points_equal(self.max, other.max)
    }

    /// Grows the box to include `p`. Returns whether the box changed.
    pub fn add_point(&mut self, p: Point) -> bool {
        let mut grew = false;
        if p.x < self.min.x {
            self.min.x = p.x;
            grew = true;
        }
        if p.y < self.min.y {
            self.min.y = p.y;
            grew = true;
        }
        if p.x > self.max.x {
            self.max.x = p.x;
            grew = true;
        }
        if p.y > self.max.y {
            self.max.y = p.y;
            grew = true;
        }

        grew
    }

    /// Grows the box to include every point. Returns whether any of them changed it.
    pub fn add_points(&mut self, points: &[Point]) -> bool {
        let mut grew = false;
        for p in points {
            grew |= self.add_point(*p);
        }

        grew
    }

    pub fn add_bounds(&mut self, other: &Bounds2D) -> bool {
        if other.is_empty() {
            return false;
        }
        let a = self.add_point(other.min);
        let b = self.add_point(other.max);
        a || b
    }

    pub fn intersects_bounds(&self, other: &Bounds2D) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Distance from the origin to the farthest possible corner of the box.
    pub fn radius(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let x = self.min.x.abs().max(self.max.x.abs());
        let y = self.min.y.abs().max(self.max.y.abs());
        (x * x + y * y).sqrt()
    }

    pub fn to_box2d(&self) -> Box2D {
        Box2D::new(self.min, self.max)
    }
}

impl From<Box2D> for Bounds2D {
    fn from(b: Box2D) -> Self {
        Bounds2D::from_corners(b.min, b.max)
    }
}

#[test]
fn empty_bounds() {
    let b = Bounds2D::new();
    assert!(b.is_empty());
    assert!(!b.contains_point(point(0.0, 0.0)));
    assert_eq!(b.width(), 0.0);
    assert_eq!(b.height(), 0.0);
    assert_eq!(b.volume(), 0.0);
    assert_eq!(b.radius(), 0.0);
    assert!(!b.intersects_bounds(&Bounds2D::from_points(&[point(0.0, 0.0)])));
}

#[test]
fn add_point_reports_growth() {
    let mut b = Bounds2D::new();
    assert!(b.add_point(point(1.0, 2.0)));
    assert!(!b.add_point(point(1.0, 2.0)));
    assert!(b.add_point(point(-1.0, 2.0)));
    assert!(!b.add_point(point(0.0, 2.0)));
    assert!(b.add_point(point(0.0, 5.0)));

    assert_eq!(b.min, point(-1.0, 2.0));
    assert_eq!(b.max, point(1.0, 5.0));
    assert_eq!(b.width(), 2.0);
    assert_eq!(b.height(), 3.0);
    assert_eq!(b.center(), point(0.0, 3.5));
    assert_eq!(b.volume(), 6.0);
}

#[test]
fn add_points_reports_any_growth() {
    let mut b = Bounds2D::new();
    // The last point does not grow the box, the first ones do.
    assert!(b.add_points(&[point(0.0, 0.0), point(10.0, 10.0), point(5.0, 5.0)]));
    assert!(!b.add_points(&[point(1.0, 1.0), point(2.0, 2.0)]));
    assert_eq!(b.min, point(0.0, 0.0));
    assert_eq!(b.max, point(10.0, 10.0));
}

#[test]
fn queries() {
    let a = Bounds2D::from_corners(point(0.0, 0.0), point(10.0, 10.0));
    let b = Bounds2D::from_corners(point(5.0, 5.0), point(20.0, 20.0));
    let c = Bounds2D::from_corners(point(11.0, 0.0), point(20.0, 1.0));

    assert!(a.intersects_bounds(&b));
    assert!(b.intersects_bounds(&a));
    assert!(!a.intersects_bounds(&c));
    assert!(a.contains_point(point(10.0, 0.0)));
    assert!(!a.contains_point(point(10.1, 0.0)));
    assert!(a.compare(&Bounds2D::from_corners(point(0.0, 0.0), point(10.0, 10.0))));
    assert!(!a.compare(&b));

    let r = Bounds2D::from_corners(point(-3.0, -1.0), point(1.0, 4.0));
    assert_eq!(r.radius(), 5.0);

    let mut grown = a;
    assert!(grown.add_bounds(&b));
    assert_eq!(grown.max, point(20.0, 20.0));
    assert!(!grown.add_bounds(&Bounds2D::new()));

    let roundtrip: Bounds2D = a.to_box2d().into();
    assert_eq!(roundtrip, a);
}
