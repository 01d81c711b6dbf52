use crate::traits::Animator;
use crate::utils::lerp_points;
use crate::{Bounds2D, Point, Rect2D, Vector};
use num_traits::Float;

/// Orientation of `p` relative to the directed segment `from -> to`.
///
/// Returns `1` if `p` is on the counter-clockwise side in a y-down coordinate system,
/// `-1` on the other side, and `0` if it lies on the segment. A colinear point beyond
/// `to` counts as `1`, before `from` as `-1`.
pub fn relative_ccw(from: Point, to: Point, p: Point) -> i32 {
    let (x2, y2) = (to.x - from.x, to.y - from.y);
    let (mut px, mut py) = (p.x - from.x, p.y - from.y);
    let mut ccw = px * y2 - py * x2;
    if ccw == 0.0 {
        // Colinear: classify by the projection on the segment.
        ccw = px * x2 + py * y2;
        if ccw > 0.0 {
            px -= x2;
            py -= y2;
            ccw = px * x2 + py * y2;
            if ccw < 0.0 {
                ccw = 0.0;
            }
        }
    }

    if ccw < 0.0 {
        -1
    } else if ccw > 0.0 {
        1
    } else {
        0
    }
}

/// Whether the segments `a1 -> a2` and `b1 -> b2` intersect, touching included.
pub fn lines_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    relative_ccw(a1, a2, b1) * relative_ccw(a1, a2, b2) <= 0
        && relative_ccw(b1, b2, a1) * relative_ccw(b1, b2, a2) <= 0
}

/// Square of the distance from `p` to the segment `from -> to`.
pub fn pt_seg_dist_sq(from: Point, to: Point, p: Point) -> f64 {
    let (x2, y2) = (to.x - from.x, to.y - from.y);
    let (mut px, mut py) = (p.x - from.x, p.y - from.y);
    let mut dot = px * x2 + py * y2;
    let proj_len_sq = if dot <= 0.0 {
        // Behind `from`.
        0.0
    } else {
        px = x2 - px;
        py = y2 - py;
        dot = px * x2 + py * y2;
        if dot <= 0.0 {
            // Beyond `to`.
            0.0
        } else {
            dot * dot / (x2 * x2 + y2 * y2)
        }
    };

    let len_sq = px * px + py * py - proj_len_sq;
    if len_sq < 0.0 {
        0.0
    } else {
        len_sq
    }
}

/// Square of the distance from `p` to the infinite line through `from` and `to`.
pub fn pt_line_dist_sq(from: Point, to: Point, p: Point) -> f64 {
    let (x2, y2) = (to.x - from.x, to.y - from.y);
    let (px, py) = (p.x - from.x, p.y - from.y);
    let dot = px * x2 + py * y2;
    let proj_len_sq = dot * dot / (x2 * x2 + y2 * y2);
    let len_sq = px * px + py * py - proj_len_sq;
    if len_sq < 0.0 {
        0.0
    } else {
        len_sq
    }
}

/// A line segment, usable as a path of a single segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line2D {
    from: Point,
    to: Point,
    bounds: Bounds2D,
    length: f64,
}

impl Line2D {
    pub fn new(from: Point, to: Point) -> Self {
        Line2D {
            from,
            to,
            bounds: Bounds2D::from_points(&[from, to]),
            length: (to - from).length(),
        }
    }

    pub fn set_line(&mut self, from: Point, to: Point) {
        *self = Line2D::new(from, to);
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    /// Sample the segment at t (clamped to the endpoints outside of `[0, 1]`).
    pub fn sample(&self, t: f64) -> Point {
        lerp_points(self.from, self.to, t)
    }

    pub fn relative_ccw(&self, p: Point) -> i32 {
        relative_ccw(self.from, self.to, p)
    }

    pub fn intersects_line(&self, other: &Line2D) -> bool {
        lines_intersect(self.from, self.to, other.from, other.to)
    }

    pub fn pt_seg_dist_sq(&self, p: Point) -> f64 {
        pt_seg_dist_sq(self.from, self.to, p)
    }

    pub fn pt_seg_dist(&self, p: Point) -> f64 {
        self.pt_seg_dist_sq(p).sqrt()
    }

    pub fn pt_line_dist_sq(&self, p: Point) -> f64 {
        pt_line_dist_sq(self.from, self.to, p)
    }

    pub fn pt_line_dist(&self, p: Point) -> f64 {
        self.pt_line_dist_sq(p).sqrt()
    }

    /// Whether the segment touches the rectangle.
    pub fn intersects(&self, rect: &Rect2D) -> bool {
        rect.intersects_line(self.from.x, self.from.y, self.to.x, self.to.y)
    }

    /// A line has no interior.
    pub fn contains(&self, _p: Point) -> bool {
        false
    }
}

impl Animator for Line2D {
    fn animation_value(&self, t: f64) -> Point {
        self.sample(t)
    }
}

#[cfg(test)]
use crate::point;

#[test]
fn orientation() {
    let a = point(0.0, 0.0);
    let b = point(10.0, 0.0);
    assert_eq!(relative_ccw(a, b, point(5.0, -5.0)), 1);
    assert_eq!(relative_ccw(a, b, point(5.0, 5.0)), -1);
    // Colinear cases.
    assert_eq!(relative_ccw(a, b, point(5.0, 0.0)), 0);
    assert_eq!(relative_ccw(a, b, point(15.0, 0.0)), 1);
    assert_eq!(relative_ccw(a, b, point(-5.0, 0.0)), -1);
    assert_eq!(relative_ccw(a, b, b), 0);
}

#[test]
fn segment_intersections() {
    let l1 = Line2D::new(point(0.0, 0.0), point(10.0, 10.0));
    let l2 = Line2D::new(point(0.0, 10.0), point(10.0, 0.0));
    let l3 = Line2D::new(point(20.0, 0.0), point(30.0, 10.0));
    let l4 = Line2D::new(point(10.0, 10.0), point(10.0, 0.0));

    assert!(l1.intersects_line(&l2));
    assert!(!l1.intersects_line(&l3));
    // Touching at an endpoint counts.
    assert!(l1.intersects_line(&l4));
    assert!(lines_intersect(
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(5.0, 0.0),
        point(15.0, 0.0)
    ));
}

#[test]
fn distances() {
    let l = Line2D::new(point(0.0, 0.0), point(10.0, 0.0));
    assert_eq!(l.length(), 10.0);
    assert_eq!(l.pt_seg_dist_sq(point(5.0, 3.0)), 9.0);
    assert_eq!(l.pt_seg_dist(point(5.0, -3.0)), 3.0);
    // Clamped to the endpoints.
    assert_eq!(l.pt_seg_dist_sq(point(13.0, 4.0)), 25.0);
    assert_eq!(l.pt_seg_dist_sq(point(-3.0, 4.0)), 25.0);
    // The infinite line is not clamped.
    assert_eq!(l.pt_line_dist_sq(point(13.0, 4.0)), 16.0);
    assert_eq!(l.pt_line_dist(point(-3.0, 4.0)), 4.0);
}

#[test]
fn rectangle_and_animation() {
    let l = Line2D::new(point(-5.0, 5.0), point(15.0, 5.0));
    assert!(l.intersects(&Rect2D::new(0.0, 0.0, 10.0, 10.0)));
    assert!(!l.intersects(&Rect2D::new(0.0, 6.0, 10.0, 10.0)));
    assert!(!l.contains(point(0.0, 5.0)));

    assert_eq!(l.animation_value(0.0), point(-5.0, 5.0));
    assert_eq!(l.animation_value(1.0), point(15.0, 5.0));
    assert_eq!(l.animation_value(0.5), point(5.0, 5.0));
    assert_eq!(l.bounds().min, point(-5.0, 5.0));
    assert_eq!(l.bounds().max, point(15.0, 5.0));
}
