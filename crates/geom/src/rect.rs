use crate::{point, Bounds2D, Point};
use core::fmt;

/// An axis-aligned rectangle stored as an origin and a size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Rect2D {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect2D {
    /// The point is to the left of the rectangle.
    pub const OUT_LEFT: u32 = 1;
    /// The point is above the rectangle (smaller y).
    pub const OUT_TOP: u32 = 2;
    /// The point is to the right of the rectangle.
    pub const OUT_RIGHT: u32 = 4;
    /// The point is below the rectangle (greater y).
    pub const OUT_BOTTOM: u32 = 8;

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect2D { x, y, w, h }
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    pub fn center(&self) -> Point {
        point(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Half-open containment test: the right and bottom edges are excluded.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.max_x() && p.y < self.max_y()
    }

    /// Grows the rectangle to include `p`.
    pub fn add(&mut self, p: Point) {
        let x1 = self.min_x().min(p.x);
        let x2 = self.max_x().max(p.x);
        let y1 = self.min_y().min(p.y);
        let y2 = self.max_y().max(p.y);
        *self = Rect2D::new(x1, y1, x2 - x1, y2 - y1);
    }

    /// Which sides of the rectangle the point lies outside of, as a combination of the
    /// `OUT_*` constants.
    pub fn outcode(&self, x: f64, y: f64) -> u32 {
        let mut out = 0;
        if self.w <= 0.0 {
            out |= Rect2D::OUT_LEFT | Rect2D::OUT_RIGHT;
        } else if x < self.x {
            out |= Rect2D::OUT_LEFT;
        } else if x > self.x + self.w {
            out |= Rect2D::OUT_RIGHT;
        }
        if self.h <= 0.0 {
            out |= Rect2D::OUT_TOP | Rect2D::OUT_BOTTOM;
        } else if y < self.y {
            out |= Rect2D::OUT_TOP;
        } else if y > self.y + self.h {
            out |= Rect2D::OUT_BOTTOM;
        }

        out
    }

    /// Whether the segment `(x1, y1) -> (x2, y2)` touches the rectangle.
    ///
    /// Clips the first endpoint against the sides it is outside of until it either lands
    /// inside or both endpoints are provably on the same outer side.
    pub fn intersects_line(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        let out2 = self.outcode(x2, y2);
        if out2 == 0 {
            return true;
        }

        let (mut x1, mut y1) = (x1, y1);
        loop {
            let out1 = self.outcode(x1, y1);
            if out1 == 0 {
                return true;
            }
            if out1 & out2 != 0 {
                return false;
            }
            if out1 & (Rect2D::OUT_LEFT | Rect2D::OUT_RIGHT) != 0 {
                let mut x = self.x;
                if out1 & Rect2D::OUT_RIGHT != 0 {
                    x += self.w;
                }
                y1 += (x - x1) * (y2 - y1) / (x2 - x1);
                x1 = x;
            } else {
                let mut y = self.y;
                if out1 & Rect2D::OUT_BOTTOM != 0 {
                    y += self.h;
                }
                x1 += (y - y1) * (x2 - x1) / (y2 - y1);
                y1 = y;
            }
        }
    }

    pub fn to_bounds(&self) -> Bounds2D {
        Bounds2D::from_corners(point(self.min_x(), self.min_y()), point(self.max_x(), self.max_y()))
    }
}

impl From<Bounds2D> for Rect2D {
    fn from(b: Bounds2D) -> Self {
        Rect2D::new(b.min_x(), b.min_y(), b.width(), b.height())
    }
}

impl fmt::Display for Rect2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rect2D[x={}, y={}, w={}, h={}]", self.x, self.y, self.w, self.h)
    }
}

#[test]
fn half_open_containment() {
    let r = Rect2D::new(0.0, 0.0, 10.0, 5.0);
    assert!(r.contains(point(0.0, 0.0)));
    assert!(r.contains(point(9.99, 4.99)));
    assert!(!r.contains(point(10.0, 2.0)));
    assert!(!r.contains(point(2.0, 5.0)));
    assert_eq!(r.center(), point(5.0, 2.5));
}

#[test]
fn outcodes() {
    let r = Rect2D::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(r.outcode(5.0, 5.0), 0);
    assert_eq!(r.outcode(10.0, 10.0), 0);
    assert_eq!(r.outcode(-1.0, 5.0), Rect2D::OUT_LEFT);
    assert_eq!(r.outcode(11.0, -1.0), Rect2D::OUT_RIGHT | Rect2D::OUT_TOP);
    assert_eq!(r.outcode(5.0, 11.0), Rect2D::OUT_BOTTOM);

    let empty = Rect2D::new(0.0, 0.0, 0.0, 10.0);
    assert_eq!(empty.outcode(0.0, 5.0), Rect2D::OUT_LEFT | Rect2D::OUT_RIGHT);
}

#[test]
fn line_clipping() {
    let r = Rect2D::new(0.0, 0.0, 10.0, 10.0);
    // Crossing through.
    assert!(r.intersects_line(-5.0, 5.0, 15.0, 5.0));
    // Endpoint inside.
    assert!(r.intersects_line(5.0, 5.0, 50.0, 50.0));
    // Fully on one side.
    assert!(!r.intersects_line(-5.0, -5.0, -1.0, 20.0));
    // Diagonal missing the corner.
    assert!(!r.intersects_line(8.0, -5.0, 15.0, 2.0));
    // Diagonal through the corner region.
    assert!(r.intersects_line(5.0, -5.0, 15.0, 5.0));
}

#[test]
fn grow_and_convert() {
    let mut r = Rect2D::new(0.0, 0.0, 1.0, 1.0);
    r.add(point(3.0, -2.0));
    assert_eq!(r, Rect2D::new(0.0, -2.0, 3.0, 3.0));

    let b = r.to_bounds();
    assert_eq!(b.min, point(0.0, -2.0));
    assert_eq!(b.max, point(3.0, 1.0));
    assert_eq!(Rect2D::from(b), r);
}
