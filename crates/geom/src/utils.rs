//! Small numeric helpers shared by the curve, arc and path code.

use crate::{point, vector, Point, Vector};
use core::f64::consts::PI;
use num_traits::Float;

/// Parameter step used when approximating a curve with a polyline of sample points.
pub const CURVE_APPROX_T_STEP: f64 = 0.02;

/// Default tolerance of the epsilon comparisons.
pub const EPSILON: f64 = f64::EPSILON;

const TWO_PI: f64 = 2.0 * PI;

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Linear interpolation between two scalars. `t` is not clamped.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linear interpolation between two points.
///
/// Returns `from` exactly for `t <= 0` and `to` exactly for `t >= 1`.
#[inline]
pub fn lerp_points(from: Point, to: Point, t: f64) -> Point {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }

    point(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
}

/// Clamps `value` to `[min, max]` and tells whether it was out of range.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> (f64, bool) {
    if value < min {
        (min, true)
    } else if value > max {
        (max, true)
    } else {
        (value, false)
    }
}

/// Component-wise comparison with the default tolerance.
#[inline]
pub fn points_equal(a: Point, b: Point) -> bool {
    points_equal_eps(a, b, EPSILON)
}

#[inline]
pub fn points_equal_eps(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// The vector rotated by 90 degrees, `(-y, x)`.
#[inline]
pub fn perpendicular(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Angle of `p` around `center`, in `[0, 2π)`.
pub fn point_to_angle(center: Point, p: Point) -> f64 {
    let angle = (p.y - center.y).atan2(p.x - center.x);
    if angle < 0.0 {
        angle + TWO_PI
    } else {
        angle
    }
}

/// Center of the axis-aligned ellipse of radii `(rx, ry)` that passes through `start`
/// at the polar angle `angle`.
pub fn compute_center(start: Point, rx: f64, ry: f64, angle: f64) -> Point {
    let t = (rx * angle.sin()).atan2(ry * angle.cos());
    point(start.x - rx * t.cos(), start.y - ry * t.sin())
}

/// Point at the polar angle `angle` on the axis-aligned ellipse of radii `(rx, ry)`.
pub fn compute_end_point(center: Point, rx: f64, ry: f64, angle: f64) -> Point {
    let t = (rx * angle.sin()).atan2(ry * angle.cos());
    point(center.x + rx * t.cos(), center.y + ry * t.sin())
}

/// Brings an angle that is at most one turn away back into `[0, 2π)`.
pub fn normalize_360_radians(angle: f64) -> f64 {
    let mut angle = angle;
    if angle >= TWO_PI {
        angle -= TWO_PI;
    }
    if angle <= 0.0 {
        angle += TWO_PI;
    }
    if angle == TWO_PI {
        angle = 0.0;
    }

    angle
}

/// Inclusive point-in-circle test.
#[inline]
pub fn point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    (p - center).square_length() <= radius * radius
}

/// Rounds to nine decimals.
#[inline]
pub(crate) fn round9(v: f64) -> f64 {
    (v * 1e9).round() / 1e9
}

#[cfg(test)]
use approx::assert_relative_eq;

#[test]
fn angle_conversions() {
    assert_relative_eq!(deg_to_rad(180.0), PI);
    assert_relative_eq!(rad_to_deg(PI / 2.0), 90.0);
    assert_relative_eq!(rad_to_deg(deg_to_rad(33.0)), 33.0);
}

#[test]
fn lerp_points_is_exact_at_the_ends() {
    let a = point(0.1, 0.7);
    let b = point(3.3, -1.9);

    assert_eq!(lerp_points(a, b, 0.0), a);
    assert_eq!(lerp_points(a, b, -2.0), a);
    assert_eq!(lerp_points(a, b, 1.0), b);
    assert_eq!(lerp_points(a, b, 5.0), b);
    assert_eq!(lerp_points(point(0.0, 0.0), point(10.0, 4.0), 0.5), point(5.0, 2.0));
}

#[test]
fn epsilon_compare() {
    assert!(points_equal(point(1.0, 2.0), point(1.0, 2.0)));
    assert!(!points_equal(point(1.0, 2.0), point(1.0, 2.0001)));
    assert!(points_equal_eps(point(1.0, 2.0), point(1.0, 2.0001), 0.001));
}

#[test]
fn normalize_angles() {
    assert_relative_eq!(normalize_360_radians(-PI / 2.0), 3.0 * PI / 2.0);
    assert_relative_eq!(normalize_360_radians(5.0 * PI / 2.0), PI / 2.0);
    assert_eq!(normalize_360_radians(2.0 * PI), 0.0);
    assert_eq!(normalize_360_radians(0.0), 0.0);
    assert_relative_eq!(normalize_360_radians(1.0), 1.0);
}

#[test]
fn angles_around_a_center() {
    let c = point(1.0, 1.0);
    assert_relative_eq!(point_to_angle(c, point(2.0, 1.0)), 0.0);
    assert_relative_eq!(point_to_angle(c, point(1.0, 2.0)), PI / 2.0);
    assert_relative_eq!(point_to_angle(c, point(1.0, 0.0)), 3.0 * PI / 2.0);
}

#[test]
fn ellipse_center_and_end_point() {
    let start = point(10.0, 0.0);
    let center = compute_center(start, 10.0, 5.0, 0.0);
    assert_relative_eq!(center.x, 0.0);
    assert_relative_eq!(center.y, 0.0);

    let end = compute_end_point(center, 10.0, 5.0, PI / 2.0);
    assert_relative_eq!(end.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(end.y, 5.0);
    assert_eq!(compute_center(end, 10.0, 5.0, PI / 2.0).y, 0.0);
}

#[test]
fn misc() {
    assert_eq!(clamp(3.0, 0.0, 1.0), (1.0, true));
    assert_eq!(clamp(-3.0, 0.0, 1.0), (0.0, true));
    assert_eq!(clamp(0.5, 0.0, 1.0), (0.5, false));
    assert_eq!(perpendicular(vector(1.0, 0.0)), vector(0.0, 1.0));
    assert!(point_in_circle(point(3.0, 4.0), point(0.0, 0.0), 5.0));
    assert!(!point_in_circle(point(3.0, 4.1), point(0.0, 0.0), 5.0));
    assert_eq!(round9(0.99999999999), 1.0);
}
