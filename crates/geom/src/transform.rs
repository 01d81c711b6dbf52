//! A 2D affine transform with a tracked sparsity state.
//!
//! The matrix is
//!
//! ```text
//! | m00 m01 m02 |
//! | m10 m11 m12 |
//! |  0   0   1  |
//! ```
//!
//! and points are transformed as column vectors:
//! `x' = m00 * x + m01 * y + m02`, `y' = m10 * x + m11 * y + m12`.
//!
//! Alongside the six coefficients the transform stores a [`TransformState`] telling
//! which of them are trivial. The state is part of the value's invariant: after every
//! public operation it is exactly what [`TransformState::from_coefficients`] computes.

use crate::traits::Transformation;
use crate::{point, vector, Point, Transform, Vector};
use core::fmt;
use num_traits::Float;
use thiserror::Error;

const APPLY_IDENTITY: u8 = 0;
const APPLY_TRANSLATE: u8 = 1;
const APPLY_SCALE: u8 = 2;
const APPLY_SCALE_TRANSLATE: u8 = APPLY_SCALE | APPLY_TRANSLATE;
const APPLY_SHEAR: u8 = 4;
const APPLY_SHEAR_TRANSLATE: u8 = APPLY_SHEAR | APPLY_TRANSLATE;
const APPLY_SHEAR_SCALE: u8 = APPLY_SHEAR | APPLY_SCALE;
const APPLY_SHEAR_SCALE_TRANSLATE: u8 = APPLY_SHEAR | APPLY_SCALE | APPLY_TRANSLATE;

// State of a matrix after a quarter turn, indexed by its state before.
const ROT90_CONVERSION: [u8; 8] = [
    APPLY_SHEAR,
    APPLY_SHEAR_TRANSLATE,
    APPLY_SHEAR,
    APPLY_SHEAR_TRANSLATE,
    APPLY_SCALE,
    APPLY_SCALE_TRANSLATE,
    APPLY_SHEAR_SCALE,
    APPLY_SHEAR_SCALE_TRANSLATE,
];

/// Bitmask describing which coefficients of an [`AffineTransform`] are non-trivial.
///
/// - `TRANSLATE`: `m02` or `m12` is non-zero.
/// - `SCALE`: without shear, `m00` or `m11` differs from one. With shear, `m00` or `m11`
///   is non-zero.
/// - `SHEAR`: `m01` or `m10` is non-zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct TransformState(u8);

impl TransformState {
    pub const IDENTITY: Self = TransformState(APPLY_IDENTITY);
    pub const TRANSLATE: Self = TransformState(APPLY_TRANSLATE);
    pub const SCALE: Self = TransformState(APPLY_SCALE);
    pub const SHEAR: Self = TransformState(APPLY_SHEAR);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if all of the flags of `other` are set.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self.0 == APPLY_IDENTITY
    }

    /// The state matching a set of coefficients.
    pub fn from_coefficients(m00: f64, m10: f64, m01: f64, m11: f64, m02: f64, m12: f64) -> Self {
        let linear = if m01 == 0.0 && m10 == 0.0 {
            if m00 == 1.0 && m11 == 1.0 {
                APPLY_IDENTITY
            } else {
                APPLY_SCALE
            }
        } else if m00 == 0.0 && m11 == 0.0 {
            APPLY_SHEAR
        } else {
            APPLY_SHEAR_SCALE
        };

        if m02 != 0.0 || m12 != 0.0 {
            TransformState(linear | APPLY_TRANSLATE)
        } else {
            TransformState(linear)
        }
    }
}

impl core::ops::BitOr for TransformState {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        TransformState(self.0 | other.0)
    }
}

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum TransformError {
    #[error("The transform is not invertible, determinant is {determinant}.")]
    Singular { determinant: f64 },
    #[error("The transform has non-finite coefficients.")]
    NonFinite,
}

// The smallest positive subnormal.
const MIN_DETERMINANT: f64 = 5e-324;

/// The six coefficients in the order used by the DOM's `DOMMatrix`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DomMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// A 2D affine transform.
///
/// Mutating methods compose in place and return `&mut Self` so that they can be chained:
///
/// ```
/// use vellum_geom::{point, vector, AffineTransform};
///
/// let mut m = AffineTransform::identity();
/// m.translate(vector(10.0, 0.0)).scale(2.0, 2.0);
/// assert_eq!(m.transform_point(point(1.0, 1.0)), point(12.0, 2.0));
/// ```
///
/// Instances are plain values without interior mutability. Sharing one mutable instance
/// between threads requires external synchronization.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct AffineTransform {
    m00: f64,
    m10: f64,
    m01: f64,
    m11: f64,
    m02: f64,
    m12: f64,
    state: TransformState,
}

impl Default for AffineTransform {
    fn default() -> Self {
        AffineTransform::identity()
    }
}

impl AffineTransform {
    /// Creates a transform from its coefficients, in column order.
    pub fn new(m00: f64, m10: f64, m01: f64, m11: f64, m02: f64, m12: f64) -> Self {
        let mut m = AffineTransform {
            m00,
            m10,
            m01,
            m11,
            m02,
            m12,
            state: TransformState::IDENTITY,
        };
        m.update_state();
        m
    }

    pub const fn identity() -> Self {
        AffineTransform {
            m00: 1.0,
            m10: 0.0,
            m01: 0.0,
            m11: 1.0,
            m02: 0.0,
            m12: 0.0,
            state: TransformState::IDENTITY,
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        let mut m = AffineTransform::identity();
        m.set_to_translation(tx, ty);
        m
    }

    pub fn rotation(theta: f64) -> Self {
        let mut m = AffineTransform::identity();
        m.set_to_rotation(theta);
        m
    }

    /// Rotation by `quadrants` quarter turns.
    pub fn quadrant_rotation(quadrants: i32) -> Self {
        let mut m = AffineTransform::identity();
        m.set_to_quadrant_rotation(quadrants);
        m
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        let mut m = AffineTransform::identity();
        m.set_to_scale(sx, sy);
        m
    }

    pub fn shearing(shx: f64, shy: f64) -> Self {
        let mut m = AffineTransform::identity();
        m.set_to_shear(shx, shy);
        m
    }

    #[inline]
    pub fn state(&self) -> TransformState {
        self.state
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.state.is_identity()
    }

    /// Returns true if none of the coefficients is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        [self.m00, self.m10, self.m01, self.m11, self.m02, self.m12]
            .iter()
            .all(|v| v.is_finite())
    }

    #[inline]
    pub fn m00(&self) -> f64 {
        self.m00
    }
    #[inline]
    pub fn m10(&self) -> f64 {
        self.m10
    }
    #[inline]
    pub fn m01(&self) -> f64 {
        self.m01
    }
    #[inline]
    pub fn m11(&self) -> f64 {
        self.m11
    }
    #[inline]
    pub fn m02(&self) -> f64 {
        self.m02
    }
    #[inline]
    pub fn m12(&self) -> f64 {
        self.m12
    }

    #[inline]
    pub fn scale_x(&self) -> f64 {
        self.m00
    }
    #[inline]
    pub fn scale_y(&self) -> f64 {
        self.m11
    }
    #[inline]
    pub fn shear_x(&self) -> f64 {
        self.m01
    }
    #[inline]
    pub fn shear_y(&self) -> f64 {
        self.m10
    }
    #[inline]
    pub fn translate_x(&self) -> f64 {
        self.m02
    }
    #[inline]
    pub fn translate_y(&self) -> f64 {
        self.m12
    }

    pub fn determinant(&self) -> f64 {
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                self.m00 * self.m11 - self.m01 * self.m10
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => -(self.m01 * self.m10),
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => self.m00 * self.m11,
            _ => 1.0,
        }
    }

    pub fn to_dom_matrix(&self) -> DomMatrix {
        DomMatrix {
            a: self.m00,
            b: self.m10,
            c: self.m01,
            d: self.m11,
            e: self.m02,
            f: self.m12,
        }
    }

    pub fn to_transform2d(&self) -> Transform {
        Transform::new(self.m00, self.m10, self.m01, self.m11, self.m02, self.m12)
    }

    fn update_state(&mut self) {
        self.state = TransformState::from_coefficients(
            self.m00, self.m10, self.m01, self.m11, self.m02, self.m12,
        );
    }

    #[inline(always)]
    fn check_state(&self) {
        debug_assert_eq!(
            self.state,
            TransformState::from_coefficients(
                self.m00, self.m10, self.m01, self.m11, self.m02, self.m12
            ),
            "transform state out of sync with {:?}",
            self
        );
    }

    pub fn set_to_identity(&mut self) {
        *self = AffineTransform::identity();
    }

    pub fn set_to_translation(&mut self, tx: f64, ty: f64) {
        self.m00 = 1.0;
        self.m10 = 0.0;
        self.m01 = 0.0;
        self.m11 = 1.0;
        self.m02 = tx;
        self.m12 = ty;
        self.state = if tx != 0.0 || ty != 0.0 {
            TransformState::TRANSLATE
        } else {
            TransformState::IDENTITY
        };
    }

    /// Sets this transform to a rotation of `theta` radians.
    ///
    /// When the sine or the cosine is exactly `±1` the other one is forced to zero so that
    /// quarter turns produce exact coefficients.
    pub fn set_to_rotation(&mut self, theta: f64) {
        let mut sin = theta.sin();
        let mut cos = theta.cos();
        if sin == 1.0 || sin == -1.0 {
            cos = 0.0;
        } else if cos == 1.0 || cos == -1.0 {
            sin = 0.0;
        }
        self.m00 = cos;
        self.m10 = sin;
        self.m01 = -sin;
        self.m11 = cos;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.update_state();
    }

    pub fn set_to_quadrant_rotation(&mut self, quadrants: i32) {
        let (m00, m10) = match quadrants & 3 {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        self.m00 = m00;
        self.m10 = m10;
        self.m01 = -m10;
        self.m11 = m00;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.update_state();
    }

    pub fn set_to_scale(&mut self, sx: f64, sy: f64) {
        self.m00 = sx;
        self.m10 = 0.0;
        self.m01 = 0.0;
        self.m11 = sy;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.state = if sx != 1.0 || sy != 1.0 {
            TransformState::SCALE
        } else {
            TransformState::IDENTITY
        };
    }

    pub fn set_to_shear(&mut self, shx: f64, shy: f64) {
        self.m00 = 1.0;
        self.m01 = shx;
        self.m10 = shy;
        self.m11 = 1.0;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.state = if shx != 0.0 || shy != 0.0 {
            TransformState(APPLY_SHEAR_SCALE)
        } else {
            TransformState::IDENTITY
        };
    }

    pub fn set_transform(&mut self, other: &AffineTransform) {
        *self = *other;
    }

    /// Concatenates a translation: `self = self ∘ translation(v)`.
    pub fn translate(&mut self, v: Vector) -> &mut Self {
        let (tx, ty) = (v.x, v.y);
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                self.m02 += tx * self.m00 + ty * self.m01;
                self.m12 += tx * self.m10 + ty * self.m11;
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => {
                self.m02 += ty * self.m01;
                self.m12 += tx * self.m10;
            }
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => {
                self.m02 += tx * self.m00;
                self.m12 += ty * self.m11;
            }
            _ => {
                self.m02 += tx;
                self.m12 += ty;
            }
        }

        if self.m02 != 0.0 || self.m12 != 0.0 {
            self.state.0 |= APPLY_TRANSLATE;
        } else {
            self.state.0 &= !APPLY_TRANSLATE;
        }

        self.check_state();
        self
    }

    /// Concatenates a rotation of `theta` radians.
    ///
    /// Quarter and half turns are detected through their exact sine or cosine values and
    /// applied by swapping coefficients rather than multiplying them.
    pub fn rotate(&mut self, theta: f64) -> &mut Self {
        let sin = theta.sin();
        if sin == 1.0 {
            self.rotate90();
        } else if sin == -1.0 {
            self.rotate270();
        } else {
            let cos = theta.cos();
            if cos == -1.0 {
                self.rotate180();
            } else if cos != 1.0 {
                let m0 = self.m00;
                let m1 = self.m01;
                self.m00 = cos * m0 + sin * m1;
                self.m01 = -sin * m0 + cos * m1;
                let m0 = self.m10;
                let m1 = self.m11;
                self.m10 = cos * m0 + sin * m1;
                self.m11 = -sin * m0 + cos * m1;
                self.update_state();
            }
        }

        self.check_state();
        self
    }

    /// Concatenates a number of quarter turns.
    pub fn quadrant_rotate(&mut self, quadrants: i32) -> &mut Self {
        match quadrants & 3 {
            0 => {}
            1 => self.rotate90(),
            2 => self.rotate180(),
            _ => self.rotate270(),
        }

        self.check_state();
        self
    }

    fn rotate90(&mut self) {
        let m0 = self.m00;
        self.m00 = self.m01;
        self.m01 = -m0;
        let m0 = self.m10;
        self.m10 = self.m11;
        self.m11 = -m0;
        self.state.0 = ROT90_CONVERSION[self.state.0 as usize];
        self.fix_quadrant_state();
    }

    fn rotate180(&mut self) {
        self.m00 = -self.m00;
        self.m11 = -self.m11;
        if self.state.0 & APPLY_SHEAR != 0 {
            self.m01 = -self.m01;
            self.m10 = -self.m10;
        } else if self.m00 == 1.0 && self.m11 == 1.0 {
            self.state.0 &= !APPLY_SCALE;
        } else {
            self.state.0 |= APPLY_SCALE;
        }
    }

    fn rotate270(&mut self) {
        let m0 = self.m00;
        self.m00 = -self.m01;
        self.m01 = m0;
        let m0 = self.m10;
        self.m10 = -self.m11;
        self.m11 = m0;
        self.state.0 = ROT90_CONVERSION[self.state.0 as usize];
        self.fix_quadrant_state();
    }

    // The conversion table assumes the linear part was not degenerate.
    fn fix_quadrant_state(&mut self) {
        let linear = self.state.0 & APPLY_SHEAR_SCALE;
        if linear == APPLY_SCALE && self.m00 == 1.0 && self.m11 == 1.0 {
            self.state.0 &= !APPLY_SCALE;
        } else if linear & APPLY_SHEAR != 0 && self.m01 == 0.0 && self.m10 == 0.0 {
            // A zero matrix rotated is still a zero matrix.
            self.update_state();
        }
    }

    /// Concatenates a scale: `self = self ∘ scale(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                self.m00 *= sx;
                self.m11 *= sy;
                self.m01 *= sy;
                self.m10 *= sx;
                self.update_state();
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => {
                self.m01 *= sy;
                self.m10 *= sx;
                if self.m01 == 0.0 && self.m10 == 0.0 {
                    // The diagonal of a pure shear is zero.
                    self.state.0 = (self.state.0 & APPLY_TRANSLATE) | APPLY_SCALE;
                }
            }
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => {
                self.m00 *= sx;
                self.m11 *= sy;
                if self.m00 == 1.0 && self.m11 == 1.0 {
                    self.state.0 &= APPLY_TRANSLATE;
                } else {
                    self.state.0 |= APPLY_SCALE;
                }
            }
            _ => {
                self.m00 = sx;
                self.m11 = sy;
                if sx != 1.0 || sy != 1.0 {
                    self.state.0 |= APPLY_SCALE;
                }
            }
        }

        self.check_state();
        self
    }

    /// Concatenates a shear: `self = self ∘ shear(shx, shy)`.
    pub fn shear(&mut self, shx: f64, shy: f64) -> &mut Self {
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                let m0 = self.m00;
                let m1 = self.m01;
                self.m00 = m0 + m1 * shy;
                self.m01 = m0 * shx + m1;
                let m0 = self.m10;
                let m1 = self.m11;
                self.m10 = m0 + m1 * shy;
                self.m11 = m0 * shx + m1;
                self.update_state();
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => {
                self.m00 = self.m01 * shy;
                self.m11 = self.m10 * shx;
                if self.m00 != 0.0 || self.m11 != 0.0 {
                    self.state.0 |= APPLY_SCALE;
                }
            }
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => {
                self.m01 = self.m00 * shx;
                self.m10 = self.m11 * shy;
                if self.m01 != 0.0 || self.m10 != 0.0 {
                    self.state.0 |= APPLY_SHEAR;
                }
            }
            _ => {
                self.m01 = shx;
                self.m10 = shy;
                if self.m01 != 0.0 || self.m10 != 0.0 {
                    self.state.0 |= APPLY_SCALE | APPLY_SHEAR;
                }
            }
        }

        self.check_state();
        self
    }

    /// Right-multiplies by `tx`: `self = self ∘ tx`.
    ///
    /// Points transformed by the result are first transformed by `tx`, then by the
    /// previous value of `self`.
    pub fn concatenate(&mut self, tx: &AffineTransform) -> &mut Self {
        if tx.state.0 == APPLY_IDENTITY {
            return self;
        }
        if self.state.0 == APPLY_IDENTITY {
            *self = *tx;
            return self;
        }

        match tx.state.0 {
            APPLY_TRANSLATE => {
                return self.translate(vector(tx.m02, tx.m12));
            }
            APPLY_SCALE => {
                return self.scale(tx.m00, tx.m11);
            }
            APPLY_SHEAR => {
                let (m00, m01, m10, m11) = (self.m00, self.m01, self.m10, self.m11);
                self.m00 = m01 * tx.m10;
                self.m01 = m00 * tx.m01;
                self.m10 = m11 * tx.m10;
                self.m11 = m10 * tx.m01;
                self.update_state();
                self.check_state();
                return self;
            }
            _ => {}
        }

        let (t00, t01, t02) = (tx.m00, tx.m01, tx.m02);
        let (t10, t11, t12) = (tx.m10, tx.m11, tx.m12);
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                let (m0, m1) = (self.m00, self.m01);
                self.m00 = t00 * m0 + t10 * m1;
                self.m01 = t01 * m0 + t11 * m1;
                self.m02 += t02 * m0 + t12 * m1;
                let (m0, m1) = (self.m10, self.m11);
                self.m10 = t00 * m0 + t10 * m1;
                self.m11 = t01 * m0 + t11 * m1;
                self.m12 += t02 * m0 + t12 * m1;
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => {
                let m01 = self.m01;
                self.m00 = t10 * m01;
                self.m01 = t11 * m01;
                self.m02 += t12 * m01;
                let m10 = self.m10;
                self.m10 = t00 * m10;
                self.m11 = t01 * m10;
                self.m12 += t02 * m10;
            }
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => {
                let m00 = self.m00;
                self.m00 = t00 * m00;
                self.m01 = t01 * m00;
                self.m02 += t02 * m00;
                let m11 = self.m11;
                self.m10 = t10 * m11;
                self.m11 = t11 * m11;
                self.m12 += t12 * m11;
            }
            _ => {
                self.m00 = t00;
                self.m01 = t01;
                self.m02 += t02;
                self.m10 = t10;
                self.m11 = t11;
                self.m12 += t12;
            }
        }
        self.update_state();

        self.check_state();
        self
    }

    /// Left-multiplies by `tx`: `self = tx ∘ self`.
    pub fn pre_concatenate(&mut self, tx: &AffineTransform) -> &mut Self {
        let mut result = *tx;
        result.concatenate(self);
        *self = result;
        self
    }

    /// Inverts this transform in place.
    ///
    /// Fails without modifying `self` when the transform is singular or has non-finite
    /// coefficients.
    pub fn invert(&mut self) -> Result<(), TransformError> {
        if !self.is_finite() {
            return Err(TransformError::NonFinite);
        }

        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE | APPLY_SHEAR_SCALE => {
                let det = self.m00 * self.m11 - self.m01 * self.m10;
                if !det.is_finite() || det.abs() <= MIN_DETERMINANT {
                    return Err(TransformError::Singular { determinant: det });
                }
                let (m00, m01, m02) = (self.m00, self.m01, self.m02);
                let (m10, m11, m12) = (self.m10, self.m11, self.m12);
                self.m00 = m11 / det;
                self.m10 = -m10 / det;
                self.m01 = -m01 / det;
                self.m11 = m00 / det;
                self.m02 = (m01 * m12 - m11 * m02) / det;
                self.m12 = (m10 * m02 - m00 * m12) / det;
            }
            APPLY_SHEAR_TRANSLATE | APPLY_SHEAR => {
                let (m01, m10) = (self.m01, self.m10);
                if m01 == 0.0 || m10 == 0.0 {
                    return Err(TransformError::Singular { determinant: 0.0 });
                }
                let (m02, m12) = (self.m02, self.m12);
                self.m10 = 1.0 / m01;
                self.m01 = 1.0 / m10;
                self.m02 = -m12 / m10;
                self.m12 = -m02 / m01;
            }
            APPLY_SCALE_TRANSLATE | APPLY_SCALE => {
                let (m00, m11) = (self.m00, self.m11);
                if m00 == 0.0 || m11 == 0.0 {
                    return Err(TransformError::Singular { determinant: 0.0 });
                }
                self.m00 = 1.0 / m00;
                self.m11 = 1.0 / m11;
                self.m02 = -self.m02 / m00;
                self.m12 = -self.m12 / m11;
            }
            APPLY_TRANSLATE => {
                self.m02 = -self.m02;
                self.m12 = -self.m12;
            }
            _ => {}
        }

        // Divisions can flush tiny coefficients to zero.
        self.update_state();
        self.check_state();
        Ok(())
    }

    pub fn create_inverse(&self) -> Result<AffineTransform, TransformError> {
        let mut inverse = *self;
        inverse.invert()?;
        Ok(inverse)
    }

    /// Transforms a point, including the translation.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        let (x, y) = (p.x, p.y);
        match self.state.0 {
            APPLY_SHEAR_SCALE_TRANSLATE => point(
                x * self.m00 + y * self.m01 + self.m02,
                x * self.m10 + y * self.m11 + self.m12,
            ),
            APPLY_SHEAR_SCALE => point(x * self.m00 + y * self.m01, x * self.m10 + y * self.m11),
            APPLY_SHEAR_TRANSLATE => point(y * self.m01 + self.m02, x * self.m10 + self.m12),
            APPLY_SHEAR => point(y * self.m01, x * self.m10),
            APPLY_SCALE_TRANSLATE => point(x * self.m00 + self.m02, y * self.m11 + self.m12),
            APPLY_SCALE => point(x * self.m00, y * self.m11),
            APPLY_TRANSLATE => point(x + self.m02, y + self.m12),
            _ => p,
        }
    }

    /// Transforms a vector, ignoring the translation.
    #[inline]
    pub fn transform_vector(&self, v: Vector) -> Vector {
        let (x, y) = (v.x, v.y);
        match self.state.0 & APPLY_SHEAR_SCALE {
            APPLY_SHEAR_SCALE => vector(x * self.m00 + y * self.m01, x * self.m10 + y * self.m11),
            APPLY_SHEAR => vector(y * self.m01, x * self.m10),
            APPLY_SCALE => vector(x * self.m00, y * self.m11),
            _ => v,
        }
    }

    /// Transforms `count` points in place, starting at `start`.
    ///
    /// The range is clamped to the slice.
    pub fn transform(&self, points: &mut [Point], start: usize, count: usize) {
        let end = start.saturating_add(count).min(points.len());
        if start >= end || self.is_identity() {
            return;
        }
        for p in &mut points[start..end] {
            *p = self.transform_point(*p);
        }
    }

    /// Returns transformed copies of `points`.
    #[cfg(feature = "std")]
    pub fn transformed(&self, points: &[Point]) -> std::vec::Vec<Point> {
        points.iter().map(|p| self.transform_point(*p)).collect()
    }
}

impl Transformation for AffineTransform {
    fn transform_point(&self, p: Point) -> Point {
        AffineTransform::transform_point(self, p)
    }

    fn transform_vector(&self, v: Vector) -> Vector {
        AffineTransform::transform_vector(self, v)
    }
}

impl From<Transform> for AffineTransform {
    fn from(t: Transform) -> Self {
        AffineTransform::new(t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
    }
}

impl From<AffineTransform> for Transform {
    fn from(t: AffineTransform) -> Self {
        t.to_transform2d()
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "AffineTransform[[{}, {}, {}], [{}, {}, {}]]",
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12
        )
    }
}

#[cfg(test)]
use approx::assert_relative_eq;
#[cfg(test)]
use core::f64::consts::PI;

#[cfg(test)]
fn assert_exact_state(m: &AffineTransform) {
    assert_eq!(
        m.state(),
        TransformState::from_coefficients(m.m00, m.m10, m.m01, m.m11, m.m02, m.m12),
        "{:?}",
        m
    );
}

#[cfg(test)]
fn test_points() -> [Point; 6] {
    [
        point(0.0, 0.0),
        point(1.0, 0.0),
        point(0.0, 1.0),
        point(-3.5, 12.25),
        point(1.0e5, -2.0e-3),
        point(7.0, 7.0),
    ]
}

#[test]
fn identity_is_exact() {
    let m = AffineTransform::identity();
    for p in &test_points() {
        assert_eq!(m.transform_point(*p), *p);
    }
    assert_eq!(m.transform_point(point(0.1, 0.2)), point(0.1, 0.2));
    assert!(m.is_identity());
    assert_eq!(m.determinant(), 1.0);
}

#[test]
fn state_from_coefficients() {
    let s = TransformState::from_coefficients;
    assert_eq!(s(1.0, 0.0, 0.0, 1.0, 0.0, 0.0), TransformState::IDENTITY);
    assert_eq!(s(1.0, 0.0, 0.0, 1.0, 0.0, 2.0), TransformState::TRANSLATE);
    assert_eq!(s(2.0, 0.0, 0.0, 1.0, 0.0, 0.0), TransformState::SCALE);
    assert_eq!(s(0.0, 1.0, -1.0, 0.0, 0.0, 0.0), TransformState::SHEAR);
    assert_eq!(
        s(0.5, 1.0, -1.0, 0.5, 3.0, 0.0),
        TransformState::SHEAR | TransformState::SCALE | TransformState::TRANSLATE
    );
    assert!(s(0.5, 1.0, -1.0, 0.5, 3.0, 0.0).contains(TransformState::SHEAR));
    assert!(!s(0.5, 0.0, 0.0, 0.5, 3.0, 0.0).contains(TransformState::SHEAR));
}

#[test]
fn translate_collapses_back_to_identity() {
    let mut m = AffineTransform::identity();
    m.translate(vector(3.0, -2.0));
    assert_eq!(m.state(), TransformState::TRANSLATE);
    assert_eq!(m.transform_point(point(1.0, 1.0)), point(4.0, -1.0));
    assert_eq!(m.transform_vector(vector(1.0, 1.0)), vector(1.0, 1.0));

    m.translate(vector(-3.0, 2.0));
    assert!(m.is_identity());
    assert_exact_state(&m);
}

#[test]
fn translate_in_scaled_space() {
    let mut m = AffineTransform::scaling(2.0, 3.0);
    m.translate(vector(1.0, 1.0));
    assert_eq!(m.state(), TransformState::SCALE | TransformState::TRANSLATE);
    assert_eq!(m.transform_point(point(0.0, 0.0)), point(2.0, 3.0));
    assert_exact_state(&m);
}

#[test]
fn scale_collapses_back_to_identity() {
    let mut m = AffineTransform::identity();
    m.scale(2.0, 4.0);
    assert_eq!(m.state(), TransformState::SCALE);
    assert_eq!(m.transform_point(point(1.0, 1.0)), point(2.0, 4.0));

    m.scale(0.5, 0.25);
    assert!(m.is_identity());
    assert_exact_state(&m);
}

#[test]
fn quarter_turns_are_exact() {
    let mut m = AffineTransform::identity();
    m.rotate(PI / 2.0);
    assert_eq!(m.state(), TransformState::SHEAR);
    assert_eq!(m.transform_point(point(1.0, 0.0)), point(0.0, 1.0));
    assert_eq!(m.transform_point(point(0.0, 1.0)), point(-1.0, 0.0));

    m.rotate(PI / 2.0);
    assert_eq!(m.state(), TransformState::SCALE);
    assert_eq!(m.transform_point(point(1.0, 0.0)), point(-1.0, 0.0));

    m.rotate(PI);
    assert!(m.is_identity());

    m.rotate(-PI / 2.0);
    assert_eq!(m.transform_point(point(1.0, 0.0)), point(0.0, -1.0));
    m.quadrant_rotate(1);
    assert!(m.is_identity());
    assert_exact_state(&m);
}

#[test]
fn general_rotation() {
    let mut m = AffineTransform::identity();
    m.rotate(PI / 6.0);
    assert_eq!(m.state(), TransformState::SHEAR | TransformState::SCALE);
    let p = m.transform_point(point(2.0, 0.0));
    assert_relative_eq!(p.x, 3.0f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    assert_exact_state(&m);

    let r = AffineTransform::rotation(PI / 2.0);
    assert_eq!(r.m00(), 0.0);
    assert_eq!(r.m10(), 1.0);
    assert_eq!(r.state(), TransformState::SHEAR);
    assert_eq!(AffineTransform::quadrant_rotation(2), AffineTransform::scaling(-1.0, -1.0));
}

#[test]
fn rotating_a_zero_matrix() {
    let mut m = AffineTransform::scaling(0.0, 0.0);
    m.rotate(PI / 2.0);
    assert_exact_state(&m);
    m.rotate(PI);
    assert_exact_state(&m);
    assert_eq!(m.transform_point(point(3.0, 4.0)), point(0.0, 0.0));
}

#[test]
fn shear() {
    let mut m = AffineTransform::identity();
    m.shear(2.0, 0.0);
    assert_eq!(m.state(), TransformState::SHEAR | TransformState::SCALE);
    assert_eq!(m.transform_point(point(1.0, 1.0)), point(3.0, 1.0));
    assert_exact_state(&m);

    let mut s = AffineTransform::scaling(2.0, 2.0);
    s.shear(0.5, 0.0);
    assert_eq!(s.transform_point(point(0.0, 2.0)), point(2.0, 4.0));
    assert_exact_state(&s);

    let mut r = AffineTransform::quadrant_rotation(1);
    r.shear(1.0, 1.0);
    assert_exact_state(&r);
    assert_eq!(r.transform_point(point(1.0, 0.0)), point(-1.0, 1.0));
}

#[test]
fn concatenate_matches_euclid() {
    let mut a = AffineTransform::translation(3.0, 4.0);
    a.rotate(0.7).scale(2.0, 3.0);
    let mut b = AffineTransform::shearing(0.5, 0.1);
    b.translate(vector(-1.0, 2.0));

    let mut c = a;
    c.concatenate(&b);
    assert_exact_state(&c);

    // euclid composes with row vectors: `then` applies self first.
    let expected = b.to_transform2d().then(&a.to_transform2d());
    for p in &test_points() {
        let p1 = c.transform_point(*p);
        let p2 = expected.transform_point(*p);
        assert_relative_eq!(p1.x, p2.x, epsilon = 1e-6, max_relative = 1e-12);
        assert_relative_eq!(p1.y, p2.y, epsilon = 1e-6, max_relative = 1e-12);
    }

    let mut d = b;
    d.pre_concatenate(&a);
    for p in &test_points() {
        let p1 = c.transform_point(*p);
        let p2 = d.transform_point(*p);
        assert_relative_eq!(p1.x, p2.x, epsilon = 1e-6, max_relative = 1e-12);
        assert_relative_eq!(p1.y, p2.y, epsilon = 1e-6, max_relative = 1e-12);
    }
}

#[test]
fn concatenate_simple_cases() {
    let mut m = AffineTransform::identity();
    m.concatenate(&AffineTransform::translation(1.0, 2.0));
    assert_eq!(m, AffineTransform::translation(1.0, 2.0));

    m.concatenate(&AffineTransform::identity());
    assert_eq!(m, AffineTransform::translation(1.0, 2.0));

    m.concatenate(&AffineTransform::scaling(2.0, 2.0));
    assert_eq!(m.transform_point(point(1.0, 1.0)), point(3.0, 4.0));
    assert_exact_state(&m);

    m.concatenate(&AffineTransform::quadrant_rotation(1));
    assert_eq!(m.transform_point(point(1.0, 0.0)), point(1.0, 4.0));
    assert_exact_state(&m);

    // The opposite quarter turn undoes the previous one.
    m.concatenate(&AffineTransform::quadrant_rotation(3));
    assert_eq!(m.state(), TransformState::SCALE | TransformState::TRANSLATE);
    assert_eq!(m.transform_point(point(1.0, 1.0)), point(3.0, 4.0));
}

#[test]
fn inverse_round_trip() {
    let mut t = AffineTransform::translation(3.0, 4.0);
    t.rotate(0.7).scale(2.0, 3.0).shear(0.5, 0.1);

    let mut round_trip = t.create_inverse().unwrap();
    round_trip.concatenate(&t);
    for p in &test_points() {
        let q = round_trip.transform_point(*p);
        assert!((q.x - p.x).abs() < 1e-9 * (1.0 + p.x.abs()), "{:?} {:?}", p, q);
        assert!((q.y - p.y).abs() < 1e-9 * (1.0 + p.y.abs()), "{:?} {:?}", p, q);
    }

    let cases = [
        AffineTransform::translation(1.0, -2.0),
        AffineTransform::scaling(4.0, 0.5),
        AffineTransform::quadrant_rotation(1),
        {
            let mut m = AffineTransform::quadrant_rotation(3);
            m.translate(vector(5.0, 6.0)).scale(2.0, 1.0);
            m
        },
    ];
    for t in &cases {
        let inv = t.create_inverse().unwrap();
        assert_exact_state(&inv);
        for p in &test_points() {
            let q = inv.transform_point(t.transform_point(*p));
            assert_relative_eq!(q.x, p.x, epsilon = 1e-9);
            assert_relative_eq!(q.y, p.y, epsilon = 1e-9);
        }
    }
}

#[test]
fn singular_matrices() {
    let m = AffineTransform::scaling(0.0, 1.0);
    assert_eq!(
        m.create_inverse(),
        Err(TransformError::Singular { determinant: 0.0 })
    );

    let mut m = AffineTransform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
    let before = m;
    assert_eq!(
        m.invert(),
        Err(TransformError::Singular { determinant: 0.0 })
    );
    assert_eq!(m, before);

    let m = AffineTransform::new(0.0, 0.0, 3.0, 0.0, 1.0, 1.0);
    assert_eq!(m.state(), TransformState::SHEAR | TransformState::TRANSLATE);
    assert!(m.create_inverse().is_err());
}

#[test]
fn subnormal_determinants_are_invertible() {
    let m = AffineTransform::new(1e-160, 1e-300, 1e-300, 1e-150, 0.0, 0.0);
    assert_eq!(m.state(), TransformState::SHEAR | TransformState::SCALE);
    assert!(m.determinant() > 0.0 && m.determinant() < f64::MIN_POSITIVE);
    let inv = m.create_inverse().unwrap();
    assert!(inv.is_finite());
    assert_exact_state(&inv);
}

#[test]
fn non_finite_transforms() {
    let mut m = AffineTransform::identity();
    m.scale(f64::INFINITY, 1.0);
    assert!(!m.is_finite());
    assert_eq!(m.create_inverse(), Err(TransformError::NonFinite));

    let mut points = [point(0.0, 0.0), point(1.0, 1.0)];
    m.transform(&mut points, 0, 2);
    assert!(points[0].x.is_nan());
    assert_eq!(points[1], point(f64::INFINITY, 1.0));

    let mut m = AffineTransform::new(f64::NAN, 1.0, 1.0, 1.0, 0.0, 0.0);
    let before = m;
    assert_eq!(m.invert(), Err(TransformError::NonFinite));
    assert_eq!(m.m10(), before.m10());

    let mut t = AffineTransform::translation(f64::INFINITY, 0.0);
    assert_eq!(t.invert(), Err(TransformError::NonFinite));
    assert!(AffineTransform::rotation(0.3).is_finite());
}

#[test]
fn transform_slices() {
    let m = AffineTransform::translation(1.0, 0.0);
    let mut points = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)];
    m.transform(&mut points, 1, 1);
    assert_eq!(points, [point(0.0, 0.0), point(2.0, 1.0), point(2.0, 2.0)]);

    m.transform(&mut points, 2, 10);
    assert_eq!(points[2], point(3.0, 2.0));

    m.transform(&mut points, 5, 1);
    assert_eq!(points[2], point(3.0, 2.0));
}

#[cfg(feature = "std")]
#[test]
fn transformed_copies() {
    let m = AffineTransform::scaling(2.0, 3.0);
    let points = [point(1.0, 1.0), point(-1.0, 2.0)];
    assert_eq!(m.transformed(&points), std::vec![point(2.0, 3.0), point(-2.0, 6.0)]);
    assert_eq!(points[0], point(1.0, 1.0));
}

#[test]
fn conversions() {
    let mut m = AffineTransform::translation(5.0, 6.0);
    m.shear(1.0, 2.0);
    let dom = m.to_dom_matrix();
    assert_eq!(
        dom,
        DomMatrix { a: 1.0, b: 2.0, c: 1.0, d: 1.0, e: 5.0, f: 6.0 }
    );

    let t: Transform = m.into();
    let back = AffineTransform::from(t);
    assert_eq!(back, m);
    assert_eq!(t.transform_point(point(1.0, 1.0)), m.transform_point(point(1.0, 1.0)));
}

#[test]
fn random_walk_keeps_exact_state() {
    let mut m = AffineTransform::identity();
    let angles = [PI / 2.0, 0.3, PI, -PI / 2.0, 1.1, 0.0];
    for (i, angle) in angles.iter().enumerate() {
        let f = i as f64;
        m.rotate(*angle);
        assert_exact_state(&m);
        m.scale(1.0 / (f + 1.0), f + 1.0);
        assert_exact_state(&m);
        m.translate(vector(f, -f));
        assert_exact_state(&m);
        m.shear(0.0, 0.0);
        assert_exact_state(&m);
        m.concatenate(&AffineTransform::shearing(f * 0.1, 0.0));
        assert_exact_state(&m);
    }
}
