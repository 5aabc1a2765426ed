use crate::{SafeMathResult, check_finite, safe_add, safe_mul, safe_sub};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::Neg;

/// A three component vector of `f64` whose arithmetic is checked.
///
/// Operations that can overflow return a [`SafeMathResult`]. Negation cannot
/// leave the finite range, so it is a plain operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianVector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianVector3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds a vector, rejecting NaN or infinite components.
    pub fn try_new(x: f64, y: f64, z: f64) -> SafeMathResult<Self> {
        Ok(Self::new(
            check_finite("new", x)?,
            check_finite("new", y)?,
            check_finite("new", z)?,
        ))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn vec(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn checked_add(&self, rhs: &Self) -> SafeMathResult<Self> {
        Ok(Self::new(
            safe_add(self.x, rhs.x)?,
            safe_add(self.y, rhs.y)?,
            safe_add(self.z, rhs.z)?,
        ))
    }

    pub fn checked_scale(&self, s: f64) -> SafeMathResult<Self> {
        Ok(Self::new(
            safe_mul(self.x, s)?,
            safe_mul(self.y, s)?,
            safe_mul(self.z, s)?,
        ))
    }

    pub fn checked_dot(&self, rhs: &Self) -> SafeMathResult<f64> {
        let xx = safe_mul(self.x, rhs.x)?;
        let yy = safe_mul(self.y, rhs.y)?;
        let zz = safe_mul(self.z, rhs.z)?;
        safe_add(safe_add(xx, yy)?, zz)
    }

    /// `self × rhs`
    pub fn checked_cross(&self, rhs: &Self) -> SafeMathResult<Self> {
        let x = safe_sub(safe_mul(self.y, rhs.z)?, safe_mul(self.z, rhs.y)?)?;
        let y = safe_sub(safe_mul(self.z, rhs.x)?, safe_mul(self.x, rhs.z)?)?;
        let z = safe_sub(safe_mul(self.x, rhs.y)?, safe_mul(self.y, rhs.x)?)?;
        Ok(Self::new(x, y, z))
    }
}

impl From<Vector3<f64>> for CartesianVector3 {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<CartesianVector3> for Vector3<f64> {
    fn from(v: CartesianVector3) -> Self {
        v.vec()
    }
}

impl From<[f64; 3]> for CartesianVector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Neg for CartesianVector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
