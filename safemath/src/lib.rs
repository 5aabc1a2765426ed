//! Checked floating point arithmetic.
//!
//! Every operation here returns a `Result` instead of letting NaN or infinity
//! leak into downstream signals. Vector operations in [`cartesian`] are built
//! only from the scalar primitives below, so a fault anywhere in a cross
//! product surfaces through `?` at the call site.

pub mod cartesian;

pub use cartesian::CartesianVector3;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SafeMathErrors {
    #[error("{op}: operand is not finite ({value})")]
    NonFiniteOperand { op: &'static str, value: f64 },
    #[error("{op}: result overflowed ({lhs}, {rhs})")]
    Overflow {
        op: &'static str,
        lhs: f64,
        rhs: f64,
    },
}

pub type SafeMathResult<T> = Result<T, SafeMathErrors>;

/// Returns an error if `value` is NaN or infinite.
pub fn check_finite(op: &'static str, value: f64) -> SafeMathResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SafeMathErrors::NonFiniteOperand { op, value })
    }
}

fn checked(op: &'static str, lhs: f64, rhs: f64, result: f64) -> SafeMathResult<f64> {
    check_finite(op, lhs)?;
    check_finite(op, rhs)?;
    // finite operands can only leave the finite range by overflowing
    if !result.is_finite() {
        Err(SafeMathErrors::Overflow { op, lhs, rhs })
    } else {
        Ok(result)
    }
}

pub fn safe_add(lhs: f64, rhs: f64) -> SafeMathResult<f64> {
    checked("add", lhs, rhs, lhs + rhs)
}

pub fn safe_sub(lhs: f64, rhs: f64) -> SafeMathResult<f64> {
    checked("sub", lhs, rhs, lhs - rhs)
}

pub fn safe_mul(lhs: f64, rhs: f64) -> SafeMathResult<f64> {
    checked("mul", lhs, rhs, lhs * rhs)
}
