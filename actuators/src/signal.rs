//! Named, typed values exchanged between a model and its host.
//!
//! Each model declares three structs (parameters, inputs, outputs) and derives
//! [`SignalGroup`] for them with `#[derive(Signals)]`. Hosts that wire models
//! together by name go through [`SignalGroup::get`]/[`SignalGroup::set`];
//! Rust callers use the struct fields directly.

use safemath::CartesianVector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalErrors {
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),
    #[error("signal '{name}' expects a {expected} value, got {found}")]
    TypeMismatch {
        name: String,
        expected: SignalType,
        found: SignalType,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Parameter,
    Input,
    Output,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Parameter => write!(f, "parameter"),
            SignalKind::Input => write!(f, "input"),
            SignalKind::Output => write!(f, "output"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalType {
    Scalar,
    Vector3,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Scalar => write!(f, "scalar"),
            SignalType::Vector3 => write!(f, "vector3"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SignalValue {
    Scalar(f64),
    Vector3(CartesianVector3),
}

impl SignalValue {
    pub fn signal_type(&self) -> SignalType {
        match self {
            SignalValue::Scalar(_) => SignalType::Scalar,
            SignalValue::Vector3(_) => SignalType::Vector3,
        }
    }

    /// Flattens the value into its components, in x, y, z order for vectors.
    pub fn components(&self) -> Vec<f64> {
        match self {
            SignalValue::Scalar(v) => vec![*v],
            SignalValue::Vector3(v) => vec![v.x, v.y, v.z],
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Scalar(v) => write!(f, "{v}"),
            SignalValue::Vector3(v) => write!(f, "[{}, {}, {}]", v.x, v.y, v.z),
        }
    }
}

/// Declaration of a single signal: its name, role, type and default.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalSpec {
    pub name: &'static str,
    pub kind: SignalKind,
    pub signal_type: SignalType,
    pub default: SignalValue,
    pub description: &'static str,
}

impl SignalSpec {
    /// Column headers for this signal, one per component.
    pub fn headers(&self) -> Vec<String> {
        match self.signal_type {
            SignalType::Scalar => vec![self.name.to_string()],
            SignalType::Vector3 => ["x", "y", "z"]
                .iter()
                .map(|c| format!("{}[{c}]", self.name))
                .collect(),
        }
    }
}

/// Rust types that can back a signal field.
pub trait SignalField: Sized {
    const SIGNAL_TYPE: SignalType;
    const ZERO: Self;
    fn to_value(&self) -> SignalValue;
    fn from_value(name: &str, value: SignalValue) -> Result<Self, SignalErrors>;
}

impl SignalField for f64 {
    const SIGNAL_TYPE: SignalType = SignalType::Scalar;
    const ZERO: Self = 0.0;

    fn to_value(&self) -> SignalValue {
        SignalValue::Scalar(*self)
    }

    fn from_value(name: &str, value: SignalValue) -> Result<Self, SignalErrors> {
        match value {
            SignalValue::Scalar(v) => Ok(v),
            other => Err(SignalErrors::TypeMismatch {
                name: name.to_string(),
                expected: Self::SIGNAL_TYPE,
                found: other.signal_type(),
            }),
        }
    }
}

impl SignalField for CartesianVector3 {
    const SIGNAL_TYPE: SignalType = SignalType::Vector3;
    const ZERO: Self = CartesianVector3::ZERO;

    fn to_value(&self) -> SignalValue {
        SignalValue::Vector3(*self)
    }

    fn from_value(name: &str, value: SignalValue) -> Result<Self, SignalErrors> {
        match value {
            SignalValue::Vector3(v) => Ok(v),
            other => Err(SignalErrors::TypeMismatch {
                name: name.to_string(),
                expected: Self::SIGNAL_TYPE,
                found: other.signal_type(),
            }),
        }
    }
}

/// A struct of signals that can be described and accessed by name.
pub trait SignalGroup {
    /// Declarations in field order.
    fn specs() -> Vec<SignalSpec>;
    fn get(&self, name: &str) -> Option<SignalValue>;
    fn set(&mut self, name: &str, value: SignalValue) -> Result<(), SignalErrors>;

    /// Every declared signal paired with its current value.
    fn values(&self) -> Vec<(SignalSpec, SignalValue)> {
        Self::specs()
            .into_iter()
            .filter_map(|spec| {
                self.get(spec.name)
                    .map(|value| (spec, value))
            })
            .collect()
    }
}
