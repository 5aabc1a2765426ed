use ron::{Options, error::SpannedResult, extensions::Extensions};
use serde::{Deserialize, Serialize};

use crate::{
    Actuator, ActuatorErrors, Magnetorquer, MagnetorquerPayload, Torquer,
    lifecycle::LifecycleState,
    magnetorquer::MagnetorquerParameters,
    magnetorquer_payload::MagnetorquerPayloadParameters,
    signal::{SignalSpec, SignalValue},
};

/// RON options for model and scenario files. Newtype variants may be written
/// with the fields of their parameters inline, `Magnetorquer(m_prime: ..)`.
pub fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::UNWRAP_VARIANT_NEWTYPES)
}

/// Configuration of one model instance, as read from a RON file.
///
/// ```ron
/// Magnetorquer(m_prime: (x: 0.36674, y: 0.0, z: 0.0))
/// ```
///
/// Omitted parameters default to zero.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum ModelConfig {
    Magnetorquer(MagnetorquerParameters),
    Torquer,
    MagnetorquerPayload(MagnetorquerPayloadParameters),
}

impl ModelConfig {
    pub fn from_ron(s: &str) -> SpannedResult<Self> {
        ron_options().from_str(s)
    }

    pub fn build(&self, name: &str) -> Models {
        match self {
            ModelConfig::Magnetorquer(parameters) => Models::Magnetorquer(Actuator::new(
                name,
                Magnetorquer::from(parameters.clone()),
            )),
            ModelConfig::Torquer => Models::Torquer(Actuator::new(name, Torquer::new())),
            ModelConfig::MagnetorquerPayload(parameters) => Models::MagnetorquerPayload(
                Actuator::new(name, MagnetorquerPayload::from(parameters.clone())),
            ),
        }
    }

    /// Full signal table of the configured model type.
    pub fn schema(&self) -> Vec<SignalSpec> {
        match self {
            ModelConfig::Magnetorquer(_) => Actuator::<Magnetorquer>::schema(),
            ModelConfig::Torquer => Actuator::<Torquer>::schema(),
            ModelConfig::MagnetorquerPayload(_) => Actuator::<MagnetorquerPayload>::schema(),
        }
    }
}

/// A built model of any type, for hosts that only know models by name.
#[derive(Clone, Debug)]
pub enum Models {
    Magnetorquer(Actuator<Magnetorquer>),
    Torquer(Actuator<Torquer>),
    MagnetorquerPayload(Actuator<MagnetorquerPayload>),
}

macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            Models::Magnetorquer($a) => $body,
            Models::Torquer($a) => $body,
            Models::MagnetorquerPayload($a) => $body,
        }
    };
}

impl Models {
    pub fn name(&self) -> &str {
        dispatch!(self, a => a.name.as_str())
    }

    pub fn state(&self) -> LifecycleState {
        dispatch!(self, a => a.state())
    }

    pub fn activate(&mut self) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.activate())
    }

    pub fn start(&mut self) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.start())
    }

    pub fn execute(&mut self) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.execute())
    }

    pub fn deactivate(&mut self) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.deactivate())
    }

    pub fn set_parameter(&mut self, name: &str, value: SignalValue) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.set_parameter(name, value))
    }

    pub fn set_input(&mut self, name: &str, value: SignalValue) -> Result<(), ActuatorErrors> {
        dispatch!(self, a => a.set_input(name, value))
    }

    pub fn output_values(&self) -> Vec<(SignalSpec, SignalValue)> {
        dispatch!(self, a => a.output_values())
    }
}
