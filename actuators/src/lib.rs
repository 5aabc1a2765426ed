//! Magnetorquer actuator models and the lifecycle they are stepped through.
//!
//! A host drives each [`Actuator`] with `activate()`, `start()`, one
//! `execute()` per tick, and finally `deactivate()`. Out of order calls are
//! rejected with [`ActuatorErrors::LifecycleError`] without touching any
//! signal.

pub mod config;
pub mod lifecycle;
pub mod magnetorquer;
pub mod magnetorquer_payload;
pub mod signal;
pub mod torquer;

use lifecycle::{LifecycleOperation, LifecycleState};
use safemath::SafeMathErrors;
use signal::{SignalErrors, SignalGroup, SignalSpec, SignalValue};
use std::fmt;
use thiserror::Error;

pub use config::{ModelConfig, Models};
pub use magnetorquer::Magnetorquer;
pub use magnetorquer_payload::MagnetorquerPayload;
pub use torquer::Torquer;

/// Status code returned to hosts for a successful lifecycle call.
pub const STATUS_OK: i16 = 0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActuatorErrors {
    #[error("actuator '{model}': {operation}() is not valid while {state}")]
    LifecycleError {
        model: String,
        operation: LifecycleOperation,
        state: LifecycleState,
    },
    #[error("actuator '{model}': {source}")]
    NumericError {
        model: String,
        source: SafeMathErrors,
    },
    #[error("actuator '{model}': {axis} axis: {source}")]
    AxisFault {
        model: String,
        axis: Axis,
        source: SafeMathErrors,
    },
    #[error("{0}")]
    SignalErrors(#[from] SignalErrors),
}

impl ActuatorErrors {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ActuatorErrors::NumericError { .. } | ActuatorErrors::AxisFault { .. }
        )
    }

    pub fn status_code(&self) -> i16 {
        match self {
            ActuatorErrors::LifecycleError { .. } => -1,
            ActuatorErrors::NumericError { .. } | ActuatorErrors::AxisFault { .. } => -2,
            ActuatorErrors::SignalErrors(_) => -3,
        }
    }
}

/// Maps a lifecycle result to the integer status a host stepper expects.
pub fn status_code(result: &Result<(), ActuatorErrors>) -> i16 {
    match result {
        Ok(()) => STATUS_OK,
        Err(e) => e.status_code(),
    }
}

/// A fault raised by a model during `execute()`, before it is tagged with the
/// actuator name.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ModelFault {
    #[error("{0}")]
    Numeric(#[from] SafeMathErrors),
    #[error("{axis} axis: {source}")]
    Axis { axis: Axis, source: SafeMathErrors },
}

/// Principal body axis of a single coil.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(&self) -> safemath::CartesianVector3 {
        match self {
            Axis::X => safemath::CartesianVector3::X,
            Axis::Y => safemath::CartesianVector3::Y,
            Axis::Z => safemath::CartesianVector3::Z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// The physics of a model. The lifecycle bookkeeping lives in [`Actuator`].
pub trait ActuatorModel {
    type Parameters: SignalGroup;
    type Inputs: SignalGroup;
    type Outputs: SignalGroup;

    fn parameters(&self) -> &Self::Parameters;
    fn parameters_mut(&mut self) -> &mut Self::Parameters;
    fn inputs(&self) -> &Self::Inputs;
    fn inputs_mut(&mut self) -> &mut Self::Inputs;
    fn outputs(&self) -> &Self::Outputs;

    fn activate(&mut self) {}
    /// One time initialization of working state before the first tick.
    fn start(&mut self);
    /// Reads inputs, recomputes working state and writes outputs. On error
    /// the outputs must keep their previous values.
    fn execute(&mut self) -> Result<(), ModelFault>;
    fn deactivate(&mut self);
}

/// A named model instance together with its lifecycle state.
#[derive(Clone, Debug)]
pub struct Actuator<M: ActuatorModel> {
    pub name: String,
    model: M,
    state: LifecycleState,
}

impl<M: ActuatorModel> Actuator<M> {
    pub fn new(name: &str, model: M) -> Self {
        Self {
            name: name.to_string(),
            model,
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Parameters, inputs and outputs of this model type, in that order.
    pub fn schema() -> Vec<SignalSpec> {
        let mut specs = M::Parameters::specs();
        specs.extend(M::Inputs::specs());
        specs.extend(M::Outputs::specs());
        specs
    }

    pub fn parameters(&self) -> &M::Parameters {
        self.model
            .parameters()
    }

    /// Parameters are frozen while the model is running.
    pub fn parameters_mut(&mut self) -> Result<&mut M::Parameters, ActuatorErrors> {
        self.check(LifecycleOperation::SetParameter)?;
        Ok(self
            .model
            .parameters_mut())
    }

    pub fn set_parameter(&mut self, name: &str, value: SignalValue) -> Result<(), ActuatorErrors> {
        self.parameters_mut()?
            .set(name, value)?;
        Ok(())
    }

    pub fn inputs(&self) -> &M::Inputs {
        self.model
            .inputs()
    }

    pub fn inputs_mut(&mut self) -> &mut M::Inputs {
        self.model
            .inputs_mut()
    }

    pub fn set_input(&mut self, name: &str, value: SignalValue) -> Result<(), ActuatorErrors> {
        self.model
            .inputs_mut()
            .set(name, value)?;
        Ok(())
    }

    pub fn outputs(&self) -> &M::Outputs {
        self.model
            .outputs()
    }

    pub fn output_values(&self) -> Vec<(SignalSpec, SignalValue)> {
        self.model
            .outputs()
            .values()
    }

    pub fn activate(&mut self) -> Result<(), ActuatorErrors> {
        self.check(LifecycleOperation::Activate)?;
        self.model
            .activate();
        self.transition(LifecycleOperation::Activate);
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), ActuatorErrors> {
        self.check(LifecycleOperation::Start)?;
        self.model
            .start();
        self.transition(LifecycleOperation::Start);
        Ok(())
    }

    pub fn execute(&mut self) -> Result<(), ActuatorErrors> {
        self.check(LifecycleOperation::Execute)?;
        self.model
            .execute()
            .map_err(|fault| {
                tracing::warn!(actuator = %self.name, %fault, "numeric fault, output held");
                match fault {
                    ModelFault::Numeric(source) => ActuatorErrors::NumericError {
                        model: self.name.clone(),
                        source,
                    },
                    ModelFault::Axis { axis, source } => ActuatorErrors::AxisFault {
                        model: self.name.clone(),
                        axis,
                        source,
                    },
                }
            })
    }

    pub fn deactivate(&mut self) -> Result<(), ActuatorErrors> {
        self.check(LifecycleOperation::Deactivate)?;
        self.model
            .deactivate();
        self.transition(LifecycleOperation::Deactivate);
        Ok(())
    }

    fn check(&self, operation: LifecycleOperation) -> Result<(), ActuatorErrors> {
        if operation
            .allowed_from()
            .contains(&self.state)
        {
            Ok(())
        } else {
            tracing::error!(
                actuator = %self.name,
                %operation,
                state = %self.state,
                "lifecycle call out of order"
            );
            Err(ActuatorErrors::LifecycleError {
                model: self.name.clone(),
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, operation: LifecycleOperation) {
        if let Some(next) = operation.next_state() {
            tracing::debug!(
                actuator = %self.name,
                from = %self.state,
                to = %next,
                "lifecycle transition"
            );
            self.state = next;
        }
    }
}
