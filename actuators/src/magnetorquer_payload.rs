use safemath::{CartesianVector3, SafeMathResult, safe_mul};
use serde::{Deserialize, Serialize};
use signal_macros::Signals;

use crate::{ActuatorModel, Axis, ModelFault};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Signals)]
#[signals(kind = "parameter")]
#[serde(default)]
pub struct MagnetorquerPayloadParameters {
    /// For the magnetorquer along the x-axis: number of wire turns (n) * area of the coil (A).
    pub m_prime_x: f64,
    /// For the magnetorquer along the y-axis: number of wire turns (n) * area of the coil (A).
    pub m_prime_y: f64,
    /// For the magnetorquer along the z-axis: number of wire turns (n) * area of the coil (A).
    pub m_prime_z: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "input")]
pub struct MagnetorquerPayloadInputs {
    /// Magnetic field vector. Usually Earth's.
    #[signal(name = "B")]
    pub b: CartesianVector3,
    /// Current through the x-axis magnetorquer
    #[signal(name = "I_x")]
    pub i_x: f64,
    /// Current through the y-axis magnetorquer
    #[signal(name = "I_y")]
    pub i_y: f64,
    /// Current through the z-axis magnetorquer
    #[signal(name = "I_z")]
    pub i_z: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "output")]
pub struct MagnetorquerPayloadOutputs {
    /// Output torque of the payload: m_x X B + m_y X B + m_z X B
    pub torque: CartesianVector3,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct MagnetorquerPayloadState {
    m_x: CartesianVector3,
    m_y: CartesianVector3,
    m_z: CartesianVector3,
    axis_torques: [CartesianVector3; 3],
    torque_internal: CartesianVector3,
}

/// Three orthogonal coils sharing one field sample.
///
/// Each coil's torque is computed on its own and then summed, so a fault is
/// attributed to the axis that raised it. Any fault invalidates the whole
/// tick: `torque` keeps its last valid value.
#[derive(Clone, Debug, Default)]
pub struct MagnetorquerPayload {
    parameters: MagnetorquerPayloadParameters,
    inputs: MagnetorquerPayloadInputs,
    outputs: MagnetorquerPayloadOutputs,
    state: MagnetorquerPayloadState,
}

impl MagnetorquerPayload {
    pub fn new(m_prime_x: f64, m_prime_y: f64, m_prime_z: f64) -> Self {
        Self {
            parameters: MagnetorquerPayloadParameters { m_prime_x, m_prime_y, m_prime_z },
            ..Default::default()
        }
    }

    /// Per-axis dipole moments `[m_x, m_y, m_z]` from the last tick.
    pub fn dipole_moments(&self) -> [CartesianVector3; 3] {
        [self.state.m_x, self.state.m_y, self.state.m_z]
    }

    /// Per-axis torque terms `[m_x × B, m_y × B, m_z × B]`. An axis that
    /// faulted keeps its term from the last tick it succeeded.
    pub fn axis_torques(&self) -> [CartesianVector3; 3] {
        self.state
            .axis_torques
    }

    fn coil(&self, axis: Axis) -> (f64, f64) {
        let p = &self.parameters;
        let i = &self.inputs;
        match axis {
            Axis::X => (p.m_prime_x, i.i_x),
            Axis::Y => (p.m_prime_y, i.i_y),
            Axis::Z => (p.m_prime_z, i.i_z),
        }
    }
}

fn axis_torque(
    axis: Axis,
    m_prime: f64,
    current: f64,
    b: &CartesianVector3,
) -> SafeMathResult<(CartesianVector3, CartesianVector3)> {
    let m = axis
        .unit()
        .checked_scale(safe_mul(m_prime, current)?)?;
    let torque = m.checked_cross(b)?;
    Ok((m, torque))
}

impl From<MagnetorquerPayloadParameters> for MagnetorquerPayload {
    fn from(parameters: MagnetorquerPayloadParameters) -> Self {
        Self {
            parameters,
            ..Default::default()
        }
    }
}

impl ActuatorModel for MagnetorquerPayload {
    type Parameters = MagnetorquerPayloadParameters;
    type Inputs = MagnetorquerPayloadInputs;
    type Outputs = MagnetorquerPayloadOutputs;

    fn parameters(&self) -> &Self::Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Self::Parameters {
        &mut self.parameters
    }

    fn inputs(&self) -> &Self::Inputs {
        &self.inputs
    }

    fn inputs_mut(&mut self) -> &mut Self::Inputs {
        &mut self.inputs
    }

    fn outputs(&self) -> &Self::Outputs {
        &self.outputs
    }

    fn start(&mut self) {
        self.state = MagnetorquerPayloadState::default();
        self.outputs = MagnetorquerPayloadOutputs::default();
    }

    fn execute(&mut self) -> Result<(), ModelFault> {
        let b = self
            .inputs
            .b;
        let mut fault = None;

        for (k, axis) in Axis::ALL
            .into_iter()
            .enumerate()
        {
            let (m_prime, current) = self.coil(axis);
            match axis_torque(axis, m_prime, current, &b) {
                Ok((m, torque)) => {
                    match axis {
                        Axis::X => self.state.m_x = m,
                        Axis::Y => self.state.m_y = m,
                        Axis::Z => self.state.m_z = m,
                    }
                    self.state
                        .axis_torques[k] = torque;
                }
                Err(source) => {
                    if fault.is_none() {
                        fault = Some(ModelFault::Axis { axis, source });
                    }
                }
            }
        }
        if let Some(fault) = fault {
            return Err(fault);
        }

        let [tx, ty, tz] = self
            .state
            .axis_torques;
        let torque = tx
            .checked_add(&ty)?
            .checked_add(&tz)?;
        self.state
            .torque_internal = torque;

        self.outputs
            .torque = self
            .state
            .torque_internal;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.state = MagnetorquerPayloadState::default();
    }
}
