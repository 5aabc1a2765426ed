use safemath::CartesianVector3;
use signal_macros::Signals;

use crate::{ActuatorModel, ModelFault};

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "parameter")]
pub struct TorquerParameters {}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "input")]
pub struct TorquerInputs {
    /// Input torque
    pub input_torque: CartesianVector3,
}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "output")]
pub struct TorquerOutputs {
    /// Output torque, equal to the input torque
    pub output_torque: CartesianVector3,
}

/// Relays an externally supplied torque unchanged, so a computed torque
/// source can be swapped for an injected one behind the same outputs.
#[derive(Clone, Debug, Default)]
pub struct Torquer {
    parameters: TorquerParameters,
    inputs: TorquerInputs,
    outputs: TorquerOutputs,
}

impl Torquer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActuatorModel for Torquer {
    type Parameters = TorquerParameters;
    type Inputs = TorquerInputs;
    type Outputs = TorquerOutputs;

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
        self.outputs = TorquerOutputs::default();
    }

    fn execute(&mut self) -> Result<(), ModelFault> {
        self.outputs
            .output_torque = self
            .inputs
            .input_torque;
        Ok(())
    }

    fn deactivate(&mut self) {}
}
