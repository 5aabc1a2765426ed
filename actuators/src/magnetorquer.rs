use safemath::CartesianVector3;
use serde::{Deserialize, Serialize};
use signal_macros::Signals;

use crate::{ActuatorModel, ModelFault};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, Signals)]
#[signals(kind = "parameter")]
#[serde(default)]
pub struct MagnetorquerParameters {
    /// Number of wire turns (n) * vector area of the coil (A).
    pub m_prime: CartesianVector3,
}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "input")]
pub struct MagnetorquerInputs {
    /// Magnetic field vector. Usually Earth's.
    #[signal(name = "B")]
    pub b: CartesianVector3,
    /// Current
    #[signal(name = "I")]
    pub i: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Signals)]
#[signals(kind = "output")]
pub struct MagnetorquerOutputs {
    /// Torque from the cross product of m x B
    pub torque: CartesianVector3,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct MagnetorquerState {
    m: CartesianVector3,
    torque_internal: CartesianVector3,
}

/// A single coil producing torque `(m_prime * I) x B`.
#[derive(Clone, Debug, Default)]
pub struct Magnetorquer {
    parameters: MagnetorquerParameters,
    inputs: MagnetorquerInputs,
    outputs: MagnetorquerOutputs,
    state: MagnetorquerState,
}

impl Magnetorquer {
    pub fn new(m_prime: CartesianVector3) -> Self {
        Self {
            parameters: MagnetorquerParameters { m_prime },
            ..Default::default()
        }
    }

    /// Dipole moment from the last successful scaling step (A·m²).
    pub fn dipole_moment(&self) -> CartesianVector3 {
        self.state
            .m
    }
}

impl From<MagnetorquerParameters> for Magnetorquer {
    fn from(parameters: MagnetorquerParameters) -> Self {
        Self {
            parameters,
            ..Default::default()
        }
    }
}

impl ActuatorModel for Magnetorquer {
    type Parameters = MagnetorquerParameters;
    type Inputs = MagnetorquerInputs;
    type Outputs = MagnetorquerOutputs;

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
        self.state = MagnetorquerState::default();
        self.outputs = MagnetorquerOutputs::default();
    }

    fn execute(&mut self) -> Result<(), ModelFault> {
        let m = self
            .parameters
            .m_prime
            .checked_scale(self.inputs.i)?;
        let torque = m.checked_cross(&self.inputs.b)?;

        self.state
            .m = m;
        self.state
            .torque_internal = torque;

        self.outputs
            .torque = self
            .state
            .torque_internal;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.state = MagnetorquerState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Actuator, signal::SignalGroup};
    use approx::assert_abs_diff_eq;
    use safemath::SafeMathErrors;
    const TOL: f64 = 1e-12;

    fn running(m_prime: CartesianVector3) -> Actuator<Magnetorquer> {
        let mut mtq = Actuator::new("magnetorquer", Magnetorquer::new(m_prime));
        mtq.activate()
            .unwrap();
        mtq.start()
            .unwrap();
        mtq
    }

    fn step(mtq: &mut Actuator<Magnetorquer>, b: CartesianVector3, i: f64) -> CartesianVector3 {
        mtq.inputs_mut()
            .b = b;
        mtq.inputs_mut()
            .i = i;
        mtq.execute()
            .unwrap();
        mtq.outputs()
            .torque
    }

    fn fields() -> Vec<CartesianVector3> {
        vec![
            CartesianVector3::new(1.0, 0.0, 0.0),
            CartesianVector3::new(-2.1e-5, 3.3e-5, 1.9e-5),
            CartesianVector3::new(2.5e4, -1.7e4, 4.2e4),
            CartesianVector3::new(-3.0, -4.0, 12.0),
        ]
    }

    #[test]
    fn test_unit_scenario() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        let torque = step(&mut mtq, CartesianVector3::new(1.0, 0.0, 0.0), 1.0);

        assert_eq!(
            mtq.model()
                .dipole_moment(),
            CartesianVector3::new(0.0, 0.0, 1.0)
        );
        assert_eq!(torque, CartesianVector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_current_zero_torque() {
        let mut mtq = running(CartesianVector3::new(0.36674, -0.2, 0.1));
        for b in fields() {
            assert_eq!(step(&mut mtq, b, 0.0), CartesianVector3::ZERO);
        }
    }

    #[test]
    fn test_zero_m_prime_zero_torque() {
        let mut mtq = running(CartesianVector3::ZERO);
        for b in fields() {
            assert_eq!(step(&mut mtq, b, 0.75), CartesianVector3::ZERO);
        }
    }

    #[test]
    fn test_zero_field_zero_torque() {
        let mut mtq = running(CartesianVector3::new(1.0, 2.0, 3.0));
        assert_eq!(step(&mut mtq, CartesianVector3::ZERO, 5.0), CartesianVector3::ZERO);
    }

    #[test]
    fn test_anticommutative() {
        let m_prime = CartesianVector3::new(0.36674, 0.5, -0.25);
        let current = 0.001;
        let mut mtq = running(m_prime);

        for b in fields() {
            let torque = step(&mut mtq, b, current);

            // swap roles: field as moment, moment as field
            let m = m_prime
                .checked_scale(current)
                .unwrap();
            let mut swapped = running(b);
            let reversed = step(&mut swapped, m, 1.0);

            assert_abs_diff_eq!(torque.x, -reversed.x, epsilon = TOL);
            assert_abs_diff_eq!(torque.y, -reversed.y, epsilon = TOL);
            assert_abs_diff_eq!(torque.z, -reversed.z, epsilon = TOL);
        }
    }

    #[test]
    fn test_torque_orthogonal_to_moment_and_field() {
        let mut mtq = running(CartesianVector3::new(0.36674, 0.5, -0.25));
        for b in fields() {
            let torque = step(&mut mtq, b, -0.8);
            let m = mtq
                .model()
                .dipole_moment();

            let scale = torque
                .vec()
                .norm()
                * (m.vec()
                    .norm()
                    + b.vec()
                        .norm());
            let tol = 1e-12 * scale.max(1.0);
            assert_abs_diff_eq!(torque.checked_dot(&m).unwrap(), 0.0, epsilon = tol);
            assert_abs_diff_eq!(torque.checked_dot(&b).unwrap(), 0.0, epsilon = tol);
        }
    }

    #[test]
    fn test_current_sign_reverses_torque() {
        let mut mtq = running(CartesianVector3::new(0.36674, 0.0, 0.0));
        let b = CartesianVector3::new(-2.1e-5, 3.3e-5, 1.9e-5);
        let positive = step(&mut mtq, b, 0.001);
        let negative = step(&mut mtq, b, -0.001);
        assert_eq!(positive, -negative);
    }

    #[test]
    fn test_recomputed_not_accumulated() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        let b = CartesianVector3::X;
        let first = step(&mut mtq, b, 1.0);
        let second = step(&mut mtq, b, 1.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fault_holds_last_valid_output() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        let valid = step(&mut mtq, CartesianVector3::X, 1.0);

        mtq.inputs_mut()
            .i = 1e300;
        mtq.inputs_mut()
            .b = CartesianVector3::new(1e300, 0.0, 0.0);
        let err = mtq
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ActuatorErrors::NumericError {
                source: SafeMathErrors::Overflow { .. },
                ..
            }
        ));
        assert_eq!(
            mtq.outputs()
                .torque,
            valid
        );
        assert!(
            mtq.outputs()
                .torque
                .is_finite()
        );
    }

    #[test]
    fn test_fault_before_first_valid_output_stays_zero() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        mtq.inputs_mut()
            .i = f64::INFINITY;
        assert!(
            mtq.execute()
                .is_err()
        );
        assert_eq!(
            mtq.outputs()
                .torque,
            CartesianVector3::ZERO
        );
    }

    #[test]
    fn test_fault_keeps_dipole_of_last_valid_tick() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        step(&mut mtq, CartesianVector3::X, 2.0);

        // scaling succeeds, the cross product overflows
        mtq.inputs_mut()
            .i = 1e200;
        mtq.inputs_mut()
            .b = CartesianVector3::new(1e200, 0.0, 0.0);
        assert!(
            mtq.execute()
                .is_err()
        );
        assert_eq!(
            mtq.model()
                .dipole_moment(),
            CartesianVector3::new(0.0, 0.0, 2.0)
        );
        assert_eq!(
            mtq.outputs()
                .torque,
            CartesianVector3::new(0.0, 2.0, 0.0)
        );
    }

    #[test]
    fn test_restart_clears_held_output() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        step(&mut mtq, CartesianVector3::X, 1.0);
        mtq.deactivate()
            .unwrap();
        mtq.activate()
            .unwrap();
        mtq.start()
            .unwrap();
        assert_eq!(
            mtq.outputs()
                .torque,
            CartesianVector3::ZERO
        );

        mtq.inputs_mut()
            .i = f64::NAN;
        assert!(
            mtq.execute()
                .is_err()
        );
        assert_eq!(
            mtq.outputs()
                .torque,
            CartesianVector3::ZERO
        );
    }

    #[test]
    fn test_deactivate_resets_working_state() {
        let mut mtq = running(CartesianVector3::new(0.0, 0.0, 1.0));
        step(&mut mtq, CartesianVector3::X, 2.0);
        assert_eq!(
            mtq.model()
                .dipole_moment(),
            CartesianVector3::new(0.0, 0.0, 2.0)
        );
        mtq.deactivate()
            .unwrap();
        assert_eq!(
            mtq.model()
                .dipole_moment(),
            CartesianVector3::ZERO
        );
    }

    #[test]
    fn test_schema() {
        let schema = Actuator::<Magnetorquer>::schema();
        let names: Vec<_> = schema
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["m_prime", "B", "I", "torque"]);
        assert_eq!(
            MagnetorquerOutputs::specs()[0].description,
            "Torque from the cross product of m x B"
        );
    }

    #[test]
    fn test_parameters_from_ron() {
        let parameters: MagnetorquerParameters =
            ron::from_str("(m_prime: (x: 0.36674, y: 0.0, z: 0.0))").unwrap();
        assert_eq!(parameters.m_prime, CartesianVector3::new(0.36674, 0.0, 0.0));

        let parameters: MagnetorquerParameters = ron::from_str("()").unwrap();
        assert_eq!(parameters.m_prime, CartesianVector3::ZERO);
    }
}
