use actuators::{
    ModelConfig,
    config::ron_options,
    signal::SignalValue,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;

use crate::CliErrors;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioErrors {
    #[error("rate_hz must be positive and finite, got {0}")]
    InvalidRate(f64),
    #[error("duration must be non-negative and finite, got {0}")]
    InvalidDuration(f64),
    #[error("segment {0} ends before the segment preceding it")]
    SegmentsOutOfOrder(usize),
    #[error("duration * rate_hz = {0} exceeds the limit of {max} ticks", max = MAX_TICKS)]
    TooManyTicks(f64),
}

/// Upper bound on the number of ticks in one replay.
pub const MAX_TICKS: usize = 1_000_000_000;

/// A piece of the input schedule, active for `t < until` once every earlier
/// segment has ended.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Segment {
    pub until: f64,
    #[serde(default)]
    pub inputs: BTreeMap<String, SignalValue>,
}

/// A fixed rate maneuver: one model, its initial inputs, and a schedule.
///
/// ```ron
/// (
///     name: "magnetorquer",
///     rate_hz: 100.0,
///     duration: 30.0,
///     model: Magnetorquer(m_prime: (x: 0.36674, y: 0.0, z: 0.0)),
///     inputs: {"B": Vector3(x: 2.0e-5, y: 0.0, z: 4.0e-5)},
///     segments: [
///         (until: 5.0, inputs: {"I": Scalar(0.0)}),
///         (until: 10.0, inputs: {"I": Scalar(0.001)}),
///     ],
/// )
/// ```
///
/// After the last segment ends the inputs keep their last values.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    pub rate_hz: f64,
    pub duration: f64,
    pub model: ModelConfig,
    #[serde(default)]
    pub inputs: BTreeMap<String, SignalValue>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

fn default_name() -> String {
    "model".to_string()
}

impl Scenario {
    pub fn from_ron(s: &str) -> Result<Self, CliErrors> {
        let scenario: Scenario = ron_options().from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_file(path: &Path) -> Result<Self, CliErrors> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ScenarioErrors> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(ScenarioErrors::InvalidRate(self.rate_hz));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ScenarioErrors::InvalidDuration(self.duration));
        }
        for (i, pair) in self
            .segments
            .windows(2)
            .enumerate()
        {
            if pair[1].until < pair[0].until {
                return Err(ScenarioErrors::SegmentsOutOfOrder(i + 1));
            }
        }
        self.tick_count()?;
        Ok(())
    }

    /// Time of tick `k`.
    pub fn tick_time(&self, k: usize) -> f64 {
        k as f64 / self.rate_hz
    }

    /// Ticks at `t = k / rate_hz` for `k = 0 ..= round(duration * rate_hz)`.
    pub fn tick_count(&self) -> Result<usize, ScenarioErrors> {
        let steps = (self.duration * self.rate_hz).round();
        if !(steps >= 0.0 && steps < MAX_TICKS as f64) {
            return Err(ScenarioErrors::TooManyTicks(steps));
        }
        Ok(steps as usize + 1)
    }

    /// Index of the segment in effect at time `t`.
    pub fn segment_at(&self, t: f64) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| t < segment.until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safemath::CartesianVector3;

    const SCENARIO: &str = r#"(
        rate_hz: 10.0,
        duration: 2.0,
        model: Torquer,
        inputs: {"input_torque": Vector3(x: 0.0, y: 0.0, z: 0.0)},
        segments: [
            (until: 0.5, inputs: {"input_torque": Vector3(x: 0.1, y: 0.0, z: 0.0)}),
            (until: 1.0),
        ],
    )"#;

    #[test]
    fn test_parse() {
        let scenario = Scenario::from_ron(SCENARIO).unwrap();
        assert_eq!(scenario.name, "model");
        assert_eq!(scenario.model, ModelConfig::Torquer);
        assert_eq!(scenario.segments.len(), 2);
        assert_eq!(
            scenario.segments[0].inputs["input_torque"],
            SignalValue::Vector3(CartesianVector3::new(0.1, 0.0, 0.0))
        );
        assert!(
            scenario.segments[1]
                .inputs
                .is_empty()
        );
        assert_eq!(scenario.tick_count(), Ok(21));
    }

    #[test]
    fn test_segment_at() {
        let scenario = Scenario::from_ron(SCENARIO).unwrap();
        assert_eq!(scenario.segment_at(0.0), Some(0));
        assert_eq!(scenario.segment_at(0.49), Some(0));
        assert_eq!(scenario.segment_at(0.5), Some(1));
        assert_eq!(scenario.segment_at(1.0), None);
    }

    #[test]
    fn test_validate() {
        let mut scenario = Scenario::from_ron(SCENARIO).unwrap();
        scenario.rate_hz = 0.0;
        assert_eq!(scenario.validate(), Err(ScenarioErrors::InvalidRate(0.0)));

        let mut scenario = Scenario::from_ron(SCENARIO).unwrap();
        scenario.duration = f64::NAN;
        assert!(matches!(
            scenario.validate(),
            Err(ScenarioErrors::InvalidDuration(_))
        ));

        let mut scenario = Scenario::from_ron(SCENARIO).unwrap();
        scenario
            .segments
            .swap(0, 1);
        assert_eq!(scenario.validate(), Err(ScenarioErrors::SegmentsOutOfOrder(1)));
    }

    #[test]
    fn test_rejects_too_many_ticks() {
        let result = Scenario::from_ron("(rate_hz: 1.0e10, duration: 1.0e300, model: Torquer)");
        assert!(matches!(
            result,
            Err(CliErrors::ScenarioErrors(ScenarioErrors::TooManyTicks(_)))
        ));

        let mut scenario = Scenario::from_ron(SCENARIO).unwrap();
        scenario.duration = 1.0e300;
        assert!(matches!(
            scenario.tick_count(),
            Err(ScenarioErrors::TooManyTicks(_))
        ));
    }

    #[test]
    fn test_tick_time_lands_on_boundaries() {
        let mut scenario = Scenario::from_ron(SCENARIO).unwrap();
        scenario.rate_hz = 49.0;
        assert_eq!(scenario.tick_time(49), 1.0);
        assert_eq!(scenario.tick_time(98), 2.0);
    }

    #[test]
    fn test_rejects_unknown_model() {
        let bad = SCENARIO.replace("Torquer", "ReactionWheel");
        assert!(matches!(
            Scenario::from_ron(&bad),
            Err(CliErrors::Ron(_))
        ));
    }
}
