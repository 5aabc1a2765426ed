//! Replays scripted maneuvers through a single actuator model.

pub mod replay;
pub mod results;
pub mod scenario;

use actuators::ActuatorErrors;
use scenario::ScenarioErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliErrors {
    #[error("{0}")]
    ActuatorErrors(#[from] ActuatorErrors),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{0}")]
    ScenarioErrors(#[from] ScenarioErrors),
}
