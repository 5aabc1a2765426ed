use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a model sits in its host-driven lifecycle.
///
/// `Uninitialized -> Activated -> Running -> Deactivated`, with
/// `Deactivated -> Activated` allowed for re-activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Activated,
    Running,
    Deactivated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Activated => write!(f, "activated"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Deactivated => write!(f, "deactivated"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleOperation {
    Activate,
    Start,
    Execute,
    Deactivate,
    SetParameter,
}

impl LifecycleOperation {
    /// States from which the operation may be called.
    pub fn allowed_from(&self) -> &'static [LifecycleState] {
        use LifecycleState::*;
        match self {
            LifecycleOperation::Activate => &[Uninitialized, Deactivated],
            LifecycleOperation::Start => &[Activated],
            LifecycleOperation::Execute => &[Running],
            LifecycleOperation::Deactivate => &[Activated, Running],
            LifecycleOperation::SetParameter => &[Uninitialized, Activated, Deactivated],
        }
    }

    /// State after a successful call, `None` if the state does not change.
    pub fn next_state(&self) -> Option<LifecycleState> {
        match self {
            LifecycleOperation::Activate => Some(LifecycleState::Activated),
            LifecycleOperation::Start => Some(LifecycleState::Running),
            LifecycleOperation::Deactivate => Some(LifecycleState::Deactivated),
            LifecycleOperation::Execute | LifecycleOperation::SetParameter => None,
        }
    }
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleOperation::Activate => write!(f, "activate"),
            LifecycleOperation::Start => write!(f, "start"),
            LifecycleOperation::Execute => write!(f, "execute"),
            LifecycleOperation::Deactivate => write!(f, "deactivate"),
            LifecycleOperation::SetParameter => write!(f, "set_parameter"),
        }
    }
}
