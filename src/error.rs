//! Theater error types

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::controller::ControllerId;

/// Theater error type
///
/// Only misuse of the configuration API is reported through this type.
/// Per-tick faults (missing rig, disabled root, missing camera) never
/// surface as errors; the affected tick is simply skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TheaterError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Unknown controller {0:?}")]
    UnknownController(ControllerId),
    #[error("Node {0:?} has no world position")]
    MissingNode(Entity),
}

pub type TheaterResult<T> = Result<T, TheaterError>;
