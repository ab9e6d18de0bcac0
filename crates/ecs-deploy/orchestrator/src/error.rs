//! Orchestrator error types
//!
//! Every variant displays exactly the message published on the failure
//! channel.

use crate::wait::WaitError;
use ecs_deploy_taskdef::TaskDefError;
use thiserror::Error;

/// Orchestrator errors
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Task definition could not be read or parsed
    #[error("{0}")]
    TaskDefinition(#[from] TaskDefError),

    /// `RegisterTaskDefinition` failed
    #[error("{0}")]
    Registration(String),

    /// Target service could not be resolved or is not usable
    #[error("{0}")]
    ServiceLookup(String),

    /// Service update or CodeDeploy deployment could not be submitted
    #[error("{0}")]
    Submission(String),

    /// Submission succeeded but the wait did not
    #[error("{0}")]
    Wait(#[from] WaitError),
}

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;
