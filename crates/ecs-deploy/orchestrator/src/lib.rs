//! ecs-deploy Orchestrator - Task definition rollout
//!
//! Registers a cleaned task definition and rolls it out to an ECS service,
//! either as an in-place service update or as a CodeDeploy blue/green
//! deployment, with optional bounded waiting afterwards.
//!
//! ## Architecture
//!
//! ```text
//! DeployRequest ──► Orchestrator ──► EcsApi ──────────► RegisterTaskDefinition
//!                        │                              DescribeServices
//!                        │                              UpdateService
//!                        ├─────────► CodeDeployApi ───► GetDeploymentGroup
//!                        │                              CreateDeployment
//!                        │                              GetDeployment
//!                        └─────────► OutputSink ──────► outputs / failures
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod orchestrator;
pub mod request;
pub mod sink;
pub mod state;
pub mod wait;

// Re-exports
pub use error::{OrchestratorError, Result};
pub use orchestrator::{Orchestrator, RunReport, ServiceTarget, Target, DEFAULT_REGION};
pub use request::{CodeDeployOptions, DeployRequest};
pub use sink::{OutputSink, RecordingSink};
pub use state::RunState;
pub use wait::{poll_until, PollConfig, PollStatus, WaitError};
