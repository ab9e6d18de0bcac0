//! ecs-deploy Types - Core types for ECS task definition rollouts
//!
//! These types are shared by every crate of the workspace. They carry no I/O
//! and no provider client code.
//!
//! ## Key Concepts
//!
//! - **TaskDefinitionArn**: Identifier of a registered task definition revision
//! - **DeploymentController**: How the live service rolls out new revisions
//! - **WaitPolicy**: Post-update waiting behaviour
//! - **Outputs**: Names under which run results are published

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod controller;
pub mod ids;
pub mod outputs;
pub mod paths;
pub mod wait;

// Re-export main types
pub use controller::DeploymentController;
pub use ids::{ClusterName, DeploymentId, ServiceName, TaskDefinitionArn};
pub use outputs::{CODEDEPLOY_DEPLOYMENT_ID, TASK_DEFINITION_ARN};
pub use paths::resolve_in_workspace;
pub use wait::{WaitPolicy, DEFAULT_WAIT_MINUTES, MAX_WAIT_MINUTES, WAIT_DEFAULT_DELAY};
