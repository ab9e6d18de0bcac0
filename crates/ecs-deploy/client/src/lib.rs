//! ecs-deploy Client - ECS and CodeDeploy API access
//!
//! Provides the [`EcsApi`] and [`CodeDeployApi`] traits the orchestrator
//! depends on, the subset of the wire model it needs, and HTTP
//! implementations speaking the AWS JSON 1.1 protocol.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod api;
pub mod error;
pub mod http;
pub mod model;

// Re-exports
pub use api::{CodeDeployApi, EcsApi};
pub use error::{ClientError, Result};
pub use http::{regional_endpoint, AwsJsonClient, CodeDeployClient, EcsClient, DEFAULT_TIMEOUT};
