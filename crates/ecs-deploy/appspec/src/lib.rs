//! ecs-deploy AppSpec
//!
//! Reads a CodeDeploy AppSpec (JSON or YAML), points its target services at
//! a freshly registered task definition and renders the result as the
//! `AppSpecContent` revision CodeDeploy accepts.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod document;
pub mod error;

// Re-exports
pub use document::{AppSpec, AppSpecContent};
pub use error::{AppSpecError, Result};

/// AppSpec file used when none is configured
pub const DEFAULT_APPSPEC_PATH: &str = "appspec.yaml";
