//! ecs-deploy Task Definitions
//!
//! Loads a task definition document and reduces it to the payload the ECS
//! `RegisterTaskDefinition` call accepts.
//!
//! ## Usage
//!
//! ```
//! use ecs_deploy_taskdef::clean;
//! use serde_json::json;
//!
//! let payload = clean(json!({ "family": "web", "ipcMode": null, "revision": 3 }));
//! assert_eq!(payload, json!({ "family": "web" }));
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod reader;
pub mod sanitizer;

// Re-exports
pub use error::{Result, TaskDefError};
pub use reader::{parse_task_definition, read_task_definition};
pub use sanitizer::{clean, IGNORED_ATTRIBUTES};
