//! Normalized AppSpec document
//!
//! An ECS AppSpec looks like:
//!
//! ```yaml
//! Resources:
//!   - TargetService:
//!       Type: AWS::ECS::Service
//!       Properties:
//!         TaskDefinition: <placeholder>
//!         LoadBalancerInfo:
//!           ContainerName: web
//!           ContainerPort: 80
//! ```
//!
//! The file may be JSON or YAML. Whichever decoder accepts it, the result is
//! the same [`AppSpec`]; the source format is not kept.

use crate::error::{AppSpecError, Result};
use ecs_deploy_types::TaskDefinitionArn;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

const RESOURCES_KEY: &str = "resources";
const PROPERTIES_KEY: &str = "properties";
const TASK_DEFINITION_KEY: &str = "taskDefinition";

/// Key written when a Properties block has no task definition entry yet
const DEFAULT_TASK_DEFINITION_KEY: &str = "TaskDefinition";

/// AppSpec content in the shape CodeDeploy's `AppSpecContent` revision expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSpecContent {
    /// Compact JSON rendering of the document
    pub content: String,
    /// Lowercase hex SHA-256 of `content`
    pub sha256: String,
}

/// A parsed AppSpec document
#[derive(Debug, Clone, PartialEq)]
pub struct AppSpec {
    document: Value,
}

impl AppSpec {
    /// Parse AppSpec text, accepting JSON or YAML.
    pub fn parse(text: &str) -> Result<Self> {
        let document = match serde_json::from_str::<Value>(text) {
            Ok(document) => document,
            Err(json_err) => {
                debug!(error = %json_err, "AppSpec is not JSON, decoding as YAML");
                serde_yaml::from_str::<Value>(text)?
            }
        };
        Ok(Self { document })
    }

    /// Read an AppSpec file. The file itself is never modified.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| AppSpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| AppSpecError::Encoding {
            path: path.to_path_buf(),
        })?;

        let appspec = Self::parse(&text)?;
        debug!(path = %path.display(), "Loaded AppSpec");
        Ok(appspec)
    }

    /// Wrap an already decoded document
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Task definitions currently referenced by the target services
    pub fn task_definitions(&self) -> Vec<&str> {
        resources(&self.document)
            .into_iter()
            .flat_map(|resource| resource.values())
            .filter_map(|contents| contents.as_object())
            .filter_map(|contents| find_value(contents, PROPERTIES_KEY))
            .filter_map(Value::as_object)
            .filter_map(|properties| find_value(properties, TASK_DEFINITION_KEY))
            .filter_map(Value::as_str)
            .collect()
    }

    /// Point every target service at `arn`.
    ///
    /// Keys are matched case-insensitively, so `Resources[0].TargetService.
    /// Properties.TaskDefinition` and its camel-case spelling are both
    /// replaced. Returns the number of replaced entries; a document without
    /// any `Properties` block is an error.
    pub fn substitute_task_definition(&mut self, arn: &TaskDefinitionArn) -> Result<usize> {
        let Some(resources) = self
            .document
            .as_object_mut()
            .and_then(|root| find_value_mut(root, RESOURCES_KEY))
            .and_then(Value::as_array_mut)
        else {
            return Err(AppSpecError::NoTargetService);
        };

        let mut substituted = 0;
        for resource in resources.iter_mut().filter_map(Value::as_object_mut) {
            for contents in resource.values_mut().filter_map(Value::as_object_mut) {
                let Some(properties) =
                    find_value_mut(contents, PROPERTIES_KEY).and_then(Value::as_object_mut)
                else {
                    continue;
                };
                let key = find_key(properties, TASK_DEFINITION_KEY)
                    .unwrap_or(DEFAULT_TASK_DEFINITION_KEY)
                    .to_string();
                properties.insert(key, Value::String(arn.to_string()));
                substituted += 1;
            }
        }

        if substituted == 0 {
            return Err(AppSpecError::NoTargetService);
        }

        debug!(substituted, task_definition = %arn, "Updated AppSpec task definition");
        Ok(substituted)
    }

    /// Render the document for a CodeDeploy `AppSpecContent` revision
    pub fn content(&self) -> Result<AppSpecContent> {
        let content = serde_json::to_string(&self.document)?;
        let sha256 = hex::encode(Sha256::digest(content.as_bytes()));
        Ok(AppSpecContent { content, sha256 })
    }
}

fn resources(document: &Value) -> Vec<&Map<String, Value>> {
    document
        .as_object()
        .and_then(|root| find_value(root, RESOURCES_KEY))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

fn find_key<'a>(map: &'a Map<String, Value>, wanted: &str) -> Option<&'a str> {
    map.keys()
        .find(|key| key.eq_ignore_ascii_case(wanted))
        .map(String::as_str)
}

fn find_value<'a>(map: &'a Map<String, Value>, wanted: &str) -> Option<&'a Value> {
    find_key(map, wanted).and_then(|key| map.get(key))
}

fn find_value_mut<'a>(map: &'a mut Map<String, Value>, wanted: &str) -> Option<&'a mut Value> {
    let key = find_key(map, wanted)?.to_string();
    map.get_mut(&key)
}
