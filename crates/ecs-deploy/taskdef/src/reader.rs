//! Task definition reader
//!
//! Task definitions are accepted as JSON or YAML. YAML is a superset of
//! JSON, so a single YAML decode covers both.

use crate::error::{Result, TaskDefError};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read and decode the task definition at `path`.
pub fn read_task_definition(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).map_err(|source| TaskDefError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| TaskDefError::Encoding {
        path: path.to_path_buf(),
    })?;

    let descriptor = parse_task_definition(&text).map_err(|source| TaskDefError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "Loaded task definition");
    Ok(descriptor)
}

/// Decode task definition text (JSON or YAML) into a descriptor tree.
pub fn parse_task_definition(text: &str) -> std::result::Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_reads_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"ipcMode\": null, \"family\": \"task-def-family\" }}").unwrap();

        let descriptor = read_task_definition(file.path()).unwrap();
        assert_eq!(descriptor, json!({ "ipcMode": null, "family": "task-def-family" }));
    }

    #[test]
    fn test_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "family: web").unwrap();
        writeln!(file, "containerDefinitions:").unwrap();
        writeln!(file, "  - name: app").unwrap();
        writeln!(file, "    cpu: 256").unwrap();

        let descriptor = read_task_definition(file.path()).unwrap();
        assert_eq!(
            descriptor,
            json!({ "family": "web", "containerDefinitions": [{ "name": "app", "cpu": 256 }] })
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_task_definition(Path::new("/nonexistent/task-definition.json")).unwrap_err();
        assert!(matches!(err, TaskDefError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/task-definition.json"));
    }

    #[test]
    fn test_rejects_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let err = read_task_definition(file.path()).unwrap_err();
        assert!(matches!(err, TaskDefError::Encoding { .. }));
    }

    #[test]
    fn test_rejects_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"family\": ").unwrap();

        let err = read_task_definition(file.path()).unwrap_err();
        assert!(matches!(err, TaskDefError::Parse { .. }));
    }
}
