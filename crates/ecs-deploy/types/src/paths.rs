//! Workspace-relative path resolution

use std::path::{Path, PathBuf};

/// Resolve a user-supplied path against the run's workspace root.
///
/// Absolute paths are used as-is; anything else is joined onto `workspace`.
pub fn resolve_in_workspace(workspace: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace.join(path)
    }
}
