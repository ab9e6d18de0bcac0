//! Console and workflow output

use colored::*;
use ecs_deploy_orchestrator::OutputSink;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Environment variable naming the workflow output file
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Sink printing outputs to stdout and failures to stderr.
///
/// Outputs are also appended as `name=value` lines to the workflow output
/// file when one is configured.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    output_file: Option<PathBuf>,
    failed: AtomicBool,
}

impl ConsoleSink {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            failed: AtomicBool::new(false),
        }
    }

    /// Sink writing to the file named by `GITHUB_OUTPUT`, if set
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(GITHUB_OUTPUT)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        )
    }

    /// Whether any failure has been reported
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn append(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}={}", name, value)
    }
}

impl OutputSink for ConsoleSink {
    fn set_output(&self, name: &str, value: &str) {
        println!("{}={}", name, value);

        if let Some(path) = &self.output_file {
            if let Err(e) = Self::append(path, name, value) {
                warn!(path = %path.display(), error = %e, "Failed to write workflow output");
            }
        }
    }

    fn set_failed(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        eprintln!("{} {}", "✗".red(), message);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
