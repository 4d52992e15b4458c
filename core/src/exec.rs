//! External process invocation.
//!
//! Every collaborator tool runs through [`ToolCommand::run`]: spawned
//! with `tokio::process`, bounded by a per-invocation timeout, and
//! classified into the error taxonomy. A missing binary is a
//! [`Error::MissingDependency`]; nonzero exit and timeout are soft
//! [`Error::ToolFailure`]s.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use sweepr_common::error::Error;

/// Upper bound on a single external invocation. An unresponsive tool
/// surfaces as a soft per-task failure instead of stalling the run.
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(600);

/// One fully-described external invocation.
#[derive(Clone, Debug)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn arg_if(self, cond: bool, arg: impl Into<String>) -> Self {
        if cond { self.arg(arg) } else { self }
    }

    /// The tool name used in diagnostics and failure records.
    pub fn label(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Runs the command to completion under [`TOOL_TIMEOUT`].
    ///
    /// Output is captured, not inherited: the tools write their real
    /// results to artifact files, and on failure the first stderr line
    /// is folded into the diagnostic.
    pub async fn run(&self) -> Result<(), Error> {
        let label = self.label();
        debug!("exec: {} {}", self.program.display(), self.args.join(" "));

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::MissingDependency(format!(
                    "tool '{label}' not found on PATH"
                )));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let output = match timeout(TOOL_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                return Err(Error::ToolFailure {
                    tool: label,
                    detail: format!("timed out after {}s", TOOL_TIMEOUT.as_secs()),
                });
            }
        };

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let first_line = stderr.lines().next().unwrap_or("").trim();
        let detail = match (output.status.code(), first_line.is_empty()) {
            (Some(code), true) => format!("exit code {code}"),
            (Some(code), false) => format!("exit code {code} ({first_line})"),
            (None, _) => "killed by signal".to_string(),
        };
        Err(Error::ToolFailure { tool: label, detail })
    }
}

/// Pre-flight check that `program` is runnable: an explicit path must
/// exist, a bare name must be somewhere on PATH.
pub fn require_tool(program: &Path) -> Result<(), Error> {
    let found = if program.components().count() > 1 {
        program.is_file()
    } else {
        std::env::var_os("PATH")
            .map(|paths| {
                std::env::split_paths(&paths).any(|dir| dir.join(program).is_file())
            })
            .unwrap_or(false)
    };

    if found {
        Ok(())
    } else {
        Err(Error::MissingDependency(format!(
            "tool '{}' not found on PATH",
            program.display()
        )))
    }
}

/// Pre-flight check for a required input file (resolver list,
/// wordlist). Raised before any subprocess for the stage is spawned.
pub fn require_file(path: &Path, what: &str) -> Result<(), Error> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingDependency(format!(
            "{what} '{}' does not exist",
            path.display()
        )))
    }
}
