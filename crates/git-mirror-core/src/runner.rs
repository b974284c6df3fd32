// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, trace, warn};

use crate::error::{MirrorError, Result};
use crate::uri::redact_userinfo;

/// Trait abstracting how external tools are found and run, so the
/// orchestrator can be exercised without spawning processes.
#[async_trait]
pub trait ToolRunner: Send + Sync {
	/// Resolve `tool` on the search path.
	fn verify(&self, tool: &str) -> Result<PathBuf>;

	/// Run `tool` with `args` and wait for it to exit.
	///
	/// When `working_dir` is set it is passed as `-C <dir>` ahead of `args`.
	/// Returns the process exit code.
	async fn invoke(&self, tool: &str, working_dir: Option<&Path>, args: &[&str]) -> Result<i32>;
}

/// Builds the full argument vector for an invocation.
pub fn command_args(working_dir: Option<&Path>, args: &[&str]) -> Vec<String> {
	let mut argv = Vec::with_capacity(args.len() + 2);
	if let Some(dir) = working_dir {
		argv.push("-C".to_string());
		argv.push(dir.display().to_string());
	}
	argv.extend(args.iter().map(|arg| arg.to_string()));
	argv
}

/// Renders a command line for logs and error messages with credentials
/// removed.
pub fn redacted_command_line(tool: &str, argv: &[String]) -> String {
	redact_userinfo(&format!("{} {}", tool, argv.join(" ")))
}

/// Tool runner backed by real child processes.
///
/// Standard output is inherited so progress reaches the pipeline log;
/// standard error is captured, redacted and re-emitted through tracing.
#[derive(Debug, Clone, Default)]
pub struct CommandToolRunner {
	current_dir: Option<PathBuf>,
}

impl CommandToolRunner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Run every invocation from `dir` instead of the process's current
	/// directory.
	pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.current_dir = Some(dir.into());
		self
	}
}

#[async_trait]
impl ToolRunner for CommandToolRunner {
	fn verify(&self, tool: &str) -> Result<PathBuf> {
		let path = which::which(tool).map_err(|e| {
			warn!(tool = %tool, "tool not found in PATH");
			MirrorError::ToolNotFound {
				tool: tool.to_string(),
				reason: e.to_string(),
			}
		})?;

		debug!(tool = %tool, path = %path.display(), "resolved tool");
		Ok(path)
	}

	async fn invoke(&self, tool: &str, working_dir: Option<&Path>, args: &[&str]) -> Result<i32> {
		let argv = command_args(working_dir, args);
		let command_line = redacted_command_line(tool, &argv);

		let mut cmd = Command::new(tool);
		cmd.args(&argv)
			.stdin(Stdio::null())
			.stdout(Stdio::inherit())
			.stderr(Stdio::piped());
		if let Some(dir) = &self.current_dir {
			cmd.current_dir(dir);
		}

		trace!(cmd = %command_line, "running command");

		let output = cmd.output().await.map_err(|e| {
			error!(cmd = %command_line, error = %e, "failed to start process");
			MirrorError::ProcessInvocation {
				tool: tool.to_string(),
				reason: e.to_string(),
			}
		})?;

		let stderr = redact_userinfo(String::from_utf8_lossy(&output.stderr).trim());
		if !stderr.is_empty() {
			// git reports progress on stderr, so this is not an error by itself.
			debug!(cmd = %command_line, stderr = %stderr, "process stderr");
		}

		match output.status.code() {
			Some(code) => {
				debug!(cmd = %command_line, exit_code = code, "process exited");
				if code != 0 && !stderr.is_empty() {
					error!(cmd = %command_line, exit_code = code, stderr = %stderr, "process failed");
				}
				Ok(code)
			}
			None => {
				error!(cmd = %command_line, status = %output.status, "process terminated by signal");
				Err(MirrorError::ProcessInvocation {
					tool: tool.to_string(),
					reason: format!("terminated without exit code ({})", output.status),
				})
			}
		}
	}
}
