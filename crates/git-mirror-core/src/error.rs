// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MirrorError>;

#[derive(Debug, Error)]
pub enum MirrorError {
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("invalid URI: {0}")]
	InvalidUri(String),

	#[error("{tool} is not installed or not in PATH: {reason}")]
	ToolNotFound { tool: String, reason: String },

	#[error("failed to invoke {tool}: {reason}")]
	ProcessInvocation { tool: String, reason: String },

	/// The process ran to completion with a non-zero exit code.
	#[error("`{command}` exited with code {code}")]
	CommandFailed {
		/// Redacted command line, safe to log.
		command: String,
		code: i32,
	},
}
