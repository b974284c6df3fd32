// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use crate::token::AccessToken;

/// One side of the mirror: a repository URI and an optional credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEndpoint {
	pub uri: String,
	pub access_token: Option<AccessToken>,
}

impl RepositoryEndpoint {
	pub fn new(uri: impl Into<String>) -> Self {
		Self {
			uri: uri.into(),
			access_token: None,
		}
	}

	pub fn with_token(mut self, token: AccessToken) -> Self {
		self.access_token = Some(token);
		self
	}
}

/// The two tool invocations a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStep {
	Clone,
	Push,
}

impl fmt::Display for MirrorStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MirrorStep::Clone => f.write_str("clone --mirror"),
			MirrorStep::Push => f.write_str("push --mirror"),
		}
	}
}

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorState {
	Init,
	ToolVerified,
	Cloned,
	Pushed,
}

/// Terminal result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
	Succeeded,
	Failed(String),
}

impl TaskOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, TaskOutcome::Succeeded)
	}
}

impl fmt::Display for TaskOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TaskOutcome::Succeeded => f.write_str("Succeeded"),
			TaskOutcome::Failed(reason) => write!(f, "Failed: {reason}"),
		}
	}
}
