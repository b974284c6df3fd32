// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::error::{MirrorError, Result};
use crate::folder::resolve_mirror_folder_name;
use crate::runner::{command_args, redacted_command_line, ToolRunner};
use crate::token::AccessToken;
use crate::types::{MirrorState, MirrorStep, RepositoryEndpoint, TaskOutcome};
use crate::uri::{build_authenticated_uri, redact_userinfo};

pub const DEFAULT_TOOL: &str = "git";

/// Raw task inputs as read from the pipeline. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct MirrorInputs {
	pub source_uri: Option<String>,
	pub source_token: Option<AccessToken>,
	pub destination_uri: Option<String>,
	pub destination_token: Option<AccessToken>,
}

/// Drives one mirror run: verify the tool, clone the source as a mirror,
/// push the mirror to the destination.
pub struct MirrorOrchestrator<R: ToolRunner> {
	runner: Arc<R>,
	tool: String,
	source: RepositoryEndpoint,
	destination: RepositoryEndpoint,
	state: MirrorState,
}

impl<R: ToolRunner> MirrorOrchestrator<R> {
	/// Validates the required inputs. Fails with
	/// [`MirrorError::Configuration`] naming the first missing one.
	pub fn new(runner: Arc<R>, inputs: MirrorInputs) -> Result<Self> {
		let source_uri = require(inputs.source_uri, "source repository URI")?;
		let destination_uri = require(inputs.destination_uri, "destination repository URI")?;
		let destination_token = inputs
			.destination_token
			.filter(|token| !token.is_blank())
			.ok_or_else(|| {
				MirrorError::Configuration("destination access token must be defined".to_string())
			})?;
		let source_token = inputs
			.source_token
			.filter(|token| !token.is_blank());

		Ok(Self {
			runner,
			tool: DEFAULT_TOOL.to_string(),
			source: RepositoryEndpoint {
				uri: source_uri,
				access_token: source_token,
			},
			destination: RepositoryEndpoint::new(destination_uri).with_token(destination_token),
			state: MirrorState::Init,
		})
	}

	/// Use a different executable name or path than `git`.
	pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
		self.tool = tool.into();
		self
	}

	pub fn source(&self) -> &RepositoryEndpoint {
		&self.source
	}

	pub fn destination(&self) -> &RepositoryEndpoint {
		&self.destination
	}

	/// Runs the mirror once and reports a single outcome. Stops at the first
	/// failure; nothing is retried.
	#[instrument(skip_all, fields(tool = %self.tool, source = %redact_userinfo(&self.source.uri)))]
	pub async fn run(mut self) -> TaskOutcome {
		match self.execute().await {
			Ok(()) => {
				info!("mirror completed");
				TaskOutcome::Succeeded
			}
			Err(e) => {
				error!(state = ?self.state, error = %e, "mirror failed");
				TaskOutcome::Failed(e.to_string())
			}
		}
	}

	async fn execute(&mut self) -> Result<()> {
		let path = self.runner.verify(&self.tool)?;
		debug!(path = %path.display(), "tool verified");
		self.state = MirrorState::ToolVerified;

		self.clone_mirror().await?;
		self.state = MirrorState::Cloned;

		self.push_mirror().await?;
		self.state = MirrorState::Pushed;

		Ok(())
	}

	async fn clone_mirror(&self) -> Result<()> {
		let uri = build_authenticated_uri(
			Some(&self.source.uri),
			self.source.access_token.as_ref(),
		)?;

		info!(uri = %uri, "cloning source as mirror");
		let args = ["clone", "--mirror", uri.expose()];
		self.invoke(MirrorStep::Clone, None, &args).await
	}

	async fn push_mirror(&self) -> Result<()> {
		let folder = resolve_mirror_folder_name(Some(&self.source.uri))?;
		let uri = build_authenticated_uri(
			Some(&self.destination.uri),
			self.destination.access_token.as_ref(),
		)?;

		info!(folder = %folder, uri = %uri, "pushing mirror to destination");
		let args = ["push", "--mirror", uri.expose()];
		self.invoke(MirrorStep::Push, Some(folder.as_ref()), &args)
			.await
	}

	async fn invoke(
		&self,
		step: MirrorStep,
		working_dir: Option<&std::path::Path>,
		args: &[&str],
	) -> Result<()> {
		let code = self.runner.invoke(&self.tool, working_dir, args).await?;
		if code != 0 {
			return Err(MirrorError::CommandFailed {
				command: redacted_command_line(&self.tool, &command_args(working_dir, args)),
				code,
			});
		}

		debug!(step = %step, "step completed");
		Ok(())
	}
}

fn require(value: Option<String>, name: &str) -> Result<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
		.ok_or_else(|| MirrorError::Configuration(format!("{name} must be defined")))
}
