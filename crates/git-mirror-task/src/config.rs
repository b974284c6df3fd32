// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use git_mirror_core::{AccessToken, MirrorError, MirrorInputs, DEFAULT_TOOL};

/// Mirror every ref of a source git repository into a destination repository.
///
/// Inputs default to the pipeline agent's `INPUT_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "git-mirror-task", version)]
pub struct Args {
	/// Source repository URI
	#[arg(long, env = "INPUT_SOURCEGITREPOSITORYURI")]
	pub source_uri: Option<String>,

	/// Personal access token for the source repository
	#[arg(
		long,
		env = "INPUT_SOURCEGITREPOSITORYPERSONALACCESSTOKEN",
		hide_env_values = true,
		value_parser = parse_token
	)]
	pub source_token: Option<AccessToken>,

	/// File containing the source access token (wins over --source-token)
	#[arg(long, env = "INPUT_SOURCEGITREPOSITORYPERSONALACCESSTOKEN_FILE")]
	pub source_token_file: Option<String>,

	/// Destination repository URI
	#[arg(long, env = "INPUT_DESTINATIONGITREPOSITORYURI")]
	pub destination_uri: Option<String>,

	/// Personal access token for the destination repository
	#[arg(
		long,
		env = "INPUT_DESTINATIONGITREPOSITORYPERSONALACCESSTOKEN",
		hide_env_values = true,
		value_parser = parse_token
	)]
	pub destination_token: Option<AccessToken>,

	/// File containing the destination access token (wins over --destination-token)
	#[arg(long, env = "INPUT_DESTINATIONGITREPOSITORYPERSONALACCESSTOKEN_FILE")]
	pub destination_token_file: Option<String>,

	/// Directory the mirror is cloned into (defaults to the current directory)
	#[arg(long, env = "GIT_MIRROR_WORK_DIR")]
	pub work_dir: Option<PathBuf>,

	/// git executable name or path
	#[arg(long = "git", env = "GIT_MIRROR_GIT", default_value = DEFAULT_TOOL)]
	pub git: String,

	/// Log output format
	#[arg(long, env = "GIT_MIRROR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
	pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	Pretty,
	Json,
}

fn parse_token(value: &str) -> Result<AccessToken, Infallible> {
	Ok(AccessToken::new(value))
}

/// Everything a run needs, resolved from [`Args`].
#[derive(Debug)]
pub struct TaskConfig {
	pub inputs: MirrorInputs,
	pub work_dir: Option<PathBuf>,
	pub git: String,
}

impl TaskConfig {
	pub fn from_args(args: Args) -> Result<Self, MirrorError> {
		let source_token = resolve_token(
			args.source_token,
			args.source_token_file,
			"source access token",
		)?;
		let destination_token = resolve_token(
			args.destination_token,
			args.destination_token_file,
			"destination access token",
		)?;

		Ok(Self {
			inputs: MirrorInputs {
				source_uri: args.source_uri,
				source_token,
				destination_uri: args.destination_uri,
				destination_token,
			},
			work_dir: args.work_dir,
			git: args.git,
		})
	}

	/// Tokens that must be masked in the pipeline log. Blank tokens are
	/// treated as absent, matching the orchestrator.
	pub fn tokens(&self) -> impl Iterator<Item = &AccessToken> {
		self.inputs
			.source_token
			.iter()
			.chain(self.inputs.destination_token.iter())
			.filter(|token| !token.is_blank())
	}
}

/// A token file wins over a direct value. A single trailing newline is
/// stripped from file content.
fn resolve_token(
	value: Option<AccessToken>,
	file: Option<String>,
	name: &str,
) -> Result<Option<AccessToken>, MirrorError> {
	let Some(path) = file else {
		return Ok(value);
	};

	if path.is_empty() {
		return Err(MirrorError::Configuration(format!(
			"{name} file path is empty"
		)));
	}

	let content = fs::read_to_string(&path).map_err(|e| {
		MirrorError::Configuration(format!("failed to read {name} from {path}: {e}"))
	})?;
	let token = content.strip_suffix('\n').unwrap_or(&content);

	Ok(Some(AccessToken::new(token)))
}
