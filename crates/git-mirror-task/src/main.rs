// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

mod config;
mod report;

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use git_mirror_core::{CommandToolRunner, MirrorOrchestrator, TaskOutcome};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Args, LogFormat, TaskConfig};
use crate::report::PipelineReporter;

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	if let Err(e) = init_tracing(args.log_format) {
		eprintln!("failed to initialise logging: {e}");
	}

	let mut reporter = PipelineReporter::new(io::stdout());
	let outcome = run(args, &mut reporter).await;

	if let Err(e) = reporter.complete(&outcome) {
		error!(error = %e, "failed to report task result");
	}

	if outcome.is_success() {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

fn init_tracing(format: LogFormat) -> Result<()> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let registry = tracing_subscriber::registry().with(filter);

	match format {
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
			.try_init()?,
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(io::stderr),
			)
			.try_init()?,
	}

	Ok(())
}

async fn run<W: Write>(args: Args, reporter: &mut PipelineReporter<W>) -> TaskOutcome {
	info!("Starting git-mirror-task");

	let config = match TaskConfig::from_args(args) {
		Ok(config) => config,
		Err(e) => {
			error!(error = %e, "invalid task inputs");
			return TaskOutcome::Failed(e.to_string());
		}
	};

	for token in config.tokens() {
		if let Err(e) = reporter.register_secret(token) {
			warn!(error = %e, "failed to register secret with the agent");
		}
	}

	let mut runner = CommandToolRunner::new();
	if let Some(dir) = &config.work_dir {
		info!(work_dir = %dir.display(), "using work directory");
		runner = runner.with_current_dir(dir);
	}

	match MirrorOrchestrator::new(Arc::new(runner), config.inputs) {
		Ok(orchestrator) => orchestrator.with_tool(config.git).run().await,
		Err(e) => {
			error!(error = %e, "invalid task inputs");
			TaskOutcome::Failed(e.to_string())
		}
	}
}
