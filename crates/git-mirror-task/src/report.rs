// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Pipeline agent logging commands.
//!
//! The agent scans the task's stdout for `##vso[...]` lines. Data after the
//! closing bracket must have `%`, `\r` and `\n` escaped.

use std::io::{self, Write};

use git_mirror_core::{AccessToken, TaskOutcome};

pub struct PipelineReporter<W: Write> {
	out: W,
}

impl<W: Write> PipelineReporter<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	/// Ask the agent to mask `token` everywhere in its log capture.
	pub fn register_secret(&mut self, token: &AccessToken) -> io::Result<()> {
		writeln!(self.out, "##vso[task.setsecret]{}", escape_data(token.expose()))?;
		self.out.flush()
	}

	/// Report the run's single terminal result.
	pub fn complete(&mut self, outcome: &TaskOutcome) -> io::Result<()> {
		match outcome {
			TaskOutcome::Succeeded => writeln!(
				self.out,
				"##vso[task.complete result=Succeeded;]Mirror completed"
			)?,
			TaskOutcome::Failed(reason) => writeln!(
				self.out,
				"##vso[task.complete result=Failed;]{}",
				escape_data(reason)
			)?,
		}
		self.out.flush()
	}

	#[cfg(test)]
	fn into_inner(self) -> W {
		self.out
	}
}

fn escape_data(value: &str) -> String {
	value
		.replace('%', "%AZP25")
		.replace('\r', "%0D")
		.replace('\n', "%0A")
}
