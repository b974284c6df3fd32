// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{MirrorError, Result};
use crate::runner::{command_args, ToolRunner};

/// Recorded call to the mock tool runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
	Verify(String),
	/// Tool name and the full argument vector, `-C <dir>` included.
	Invoke(String, Vec<String>),
}

/// Scripted result for one `invoke` call.
#[derive(Clone, Debug)]
pub enum MockResponse {
	Exit(i32),
	Error(String),
}

/// Mock tool runner for testing.
///
/// Invocations consume scripted responses in order; once the script is
/// exhausted every invocation exits with code 0.
#[derive(Clone, Default)]
pub struct MockToolRunner {
	/// If set, verify fails with this reason.
	pub verify_error: Option<String>,
	/// Responses for successive invoke calls.
	pub responses: Arc<Mutex<VecDeque<MockResponse>>>,
	/// Track calls for verification.
	pub calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockToolRunner {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn tool_missing(mut self, reason: impl Into<String>) -> Self {
		self.verify_error = Some(reason.into());
		self
	}

	/// Queue an exit code for the next unscripted invocation.
	pub fn then_exit(self, code: i32) -> Self {
		self.responses.lock().unwrap().push_back(MockResponse::Exit(code));
		self
	}

	/// Queue a start failure for the next unscripted invocation.
	pub fn then_error(self, reason: impl Into<String>) -> Self {
		self.responses
			.lock()
			.unwrap()
			.push_back(MockResponse::Error(reason.into()));
		self
	}

	/// Returns the recorded calls.
	pub fn get_calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}

	/// Returns only the recorded invocations, as argument vectors.
	pub fn invocations(&self) -> Vec<Vec<String>> {
		self.get_calls()
			.into_iter()
			.filter_map(|call| match call {
				MockCall::Invoke(_, argv) => Some(argv),
				MockCall::Verify(_) => None,
			})
			.collect()
	}

	fn record(&self, call: MockCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl ToolRunner for MockToolRunner {
	fn verify(&self, tool: &str) -> Result<PathBuf> {
		self.record(MockCall::Verify(tool.to_string()));
		if let Some(ref reason) = self.verify_error {
			return Err(MirrorError::ToolNotFound {
				tool: tool.to_string(),
				reason: reason.clone(),
			});
		}
		Ok(PathBuf::from("/usr/bin").join(tool))
	}

	async fn invoke(&self, tool: &str, working_dir: Option<&Path>, args: &[&str]) -> Result<i32> {
		self.record(MockCall::Invoke(
			tool.to_string(),
			command_args(working_dir, args),
		));

		let response = self.responses.lock().unwrap().pop_front();
		match response {
			Some(MockResponse::Exit(code)) => Ok(code),
			Some(MockResponse::Error(reason)) => Err(MirrorError::ProcessInvocation {
				tool: tool.to_string(),
				reason,
			}),
			None => Ok(0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Test: MockToolRunner records calls in order with full argument vectors.
	///
	/// Why this test is important: orchestrator tests assert on the exact
	/// sequence and shape of invocations; a mock that reorders or drops the
	/// `-C` prefix would hide real defects.
	#[tokio::test]
	async fn test_records_all_calls() {
		let runner = MockToolRunner::new();

		runner.verify("git").unwrap();
		runner.invoke("git", None, &["clone", "--mirror", "u"]).await.unwrap();
		runner
			.invoke("git", Some(Path::new("r.git")), &["push", "--mirror", "d"])
			.await
			.unwrap();

		assert_eq!(
			runner.get_calls(),
			vec![
				MockCall::Verify("git".to_string()),
				MockCall::Invoke(
					"git".to_string(),
					vec!["clone".into(), "--mirror".into(), "u".into()]
				),
				MockCall::Invoke(
					"git".to_string(),
					vec![
						"-C".into(),
						"r.git".into(),
						"push".into(),
						"--mirror".into(),
						"d".into()
					]
				),
			]
		);
	}

	#[tokio::test]
	async fn test_scripted_responses_are_consumed_in_order() {
		let runner = MockToolRunner::new().then_exit(0).then_exit(128).then_error("boom");

		assert_eq!(runner.invoke("git", None, &[]).await.unwrap(), 0);
		assert_eq!(runner.invoke("git", None, &[]).await.unwrap(), 128);
		assert!(matches!(
			runner.invoke("git", None, &[]).await,
			Err(MirrorError::ProcessInvocation { .. })
		));
		assert_eq!(runner.invoke("git", None, &[]).await.unwrap(), 0);
	}

	#[test]
	fn test_tool_missing() {
		let runner = MockToolRunner::new().tool_missing("not on PATH");
		assert!(matches!(
			runner.verify("git"),
			Err(MirrorError::ToolNotFound { .. })
		));
	}

	/// Clones share call history, so a mock handed to the orchestrator can
	/// still be inspected afterwards.
	#[tokio::test]
	async fn test_clones_share_calls() {
		let runner = MockToolRunner::new();
		let clone = runner.clone();

		clone.invoke("git", None, &["status"]).await.unwrap();

		assert_eq!(runner.invocations(), vec![vec!["status".to_string()]]);
	}
}
