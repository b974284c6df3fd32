// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Mirrors every ref of one git repository into another.
//!
//! A run verifies that `git` is available, runs `git clone --mirror` against
//! the source, then `git -C <folder> push --mirror` against the destination,
//! and reports a single [`TaskOutcome`]. Access tokens are injected into
//! HTTP(S) URIs for the duration of each invocation and never logged.

mod error;
mod folder;
mod mock_runner;
mod orchestrator;
mod runner;
mod token;
mod types;
mod uri;

pub use error::{MirrorError, Result};
pub use folder::{resolve_mirror_folder_name, MirrorFolderName};
pub use mock_runner::{MockCall, MockResponse, MockToolRunner};
pub use orchestrator::{MirrorInputs, MirrorOrchestrator, DEFAULT_TOOL};
pub use runner::{command_args, redacted_command_line, CommandToolRunner, ToolRunner};
pub use token::{AccessToken, REDACTED};
pub use types::{MirrorState, MirrorStep, RepositoryEndpoint, TaskOutcome};
pub use uri::{build_authenticated_uri, redact_userinfo, AuthenticatedUri};
