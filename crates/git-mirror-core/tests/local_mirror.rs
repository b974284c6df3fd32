// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! End-to-end runs against real repositories on the local filesystem.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use git_mirror_core::{
	AccessToken, CommandToolRunner, MirrorInputs, MirrorOrchestrator, TaskOutcome,
};
use tempfile::TempDir;
use url::Url;

fn git(dir: &Path, args: &[&str]) -> String {
	let output = Command::new("git")
		.args([
			"-c",
			"user.email=test@test.com",
			"-c",
			"user.name=Test",
			"-c",
			"commit.gpgsign=false",
		])
		.args(args)
		.current_dir(dir)
		.output()
		.expect("git failed to start");
	assert!(
		output.status.success(),
		"git {:?} failed: {}",
		args,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn file_uri(path: &Path) -> String {
	Url::from_file_path(path).unwrap().to_string()
}

fn refs(dir: &Path) -> String {
	git(dir, &["for-each-ref", "--format=%(refname) %(objectname)"])
}

/// Creates a source repository with two branches and a tag.
fn create_source(root: &Path) -> std::path::PathBuf {
	let source = root.join("source");
	std::fs::create_dir_all(&source).unwrap();
	git(&source, &["init"]);
	std::fs::write(source.join("README.md"), "# Source").unwrap();
	git(&source, &["add", "."]);
	git(&source, &["commit", "-m", "Initial commit"]);
	git(&source, &["tag", "v1.0.0"]);
	git(&source, &["branch", "release/v1"]);
	std::fs::write(source.join("README.md"), "# Source v2").unwrap();
	git(&source, &["commit", "-am", "Second commit"]);
	source
}

fn inputs(source: &Path, destination: &Path) -> MirrorInputs {
	MirrorInputs {
		source_uri: Some(file_uri(source)),
		source_token: None,
		destination_uri: Some(file_uri(destination)),
		destination_token: Some(AccessToken::new("unused-for-file-transport")),
	}
}

#[tokio::test]
async fn mirrors_all_refs_to_destination() {
	let root = TempDir::new().unwrap();
	let source = create_source(root.path());
	let destination = root.path().join("destination.git");
	git(root.path(), &["init", "--bare", "destination.git"]);

	let work = root.path().join("work");
	std::fs::create_dir_all(&work).unwrap();
	let runner = Arc::new(CommandToolRunner::new().with_current_dir(&work));

	let outcome = MirrorOrchestrator::new(runner, inputs(&source, &destination))
		.unwrap()
		.run()
		.await;

	assert_eq!(outcome, TaskOutcome::Succeeded);
	assert!(work.join("source.git").join("HEAD").exists());
	assert_eq!(refs(&destination), refs(&source));
	assert!(refs(&destination).contains("refs/tags/v1.0.0"));
	assert!(refs(&destination).contains("refs/heads/release/v1"));
}

#[tokio::test]
async fn mirror_push_deletes_refs_missing_from_source() {
	let root = TempDir::new().unwrap();
	let source = create_source(root.path());
	let destination = root.path().join("destination.git");
	git(root.path(), &["init", "--bare", "destination.git"]);

	let seed = root.path().join("seed");
	std::fs::create_dir_all(&seed).unwrap();
	git(&seed, &["init"]);
	std::fs::write(seed.join("stale.txt"), "stale").unwrap();
	git(&seed, &["add", "."]);
	git(&seed, &["commit", "-m", "Stale"]);
	git(
		&seed,
		&["push", &file_uri(&destination), "HEAD:refs/heads/stale-branch"],
	);
	assert!(refs(&destination).contains("refs/heads/stale-branch"));

	let work = root.path().join("work");
	std::fs::create_dir_all(&work).unwrap();
	let runner = Arc::new(CommandToolRunner::new().with_current_dir(&work));

	let outcome = MirrorOrchestrator::new(runner, inputs(&source, &destination))
		.unwrap()
		.run()
		.await;

	assert!(outcome.is_success());
	assert!(!refs(&destination).contains("stale-branch"));
	assert_eq!(refs(&destination), refs(&source));
}

#[tokio::test]
async fn missing_source_fails_without_push() {
	let root = TempDir::new().unwrap();
	let destination = root.path().join("destination.git");
	git(root.path(), &["init", "--bare", "destination.git"]);

	let work = root.path().join("work");
	std::fs::create_dir_all(&work).unwrap();
	let runner = Arc::new(CommandToolRunner::new().with_current_dir(&work));

	let outcome = MirrorOrchestrator::new(
		runner,
		inputs(&root.path().join("does-not-exist"), &destination),
	)
	.unwrap()
	.run()
	.await;

	match outcome {
		TaskOutcome::Failed(reason) => assert!(reason.contains("clone --mirror")),
		TaskOutcome::Succeeded => panic!("expected clone failure"),
	}
	assert!(refs(&destination).is_empty());
}

#[tokio::test]
async fn missing_destination_fails_after_clone() {
	let root = TempDir::new().unwrap();
	let source = create_source(root.path());

	let work = root.path().join("work");
	std::fs::create_dir_all(&work).unwrap();
	let runner = Arc::new(CommandToolRunner::new().with_current_dir(&work));

	let outcome = MirrorOrchestrator::new(
		runner,
		inputs(&source, &root.path().join("no-such-destination.git")),
	)
	.unwrap()
	.run()
	.await;

	match outcome {
		TaskOutcome::Failed(reason) => assert!(reason.contains("push --mirror")),
		TaskOutcome::Succeeded => panic!("expected push failure"),
	}
	assert!(work.join("source.git").exists());
}

/// git names the clone after the source path as written, so a name with
/// characters `Url` would percent-encode must still resolve to that folder.
#[tokio::test]
async fn mirrors_source_with_unencoded_path_characters() {
	let root = TempDir::new().unwrap();
	let source = create_source(root.path());
	let renamed = root.path().join("répo");
	std::fs::rename(&source, &renamed).unwrap();
	let destination = root.path().join("destination.git");
	git(root.path(), &["init", "--bare", "destination.git"]);

	let work = root.path().join("work");
	std::fs::create_dir_all(&work).unwrap();
	let runner = Arc::new(CommandToolRunner::new().with_current_dir(&work));

	let inputs = MirrorInputs {
		source_uri: Some(format!("file://{}", renamed.display())),
		source_token: None,
		destination_uri: Some(file_uri(&destination)),
		destination_token: Some(AccessToken::new("unused-for-file-transport")),
	};

	let outcome = MirrorOrchestrator::new(runner, inputs).unwrap().run().await;

	assert_eq!(outcome, TaskOutcome::Succeeded);
	assert!(work.join("répo.git").join("HEAD").exists());
	assert_eq!(refs(&destination), refs(&renamed));
}
