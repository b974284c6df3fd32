// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::path::Path;

use crate::error::{MirrorError, Result};
use crate::uri::{parse_absolute, raw_path, redact_userinfo};

const GIT_SUFFIX: &str = ".git";

/// Directory name that `git clone --mirror` creates for a source URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFolderName(String);

impl MirrorFolderName {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl AsRef<Path> for MirrorFolderName {
	fn as_ref(&self) -> &Path {
		Path::new(&self.0)
	}
}

impl fmt::Display for MirrorFolderName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Derives the mirror folder name from the last path segment of the source
/// URI, appending `.git` unless it is already there.
///
/// The segment is taken from the URI as written, since that is the string
/// git names the clone after. Query, fragment and a trailing `/` are
/// ignored. A URI without any path segment has no repository name and is
/// rejected.
pub fn resolve_mirror_folder_name(source_uri: Option<&str>) -> Result<MirrorFolderName> {
	let (raw, _) = parse_absolute(source_uri)?;

	let segment = raw_path(raw)
		.trim_end_matches('/')
		.rsplit('/')
		.next()
		.filter(|segment| !segment.is_empty())
		.ok_or_else(|| {
			MirrorError::InvalidUri(format!(
				"{}: no repository name in path",
				redact_userinfo(raw)
			))
		})?;

	if segment.ends_with(GIT_SUFFIX) {
		Ok(MirrorFolderName(segment.to_string()))
	} else {
		Ok(MirrorFolderName(format!("{segment}{GIT_SUFFIX}")))
	}
}
