// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Access token wrapper that keeps credentials out of logs.
//!
//! An [`AccessToken`] prints as [`REDACTED`] through both `Debug` and
//! `Display`, so it is safe to pass to `tracing` fields. The inner value is
//! zeroed on drop and is only reachable through [`AccessToken::expose`].

use std::fmt;

use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

#[derive(Zeroize)]
#[zeroize(drop)]
pub struct AccessToken {
	inner: String,
}

impl AccessToken {
	pub fn new(inner: impl Into<String>) -> Self {
		Self {
			inner: inner.into(),
		}
	}

	/// Explicitly access the raw token.
	///
	/// Call sites opt in to seeing the credential, which keeps every use
	/// visible in review.
	pub fn expose(&self) -> &str {
		&self.inner
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Empty or whitespace only; such a token is treated as absent.
	pub fn is_blank(&self) -> bool {
		self.inner.trim().is_empty()
	}
}

impl Clone for AccessToken {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl PartialEq for AccessToken {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AccessToken").field(&REDACTED).finish()
	}
}

impl fmt::Display for AccessToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}
