// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroize;

use crate::error::{MirrorError, Result};
use crate::token::{AccessToken, REDACTED};

/// A repository URI that may carry an access token in its userinfo.
///
/// Lives only for the duration of one tool invocation. `Debug` and `Display`
/// print the URI with the userinfo replaced by [`REDACTED`].
#[derive(Zeroize, Clone, PartialEq, Eq)]
#[zeroize(drop)]
pub struct AuthenticatedUri {
	inner: String,
}

impl AuthenticatedUri {
	/// The credential-bearing URI, for handing to the tool.
	pub fn expose(&self) -> &str {
		&self.inner
	}
}

impl fmt::Debug for AuthenticatedUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AuthenticatedUri")
			.field(&redact_userinfo(&self.inner))
			.finish()
	}
}

impl fmt::Display for AuthenticatedUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&redact_userinfo(&self.inner))
	}
}

/// Requires a URI to be present and to parse as an absolute URI with an
/// authority component.
pub(crate) fn parse_absolute(uri: Option<&str>) -> Result<(&str, Url)> {
	let raw = uri.ok_or_else(|| MirrorError::InvalidUri("URI is undefined".to_string()))?;

	let parsed = Url::parse(raw)
		.map_err(|e| MirrorError::InvalidUri(format!("{}: {}", redact_userinfo(raw), e)))?;

	if !parsed.has_authority() {
		return Err(MirrorError::InvalidUri(format!(
			"{}: missing authority",
			redact_userinfo(raw)
		)));
	}

	Ok((raw, parsed))
}

/// Builds the URI handed to the tool for one endpoint.
///
/// Without a token the input is returned unchanged. With a token and an
/// `http`/`https` scheme the token becomes the URI's userinfo, replacing any
/// userinfo already present. Other schemes (ssh, git, file) are returned
/// unchanged with a warning; their transports authenticate on their own.
pub fn build_authenticated_uri(
	uri: Option<&str>,
	token: Option<&AccessToken>,
) -> Result<AuthenticatedUri> {
	let (raw, parsed) = parse_absolute(uri)?;

	let token = match token {
		Some(token) if !token.is_empty() => token,
		_ => {
			debug!(uri = %redact_userinfo(raw), "no access token, using URI as given");
			return Ok(AuthenticatedUri {
				inner: raw.to_string(),
			});
		}
	};

	if !matches!(parsed.scheme(), "http" | "https") {
		warn!(
				scheme = parsed.scheme(),
				uri = %redact_userinfo(raw),
				"access token ignored for non-HTTP(S) URI"
		);
		return Ok(AuthenticatedUri {
			inner: raw.to_string(),
		});
	}

	// Url::parse accepts special schemes without `//`; splice against the
	// authority as written and always emit the `//` form.
	let (prefix_end, authority_start) = authority_bounds(raw)
		.ok_or_else(|| MirrorError::InvalidUri(format!("{}: missing scheme", redact_userinfo(raw))))?;
	let authority_end = authority_end(raw, authority_start);
	let authority = &raw[authority_start..authority_end];
	let host_port = authority
		.rsplit_once('@')
		.map(|(_, host_port)| host_port)
		.unwrap_or(authority);

	let spliced = format!(
		"{}//{}@{}{}",
		&raw[..prefix_end],
		urlencoding::encode(token.expose()),
		host_port,
		&raw[authority_end..]
	);

	Url::parse(&spliced).map_err(|e| {
		MirrorError::InvalidUri(format!("{}: {}", redact_userinfo(&spliced), e))
	})?;

	Ok(AuthenticatedUri { inner: spliced })
}

/// Replaces the userinfo of every `scheme://user@host` occurrence in `text`
/// with [`REDACTED`].
pub fn redact_userinfo(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut rest = text;

	while let Some(idx) = rest.find("://") {
		let start = idx + 3;
		out.push_str(&rest[..start]);

		let end = authority_end(rest, start);
		let authority = &rest[start..end];
		match authority.rfind('@') {
			Some(at) => {
				out.push_str(REDACTED);
				out.push_str(&authority[at..]);
			}
			None => out.push_str(authority),
		}

		rest = &rest[end..];
	}

	out.push_str(rest);
	out
}

/// Returns the end of `scheme:` and the start of the authority in `raw`,
/// skipping a `//` when present.
fn authority_bounds(raw: &str) -> Option<(usize, usize)> {
	let prefix_end = raw.find(':')? + 1;
	if raw[prefix_end..].starts_with("//") {
		Some((prefix_end, prefix_end + 2))
	} else {
		Some((prefix_end, prefix_end))
	}
}

/// The path of `raw` exactly as written: no percent-encoding or
/// normalisation, query and fragment removed.
pub(crate) fn raw_path(raw: &str) -> &str {
	let Some((_, start)) = authority_bounds(raw) else {
		return "";
	};
	let end = raw.find(['?', '#']).unwrap_or(raw.len()).max(start);
	let rest = &raw[start..end];
	rest.find('/').map(|idx| &rest[idx..]).unwrap_or("")
}

fn authority_end(text: &str, start: usize) -> usize {
	text[start..]
		.find(|c: char| matches!(c, '/' | '?' | '#') || c.is_whitespace())
		.map(|idx| start + idx)
		.unwrap_or(text.len())
}
