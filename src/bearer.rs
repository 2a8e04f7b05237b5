//! Bearer token extraction from the `Authorization` request header.

// self
use crate::{_prelude::*, error::Rejection};

const MISSING_ACCESS_TOKEN: &str = "Missing access token";

/// Opaque access token extracted from an `Authorization: Bearer` header.
///
/// No internal structure is assumed or validated beyond non-emptiness; the
/// token is forwarded verbatim to the authorization server.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a raw token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Extracts the bearer token from a raw `Authorization` header value.
///
/// A literal, case-sensitive `"Bearer "` prefix is stripped when present;
/// otherwise the whole header value is the candidate token. An absent header,
/// an empty value, or a whitespace-only remainder is rejected with
/// `invalid_request("Missing access token")` before any network call.
pub fn extract_bearer(header: Option<&str>) -> Result<AccessToken, Rejection> {
	let raw = header.unwrap_or_default();
	let candidate = raw.strip_prefix("Bearer ").unwrap_or(raw);

	if candidate.trim().is_empty() {
		return Err(Rejection::invalid_request(MISSING_ACCESS_TOKEN));
	}

	Ok(AccessToken::new(candidate))
}
