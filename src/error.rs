//! Gate-level error types shared across extraction, introspection, and the layer surface.

// self
use crate::_prelude::*;

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gate error exposed by public APIs.
///
/// Rejections are the only variants an external renderer is expected to turn
/// into an HTTP response; configuration and transport failures propagate to
/// the surrounding error-handling collaborator untyped.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout, malformed response).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Typed verification rejection.
	#[error(transparent)]
	Rejection(#[from] Rejection),
}
impl Error {
	/// Returns the inner [`Rejection`] when the error is a typed rejection.
	pub fn rejection(&self) -> Option<&Rejection> {
		match self {
			Self::Rejection(rejection) => Some(rejection),
			_ => None,
		}
	}
}

/// Verification rejection kinds callers pattern-match on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionKind {
	/// Malformed/missing token, unknown token, or bad resource credentials.
	InvalidRequest,
	/// Token is valid but does not cover the required scope.
	InsufficientScope,
}
impl RejectionKind {
	/// Fixed wire-level error code for the kind.
	pub const fn message(self) -> &'static str {
		match self {
			RejectionKind::InvalidRequest => "invalid_request",
			RejectionKind::InsufficientScope => "insufficient_scope",
		}
	}

	/// HTTP status code an external renderer should use.
	///
	/// Insufficient-scope rejections keep the literal 400 the authorization
	/// server itself answers with, not the conventional 403.
	pub const fn status_code(self) -> u16 {
		match self {
			RejectionKind::InvalidRequest => 400,
			RejectionKind::InsufficientScope => 400,
		}
	}
}
impl Display for RejectionKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.message())
	}
}

/// Terminal verification rejection carrying everything an external renderer
/// needs to produce a response without further interpretation.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{}: {}", .kind.message(), .description)]
pub struct Rejection {
	/// Which taxonomy branch the rejection belongs to.
	pub kind: RejectionKind,
	/// Human-readable description of the rejection.
	pub description: String,
}
impl Rejection {
	/// Builds an `invalid_request` rejection with the provided description.
	pub fn invalid_request(description: impl Into<String>) -> Self {
		Self { kind: RejectionKind::InvalidRequest, description: description.into() }
	}

	/// Builds an `insufficient_scope` rejection with its fixed description.
	pub fn insufficient_scope() -> Self {
		Self { kind: RejectionKind::InsufficientScope, description: "Insufficient scope".into() }
	}

	/// Fixed wire-level error code for the rejection's kind.
	pub const fn message(&self) -> &'static str {
		self.kind.message()
	}

	/// HTTP status code an external renderer should use.
	pub const fn status_code(&self) -> u16 {
		self.kind.status_code()
	}

	/// Renders the rejection as the conventional OAuth error body.
	pub fn to_body(&self) -> serde_json::Value {
		serde_json::json!({
			"error": self.message(),
			"error_description": self.description,
		})
	}
}

/// Transport-level failures surfaced by the introspection exchange.
///
/// These are never translated into a [`Rejection`]; the surrounding
/// error-handling collaborator treats them as an internal failure.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure or timeout.
	#[error("Network error occurred while calling the introspection endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Introspection endpoint answered with a body that is not valid JSON.
	#[error("Introspection endpoint returned malformed JSON.")]
	MalformedBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the introspection endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Configuration and validation failures raised while building a gate.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// Exactly one introspection target must be configured.
	#[error("Missing introspection target; set either `endpoint` or `provider`.")]
	MissingTarget,
	/// Endpoint and provider cannot both be configured.
	#[error("Both `endpoint` and `provider` are set; exactly one is allowed.")]
	ConflictingTarget,
	/// Resource credentials must never be empty-stringed.
	#[error("Resource credential `{field}` cannot be empty.")]
	EmptyCredential {
		/// Which credential field failed validation.
		field: &'static str,
	},
	/// The required scope must be a non-empty string.
	#[error("Required scope cannot be empty.")]
	EmptyScope,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejections_carry_fixed_message_and_status() {
		let invalid = Rejection::invalid_request("Unknown access token");

		assert_eq!(invalid.kind, RejectionKind::InvalidRequest);
		assert_eq!(invalid.message(), "invalid_request");
		assert_eq!(invalid.status_code(), 400);
		assert_eq!(invalid.description, "Unknown access token");

		let insufficient = Rejection::insufficient_scope();

		assert_eq!(insufficient.kind, RejectionKind::InsufficientScope);
		assert_eq!(insufficient.message(), "insufficient_scope");
		assert_eq!(insufficient.status_code(), 400);
		assert_eq!(insufficient.description, "Insufficient scope");
	}

	#[test]
	fn rejection_body_matches_wire_format() {
		let body = Rejection::invalid_request("Unknown access token").to_body();

		assert_eq!(
			body,
			serde_json::json!({
				"error": "invalid_request",
				"error_description": "Unknown access token",
			}),
		);
	}

	#[test]
	fn rejection_converts_into_gate_error() {
		let error: Error = Rejection::insufficient_scope().into();
		let rejection =
			error.rejection().expect("Rejection errors should expose their inner rejection.");

		assert_eq!(rejection.kind, RejectionKind::InsufficientScope);
		assert!(error.to_string().contains("Insufficient scope"));
	}

	#[test]
	fn transport_errors_are_not_rejections() {
		let error: Error = TransportError::Io(std::io::Error::other("connection reset")).into();

		assert!(error.rejection().is_none());
		assert!(matches!(error, Error::Transport(_)));
	}
}
