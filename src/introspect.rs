//! Introspection protocol exchange and response classification.
//!
//! One invocation performs exactly one Basic-authenticated form POST to the
//! configured endpoint and classifies the answer, in priority order:
//! transport failure (including malformed bodies), 401 credential failure,
//! `error == "insufficient_scope"`, any other non-empty `error`, verified.
//! No caching, no retry, no shared mutable state.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	bearer::AccessToken,
	config::GateConfig,
	error::TransportError,
	http::{IntrospectionHttpClient, IntrospectionRequest, WireResponse},
};

const CREDENTIAL_FAILURE: &str = "Missing or invalid resource credentials";

/// Tagged result of asking the authorization server about one token.
///
/// Transport failures are deliberately not an outcome; they surface as
/// [`crate::error::Error::Transport`] and propagate untyped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntrospectionOutcome {
	/// Token is valid and sufficiently scoped; carries the entire response
	/// body.
	Verified(Value),
	/// Token (or the resource's own identity) was rejected.
	RejectedInvalid {
		/// Description forwarded verbatim from the authorization server.
		description: String,
	},
	/// Token is valid but does not cover the required scope.
	RejectedInsufficientScope,
}

/// Performs the introspection exchange for one configured gate.
pub struct IntrospectionClient<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	http_client: Arc<C>,
	config: Arc<GateConfig>,
}
impl<C> IntrospectionClient<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	/// Creates a client bound to the provided transport + configuration.
	pub fn new(http_client: Arc<C>, config: Arc<GateConfig>) -> Self {
		Self { http_client, config }
	}

	/// Introspects one access token against the configured required scope.
	///
	/// Exactly one outbound network call is made per invocation.
	pub async fn introspect(&self, token: &AccessToken) -> Result<IntrospectionOutcome> {
		let authorization = self.config.credentials.basic_authorization();
		let mut form: Vec<(&'static str, &str)> =
			vec![("access_token", token.expose()), ("scope", self.config.scope.as_str())];

		if let Some(client_id) = self.config.client_id.as_deref() {
			form.push(("client_id", client_id));
		}

		let response = self
			.http_client
			.post_form(IntrospectionRequest {
				url: &self.config.endpoint,
				authorization: &authorization,
				form: &form,
				timeout: self.config.timeout,
			})
			.await?;

		classify(response)
	}
}
impl<C> Clone for IntrospectionClient<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), config: self.config.clone() }
	}
}
impl<C> Debug for IntrospectionClient<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IntrospectionClient")
			.field("endpoint", &self.config.endpoint.as_str())
			.field("scope", &self.config.scope)
			.finish()
	}
}

/// Classifies a raw wire response into an [`IntrospectionOutcome`].
fn classify(response: WireResponse) -> Result<IntrospectionOutcome> {
	// A 401 signals a misconfigured resource identity, not an end-user
	// fault; the body is irrelevant and may be empty.
	if response.status == 401 {
		return Ok(IntrospectionOutcome::RejectedInvalid {
			description: CREDENTIAL_FAILURE.into(),
		});
	}

	let deserializer = &mut serde_json::Deserializer::from_slice(&response.body);
	let body: Value = serde_path_to_error::deserialize(deserializer).map_err(|source| {
		TransportError::MalformedBody { source, status: Some(response.status) }
	})?;
	let error_code = match body.get("error") {
		None | Some(Value::Null) => None,
		Some(Value::String(code)) if code.is_empty() => None,
		Some(Value::String(code)) => Some(code.clone()),
		Some(other) => Some(other.to_string()),
	};

	match error_code.as_deref() {
		Some("insufficient_scope") => Ok(IntrospectionOutcome::RejectedInsufficientScope),
		Some(_) => Ok(IntrospectionOutcome::RejectedInvalid {
			description: body
				.get("error_description")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_owned(),
		}),
		None => Ok(IntrospectionOutcome::Verified(body)),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	fn response(status: u16, body: &str) -> WireResponse {
		WireResponse { status, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn status_401_maps_to_credential_failure() {
		let outcome = classify(response(401, "")).expect("401 should classify, not error.");

		assert_eq!(
			outcome,
			IntrospectionOutcome::RejectedInvalid {
				description: "Missing or invalid resource credentials".into(),
			},
		);
	}

	#[test]
	fn insufficient_scope_error_wins_over_description() {
		let outcome = classify(response(
			400,
			"{\"error\":\"insufficient_scope\",\"error_description\":\"anything at all\"}",
		))
		.expect("Insufficient scope body should classify.");

		assert_eq!(outcome, IntrospectionOutcome::RejectedInsufficientScope);
	}

	#[test]
	fn other_errors_forward_the_description_verbatim() {
		let outcome = classify(response(
			400,
			"{\"error\":\"invalid_request\",\"error_description\":\"Unknown access token\"}",
		))
		.expect("Invalid request body should classify.");

		assert_eq!(
			outcome,
			IntrospectionOutcome::RejectedInvalid {
				description: "Unknown access token".into()
			},
		);
	}

	#[test]
	fn missing_description_degrades_to_empty_string() {
		let outcome = classify(response(400, "{\"error\":\"invalid_token\"}"))
			.expect("Error body without description should classify.");

		assert_eq!(outcome, IntrospectionOutcome::RejectedInvalid { description: String::new() });
	}

	#[test]
	fn bodies_without_an_error_field_are_verified() {
		let outcome = classify(response(200, "{\"authorized\":true}"))
			.expect("Success body should classify.");

		assert_eq!(
			outcome,
			IntrospectionOutcome::Verified(serde_json::json!({ "authorized": true })),
		);
	}

	#[test]
	fn empty_or_null_error_fields_are_verified() {
		let outcome = classify(response(200, "{\"error\":\"\",\"authorized\":true}"))
			.expect("Empty error string should not reject.");

		assert!(matches!(outcome, IntrospectionOutcome::Verified(_)));

		let outcome = classify(response(200, "{\"error\":null,\"authorized\":true}"))
			.expect("Null error should not reject.");

		assert!(matches!(outcome, IntrospectionOutcome::Verified(_)));
	}

	#[test]
	fn malformed_bodies_surface_as_transport_failures() {
		let err = classify(response(200, "not json"))
			.expect_err("Non-JSON body must be a transport failure.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedBody { status: Some(200), .. }),
		));
	}
}
