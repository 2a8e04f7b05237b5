//! Transport primitives for the introspection exchange.
//!
//! The module exposes [`IntrospectionHttpClient`] as the gate's only
//! dependency on an HTTP stack. Implementations receive a fully described
//! [`IntrospectionRequest`] and answer with the raw [`WireResponse`];
//! classification of statuses and bodies stays in [`crate::introspect`] so
//! custom transports never duplicate protocol logic.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use http::header::AUTHORIZATION;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`IntrospectionHttpClient::post_form`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<WireResponse, TransportError>> + 'a + Send>>;

/// One fully described introspection POST.
///
/// The `authorization` field carries the precomputed Basic header value and
/// `form` the ordered field set; transports must submit them verbatim with a
/// `Content-Type: application/x-www-form-urlencoded` body and must honor the
/// optional deadline by failing with a transport error on expiry.
#[derive(Clone, Debug)]
pub struct IntrospectionRequest<'a> {
	/// Resolved introspection endpoint.
	pub url: &'a Url,
	/// Precomputed `Basic …` header value for the resource credentials.
	pub authorization: &'a str,
	/// Ordered form fields (`access_token`, `scope`, optional `client_id`).
	pub form: &'a [(&'static str, &'a str)],
	/// Optional deadline for the whole exchange.
	pub timeout: Option<Duration>,
}

/// Raw response surfaced by a transport, before any classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireResponse {
	/// HTTP status code returned by the introspection endpoint.
	pub status: u16,
	/// Unparsed response body.
	pub body: Vec<u8>,
}

/// Abstraction over HTTP transports capable of executing the introspection
/// POST.
///
/// Implementations must be `Send + Sync + 'static` so one gate can be shared
/// across in-flight requests without additional wrappers, and the returned
/// future must be `Send` so layer futures inherit the same guarantee.
/// Dropping the future must abort the underlying request; the gate relies on
/// this for caller-side cancellation.
pub trait IntrospectionHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes exactly one form-encoded POST and returns the raw response.
	fn post_form<'a>(&'a self, request: IntrospectionRequest<'a>) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. Introspection requests should not follow redirects; configure any
/// custom [`ReqwestClient`] accordingly before handing it to the gate.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IntrospectionHttpClient for ReqwestHttpClient {
	fn post_form<'a>(&'a self, request: IntrospectionRequest<'a>) -> TransportFuture<'a> {
		Box::pin(async move {
			let mut builder = self
				.0
				.post(request.url.clone())
				.header(AUTHORIZATION, request.authorization)
				// `.form` sets the `application/x-www-form-urlencoded` content type.
				.form(request.form);

			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout.unsigned_abs());
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(WireResponse { status, body })
		})
	}
}
