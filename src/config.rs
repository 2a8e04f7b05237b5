//! Immutable gate configuration: resource credentials, introspection target, scope.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::ConfigError};

/// Fixed path suffix appended to a provider base URL to reach its
/// introspection endpoint.
pub const PROVIDER_ACCESS_SUFFIX: &str = "/access";

/// Redacted resource secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ResourceSecret(String);
impl ResourceSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for ResourceSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ResourceSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ResourceSecret").field(&"<redacted>").finish()
	}
}
impl Display for ResourceSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Identity this resource server presents to the authorization server.
///
/// Both fields are validated non-empty at construction and never change for
/// the lifetime of a configured gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceCredentials {
	/// Resource identifier used as the Basic auth username.
	pub id: String,
	/// Resource secret used as the Basic auth password.
	pub secret: ResourceSecret,
}
impl ResourceCredentials {
	/// Creates validated credentials from an id + secret pair.
	pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Result<Self, ConfigError> {
		let id = id.into();
		let secret = secret.into();

		if id.trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "resource_id" });
		}
		if secret.trim().is_empty() {
			return Err(ConfigError::EmptyCredential { field: "resource_secret" });
		}

		Ok(Self { id, secret: ResourceSecret::new(secret) })
	}

	/// Computes the `Authorization: Basic base64(id ":" secret)` header value.
	pub fn basic_authorization(&self) -> String {
		format!("Basic {}", STANDARD.encode(format!("{}:{}", self.id, self.secret.expose())))
	}
}

/// Where introspection requests are sent; a configuration-time choice, not a
/// per-request one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntrospectionTarget {
	/// A single fixed introspection endpoint URL.
	Endpoint(Url),
	/// A provider base URL; the fixed [`PROVIDER_ACCESS_SUFFIX`] is appended.
	Provider(Url),
}
impl IntrospectionTarget {
	/// Resolves the effective endpoint URL for the target.
	pub fn endpoint_url(&self) -> Url {
		match self {
			Self::Endpoint(url) => url.clone(),
			Self::Provider(base) => {
				let mut url = base.clone();
				let path =
					format!("{}{PROVIDER_ACCESS_SUFFIX}", base.path().trim_end_matches('/'));

				url.set_path(&path);

				url
			},
		}
	}
}

/// Immutable configuration injected into a gate at construction.
///
/// The recognized option set consolidates the `resource_*`/`service_*` +
/// endpoint/provider configuration variants into one builder; the resolved
/// endpoint is computed once at build time.
#[derive(Clone, Debug)]
pub struct GateConfig {
	/// Credentials for Basic auth against the authorization server.
	pub credentials: ResourceCredentials,
	/// Resolved introspection endpoint URL.
	pub endpoint: Url,
	/// Scope required for the protected resource.
	pub scope: String,
	/// Optional client identifier carried in the introspected field set.
	pub client_id: Option<String>,
	/// Optional deadline for the introspection call; expiry surfaces as a
	/// transport failure.
	pub timeout: Option<Duration>,
}
impl GateConfig {
	/// Starts a new configuration builder.
	pub fn builder() -> GateConfigBuilder {
		GateConfigBuilder::default()
	}
}

/// Builder for [`GateConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct GateConfigBuilder {
	/// Fixed introspection endpoint; mutually exclusive with `provider`.
	pub endpoint: Option<Url>,
	/// Provider base URL; mutually exclusive with `endpoint`.
	pub provider: Option<Url>,
	/// Resource identifier for Basic auth.
	pub resource_id: Option<String>,
	/// Resource secret for Basic auth.
	pub resource_secret: Option<String>,
	/// Scope required for the protected resource.
	pub scope: Option<String>,
	/// Optional client identifier included in the form body.
	pub client_id: Option<String>,
	/// Optional introspection deadline.
	pub timeout: Option<Duration>,
}
impl GateConfigBuilder {
	/// Sets the fixed introspection endpoint URL.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Sets the provider base URL the access suffix is appended to.
	pub fn provider(mut self, url: Url) -> Self {
		self.provider = Some(url);

		self
	}

	/// Sets the resource identifier.
	pub fn resource_id(mut self, id: impl Into<String>) -> Self {
		self.resource_id = Some(id.into());

		self
	}

	/// Sets the resource secret.
	pub fn resource_secret(mut self, secret: impl Into<String>) -> Self {
		self.resource_secret = Some(secret.into());

		self
	}

	/// Sets the required scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Includes a client identifier in the introspected field set.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Imposes a deadline on the introspection call.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Validates the options and produces an immutable [`GateConfig`].
	pub fn build(self) -> Result<GateConfig, ConfigError> {
		let target = match (self.endpoint, self.provider) {
			(Some(_), Some(_)) => return Err(ConfigError::ConflictingTarget),
			(Some(endpoint), None) => IntrospectionTarget::Endpoint(endpoint),
			(None, Some(provider)) => IntrospectionTarget::Provider(provider),
			(None, None) => return Err(ConfigError::MissingTarget),
		};
		let credentials = ResourceCredentials::new(
			self.resource_id.unwrap_or_default(),
			self.resource_secret.unwrap_or_default(),
		)?;
		let scope = self.scope.unwrap_or_default();

		if scope.trim().is_empty() {
			return Err(ConfigError::EmptyScope);
		}

		Ok(GateConfig {
			credentials,
			endpoint: target.endpoint_url(),
			scope,
			client_id: self.client_id,
			timeout: self.timeout,
		})
	}
}
