//! Resource-server gate for OAuth 2.0 bearer tokens—header extraction,
//! Basic-authenticated introspection, and typed rejections behind one
//! tower-ready layer.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod bearer;
pub mod config;
pub mod error;
pub mod ext;
pub mod gate;
pub mod http;
pub mod introspect;
pub mod layer;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{config::GateConfig, gate::Gate, http::ReqwestHttpClient};

	/// Gate type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGate = Gate<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Gate`] backed by the reqwest transport used across integration tests.
	pub fn build_reqwest_test_gate(config: GateConfig) -> ReqwestTestGate {
		Gate::with_http_client(config, test_reqwest_http_client())
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _, tokio as _};
