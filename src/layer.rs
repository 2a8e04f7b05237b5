//! Tower layer surfacing the gate to a hosting HTTP framework.
//!
//! The service never writes an HTTP response. On a verified outcome it
//! attaches the [`VerifiedToken`](crate::gate::VerifiedToken) to the
//! request's extensions and delegates
//! to the inner service; on any failure it resolves to the typed
//! [`crate::error::Error`] (boxed) so an outer error-handling collaborator
//! can render it. Dropping the response future aborts an in-flight
//! introspection call: no payload is attached and the inner service is never
//! invoked.

// std
use std::task::{Context, Poll};
// crates.io
use http::{Request, header::AUTHORIZATION};
use tower::{BoxError, Layer, Service};
// self
use crate::{_prelude::*, gate::Gate, http::IntrospectionHttpClient};

/// Layer wrapping an inner service with bearer-token verification.
pub struct GateLayer<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	gate: Gate<C>,
}
impl<C> GateLayer<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	/// Creates a layer from a configured gate.
	pub fn new(gate: Gate<C>) -> Self {
		Self { gate }
	}
}
impl<C> Clone for GateLayer<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	fn clone(&self) -> Self {
		Self { gate: self.gate.clone() }
	}
}
impl<C> Debug for GateLayer<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GateLayer").field("gate", &self.gate).finish()
	}
}
impl<S, C> Layer<S> for GateLayer<C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	type Service = GateService<S, C>;

	fn layer(&self, inner: S) -> Self::Service {
		GateService { gate: self.gate.clone(), inner }
	}
}

/// Service produced by [`GateLayer`].
pub struct GateService<S, C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	gate: Gate<C>,
	inner: S,
}
impl<S, C> Clone for GateService<S, C>
where
	S: Clone,
	C: ?Sized + IntrospectionHttpClient,
{
	fn clone(&self) -> Self {
		Self { gate: self.gate.clone(), inner: self.inner.clone() }
	}
}
impl<S, C> Debug for GateService<S, C>
where
	C: ?Sized + IntrospectionHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GateService").field("gate", &self.gate).finish()
	}
}
impl<S, B, C> Service<Request<B>> for GateService<S, C>
where
	S: Service<Request<B>> + Clone + Send + 'static,
	S::Future: Send,
	S::Error: Into<BoxError>,
	B: Send + 'static,
	C: ?Sized + IntrospectionHttpClient,
{
	type Error = BoxError;
	type Future = Pin<Box<dyn Future<Output = Result<S::Response, BoxError>> + Send>>;
	type Response = S::Response;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx).map_err(Into::into)
	}

	fn call(&mut self, mut request: Request<B>) -> Self::Future {
		let gate = self.gate.clone();
		// Take the service that was driven to readiness and leave the clone
		// for the next call.
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move {
			let authorization = request
				.headers()
				.get(AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let verified =
				gate.verify(authorization.as_deref()).await.map_err(BoxError::from)?;

			request.extensions_mut().insert(verified);

			inner.call(request).await.map_err(Into::into)
		})
	}
}
