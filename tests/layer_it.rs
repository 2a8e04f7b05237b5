// std
use std::{
	convert::Infallible,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use http::{Request, Response, header::AUTHORIZATION};
use httpmock::prelude::*;
use tower::{Layer, Service, ServiceExt, service_fn};
// self
use oauth2_gate::{
	config::GateConfig,
	error::{Error, RejectionKind},
	gate::{Gate, ReqwestGate, VerifiedToken},
	layer::GateLayer,
	url::Url,
};

const ACCESS_TOKEN: &str = "0396f91c7703a2060099";

fn build_gate(server: &MockServer) -> ReqwestGate {
	let config = GateConfig::builder()
		.endpoint(
			Url::parse(&server.url("/access"))
				.expect("Mock introspection endpoint should parse successfully."),
		)
		.resource_id("3c")
		.resource_secret("40f8404d3500cc029516")
		.scope("limited")
		.build()
		.expect("Gate configuration should build successfully.");

	Gate::new(config)
}

/// Downstream handler that counts invocations and echoes the attached payload.
fn downstream(
	calls: Arc<AtomicUsize>,
) -> impl Service<Request<String>, Response = Response<String>, Error = Infallible, Future: Send>
+ Clone {
	service_fn(move |request: Request<String>| {
		let calls = calls.clone();

		async move {
			calls.fetch_add(1, Ordering::SeqCst);

			let body = request
				.extensions()
				.get::<VerifiedToken>()
				.map(|verified| verified.as_value().to_string())
				.unwrap_or_default();

			Ok::<_, Infallible>(Response::new(body))
		}
	})
}

fn protected_request(authorization: Option<&str>) -> Request<String> {
	let mut builder = Request::builder().uri("/protected");

	if let Some(value) = authorization {
		builder = builder.header(AUTHORIZATION, value);
	}

	builder.body(String::new()).expect("Test request should build successfully.")
}

#[tokio::test]
async fn verified_requests_reach_the_downstream_handler_once() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/access")
				.body(format!("access_token={ACCESS_TOKEN}&scope=limited"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"authorized\":true}");
		})
		.await;
	let calls = Arc::new(AtomicUsize::new(0));
	let service = GateLayer::new(build_gate(&server)).layer(downstream(calls.clone()));
	let response = service
		.oneshot(protected_request(Some(&format!("Bearer {ACCESS_TOKEN}"))))
		.await
		.expect("Verified request should reach the downstream handler.");

	assert_eq!(response.body(), "{\"authorized\":true}");
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_requests_resolve_to_the_typed_error_without_continuing() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access");
			then.status(400).header("content-type", "application/json").body(
				"{\"error\":\"invalid_request\",\"error_description\":\"Unknown access token\"}",
			);
		})
		.await;
	let calls = Arc::new(AtomicUsize::new(0));
	let service = GateLayer::new(build_gate(&server)).layer(downstream(calls.clone()));
	let boxed = service
		.oneshot(protected_request(Some("Bearer unknown")))
		.await
		.expect_err("Rejected request must resolve to an error.");
	let error = boxed
		.downcast_ref::<Error>()
		.expect("Layer errors should downcast to the gate's typed error.");
	let rejection = error.rejection().expect("Unknown token should yield a typed rejection.");

	assert_eq!(rejection.kind, RejectionKind::InvalidRequest);
	assert_eq!(rejection.description, "Unknown access token");
	assert_eq!(rejection.status_code(), 400);
	assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_header_is_rejected_without_any_network_call() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let calls = Arc::new(AtomicUsize::new(0));
	let service = GateLayer::new(build_gate(&server)).layer(downstream(calls.clone()));
	let boxed = service
		.oneshot(protected_request(None))
		.await
		.expect_err("A request without a token must resolve to an error.");
	let error = boxed
		.downcast_ref::<Error>()
		.expect("Layer errors should downcast to the gate's typed error.");
	let rejection = error.rejection().expect("Missing token should yield a typed rejection.");

	assert_eq!(rejection.description, "Missing access token");
	assert_eq!(calls.load(Ordering::SeqCst), 0);

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn aborted_requests_never_attach_or_continue() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"authorized\":true}")
				.delay(std::time::Duration::from_millis(500));
		})
		.await;
	let calls = Arc::new(AtomicUsize::new(0));
	let service = GateLayer::new(build_gate(&server)).layer(downstream(calls.clone()));
	// Dropping the response future mid-introspection models the originating
	// connection aborting before the authorization server answers.
	let aborted = tokio::time::timeout(
		std::time::Duration::from_millis(50),
		service.oneshot(protected_request(Some(&format!("Bearer {ACCESS_TOKEN}")))),
	)
	.await;

	assert!(aborted.is_err(), "The verification future should have been dropped.");

	tokio::time::sleep(std::time::Duration::from_millis(600)).await;

	assert_eq!(calls.load(Ordering::SeqCst), 0, "Downstream must never run after an abort.");
}
