//! Transport primitives for Polaris round trips.
//!
//! [`PapiTransport`] is the crate's only seam to an HTTP stack. Implementations receive a fully
//! signed [`WireRequest`] and must perform exactly one round trip: no retries, no added timeout,
//! and no redirect handling beyond the stack's defaults. Status classification and JSON decoding
//! happen above the trait in [`crate::request::PapiRequest::execute`], so a transport reports a
//! non-2xx reply as an ordinary [`WireResponse`].

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`PapiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<WireResponse, TransportError>> + 'a + Send>>;

/// Fully resolved request handed to the transport: final URL, signed headers, JSON body.
#[derive(Clone, Debug)]
pub struct WireRequest {
	/// Upper-cased HTTP verb; forwarded without legality validation.
	pub method: String,
	/// Final request URL (scope base + optional patron segment + endpoint suffix).
	pub url: Url,
	/// Header name/value pairs, already signed.
	pub headers: Vec<(String, String)>,
	/// JSON-encoded body.
	pub body: String,
}
impl WireRequest {
	/// Returns the first header value with the given name, if present.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw reply captured from the transport before status classification and decoding.
#[derive(Clone, Debug)]
pub struct WireResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}

/// Abstraction over HTTP stacks capable of executing signed Polaris requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared across
/// client handles behind `Arc<T>` without additional wrappers; the returned future must be
/// `Send` so callers can box request futures freely.
pub trait PapiTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs one round trip for the fully built request.
	fn execute(&self, request: WireRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapper sets `Content-Type: application/json` for the body it ships and otherwise
/// forwards the signed header set untouched. Configure any custom [`ReqwestClient`] before
/// wrapping it; the client's defaults govern timeouts and TLS.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl PapiTransport for ReqwestTransport {
	fn execute(&self, request: WireRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method =
				Method::from_bytes(request.method.as_bytes()).map_err(TransportError::request)?;
			let mut headers = HeaderMap::new();

			headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

			for (name, value) in &request.headers {
				let name =
					HeaderName::from_bytes(name.as_bytes()).map_err(TransportError::request)?;
				let value = HeaderValue::from_str(value).map_err(TransportError::request)?;

				headers.insert(name, value);
			}

			let response = client
				.request(method, request.url)
				.headers(headers)
				.body(request.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(WireResponse { status, body })
		})
	}
}

/// Transport stub that records every wire request and replays canned replies.
///
/// Queued replies are consumed in order; once drained, a vendor-success reply
/// (`{"PAPIErrorCode":0}`) is returned so chained calls keep flowing.
#[cfg(any(test, feature = "test"))]
#[derive(Default)]
pub struct CaptureTransport {
	requests: parking_lot::Mutex<Vec<WireRequest>>,
	replies: parking_lot::Mutex<std::collections::VecDeque<WireResponse>>,
}
#[cfg(any(test, feature = "test"))]
impl CaptureTransport {
	/// Queues a canned reply for the next [`PapiTransport::execute`] call.
	pub fn push_reply(&self, status: u16, body: impl Into<Vec<u8>>) {
		self.replies.lock().push_back(WireResponse { status, body: body.into() });
	}

	/// Returns the wire requests captured so far.
	pub fn captured(&self) -> Vec<WireRequest> {
		self.requests.lock().clone()
	}
}
#[cfg(any(test, feature = "test"))]
impl PapiTransport for CaptureTransport {
	fn execute(&self, request: WireRequest) -> TransportFuture<'_> {
		self.requests.lock().push(request);

		let reply = self.replies.lock().pop_front().unwrap_or_else(|| WireResponse {
			status: 200,
			body: b"{\"PAPIErrorCode\":0,\"ErrorMessage\":null}".to_vec(),
		});

		Box::pin(async move { Ok(reply) })
	}
}
