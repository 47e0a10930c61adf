//! Client-level error types shared across configuration, signing, transport, and decoding.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Vendor application-level failures (`PAPIErrorCode != 0` inside a 2xx reply) are **not**
/// errors; they are returned as data on [`crate::response::PapiResponse`] for the caller to
/// branch on.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authorization signature could not be produced.
	#[error(transparent)]
	Signature(#[from] crate::sign::SignatureError),
	/// Transport failure (DNS, TCP, TLS, non-2xx status). Never retried.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A 2xx reply whose body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URI is missing for the named scope.
	#[error("The {scope} base URI is required.")]
	MissingBaseUri {
		/// Scope label (public or protected).
		scope: &'static str,
	},
	/// Base URI uses a scheme other than http/https.
	#[error("The {scope} base URI must use http or https: {url}.")]
	UnsupportedScheme {
		/// Scope label (public or protected).
		scope: &'static str,
		/// Offending URI.
		url: String,
	},
	/// Endpoint suffixes are concatenated directly, so the base URI must end with `/`.
	#[error("The {scope} base URI must end with a trailing slash: {url}.")]
	MissingTrailingSlash {
		/// Scope label (public or protected).
		scope: &'static str,
		/// Offending URI.
		url: String,
	},
	/// Access identifier is empty.
	#[error("The API access identifier must not be empty.")]
	EmptyAccessId,
	/// Required environment variable is missing or empty.
	#[error("Environment variable `{name}` is missing or empty.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds a non-integer identifier.
	#[error("Environment variable `{name}` could not be parsed as an integer.")]
	InvalidEnvInt {
		/// Variable name.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: std::num::ParseIntError,
	},
	/// Environment variable holds an unparsable URL.
	#[error("Environment variable `{name}` could not be parsed as a URL.")]
	InvalidEnvUrl {
		/// Variable name.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Resolved request URL failed to parse.
	#[error("Request URL could not be parsed: {url}.")]
	InvalidRequestUrl {
		/// Concatenated URL that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Staff operations require configured staff credentials.
	#[error("Staff credentials are not configured.")]
	MissingStaffCredentials,
}

/// Transport-level failures (network, request construction, unexpected status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Polaris endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The wire request could not be constructed for the transport.
	#[error("HTTP request could not be constructed.")]
	Request {
		/// Underlying construction failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint replied with a non-success status.
	#[error("Polaris endpoint returned HTTP status {status}.")]
	Status {
		/// HTTP status code outside the 2xx range.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a request-construction failure.
	pub fn request(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Request { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Decoding failures for 2xx replies.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not a valid JSON object.
	#[error("Polaris endpoint returned a malformed JSON body.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the reply.
		status: u16,
	},
	/// Reply body does not match the shape a typed operation expects.
	#[error("Polaris reply did not match the expected {operation} shape.")]
	Shape {
		/// Operation label (endpoint suffix).
		operation: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Vendor timestamp (`/Date(<ms>)/`) could not be parsed.
	#[error("Vendor timestamp could not be parsed: {raw}.")]
	Timestamp {
		/// Raw wire value.
		raw: String,
	},
}
