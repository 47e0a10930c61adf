//! Decoded Polaris replies and vendor value formats.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::DecodeError, http::WireResponse};

/// Decoded JSON reply from a Polaris endpoint, preserving the vendor's key order.
///
/// Polaris signals application-level failures inside an otherwise-successful 2xx reply through
/// `PAPIErrorCode`/`ErrorMessage`. The accessors surface those fields without interpreting
/// them; branching on the code stays with the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct PapiResponse {
	status: u16,
	body: Map<String, Value>,
}
impl PapiResponse {
	/// Decodes a raw transport reply into an ordered mapping.
	pub(crate) fn from_wire(reply: WireResponse) -> Result<Self, DecodeError> {
		let mut deserializer = serde_json::Deserializer::from_slice(&reply.body);
		let body = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError::Json { source, status: reply.status })?;

		Ok(Self { status: reply.status, body })
	}

	/// HTTP status code of the reply.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Vendor application-level status code (`PAPIErrorCode`), when present.
	pub fn error_code(&self) -> Option<i64> {
		self.body.get("PAPIErrorCode").and_then(Value::as_i64)
	}

	/// Vendor error message (`ErrorMessage`), when present and non-null.
	pub fn error_message(&self) -> Option<&str> {
		self.body.get("ErrorMessage").and_then(Value::as_str)
	}

	/// Maps the reply body onto a typed structure; `operation` labels the decode failure.
	pub fn deserialize<T>(&self, operation: &'static str) -> Result<T, DecodeError>
	where
		T: serde::de::DeserializeOwned,
	{
		serde_path_to_error::deserialize(Value::Object(self.body.clone()))
			.map_err(|source| DecodeError::Shape { operation, source })
	}

	/// Consumes the wrapper, yielding the raw ordered mapping.
	pub fn into_inner(self) -> Map<String, Value> {
		self.body
	}
}
impl Deref for PapiResponse {
	type Target = Map<String, Value>;

	fn deref(&self) -> &Self::Target {
		&self.body
	}
}

/// Parses the vendor's `/Date(<ms>[±zzzz])/` timestamp form into an instant.
///
/// The optional zone suffix is ignored; the leading digits are already a UTC epoch offset in
/// milliseconds.
pub fn parse_vendor_timestamp(raw: &str) -> Result<OffsetDateTime, DecodeError> {
	let timestamp = || DecodeError::Timestamp { raw: raw.to_owned() };
	let digits = raw
		.strip_prefix("/Date(")
		.and_then(|rest| rest.strip_suffix(")/"))
		.map(|inner| inner.chars().take_while(char::is_ascii_digit).collect::<String>())
		.filter(|digits| !digits.is_empty())
		.ok_or_else(timestamp)?;
	let millis = digits.parse::<i128>().map_err(|_| timestamp())?;

	OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000).map_err(|_| timestamp())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn decoded(body: &str) -> PapiResponse {
		PapiResponse::from_wire(WireResponse { status: 200, body: body.as_bytes().to_vec() })
			.expect("Reply fixture should decode successfully.")
	}

	#[test]
	fn vendor_fields_surface_without_interpretation() {
		let reply = decoded("{\"PAPIErrorCode\":-3001,\"ErrorMessage\":\"Invalid barcode.\"}");

		assert_eq!(reply.status(), 200);
		assert_eq!(reply.error_code(), Some(-3001));
		assert_eq!(reply.error_message(), Some("Invalid barcode."));
	}

	#[test]
	fn null_error_message_reads_as_absent() {
		let reply = decoded("{\"PAPIErrorCode\":0,\"ErrorMessage\":null}");

		assert_eq!(reply.error_code(), Some(0));
		assert_eq!(reply.error_message(), None);
	}

	#[test]
	fn non_object_bodies_are_decode_errors() {
		let err =
			PapiResponse::from_wire(WireResponse { status: 200, body: b"not json".to_vec() })
				.expect_err("Non-JSON bodies should fail to decode.");

		assert!(matches!(err, DecodeError::Json { status: 200, .. }));

		let err = PapiResponse::from_wire(WireResponse { status: 200, body: b"[1,2]".to_vec() })
			.expect_err("JSON arrays should fail to decode as reply objects.");

		assert!(matches!(err, DecodeError::Json { .. }));
	}

	#[test]
	fn vendor_timestamps_parse_with_and_without_zone_suffix() {
		let plain = parse_vendor_timestamp("/Date(1700000000000)/")
			.expect("Plain vendor timestamp should parse.");
		let zoned = parse_vendor_timestamp("/Date(1700000000000-0500)/")
			.expect("Zoned vendor timestamp should parse.");

		assert_eq!(plain.unix_timestamp(), 1_700_000_000);
		assert_eq!(zoned, plain);
	}

	#[test]
	fn malformed_vendor_timestamps_are_rejected() {
		for raw in ["", "Date(1)", "/Date()/", "/Date(abc)/", "/Date(12"] {
			assert!(
				parse_vendor_timestamp(raw).is_err(),
				"Raw value {raw:?} should be rejected.",
			);
		}
	}
}
