//! Pure signing helpers for the Polaris `PWS` authorization scheme.
//!
//! Polaris authenticates every request with a Base64-encoded HMAC-SHA1 digest over the
//! concatenation of the HTTP method, the full request URI, the `PolarisDate` timestamp, and
//! (for patron- or staff-authenticated calls) the session access secret. Everything here is
//! deterministic for fixed inputs; [`crate::request::PapiRequest::execute`] computes the
//! timestamp once and feeds the identical string to both the signature and the header.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha1::Sha1;
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::_prelude::*;

type HmacSha1 = Hmac<Sha1>;

/// Wire layout of the `PolarisDate` header, e.g. `Wed, 15 Nov 2023 14:22:01 GMT`.
const POLARIS_DATE: &[BorrowedFormatItem<'static>] = format_description!(
	"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Errors raised while producing an authorization signature.
#[derive(Debug, ThisError)]
pub enum SignatureError {
	/// Signing key was rejected by the HMAC implementation.
	#[error("Signing key was rejected by the HMAC implementation.")]
	Key(#[from] InvalidLength),
	/// Timestamp could not be rendered in the vendor wire format.
	#[error("Timestamp could not be rendered in the vendor wire format.")]
	Timestamp(#[from] time::error::Format),
}

macro_rules! def_secret {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[doc = ""]
		#[doc = "`Debug` and `Display` render `<redacted>` so the material never reaches logs."]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl From<String> for $name {
			fn from(value: String) -> Self {
				Self(value)
			}
		}
		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self(value.to_owned())
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple($kind).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! {
	SharedSecret,
	"HMAC signing key issued alongside the Polaris API access identifier.",
	"SharedSecret"
}
def_secret! {
	AccessSecret,
	"Patron or staff session secret returned by an authenticator endpoint.",
	"AccessSecret"
}

/// Formats an instant as the Polaris wire timestamp.
pub fn polaris_date(moment: OffsetDateTime) -> Result<String, SignatureError> {
	Ok(moment.format(POLARIS_DATE)?)
}

/// Computes the Base64 HMAC-SHA1 signature over method, URI, timestamp, and optional secret.
///
/// The inputs are concatenated without separators, matching the vendor's signing recipe.
pub fn signature(
	key: &SharedSecret,
	method: &str,
	uri: &str,
	date: &str,
	access_secret: Option<&AccessSecret>,
) -> Result<String, SignatureError> {
	let mut mac = HmacSha1::new_from_slice(key.expose().as_bytes())?;

	mac.update(method.as_bytes());
	mac.update(uri.as_bytes());
	mac.update(date.as_bytes());

	if let Some(secret) = access_secret {
		mac.update(secret.expose().as_bytes());
	}

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Builds the `Authorization` header value from the access identifier and signature.
pub fn authorization(access_id: &str, signature: &str) -> String {
	format!("PWS {access_id}:{signature}")
}
