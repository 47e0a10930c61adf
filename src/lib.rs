//! Async client for the Polaris (PAPI) library-system REST API—fluent HMAC-signed requests,
//! patron and staff authentication, and transport-aware observability in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod request;
pub mod response;
pub mod sign;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::config::{PapiConfig, StaffCredentials};
	#[cfg(feature = "reqwest")]
	use crate::{client::PapiClient, http::ReqwestTransport};

	#[cfg(feature = "reqwest")]
	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = PapiClient<ReqwestTransport>;

	/// Builds a configuration whose public and protected scopes both live under `base`,
	/// mirroring the URI layout of a real Polaris installation.
	pub fn test_config(base: &str) -> PapiConfig {
		PapiConfig::builder("test-access-id", "test-access-key")
			.public_base(
				Url::parse(&format!("{base}/PAPIService/REST/public/v1/1033/100/1/"))
					.expect("Failed to parse public base URI for tests."),
			)
			.protected_base(
				Url::parse(&format!("{base}/PAPIService/REST/protected/v1/1033/100/1/"))
					.expect("Failed to parse protected base URI for tests."),
			)
			.staff_credentials(StaffCredentials {
				domain: "TESTDOMAIN".into(),
				username: "test-staff".into(),
				password: "test-password".into(),
			})
			.build()
			.expect("Failed to build test configuration.")
	}

	#[cfg(feature = "reqwest")]
	/// Constructs a [`PapiClient`] over the default reqwest transport pointed at `base`.
	pub fn build_reqwest_test_client(base: &str) -> ReqwestTestClient {
		PapiClient::new(test_config(base))
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
