//! Client configuration with an explicit, validating builder.
//!
//! Credentials and endpoint bases are passed to [`crate::client::PapiClient`] as a value
//! instead of being resolved from ambient process state, keeping request construction
//! deterministic and testable. [`PapiConfig::from_env`] exists for deployments that keep the
//! `PAPI_*` variables in the environment.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError, sign::SharedSecret};

/// Staff domain credentials consumed by the protected-scope authenticator.
#[derive(Clone)]
pub struct StaffCredentials {
	/// Windows domain the staff account belongs to.
	pub domain: String,
	/// Staff account name.
	pub username: String,
	/// Staff account password.
	pub password: String,
}
impl Debug for StaffCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StaffCredentials")
			.field("domain", &self.domain)
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Resolved client configuration shared by every request builder.
#[derive(Clone, Debug)]
pub struct PapiConfig {
	/// API access identifier included in every `PWS` authorization value.
	pub access_id: String,
	/// Shared HMAC signing key issued with the access identifier.
	pub access_key: SharedSecret,
	/// Base URI for public endpoints; always ends with `/`.
	pub public_base: Url,
	/// Base URI for protected endpoints; always ends with `/`.
	pub protected_base: Url,
	/// Default `LogonWorkstationID` injected into every request body.
	pub workstation_id: u32,
	/// Default `PatronBranchID` injected into every request body.
	pub branch_id: u32,
	/// Optional staff credentials for [`crate::client::PapiClient::authorize_staff`].
	pub staff: Option<StaffCredentials>,
}
impl PapiConfig {
	/// Creates a builder seeded with the signing credentials.
	pub fn builder(
		access_id: impl Into<String>,
		access_key: impl Into<SharedSecret>,
	) -> PapiConfigBuilder {
		PapiConfigBuilder::new(access_id, access_key)
	}

	/// Resolves configuration from the `PAPI_*` environment variables.
	///
	/// Required: `PAPI_ACCESS_ID`, `PAPI_ACCESS_KEY`, `PAPI_PUBLIC_URI`, `PAPI_PROTECTED_URI`.
	/// Optional: `PAPI_LOGONWORKSTATIONID`, `PAPI_LOGONBRANCHID` (default `1`), and the staff
	/// triple `PAPI_DOMAIN`/`PAPI_STAFF`/`PAPI_PASSWORD`, honored only when all three are set.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder(required_env("PAPI_ACCESS_ID")?, required_env("PAPI_ACCESS_KEY")?)
			.public_base(env_url("PAPI_PUBLIC_URI")?)
			.protected_base(env_url("PAPI_PROTECTED_URI")?);

		if let Some(id) = env_u32("PAPI_LOGONWORKSTATIONID")? {
			builder = builder.workstation_id(id);
		}
		if let Some(id) = env_u32("PAPI_LOGONBRANCHID")? {
			builder = builder.branch_id(id);
		}
		if let (Some(domain), Some(username), Some(password)) =
			(optional_env("PAPI_DOMAIN"), optional_env("PAPI_STAFF"), optional_env("PAPI_PASSWORD"))
		{
			builder = builder.staff_credentials(StaffCredentials { domain, username, password });
		}

		builder.build()
	}
}

/// Builder for [`PapiConfig`] values.
#[derive(Debug)]
pub struct PapiConfigBuilder {
	/// API access identifier being configured.
	pub access_id: String,
	/// Shared HMAC signing key being configured.
	pub access_key: SharedSecret,
	/// Public base URI (required).
	pub public_base: Option<Url>,
	/// Protected base URI (required).
	pub protected_base: Option<Url>,
	/// Default workstation identifier.
	pub workstation_id: u32,
	/// Default branch identifier.
	pub branch_id: u32,
	/// Optional staff credentials.
	pub staff: Option<StaffCredentials>,
}
impl PapiConfigBuilder {
	/// Creates a new builder seeded with the signing credentials.
	pub fn new(access_id: impl Into<String>, access_key: impl Into<SharedSecret>) -> Self {
		Self {
			access_id: access_id.into(),
			access_key: access_key.into(),
			public_base: None,
			protected_base: None,
			workstation_id: 1,
			branch_id: 1,
			staff: None,
		}
	}

	/// Sets the public base URI.
	pub fn public_base(mut self, url: Url) -> Self {
		self.public_base = Some(url);

		self
	}

	/// Sets the protected base URI.
	pub fn protected_base(mut self, url: Url) -> Self {
		self.protected_base = Some(url);

		self
	}

	/// Overrides the default `LogonWorkstationID` (defaults to `1`).
	pub fn workstation_id(mut self, id: u32) -> Self {
		self.workstation_id = id;

		self
	}

	/// Overrides the default `PatronBranchID` (defaults to `1`).
	pub fn branch_id(mut self, id: u32) -> Self {
		self.branch_id = id;

		self
	}

	/// Attaches staff credentials for protected-scope authorization.
	pub fn staff_credentials(mut self, staff: StaffCredentials) -> Self {
		self.staff = Some(staff);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<PapiConfig, ConfigError> {
		if self.access_id.is_empty() {
			return Err(ConfigError::EmptyAccessId);
		}

		let public_base =
			self.public_base.ok_or(ConfigError::MissingBaseUri { scope: "public" })?;
		let protected_base =
			self.protected_base.ok_or(ConfigError::MissingBaseUri { scope: "protected" })?;

		validate_base("public", &public_base)?;
		validate_base("protected", &protected_base)?;

		Ok(PapiConfig {
			access_id: self.access_id,
			access_key: self.access_key,
			public_base,
			protected_base,
			workstation_id: self.workstation_id,
			branch_id: self.branch_id,
			staff: self.staff,
		})
	}
}

fn validate_base(scope: &'static str, url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { scope, url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		return Err(ConfigError::MissingTrailingSlash { scope, url: url.to_string() });
	}

	Ok(())
}

fn optional_env(name: &'static str) -> Option<String> {
	env::var(name).ok().filter(|value| !value.is_empty())
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
	optional_env(name).ok_or(ConfigError::MissingEnv { name })
}

fn env_url(name: &'static str) -> Result<Url, ConfigError> {
	Url::parse(&required_env(name)?).map_err(|source| ConfigError::InvalidEnvUrl { name, source })
}

fn env_u32(name: &'static str) -> Result<Option<u32>, ConfigError> {
	optional_env(name)
		.map(|value| value.parse().map_err(|source| ConfigError::InvalidEnvInt { name, source }))
		.transpose()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse configuration fixture URL.")
	}

	#[test]
	fn builder_requires_both_base_uris() {
		let err = PapiConfig::builder("test-access-id", "test-access-key")
			.protected_base(url("https://catalog.example.org/protected/v1/1033/100/1/"))
			.build()
			.expect_err("Builder should reject a missing public base URI.");

		assert!(matches!(err, ConfigError::MissingBaseUri { scope: "public" }));
	}

	#[test]
	fn builder_rejects_non_http_schemes() {
		let err = PapiConfig::builder("test-access-id", "test-access-key")
			.public_base(url("ftp://catalog.example.org/public/v1/1033/100/1/"))
			.protected_base(url("https://catalog.example.org/protected/v1/1033/100/1/"))
			.build()
			.expect_err("Builder should reject non-HTTP schemes.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { scope: "public", .. }));
	}

	#[test]
	fn builder_rejects_bases_without_trailing_slash() {
		let err = PapiConfig::builder("test-access-id", "test-access-key")
			.public_base(url("https://catalog.example.org/public/v1/1033/100/1"))
			.protected_base(url("https://catalog.example.org/protected/v1/1033/100/1/"))
			.build()
			.expect_err("Builder should reject a base URI without a trailing slash.");

		assert!(matches!(err, ConfigError::MissingTrailingSlash { scope: "public", .. }));
	}

	#[test]
	fn builder_rejects_an_empty_access_id() {
		let err = PapiConfig::builder("", "test-access-key")
			.public_base(url("https://catalog.example.org/public/v1/1033/100/1/"))
			.protected_base(url("https://catalog.example.org/protected/v1/1033/100/1/"))
			.build()
			.expect_err("Builder should reject an empty access identifier.");

		assert!(matches!(err, ConfigError::EmptyAccessId));
	}

	#[test]
	fn builder_applies_identifier_defaults() {
		let config = PapiConfig::builder("test-access-id", "test-access-key")
			.public_base(url("https://catalog.example.org/public/v1/1033/100/1/"))
			.protected_base(url("https://catalog.example.org/protected/v1/1033/100/1/"))
			.build()
			.expect("Builder should succeed for a complete configuration.");

		assert_eq!(config.workstation_id, 1);
		assert_eq!(config.branch_id, 1);
		assert!(config.staff.is_none());
	}

	#[test]
	fn staff_credentials_redact_the_password() {
		let staff = StaffCredentials {
			domain: "TESTDOMAIN".into(),
			username: "test-staff".into(),
			password: "test-password".into(),
		};
		let rendered = format!("{staff:?}");

		assert!(rendered.contains("TESTDOMAIN"));
		assert!(!rendered.contains("test-password"));
	}
}
