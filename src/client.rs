//! Client handle owning configuration and transport, plus the vendor's authenticator
//! operations (API-key validation, patron authentication, staff authorization with cached
//! session reuse).

// self
use crate::{
	_prelude::*,
	config::PapiConfig,
	error::ConfigError,
	http::PapiTransport,
	request::PapiRequest,
	response::{self, PapiResponse},
	sign::AccessSecret,
};
#[cfg(feature = "reqwest")]
use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestPapiClient = PapiClient<ReqwestTransport>;

/// Staff session issued by `POST authenticator/staff` on the protected scope.
#[derive(Clone, Debug)]
pub struct StaffSession {
	/// Token the vendor embeds into protected endpoint paths.
	pub access_token: String,
	/// Secret fed into the signature of staff-authenticated requests.
	pub access_secret: AccessSecret,
	/// Instant the vendor expires this session.
	pub expires_at: OffsetDateTime,
}
impl StaffSession {
	/// Returns whether the session is still valid at `now`.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Patron session issued by `POST authenticator/patron`.
#[derive(Clone, Debug)]
pub struct PatronSession {
	/// Vendor-assigned patron identifier, when reported.
	pub patron_id: Option<i64>,
	/// Secret fed into the signature of patron-authenticated requests.
	pub access_secret: AccessSecret,
	/// Instant the vendor expires this session, when reported.
	pub expires_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
struct StaffAuthReply {
	#[serde(rename = "AccessToken")]
	access_token: String,
	#[serde(rename = "AccessSecret")]
	access_secret: AccessSecret,
	#[serde(rename = "AuthExpDate")]
	auth_exp_date: String,
}

#[derive(Debug, Deserialize)]
struct PatronAuthReply {
	#[serde(rename = "PatronID")]
	patron_id: Option<i64>,
	#[serde(rename = "AccessSecret")]
	access_secret: AccessSecret,
	#[serde(rename = "AuthExpDate")]
	auth_exp_date: Option<String>,
}

/// Polaris API client: owns the configuration and transport and mints one single-use
/// [`PapiRequest`] per logical request.
pub struct PapiClient<T>
where
	T: ?Sized + PapiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Resolved configuration shared by every builder.
	pub config: Arc<PapiConfig>,
	staff_session: Arc<RwLock<Option<StaffSession>>>,
}
impl<T> PapiClient<T>
where
	T: ?Sized + PapiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: PapiConfig, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			config: Arc::new(config),
			staff_session: Default::default(),
		}
	}

	/// Mints a fresh single-use request builder.
	pub fn request(&self) -> PapiRequest<T> {
		PapiRequest::new(Arc::clone(&self.transport), Arc::clone(&self.config))
	}

	/// Validates the configured API credentials: `GET apikeyvalidate` on the public scope.
	pub async fn validate_api_key(&self) -> Result<PapiResponse> {
		self.request().method("GET").path("apikeyvalidate").execute().await
	}

	/// Authenticates a patron barcode/password pair: `POST authenticator/patron`.
	///
	/// A vendor rejection (`PAPIErrorCode != 0`) still decodes when the reply carries the
	/// session fields; callers inspecting rejections should use [`PapiClient::request`]
	/// directly and branch on [`PapiResponse::error_code`].
	pub async fn authenticate_patron(
		&self,
		barcode: impl Into<String>,
		password: impl Into<String>,
	) -> Result<PatronSession> {
		let reply = self
			.request()
			.method("POST")
			.path("authenticator/patron")
			.param("Barcode", barcode.into())
			.param("Password", password.into())
			.execute()
			.await?;
		let decoded: PatronAuthReply = reply.deserialize("authenticator/patron")?;
		let expires_at = decoded
			.auth_exp_date
			.as_deref()
			.map(response::parse_vendor_timestamp)
			.transpose()?;

		Ok(PatronSession {
			patron_id: decoded.patron_id,
			access_secret: decoded.access_secret,
			expires_at,
		})
	}

	/// Authorizes the configured staff account: `POST authenticator/staff` on the protected
	/// scope. Replaces any cached session.
	pub async fn authorize_staff(&self) -> Result<StaffSession> {
		let staff = self.config.staff.as_ref().ok_or(ConfigError::MissingStaffCredentials)?;
		let reply = self
			.request()
			.method("POST")
			.protected_scope()
			.path("authenticator/staff")
			.param("Domain", staff.domain.clone())
			.param("Username", staff.username.clone())
			.param("Password", staff.password.clone())
			.execute()
			.await?;
		let decoded: StaffAuthReply = reply.deserialize("authenticator/staff")?;
		let session = StaffSession {
			access_token: decoded.access_token,
			access_secret: decoded.access_secret,
			expires_at: response::parse_vendor_timestamp(&decoded.auth_exp_date)?,
		};

		*self.staff_session.write() = Some(session.clone());

		Ok(session)
	}

	/// Returns the cached staff session while it is still valid, re-authorizing on expiry.
	pub async fn staff_session(&self) -> Result<StaffSession> {
		let now = OffsetDateTime::now_utc();
		let cached = self
			.staff_session
			.read()
			.as_ref()
			.filter(|session| session.is_valid_at(now))
			.cloned();

		if let Some(session) = cached {
			return Ok(session);
		}

		self.authorize_staff().await
	}
}
#[cfg(feature = "reqwest")]
impl PapiClient<ReqwestTransport> {
	/// Creates a client with the crate's default reqwest transport.
	pub fn new(config: PapiConfig) -> Self {
		Self::with_transport(config, ReqwestTransport::default())
	}
}
impl<T> Clone for PapiClient<T>
where
	T: ?Sized + PapiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			config: Arc::clone(&self.config),
			staff_session: Arc::clone(&self.staff_session),
		}
	}
}
impl<T> Debug for PapiClient<T>
where
	T: ?Sized + PapiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PapiClient")
			.field("config", &self.config)
			.field("staff_session_cached", &self.staff_session.read().is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::test_config, http::CaptureTransport};

	fn capture_client() -> (PapiClient<CaptureTransport>, Arc<CaptureTransport>) {
		let transport = Arc::new(CaptureTransport::default());
		let client =
			PapiClient::with_transport(test_config("http://papi.test"), Arc::clone(&transport));

		(client, transport)
	}

	#[tokio::test]
	async fn authenticate_patron_decodes_the_session_fields() {
		let (client, transport) = capture_client();

		transport.push_reply(
			200,
			"{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"AccessSecret\":\"patron-secret\",\
			 \"PatronID\":2187,\"AuthExpDate\":\"/Date(1700000000000)/\"}",
		);

		let session = client
			.authenticate_patron("1234567890123", "hunter2")
			.await
			.expect("Patron authentication fixture should succeed.");

		assert_eq!(session.patron_id, Some(2187));
		assert_eq!(session.access_secret.expose(), "patron-secret");
		assert_eq!(
			session.expires_at.map(|moment| moment.unix_timestamp()),
			Some(1_700_000_000),
		);

		let captured = transport.captured();

		assert_eq!(captured.len(), 1);
		assert!(captured[0].url.as_str().ends_with("authenticator/patron"));
		assert!(captured[0].body.starts_with("{\"LogonWorkstationID\":"));
	}

	#[tokio::test]
	async fn authorize_staff_requires_configured_credentials() {
		let transport = Arc::new(CaptureTransport::default());
		let mut config = test_config("http://papi.test");

		config.staff = None;

		let client: PapiClient<CaptureTransport> =
			PapiClient::with_transport(config, Arc::clone(&transport));
		let err = client
			.authorize_staff()
			.await
			.expect_err("Staff authorization should fail without credentials.");

		assert!(matches!(err, Error::Config(ConfigError::MissingStaffCredentials)));
		assert!(transport.captured().is_empty());
	}

	#[tokio::test]
	async fn staff_session_reuses_the_cached_session_until_expiry() {
		let (client, transport) = capture_client();

		// Expires in 2100; both lookups must reuse the single authorization.
		transport.push_reply(
			200,
			"{\"PAPIErrorCode\":0,\"AccessToken\":\"staff-token\",\
			 \"AccessSecret\":\"staff-secret\",\"AuthExpDate\":\"/Date(4102444800000)/\"}",
		);

		let first = client.staff_session().await.expect("First staff session should succeed.");
		let second =
			client.staff_session().await.expect("Second staff session should succeed.");

		assert_eq!(first.access_token, "staff-token");
		assert_eq!(second.access_secret.expose(), "staff-secret");
		assert_eq!(transport.captured().len(), 1);
	}

	#[tokio::test]
	async fn staff_session_reauthorizes_after_expiry() {
		let (client, transport) = capture_client();
		let expired = "{\"PAPIErrorCode\":0,\"AccessToken\":\"stale-token\",\
			\"AccessSecret\":\"stale-secret\",\"AuthExpDate\":\"/Date(1000000000000)/\"}";

		transport.push_reply(200, expired);
		transport.push_reply(200, expired);

		let _ = client.staff_session().await.expect("First staff session should succeed.");
		let _ = client.staff_session().await.expect("Second staff session should succeed.");

		assert_eq!(transport.captured().len(), 2);
	}

	#[tokio::test]
	async fn staff_requests_route_to_the_protected_scope() {
		let (client, transport) = capture_client();

		transport.push_reply(
			200,
			"{\"PAPIErrorCode\":0,\"AccessToken\":\"staff-token\",\
			 \"AccessSecret\":\"staff-secret\",\"AuthExpDate\":\"/Date(4102444800000)/\"}",
		);

		let _ = client.authorize_staff().await.expect("Staff authorization should succeed.");
		let captured = transport.captured();

		assert!(captured[0].url.as_str().contains("/protected/"));
		assert!(captured[0].url.as_str().ends_with("authenticator/staff"));
	}
}
