//! Fluent single-use builder for signed Polaris requests.
//!
//! A [`PapiRequest`] is minted fresh per logical request by
//! [`PapiClient::request`](crate::client::PapiClient::request) and consumed by
//! [`PapiRequest::execute`], so patron barcodes and session secrets cannot leak from one call
//! into the next. Clone a staged builder when a reusable template is genuinely needed.

// self
use crate::{
	_prelude::*,
	config::PapiConfig,
	error::{ConfigError, TransportError},
	http::{PapiTransport, WireRequest},
	obs::{self, RequestOutcome, RequestSpan},
	response::PapiResponse,
	sign::{self, AccessSecret},
};

/// Body key for the workstation identifier injected ahead of every request body.
const LOGON_WORKSTATION_ID: &str = "LogonWorkstationID";
/// Body key for the branch identifier injected ahead of every request body.
const PATRON_BRANCH_ID: &str = "PatronBranchID";

/// Polaris endpoint scope selecting the base URI and authentication expectations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Scope {
	/// Public endpoints; no staff session involved.
	#[default]
	Public,
	/// Protected endpoints reserved for staff-authorized integrations.
	Protected,
}
impl Scope {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Scope::Public => "public",
			Scope::Protected => "protected",
		}
	}
}
impl Display for Scope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single-use fluent builder for one signed Polaris request.
///
/// Defaults: `GET`, public scope, empty path, empty parameters, no patron, no session secret.
pub struct PapiRequest<T>
where
	T: ?Sized + PapiTransport,
{
	transport: Arc<T>,
	config: Arc<PapiConfig>,
	method: String,
	scope: Scope,
	path: String,
	patron: Option<String>,
	params: Map<String, Value>,
	access_secret: Option<AccessSecret>,
	workstation_id: Option<u32>,
	branch_id: Option<u32>,
}
impl<T> PapiRequest<T>
where
	T: ?Sized + PapiTransport,
{
	pub(crate) fn new(transport: Arc<T>, config: Arc<PapiConfig>) -> Self {
		Self {
			transport,
			config,
			method: "GET".into(),
			scope: Scope::Public,
			path: String::new(),
			patron: None,
			params: Map::new(),
			access_secret: None,
			workstation_id: None,
			branch_id: None,
		}
	}

	/// Sets the HTTP verb; any token is accepted and upper-cased before use.
	pub fn method(mut self, method: impl AsRef<str>) -> Self {
		self.method = method.as_ref().to_ascii_uppercase();

		self
	}

	/// Targets the provided scope's base URI; everything else is unaffected.
	pub fn scope(mut self, scope: Scope) -> Self {
		self.scope = scope;

		self
	}

	/// Targets the protected base URI.
	pub fn protected_scope(self) -> Self {
		self.scope(Scope::Protected)
	}

	/// Embeds the patron barcode into the path as a `patron/<barcode>/` segment placed ahead
	/// of the endpoint suffix.
	pub fn patron(mut self, barcode: impl Into<String>) -> Self {
		self.patron = Some(barcode.into());

		self
	}

	/// Sets the endpoint-specific path fragment appended after the base URI.
	pub fn path(mut self, suffix: impl Into<String>) -> Self {
		self.path = suffix.into();

		self
	}

	/// Replaces (never merges) the caller-supplied body parameters.
	pub fn params(mut self, params: Map<String, Value>) -> Self {
		self.params = params;

		self
	}

	/// Appends one body parameter, keeping earlier insertions in place.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Attaches a session access secret: adds the `X-PAPI-AccessToken` header and extends the
	/// signature input by exactly that secret.
	pub fn auth(mut self, secret: impl Into<AccessSecret>) -> Self {
		self.access_secret = Some(secret.into());

		self
	}

	/// Overrides the configured default `PatronBranchID` for this request.
	pub fn branch(mut self, id: u32) -> Self {
		self.branch_id = Some(id);

		self
	}

	/// Overrides the configured default `LogonWorkstationID` for this request.
	pub fn workstation(mut self, id: u32) -> Self {
		self.workstation_id = Some(id);

		self
	}

	/// Resolves the full request URL: scope base, optional patron segment, endpoint suffix.
	pub fn url(&self) -> Result<Url, ConfigError> {
		let base = match self.scope {
			Scope::Public => &self.config.public_base,
			Scope::Protected => &self.config.protected_base,
		};
		let mut raw = base.as_str().to_owned();

		if let Some(barcode) = &self.patron {
			raw.push_str("patron/");
			raw.push_str(barcode);
			raw.push('/');
		}

		raw.push_str(&self.path);

		Url::parse(&raw).map_err(|source| ConfigError::InvalidRequestUrl { url: raw, source })
	}

	/// Executes the request: one timestamp, one signature, one round trip, no retries.
	///
	/// Non-2xx replies surface as [`TransportError::Status`]; 2xx replies that are not JSON
	/// objects surface as decode errors. The vendor's `PAPIErrorCode` is returned unmodified
	/// inside the reply for the caller to branch on.
	pub async fn execute(self) -> Result<PapiResponse> {
		let scope = self.scope;
		let span = RequestSpan::new(scope, "execute");

		obs::record_request_outcome(scope, RequestOutcome::Attempt);

		let result = span.instrument(self.dispatch()).await;

		match &result {
			Ok(_) => obs::record_request_outcome(scope, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(scope, RequestOutcome::Failure),
		}

		result
	}

	async fn dispatch(self) -> Result<PapiResponse> {
		let url = self.url()?;
		let date = sign::polaris_date(OffsetDateTime::now_utc())?;
		let signature = sign::signature(
			&self.config.access_key,
			&self.method,
			url.as_str(),
			&date,
			self.access_secret.as_ref(),
		)?;
		let mut headers = vec![
			("Accept".to_owned(), "application/json".to_owned()),
			("Authorization".to_owned(), sign::authorization(&self.config.access_id, &signature)),
			("PolarisDate".to_owned(), date),
		];

		if let Some(secret) = &self.access_secret {
			headers.push(("X-PAPI-AccessToken".to_owned(), secret.expose().to_owned()));
		}

		let body =
			serde_json::to_string(&self.body()).map_err(TransportError::request)?;
		let request = WireRequest { method: self.method, url, headers, body };
		let response = self.transport.execute(request).await?;

		if !(200..300).contains(&response.status) {
			return Err(TransportError::Status { status: response.status }.into());
		}

		Ok(PapiResponse::from_wire(response)?)
	}

	/// Builds the wire body: `LogonWorkstationID`, `PatronBranchID`, then the caller
	/// parameters, in exactly that key order.
	fn body(&self) -> Map<String, Value> {
		let mut body = Map::new();

		body.insert(
			LOGON_WORKSTATION_ID.to_owned(),
			self.workstation_id.unwrap_or(self.config.workstation_id).into(),
		);
		body.insert(
			PATRON_BRANCH_ID.to_owned(),
			self.branch_id.unwrap_or(self.config.branch_id).into(),
		);

		for (key, value) in &self.params {
			body.insert(key.clone(), value.clone());
		}

		body
	}
}
impl<T> Clone for PapiRequest<T>
where
	T: ?Sized + PapiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			config: Arc::clone(&self.config),
			method: self.method.clone(),
			scope: self.scope,
			path: self.path.clone(),
			patron: self.patron.clone(),
			params: self.params.clone(),
			access_secret: self.access_secret.clone(),
			workstation_id: self.workstation_id,
			branch_id: self.branch_id,
		}
	}
}
impl<T> Debug for PapiRequest<T>
where
	T: ?Sized + PapiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PapiRequest")
			.field("method", &self.method)
			.field("scope", &self.scope)
			.field("path", &self.path)
			.field("patron", &self.patron)
			.field("access_secret_set", &self.access_secret.is_some())
			.finish()
	}
}
