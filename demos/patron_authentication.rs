//! Demonstrates authenticating a patron and reusing the issued session secret for a
//! follow-up authenticated request.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use papi_client::{client::PapiClient, config::PapiConfig, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let auth_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/PAPIService/REST/public/v1/1033/100/1/authenticator/patron");
			then.status(200).header("content-type", "application/json").body(
				"{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"AccessSecret\":\"demo-secret\",\
				 \"PatronID\":2187,\"AuthExpDate\":\"/Date(4102444800000)/\"}",
			);
		})
		.await;
	let holds_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/PAPIService/REST/public/v1/1033/100/1/patron/1234567890123/holds")
				.header("x-papi-accesstoken", "demo-secret");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"PatronHoldRequestsRows\":[]}");
		})
		.await;
	let base = server.base_url();
	let config = PapiConfig::builder("demo-access-id", "demo-access-key")
		.public_base(Url::parse(&format!("{base}/PAPIService/REST/public/v1/1033/100/1/"))?)
		.protected_base(Url::parse(&format!("{base}/PAPIService/REST/protected/v1/1033/100/1/"))?)
		.build()?;
	let client = PapiClient::new(config);
	let session = client.authenticate_patron("1234567890123", "demo-password").await?;

	println!("Authenticated patron: {:?}.", session.patron_id);

	let holds = client
		.request()
		.method("GET")
		.patron("1234567890123")
		.path("holds")
		.auth(session.access_secret.expose())
		.execute()
		.await?;

	println!("PAPIErrorCode: {}.", holds.error_code().unwrap_or_default());

	auth_mock.assert_async().await;
	holds_mock.assert_async().await;

	Ok(())
}
