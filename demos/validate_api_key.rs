//! Demonstrates validating the configured API credentials against a mocked Polaris server
//! with the default reqwest transport.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use papi_client::{client::PapiClient, config::PapiConfig, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/PAPIService/REST/public/v1/1033/100/1/apikeyvalidate");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"PAPIErrorCode\":0,\"ErrorMessage\":null}");
		})
		.await;
	let base = server.base_url();
	let config = PapiConfig::builder("demo-access-id", "demo-access-key")
		.public_base(Url::parse(&format!("{base}/PAPIService/REST/public/v1/1033/100/1/"))?)
		.protected_base(Url::parse(&format!("{base}/PAPIService/REST/protected/v1/1033/100/1/"))?)
		.build()?;
	let client = PapiClient::new(config);
	let reply = client.validate_api_key().await?;

	println!("PAPIErrorCode: {}.", reply.error_code().unwrap_or_default());

	mock.assert_async().await;

	Ok(())
}
