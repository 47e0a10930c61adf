// crates.io
use httpmock::prelude::*;
// self
use papi_client::_preludet::*;

const STAFF_PATH: &str = "/PAPIService/REST/protected/v1/1033/100/1/authenticator/staff";

#[tokio::test]
async fn authorize_staff_decodes_tokens_and_expiry() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(STAFF_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"AccessToken\":\"staff-token\",\
				 \"AccessSecret\":\"staff-secret\",\"AuthExpDate\":\"/Date(4102444800000)/\"}",
			);
		})
		.await;
	let client = build_reqwest_test_client(&server.base_url());
	let session =
		client.authorize_staff().await.expect("Staff authorization should succeed.");

	assert_eq!(session.access_token, "staff-token");
	assert_eq!(session.access_secret.expose(), "staff-secret");
	assert_eq!(session.expires_at.unix_timestamp(), 4_102_444_800);

	mock.assert_async().await;
}

#[tokio::test]
async fn staff_session_authorizes_once_while_valid() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(STAFF_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"AccessToken\":\"staff-token\",\
				 \"AccessSecret\":\"staff-secret\",\"AuthExpDate\":\"/Date(4102444800000)/\"}",
			);
		})
		.await;
	let client = build_reqwest_test_client(&server.base_url());
	let first = client.staff_session().await.expect("First staff session should succeed.");
	let second = client.staff_session().await.expect("Second staff session should succeed.");

	assert_eq!(first.access_token, second.access_token);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn staff_session_reauthorizes_once_expired() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(STAFF_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"PAPIErrorCode\":0,\"ErrorMessage\":null,\"AccessToken\":\"stale-token\",\
				 \"AccessSecret\":\"stale-secret\",\"AuthExpDate\":\"/Date(1000000000000)/\"}",
			);
		})
		.await;
	let client = build_reqwest_test_client(&server.base_url());
	let _ = client.staff_session().await.expect("First staff session should succeed.");
	let _ = client.staff_session().await.expect("Second staff session should succeed.");

	mock.assert_calls_async(2).await;
}
