#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use oauth2_web_strategy::{
	auth::{AccessToken, ProviderName},
	config::{ClientAuthMethod, ProviderConfig},
	error::{ExchangeError, TransportError},
	resolver::UserResolverRegistry,
	strategy::{FailureReason, OAuth2Strategy, Outcome, RequestContext, Strategy},
	url::Url,
};

const CLIENT_KEY: &str = "client-id";
const CLIENT_SECRET: &str = "client-secret";
const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

#[derive(Debug, PartialEq)]
struct User {
	login: String,
}

fn github() -> ProviderName {
	ProviderName::new("github").expect("Provider name should be valid for token endpoint tests.")
}

fn config(server: &MockServer, method: ClientAuthMethod) -> ProviderConfig {
	let mut config = ProviderConfig::builder(github())
		.client_key(CLIENT_KEY)
		.client_secret(CLIENT_SECRET)
		.site(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
		.scope(["user:email"])
		.build()
		.expect("Provider config should build for the mock server.");

	config.options.client_auth_method = method;

	config
}

fn strategy(config: ProviderConfig, known_token: &'static str) -> OAuth2Strategy<User> {
	let resolvers = Arc::new(UserResolverRegistry::new());

	resolvers.register_fn(github(), move |token: &AccessToken| {
		(token.value() == known_token).then(|| User { login: "octocat".into() })
	});

	OAuth2Strategy::with_default_client(config, resolvers)
		.expect("Strategy should build with the default client.")
}

fn callback(code: &str) -> RequestContext {
	RequestContext::from_url(
		Url::parse(&format!("https://app.example.com/auth/github/callback?code={code}"))
			.expect("Callback URL should parse."),
	)
}

#[tokio::test]
async fn code_exchange_resolves_the_user() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("authorization", BASIC_AUTH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"gho_known\",\"token_type\":\"bearer\",\"scope\":\"user:email\",\"expires_in\":28800,\"refresh_token\":\"ghr_refresh\"}",
			);
		})
		.await;
	let strategy = strategy(config(&server, ClientAuthMethod::ClientSecretBasic), "gho_known");
	let outcome =
		strategy.authenticate(&callback("abc")).await.expect("Callback should not error.");

	mock.assert_async().await;

	assert!(matches!(outcome, Outcome::Success(User { ref login }) if login == "octocat"));
}

#[tokio::test]
async fn unknown_user_keeps_the_exchanged_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"gho_stranger\",\"token_type\":\"bearer\",\"expires_in\":3600,\"refresh_token\":\"ghr_stranger\"}",
			);
		})
		.await;
	let strategy = strategy(config(&server, ClientAuthMethod::ClientSecretPost), "gho_known");
	let outcome =
		strategy.authenticate(&callback("abc")).await.expect("Callback should not error.");

	mock.assert_async().await;

	let failure = outcome.failure().expect("Unknown users should fail the attempt.");
	let token =
		failure.context.access_token.as_ref().expect("The exchanged token should be reported.");

	assert!(matches!(failure.reason, FailureReason::UserNotFound));
	assert_eq!(failure.key, "github_oauth2");
	assert_eq!(token.value(), "gho_stranger");
	assert_eq!(token.refresh_token.as_ref().map(|secret| secret.expose()), Some("ghr_stranger"));
	assert_eq!(token.expires_in, Some(time::Duration::seconds(3600)));
	assert!(!format!("{failure:?}").contains(CLIENT_SECRET));
}

#[tokio::test]
async fn rejected_code_fails_with_invalid_grant() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400).header("content-type", "application/json").body(
				"{\"error\":\"invalid_grant\",\"error_description\":\"The code passed is incorrect or expired.\"}",
			);
		})
		.await;
	let strategy = strategy(config(&server, ClientAuthMethod::ClientSecretBasic), "gho_known");
	let outcome =
		strategy.authenticate(&callback("expired")).await.expect("Callback should not error.");

	mock.assert_async().await;

	let failure = outcome.failure().expect("Rejected codes should fail the attempt.");

	assert_eq!(failure.to_string(), "token exchange failed");
	assert!(matches!(
		&failure.reason,
		FailureReason::TokenExchange(ExchangeError::InvalidGrant { reason })
			if reason.contains("incorrect or expired")
	));
	assert!(failure.context.access_token.is_none());
}

#[tokio::test]
async fn unavailable_provider_reports_status_and_retry_hint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(503)
				.header("content-type", "application/json")
				.header("retry-after", "30")
				.body("{\"error\":\"temporarily_unavailable\"}");
		})
		.await;
	let strategy = strategy(config(&server, ClientAuthMethod::ClientSecretBasic), "gho_known");
	let outcome =
		strategy.authenticate(&callback("abc")).await.expect("Callback should not error.");

	mock.assert_async().await;

	let failure = outcome.failure().expect("Provider outages should fail the attempt.");

	assert!(matches!(
		failure.reason,
		FailureReason::TokenExchange(ExchangeError::TokenEndpoint {
			status: Some(503),
			retry_after: Some(retry_after),
			..
		}) if retry_after == time::Duration::seconds(30)
	));
}

#[tokio::test]
async fn slow_token_endpoint_times_out() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_secs(3))
				.body("{\"access_token\":\"gho_late\",\"token_type\":\"bearer\"}");
		})
		.await;
	let mut config = config(&server, ClientAuthMethod::ClientSecretBasic);

	config.options.exchange_timeout = time::Duration::milliseconds(200);

	let strategy = strategy(config, "gho_late");
	let outcome =
		strategy.authenticate(&callback("abc")).await.expect("Timeouts should not escape.");
	let failure = outcome.failure().expect("Timeouts should fail the attempt.");

	assert!(matches!(
		failure.reason,
		FailureReason::TokenExchange(ExchangeError::Transport(TransportError::Timeout))
	));
}

#[tokio::test]
async fn redirect_leg_points_at_the_authorization_endpoint() {
	let server = MockServer::start_async().await;
	let strategy = strategy(config(&server, ClientAuthMethod::ClientSecretBasic), "gho_known");
	let request = RequestContext::from_url(
		Url::parse("https://app.example.com:8443/login?oauth2_provider=github")
			.expect("Login URL should parse."),
	);

	assert!(strategy.is_applicable(&request));

	let outcome = strategy.authenticate(&request).await.expect("Redirect should not error.");
	let Outcome::Redirect(location) = outcome else {
		panic!("Selecting a provider should redirect.");
	};
	let pairs: std::collections::HashMap<_, _> = location.query_pairs().into_owned().collect();

	assert!(location.as_str().starts_with(&server.url("/oauth/authorize")));
	assert_eq!(pairs.get("redirect_uri").map(String::as_str), Some("https://app.example.com:8443/"));
	assert_eq!(pairs.get("scope").map(String::as_str), Some("user:email"));
	assert_eq!(pairs.get("client_id").map(String::as_str), Some(CLIENT_KEY));
}
