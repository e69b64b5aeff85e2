//! OAuth 2.0 protocol client used by the strategy.
//!
//! [`OAuth2Client`] is the strategy's only view of the protocol: build an authorization URL and
//! exchange a code for a token. [`BasicOAuth2Client`] implements it on top of the `oauth2` crate
//! and any [`TokenHttpClient`] transport; tests and exotic providers can supply their own
//! implementation instead.

pub mod classify;

pub use classify::*;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet},
	config::{ClientAuthMethod, ProviderConfig, ProviderEndpoints},
	error::{ConfigError, ExchangeError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
};
#[cfg(feature = "reqwest")]
use crate::{error::TransportError, http::ReqwestHttpClient};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by [`OAuth2Client::exchange_code`].
pub type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AccessToken, ExchangeError>> + 'a + Send>>;

#[cfg(feature = "reqwest")]
/// Protocol client specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuth2Client = BasicOAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Protocol operations the strategy relies on.
pub trait OAuth2Client
where
	Self: Send + Sync,
{
	/// Builds the provider authorization URL the browser is redirected to.
	fn authorize_url(&self, redirect_uri: &Url, scope: &ScopeSet) -> Url;

	/// Exchanges an authorization code for an access token.
	///
	/// `redirect_uri` must equal the one sent on the authorization redirect.
	fn exchange_code<'a>(&'a self, code: &'a str, redirect_uri: &'a Url) -> ExchangeFuture<'a>;
}

/// Maps HTTP transport failures into [`ExchangeError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport.
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> ExchangeError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> ExchangeError {
		match err {
			HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
			HttpClientError::Http(inner) => ExchangeError::Request(inner),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => ExchangeError::TokenEndpoint {
				message: format!(
					"HTTP client error occurred while calling the token endpoint: {message}."
				),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			},
			_ => ExchangeError::TokenEndpoint {
				message: "HTTP client error occurred while calling the token endpoint.".into(),
				status: meta_status(meta),
				retry_after: meta_retry_after(meta),
			},
		}
	}
}

/// [`OAuth2Client`] backed by the `oauth2` crate.
pub struct BasicOAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: ConfiguredBasicClient,
	endpoints: ProviderEndpoints,
	client_key: String,
	scope_delimiter: char,
	authorize_params: BTreeMap<String, String>,
	timeout: Duration,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> BasicOAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds a client from a validated provider config and a caller-provided transport.
	pub fn from_config(
		config: &ProviderConfig,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		config.options.check()?;

		let endpoints = config.options.endpoints(&config.provider)?;
		let auth_url = AuthUrl::from_url(endpoints.authorization.clone());
		let token_url = TokenUrl::from_url(endpoints.token.clone());
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_key.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret().expose().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if matches!(config.options.client_auth_method, ClientAuthMethod::ClientSecretPost) {
			oauth_client = oauth_client.set_auth_type(AuthType::RequestBody);
		}

		Ok(Self {
			oauth_client,
			endpoints,
			client_key: config.client_key.clone(),
			scope_delimiter: config.options.scope_delimiter,
			authorize_params: config.options.authorize_params.clone(),
			timeout: config.options.exchange_timeout,
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	/// Endpoints the client talks to.
	pub fn endpoints(&self) -> &ProviderEndpoints {
		&self.endpoints
	}
}
#[cfg(feature = "reqwest")]
impl BasicOAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds a client that provisions its own reqwest transport (redirects disabled).
	pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
		Self::from_config(config, ReqwestHttpClient::new()?, ReqwestTransportErrorMapper)
	}
}
impl<C, M> OAuth2Client for BasicOAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn authorize_url(&self, redirect_uri: &Url, scope: &ScopeSet) -> Url {
		let mut url = self.endpoints.authorization.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("response_type", "code");
		pairs.append_pair("client_id", &self.client_key);
		pairs.append_pair("redirect_uri", redirect_uri.as_str());

		if let Some(scope_value) = scope.join(self.scope_delimiter) {
			pairs.append_pair("scope", &scope_value);
		}

		for (key, value) in &self.authorize_params {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		url
	}

	fn exchange_code<'a>(&'a self, code: &'a str, redirect_uri: &'a Url) -> ExchangeFuture<'a> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.handle(meta.clone(), self.timeout);
			let redirect_url = RedirectUrl::new(redirect_uri.to_string())
				.map_err(|source| ExchangeError::InvalidRedirect { source })?;
			let response = self
				.oauth_client
				.exchange_code(AuthorizationCode::new(code.to_owned()))
				.set_redirect_uri(Cow::Owned(redirect_url))
				.request_async(&instrumented)
				.await
				.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

			Ok(map_token_response(response))
		})
	}
}
impl<C, M> Debug for BasicOAuth2Client<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicOAuth2Client")
			.field("endpoints", &self.endpoints)
			.field("client_key", &self.client_key)
			.field("timeout", &self.timeout)
			.finish()
	}
}

fn map_token_response(response: BasicTokenResponse) -> AccessToken {
	let mut token = AccessToken::new(response.access_token().secret().to_owned());

	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}
	if let Some(expires_in) = response.expires_in().and_then(|d| Duration::try_from(d).ok()) {
		token = token.with_expires_in(expires_in);
	}
	// Providers sometimes echo malformed scope lists; the token is still usable without them.
	if let Some(scope) = response
		.scopes()
		.and_then(|scopes| ScopeSet::new(scopes.iter().map(|scope| scope.to_string())).ok())
	{
		token = token.with_scope(scope);
	}

	token
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> ExchangeError
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) => mapper.map_transport_error(meta_ref, error),
		RequestTokenError::Parse(source, _body) =>
			ExchangeError::TokenResponseParse { source, status: meta_status(meta_ref) },
		RequestTokenError::Other(message) => ExchangeError::TokenEndpoint {
			message: format!("Token endpoint returned an unexpected response: {message}."),
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		},
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> ExchangeError {
	let oauth_error = response.error().as_ref().to_string();
	let description = response.error_description().map(String::as_str);
	let kind = classify_token_error(Some(&oauth_error), description, meta_status(meta));
	let reason = description.unwrap_or(&oauth_error).to_owned();

	match kind {
		ExchangeErrorKind::InvalidGrant => ExchangeError::InvalidGrant { reason },
		ExchangeErrorKind::InvalidClient => ExchangeError::InvalidClient { reason },
		ExchangeErrorKind::InsufficientScope => ExchangeError::InsufficientScope { reason },
		ExchangeErrorKind::Transient => ExchangeError::TokenEndpoint {
			message: format!("Token endpoint returned an OAuth error: {reason}."),
			status: meta_status(meta),
			retry_after: meta_retry_after(meta),
		},
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
