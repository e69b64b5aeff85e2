//! Crate-level error types shared across configs, strategies, and the protocol client.
//!
//! Setup-time problems ([`ConfigError`], [`Error::MissingResolver`]) are returned as `Err` and are
//! expected to abort application boot. Request-time problems ([`ExchangeError`]) are caught by the
//! strategy and reported as a failed authentication instead.

// self
use crate::{_prelude::*, auth::{IdentifierError, ProviderName, ScopeValidationError}};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Code exchange failure surfaced directly by an [`OAuth2Client`](crate::oauth::OAuth2Client).
	#[error(transparent)]
	Exchange(#[from] ExchangeError),

	/// A strategy is active for a provider that has no user resolver.
	#[error(
		"No user resolver is registered for provider `{provider}`. Register one during setup with \
		 `UserResolverRegistry::register` (or `register_fn`) keyed by `{provider}`, mapping an \
		 access token to your application user."
	)]
	MissingResolver {
		/// Provider lacking a resolver.
		provider: ProviderName,
	},
}

/// Configuration and validation failures raised while setting up providers and strategies.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Provider name failed identifier validation.
	#[error(transparent)]
	InvalidProviderName(#[from] IdentifierError),
	/// Client key is absent or blank.
	#[error("Provider `{provider}` needs a client key and a client secret; the client key is missing.")]
	MissingClientKey {
		/// Provider being configured.
		provider: ProviderName,
	},
	/// Client secret is absent or blank.
	#[error(
		"Provider `{provider}` needs a client key and a client secret; the client secret is missing."
	)]
	MissingClientSecret {
		/// Provider being configured.
		provider: ProviderName,
	},
	/// Neither a site nor an absolute URL was configured for an endpoint.
	#[error("Provider `{provider}` has no {endpoint} endpoint; set `site` or `{endpoint}_url`.")]
	MissingEndpoint {
		/// Provider being configured.
		provider: ProviderName,
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoint URL could not be resolved against the site.
	#[error("The {endpoint} endpoint is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configured scopes cannot be normalized.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
	/// Scope delimiter is a control character.
	#[error("Scope delimiter must be a printable character.")]
	InvalidScopeDelimiter {
		/// Invalid delimiter that was supplied.
		delimiter: char,
	},
	/// Exchange timeout is zero or negative.
	#[error("The exchange timeout must be positive.")]
	NonPositiveTimeout,
	/// A strategy with the same key is already registered.
	#[error("A strategy keyed `{key}` is already registered.")]
	DuplicateStrategy {
		/// Conflicting strategy key.
		key: String,
	},
	/// Provider configuration document could not be parsed.
	#[error("Provider configuration is malformed at `{path}`.")]
	Parse {
		/// Path to the offending field.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while exchanging an authorization code for an access token.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Provider rejected the grant (bad, expired, or reused code).
	#[error("Provider rejected the authorization code: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Granted scopes do not cover the request.
	#[error("Token lacks the required scopes: {reason}.")]
	InsufficientScope {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider returned an unexpected but possibly temporary response.
	#[error("{message}")]
	TokenEndpoint {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with a body that could not be parsed.
	#[error("Token endpoint returned a malformed response.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Redirect URI could not be converted for the token request.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP request could not be assembled.
	#[error(transparent)]
	Request(#[from] oauth2::http::Error),
	/// Network-level failure.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl ExchangeError {
	/// HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::TokenEndpoint { status, .. } | Self::TokenResponseParse { status, .. } => *status,
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The token endpoint did not answer within the configured timeout.
	#[error("Token endpoint did not respond within the exchange timeout.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
