// self
use crate::{
	_prelude::*,
	auth::{ProviderName, ScopeSet},
	error::ConfigError,
};

const DEFAULT_AUTHORIZE_PATH: &str = "/oauth/authorize";
const DEFAULT_TOKEN_PATH: &str = "/oauth/token";

/// Preferred client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	#[default]
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Resolved endpoint set for a provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint the browser is redirected to.
	pub authorization: Url,
	/// Token endpoint used for the code exchange.
	pub token: Url,
}

/// Provider-specific options. Every field has a default, so an empty bag is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOptions {
	/// Base URL relative endpoint paths are joined onto.
	pub site: Option<Url>,
	/// Absolute authorization endpoint; takes precedence over `site` + `authorize_path`.
	pub authorize_url: Option<Url>,
	/// Absolute token endpoint; takes precedence over `site` + `token_path`.
	pub token_url: Option<Url>,
	/// Authorization endpoint path relative to `site`.
	pub authorize_path: String,
	/// Token endpoint path relative to `site`.
	pub token_path: String,
	/// Scopes requested on the authorization redirect.
	pub scope: Vec<String>,
	/// Character used to join scopes in the `scope` parameter.
	pub scope_delimiter: char,
	/// How the client authenticates against the token endpoint.
	pub client_auth_method: ClientAuthMethod,
	/// Upper bound for a single code exchange.
	#[serde(rename = "exchange_timeout_secs", with = "duration_secs")]
	pub exchange_timeout: Duration,
	/// Extra query parameters appended to the authorization URL.
	pub authorize_params: BTreeMap<String, String>,
}
impl ProviderOptions {
	/// Default exchange timeout.
	pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::seconds(10);

	/// Resolves the authorization and token endpoints.
	pub fn endpoints(&self, provider: &ProviderName) -> Result<ProviderEndpoints, ConfigError> {
		let authorization = resolve_endpoint(
			provider,
			"authorize",
			self.authorize_url.as_ref(),
			self.site.as_ref(),
			&self.authorize_path,
		)?;
		let token = resolve_endpoint(
			provider,
			"token",
			self.token_url.as_ref(),
			self.site.as_ref(),
			&self.token_path,
		)?;

		Ok(ProviderEndpoints { authorization, token })
	}

	/// Normalizes the configured scopes.
	pub fn scope_set(&self) -> Result<ScopeSet, ConfigError> {
		Ok(ScopeSet::new(self.scope.iter().cloned())?)
	}

	/// Checks the options that do not depend on endpoint resolution.
	pub fn check(&self) -> Result<(), ConfigError> {
		if self.scope_delimiter.is_control() {
			return Err(ConfigError::InvalidScopeDelimiter { delimiter: self.scope_delimiter });
		}
		if !self.exchange_timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		self.scope_set().map(drop)
	}
}
impl Default for ProviderOptions {
	fn default() -> Self {
		Self {
			site: None,
			authorize_url: None,
			token_url: None,
			authorize_path: DEFAULT_AUTHORIZE_PATH.into(),
			token_path: DEFAULT_TOKEN_PATH.into(),
			scope: Vec::new(),
			scope_delimiter: ' ',
			client_auth_method: ClientAuthMethod::default(),
			exchange_timeout: Self::DEFAULT_EXCHANGE_TIMEOUT,
			authorize_params: BTreeMap::new(),
		}
	}
}

fn resolve_endpoint(
	provider: &ProviderName,
	endpoint: &'static str,
	absolute: Option<&Url>,
	site: Option<&Url>,
	path: &str,
) -> Result<Url, ConfigError> {
	if let Some(url) = absolute {
		return Ok(url.clone());
	}

	let site =
		site.ok_or_else(|| ConfigError::MissingEndpoint { provider: provider.clone(), endpoint })?;

	site.join(path).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}

mod duration_secs {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(value.whole_seconds())
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		i64::deserialize(deserializer).map(Duration::seconds)
	}
}
