//! Provider configuration: client credentials plus the options bag.
//!
//! [`ProviderConfig`] values only come out of [`ProviderConfigBuilder::build`] (or JSON, which is
//! routed through the same builder), so every config in circulation carries a non-blank client key
//! and secret. Endpoint and scope options are checked later, when a protocol client or strategy
//! is constructed from the config, which still happens during application setup.

/// Builder API for assembling provider configs.
pub mod builder;
/// Open options bag and endpoint helpers.
pub mod options;

pub use builder::*;
pub use options::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderName, Secret},
	error::ConfigError,
};

/// Validated, immutable configuration for one OAuth2 provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProviderSettings")]
pub struct ProviderConfig {
	/// Name the provider is registered under.
	pub provider: ProviderName,
	/// OAuth2 client identifier issued by the provider.
	pub client_key: String,
	client_secret: Secret,
	/// Provider-specific options (site, endpoints, scope, ...).
	pub options: ProviderOptions,
}
impl ProviderConfig {
	/// Creates a new builder for the provided provider name.
	pub fn builder(provider: ProviderName) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(provider)
	}

	/// OAuth2 client secret. Never include it in logs or failure reports.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}

	/// Re-checks the credential invariant.
	pub fn validate(&self) -> Result<(), ConfigError> {
		check_credentials(&self.provider, Some(&self.client_key), Some(&self.client_secret))
	}

	/// Parses a single provider config from JSON, reporting the failing field path.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}

	/// Parses a list of provider configs from JSON.
	pub fn list_from_json_str(json: &str) -> Result<Vec<Self>, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("provider", &self.provider)
			.field("client_key", &self.client_key)
			.field("client_secret", &self.client_secret)
			.field("options", &self.options)
			.finish()
	}
}
impl TryFrom<ProviderSettings> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(settings: ProviderSettings) -> Result<Self, Self::Error> {
		let mut builder = Self::builder(ProviderName::new(settings.provider)?);

		if let Some(key) = settings.client_key {
			builder = builder.client_key(key);
		}
		if let Some(secret) = settings.client_secret {
			builder = builder.client_secret(secret);
		}

		builder.options(settings.options).build()
	}
}

/// Raw, unvalidated shape of a provider config as found in configuration files.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderSettings {
	provider: String,
	client_key: Option<String>,
	client_secret: Option<String>,
	#[serde(default)]
	options: ProviderOptions,
}

fn check_credentials(
	provider: &ProviderName,
	client_key: Option<&str>,
	client_secret: Option<&Secret>,
) -> Result<(), ConfigError> {
	if client_key.is_none_or(|key| key.trim().is_empty()) {
		return Err(ConfigError::MissingClientKey { provider: provider.clone() });
	}
	if client_secret.is_none_or(Secret::is_blank) {
		return Err(ConfigError::MissingClientSecret { provider: provider.clone() });
	}

	Ok(())
}
