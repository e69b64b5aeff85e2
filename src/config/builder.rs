// self
use crate::{
	_prelude::*,
	auth::{ProviderName, Secret},
	config::{ProviderConfig, ProviderOptions, check_credentials},
	error::ConfigError,
};

/// Builder for [`ProviderConfig`] values.
///
/// Setters may be called in any order and any number of times; the last write wins. Nothing is
/// checked until [`validate`](Self::validate) or [`build`](Self::build).
#[derive(Clone)]
pub struct ProviderConfigBuilder {
	/// Provider the config is being built for.
	pub provider: ProviderName,
	/// Client key, if set.
	pub client_key: Option<String>,
	/// Client secret, if set.
	pub client_secret: Option<Secret>,
	/// Options bag.
	pub options: ProviderOptions,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provider name and default options.
	pub fn new(provider: ProviderName) -> Self {
		Self { provider, client_key: None, client_secret: None, options: ProviderOptions::default() }
	}

	/// Sets the client key.
	pub fn client_key(mut self, key: impl Into<String>) -> Self {
		self.client_key = Some(key.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Replaces the whole options bag.
	pub fn options(mut self, options: ProviderOptions) -> Self {
		self.options = options;

		self
	}

	/// Sets the provider site that relative endpoint paths resolve against.
	pub fn site(mut self, site: Url) -> Self {
		self.options.site = Some(site);

		self
	}

	/// Replaces the scopes requested on the authorization redirect.
	pub fn scope<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.options.scope = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Checks that both the client key and the client secret are present and non-blank.
	pub fn validate(&self) -> Result<(), ConfigError> {
		check_credentials(&self.provider, self.client_key.as_deref(), self.client_secret.as_ref())
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		self.validate()?;

		let Self { provider, client_key, client_secret, options } = self;

		match (client_key, client_secret) {
			(Some(client_key), Some(client_secret)) =>
				Ok(ProviderConfig { provider, client_key, client_secret, options }),
			(None, _) => Err(ConfigError::MissingClientKey { provider }),
			(_, None) => Err(ConfigError::MissingClientSecret { provider }),
		}
	}
}
impl Debug for ProviderConfigBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfigBuilder")
			.field("provider", &self.provider)
			.field("client_key", &self.client_key)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("options", &self.options)
			.finish()
	}
}
