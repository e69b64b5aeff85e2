//! Registrar that turns validated provider configs into pipeline strategies.

// std
use std::collections::HashSet;
// self
use crate::{
	_prelude::*,
	config::ProviderConfig,
	error::ConfigError,
	oauth::OAuth2Client,
	pipeline::Authenticator,
	resolver::UserResolverRegistry,
	strategy::{OAuth2Strategy, ParamNames, Strategy},
};
#[cfg(feature = "reqwest")] use crate::oauth::ReqwestOAuth2Client;

/// Collects strategies in dispatch order, then checks them with [`AuthenticatorBuilder::build`].
///
/// Each registration returns `Err` instead of registering a half-valid strategy, so a bad
/// provider config aborts setup on the spot.
pub struct AuthenticatorBuilder<U>
where
	U: 'static + Send,
{
	resolvers: Arc<UserResolverRegistry<U>>,
	param_names: ParamNames,
	strategies: Vec<Arc<dyn Strategy<U>>>,
	keys: HashSet<String>,
}
impl<U> AuthenticatorBuilder<U>
where
	U: 'static + Send,
{
	/// Creates an empty builder whose OAuth2 strategies share `resolvers`.
	pub fn new(resolvers: Arc<UserResolverRegistry<U>>) -> Self {
		Self {
			resolvers,
			param_names: ParamNames::default(),
			strategies: Vec::new(),
			keys: HashSet::new(),
		}
	}

	/// Parameter names used by OAuth2 strategies registered after this call.
	pub fn param_names(mut self, param_names: ParamNames) -> Self {
		self.param_names = param_names;

		self
	}

	/// Registers an OAuth2 strategy for `config` using a caller-supplied protocol client.
	pub fn oauth2_with_client(
		self,
		config: ProviderConfig,
		client: Arc<dyn OAuth2Client>,
	) -> Result<Self, ConfigError> {
		let strategy = OAuth2Strategy::new(config, client, self.resolvers.clone())?
			.with_param_names(self.param_names.clone());

		self.strategy(Arc::new(strategy))
	}

	/// Registers any strategy, keyed by [`Strategy::key`].
	pub fn strategy(mut self, strategy: Arc<dyn Strategy<U>>) -> Result<Self, ConfigError> {
		let key = strategy.key().to_owned();

		if !self.keys.insert(key.clone()) {
			return Err(ConfigError::DuplicateStrategy { key });
		}

		#[cfg(feature = "tracing")]
		tracing::debug!(key = %key, "Registered authentication strategy.");

		self.strategies.push(strategy);

		Ok(self)
	}

	/// Finishes the pipeline after every strategy reports it is ready.
	///
	/// Fails with [`Error::MissingResolver`] when an OAuth2 strategy's provider has no resolver.
	pub fn build(self) -> Result<Authenticator<U>> {
		for strategy in &self.strategies {
			strategy.ensure_ready()?;
		}

		Ok(Authenticator { strategies: self.strategies })
	}
}
#[cfg(feature = "reqwest")]
impl<U> AuthenticatorBuilder<U>
where
	U: 'static + Send,
{
	/// Registers an OAuth2 strategy for `config` backed by the default reqwest client.
	pub fn oauth2(self, config: ProviderConfig) -> Result<Self, ConfigError> {
		let client = ReqwestOAuth2Client::new(&config)?;

		self.oauth2_with_client(config, Arc::new(client))
	}
}
impl<U> Debug for AuthenticatorBuilder<U>
where
	U: 'static + Send,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatorBuilder")
			.field("param_names", &self.param_names)
			.field("strategies", &self.strategies.iter().map(|s| s.key()).collect::<Vec<_>>())
			.finish()
	}
}
