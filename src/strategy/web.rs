//! OAuth2 web-server (authorization code) strategy.
//!
//! One [`OAuth2Strategy`] serves one provider. A request that names the provider in the selector
//! parameter is redirected to the provider's authorization endpoint. A request carrying a `code`
//! is treated as the provider callback: the code is exchanged for an access token, and the token
//! is handed to the provider's [`UserResolver`](crate::resolver::UserResolver).

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet},
	config::ProviderConfig,
	error::ConfigError,
	oauth::OAuth2Client,
	obs::{self, AuthLeg, AuthOutcome, AuthSpan},
	resolver::{UserResolver, UserResolverRegistry},
	strategy::{
		Failure, FailureContext, FailureReason, Outcome, ParamNames, RequestContext, Strategy,
		StrategyFuture,
	},
};
#[cfg(feature = "reqwest")] use crate::oauth::ReqwestOAuth2Client;

/// Strategy bound to one validated [`ProviderConfig`].
pub struct OAuth2Strategy<U>
where
	U: 'static + Send,
{
	config: Arc<ProviderConfig>,
	client: Arc<dyn OAuth2Client>,
	resolvers: Arc<UserResolverRegistry<U>>,
	params: ParamNames,
	scope: ScopeSet,
	key: String,
}
impl<U> OAuth2Strategy<U>
where
	U: 'static + Send,
{
	/// Binds `config` to a protocol client and the shared resolver registry.
	///
	/// Fails when the config does not validate, so an invalid provider never becomes a strategy.
	pub fn new(
		config: ProviderConfig,
		client: Arc<dyn OAuth2Client>,
		resolvers: Arc<UserResolverRegistry<U>>,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		config.options.check()?;

		let scope = config.options.scope_set()?;
		let key = config.provider.error_key();

		Ok(Self {
			config: Arc::new(config),
			client,
			resolvers,
			params: ParamNames::default(),
			scope,
			key,
		})
	}

	/// Overrides the request parameter names.
	pub fn with_param_names(mut self, params: ParamNames) -> Self {
		self.params = params;

		self
	}

	/// Provider config the strategy was built from.
	pub fn config(&self) -> &ProviderConfig {
		&self.config
	}

	/// Scope requested on the authorization redirect.
	pub fn scope(&self) -> &ScopeSet {
		&self.scope
	}

	fn resolver(&self) -> Result<Arc<dyn UserResolver<U>>> {
		self.resolvers
			.lookup(&self.config.provider)
			.ok_or_else(|| Error::MissingResolver { provider: self.config.provider.clone() })
	}

	async fn redirect(&self, request: &RequestContext) -> Result<Outcome<U>> {
		obs::record_auth_outcome(AuthLeg::Redirect, AuthOutcome::Attempt);

		let location = self.client.authorize_url(&request.redirect_uri(), &self.scope);

		obs::record_auth_outcome(AuthLeg::Redirect, AuthOutcome::Redirect);

		Ok(Outcome::Redirect(location))
	}

	async fn callback(&self, code: &str, request: &RequestContext) -> Result<Outcome<U>> {
		obs::record_auth_outcome(AuthLeg::Callback, AuthOutcome::Attempt);

		// Checked before the exchange so a missing resolver never burns a single-use code.
		let resolver = self.resolver()?;
		let redirect_uri = request.redirect_uri();
		let token = match self.client.exchange_code(code, &redirect_uri).await {
			Ok(token) => token,
			Err(e) =>
				return Ok(self.fail(AuthLeg::Callback, FailureReason::TokenExchange(e), None)),
		};

		match resolver.resolve(&token).await {
			Some(user) => {
				obs::record_auth_outcome(AuthLeg::Callback, AuthOutcome::Success);

				Ok(Outcome::Success(user))
			},
			None => Ok(self.fail(AuthLeg::Callback, FailureReason::UserNotFound, Some(token))),
		}
	}

	fn fail(
		&self,
		leg: AuthLeg,
		reason: FailureReason,
		access_token: Option<AccessToken>,
	) -> Outcome<U> {
		obs::warn_failure(&self.config.provider, &self.key, &reason);
		obs::record_auth_outcome(leg, AuthOutcome::Failure);

		Outcome::Failure(Failure {
			key: self.key.clone(),
			reason,
			context: FailureContext {
				provider: self.config.provider.clone(),
				client_key: self.config.client_key.clone(),
				access_token,
			},
		})
	}
}
#[cfg(feature = "reqwest")]
impl<U> OAuth2Strategy<U>
where
	U: 'static + Send,
{
	/// Builds the strategy with the default reqwest-backed protocol client.
	pub fn with_default_client(
		config: ProviderConfig,
		resolvers: Arc<UserResolverRegistry<U>>,
	) -> Result<Self, ConfigError> {
		let client = ReqwestOAuth2Client::new(&config)?;

		Self::new(config, Arc::new(client), resolvers)
	}
}
impl<U> Strategy<U> for OAuth2Strategy<U>
where
	U: 'static + Send,
{
	fn key(&self) -> &str {
		&self.key
	}

	fn is_applicable(&self, request: &RequestContext) -> bool {
		request.param(&self.params.provider).is_some_and(|value| value == &*self.config.provider)
			|| request.param(&self.params.code).is_some()
	}

	fn authenticate<'a>(&'a self, request: &'a RequestContext) -> StrategyFuture<'a, Outcome<U>> {
		Box::pin(async move {
			// The selector wins when both parameters are present.
			if request.param(&self.params.provider).is_some() {
				let span = AuthSpan::new(&self.config.provider, AuthLeg::Redirect);

				return span.instrument(self.redirect(request)).await;
			}
			if let Some(code) = request.param(&self.params.code) {
				let span = AuthSpan::new(&self.config.provider, AuthLeg::Callback);

				return span.instrument(self.callback(code, request)).await;
			}

			Ok(self.fail(AuthLeg::Callback, FailureReason::MissingParameters, None))
		})
	}

	fn ensure_ready(&self) -> Result<()> {
		self.resolver().map(|_| ())
	}
}
impl<U> Debug for OAuth2Strategy<U>
where
	U: 'static + Send,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Strategy")
			.field("key", &self.key)
			.field("config", &self.config)
			.field("params", &self.params)
			.field("scope", &self.scope)
			.finish()
	}
}
