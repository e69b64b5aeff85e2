//! User resolvers: the integrator's mapping from an access token to an application user.
//!
//! Resolvers are registered per provider in a [`UserResolverRegistry`] that is shared (via `Arc`)
//! with every strategy built for the pipeline. Tests can hand each pipeline its own registry.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderName},
};

/// Boxed future returned by [`UserResolver::resolve`].
pub type ResolveFuture<'a, U> = Pin<Box<dyn Future<Output = Option<U>> + 'a + Send>>;

/// Looks up the application user an access token belongs to.
///
/// Returning `None` means the token is valid but no user is linked to it yet; the strategy
/// reports that as a failure carrying the token, so sign-up flows can pick it up.
///
/// Plain closures `Fn(&AccessToken) -> Option<U>` implement the trait, so synchronous lookups
/// need no wrapper type.
pub trait UserResolver<U>
where
	Self: Send + Sync,
	U: 'static + Send,
{
	/// Resolves the user for `token`.
	fn resolve<'a>(&'a self, token: &'a AccessToken) -> ResolveFuture<'a, U>;
}
impl<U, F> UserResolver<U> for F
where
	U: 'static + Send,
	F: Send + Sync + Fn(&AccessToken) -> Option<U>,
{
	fn resolve<'a>(&'a self, token: &'a AccessToken) -> ResolveFuture<'a, U> {
		let user = self(token);

		Box::pin(async move { user })
	}
}

/// Provider name → resolver map.
///
/// Registration takes the write lock, so resolvers may be added after serving has started;
/// lookups only take the read lock. Registering twice for the same provider replaces the earlier
/// resolver.
pub struct UserResolverRegistry<U>
where
	U: 'static + Send,
{
	resolvers: RwLock<HashMap<ProviderName, Arc<dyn UserResolver<U>>>>,
}
impl<U> UserResolverRegistry<U>
where
	U: 'static + Send,
{
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self { resolvers: RwLock::new(HashMap::new()) }
	}

	/// Registers `resolver` for `provider`, returning the resolver it replaced, if any.
	pub fn register(
		&self,
		provider: ProviderName,
		resolver: impl 'static + UserResolver<U>,
	) -> Option<Arc<dyn UserResolver<U>>> {
		self.register_shared(provider, Arc::new(resolver))
	}

	/// Registers an already shared resolver for `provider`.
	pub fn register_shared(
		&self,
		provider: ProviderName,
		resolver: Arc<dyn UserResolver<U>>,
	) -> Option<Arc<dyn UserResolver<U>>> {
		#[cfg(feature = "tracing")]
		let name = provider.clone();
		let replaced = self.resolvers.write().insert(provider, resolver);

		#[cfg(feature = "tracing")]
		if replaced.is_some() {
			tracing::warn!(provider = %name, "Replaced the user resolver registered earlier.");
		}

		replaced
	}

	/// Registers a synchronous closure for `provider`.
	pub fn register_fn<F>(
		&self,
		provider: ProviderName,
		resolver: F,
	) -> Option<Arc<dyn UserResolver<U>>>
	where
		F: 'static + Send + Sync + Fn(&AccessToken) -> Option<U>,
	{
		self.register(provider, resolver)
	}

	/// Returns the resolver registered for `provider`.
	pub fn lookup(&self, provider: &str) -> Option<Arc<dyn UserResolver<U>>> {
		self.resolvers.read().get(provider).cloned()
	}

	/// Returns `true` when a resolver is registered for `provider`.
	pub fn contains(&self, provider: &str) -> bool {
		self.resolvers.read().contains_key(provider)
	}

	/// Number of registered resolvers.
	pub fn len(&self) -> usize {
		self.resolvers.read().len()
	}

	/// Returns `true` when no resolver is registered.
	pub fn is_empty(&self) -> bool {
		self.resolvers.read().is_empty()
	}
}
impl<U> Default for UserResolverRegistry<U>
where
	U: 'static + Send,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<U> Debug for UserResolverRegistry<U>
where
	U: 'static + Send,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut providers = self.resolvers.read().keys().cloned().collect::<Vec<_>>();

		providers.sort();

		f.debug_struct("UserResolverRegistry").field("providers", &providers).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn provider(name: &str) -> ProviderName {
		ProviderName::new(name).expect("Provider fixture should be valid.")
	}

	struct TableResolver(HashMap<&'static str, u32>);
	impl UserResolver<u32> for TableResolver {
		fn resolve<'a>(&'a self, token: &'a AccessToken) -> ResolveFuture<'a, u32> {
			Box::pin(async move { self.0.get(token.value()).copied() })
		}
	}

	#[tokio::test]
	async fn closures_and_trait_objects_resolve() {
		let registry = UserResolverRegistry::<u32>::new();

		registry.register_fn(provider("github"), |token: &AccessToken| {
			(token.value() == "known").then_some(7)
		});
		registry.register(provider("gitlab"), TableResolver(HashMap::from([("t-1", 11)])));

		let github = registry.lookup("github").expect("GitHub resolver should be registered.");
		let gitlab = registry.lookup("gitlab").expect("GitLab resolver should be registered.");

		assert_eq!(github.resolve(&AccessToken::new("known")).await, Some(7));
		assert_eq!(github.resolve(&AccessToken::new("unknown")).await, None);
		assert_eq!(gitlab.resolve(&AccessToken::new("t-1")).await, Some(11));
		assert!(registry.lookup("twitter").is_none());
	}

	#[tokio::test]
	async fn last_registration_wins() {
		let registry = UserResolverRegistry::<u32>::new();

		assert!(registry.register_fn(provider("github"), |_: &AccessToken| Some(1)).is_none());
		assert!(registry.register_fn(provider("github"), |_: &AccessToken| Some(2)).is_some());
		assert_eq!(registry.len(), 1);

		let resolver = registry.lookup("github").expect("Resolver should be registered.");

		assert_eq!(resolver.resolve(&AccessToken::new("any")).await, Some(2));
	}

	#[test]
	fn debug_lists_providers_only() {
		let registry = UserResolverRegistry::<u32>::default();

		assert!(registry.is_empty());

		registry.register_fn(provider("twitter"), |_: &AccessToken| None);
		registry.register_fn(provider("github"), |_: &AccessToken| None);

		assert!(registry.contains("github"));
		assert_eq!(
			format!("{registry:?}"),
			"UserResolverRegistry { providers: [Provider(github), Provider(twitter)] }"
		);
	}
}
