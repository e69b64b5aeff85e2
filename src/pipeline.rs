//! Ordered strategy dispatch.
//!
//! [`Authenticator`] asks each strategy, in registration order, whether it applies to the request.
//! The first applicable strategy decides the request: a redirect stops the pipeline so the browser
//! can be sent to the provider, a success authenticates the request, and a failure is reported
//! together with an [`Errors`] collection keyed by the strategy's error key.

pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	resolver::UserResolverRegistry,
	strategy::{Failure, Outcome, RequestContext, Strategy},
};

/// Error messages grouped by error key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors(BTreeMap<String, Vec<String>>);
impl Errors {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `message` under `key`.
	pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
		self.0.entry(key.into()).or_default().push(message.into());
	}

	/// Messages recorded under `key`.
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.0.get(key).map(Vec::as_slice)
	}

	/// Number of keys with at least one message.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when nothing has been recorded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates keys and their messages in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(key, messages)| (key.as_str(), messages.as_slice()))
	}
}

/// What the pipeline decided for a request.
#[derive(Debug)]
pub enum Dispatch<U> {
	/// Respond with a redirect to `location`; no further strategies ran.
	Redirect {
		/// Key of the strategy that issued the redirect.
		strategy: String,
		/// Provider authorization URL.
		location: Url,
	},
	/// The request is authenticated.
	Success {
		/// Key of the strategy that authenticated the request.
		strategy: String,
		/// Resolved application user.
		user: U,
	},
	/// The deciding strategy failed.
	Failure {
		/// Failure as reported by the strategy.
		failure: Failure,
		/// The failure message recorded under its error key.
		errors: Errors,
	},
	/// No strategy applies to the request.
	NotApplicable,
}

/// Runs registered strategies in order and returns the first decisive outcome.
pub struct Authenticator<U>
where
	U: 'static + Send,
{
	strategies: Vec<Arc<dyn Strategy<U>>>,
}
impl<U> Authenticator<U>
where
	U: 'static + Send,
{
	/// Starts building a pipeline whose OAuth2 strategies share `resolvers`.
	pub fn builder(resolvers: Arc<UserResolverRegistry<U>>) -> AuthenticatorBuilder<U> {
		AuthenticatorBuilder::new(resolvers)
	}

	/// Keys of the registered strategies, in dispatch order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.strategies.iter().map(|strategy| strategy.key())
	}

	/// Authenticates `request`.
	///
	/// Request-time failures come back as [`Dispatch::Failure`]; `Err` is reserved for setup
	/// problems discovered on first use, such as a resolver that was never registered.
	pub async fn authenticate(&self, request: &RequestContext) -> Result<Dispatch<U>> {
		let Some(strategy) = self.strategies.iter().find(|strategy| strategy.is_applicable(request))
		else {
			return Ok(Dispatch::NotApplicable);
		};
		let key = strategy.key().to_owned();
		let dispatch = match strategy.authenticate(request).await? {
			Outcome::Redirect(location) => Dispatch::Redirect { strategy: key, location },
			Outcome::Success(user) => Dispatch::Success { strategy: key, user },
			Outcome::Failure(failure) => {
				let mut errors = Errors::new();

				errors.add(failure.key.clone(), failure.to_string());

				Dispatch::Failure { failure, errors }
			},
		};

		Ok(dispatch)
	}
}
impl<U> Debug for Authenticator<U>
where
	U: 'static + Send,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("strategies", &self.keys().collect::<Vec<_>>()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::strategy::StrategyFuture;

	struct Fixed {
		key: &'static str,
		trigger: &'static str,
		user: u32,
	}
	impl Strategy<u32> for Fixed {
		fn key(&self) -> &str {
			self.key
		}

		fn is_applicable(&self, request: &RequestContext) -> bool {
			request.param(self.trigger).is_some()
		}

		fn authenticate<'a>(
			&'a self,
			_: &'a RequestContext,
		) -> StrategyFuture<'a, Outcome<u32>> {
			Box::pin(async move { Ok(Outcome::Success(self.user)) })
		}
	}

	fn request(query: &str) -> RequestContext {
		RequestContext::from_url(
			Url::parse(&format!("https://app.example.com/?{query}"))
				.expect("Request URL fixture should parse."),
		)
	}

	fn authenticator() -> Authenticator<u32> {
		let first: Arc<dyn Strategy<u32>> = Arc::new(Fixed { key: "first", trigger: "a", user: 1 });
		let second: Arc<dyn Strategy<u32>> =
			Arc::new(Fixed { key: "second", trigger: "b", user: 2 });

		Authenticator { strategies: vec![first, second] }
	}

	#[tokio::test]
	async fn first_applicable_strategy_decides() {
		let authenticator = authenticator();
		let dispatch = authenticator
			.authenticate(&request("a=1&b=1"))
			.await
			.expect("Fixed strategies should not error.");

		assert!(matches!(dispatch, Dispatch::Success { ref strategy, user: 1 } if strategy == "first"));

		let dispatch = authenticator
			.authenticate(&request("b=1"))
			.await
			.expect("Fixed strategies should not error.");

		assert!(matches!(dispatch, Dispatch::Success { user: 2, .. }));
	}

	#[tokio::test]
	async fn unmatched_request_is_not_applicable() {
		let dispatch = authenticator()
			.authenticate(&request("c=1"))
			.await
			.expect("Fixed strategies should not error.");

		assert!(matches!(dispatch, Dispatch::NotApplicable));
	}

	#[test]
	fn errors_group_messages_by_key() {
		let mut errors = Errors::new();

		assert!(errors.is_empty());

		errors.add("github_oauth2", "token exchange failed");
		errors.add("github_oauth2", "user with access token not found");
		errors.add("twitter_oauth2", "token exchange failed");

		assert_eq!(errors.len(), 2);
		assert_eq!(errors.get("github_oauth2").map(<[String]>::len), Some(2));
		assert_eq!(errors.iter().next().map(|(key, _)| key), Some("github_oauth2"));
		assert_eq!(
			serde_json::to_string(&errors).expect("Errors should serialize."),
			"{\"github_oauth2\":[\"token exchange failed\",\"user with access token not found\"],\"twitter_oauth2\":[\"token exchange failed\"]}"
		);
	}

	#[test]
	fn debug_lists_strategy_keys() {
		assert_eq!(
			format!("{:?}", authenticator()),
			"Authenticator { strategies: [\"first\", \"second\"] }"
		);
	}
}
