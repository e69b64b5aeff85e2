//! Request-authentication strategies and the OAuth2 web-server strategy.
//!
//! A [`Strategy`] answers two questions per request: whether it applies, and (if so) what the
//! outcome of authenticating the request is. Request-time problems become [`Outcome::Failure`];
//! only setup problems such as a missing user resolver are returned as `Err`.

pub mod outcome;
pub mod request;
pub mod web;

pub use outcome::*;
pub use request::*;
pub use web::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`Strategy::authenticate`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Applicability check plus one authentication attempt.
pub trait Strategy<U>
where
	Self: Send + Sync,
	U: 'static + Send,
{
	/// Unique key the strategy is registered under; failures are recorded under it as well.
	fn key(&self) -> &str;

	/// Returns `true` when the request is addressed to this strategy.
	fn is_applicable(&self, request: &RequestContext) -> bool;

	/// Authenticates an applicable request.
	fn authenticate<'a>(&'a self, request: &'a RequestContext) -> StrategyFuture<'a, Outcome<U>>;

	/// Verifies collaborators the strategy needs at request time are in place.
	///
	/// Called once when the pipeline is built.
	fn ensure_ready(&self) -> Result<()> {
		Ok(())
	}
}
