//! Authentication outcomes reported by strategies.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderName},
	error::ExchangeError,
};

/// Result of one authentication attempt.
#[derive(Debug)]
pub enum Outcome<U> {
	/// Send the browser to the provider and stop evaluating strategies for this request.
	Redirect(Url),
	/// The request is authenticated as this user.
	Success(U),
	/// Authentication failed; see [`Failure`].
	Failure(Failure),
}
impl<U> Outcome<U> {
	/// Returns the failure, if the attempt failed.
	pub fn failure(&self) -> Option<&Failure> {
		match self {
			Self::Failure(failure) => Some(failure),
			_ => None,
		}
	}
}

/// Why an attempt failed.
#[derive(Debug, ThisError)]
pub enum FailureReason {
	/// The protocol client could not exchange the code.
	#[error("token exchange failed")]
	TokenExchange(#[source] ExchangeError),
	/// The token is valid, but no application user is linked to it.
	#[error("user with access token not found")]
	UserNotFound,
	/// The request reached the strategy without a provider selector or a code.
	#[error("request carries no OAuth2 parameters")]
	MissingParameters,
}

/// What is known about the attempt when it failed.
///
/// Sign-up flows can use the provider, client key, and (if the exchange succeeded) the access
/// token to link a new account. The client secret is never included.
#[derive(Clone, Debug)]
pub struct FailureContext {
	/// Provider the attempt ran against.
	pub provider: ProviderName,
	/// OAuth2 client identifier configured for the provider.
	pub client_key: String,
	/// Access token obtained before the failure, if any.
	pub access_token: Option<AccessToken>,
}

/// Failed attempt, attributed to a provider-scoped error key.
#[derive(Debug, ThisError)]
#[error("{reason}")]
pub struct Failure {
	/// Error key, `<provider>_oauth2` for OAuth2 strategies.
	pub key: String,
	/// Failure reason; its `Display` is the human-readable message.
	pub reason: FailureReason,
	/// Context for sign-up flows.
	pub context: FailureContext,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn failure_displays_reason_message() {
		let failure = Failure {
			key: "github_oauth2".into(),
			reason: FailureReason::TokenExchange(ExchangeError::InvalidGrant {
				reason: "bad_verification_code".into(),
			}),
			context: FailureContext {
				provider: ProviderName::new("github").expect("Provider fixture should be valid."),
				client_key: "client-id".into(),
				access_token: None,
			},
		};

		assert_eq!(failure.to_string(), "token exchange failed");
		assert!(StdError::source(&failure.reason).is_some());
		assert_eq!(FailureReason::UserNotFound.to_string(), "user with access token not found");

		let outcome = Outcome::<()>::Failure(failure);

		assert_eq!(outcome.failure().map(|failure| failure.key.as_str()), Some("github_oauth2"));
		assert!(Outcome::<()>::Success(()).failure().is_none());
	}
}
