//! Access tokens obtained from a code exchange.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Secret},
};

/// Bearer token returned by the provider's token endpoint.
///
/// Tokens live for the duration of one authentication attempt. They are handed to the user
/// resolver and, on failure, to the integrator through the failure context; the crate itself
/// never stores them.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
	value: Secret,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Lifetime reported by the provider via `expires_in`.
	pub expires_in: Option<Duration>,
	/// Scopes the provider reported as granted, when it echoed them back.
	pub scope: Option<ScopeSet>,
}
impl AccessToken {
	/// Wraps a bare token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: Secret::new(value), refresh_token: None, expires_in: None, scope: None }
	}

	/// Returns the raw bearer value. Callers must avoid logging this string.
	pub fn value(&self) -> &str {
		self.value.expose()
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(refresh_token));

		self
	}

	/// Attaches the provider-reported lifetime.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Attaches the provider-reported scope.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = Some(scope);

		self
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("value", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_token_material() {
		let token = AccessToken::new("gho_live")
			.with_refresh_token("ghr_live")
			.with_expires_in(Duration::hours(8));
		let rendered = format!("{token:?}");

		assert_eq!(token.value(), "gho_live");
		assert!(!rendered.contains("gho_live"));
		assert!(!rendered.contains("ghr_live"));
		assert!(rendered.contains("<redacted>"));
	}
}
