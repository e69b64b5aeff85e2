//! Optional observability helpers for authentication attempts.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_web_strategy.authenticate` with the
//!   `provider` and `leg` fields, plus warning events for failures.
//! - Enable `metrics` to increment the `oauth2_web_strategy_auth_total` counter for every
//!   attempt/redirect/success/failure, labeled by `leg` + `outcome`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Which half of the authorization code flow a request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthLeg {
	/// Provider selected; the browser is sent to the authorization endpoint.
	Redirect,
	/// Provider called back with a code.
	Callback,
}
impl AuthLeg {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthLeg::Redirect => "redirect",
			AuthLeg::Callback => "callback",
		}
	}
}
impl Display for AuthLeg {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Entry to the strategy.
	Attempt,
	/// Redirect to the provider issued.
	Redirect,
	/// User authenticated.
	Success,
	/// Authentication failed.
	Failure,
}
impl AuthOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOutcome::Attempt => "attempt",
			AuthOutcome::Redirect => "redirect",
			AuthOutcome::Success => "success",
			AuthOutcome::Failure => "failure",
		}
	}
}
impl Display for AuthOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
