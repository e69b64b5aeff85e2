// self
use crate::obs::{AuthLeg, AuthOutcome};

/// Records an authentication outcome via the global metrics recorder (when enabled).
pub fn record_auth_outcome(leg: AuthLeg, outcome: AuthOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_web_strategy_auth_total",
			"leg" => leg.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (leg, outcome);
	}
}
