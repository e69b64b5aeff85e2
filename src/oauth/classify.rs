//! Token endpoint error classification.
//!
//! Structured OAuth fields (`error`, `error_description`) win, then textual hints in the
//! description, and finally the HTTP status code.

/// Canonical categories for token endpoint errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeErrorKind {
	/// Provider rejected the authorization code.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Requested scopes exceed what the token covers.
	InsufficientScope,
	/// Failure is temporary.
	Transient,
}

/// Classifies a token endpoint error response.
pub fn classify_token_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
	http_status: Option<u16>,
) -> ExchangeErrorKind {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_text(error_description))
		.unwrap_or_else(|| classify_status(http_status))
}

fn match_exact_value(value: &str) -> Option<ExchangeErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ExchangeErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ExchangeErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ExchangeErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ExchangeErrorKind::Transient)
	} else {
		None
	}
}

fn classify_text(text: Option<&str>) -> Option<ExchangeErrorKind> {
	let lowered = text?.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") || text.contains("bad_verification_code") =>
			Some(ExchangeErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ExchangeErrorKind::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ExchangeErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ExchangeErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ExchangeErrorKind {
	match status {
		Some(400 | 404 | 410) => ExchangeErrorKind::InvalidGrant,
		Some(401) => ExchangeErrorKind::InvalidClient,
		Some(403) => ExchangeErrorKind::InsufficientScope,
		_ => ExchangeErrorKind::Transient,
	}
}
