//! Strongly typed provider names.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Provider name cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Provider name `{name}` contains whitespace.")]
	ContainsWhitespace {
		/// Offending name.
		name: String,
	},
	/// The identifier exceeded the allowed character count.
	#[error("Provider name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Name a provider is registered under (`github`, `twitter`, ...).
///
/// The same value is matched against the provider-selector request parameter, keys the user
/// resolver registry, and prefixes the provider's error key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderName(String);
impl ProviderName {
	/// Creates a new provider name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Key failures for this provider are recorded under (`<provider>_oauth2`).
	pub fn error_key(&self) -> String {
		format!("{}_oauth2", self.0)
	}
}
impl Deref for ProviderName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ProviderName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ProviderName> for String {
	fn from(value: ProviderName) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderName {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl TryFrom<&str> for ProviderName {
	type Error = IdentifierError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ProviderName {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Provider({})", self.0)
	}
}
impl Display for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { name: view.to_owned() });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_validate() {
		assert!(ProviderName::new("").is_err());
		assert!(ProviderName::new(" github").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderName::new(format!("git{}hub", '\u{00A0}')).is_err());
		assert!(ProviderName::new("a".repeat(IDENTIFIER_MAX_LEN + 1)).is_err());

		let name = ProviderName::new("github").expect("Provider fixture should be valid.");

		assert_eq!(name.as_ref(), "github");
		assert_eq!(format!("{name:?}"), "Provider(github)");
	}

	#[test]
	fn error_key_is_provider_scoped() {
		let name = ProviderName::new("twitter").expect("Provider fixture should be valid.");

		assert_eq!(name.error_key(), "twitter_oauth2");
	}

	#[test]
	fn serde_enforces_validation_and_borrow_allows_str_lookup() {
		let name: ProviderName =
			serde_json::from_str("\"github\"").expect("Provider name should deserialize.");

		assert!(serde_json::from_str::<ProviderName>("\"with space\"").is_err());

		let map = HashMap::from([(name, 7_u8)]);

		assert_eq!(map.get("github"), Some(&7));
	}
}
