//! Request view handed to strategies.

// self
use crate::_prelude::*;

/// Parameter names that select the two legs of the flow.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamNames {
	/// Parameter whose value names the provider to sign in with.
	pub provider: String,
	/// Parameter carrying the authorization code on the provider callback.
	pub code: String,
}
impl ParamNames {
	/// Default provider-selector parameter.
	pub const DEFAULT_PROVIDER: &'static str = "oauth2_provider";
	/// Default authorization code parameter.
	pub const DEFAULT_CODE: &'static str = "code";
}
impl Default for ParamNames {
	fn default() -> Self {
		Self { provider: Self::DEFAULT_PROVIDER.into(), code: Self::DEFAULT_CODE.into() }
	}
}

/// The parts of an incoming request a strategy reads: its URL and its parameters.
///
/// Query and form parameters share one map; the host decides how to merge them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
	url: Url,
	params: HashMap<String, String>,
}
impl RequestContext {
	/// Creates a context for `url` without any parameters.
	pub fn new(url: Url) -> Self {
		Self { url, params: HashMap::new() }
	}

	/// Creates a context whose parameters are the query pairs of `url`.
	///
	/// The first occurrence of a repeated parameter wins.
	pub fn from_url(url: Url) -> Self {
		let mut params = HashMap::new();

		for (key, value) in url.query_pairs() {
			params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
		}

		Self { url, params }
	}

	/// Sets a parameter, replacing an earlier value.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());

		self
	}

	/// Request URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Returns the value of parameter `key`.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}

	/// Site root of the request URL, used as the OAuth2 redirect URI.
	///
	/// Scheme, host, and port are kept; path, query, fragment, and credentials are dropped. Both
	/// legs of a flow derive it from their own request, so they must reach the app under the same
	/// root URL.
	pub fn redirect_uri(&self) -> Url {
		let mut url = self.url.clone();

		url.set_path("/");
		url.set_query(None);
		url.set_fragment(None);
		// Both calls only fail for URLs without a host, which have no credentials to strip.
		let _ = url.set_username("");
		let _ = url.set_password(None);

		url
	}
}
