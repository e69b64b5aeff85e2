// self
use oauth2_web_strategy::{
	auth::ProviderName,
	config::{ClientAuthMethod, ProviderConfig},
	error::ConfigError,
	url::Url,
};

fn provider() -> ProviderName {
	ProviderName::new("github").expect("Provider name should be valid for config tests.")
}

#[test]
fn validate_requires_both_key_and_secret() {
	let values = [None, Some(""), Some("   "), Some("value")];

	for key in values {
		for secret in values {
			let mut builder = ProviderConfig::builder(provider());

			if let Some(key) = key {
				builder = builder.client_key(key);
			}
			if let Some(secret) = secret {
				builder = builder.client_secret(secret);
			}

			let expect_ok = key == Some("value") && secret == Some("value");

			assert_eq!(builder.validate().is_ok(), expect_ok, "key={key:?} secret={secret:?}");

			match builder.build() {
				Ok(config) => {
					assert!(expect_ok);
					assert!(config.validate().is_ok());
				},
				Err(err) => {
					assert!(!expect_ok);
					assert!(matches!(
						err,
						ConfigError::MissingClientKey { .. } | ConfigError::MissingClientSecret { .. }
					));
				},
			}
		}
	}
}

#[test]
fn setters_are_last_write_wins_in_any_order() {
	let config = ProviderConfig::builder(provider())
		.client_secret("first-secret")
		.client_key("first-key")
		.client_key("second-key")
		.client_secret("second-secret")
		.build()
		.expect("Config with both credentials should build.");

	assert_eq!(config.client_key, "second-key");
	assert_eq!(config.client_secret().expose(), "second-secret");
}

#[test]
fn json_config_drives_endpoints_and_client_auth() {
	let config = ProviderConfig::from_json_str(
		r#"{
			"provider": "github",
			"client_key": "key",
			"client_secret": "secret",
			"options": {
				"site": "https://github.com",
				"authorize_path": "/login/oauth/authorize",
				"token_url": "https://github.com/login/oauth/access_token",
				"scope": ["user:email", "read:org"],
				"scope_delimiter": ",",
				"client_auth_method": "client_secret_post",
				"authorize_params": { "allow_signup": "false" }
			}
		}"#,
	)
	.expect("GitHub-style JSON config should parse.");
	let endpoints = config.options.endpoints(&config.provider).expect("Endpoints should resolve.");

	assert_eq!(
		endpoints.authorization,
		Url::parse("https://github.com/login/oauth/authorize").expect("URL should parse.")
	);
	assert_eq!(endpoints.token.path(), "/login/oauth/access_token");
	assert_eq!(config.options.client_auth_method, ClientAuthMethod::ClientSecretPost);
	assert_eq!(config.options.scope_delimiter, ',');
	assert_eq!(
		config.options.scope_set().expect("Scopes should be valid.").join(','),
		Some("read:org,user:email".into())
	);
}

#[test]
fn json_config_rejects_unknown_and_invalid_fields() {
	let err = ProviderConfig::from_json_str(
		r#"{"provider":"github","client_key":"k","client_secret":"s","options":{"sight":"x"}}"#,
	)
	.expect_err("Unknown option keys must be rejected.");

	assert!(matches!(err, ConfigError::Parse { .. }));

	let err = ProviderConfig::from_json_str(
		r#"{"provider":"git hub","client_key":"k","client_secret":"s"}"#,
	)
	.expect_err("Provider names cannot contain whitespace.");

	assert!(matches!(err, ConfigError::Parse { .. }));
}
