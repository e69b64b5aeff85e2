//! Wires a GitHub login into an authentication pipeline and walks through both legs of the flow.
//!
//! Set `GITHUB_CLIENT_ID` and `GITHUB_CLIENT_SECRET` to use a real OAuth app. Pass the `code`
//! GitHub appended to the callback URL as `GITHUB_CODE` to run the exchange leg as well.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use oauth2_web_strategy::{
	auth::{AccessToken, ProviderName},
	config::{ClientAuthMethod, ProviderConfig},
	pipeline::{Authenticator, Dispatch},
	resolver::UserResolverRegistry,
	strategy::RequestContext,
	url::Url,
};

#[derive(Debug)]
struct AppUser {
	id: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let github = ProviderName::new("github")?;
	let mut config = ProviderConfig::builder(github.clone())
		.client_key(env::var("GITHUB_CLIENT_ID").unwrap_or_else(|_| "demo-client".into()))
		.client_secret(env::var("GITHUB_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into()))
		.site(Url::parse("https://github.com")?)
		.scope(["read:user", "user:email"])
		.build()?;

	config.options.authorize_path = "/login/oauth/authorize".into();
	config.options.token_path = "/login/oauth/access_token".into();
	config.options.client_auth_method = ClientAuthMethod::ClientSecretPost;

	let resolvers = Arc::new(UserResolverRegistry::new());

	// A real app would look the token up in its user table.
	resolvers.register_fn(github, |token: &AccessToken| {
		token.value().starts_with("gho_").then_some(AppUser { id: 1 })
	});

	let authenticator = Authenticator::builder(resolvers).oauth2(config)?.build()?;
	let login = RequestContext::from_url(Url::parse(
		"http://localhost:3000/session/new?oauth2_provider=github",
	)?);

	if let Dispatch::Redirect { location, .. } = authenticator.authenticate(&login).await? {
		println!("Send the browser to {location}.");
	}

	let Ok(code) = env::var("GITHUB_CODE") else {
		println!("Set GITHUB_CODE to exchange the code GitHub sent back.");

		return Ok(());
	};
	let callback = RequestContext::new(Url::parse("http://localhost:3000/")?).with_param("code", code);

	match authenticator.authenticate(&callback).await? {
		Dispatch::Success { user, .. } => println!("Signed in as user {}.", user.id),
		Dispatch::Failure { failure, errors } => {
			eprintln!("Sign-in failed: {failure} ({errors:?}).");

			if let Some(token) = failure.context.access_token {
				eprintln!("Offer sign-up for a {} account holding {token:?}.", failure.context.provider);
			}
		},
		other => println!("Unexpected dispatch: {other:?}."),
	}

	Ok(())
}
