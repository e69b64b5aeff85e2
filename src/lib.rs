//! OAuth 2.0 web-server login for request-authentication pipelines: validated provider configs,
//! redirect + code-exchange strategies, and pluggable user resolution in one crate.
//!
//! The building blocks, leaves first:
//!
//! - [`config::ProviderConfig`] holds a provider's client credentials and options and refuses
//!   to exist without a client key and secret.
//! - [`oauth::OAuth2Client`] builds authorization URLs and exchanges codes for tokens;
//!   [`oauth::BasicOAuth2Client`] implements it on top of the `oauth2` crate.
//! - [`resolver::UserResolverRegistry`] maps provider names to integrator-supplied user lookups.
//! - [`strategy::OAuth2Strategy`] drives the redirect → exchange → resolve state machine.
//! - [`pipeline::Authenticator`] runs registered strategies in order and short-circuits on the
//!   first decisive outcome.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod pipeline;
pub mod resolver;
pub mod strategy;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
