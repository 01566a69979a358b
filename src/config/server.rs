//! Service configuration loaded from environment variables.
//!
//! Every setting has a default so the service starts with an empty environment;
//! a variable that is set but cannot be parsed is a configuration error.

use crate::errors::{Error, Result};
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

/// Runtime settings for the HTTP API and its outbound clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Port the HTTP API binds to
    pub port: u16,
    /// Base URL of the Open Food Facts compatible food database
    pub food_api_url: String,
    /// Client identifier sent as `User-Agent` on every food database request
    pub food_api_user_agent: String,
    /// Fixed number of records requested per search
    pub search_page_size: u32,
    /// Base URL of the auth service
    pub auth_url: String,
    /// Public API key sent to the auth service
    pub auth_api_key: String,
    /// Where password reset e-mails send the user back to
    pub password_reset_redirect: String,
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_api_key = lookup("AUTH_API_KEY").unwrap_or_else(|| {
            warn!("AUTH_API_KEY not set, auth requests will be unauthenticated");
            String::new()
        });

        Ok(Self {
            port: try_load(&lookup, "API_PORT", "8080")?,
            food_api_url: try_load::<String, _>(
                &lookup,
                "FOOD_API_URL",
                "https://world.openfoodfacts.org",
            )?
            .trim_end_matches('/')
            .to_string(),
            food_api_user_agent: try_load(&lookup, "FOOD_API_USER_AGENT", "WellnessBuddy/0.1")?,
            search_page_size: try_load(&lookup, "FOOD_SEARCH_PAGE_SIZE", "20")?,
            auth_url: try_load::<String, _>(&lookup, "AUTH_URL", "http://localhost:54321")?
                .trim_end_matches('/')
                .to_string(),
            auth_api_key,
            password_reset_redirect: try_load(
                &lookup,
                "PASSWORD_RESET_REDIRECT",
                "http://localhost:5173/reset-password",
            )?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| Error::Config {
            message: format!("Invalid {key} value: {e}"),
        })
}
