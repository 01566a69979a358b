//! Unified error types for `WellnessBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Failures coming back
//! from the auth service are not errors here: the forms in [`crate::core::auth`]
//! always turn them into user-facing messages.

use thiserror::Error;

/// Errors produced by configuration, storage, the food database client and the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Amount was negative, zero where not allowed, or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Input text failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with it
        message: String,
    },

    /// No finance category with that name or id for the user
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// The food database has no product for the barcode
    #[error("Product not found")]
    FoodNotFound,

    /// The food database answered with a non-success status
    #[error("Food database responded with status {status}")]
    UpstreamStatus {
        /// HTTP status code returned upstream
        status: u16,
    },

    /// Outbound HTTP failure (connect, timeout, undecodable body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing a response message failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
