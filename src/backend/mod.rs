//! Remote backend clients.
//!
//! Identity lives in an external GoTrue-compatible service; this module holds
//! the typed client for it.

/// GoTrue REST client implementing [`crate::core::auth::AuthBackend`]
pub mod gotrue;

pub use gotrue::GoTrueClient;
