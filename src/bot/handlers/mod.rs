//! Discord interaction handlers
//!
//! Handlers for interactions that are not commands themselves, such as
//! parameter autocomplete.

/// Autocomplete handlers for category names and kinds
pub mod autocomplete;
