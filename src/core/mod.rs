//! Core business logic - framework-agnostic nutrition, finance and auth operations.
//!
//! Both the HTTP API and the Discord bot are thin layers over these modules.

/// Login, registration, password reset and preferences forms
pub mod auth;
/// Budget planner and per-category limits
pub mod budget;
/// Calorie progress widget and meal logging
pub mod calories;
/// Finance categories, entries and the balance widget
pub mod finance;
/// Food items and Open Food Facts transcription
pub mod food;
/// Outbound food database client
pub mod lookup;
/// Per-user preferences storage
pub mod profile;
