/// Database configuration and connection management
pub mod database;

/// Per-user defaults (calorie goal, seeded categories) from config.toml
pub mod defaults;

/// HTTP API and outbound client settings from environment variables
pub mod server;
