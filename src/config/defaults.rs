//! Per-user defaults loaded from config.toml
//!
//! The file provides the daily calorie goal used until a user saves their own
//! preferences, and the finance categories seeded the first time a user touches
//! their budget. When the file is absent the built-in defaults apply.

use crate::core::finance::{KIND_EXPENSE, KIND_INCOME};
use crate::errors::{Error, Result};
use crate::theme::parse_hex_color;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Defaults {
    /// Daily calorie goal for users without a saved profile
    #[serde(default = "default_kcal_goal")]
    pub daily_kcal_goal: f64,
    /// Finance categories seeded for new users
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

/// Configuration for a single seeded finance category
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Display name of the category
    pub name: String,
    /// `"expense"` or `"income"`
    pub kind: String,
    /// Display colour as `#RRGGBB`
    pub color: String,
    /// Emoji shown next to the name
    pub icon: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            daily_kcal_goal: default_kcal_goal(),
            categories: default_categories(),
        }
    }
}

const fn default_kcal_goal() -> f64 {
    2000.0
}

fn default_categories() -> Vec<CategoryConfig> {
    [
        ("Jedzenie", "expense", "#F97316", "🛒"),
        ("Mieszkanie", "expense", "#6366F1", "🏠"),
        ("Transport", "expense", "#0EA5E9", "🚌"),
        ("Rozrywka", "expense", "#EC4899", "🎬"),
        ("Wynagrodzenie", "income", "#22C55E", "💼"),
    ]
    .into_iter()
    .map(|(name, kind, color, icon)| CategoryConfig {
        name: name.to_string(),
        kind: kind.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

impl Defaults {
    /// Checks the values serde cannot: a positive goal, known kinds and `#RRGGBB` colours.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if !self.daily_kcal_goal.is_finite() || self.daily_kcal_goal <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "daily_kcal_goal must be a positive number, got {}",
                    self.daily_kcal_goal
                ),
            });
        }

        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(Error::Config {
                    message: "Category name cannot be empty".to_string(),
                });
            }
            if category.kind != KIND_EXPENSE && category.kind != KIND_INCOME {
                return Err(Error::Config {
                    message: format!(
                        "Category '{}' has kind '{}', expected '{KIND_EXPENSE}' or '{KIND_INCOME}'",
                        category.name, category.kind
                    ),
                });
            }
            if parse_hex_color(&category.color).is_none() {
                return Err(Error::Config {
                    message: format!(
                        "Category '{}' has colour '{}', expected #RRGGBB",
                        category.name, category.color
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Parses and validates the contents of a config.toml
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid or a value is out of range.
pub fn parse_defaults(contents: &str) -> Result<Defaults> {
    let defaults: Defaults = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    defaults.validate()?;
    Ok(defaults)
}

/// Loads defaults from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid or a value is out of range.
pub fn load_defaults<P: AsRef<Path>>(path: P) -> Result<Defaults> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_defaults(&contents)
}

/// Loads defaults from ./config.toml, falling back to the built-in ones if the file is missing.
pub fn load_default_config() -> Result<Defaults> {
    let path = Path::new("config.toml");
    if !path.exists() {
        info!("config.toml not found, using built-in defaults");
        return Ok(Defaults::default());
    }
    load_defaults(path)
}
