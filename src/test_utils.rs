//! Shared test utilities for `WellnessBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        finance,
        food::{FOOD_SOURCE, FoodItem},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category with sensible defaults.
///
/// # Defaults
/// * `color`: `"#336699"`
/// * `icon`: `"🏷️"`
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    kind: &str,
) -> Result<entities::finance_category::Model> {
    finance::create_category(db, user_id, name, kind, "#336699", "🏷️").await
}

/// Builds a food item with only a name and energy value.
///
/// # Defaults
/// * `source_id`: `"0000000000000"`
#[must_use]
pub fn test_food_item(name: &str, kcal_per_100g: f64) -> FoodItem {
    FoodItem {
        name: name.to_string(),
        brand: None,
        kcal_per_100g: Some(kcal_per_100g),
        protein_per_100g: None,
        fat_per_100g: None,
        carbs_per_100g: None,
        image_url: None,
        source: FOOD_SOURCE,
        source_id: Some("0000000000000".to_string()),
    }
}
