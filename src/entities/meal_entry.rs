//! Meal entry entity - One logged portion of food.
//!
//! Nutrient values are stored already scaled to the logged portion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Meal entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Who ate it
    pub user_id: String,
    /// Food name at the time of logging
    pub name: String,
    /// Portion size in grams
    pub grams: f64,
    /// Energy for the portion
    pub kcal: f64,
    /// Protein for the portion, if known
    pub protein: Option<f64>,
    /// Fat for the portion, if known
    pub fat: Option<f64>,
    /// Carbohydrates for the portion, if known
    pub carbs: Option<f64>,
    /// Barcode of the source product, if any
    pub source_id: Option<String>,
    /// When the portion was logged
    pub logged_at: DateTimeUtc,
}

/// `MealEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
