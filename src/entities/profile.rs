//! Profile entity - Per-user preferences for the nutrition dashboard.
//!
//! One row per user, keyed by the identity the user signed in with
//! (auth service user id or Discord user id).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Identity of the user owning this profile
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Name shown on dashboards
    pub display_name: Option<String>,
    /// Daily calorie goal in kcal
    pub daily_kcal_goal: f64,
    /// Preferred interface language (e.g. `"pl"`)
    pub language: String,
    /// When the preferences were last saved
    pub updated_at: DateTimeUtc,
}

/// `Profile` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
