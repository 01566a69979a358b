//! Finance entry entity - A single income or expense.
//!
//! Amounts are always positive; whether an entry counts as income or expense
//! comes from the `kind` of its category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finance entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the entry
    pub user_id: String,
    /// Category the entry is filed under
    pub category_id: i64,
    /// Positive amount
    pub amount: f64,
    /// Free-text note
    pub note: String,
    /// When the money moved
    pub occurred_at: DateTimeUtc,
}

/// Defines relationships between `FinanceEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one category
    #[sea_orm(
        belongs_to = "super::finance_category::Entity",
        from = "Column::CategoryId",
        to = "super::finance_category::Column::Id"
    )]
    Category,
}

impl Related<super::finance_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
