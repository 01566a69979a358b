//! Finance category entity - Groups income and expense entries.
//!
//! The `kind` column is `"expense"` or `"income"`; only expense categories
//! take part in budget planning.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finance category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the category
    pub user_id: String,
    /// Display name (e.g., "Groceries", "Salary")
    pub name: String,
    /// `"expense"` or `"income"`
    pub kind: String,
    /// Display colour as `#RRGGBB`
    pub color: String,
    /// Emoji shown next to the name
    pub icon: String,
}

/// Defines relationships between `FinanceCategory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many entries
    #[sea_orm(has_many = "super::finance_entry::Entity")]
    Entries,
    /// One category has at most one budget
    #[sea_orm(has_many = "super::finance_budget::Entity")]
    Budgets,
}

impl Related<super::finance_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl Related<super::finance_budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
