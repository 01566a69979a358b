//! Finance budget entity - Monthly spending limit for one expense category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Finance budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance_budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the budget
    pub user_id: String,
    /// Category this limit applies to
    pub category_id: i64,
    /// Monthly limit
    pub amount: f64,
    /// When the limit was last saved
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `FinanceBudget` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one category
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
