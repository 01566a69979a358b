//! Database configuration module for `WellnessBuddy`.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent: existing
//! tables are left alone, which lets the service call [`create_tables`] on every start.

use crate::entities::{
    FinanceBudget, FinanceBudgetColumn, FinanceCategory, FinanceCategoryColumn, FinanceEntry,
    MealEntry, Profile,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
    sea_query::{Index, IndexCreateStatement},
};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/wellness_buddy.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        info!("DATABASE_URL not set, using default: {DEFAULT_DATABASE_URL}");
        DEFAULT_DATABASE_URL.to_string()
    })
}

/// Establishes a connection to the database named by `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(parent) = sqlite_file(&database_url).and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Path of the database file for a file-backed `SQLite` URL.
fn sqlite_file(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next()?;
    (!path.is_empty() && !path.starts_with(':')).then(|| Path::new(path))
}

/// Creates every table the service needs, skipping the ones that already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Profile).await?;
    create_table(db, FinanceCategory).await?;
    create_table(db, FinanceBudget).await?;
    create_table(db, FinanceEntry).await?;
    create_table(db, MealEntry).await?;

    // One category name and one budget per category, per user
    create_index(
        db,
        Index::create()
            .name("idx_finance_categories_user_name")
            .table(FinanceCategory)
            .col(FinanceCategoryColumn::UserId)
            .col(FinanceCategoryColumn::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    create_index(
        db,
        Index::create()
            .name("idx_finance_budgets_user_category")
            .table(FinanceBudget)
            .col(FinanceBudgetColumn::UserId)
            .col(FinanceBudgetColumn::CategoryId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, statement: IndexCreateStatement) -> Result<()> {
    let builder = db.get_database_backend();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    debug!("Ensuring table {}", entity.table_name());
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        FinanceBudgetModel, FinanceCategoryModel, FinanceEntryModel, MealEntryModel, ProfileModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;
        let _: Vec<FinanceCategoryModel> = FinanceCategory::find().limit(1).all(&db).await?;
        let _: Vec<FinanceBudgetModel> = FinanceBudget::find().limit(1).all(&db).await?;
        let _: Vec<FinanceEntryModel> = FinanceEntry::find().limit(1).all(&db).await?;
        let _: Vec<MealEntryModel> = MealEntry::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_category_name_per_user() -> Result<()> {
        use crate::entities::finance_category;
        use sea_orm::{ActiveModelTrait, Set};

        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let category = |user_id: &str| finance_category::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set("Jedzenie".to_string()),
            kind: Set("expense".to_string()),
            color: Set("#F97316".to_string()),
            icon: Set("🛒".to_string()),
            ..Default::default()
        };

        category("user1").insert(&db).await?;
        assert!(category("user1").insert(&db).await.is_err());
        category("user2").insert(&db).await?;

        Ok(())
    }

    #[test]
    fn test_sqlite_file() {
        assert_eq!(
            sqlite_file("sqlite://data/wellness_buddy.sqlite?mode=rwc"),
            Some(Path::new("data/wellness_buddy.sqlite"))
        );
        assert_eq!(sqlite_file("sqlite::memory:"), None);
        assert_eq!(sqlite_file("sqlite://:memory:"), None);
        assert_eq!(sqlite_file("postgres://localhost/db"), None);
    }
}
