//! Finance business logic - categories, entries and the balance widget.
//!
//! Entry amounts are always positive; a category's `kind` decides whether its
//! entries count as income or expense.

use crate::{
    config::defaults::CategoryConfig,
    entities::{FinanceCategory, FinanceEntry, finance_category, finance_entry},
    errors::{Error, Result},
    theme,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use std::collections::HashMap;
use tracing::info;

/// Category kind for spending.
pub const KIND_EXPENSE: &str = "expense";
/// Category kind for earnings.
pub const KIND_INCOME: &str = "income";

/// Income against expense for a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinanceBalance {
    /// Total income
    pub income: f64,
    /// Total expense
    pub expense: f64,
    /// `income - expense`
    pub net: f64,
}

/// Two-slice proportion driving the radial chart, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceShares {
    /// Income slice
    pub income: f64,
    /// Expense slice
    pub expense: f64,
}

impl FinanceBalance {
    /// Derives the widget values from totals.
    #[must_use]
    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }

    /// Neutral state shown when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.income == 0.0 && self.expense == 0.0
    }

    /// Slice sizes for the chart, `None` in the empty state.
    #[must_use]
    pub fn shares(&self) -> Option<BalanceShares> {
        let total = self.income + self.expense;
        if self.is_empty() || total <= 0.0 {
            return None;
        }
        Some(BalanceShares {
            income: self.income * 100.0 / total,
            expense: self.expense * 100.0 / total,
        })
    }
}

/// Retrieves the user's categories ordered by kind, then name.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<finance_category::Model>> {
    FinanceCategory::find()
        .filter(finance_category::Column::UserId.eq(user_id))
        .order_by_asc(finance_category::Column::Kind)
        .order_by_asc(finance_category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the user's categories by name, case-insensitively.
pub async fn find_category_by_name(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<Option<finance_category::Model>> {
    let wanted = name.trim().to_lowercase();
    Ok(list_categories(db, user_id)
        .await?
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted))
}

/// Creates a category after validating its name, kind and colour.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    kind: &str,
    color: &str,
    icon: &str,
) -> Result<finance_category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Category name cannot be empty".to_string(),
        });
    }
    if kind != KIND_EXPENSE && kind != KIND_INCOME {
        return Err(Error::InvalidInput {
            message: format!("Category kind must be '{KIND_EXPENSE}' or '{KIND_INCOME}', got '{kind}'"),
        });
    }
    if theme::parse_hex_color(color).is_none() {
        return Err(Error::InvalidInput {
            message: format!("Colour must look like #RRGGBB, got '{color}'"),
        });
    }
    if find_category_by_name(db, user_id, name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("Category '{name}' already exists"),
        });
    }

    let category = finance_category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        kind: Set(kind.to_string()),
        color: Set(color.to_string()),
        icon: Set(icon.to_string()),
        ..Default::default()
    };

    category.insert(db).await.map_err(Into::into)
}

/// Seeds the configured categories the first time a user has none.
///
/// The check and the inserts share one transaction, and a name the user
/// already has is skipped, so concurrent callers never duplicate a category.
/// Returns the user's categories either way.
pub async fn ensure_default_categories(
    db: &DatabaseConnection,
    user_id: &str,
    seed: &[CategoryConfig],
) -> Result<Vec<finance_category::Model>> {
    let txn = db.begin().await?;

    let existing = FinanceCategory::find()
        .filter(finance_category::Column::UserId.eq(user_id))
        .count(&txn)
        .await?;

    if existing == 0 && !seed.is_empty() {
        let rows = seed.iter().map(|category| finance_category::ActiveModel {
            user_id: Set(user_id.to_string()),
            name: Set(category.name.clone()),
            kind: Set(category.kind.clone()),
            color: Set(category.color.clone()),
            icon: Set(category.icon.clone()),
            ..Default::default()
        });

        let inserted = FinanceCategory::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    finance_category::Column::UserId,
                    finance_category::Column::Name,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        info!("Seeded {inserted} finance categories for user {user_id}");
    }

    txn.commit().await?;
    list_categories(db, user_id).await
}

/// Records an income or expense entry in one of the user's categories.
pub async fn record_entry(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i64,
    amount: f64,
    note: Option<String>,
) -> Result<finance_entry::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let category = FinanceCategory::find_by_id(category_id)
        .one(db)
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;

    let entry = finance_entry::ActiveModel {
        user_id: Set(user_id.to_string()),
        category_id: Set(category.id),
        amount: Set(amount),
        note: Set(note.unwrap_or_default()),
        occurred_at: Set(Utc::now()),
        ..Default::default()
    };

    entry.insert(db).await.map_err(Into::into)
}

/// First instant of the month and of the month after it.
pub(crate) fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || Error::InvalidInput {
        message: format!("Invalid month {year}-{month}"),
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((
        start.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}

/// Retrieves the user's entries for a calendar month, newest first.
pub async fn entries_in_month(
    db: &DatabaseConnection,
    user_id: &str,
    year: i32,
    month: u32,
) -> Result<Vec<finance_entry::Model>> {
    let (start, end) = month_bounds(year, month)?;

    FinanceEntry::find()
        .filter(finance_entry::Column::UserId.eq(user_id))
        .filter(finance_entry::Column::OccurredAt.gte(start))
        .filter(finance_entry::Column::OccurredAt.lt(end))
        .order_by_desc(finance_entry::Column::OccurredAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Income and expense totals for a calendar month.
pub async fn month_balance(
    db: &DatabaseConnection,
    user_id: &str,
    year: i32,
    month: u32,
) -> Result<FinanceBalance> {
    let kinds: HashMap<i64, String> = list_categories(db, user_id)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect();

    let (income, expense) = entries_in_month(db, user_id, year, month)
        .await?
        .iter()
        .fold((0.0, 0.0), |(income, expense), entry| {
            match kinds.get(&entry.category_id).map(String::as_str) {
                Some(KIND_EXPENSE) => (income, expense + entry.amount),
                Some(_) => (income + entry.amount, expense),
                None => (income, expense),
            }
        });

    Ok(FinanceBalance::new(income, expense))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Datelike;

    #[test]
    fn test_balance_net_and_shares() {
        let balance = FinanceBalance::new(3000.0, 1000.0);

        assert_eq!(balance.net, 2000.0);
        assert!(!balance.is_empty());
        let shares = balance.shares().unwrap();
        assert_eq!(shares.income, 75.0);
        assert_eq!(shares.expense, 25.0);
    }

    #[test]
    fn test_balance_shares_are_exact() {
        let shares = FinanceBalance::new(220.0, 180.0).shares().unwrap();
        assert_eq!(shares.income, 55.0);
        assert_eq!(shares.expense, 45.0);
    }

    #[test]
    fn test_balance_negative_net() {
        let balance = FinanceBalance::new(0.0, 450.0);
        assert_eq!(balance.net, -450.0);
        assert_eq!(balance.shares().unwrap().expense, 100.0);
    }

    #[test]
    fn test_balance_empty_state() {
        let balance = FinanceBalance::new(0.0, 0.0);
        assert!(balance.is_empty());
        assert!(balance.shares().is_none());
        assert_eq!(balance.net, 0.0);
    }

    #[test]
    fn test_month_bounds_wraps_year() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert!(month_bounds(2025, 13).is_err());
    }

    #[tokio::test]
    async fn test_create_category_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let empty = create_category(&db, "user1", "  ", KIND_EXPENSE, "#FFFFFF", "x").await;
        assert!(matches!(empty, Err(Error::InvalidInput { .. })));

        let bad_kind = create_category(&db, "user1", "Gifts", "savings", "#FFFFFF", "x").await;
        assert!(matches!(bad_kind, Err(Error::InvalidInput { .. })));

        let bad_color = create_category(&db, "user1", "Gifts", KIND_EXPENSE, "red", "x").await;
        assert!(matches!(bad_color, Err(Error::InvalidInput { .. })));

        let created = create_category(&db, "user1", " Gifts ", KIND_EXPENSE, "#ff00aa", "🎁").await?;
        assert_eq!(created.name, "Gifts");

        let duplicate = create_category(&db, "user1", "gifts", KIND_EXPENSE, "#ff00aa", "🎁").await;
        assert!(matches!(duplicate, Err(Error::InvalidInput { .. })));
        create_category(&db, "user2", "Gifts", KIND_EXPENSE, "#ff00aa", "🎁").await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_default_categories_seeds_once() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = crate::config::defaults::Defaults::default().categories;

        let first = ensure_default_categories(&db, "user1", &seed).await?;
        assert_eq!(first.len(), seed.len());

        let second = ensure_default_categories(&db, "user1", &seed).await?;
        assert_eq!(second, first);

        // Other users are seeded separately
        assert!(list_categories(&db, "user2").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_seeding_stores_each_category_once() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = crate::config::defaults::Defaults::default().categories;

        let (first, second) = tokio::join!(
            ensure_default_categories(&db, "user1", &seed),
            ensure_default_categories(&db, "user1", &seed),
        );
        first?;
        second?;

        let stored = list_categories(&db, "user1").await?;
        assert_eq!(stored.len(), seed.len());
        Ok(())
    }

    #[tokio::test]
    async fn test_seeding_skips_users_with_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let seed = crate::config::defaults::Defaults::default().categories;
        create_test_category(&db, "user1", "Jedzenie", KIND_EXPENSE).await?;

        let categories = ensure_default_categories(&db, "user1", &seed).await?;
        assert_eq!(categories.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_category_by_name_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;

        let found = find_category_by_name(&db, "user1", "groceries").await?;
        assert_eq!(found, Some(created));
        assert!(find_category_by_name(&db, "user2", "groceries").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_record_entry_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;

        for amount in [0.0, -1.0, f64::NAN] {
            let result = record_entry(&db, "user1", category.id, amount, None).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        // Someone else's category is invisible
        let result = record_entry(&db, "user2", category.id, 10.0, None).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_month_balance_splits_by_kind() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;
        let rent = create_test_category(&db, "user1", "Rent", KIND_EXPENSE).await?;
        let salary = create_test_category(&db, "user1", "Salary", KIND_INCOME).await?;

        record_entry(&db, "user1", food.id, 120.5, Some("market".to_string())).await?;
        record_entry(&db, "user1", rent.id, 1500.0, None).await?;
        record_entry(&db, "user1", salary.id, 5000.0, None).await?;

        let now = Utc::now();
        let balance = month_balance(&db, "user1", now.year(), now.month()).await?;
        assert_eq!(balance.income, 5000.0);
        assert_eq!(balance.expense, 1620.5);
        assert_eq!(balance.net, 3379.5);

        let other = month_balance(&db, "user2", now.year(), now.month()).await?;
        assert!(other.is_empty());

        Ok(())
    }
}
