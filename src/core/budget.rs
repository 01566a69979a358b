//! Budget planner - per-category monthly limits with single-row inline editing.
//!
//! The planner only holds the transient edit buffer: which category is being
//! edited and the text typed so far. Persisting a limit goes through a
//! [`BudgetStore`] supplied by the caller.

use crate::{
    core::finance::{self, KIND_EXPENSE},
    entities::{FinanceBudget, FinanceCategory, finance_budget, finance_category},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use std::{collections::HashMap, future::Future};
use tracing::debug;

/// Persists a category limit on behalf of the planner.
pub trait BudgetStore {
    /// Saves `amount` as the limit for `category_id`.
    fn save_budget(
        &self,
        user_id: &str,
        category_id: i64,
        amount: f64,
    ) -> impl Future<Output = Result<finance_budget::Model>> + Send;
}

impl BudgetStore for DatabaseConnection {
    fn save_budget(
        &self,
        user_id: &str,
        category_id: i64,
        amount: f64,
    ) -> impl Future<Output = Result<finance_budget::Model>> + Send {
        upsert_budget(self, user_id, category_id, amount)
    }
}

/// Parses typed budget text. Accepts a decimal comma; rejects negatives and anything non-finite.
#[must_use]
pub fn parse_budget_amount(input: &str) -> Option<f64> {
    let amount: f64 = input.trim().replace(',', ".").parse().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// The row currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    /// Category whose limit is being edited
    pub category_id: i64,
    /// Text typed so far
    pub pending: String,
}

/// Result of [`BudgetPlanner::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The store accepted the new limit and the buffer was closed
    Saved(finance_budget::Model),
    /// The text was not a valid amount; nothing was sent and the buffer stays open
    Rejected,
    /// No row was being edited
    NotEditing,
}

/// Inline editor for one category limit at a time.
#[derive(Debug, Clone, Default)]
pub struct BudgetPlanner {
    editing: Option<EditBuffer>,
}

impl BudgetPlanner {
    /// A planner with nothing open.
    #[must_use]
    pub const fn new() -> Self {
        Self { editing: None }
    }

    /// The open edit buffer, if any.
    #[must_use]
    pub const fn editing(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    /// Opens `category_id` for editing, prefilled with its current limit.
    ///
    /// Any other open row is discarded.
    pub fn begin_edit(&mut self, category_id: i64, current: Option<f64>) {
        self.editing = Some(EditBuffer {
            category_id,
            pending: current.map(|a| a.to_string()).unwrap_or_default(),
        });
    }

    /// Replaces the typed text of the open row.
    pub fn set_pending(&mut self, text: impl Into<String>) {
        if let Some(buffer) = self.editing.as_mut() {
            buffer.pending = text.into();
        }
    }

    /// Closes the open row without saving.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Saves the open row through `store`.
    ///
    /// Invalid text is refused without calling the store. A store failure is
    /// returned as an error and leaves the row open.
    pub async fn save<S: BudgetStore>(&mut self, store: &S, user_id: &str) -> Result<SaveOutcome> {
        let Some(buffer) = self.editing.as_ref() else {
            return Ok(SaveOutcome::NotEditing);
        };
        let Some(amount) = parse_budget_amount(&buffer.pending) else {
            debug!("Refusing budget text {:?}", buffer.pending);
            return Ok(SaveOutcome::Rejected);
        };

        let saved = store
            .save_budget(user_id, buffer.category_id, amount)
            .await?;
        self.editing = None;
        Ok(SaveOutcome::Saved(saved))
    }
}

/// Creates or updates the limit for one of the user's expense categories.
pub async fn upsert_budget(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i64,
    amount: f64,
) -> Result<finance_budget::Model> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    let category = FinanceCategory::find_by_id(category_id)
        .one(&txn)
        .await?
        .filter(|c| c.user_id == user_id && c.kind == KIND_EXPENSE)
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;

    let row = finance_budget::ActiveModel {
        user_id: Set(user_id.to_string()),
        category_id: Set(category.id),
        amount: Set(amount),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    FinanceBudget::insert(row)
        .on_conflict(
            OnConflict::columns([
                finance_budget::Column::UserId,
                finance_budget::Column::CategoryId,
            ])
            .update_columns([finance_budget::Column::Amount, finance_budget::Column::UpdatedAt])
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let saved = FinanceBudget::find()
        .filter(finance_budget::Column::UserId.eq(user_id))
        .filter(finance_budget::Column::CategoryId.eq(category.id))
        .one(&txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("budget for category {}", category.id)))?;

    txn.commit().await?;
    Ok(saved)
}

/// One line of the planner table.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRow {
    /// The expense category
    pub category: finance_category::Model,
    /// Monthly limit, if one was set
    pub limit: Option<f64>,
    /// Spent in the month being viewed
    pub spent: f64,
}

impl BudgetRow {
    /// Share of the limit used, in percent. `None` without a positive limit.
    #[must_use]
    pub fn used_percent(&self) -> Option<f64> {
        self.limit
            .filter(|l| *l > 0.0)
            .map(|l| self.spent * 100.0 / l)
    }

    /// Whether spending went past the limit.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.limit.is_some_and(|l| self.spent > l)
    }
}

/// Planner rows for the user's expense categories in a calendar month.
pub async fn budget_rows(
    db: &DatabaseConnection,
    user_id: &str,
    year: i32,
    month: u32,
) -> Result<Vec<BudgetRow>> {
    let limits: HashMap<i64, f64> = FinanceBudget::find()
        .filter(finance_budget::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.category_id, b.amount))
        .collect();

    let mut spent: HashMap<i64, f64> = HashMap::new();
    for entry in finance::entries_in_month(db, user_id, year, month).await? {
        *spent.entry(entry.category_id).or_default() += entry.amount;
    }

    Ok(finance::list_categories(db, user_id)
        .await?
        .into_iter()
        .filter(|c| c.kind == KIND_EXPENSE)
        .map(|category| BudgetRow {
            limit: limits.get(&category.id).copied(),
            spent: spent.get(&category.id).copied().unwrap_or_default(),
            category,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::finance::KIND_INCOME, test_utils::*};
    use chrono::Datelike;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    /// Records every call instead of persisting.
    #[derive(Default)]
    struct RecordingStore {
        calls: AtomicUsize,
        last: Mutex<Option<(String, i64, f64)>>,
    }

    impl BudgetStore for RecordingStore {
        async fn save_budget(
            &self,
            user_id: &str,
            category_id: i64,
            amount: f64,
        ) -> Result<finance_budget::Model> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((user_id.to_string(), category_id, amount));
            Ok(finance_budget::Model {
                id: 1,
                user_id: user_id.to_string(),
                category_id,
                amount,
                updated_at: Utc::now(),
            })
        }
    }

    #[test]
    fn test_parse_budget_amount() {
        assert_eq!(parse_budget_amount("250"), Some(250.0));
        assert_eq!(parse_budget_amount(" 99.5 "), Some(99.5));
        assert_eq!(parse_budget_amount("12,75"), Some(12.75));
        assert_eq!(parse_budget_amount("0"), Some(0.0));
        assert_eq!(parse_budget_amount("-1"), None);
        assert_eq!(parse_budget_amount("abc"), None);
        assert_eq!(parse_budget_amount(""), None);
        assert_eq!(parse_budget_amount("inf"), None);
        assert_eq!(parse_budget_amount("NaN"), None);
    }

    #[test]
    fn test_begin_edit_replaces_open_row() {
        let mut planner = BudgetPlanner::new();
        planner.begin_edit(1, Some(300.0));
        assert_eq!(planner.editing().unwrap().pending, "300");

        planner.begin_edit(2, None);
        let buffer = planner.editing().unwrap();
        assert_eq!(buffer.category_id, 2);
        assert_eq!(buffer.pending, "");

        planner.cancel();
        assert!(planner.editing().is_none());
    }

    #[tokio::test]
    async fn test_save_valid_amount_calls_store_and_closes() -> Result<()> {
        let store = RecordingStore::default();
        let mut planner = BudgetPlanner::new();
        planner.begin_edit(7, None);
        planner.set_pending("450,50");

        let outcome = planner.save(&store, "user1").await?;

        assert!(matches!(outcome, SaveOutcome::Saved(ref b) if b.amount == 450.5));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *store.last.lock().unwrap(),
            Some(("user1".to_string(), 7, 450.5))
        );
        assert!(planner.editing().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_invalid_amount_never_calls_store() -> Result<()> {
        let store = RecordingStore::default();
        let mut planner = BudgetPlanner::new();
        planner.begin_edit(7, Some(100.0));

        for text in ["-20", "sto", ""] {
            planner.set_pending(text);
            assert_eq!(planner.save(&store, "user1").await?, SaveOutcome::Rejected);
        }

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert_eq!(planner.editing().unwrap().category_id, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_without_open_row() -> Result<()> {
        let store = RecordingStore::default();
        let mut planner = BudgetPlanner::new();

        assert_eq!(planner.save(&store, "user1").await?, SaveOutcome::NotEditing);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_budget_updates_in_place() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;

        let first = upsert_budget(&db, "user1", category.id, 800.0).await?;
        let second = upsert_budget(&db, "user1", category.id, 650.0).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, 650.0);
        assert_eq!(FinanceBudget::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_upserts_keep_one_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;

        let (first, second) = tokio::join!(
            upsert_budget(&db, "user1", category.id, 300.0),
            upsert_budget(&db, "user1", category.id, 400.0),
        );
        first?;
        second?;

        let budgets = FinanceBudget::find().all(&db).await?;
        assert_eq!(budgets.len(), 1);
        assert!(budgets[0].amount == 300.0 || budgets[0].amount == 400.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_budget_rejects_income_and_foreign_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let salary = create_test_category(&db, "user1", "Salary", KIND_INCOME).await?;
        let groceries = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;

        let income = upsert_budget(&db, "user1", salary.id, 100.0).await;
        assert!(matches!(income, Err(Error::CategoryNotFound { .. })));

        let foreign = upsert_budget(&db, "user2", groceries.id, 100.0).await;
        assert!(matches!(foreign, Err(Error::CategoryNotFound { .. })));

        let negative = upsert_budget(&db, "user1", groceries.id, -1.0).await;
        assert!(matches!(negative, Err(Error::InvalidAmount { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_planner_saves_through_database() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "user1", "Transport", KIND_EXPENSE).await?;

        let mut planner = BudgetPlanner::new();
        planner.begin_edit(category.id, None);
        planner.set_pending("120");
        let outcome = planner.save(&db, "user1").await?;

        assert!(matches!(outcome, SaveOutcome::Saved(ref b) if b.category_id == category.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_rows_only_expense_with_spent() -> Result<()> {
        let db = setup_test_db().await?;
        let groceries = create_test_category(&db, "user1", "Groceries", KIND_EXPENSE).await?;
        let fun = create_test_category(&db, "user1", "Fun", KIND_EXPENSE).await?;
        let salary = create_test_category(&db, "user1", "Salary", KIND_INCOME).await?;

        upsert_budget(&db, "user1", groceries.id, 200.0).await?;
        finance::record_entry(&db, "user1", groceries.id, 150.0, None).await?;
        finance::record_entry(&db, "user1", groceries.id, 100.0, None).await?;
        finance::record_entry(&db, "user1", salary.id, 4000.0, None).await?;

        let now = Utc::now();
        let rows = budget_rows(&db, "user1", now.year(), now.month()).await?;

        assert_eq!(rows.len(), 2);
        let fun_row = rows.iter().find(|r| r.category.id == fun.id).unwrap();
        assert_eq!(fun_row.limit, None);
        assert_eq!(fun_row.spent, 0.0);
        assert_eq!(fun_row.used_percent(), None);

        let groceries_row = rows.iter().find(|r| r.category.id == groceries.id).unwrap();
        assert_eq!(groceries_row.limit, Some(200.0));
        assert_eq!(groceries_row.spent, 250.0);
        assert_eq!(groceries_row.used_percent(), Some(125.0));
        assert!(groceries_row.is_over());
        Ok(())
    }

    #[test]
    fn test_used_percent_is_exact() {
        let row = BudgetRow {
            category: finance_category::Model {
                id: 1,
                user_id: "user1".to_string(),
                name: "Groceries".to_string(),
                kind: KIND_EXPENSE.to_string(),
                color: "#F97316".to_string(),
                icon: "🛒".to_string(),
            },
            limit: Some(2000.0),
            spent: 1100.0,
        };
        assert_eq!(row.used_percent(), Some(55.0));
        assert!(!row.is_over());
    }
}
