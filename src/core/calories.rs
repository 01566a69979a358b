//! Calorie tracking business logic.
//!
//! Provides the daily progress widget calculation and meal logging. The progress
//! values are derived fresh from `consumed` and `goal` every time; nothing about
//! them is stored.

use crate::{
    core::{food::FoodItem, profile},
    entities::{MealEntry, meal_entry},
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeDelta, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Label shown while the goal has not been exceeded.
pub const REMAINING_LABEL: &str = "Pozostało";
/// Label shown once the goal has been exceeded.
pub const SURPLUS_LABEL: &str = "Nadwyżka";

/// Whether the day is still under goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// `consumed <= goal`
    Remaining,
    /// `consumed > goal`
    Surplus,
}

/// Calorie progress for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieProgress {
    /// kcal eaten so far
    pub consumed: f64,
    /// Daily goal in kcal
    pub goal: f64,
    /// `consumed / goal * 100`, not clamped; 0 when the goal is not positive
    pub percent: f64,
    /// `percent` clamped to 0..=100, used for the ring fill only
    pub fill_percent: f64,
    /// `goal - consumed`, negative once over goal
    pub remaining: f64,
    /// Which label applies
    pub status: ProgressStatus,
}

impl CalorieProgress {
    /// Derives the widget values from consumed and goal kcal.
    #[must_use]
    pub fn new(consumed: f64, goal: f64) -> Self {
        let percent = if goal > 0.0 {
            consumed * 100.0 / goal
        } else {
            0.0
        };
        let remaining = goal - consumed;
        let status = if remaining >= 0.0 {
            ProgressStatus::Remaining
        } else {
            ProgressStatus::Surplus
        };

        Self {
            consumed,
            goal,
            percent,
            fill_percent: percent.clamp(0.0, 100.0),
            remaining,
            status,
        }
    }

    /// "Pozostało" or "Nadwyżka".
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.status {
            ProgressStatus::Remaining => REMAINING_LABEL,
            ProgressStatus::Surplus => SURPLUS_LABEL,
        }
    }

    /// The number under the label: `800` while remaining, `+200` once over.
    #[must_use]
    pub fn display_amount(&self) -> String {
        match self.status {
            ProgressStatus::Remaining => format!("{:.0}", self.remaining),
            ProgressStatus::Surplus => format!("+{:.0}", self.remaining.abs()),
        }
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based bar like: `[████████░░] 80.0%`. The bar is filled from
/// `fill_percent`; the number printed is the unclamped percentage.
#[must_use]
pub fn format_progress_bar(progress: &CalorieProgress, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);

    // fill_percent ∈ [0, 100] and length is small, so the result is in [0, length].
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((progress.fill_percent / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        progress.percent
    )
}

/// Logs a portion of `food` for the user, scaling its nutrients to `grams`.
pub async fn log_meal(
    db: &DatabaseConnection,
    user_id: &str,
    food: &FoodItem,
    grams: f64,
) -> Result<meal_entry::Model> {
    if !grams.is_finite() || grams <= 0.0 {
        return Err(Error::InvalidAmount { amount: grams });
    }

    let portion = food.portion(grams);
    let entry = meal_entry::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(food.name.clone()),
        grams: Set(grams),
        kcal: Set(portion.kcal),
        protein: Set(portion.protein),
        fat: Set(portion.fat),
        carbs: Set(portion.carbs),
        source_id: Set(food.source_id.clone()),
        logged_at: Set(Utc::now()),
        ..Default::default()
    };

    entry.insert(db).await.map_err(Into::into)
}

/// Retrieves the user's meals logged on the given UTC day, oldest first.
pub async fn meals_on(
    db: &DatabaseConnection,
    user_id: &str,
    day: NaiveDate,
) -> Result<Vec<meal_entry::Model>> {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start + TimeDelta::days(1);

    MealEntry::find()
        .filter(meal_entry::Column::UserId.eq(user_id))
        .filter(meal_entry::Column::LoggedAt.gte(start))
        .filter(meal_entry::Column::LoggedAt.lt(end))
        .order_by_asc(meal_entry::Column::LoggedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Total kcal the user logged on the given UTC day.
pub async fn consumed_on(db: &DatabaseConnection, user_id: &str, day: NaiveDate) -> Result<f64> {
    let meals = meals_on(db, user_id, day).await?;
    Ok(meals.iter().map(|m| m.kcal).sum())
}

/// Progress for the given day against the user's saved goal, or `default_goal` without a profile.
pub async fn daily_progress(
    db: &DatabaseConnection,
    user_id: &str,
    day: NaiveDate,
    default_goal: f64,
) -> Result<CalorieProgress> {
    let goal = profile::get_profile(db, user_id)
        .await?
        .map_or(default_goal, |p| p.daily_kcal_goal);
    let consumed = consumed_on(db, user_id, day).await?;

    Ok(CalorieProgress::new(consumed, goal))
}
