//! Profile business logic - read and upsert of per-user preferences.

use crate::{
    entities::{Profile, profile},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

/// Finds the profile for a user, returning None if it has never been saved.
pub async fn get_profile(db: &DatabaseConnection, user_id: &str) -> Result<Option<profile::Model>> {
    Profile::find_by_id(user_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates or replaces the user's preferences.
///
/// The goal must be a positive, finite number of kcal.
pub async fn upsert_profile(
    db: &DatabaseConnection,
    user_id: &str,
    display_name: Option<String>,
    daily_kcal_goal: f64,
    language: &str,
) -> Result<profile::Model> {
    if !daily_kcal_goal.is_finite() || daily_kcal_goal <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: daily_kcal_goal,
        });
    }

    let display_name = display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let model = profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        display_name: Set(display_name),
        daily_kcal_goal: Set(daily_kcal_goal),
        language: Set(language.to_string()),
        updated_at: Set(Utc::now()),
    };

    if get_profile(db, user_id).await?.is_some() {
        model.update(db).await.map_err(Into::into)
    } else {
        model.insert(db).await.map_err(Into::into)
    }
}
