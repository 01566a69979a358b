//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the invoking user's own finance categories, so every
//! suggested name resolves in the command that receives it.

use crate::{
    bot::BotData,
    core::finance::{self, KIND_EXPENSE, KIND_INCOME},
    entities::FinanceCategoryModel,
    errors::Error,
};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

async fn category_names(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
    kind: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(categories) =
        finance::ensure_default_categories(db, &user_id, &ctx.data().defaults.categories).await
    else {
        return Vec::new();
    };

    matching_names(categories, partial, kind)
}

/// Names of `kind` categories containing `partial`, alphabetically, capped at the Discord limit.
fn matching_names(categories: Vec<FinanceCategoryModel>, partial: &str, kind: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = categories
        .into_iter()
        .filter(|c| c.kind == kind)
        .filter(|c| c.name.to_lowercase().contains(&partial_lower))
        .map(|c| c.name)
        .collect();

    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Suggests the user's expense categories; only those can carry a budget.
pub async fn autocomplete_expense_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    category_names(ctx, partial, KIND_EXPENSE).await
}

/// Suggests the user's income categories.
pub async fn autocomplete_income_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    category_names(ctx, partial, KIND_INCOME).await
}

/// Suggests a category kind.
pub async fn autocomplete_kind(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    [KIND_EXPENSE, KIND_INCOME]
        .iter()
        .filter(|kind| kind.contains(&partial_lower))
        .map(|&kind| kind.to_string())
        .collect()
}
