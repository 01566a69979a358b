//! Calorie Discord commands - today's progress and the daily goal.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            auth::PreferencesForm,
            calories::{self, ProgressStatus},
            profile,
        },
        errors::{Error, Result},
        theme,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Shows today's calories against the daily goal.
    #[poise::command(slash_command, prefix_command)]
    pub async fn today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();
        let day = chrono::Utc::now().date_naive();

        let progress =
            calories::daily_progress(db, &user_id, day, ctx.data().defaults.daily_kcal_goal)
                .await?;
        let meals = calories::meals_on(db, &user_id, day).await?;

        let color = match progress.status {
            ProgressStatus::Remaining => theme::REMAINING,
            ProgressStatus::Surplus => theme::SURPLUS,
        };

        let mut meal_list = String::new();
        for meal in &meals {
            writeln!(
                &mut meal_list,
                "• {} - {:.0} g, {:.0} kcal",
                meal.name, meal.grams, meal.kcal
            )?;
        }
        if meal_list.is_empty() {
            meal_list.push_str("Brak posiłków. Dodaj pierwszy przez `/eat`.");
        }

        let embed = serenity::CreateEmbed::default()
            .title("🍽️ Kalorie dzisiaj")
            .description(calories::format_progress_bar(&progress, Some(10)))
            .color(color)
            .field(
                "Spożyto",
                format!("{:.0} / {:.0} kcal", progress.consumed, progress.goal),
                true,
            )
            .field(
                progress.label(),
                format!("{} kcal", progress.display_amount()),
                true,
            )
            .field("Posiłki", meal_list, false)
            .footer(serenity::CreateEmbedFooter::new(day.format("%Y-%m-%d").to_string()));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets the daily calorie goal, and optionally the display name.
    #[poise::command(slash_command, prefix_command)]
    pub async fn goal(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Daily goal in kcal"] kcal: f64,
        #[description = "Name shown on the dashboard"] name: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let mut form = match profile::get_profile(db, &user_id).await? {
            Some(existing) => PreferencesForm::from_profile(&existing),
            None => PreferencesForm::new(user_id.as_str(), kcal),
        };
        form.daily_kcal_goal = kcal;
        if name.is_some() {
            form.display_name = name;
        }

        let outcome = form.submit(db).await;
        let reply = if outcome.success {
            format!("✅ {} ({kcal:.0} kcal)", outcome.message)
        } else {
            format!("❌ {}", outcome.message)
        };

        ctx.send(
            poise::CreateReply::default()
                .content(reply)
                .ephemeral(!outcome.success),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
