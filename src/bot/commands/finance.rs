//! Finance Discord commands - monthly balance, entries, categories and the budget planner.
//!
//! Categories are per user. The configured defaults are seeded the first time
//! a user touches any finance command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            budget::{self, BudgetPlanner, SaveOutcome},
            finance::{self, FinanceBalance, KIND_EXPENSE, KIND_INCOME},
        },
        entities::finance_category,
        errors::{Error, Result},
        theme,
    };
    use chrono::Datelike;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    fn current_month() -> (i32, u32) {
        let now = chrono::Utc::now();
        (now.year(), now.month())
    }

    /// The user's categories, seeding the defaults on first use.
    async fn user_categories(
        ctx: poise::Context<'_, BotData, Error>,
    ) -> Result<Vec<finance_category::Model>> {
        let user_id = ctx.author().id.to_string();
        finance::ensure_default_categories(
            &ctx.data().database,
            &user_id,
            &ctx.data().defaults.categories,
        )
        .await
    }

    /// Finds a category of the given kind, replying with a hint when there is none.
    async fn resolve_category(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
        kind: &str,
    ) -> Result<Option<finance_category::Model>> {
        let wanted = name.trim().to_lowercase();
        let found = user_categories(ctx)
            .await?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted);

        match found {
            Some(category) if category.kind == kind => Ok(Some(category)),
            Some(category) => {
                ctx.say(format!(
                    "❌ Kategoria '{}' jest typu '{}', a nie '{kind}'",
                    category.name, category.kind
                ))
                .await?;
                Ok(None)
            }
            None => {
                ctx.say(format!(
                    "❌ Nie znaleziono kategorii '{name}'. Użyj `/categories`, aby zobaczyć dostępne."
                ))
                .await?;
                Ok(None)
            }
        }
    }

    async fn record(
        ctx: poise::Context<'_, BotData, Error>,
        category_name: &str,
        kind: &str,
        amount: f64,
        note: Option<String>,
    ) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            ctx.say("❌ Kwota musi być dodatnią liczbą").await?;
            return Ok(());
        }

        let Some(category) = resolve_category(ctx, category_name, kind).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let entry =
            finance::record_entry(&ctx.data().database, &user_id, category.id, amount, note)
                .await?;
        info!(
            "User {user_id} recorded {kind} of {:.2} in {}",
            entry.amount, category.name
        );

        let sign = if kind == KIND_INCOME { "+" } else { "-" };
        ctx.say(format!(
            "✅ {} {sign}{:.2} zł w kategorii {}",
            category.icon, entry.amount, category.name
        ))
        .await?;
        Ok(())
    }

    /// Shows this month's income, expenses and their shares.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let (year, month) = current_month();
        let balance: FinanceBalance =
            finance::month_balance(&ctx.data().database, &user_id, year, month).await?;

        let Some(shares) = balance.shares() else {
            let embed = serenity::CreateEmbed::default()
                .title(format!("💰 Bilans {year}-{month:02}"))
                .description("Brak danych")
                .color(theme::MUTED);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        };

        let color = if balance.net >= 0.0 {
            theme::INCOME
        } else {
            theme::EXPENSE
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("💰 Bilans {year}-{month:02}"))
            .color(color)
            .field(
                "Przychody",
                format!("{:.2} zł ({:.0}%)", balance.income, shares.income),
                true,
            )
            .field(
                "Wydatki",
                format!("{:.2} zł ({:.0}%)", balance.expense, shares.expense),
                true,
            )
            .field("Saldo", format!("{:+.2} zł", balance.net), false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Records income in one of your income categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn income(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Income category"]
        #[autocomplete = "autocomplete::autocomplete_income_category"]
        category: String,
        #[description = "Amount"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, &category, KIND_INCOME, amount, note).await
    }

    /// Records an expense in one of your expense categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense category"]
        #[autocomplete = "autocomplete::autocomplete_expense_category"]
        category: String,
        #[description = "Amount"] amount: f64,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        record(ctx, &category, KIND_EXPENSE, amount, note).await
    }

    /// Lists your finance categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let categories = user_categories(ctx).await?;

        if categories.is_empty() {
            ctx.say("📂 Brak kategorii. Dodaj pierwszą przez `/add_category`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("📂 **Twoje kategorie**\n\n");
        for kind in [KIND_INCOME, KIND_EXPENSE] {
            let heading = if kind == KIND_INCOME {
                "Przychody"
            } else {
                "Wydatki"
            };
            writeln!(&mut response, "**{heading}**")?;
            for c in categories.iter().filter(|c| c.kind == kind) {
                writeln!(&mut response, "{} {} `{}`", c.icon, c.name, c.color)?;
            }
            response.push('\n');
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Adds a finance category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"] name: String,
        #[description = "expense or income"]
        #[autocomplete = "autocomplete::autocomplete_kind"]
        kind: String,
        #[description = "Colour as #RRGGBB"] color: String,
        #[description = "Emoji icon"] icon: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        if finance::find_category_by_name(db, &user_id, &name)
            .await?
            .is_some()
        {
            ctx.say(format!("❌ Kategoria '{}' już istnieje", name.trim()))
                .await?;
            return Ok(());
        }

        match finance::create_category(db, &user_id, &name, kind.trim(), color.trim(), &icon)
            .await
        {
            Ok(category) => {
                info!("User {user_id} added category {}", category.name);
                let embed = serenity::CreateEmbed::default()
                    .title(format!("{} {}", category.icon, category.name))
                    .description(format!("Dodano kategorię ({})", category.kind))
                    .color(theme::category_color(&category.color));
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
            Err(Error::InvalidInput { message }) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ {message}"))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows monthly limits and spending for your expense categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn budgets(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        user_categories(ctx).await?;

        let user_id = ctx.author().id.to_string();
        let (year, month) = current_month();
        let rows = budget::budget_rows(&ctx.data().database, &user_id, year, month).await?;

        if rows.is_empty() {
            ctx.say("📋 Brak kategorii wydatków").await?;
            return Ok(());
        }

        let mut fields = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut value = String::new();
            match row.limit {
                Some(limit) => {
                    write!(&mut value, "{:.2} / {limit:.2} zł", row.spent)?;
                    if let Some(percent) = row.used_percent() {
                        write!(&mut value, " ({percent:.0}%)")?;
                    }
                    if row.is_over() {
                        value.push_str(" ⚠️");
                    }
                }
                None => write!(&mut value, "{:.2} zł, bez limitu", row.spent)?,
            }
            fields.push((
                format!("{} {}", row.category.icon, row.category.name),
                value,
                false,
            ));
        }

        let color = if rows.iter().any(budget::BudgetRow::is_over) {
            theme::EXPENSE
        } else {
            theme::PRIMARY
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("📋 Budżet {year}-{month:02}"))
            .color(color)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Sets the monthly limit of an expense category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn set_budget(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Expense category"]
        #[autocomplete = "autocomplete::autocomplete_expense_category"]
        category: String,
        #[description = "Monthly limit, e.g. 1200 or 1200,50"] amount: String,
    ) -> Result<()> {
        let Some(category) = resolve_category(ctx, &category, KIND_EXPENSE).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let (year, month) = current_month();
        let current = budget::budget_rows(db, &user_id, year, month)
            .await?
            .into_iter()
            .find(|row| row.category.id == category.id)
            .and_then(|row| row.limit);

        let mut planner = BudgetPlanner::new();
        planner.begin_edit(category.id, current);
        planner.set_pending(amount.as_str());

        match planner.save(db, &user_id).await? {
            SaveOutcome::Saved(saved) => {
                info!(
                    "User {user_id} set budget for {} to {:.2}",
                    category.name, saved.amount
                );
                ctx.say(format!(
                    "✅ Limit dla {} {}: {:.2} zł",
                    category.icon, category.name, saved.amount
                ))
                .await?;
            }
            SaveOutcome::Rejected => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("❌ Nieprawidłowa kwota: '{amount}'"))
                        .ephemeral(true),
                )
                .await?;
            }
            SaveOutcome::NotEditing => {}
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
