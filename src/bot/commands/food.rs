//! Food Discord commands - product search, barcode lookup and meal logging.
//!
//! All lookups go through the same Open Food Facts client as the HTTP proxy,
//! so names and nutrients are normalized the same way.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{auth::GENERIC_ERROR, calories, food::FoodItem},
        errors::{Error, Result},
        theme,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::{info, warn};

    const NOT_FOUND: &str = "❌ Nie znaleziono produktu";
    const SEARCH_RESULTS_SHOWN: usize = 10;

    fn per_100g(value: Option<f64>, unit: &str) -> String {
        value.map_or_else(|| "-".to_string(), |v| format!("{v:.1} {unit}"))
    }

    fn food_embed(item: &FoodItem) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::default()
            .title(&item.name)
            .color(theme::PRIMARY)
            .field("Energia (100 g)", per_100g(item.kcal_per_100g, "kcal"), true)
            .field("Białko", per_100g(item.protein_per_100g, "g"), true)
            .field("Tłuszcz", per_100g(item.fat_per_100g, "g"), true)
            .field("Węglowodany", per_100g(item.carbs_per_100g, "g"), true);

        if let Some(brand) = &item.brand {
            embed = embed.description(brand);
        }
        if let Some(image) = &item.image_url {
            embed = embed.thumbnail(image);
        }
        if let Some(code) = &item.source_id {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "{} • {code}",
                item.source
            )));
        }
        embed
    }

    /// Looks a product up by barcode and replies with the outcome message on failure.
    async fn lookup_barcode(
        ctx: poise::Context<'_, BotData, Error>,
        barcode: &str,
    ) -> Result<Option<FoodItem>> {
        match ctx.data().lookup.by_barcode(barcode.trim()).await {
            Ok(item) => Ok(Some(item)),
            Err(Error::FoodNotFound) => {
                ctx.say(NOT_FOUND).await?;
                Ok(None)
            }
            Err(e) => {
                warn!("Barcode lookup for {barcode} failed: {e}");
                ctx.say(GENERIC_ERROR).await?;
                Ok(None)
            }
        }
    }

    /// Searches Open Food Facts by product name.
    #[poise::command(slash_command, prefix_command)]
    pub async fn food_search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name to look for"] query: String,
    ) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            ctx.say("❌ Podaj nazwę produktu").await?;
            return Ok(());
        }

        ctx.defer().await?;

        let items = match ctx.data().lookup.search(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Food search for {query:?} failed: {e}");
                ctx.say(GENERIC_ERROR).await?;
                return Ok(());
            }
        };

        if items.is_empty() {
            ctx.say(NOT_FOUND).await?;
            return Ok(());
        }

        let mut response = format!("🔎 **Wyniki dla \"{query}\"**\n\n");
        for item in items.iter().take(SEARCH_RESULTS_SHOWN) {
            write!(&mut response, "• **{}**", item.name)?;
            if let Some(brand) = &item.brand {
                write!(&mut response, " ({brand})")?;
            }
            if let Some(kcal) = item.kcal_per_100g {
                write!(&mut response, " - {kcal:.0} kcal/100 g")?;
            }
            if let Some(code) = &item.source_id {
                write!(&mut response, " `{code}`")?;
            }
            response.push('\n');
        }
        if items.len() > SEARCH_RESULTS_SHOWN {
            write!(
                &mut response,
                "\n…i {} więcej",
                items.len() - SEARCH_RESULTS_SHOWN
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows a single product by its barcode.
    #[poise::command(slash_command, prefix_command)]
    pub async fn food_barcode(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "EAN/UPC barcode"] barcode: String,
    ) -> Result<()> {
        ctx.defer().await?;

        let Some(item) = lookup_barcode(ctx, &barcode).await? else {
            return Ok(());
        };

        ctx.send(poise::CreateReply::default().embed(food_embed(&item)))
            .await?;
        Ok(())
    }

    /// Logs a portion of a product, by barcode, in today's meals.
    #[poise::command(slash_command, prefix_command)]
    pub async fn eat(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "EAN/UPC barcode"] barcode: String,
        #[description = "Portion in grams"] grams: f64,
    ) -> Result<()> {
        if !grams.is_finite() || grams <= 0.0 {
            ctx.say("❌ Porcja musi być dodatnią liczbą gramów").await?;
            return Ok(());
        }

        ctx.defer().await?;

        let Some(item) = lookup_barcode(ctx, &barcode).await? else {
            return Ok(());
        };

        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let meal = calories::log_meal(db, &user_id, &item, grams).await?;
        info!(
            "User {user_id} logged {grams} g of {} ({:.0} kcal)",
            meal.name, meal.kcal
        );

        let today = chrono::Utc::now().date_naive();
        let progress =
            calories::daily_progress(db, &user_id, today, ctx.data().defaults.daily_kcal_goal)
                .await?;

        ctx.say(format!(
            "✅ Zapisano **{}** ({grams:.0} g, {:.0} kcal)\n{} {} kcal",
            meal.name,
            meal.kcal,
            progress.label(),
            progress.display_amount()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
