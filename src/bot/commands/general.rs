//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**WellnessBuddy - pomoc**\n\n\
        **Jedzenie**\n\
        • `/food_search <nazwa>` - Szuka produktów w Open Food Facts.\n\
        • `/food_barcode <kod>` - Pokazuje produkt o podanym kodzie kreskowym.\n\
        • `/eat <kod> <gramy>` - Zapisuje porcję produktu w dzienniku.\n\
        • `/today` - Dzisiejsze kalorie względem celu.\n\
        • `/goal <kcal> [imię]` - Ustawia dzienny cel kaloryczny.\n\n\
        **Finanse**\n\
        • `/balance` - Przychody i wydatki w tym miesiącu.\n\
        • `/income <kategoria> <kwota> [opis]` - Zapisuje przychód.\n\
        • `/expense <kategoria> <kwota> [opis]` - Zapisuje wydatek.\n\
        • `/categories` - Lista kategorii.\n\
        • `/add_category <nazwa> <rodzaj> <kolor> <ikona>` - Dodaje kategorię.\n\
        • `/budgets` - Limity wydatków i ich wykorzystanie.\n\
        • `/set_budget <kategoria> <kwota>` - Ustawia miesięczny limit kategorii.\n\n\
        **Inne**\n\
        • `/ping` - Sprawdza, czy bot odpowiada.\n\
        • `/help` - Ta wiadomość.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
