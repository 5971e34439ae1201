//! General Discord commands - ping and help.
//! This module contains simple commands that don't require database operations.

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
        let help_text = "**Clinic Agenda Help**\n\
        Here is a summary of all available commands.\n\n\
        **Agenda**\n\
        • `/agenda <professional> [date]` - Shows the day's 18 half-hour slots.\n\
        • `/book <professional> <time> <patient> [date] [insurance] ...` - Books a slot. \
        Private appointments with an amount are added to the cash report.\n\
        • `/appointment <edit|status|pay|cancel>` - Works on a booked appointment by its `#id`.\n\n\
        **Registry**\n\
        • `/patient <add|list|update>` - Patient records.\n\
        • `/professional <add|list|deactivate|activate>` - Professionals.\n\
        • `/insurance <add|list|deactivate>` - Accepted insurances.\n\n\
        **Cash**\n\
        • `/cash report [start] [end]` - Ledger and totals (defaults to this month).\n\
        • `/cash expense <description> <amount>` - Records an outgoing payment.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Dates are accepted as `YYYY-MM-DD` or `DD/MM/YYYY`.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
