//! Insurance Discord commands - payer registry management.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{forms::InsuranceForm, insurance},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for the insurance registry.
    #[poise::command(
        slash_command,
        subcommands("insurance_add", "insurance_list", "insurance_deactivate")
    )]
    pub async fn insurance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Insurance command. Available subcommands:\n\
            `/insurance add` - Register an insurance\n\
            `/insurance list` - List active insurances\n\
            `/insurance deactivate` - Stop offering an insurance";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new insurance.
    #[poise::command(slash_command, rename = "add")]
    pub async fn insurance_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Insurance name (must be unique)"] name: String,
    ) -> Result<()> {
        let name = InsuranceForm { name }.validate()?;
        let data = ctx.data();

        let created = insurance::create_insurance(&data.database, name).await?;
        data.cache.invalidate().await;

        ctx.say(format!("✅ Registered insurance **{}**.", created.name))
            .await?;
        Ok(())
    }

    /// Lists active insurances.
    #[poise::command(slash_command, rename = "list")]
    pub async fn insurance_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let insurances = data.cache.insurances(&data.database).await?;

        if insurances.is_empty() {
            ctx.say("🏥 No insurances registered. Every appointment is private (Particular).")
                .await?;
            return Ok(());
        }

        let mut response = String::from("🏥 **Insurances**\n\n");
        for i in insurances {
            writeln!(&mut response, "• {}", i.name)?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Stops offering an insurance for new appointments.
    #[poise::command(slash_command, rename = "deactivate")]
    pub async fn insurance_deactivate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Insurance"]
        #[autocomplete = "autocomplete::autocomplete_insurance"]
        name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(found) = insurance::get_insurance_by_name(db, &name).await? else {
            ctx.say(format!("❌ Insurance '{name}' not found.")).await?;
            return Ok(());
        };

        insurance::set_insurance_active(db, found.id, false).await?;
        data.cache.invalidate().await;

        ctx.say(format!("✅ Insurance **{}** deactivated.", found.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
