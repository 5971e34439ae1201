//! Professional Discord commands - registry management.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{forms::ProfessionalForm, professional},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for the professional registry.
    #[poise::command(
        slash_command,
        subcommands(
            "professional_add",
            "professional_list",
            "professional_deactivate",
            "professional_activate"
        )
    )]
    pub async fn professional(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Professional command. Available subcommands:\n\
            `/professional add` - Register a professional\n\
            `/professional list` - List active professionals\n\
            `/professional deactivate` - Hide a professional from the agenda\n\
            `/professional activate` - Bring a professional back";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new professional.
    #[poise::command(slash_command, rename = "add")]
    pub async fn professional_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Display name (must be unique)"] name: String,
        #[description = "Specialty (e.g., 'Cardiology')"] specialty: String,
    ) -> Result<()> {
        let form = ProfessionalForm { name, specialty }.validate()?;
        let data = ctx.data();

        let created =
            professional::create_professional(&data.database, form.name, form.specialty).await?;
        data.cache.invalidate().await;

        ctx.say(format!(
            "✅ Registered **{}** ({}).",
            created.name, created.specialty
        ))
        .await?;
        Ok(())
    }

    /// Lists active professionals.
    #[poise::command(slash_command, rename = "list")]
    pub async fn professional_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let professionals = data.cache.professionals(&data.database).await?;

        if professionals.is_empty() {
            ctx.say("🩺 No professionals registered. Add one with `/professional add`.")
                .await?;
            return Ok(());
        }

        let mut response = String::from("🩺 **Professionals**\n\n");
        for p in professionals {
            writeln!(&mut response, "**{}** - {}", p.name, p.specialty)?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    async fn set_active(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
        active: bool,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(found) = professional::get_professional_by_name(db, name).await? else {
            ctx.say(format!("❌ Professional '{name}' not found.")).await?;
            return Ok(());
        };

        professional::set_professional_active(db, found.id, active).await?;
        data.cache.invalidate().await;

        let state = if active { "active again" } else { "deactivated" };
        ctx.say(format!("✅ **{}** is {state}.", found.name)).await?;
        Ok(())
    }

    /// Hides a professional from listings. Existing appointments are kept.
    #[poise::command(slash_command, rename = "deactivate")]
    pub async fn professional_deactivate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Professional"]
        #[autocomplete = "autocomplete::autocomplete_professional"]
        name: String,
    ) -> Result<()> {
        set_active(ctx, &name, false).await
    }

    /// Reactivates a professional by exact name.
    #[poise::command(slash_command, rename = "activate")]
    pub async fn professional_activate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Exact name of the professional"] name: String,
    ) -> Result<()> {
        set_active(ctx, &name, true).await
    }
}

// Re-export all commands
pub use inner::*;
