//! Patient Discord commands - `/patient add`, `/patient list` and `/patient update`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{forms::PatientForm, patient},
        errors::{Error, Result},
    };
    use chrono::Local;
    use std::fmt::Write;

    const LIST_LIMIT: usize = 30;

    /// Parent command for the patient registry.
    #[poise::command(
        slash_command,
        subcommands("patient_add", "patient_list", "patient_update")
    )]
    pub async fn patient(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Patient command. Available subcommands:\n\
            `/patient add` - Register a patient\n\
            `/patient list` - Search patients by name\n\
            `/patient update` - Edit a patient's details";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new patient.
    #[poise::command(slash_command, rename = "add")]
    pub async fn patient_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Phone number"] phone: String,
        #[description = "E-mail"] email: Option<String>,
        #[description = "Birth date (YYYY-MM-DD or DD/MM/YYYY)"] birth_date: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let valid = PatientForm {
            name,
            phone,
            email,
            birth_date,
            notes,
        }
        .validate(Local::now().date_naive())?;

        let data = ctx.data();
        let created = patient::create_patient(
            &data.database,
            valid.name,
            valid.phone,
            valid.email,
            valid.birth_date,
            valid.notes,
        )
        .await?;
        data.cache.invalidate().await;

        ctx.say(format!("✅ Registered patient **{}** (#{}).", created.name, created.id))
            .await?;
        Ok(())
    }

    /// Lists patients, optionally filtered by part of the name.
    #[poise::command(slash_command, rename = "list")]
    pub async fn patient_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Part of the name"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let patients = data
            .cache
            .patients(&data.database, search.as_deref().unwrap_or_default())
            .await?;

        if patients.is_empty() {
            ctx.say("👤 No patients found.").await?;
            return Ok(());
        }

        let mut response = format!("👤 **Patients** ({})\n\n", patients.len());
        for p in patients.iter().take(LIST_LIMIT) {
            write!(&mut response, "**{}** - {}", p.name, p.phone)?;
            if let Some(email) = &p.email {
                write!(&mut response, " - {email}")?;
            }
            if let Some(birth_date) = p.birth_date {
                write!(&mut response, " - born {}", birth_date.format("%d/%m/%Y"))?;
            }
            writeln!(&mut response)?;
        }
        if patients.len() > LIST_LIMIT {
            writeln!(
                &mut response,
                "_... and {} more, refine the search_",
                patients.len() - LIST_LIMIT
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Edits a patient. Fields left out keep their current value.
    #[poise::command(slash_command, rename = "update")]
    pub async fn patient_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Patient"]
        #[autocomplete = "autocomplete::autocomplete_patient"]
        name: String,
        #[description = "New name"] new_name: Option<String>,
        #[description = "Phone number"] phone: Option<String>,
        #[description = "E-mail"] email: Option<String>,
        #[description = "Birth date (YYYY-MM-DD or DD/MM/YYYY)"] birth_date: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(current) = patient::get_patient_by_name(db, &name).await? else {
            ctx.say(format!("❌ Patient '{name}' not found.")).await?;
            return Ok(());
        };

        let changes = PatientForm {
            name: new_name.unwrap_or(current.name),
            phone: phone.unwrap_or(current.phone),
            email: email.or(current.email),
            birth_date: birth_date.or_else(|| current.birth_date.map(|d| d.to_string())),
            notes: notes.or(current.notes),
        }
        .validate(Local::now().date_naive())?;

        let Some(updated) = patient::update_patient(db, current.id, changes).await? else {
            ctx.say(format!("❌ Patient '{name}' not found.")).await?;
            return Ok(());
        };
        data.cache.invalidate().await;

        ctx.say(format!("✅ Updated patient **{}**.", updated.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
