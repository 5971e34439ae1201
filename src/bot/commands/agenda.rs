//! Agenda Discord commands - the daily schedule grid, booking and appointment edits.
//!
//! `/agenda` renders one professional's day as the 18-slot grid. `/book` fills a
//! slot, and `/appointment` groups the edit, status, payment and cancel actions
//! for a booked appointment (addressed by the `#id` shown in the grid).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            appointment::{self, AppointmentStatus, PaymentMethod},
            forms::{self, AppointmentForm},
            insurance, patient, professional, report, schedule,
        },
        entities::professional as professional_entity,
        errors::{Error, Result},
    };
    use chrono::{Local, NaiveDate};
    use poise::serenity_prelude as serenity;
    use tracing::error;

    const GRID_COLOR: u32 = 0x0034_98DB;
    const EMBED_DESCRIPTION_LIMIT: usize = 4096;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "Agendado"]
        Scheduled,
        #[name = "Aguardando"]
        Waiting,
        #[name = "Em consulta"]
        InConsultation,
        #[name = "Encerrado"]
        Closed,
    }

    impl From<StatusChoice> for AppointmentStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Scheduled => Self::Scheduled,
                StatusChoice::Waiting => Self::Waiting,
                StatusChoice::InConsultation => Self::InConsultation,
                StatusChoice::Closed => Self::Closed,
            }
        }
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PaymentChoice {
        #[name = "Cash"]
        Cash,
        #[name = "Debit Card"]
        DebitCard,
        #[name = "Credit Card"]
        CreditCard,
        #[name = "PIX"]
        Pix,
        #[name = "Transfer"]
        Transfer,
    }

    impl From<PaymentChoice> for PaymentMethod {
        fn from(choice: PaymentChoice) -> Self {
            match choice {
                PaymentChoice::Cash => Self::Cash,
                PaymentChoice::DebitCard => Self::DebitCard,
                PaymentChoice::CreditCard => Self::CreditCard,
                PaymentChoice::Pix => Self::Pix,
                PaymentChoice::Transfer => Self::Transfer,
            }
        }
    }

    fn date_or_today(date: Option<String>) -> Result<NaiveDate> {
        date.map_or_else(|| Ok(Local::now().date_naive()), |raw| forms::parse_date(&raw))
    }

    async fn find_professional(
        ctx: poise::Context<'_, BotData, Error>,
        name: &str,
    ) -> Result<Option<professional_entity::Model>> {
        let found = professional::get_professional_by_name(&ctx.data().database, name).await?;
        if found.is_none() {
            ctx.say(format!(
                "❌ Professional '{name}' not found. Use `/professional list` to see who is registered."
            ))
            .await?;
        }
        Ok(found)
    }

    async fn reply_not_found(ctx: poise::Context<'_, BotData, Error>, id: i64) -> Result<()> {
        ctx.say(format!("❌ Appointment #{id} not found.")).await?;
        Ok(())
    }

    /// Shows a professional's schedule for a day.
    #[poise::command(slash_command, prefix_command)]
    pub async fn agenda(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Professional"]
        #[autocomplete = "autocomplete::autocomplete_professional"]
        professional_name: String,
        #[description = "Day (YYYY-MM-DD or DD/MM/YYYY), defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let date = date_or_today(date)?;
        let db = &ctx.data().database;

        let Some(professional) = find_professional(ctx, &professional_name).await? else {
            return Ok(());
        };

        let grid = schedule::load_schedule(db, date, &professional.name).await?;
        let booked = grid
            .iter()
            .filter(|row| matches!(row.slot, schedule::SlotState::Booked(_)))
            .count();
        let lines: Vec<String> = grid.iter().map(report::format_schedule_row).collect();
        // Code block fences take 8 characters
        let body = report::join_lines_truncated(&lines, EMBED_DESCRIPTION_LIMIT - 8);

        let embed = serenity::CreateEmbed::default()
            .title(format!("📅 {} - {}", professional.name, date.format("%d/%m/%Y")))
            .description(format!("```\n{body}\n```"))
            .color(GRID_COLOR)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} | {booked} of {} slots booked",
                professional.specialty,
                schedule::TIME_SLOTS.len()
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Books an appointment in a free slot.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn book(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Professional"]
        #[autocomplete = "autocomplete::autocomplete_professional"]
        professional_name: String,
        #[description = "Time slot"]
        #[autocomplete = "autocomplete::autocomplete_time_slot"]
        time: String,
        #[description = "Patient"]
        #[autocomplete = "autocomplete::autocomplete_patient"]
        patient: String,
        #[description = "Day (YYYY-MM-DD or DD/MM/YYYY), defaults to today"] date: Option<String>,
        #[description = "Insurance, or Particular for private"]
        #[autocomplete = "autocomplete::autocomplete_insurance"]
        insurance: Option<String>,
        #[description = "Status (default Agendado)"] status: Option<StatusChoice>,
        #[description = "Payment method"] payment_method: Option<PaymentChoice>,
        #[description = "Amount charged (private only)"] amount: Option<f64>,
        #[description = "Already paid?"] paid: Option<bool>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let date = date_or_today(date)?;
        let paid = paid.unwrap_or(false);
        let form = AppointmentForm {
            patient,
            insurance,
            status: status.map(Into::into).unwrap_or_default(),
            payment_method: payment_method.map(Into::into),
            amount,
            paid,
            notes,
        }
        .validate()?;

        let Some(professional) = find_professional(ctx, &professional_name).await? else {
            return Ok(());
        };

        let data = ctx.data();
        let db = &data.database;

        let taken = appointment::get_appointments_by_date_and_professional(db, date, &professional.name)
            .await?
            .into_iter()
            .any(|a| a.time == time.trim());
        if taken {
            ctx.say(format!(
                "❌ {} already has an appointment at {} on {}.",
                professional.name,
                time.trim(),
                date.format("%d/%m/%Y")
            ))
            .await?;
            return Ok(());
        }

        let new = form
            .into_new_appointment(db, date, &time, professional.id)
            .await?;
        let mut booked = appointment::create_appointment(db, new).await?;
        // Booking and settlement commit separately; a failed settlement keeps the booking.
        let mut payment_failed = false;
        if paid {
            match appointment::mark_payment(db, booked.id, true).await {
                Ok(Some(updated)) => booked = updated,
                Ok(None) => {}
                Err(e) => {
                    error!(appointment_id = booked.id, error = %e, "Booked but payment not recorded");
                    payment_failed = true;
                }
            }
        }
        data.cache.invalidate().await;

        let billing = match booked.insurance_id {
            Some(_) => "insured".to_string(),
            None => booked
                .amount
                .map_or_else(|| "private".to_string(), |a| format!("private, {}", report::format_currency(a))),
        };
        ctx.say(format!(
            "✅ Booked #{} on {} at {} with {} ({billing}{}).",
            booked.id,
            booked.date.format("%d/%m/%Y"),
            booked.time,
            professional.name,
            if booked.paid { ", paid" } else { "" }
        ))
        .await?;
        if payment_failed {
            ctx.say(format!(
                "⚠️ The payment could not be recorded. Use `/appointment pay {}` to retry.",
                booked.id
            ))
            .await?;
        }
        Ok(())
    }

    /// Parent command for editing booked appointments.
    #[poise::command(
        slash_command,
        subcommands(
            "appointment_edit",
            "appointment_status",
            "appointment_pay",
            "appointment_cancel"
        )
    )]
    pub async fn appointment(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Appointment command. Available subcommands:\n\
            `/appointment edit` - Change patient, insurance, amount or notes\n\
            `/appointment status` - Move an appointment through the workflow\n\
            `/appointment pay` - Mark an appointment as paid or unpaid\n\
            `/appointment cancel` - Cancel an appointment";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Edits an appointment. Fields left out keep their current value.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "edit")]
    pub async fn appointment_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment number (#id in the agenda)"] id: i64,
        #[description = "Patient"]
        #[autocomplete = "autocomplete::autocomplete_patient"]
        patient: Option<String>,
        #[description = "Insurance, or Particular for private"]
        #[autocomplete = "autocomplete::autocomplete_insurance"]
        insurance: Option<String>,
        #[description = "Status"] status: Option<StatusChoice>,
        #[description = "Payment method"] payment_method: Option<PaymentChoice>,
        #[description = "Amount charged (private only)"] amount: Option<f64>,
        #[description = "Paid?"] paid: Option<bool>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(current) = appointment::get_appointment_by_id(db, id).await? else {
            return reply_not_found(ctx, id).await;
        };

        let patient = match patient {
            Some(name) => name,
            None => patient::get_patient_by_id(db, current.patient_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_default(),
        };
        let insurance = match insurance {
            Some(name) => Some(name),
            None => match current.insurance_id {
                Some(insurance_id) => insurance::get_insurance_by_id(db, insurance_id)
                    .await?
                    .map(|i| i.name),
                None => None,
            },
        };
        let payment_method: Option<PaymentMethod> = match payment_method {
            Some(choice) => Some(choice.into()),
            None => current
                .payment_method
                .as_deref()
                .and_then(|m| m.parse().ok()),
        };

        let changes = AppointmentForm {
            patient,
            insurance,
            status: match status {
                Some(choice) => choice.into(),
                None => current.status.parse()?,
            },
            payment_method,
            amount: amount.or(current.amount),
            paid: paid.unwrap_or(current.paid),
            notes: notes.or(current.notes),
        }
        .validate()?
        .into_changes(db)
        .await?;

        let Some(updated) = appointment::update_appointment(db, id, changes).await? else {
            return reply_not_found(ctx, id).await;
        };
        data.cache.invalidate().await;

        ctx.say(format!(
            "✅ Updated appointment #{} ({} at {}).",
            updated.id,
            updated.date.format("%d/%m/%Y"),
            updated.time
        ))
        .await?;
        Ok(())
    }

    /// Moves an appointment through the workflow.
    #[poise::command(slash_command, rename = "status")]
    pub async fn appointment_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment number (#id in the agenda)"] id: i64,
        #[description = "New status"] status: StatusChoice,
    ) -> Result<()> {
        let data = ctx.data();
        let status: AppointmentStatus = status.into();

        let Some(updated) =
            appointment::update_appointment_status(&data.database, id, status).await?
        else {
            return reply_not_found(ctx, id).await;
        };
        data.cache.invalidate().await;

        ctx.say(format!(
            "✅ Appointment #{} is now **{}**.",
            updated.id,
            report::format_status(&updated.status)
        ))
        .await?;
        Ok(())
    }

    /// Marks an appointment as paid (or unpaid).
    #[poise::command(slash_command, rename = "pay")]
    pub async fn appointment_pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment number (#id in the agenda)"] id: i64,
        #[description = "Paid? (default: yes)"] paid: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let paid = paid.unwrap_or(true);

        let Some(updated) = appointment::mark_payment(&data.database, id, paid).await? else {
            return reply_not_found(ctx, id).await;
        };
        data.cache.invalidate().await;

        let message = if updated.paid {
            format!("✅ Appointment #{} marked as paid.", updated.id)
        } else {
            format!("✅ Appointment #{} marked as unpaid.", updated.id)
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Cancels an appointment, freeing its slot.
    #[poise::command(slash_command, rename = "cancel")]
    pub async fn appointment_cancel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment number (#id in the agenda)"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();

        if !appointment::cancel_appointment(&data.database, id).await? {
            return reply_not_found(ctx, id).await;
        }
        data.cache.invalidate().await;

        ctx.say(format!(
            "✅ Appointment #{id} cancelled. Open charges were removed; payments already received stay in the cash report."
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
