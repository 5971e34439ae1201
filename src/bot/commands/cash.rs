//! Cash flow Discord commands - `/cash report` and `/cash expense`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{cash_flow, forms, report},
        errors::{Error, Result},
    };
    use chrono::{Datelike, Local, NaiveDate};
    use poise::serenity_prelude as serenity;

    const EMBED_DESCRIPTION_LIMIT: usize = 4096;

    /// Parent command for the cash ledger.
    #[poise::command(slash_command, subcommands("cash_report", "cash_expense"))]
    pub async fn cash(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Cash command. Available subcommands:\n\
            `/cash report` - Ledger entries and totals for a period\n\
            `/cash expense` - Record an outgoing payment";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows ledger entries and totals. Defaults to the current month so far.
    #[poise::command(slash_command, rename = "report")]
    pub async fn cash_report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First day (YYYY-MM-DD or DD/MM/YYYY)"] start: Option<String>,
        #[description = "Last day (YYYY-MM-DD or DD/MM/YYYY)"] end: Option<String>,
    ) -> Result<()> {
        let today = Local::now().date_naive();
        let start_date = match start {
            Some(raw) => forms::parse_date(&raw)?,
            None => today.with_day(1).unwrap_or(today),
        };
        let end_date = match end {
            Some(raw) => forms::parse_date(&raw)?,
            None => today,
        };

        ctx.defer().await?;
        let cash = report::generate_cash_report(&ctx.data().database, start_date, end_date).await?;
        let summary = cash.summary;

        let description = if cash.entries.is_empty() {
            "_No entries in this period_".to_string()
        } else {
            let lines: Vec<String> = cash.entries.iter().map(report::format_cash_entry).collect();
            // Code block fences take 8 characters
            format!(
                "```\n{}\n```",
                report::join_lines_truncated(&lines, EMBED_DESCRIPTION_LIMIT - 8)
            )
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "💰 Cash flow {} - {}",
                fmt_day(cash.start_date),
                fmt_day(cash.end_date)
            ))
            .description(description)
            .color(if summary.net < 0.0 { 0x00E7_4C3C } else { 0x0027_AE60 })
            .fields(vec![
                ("Total", report::format_currency(summary.incoming_total), true),
                ("Received", report::format_currency(summary.received), true),
                ("Pending", report::format_currency(summary.pending), true),
                ("Expenses", report::format_currency(summary.outgoing_total), true),
                ("Net", report::format_currency(summary.net), true),
            ]);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    fn fmt_day(date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    /// Records an outgoing payment (rent, supplies, ...).
    #[poise::command(slash_command, rename = "expense")]
    pub async fn cash_expense(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What was paid"] description: String,
        #[description = "Amount"] amount: f64,
        #[description = "Day (YYYY-MM-DD or DD/MM/YYYY), defaults to today"] date: Option<String>,
        #[description = "Already paid? (default: yes)"] paid: Option<bool>,
    ) -> Result<()> {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::MissingField {
                field: "description",
            });
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        let date = match date {
            Some(raw) => forms::parse_date(&raw)?,
            None => Local::now().date_naive(),
        };

        let data = ctx.data();
        let entry = cash_flow::record_expense(
            &data.database,
            date,
            description,
            amount,
            paid.unwrap_or(true),
        )
        .await?;
        data.cache.invalidate().await;

        ctx.say(format!(
            "✅ Recorded expense **{}** of {} on {}.",
            entry.description,
            report::format_currency(entry.amount),
            fmt_day(entry.date)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
