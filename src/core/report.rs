//! Report generation business logic.
//!
//! Structured cash reports plus the plain-text formatting used by the bot layer
//! for the schedule grid and ledger lines. Everything here is framework-agnostic.

use crate::{
    core::{
        cash_flow::{CashFlowSummary, EntryType, get_cash_flow, summarize_cash_flow},
        insurance::PRIVATE_INSURANCE_LABEL,
        schedule::{ScheduleRow, SlotState},
    },
    entities::cash_flow,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Ledger entries of a period with their totals.
#[derive(Debug, Clone)]
pub struct CashReport {
    /// First day of the period (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive)
    pub end_date: NaiveDate,
    /// Entries ordered by date
    pub entries: Vec<cash_flow::Model>,
    /// Aggregated totals
    pub summary: CashFlowSummary,
}

/// Loads the ledger for `[start_date, end_date]` and summarizes it.
///
/// # Errors
/// Returns `Error::Config` when the range is reversed.
pub async fn generate_cash_report(
    db: &DatabaseConnection,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<CashReport> {
    if start_date > end_date {
        return Err(Error::Config {
            message: format!("Start date {start_date} is after end date {end_date}"),
        });
    }

    let entries = get_cash_flow(db, start_date, end_date).await?;
    let summary = summarize_cash_flow(&entries);

    Ok(CashReport {
        start_date,
        end_date,
        entries,
        summary,
    })
}

/// Formats an amount in reais, e.g. `R$ 150.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-R$ {:.2}", amount.abs())
    } else {
        format!("R$ {amount:.2}")
    }
}

/// Human label for a stored status string.
#[must_use]
pub fn format_status(status: &str) -> &str {
    match status {
        "agendado" => "Agendado",
        "aguardando" => "Aguardando",
        "em_consulta" => "Em consulta",
        "encerrado" => "Encerrado",
        other => other,
    }
}

/// One line of the schedule grid.
///
/// `09:00 | Carlos Pereira | Particular | Agendado | R$ 150.00 | pending`
#[must_use]
pub fn format_schedule_row(row: &ScheduleRow) -> String {
    match &row.slot {
        SlotState::Available => format!("{} | available", row.time),
        SlotState::Booked(booked) => {
            let insurance = booked
                .insurance_name
                .as_deref()
                .unwrap_or(PRIVATE_INSURANCE_LABEL);
            let amount = booked
                .amount
                .map_or_else(|| "-".to_string(), format_currency);
            let paid = if booked.paid { "paid" } else { "pending" };
            format!(
                "{} | {} | {} | {} | {} | {} (#{})",
                row.time,
                booked.patient_name,
                insurance,
                format_status(&booked.status),
                amount,
                paid,
                booked.appointment_id
            )
        }
    }
}

/// One ledger line, e.g. `2024-06-01 | +R$ 150.00 | Consulta 3 - 09:00 | pending`.
#[must_use]
pub fn format_cash_entry(entry: &cash_flow::Model) -> String {
    let sign = if entry.entry_type == EntryType::Outgoing.as_str() {
        "-"
    } else {
        "+"
    };
    let status = match entry.payment_date {
        Some(date) if entry.paid => format!("paid {date}"),
        _ if entry.paid => "paid".to_string(),
        _ => "pending".to_string(),
    };
    format!(
        "{} | {sign}{} | {} | {status}",
        entry.date,
        format_currency(entry.amount),
        entry.description
    )
}

/// Joins lines, keeping the result within `max_len` characters.
///
/// Lines that do not fit are replaced by a `... and N more` footer.
#[must_use]
pub fn join_lines_truncated(lines: &[String], max_len: usize) -> String {
    let mut out = String::new();

    for (index, line) in lines.iter().enumerate() {
        let remaining = lines.len() - index;
        let footer = format!("\n... and {remaining} more");
        let needed = if out.is_empty() { line.len() } else { line.len() + 1 };

        if (remaining > 1 && out.len() + needed + footer.len() > max_len)
            || out.len() + needed > max_len
        {
            out.push_str(&footer);
            return out;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }

    out
}
