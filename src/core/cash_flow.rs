//! Cash flow business logic - the ledger behind private appointments.
//!
//! Rows generated by appointments are created, settled and released only by the
//! appointment commands, through the crate-private helpers below, always on the
//! caller's open transaction. The public API is the range query, manual expenses
//! and the report summary.

use crate::{
    entities::{CashFlow, appointment, cash_flow},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Money the clinic receives (appointment fees)
    Incoming,
    /// Money the clinic pays out (expenses)
    Outgoing,
}

impl EntryType {
    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            other => Err(Error::UnknownEntryType {
                value: other.to_string(),
            }),
        }
    }
}

/// Totals shown under the cash report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CashFlowSummary {
    /// Sum of all incoming entries
    pub incoming_total: f64,
    /// Incoming entries already paid
    pub received: f64,
    /// Incoming entries still open
    pub pending: f64,
    /// Sum of all outgoing entries
    pub outgoing_total: f64,
    /// `incoming_total - outgoing_total`
    pub net: f64,
}

/// Ledger description for an appointment-generated entry.
#[must_use]
pub fn appointment_entry_description(patient_id: i64, time: &str) -> String {
    format!("Consulta {patient_id} - {time}")
}

/// Retrieves ledger entries with `start <= date <= end`, ordered by date.
pub async fn get_cash_flow(
    db: &DatabaseConnection,
    start_date: Date,
    end_date: Date,
) -> Result<Vec<cash_flow::Model>> {
    debug!(%start_date, %end_date, "Loading cash flow");
    CashFlow::find()
        .filter(cash_flow::Column::Date.gte(start_date))
        .filter(cash_flow::Column::Date.lte(end_date))
        .order_by_asc(cash_flow::Column::Date)
        .order_by_asc(cash_flow::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the ledger entries linked to an appointment.
pub async fn get_entries_for_appointment<C>(
    db: &C,
    appointment_id: i64,
) -> Result<Vec<cash_flow::Model>>
where
    C: ConnectionTrait,
{
    CashFlow::find()
        .filter(cash_flow::Column::AppointmentId.eq(appointment_id))
        .order_by_asc(cash_flow::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a manual outgoing entry (rent, supplies, ...).
pub async fn record_expense(
    db: &DatabaseConnection,
    date: Date,
    description: String,
    amount: f64,
    paid: bool,
) -> Result<cash_flow::Model> {
    let entry = cash_flow::ActiveModel {
        date: Set(date),
        description: Set(description),
        amount: Set(amount),
        paid: Set(paid),
        payment_date: Set(paid.then_some(date)),
        appointment_id: Set(None),
        entry_type: Set(EntryType::Outgoing.as_str().to_string()),
        ..Default::default()
    };

    let result = entry.insert(db).await?;
    info!(id = result.id, amount, "Expense recorded");
    Ok(result)
}

/// Aggregates entries into the report totals.
#[must_use]
pub fn summarize_cash_flow(entries: &[cash_flow::Model]) -> CashFlowSummary {
    let mut summary = CashFlowSummary::default();

    for entry in entries {
        if entry.entry_type == EntryType::Outgoing.as_str() {
            summary.outgoing_total += entry.amount;
        } else {
            summary.incoming_total += entry.amount;
            if entry.paid {
                summary.received += entry.amount;
            }
        }
    }

    summary.pending = summary.incoming_total - summary.received;
    summary.net = summary.incoming_total - summary.outgoing_total;
    summary
}

/// Inserts the unpaid incoming entry for a freshly persisted private appointment.
pub(crate) async fn insert_appointment_entry<C>(
    conn: &C,
    appointment: &appointment::Model,
    amount: f64,
) -> Result<cash_flow::Model>
where
    C: ConnectionTrait,
{
    let entry = cash_flow::ActiveModel {
        date: Set(appointment.date),
        description: Set(appointment_entry_description(
            appointment.patient_id,
            &appointment.time,
        )),
        amount: Set(amount),
        paid: Set(false),
        payment_date: Set(None),
        appointment_id: Set(Some(appointment.id)),
        entry_type: Set(EntryType::Incoming.as_str().to_string()),
        ..Default::default()
    };

    let result = entry.insert(conn).await?;
    debug!(id = result.id, appointment_id = appointment.id, "Cash flow entry linked");
    Ok(result)
}

/// Marks the first entry linked to `appointment_id` as paid on `payment_date`.
/// Returns `None` when the appointment has no entry.
pub(crate) async fn settle_entry_for_appointment<C>(
    conn: &C,
    appointment_id: i64,
    payment_date: Date,
) -> Result<Option<cash_flow::Model>>
where
    C: ConnectionTrait,
{
    let Some(entry) = CashFlow::find()
        .filter(cash_flow::Column::AppointmentId.eq(appointment_id))
        .order_by_asc(cash_flow::Column::Id)
        .one(conn)
        .await?
    else {
        debug!(appointment_id, "No cash flow entry to settle");
        return Ok(None);
    };

    let mut model: cash_flow::ActiveModel = entry.into();
    model.paid = Set(true);
    model.payment_date = Set(Some(payment_date));
    Ok(Some(model.update(conn).await?))
}

/// Brings the linked entry in line with an edited appointment.
///
/// A private appointment with a non-zero amount must have an entry; any other
/// appointment must not have an open one. Settled entries are history and are
/// never rewritten or removed here.
pub(crate) async fn sync_entry_for_appointment<C>(
    conn: &C,
    appointment: &appointment::Model,
    today: Date,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = CashFlow::find()
        .filter(cash_flow::Column::AppointmentId.eq(appointment.id))
        .order_by_asc(cash_flow::Column::Id)
        .one(conn)
        .await?;
    let billable_amount = appointment
        .amount
        .filter(|amount| appointment.insurance_id.is_none() && *amount != 0.0);

    match (billable_amount, existing) {
        (Some(amount), None) => {
            insert_appointment_entry(conn, appointment, amount).await?;
            if appointment.paid {
                settle_entry_for_appointment(conn, appointment.id, today).await?;
            }
        }
        (Some(amount), Some(entry)) if !entry.paid => {
            let mut model: cash_flow::ActiveModel = entry.into();
            model.amount = Set(amount);
            model.date = Set(appointment.date);
            model.description = Set(appointment_entry_description(
                appointment.patient_id,
                &appointment.time,
            ));
            if appointment.paid {
                model.paid = Set(true);
                model.payment_date = Set(Some(today));
            }
            model.update(conn).await?;
        }
        (None, Some(entry)) if !entry.paid => {
            debug!(id = entry.id, "Dropping open cash flow entry of non-billable appointment");
            entry.delete(conn).await?;
        }
        _ => {}
    }

    Ok(())
}

/// Detaches the ledger from an appointment that is about to be deleted:
/// open entries are removed, settled ones stay with `appointment_id = NULL`.
pub(crate) async fn release_entries_for_appointment<C>(conn: &C, appointment_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let removed = CashFlow::delete_many()
        .filter(cash_flow::Column::AppointmentId.eq(appointment_id))
        .filter(cash_flow::Column::Paid.eq(false))
        .exec(conn)
        .await?;

    let detached = CashFlow::update_many()
        .col_expr(
            cash_flow::Column::AppointmentId,
            Expr::value(Option::<i64>::None),
        )
        .filter(cash_flow::Column::AppointmentId.eq(appointment_id))
        .exec(conn)
        .await?;

    debug!(
        appointment_id,
        removed = removed.rows_affected,
        detached = detached.rows_affected,
        "Cash flow released"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn entry(amount: f64, paid: bool, entry_type: EntryType) -> cash_flow::Model {
        cash_flow::Model {
            id: 0,
            date: ymd(2024, 6, 1),
            description: "test".to_string(),
            amount,
            paid,
            payment_date: None,
            appointment_id: None,
            entry_type: entry_type.as_str().to_string(),
        }
    }

    #[test]
    fn test_entry_type_round_trip_and_unknown() {
        assert_eq!("incoming".parse::<EntryType>().unwrap(), EntryType::Incoming);
        assert_eq!(EntryType::Outgoing.to_string(), "outgoing");
        assert!(matches!(
            "entrada".parse::<EntryType>(),
            Err(Error::UnknownEntryType { value }) if value == "entrada"
        ));
    }

    #[test]
    fn test_summarize_cash_flow() {
        let entries = vec![
            entry(150.0, true, EntryType::Incoming),
            entry(200.0, false, EntryType::Incoming),
            entry(80.0, true, EntryType::Outgoing),
        ];

        let summary = summarize_cash_flow(&entries);
        assert_eq!(summary.incoming_total, 350.0);
        assert_eq!(summary.received, 150.0);
        assert_eq!(summary.pending, 200.0);
        assert_eq!(summary.outgoing_total, 80.0);
        assert_eq!(summary.net, 270.0);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize_cash_flow(&[]), CashFlowSummary::default());
    }

    #[tokio::test]
    async fn test_get_cash_flow_range_is_inclusive() -> Result<()> {
        let db = setup_test_db().await?;
        for day in [1, 5, 10, 15, 20] {
            record_expense(&db, ymd(2024, 6, day), format!("Day {day}"), 10.0, false).await?;
        }

        let entries = get_cash_flow(&db, ymd(2024, 6, 5), ymd(2024, 6, 15)).await?;
        let days: Vec<String> = entries.iter().map(|e| e.description.clone()).collect();
        assert_eq!(days, vec!["Day 5", "Day 10", "Day 15"]);
        assert!(
            entries
                .iter()
                .all(|e| e.date >= ymd(2024, 6, 5) && e.date <= ymd(2024, 6, 15))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_cash_flow_orders_by_date() -> Result<()> {
        let db = setup_test_db().await?;
        record_expense(&db, ymd(2024, 6, 20), "late".to_string(), 1.0, false).await?;
        record_expense(&db, ymd(2024, 6, 2), "early".to_string(), 1.0, false).await?;

        let entries = get_cash_flow(&db, ymd(2024, 6, 1), ymd(2024, 6, 30)).await?;
        assert_eq!(entries[0].description, "early");
        assert_eq!(entries[1].description, "late");
        Ok(())
    }

    #[tokio::test]
    async fn test_record_expense() -> Result<()> {
        let db = setup_test_db().await?;

        let paid = record_expense(&db, ymd(2024, 6, 3), "Rent".to_string(), 1200.0, true).await?;
        assert_eq!(paid.entry_type, "outgoing");
        assert_eq!(paid.payment_date, Some(ymd(2024, 6, 3)));
        assert!(paid.appointment_id.is_none());

        let open =
            record_expense(&db, ymd(2024, 6, 4), "Supplies".to_string(), 90.0, false).await?;
        assert!(!open.paid);
        assert!(open.payment_date.is_none());
        Ok(())
    }
}
