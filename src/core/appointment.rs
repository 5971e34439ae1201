//! Appointment business logic - booking, editing, status changes, payment and cancellation.
//!
//! Booking a private appointment (no insurance) with a non-zero amount also writes
//! an unpaid incoming cash flow entry linked to it. Every multi-row write runs in a
//! single database transaction: the appointment is inserted first so the ledger row
//! can reference its id, and both are committed together or not at all.

use crate::{
    core::cash_flow,
    entities::{Appointment, Insurance, Patient, Professional, appointment, professional},
    errors::{Error, Result},
};
use chrono::{Local, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{fmt, str::FromStr};
use tracing::{debug, info, warn};

/// Workflow status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentStatus {
    /// Booked (`agendado`)
    #[default]
    Scheduled,
    /// Patient arrived and is waiting (`aguardando`)
    Waiting,
    /// Being seen (`em_consulta`)
    InConsultation,
    /// Finished (`encerrado`)
    Closed,
}

impl AppointmentStatus {
    /// Every status, in workflow order
    pub const ALL: [Self; 4] = [
        Self::Scheduled,
        Self::Waiting,
        Self::InConsultation,
        Self::Closed,
    ];

    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "agendado",
            Self::Waiting => "aguardando",
            Self::InConsultation => "em_consulta",
            Self::Closed => "encerrado",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// How a private appointment is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Cash
    Cash,
    /// Debit card
    DebitCard,
    /// Credit card
    CreditCard,
    /// PIX instant transfer
    Pix,
    /// Bank transfer
    Transfer,
}

impl PaymentMethod {
    /// Every method, in form order
    pub const ALL: [Self; 5] = [
        Self::Cash,
        Self::DebitCard,
        Self::CreditCard,
        Self::Pix,
        Self::Transfer,
    ];

    /// Stored representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::DebitCard => "Debit Card",
            Self::CreditCard => "Credit Card",
            Self::Pix => "PIX",
            Self::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| Error::UnknownPaymentMethod {
                value: s.to_string(),
            })
    }
}

/// Input for [`create_appointment`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    /// Day of the appointment
    pub date: Date,
    /// Time slot, e.g. `"09:00"`
    pub time: String,
    /// Attending professional
    pub professional_id: i64,
    /// Patient being seen
    pub patient_id: i64,
    /// Covering insurance, `None` for private
    pub insurance_id: Option<i64>,
    /// Initial status
    pub status: AppointmentStatus,
    /// Payment method for private appointments
    pub payment_method: Option<PaymentMethod>,
    /// Amount charged
    pub amount: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl NewAppointment {
    /// A private, scheduled appointment with no amount or notes.
    #[must_use]
    pub fn new(date: Date, time: &str, professional_id: i64, patient_id: i64) -> Self {
        Self {
            date,
            time: time.to_string(),
            professional_id,
            patient_id,
            insurance_id: None,
            status: AppointmentStatus::default(),
            payment_method: None,
            amount: None,
            notes: None,
        }
    }
}

/// Editable fields of an existing appointment (the edit form).
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentChanges {
    /// Patient being seen
    pub patient_id: i64,
    /// Covering insurance, `None` for private
    pub insurance_id: Option<i64>,
    /// Workflow status
    pub status: AppointmentStatus,
    /// Payment method
    pub payment_method: Option<PaymentMethod>,
    /// Amount charged
    pub amount: Option<f64>,
    /// Whether the appointment has been paid
    pub paid: bool,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Private appointments with a non-zero amount generate a ledger entry.
fn billable_amount(insurance_id: Option<i64>, amount: Option<f64>) -> Option<f64> {
    amount.filter(|value| insurance_id.is_none() && *value != 0.0)
}

/// Verifies that every referenced row exists before writing an appointment.
async fn ensure_references<C>(
    conn: &C,
    professional_id: i64,
    patient_id: i64,
    insurance_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if Professional::find_by_id(professional_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(Error::ReferenceNotFound {
            entity: "Professional",
            id: professional_id,
        });
    }

    if Patient::find_by_id(patient_id).one(conn).await?.is_none() {
        return Err(Error::ReferenceNotFound {
            entity: "Patient",
            id: patient_id,
        });
    }

    if let Some(insurance_id) = insurance_id {
        if Insurance::find_by_id(insurance_id).one(conn).await?.is_none() {
            return Err(Error::ReferenceNotFound {
                entity: "Insurance",
                id: insurance_id,
            });
        }
    }

    Ok(())
}

/// Books an appointment.
///
/// When the appointment is private and carries a non-zero amount, one unpaid
/// `incoming` cash flow entry described as `Consulta {patient_id} - {time}` is
/// written in the same transaction and linked to the new appointment.
///
/// # Errors
/// Returns an error if:
/// - The professional, patient or insurance does not exist
/// - Either insert fails (nothing is persisted in that case)
pub async fn create_appointment(
    db: &DatabaseConnection,
    new: NewAppointment,
) -> Result<appointment::Model> {
    let txn = db.begin().await?;

    ensure_references(&txn, new.professional_id, new.patient_id, new.insurance_id).await?;

    let ledger_amount = billable_amount(new.insurance_id, new.amount);
    let appointment = appointment::ActiveModel {
        date: Set(new.date),
        time: Set(new.time),
        professional_id: Set(new.professional_id),
        patient_id: Set(new.patient_id),
        insurance_id: Set(new.insurance_id),
        status: Set(new.status.as_str().to_string()),
        payment_method: Set(new.payment_method.map(|m| m.as_str().to_string())),
        paid: Set(false),
        amount: Set(new.amount),
        notes: Set(new.notes),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(amount) = ledger_amount {
        cash_flow::insert_appointment_entry(&txn, &appointment, amount).await?;
    }

    txn.commit().await?;

    info!(
        id = appointment.id,
        date = %appointment.date,
        time = %appointment.time,
        private = appointment.insurance_id.is_none(),
        "Appointment booked"
    );
    Ok(appointment)
}

/// Changes the status of an appointment.
///
/// Returns `None` without writing anything when the appointment does not exist.
pub async fn update_appointment_status(
    db: &DatabaseConnection,
    appointment_id: i64,
    status: AppointmentStatus,
) -> Result<Option<appointment::Model>> {
    let Some(existing) = Appointment::find_by_id(appointment_id).one(db).await? else {
        warn!(appointment_id, "Appointment not found, status unchanged");
        return Ok(None);
    };

    let mut model: appointment::ActiveModel = existing.into();
    model.status = Set(status.as_str().to_string());
    let updated = model.update(db).await?;

    info!(id = updated.id, status = %status, "Appointment status changed");
    Ok(Some(updated))
}

/// Sets the paid flag of an appointment.
///
/// When `paid` is true and the appointment is private, its linked cash flow entry
/// (if any) is marked paid with today's date. Insured appointments never touch the
/// ledger. Returns `None` when the appointment does not exist.
pub async fn mark_payment(
    db: &DatabaseConnection,
    appointment_id: i64,
    paid: bool,
) -> Result<Option<appointment::Model>> {
    let txn = db.begin().await?;

    let Some(existing) = Appointment::find_by_id(appointment_id).one(&txn).await? else {
        warn!(appointment_id, "Appointment not found, payment unchanged");
        return Ok(None);
    };

    let private = existing.insurance_id.is_none();
    let mut model: appointment::ActiveModel = existing.into();
    model.paid = Set(paid);
    let updated = model.update(&txn).await?;

    if paid && private {
        let today = Local::now().date_naive();
        if cash_flow::settle_entry_for_appointment(&txn, appointment_id, today)
            .await?
            .is_none()
        {
            debug!(appointment_id, "Private appointment has no cash flow entry");
        }
    }

    txn.commit().await?;

    info!(id = updated.id, paid, "Appointment payment updated");
    Ok(Some(updated))
}

/// Applies the edit form to an appointment and keeps its ledger entry in sync.
///
/// Returns `None` when the appointment does not exist.
///
/// # Errors
/// Returns an error if the new patient or insurance does not exist.
pub async fn update_appointment(
    db: &DatabaseConnection,
    appointment_id: i64,
    changes: AppointmentChanges,
) -> Result<Option<appointment::Model>> {
    let txn = db.begin().await?;

    let Some(existing) = Appointment::find_by_id(appointment_id).one(&txn).await? else {
        warn!(appointment_id, "Appointment not found, nothing to edit");
        return Ok(None);
    };

    ensure_references(
        &txn,
        existing.professional_id,
        changes.patient_id,
        changes.insurance_id,
    )
    .await?;

    let mut model: appointment::ActiveModel = existing.into();
    model.patient_id = Set(changes.patient_id);
    model.insurance_id = Set(changes.insurance_id);
    model.status = Set(changes.status.as_str().to_string());
    model.payment_method = Set(changes.payment_method.map(|m| m.as_str().to_string()));
    model.amount = Set(changes.amount);
    model.paid = Set(changes.paid);
    model.notes = Set(changes.notes);
    let updated = model.update(&txn).await?;

    cash_flow::sync_entry_for_appointment(&txn, &updated, Local::now().date_naive()).await?;

    txn.commit().await?;

    info!(id = updated.id, "Appointment updated");
    Ok(Some(updated))
}

/// Cancels (deletes) an appointment.
///
/// Unpaid linked ledger entries are deleted with it; paid ones are kept as
/// history and detached. Returns `false` when the appointment does not exist.
pub async fn cancel_appointment(db: &DatabaseConnection, appointment_id: i64) -> Result<bool> {
    let txn = db.begin().await?;

    let Some(existing) = Appointment::find_by_id(appointment_id).one(&txn).await? else {
        warn!(appointment_id, "Appointment not found, nothing to cancel");
        return Ok(false);
    };

    cash_flow::release_entries_for_appointment(&txn, existing.id).await?;
    existing.delete(&txn).await?;

    txn.commit().await?;

    info!(appointment_id, "Appointment cancelled");
    Ok(true)
}

/// Finds an appointment by primary key.
pub async fn get_appointment_by_id(
    db: &DatabaseConnection,
    appointment_id: i64,
) -> Result<Option<appointment::Model>> {
    Appointment::find_by_id(appointment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a professional's appointments on a given day, ordered by time slot.
///
/// Slots are zero-padded `HH:MM` strings, so lexical order is chronological.
pub async fn get_appointments_by_date_and_professional(
    db: &DatabaseConnection,
    date: Date,
    professional_name: &str,
) -> Result<Vec<appointment::Model>> {
    debug!(%date, professional_name, "Loading agenda");
    Appointment::find()
        .inner_join(Professional)
        .filter(appointment::Column::Date.eq(date))
        .filter(professional::Column::Name.eq(professional_name))
        .order_by_asc(appointment::Column::Time)
        .all(db)
        .await
        .map_err(Into::into)
}
