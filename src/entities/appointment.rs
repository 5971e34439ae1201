//! Appointment entity - one booked time slot in a professional's agenda.
//!
//! `time` holds one of the fixed half-hour slot strings (`"08:00"` .. `"17:30"`),
//! `status` one of `agendado`, `aguardando`, `em_consulta`, `encerrado`.
//! Appointments without an `insurance_id` are private; when such an appointment
//! carries an amount, a linked `cash_flow` row exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Appointment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    /// Unique identifier for the appointment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Day of the appointment
    pub date: Date,
    /// Start time slot, zero-padded `HH:MM`
    pub time: String,
    /// Professional attending the appointment
    pub professional_id: i64,
    /// Patient being seen
    pub patient_id: i64,
    /// Covering insurance, `None` for private appointments
    pub insurance_id: Option<i64>,
    /// Workflow status
    pub status: String,
    /// How the patient pays (e.g., `"PIX"`)
    pub payment_method: Option<String>,
    /// Whether the appointment has been paid
    pub paid: bool,
    /// Amount charged for private appointments
    pub amount: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the appointment was booked
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Appointment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each appointment belongs to one professional
    #[sea_orm(
        belongs_to = "super::professional::Entity",
        from = "Column::ProfessionalId",
        to = "super::professional::Column::Id"
    )]
    Professional,
    /// Each appointment belongs to one patient
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::Id"
    )]
    Patient,
    /// Each appointment is optionally covered by one insurance
    #[sea_orm(
        belongs_to = "super::insurance::Entity",
        from = "Column::InsuranceId",
        to = "super::insurance::Column::Id"
    )]
    Insurance,
    /// Ledger rows generated by this appointment
    #[sea_orm(has_many = "super::cash_flow::Entity")]
    CashFlow,
}

impl Related<super::professional::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professional.def()
    }
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl Related<super::insurance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Insurance.def()
    }
}

impl Related<super::cash_flow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
