//! Cash flow entity - one ledger row for an expected or received payment.
//!
//! Rows created by booking a private appointment keep a nullable back-reference
//! in `appointment_id`; manual expenses have none. `type` is `"incoming"` or
//! `"outgoing"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash flow database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_flow")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date the entry is due (the appointment date for generated rows)
    pub date: Date,
    /// Human-readable description
    pub description: String,
    /// Amount in the clinic's currency
    pub amount: f64,
    /// Whether the money has changed hands
    pub paid: bool,
    /// When the payment was registered
    pub payment_date: Option<Date>,
    /// Originating appointment, if any
    pub appointment_id: Option<i64>,
    /// Direction tag: `"incoming"` or `"outgoing"`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// Defines relationships between `CashFlow` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each generated entry belongs to the appointment that produced it
    #[sea_orm(
        belongs_to = "super::appointment::Entity",
        from = "Column::AppointmentId",
        to = "super::appointment::Column::Id"
    )]
    Appointment,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
