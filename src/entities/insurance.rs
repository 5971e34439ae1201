//! Insurance entity - a payer covering appointments instead of the patient.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insurance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insurances")]
pub struct Model {
    /// Unique identifier for the insurance
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Payer name, unique across the clinic
    #[sea_orm(unique)]
    pub name: String,
    /// Inactive insurances are hidden from listings and forms
    pub active: bool,
}

/// Defines relationships between Insurance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One insurance covers many appointments
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointments,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
