//! Professional entity - a clinician whose agenda holds appointments.
//!
//! Names are unique at the storage level. Professionals are never deleted;
//! they are soft-deactivated through the `active` flag instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Professional database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "professionals")]
pub struct Model {
    /// Unique identifier for the professional
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across the clinic
    #[sea_orm(unique)]
    pub name: String,
    /// Medical specialty (e.g., "Cardiology")
    pub specialty: String,
    /// Inactive professionals are hidden from listings and the agenda
    pub active: bool,
}

/// Defines relationships between Professional and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One professional has many appointments
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointments,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
