//! Patient entity - a person who books appointments.
//!
//! Only `name` and `phone` are mandatory; the remaining contact fields are optional.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Patient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    /// Unique identifier for the patient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name (not unique)
    pub name: String,
    /// Mobile phone number
    pub phone: String,
    /// Optional e-mail address
    pub email: Option<String>,
    /// Optional date of birth
    pub birth_date: Option<Date>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Defines relationships between Patient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One patient has many appointments
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointments,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
