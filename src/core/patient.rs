//! Patient business logic - registration, editing and name search.

use crate::{
    entities::{Patient, patient},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Func};
use tracing::{debug, info, warn};

/// Full replacement of a patient's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientChanges {
    /// Full name
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

/// Registers a new patient.
pub async fn create_patient(
    db: &DatabaseConnection,
    name: String,
    phone: String,
    email: Option<String>,
    birth_date: Option<Date>,
    notes: Option<String>,
) -> Result<patient::Model> {
    let patient = patient::ActiveModel {
        name: Set(name),
        phone: Set(phone),
        email: Set(email),
        birth_date: Set(birth_date),
        notes: Set(notes),
        ..Default::default()
    };

    let result = patient.insert(db).await?;
    info!(id = result.id, "Patient registered");
    Ok(result)
}

/// Lists patients ordered by name, optionally keeping only those whose name
/// contains `search` (case-insensitive). An empty search lists everyone.
///
/// SQLite's `LOWER` only folds ASCII, so the match runs on Unicode-lowercased
/// names here rather than in SQL.
pub async fn get_patients(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<patient::Model>> {
    let patients = Patient::find()
        .order_by_asc(Expr::expr(Func::lower(Expr::col(patient::Column::Name))))
        .order_by_asc(patient::Column::Id)
        .all(db)
        .await?;

    let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(patients);
    };

    debug!(term, "Searching patients");
    let term = term.to_lowercase();
    Ok(patients
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&term))
        .collect())
}

/// Finds a patient by primary key.
pub async fn get_patient_by_id(
    db: &DatabaseConnection,
    patient_id: i64,
) -> Result<Option<patient::Model>> {
    Patient::find_by_id(patient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a patient by exact name. Names are not unique, so the oldest
/// registration wins.
pub async fn get_patient_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<patient::Model>> {
    Patient::find()
        .filter(patient::Column::Name.eq(name))
        .order_by_asc(patient::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Replaces a patient's editable fields. Returns `None` if the id does not exist.
pub async fn update_patient(
    db: &DatabaseConnection,
    patient_id: i64,
    changes: PatientChanges,
) -> Result<Option<patient::Model>> {
    let Some(existing) = Patient::find_by_id(patient_id).one(db).await? else {
        warn!(patient_id, "Patient not found, nothing to update");
        return Ok(None);
    };

    let mut model: patient::ActiveModel = existing.into();
    model.name = Set(changes.name);
    model.phone = Set(changes.phone);
    model.email = Set(changes.email);
    model.birth_date = Set(changes.birth_date);
    model.notes = Set(changes.notes);

    let updated = model.update(db).await?;
    info!(id = updated.id, "Patient updated");
    Ok(Some(updated))
}
