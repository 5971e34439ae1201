//! Shared test utilities for the clinic agenda.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        appointment::{self, NewAppointment},
        insurance, patient, professional,
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a date, panicking on invalid input (tests only).
#[allow(clippy::unwrap_used)]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test professional.
///
/// # Defaults
/// * `specialty`: "General Practice"
pub async fn create_test_professional(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::professional::Model> {
    professional::create_professional(db, name.to_string(), "General Practice".to_string()).await
}

/// Creates a test patient.
///
/// # Defaults
/// * `phone`: "11 99999-0000"
/// * `email`, `birth_date`, `notes`: None
pub async fn create_test_patient(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::patient::Model> {
    patient::create_patient(
        db,
        name.to_string(),
        "11 99999-0000".to_string(),
        None,
        None,
        None,
    )
    .await
}

/// Creates a test insurance.
pub async fn create_test_insurance(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::insurance::Model> {
    insurance::create_insurance(db, name.to_string()).await
}

/// Books a private appointment on 2024-06-01 at the given slot.
pub async fn book_private(
    db: &DatabaseConnection,
    professional_id: i64,
    patient_id: i64,
    time: &str,
    amount: Option<f64>,
) -> Result<entities::appointment::Model> {
    appointment::create_appointment(
        db,
        NewAppointment {
            amount,
            ..NewAppointment::new(ymd(2024, 6, 1), time, professional_id, patient_id)
        },
    )
    .await
}

/// Books an insured appointment on 2024-06-01 at the given slot.
pub async fn book_insured(
    db: &DatabaseConnection,
    professional_id: i64,
    patient_id: i64,
    insurance_id: i64,
    time: &str,
    amount: Option<f64>,
) -> Result<entities::appointment::Model> {
    appointment::create_appointment(
        db,
        NewAppointment {
            insurance_id: Some(insurance_id),
            amount,
            ..NewAppointment::new(ymd(2024, 6, 1), time, professional_id, patient_id)
        },
    )
    .await
}

/// Sets up a database with one professional and one patient.
/// Returns (db, professional, patient) for booking tests.
pub async fn setup_with_parties() -> Result<(
    DatabaseConnection,
    entities::professional::Model,
    entities::patient::Model,
)> {
    let db = setup_test_db().await?;
    let professional = create_test_professional(&db, "Dra. Ana Souza").await?;
    let patient = create_test_patient(&db, "Carlos Pereira").await?;
    Ok((db, professional, patient))
}
