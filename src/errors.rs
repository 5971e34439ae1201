//! Unified error type for the clinic agenda.
//!
//! Form validation failures, storage failures and Discord framework failures all
//! funnel into [`Error`] so that `?` works across the core and bot layers.

use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;

/// All errors produced by the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any failure reported by the storage layer (constraint violations included)
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing into a `String` buffer failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// A required form field was left empty
    #[error("Field '{field}' is required")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// Amount was negative or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Time is not one of the bookable slots
    #[error("Invalid time slot: '{time}'")]
    InvalidTimeSlot {
        /// The rejected time string
        time: String,
    },

    /// Date string could not be parsed
    #[error("Invalid date: '{input}' (expected YYYY-MM-DD or DD/MM/YYYY)")]
    InvalidDate {
        /// The rejected input
        input: String,
    },

    /// Birth date lies in the future
    #[error("Birth date {date} is in the future")]
    FutureBirthDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// Status string is not one of the known appointment statuses
    #[error("Unknown appointment status: '{value}'")]
    UnknownStatus {
        /// The rejected value
        value: String,
    },

    /// Payment method string is not one of the known methods
    #[error("Unknown payment method: '{value}'")]
    UnknownPaymentMethod {
        /// The rejected value
        value: String,
    },

    /// Stored cash flow direction is neither incoming nor outgoing
    #[error("Unknown cash flow type: '{value}'")]
    UnknownEntryType {
        /// The rejected value
        value: String,
    },

    /// A referenced row (professional, patient, insurance) does not exist
    #[error("{entity} {id} not found")]
    ReferenceNotFound {
        /// Kind of record that was referenced
        entity: &'static str,
        /// The missing primary key
        id: i64,
    },

    /// A record looked up by name (e.g., from a form selection) does not exist
    #[error("{entity} '{name}' not found")]
    NotFoundByName {
        /// Kind of record that was looked up
        entity: &'static str,
        /// The name that did not match
        name: String,
    },

    /// Name collides with a reserved form value
    #[error("'{name}' is a reserved name")]
    ReservedName {
        /// The rejected name
        name: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Whether this error is a unique-constraint violation from the database,
    /// e.g. registering a second professional with the same name.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => {
                matches!(
                    err.sql_err(),
                    Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
                ) || {
                    let msg = err.to_string();
                    msg.contains("UNIQUE") || msg.contains("unique")
                }
            }
            _ => false,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
