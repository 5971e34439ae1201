//! Form validation at the presentation boundary.
//!
//! The bot collects raw user input into these structs; `validate` trims it,
//! rejects anything the command layer must never see and returns values the
//! core functions accept directly. Patient and insurance references arrive by
//! name and are resolved against the database as the last step.

use crate::{
    core::{
        appointment::{AppointmentChanges, AppointmentStatus, NewAppointment, PaymentMethod},
        insurance::{PRIVATE_INSURANCE_LABEL, get_insurance_by_name},
        patient::{PatientChanges, get_patient_by_name},
        schedule::is_valid_time_slot,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Parses a date written as `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| Error::InvalidDate {
            input: input.to_string(),
        })
}

/// Checks that `time` is one of the bookable slots.
pub fn parse_time_slot(time: &str) -> Result<String> {
    let trimmed = time.trim();
    if is_valid_time_slot(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Error::InvalidTimeSlot {
            time: time.to_string(),
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Raw appointment form (booking and editing share it).
#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    /// Patient name as typed or autocompleted
    pub patient: String,
    /// Insurance name; `None`, blank or `Particular` mean private
    pub insurance: Option<String>,
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

/// An appointment form that passed validation; names are not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAppointmentForm {
    /// Trimmed patient name
    pub patient: String,
    /// Insurance name, `None` for private
    pub insurance: Option<String>,
    /// Workflow status
    pub status: AppointmentStatus,
    /// Payment method
    pub payment_method: Option<PaymentMethod>,
    /// Amount, always `None` for insured appointments
    pub amount: Option<f64>,
    /// Paid flag
    pub paid: bool,
    /// Notes
    pub notes: Option<String>,
}

impl AppointmentForm {
    /// Validates the raw input.
    ///
    /// # Errors
    /// `MissingField` for a blank patient, `InvalidAmount` for a negative or
    /// non-finite amount.
    pub fn validate(self) -> Result<ValidAppointmentForm> {
        let patient = required(self.patient, "patient")?;
        let insurance =
            optional(self.insurance).filter(|name| !name.eq_ignore_ascii_case(PRIVATE_INSURANCE_LABEL));

        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }

        Ok(ValidAppointmentForm {
            amount: if insurance.is_some() { None } else { self.amount },
            patient,
            insurance,
            status: self.status,
            payment_method: self.payment_method,
            paid: self.paid,
            notes: optional(self.notes),
        })
    }
}

impl ValidAppointmentForm {
    /// Resolves the patient and insurance names to ids.
    async fn resolve(&self, db: &DatabaseConnection) -> Result<(i64, Option<i64>)> {
        let patient = get_patient_by_name(db, &self.patient)
            .await?
            .ok_or_else(|| Error::NotFoundByName {
                entity: "Patient",
                name: self.patient.clone(),
            })?;

        let insurance_id = match &self.insurance {
            Some(name) => Some(
                get_insurance_by_name(db, name)
                    .await?
                    .ok_or_else(|| Error::NotFoundByName {
                        entity: "Insurance",
                        name: name.clone(),
                    })?
                    .id,
            ),
            None => None,
        };

        Ok((patient.id, insurance_id))
    }

    /// Builds the booking input for `date`/`time` in a professional's agenda.
    pub async fn into_new_appointment(
        self,
        db: &DatabaseConnection,
        date: NaiveDate,
        time: &str,
        professional_id: i64,
    ) -> Result<NewAppointment> {
        let time = parse_time_slot(time)?;
        let (patient_id, insurance_id) = self.resolve(db).await?;

        Ok(NewAppointment {
            insurance_id,
            status: self.status,
            payment_method: self.payment_method,
            amount: self.amount,
            notes: self.notes,
            ..NewAppointment::new(date, &time, professional_id, patient_id)
        })
    }

    /// Builds the edit input for an existing appointment.
    pub async fn into_changes(self, db: &DatabaseConnection) -> Result<AppointmentChanges> {
        let (patient_id, insurance_id) = self.resolve(db).await?;

        Ok(AppointmentChanges {
            patient_id,
            insurance_id,
            status: self.status,
            payment_method: self.payment_method,
            amount: self.amount,
            paid: self.paid,
            notes: self.notes,
        })
    }
}

/// Raw patient form.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    /// Full name (required)
    pub name: String,
    /// Phone (required)
    pub phone: String,
    /// E-mail
    pub email: Option<String>,
    /// Birth date as typed
    pub birth_date: Option<String>,
    /// Notes
    pub notes: Option<String>,
}

impl PatientForm {
    /// Validates the raw input against `today`.
    ///
    /// # Errors
    /// `MissingField`, `InvalidDate`, or `FutureBirthDate` when the birth date
    /// is after `today`.
    pub fn validate(self, today: NaiveDate) -> Result<PatientChanges> {
        let name = required(self.name, "name")?;
        let phone = required(self.phone, "phone")?;

        let birth_date = match optional(self.birth_date) {
            Some(raw) => {
                let date = parse_date(&raw)?;
                if date > today {
                    return Err(Error::FutureBirthDate { date });
                }
                Some(date)
            }
            None => None,
        };

        Ok(PatientChanges {
            name,
            phone,
            email: optional(self.email),
            birth_date,
            notes: optional(self.notes),
        })
    }
}

/// Raw professional form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalForm {
    /// Display name
    pub name: String,
    /// Specialty
    pub specialty: String,
}

impl ProfessionalForm {
    /// Trims and requires both fields.
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            name: required(self.name, "name")?,
            specialty: required(self.specialty, "specialty")?,
        })
    }
}

/// Raw insurance form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsuranceForm {
    /// Insurance name
    pub name: String,
}

impl InsuranceForm {
    /// Trims the name and rejects the private-payment label.
    pub fn validate(self) -> Result<String> {
        let name = required(self.name, "name")?;
        if name.eq_ignore_ascii_case(PRIVATE_INSURANCE_LABEL) {
            return Err(Error::ReservedName { name });
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn form(patient: &str) -> AppointmentForm {
        AppointmentForm {
            patient: patient.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-06-01").unwrap(), ymd(2024, 6, 1));
        assert_eq!(parse_date(" 01/06/2024 ").unwrap(), ymd(2024, 6, 1));
        assert!(matches!(
            parse_date("06-01-2024"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_time_slot() {
        assert_eq!(parse_time_slot(" 13:30").unwrap(), "13:30");
        assert!(matches!(
            parse_time_slot("12:30"),
            Err(Error::InvalidTimeSlot { .. })
        ));
    }

    #[test]
    fn test_appointment_form_requires_patient() {
        assert!(matches!(
            form("   ").validate(),
            Err(Error::MissingField { field: "patient" })
        ));
    }

    #[test]
    fn test_appointment_form_rejects_bad_amounts() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            let result = AppointmentForm {
                amount: Some(amount),
                ..form("Ana")
            }
            .validate();
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let zero = AppointmentForm {
            amount: Some(0.0),
            ..form("Ana")
        }
        .validate()
        .unwrap();
        assert_eq!(zero.amount, Some(0.0));
    }

    #[test]
    fn test_private_sentinel_and_insured_amount() {
        let private = AppointmentForm {
            insurance: Some("particular".to_string()),
            amount: Some(150.0),
            ..form(" Ana ")
        }
        .validate()
        .unwrap();
        assert_eq!(private.patient, "Ana");
        assert_eq!(private.insurance, None);
        assert_eq!(private.amount, Some(150.0));

        let insured = AppointmentForm {
            insurance: Some("Unimed".to_string()),
            amount: Some(150.0),
            notes: Some("  ".to_string()),
            ..form("Ana")
        }
        .validate()
        .unwrap();
        assert_eq!(insured.insurance.as_deref(), Some("Unimed"));
        assert_eq!(insured.amount, None);
        assert_eq!(insured.notes, None);
    }

    #[test]
    fn test_patient_form_validation() {
        let today = ymd(2024, 6, 1);

        let valid = PatientForm {
            name: " Ana Paula ".to_string(),
            phone: "11 98888-0000".to_string(),
            email: Some(String::new()),
            birth_date: Some("14/03/1990".to_string()),
            notes: None,
        }
        .validate(today)
        .unwrap();
        assert_eq!(valid.name, "Ana Paula");
        assert_eq!(valid.email, None);
        assert_eq!(valid.birth_date, Some(ymd(1990, 3, 14)));

        let missing_phone = PatientForm {
            name: "Ana".to_string(),
            ..Default::default()
        }
        .validate(today);
        assert!(matches!(
            missing_phone,
            Err(Error::MissingField { field: "phone" })
        ));

        let future = PatientForm {
            name: "Ana".to_string(),
            phone: "1".to_string(),
            birth_date: Some("2024-06-02".to_string()),
            ..Default::default()
        }
        .validate(today);
        assert!(matches!(future, Err(Error::FutureBirthDate { .. })));

        let born_today = PatientForm {
            name: "Ana".to_string(),
            phone: "1".to_string(),
            birth_date: Some("2024-06-01".to_string()),
            ..Default::default()
        }
        .validate(today);
        assert!(born_today.is_ok());
    }

    #[test]
    fn test_insurance_form_rejects_private_label() {
        let reserved = InsuranceForm {
            name: " PARTICULAR ".to_string(),
        }
        .validate();
        assert!(matches!(reserved, Err(Error::ReservedName { .. })));
        assert_eq!(
            InsuranceForm {
                name: " Amil".to_string()
            }
            .validate()
            .unwrap(),
            "Amil"
        );
    }

    #[test]
    fn test_professional_form_requires_specialty() {
        let result = ProfessionalForm {
            name: "Dr. Bruno".to_string(),
            specialty: " ".to_string(),
        }
        .validate();
        assert!(matches!(
            result,
            Err(Error::MissingField { field: "specialty" })
        ));
    }

    #[tokio::test]
    async fn test_into_new_appointment_resolves_names() -> Result<()> {
        let (db, professional, patient) = setup_with_parties().await?;
        let insurance = create_test_insurance(&db, "Unimed").await?;

        let new = AppointmentForm {
            insurance: Some("Unimed".to_string()),
            ..form(&patient.name)
        }
        .validate()?
        .into_new_appointment(&db, ymd(2024, 6, 1), "10:00", professional.id)
        .await?;

        assert_eq!(new.patient_id, patient.id);
        assert_eq!(new.insurance_id, Some(insurance.id));
        assert_eq!(new.time, "10:00");
        assert_eq!(new.professional_id, professional.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_into_changes_reports_unknown_names() -> Result<()> {
        let (db, _, patient) = setup_with_parties().await?;

        let unknown_patient = form("Ghost").validate()?.into_changes(&db).await;
        assert!(matches!(
            unknown_patient,
            Err(Error::NotFoundByName {
                entity: "Patient",
                ..
            })
        ));

        let unknown_insurance = AppointmentForm {
            insurance: Some("Nope".to_string()),
            ..form(&patient.name)
        }
        .validate()?
        .into_changes(&db)
        .await;
        assert!(matches!(
            unknown_insurance,
            Err(Error::NotFoundByName {
                entity: "Insurance",
                ..
            })
        ));
        Ok(())
    }
}
