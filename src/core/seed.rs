//! Startup seeding from config.toml.
//!
//! Professionals and insurances listed in the configuration are created when no
//! row with the same name exists. Existing rows are left as they are, including
//! their active flag.

use crate::{
    config::clinic::ClinicConfig,
    core::{
        forms::{InsuranceForm, ProfessionalForm},
        insurance::{create_insurance, get_insurance_by_name},
        professional::{create_professional, get_professional_by_name},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::info;

/// Number of rows created by [`seed_from_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    /// Professionals inserted
    pub professionals: usize,
    /// Insurances inserted
    pub insurances: usize,
}

/// Creates the configured professionals and insurances that are missing.
///
/// # Errors
/// Fails on the first invalid entry (blank name, reserved insurance name) or
/// storage error.
pub async fn seed_from_config(db: &DatabaseConnection, config: &ClinicConfig) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for entry in &config.professionals {
        let form = ProfessionalForm {
            name: entry.name.clone(),
            specialty: entry.specialty.clone(),
        }
        .validate()?;

        if get_professional_by_name(db, &form.name).await?.is_none() {
            create_professional(db, form.name, form.specialty).await?;
            report.professionals += 1;
        }
    }

    for name in &config.insurances {
        let name = InsuranceForm { name: name.clone() }.validate()?;

        if get_insurance_by_name(db, &name).await?.is_none() {
            create_insurance(db, name).await?;
            report.insurances += 1;
        }
    }

    info!(
        professionals = report.professionals,
        insurances = report.insurances,
        "Seed data applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::clinic::ProfessionalConfig,
        core::{insurance::get_insurances, professional::get_professionals},
        errors::Error,
        test_utils::*,
    };

    fn config() -> ClinicConfig {
        ClinicConfig {
            professionals: vec![
                ProfessionalConfig {
                    name: "Dra. Ana Souza".to_string(),
                    specialty: "Cardiology".to_string(),
                },
                ProfessionalConfig {
                    name: "Dr. Bruno Lima".to_string(),
                    specialty: "Dermatology".to_string(),
                },
            ],
            insurances: vec!["Unimed".to_string(), "Amil".to_string()],
            ..ClinicConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = seed_from_config(&db, &config()).await?;
        assert_eq!(
            first,
            SeedReport {
                professionals: 2,
                insurances: 2
            }
        );

        let second = seed_from_config(&db, &config()).await?;
        assert_eq!(second, SeedReport::default());
        assert_eq!(get_professionals(&db).await?.len(), 2);
        assert_eq!(get_insurances(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_skips_existing_rows() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_professional(&db, "Dra. Ana Souza").await?;

        let report = seed_from_config(&db, &config()).await?;
        assert_eq!(report.professionals, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_reserved_insurance() -> Result<()> {
        let db = setup_test_db().await?;
        let config = ClinicConfig {
            insurances: vec!["Particular".to_string()],
            ..ClinicConfig::default()
        };

        let result = seed_from_config(&db, &config).await;
        assert!(matches!(result, Err(Error::ReservedName { .. })));
        Ok(())
    }
}
