//! Insurance business logic - payer registry.

use crate::{
    entities::{Insurance, insurance},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Func};
use tracing::{info, warn};

/// Form label standing for "no insurance": the patient pays directly.
pub const PRIVATE_INSURANCE_LABEL: &str = "Particular";

/// Registers a new insurance.
///
/// Like professionals, uniqueness is left to the storage constraint.
pub async fn create_insurance(db: &DatabaseConnection, name: String) -> Result<insurance::Model> {
    let insurance = insurance::ActiveModel {
        name: Set(name),
        active: Set(true),
        ..Default::default()
    };

    let result = insurance.insert(db).await?;
    info!(id = result.id, name = %result.name, "Insurance registered");
    Ok(result)
}

/// Retrieves all active insurances, ordered alphabetically by name.
pub async fn get_insurances(db: &DatabaseConnection) -> Result<Vec<insurance::Model>> {
    Insurance::find()
        .filter(insurance::Column::Active.eq(true))
        .order_by_asc(Expr::expr(Func::lower(Expr::col(insurance::Column::Name))))
        .order_by_asc(insurance::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an insurance by exact name, active or not.
pub async fn get_insurance_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<insurance::Model>> {
    Insurance::find()
        .filter(insurance::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an insurance by primary key.
pub async fn get_insurance_by_id(
    db: &DatabaseConnection,
    insurance_id: i64,
) -> Result<Option<insurance::Model>> {
    Insurance::find_by_id(insurance_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Activates or deactivates an insurance. Returns `None` if the id does not exist.
pub async fn set_insurance_active(
    db: &DatabaseConnection,
    insurance_id: i64,
    active: bool,
) -> Result<Option<insurance::Model>> {
    let Some(existing) = Insurance::find_by_id(insurance_id).one(db).await? else {
        warn!(insurance_id, "Insurance not found, nothing to update");
        return Ok(None);
    };

    let mut model: insurance::ActiveModel = existing.into();
    model.active = Set(active);
    let updated = model.update(db).await?;
    info!(id = updated.id, active, "Insurance active flag changed");
    Ok(Some(updated))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_list_insurances() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_insurance(&db, "Unimed").await?;
        create_test_insurance(&db, "Amil").await?;
        let retired = create_test_insurance(&db, "Golden Cross").await?;
        set_insurance_active(&db, retired.id, false).await?;

        let names: Vec<String> = get_insurances(&db)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Amil", "Unimed"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_insurances_sort_ignoring_case() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_insurance(&db, "Unimed").await?;
        create_test_insurance(&db, "bradesco Saúde").await?;
        create_test_insurance(&db, "Amil").await?;

        let names: Vec<String> = get_insurances(&db)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Amil", "bradesco Saúde", "Unimed"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_insurance_rejected_by_storage() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_insurance(&db, "Unimed").await?;

        let err = create_test_insurance(&db, "Unimed").await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(get_insurances(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_insurance_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_insurance(&db, "Unimed").await?;

        assert_eq!(get_insurance_by_name(&db, "Unimed").await?, Some(created.clone()));
        assert_eq!(get_insurance_by_id(&db, created.id).await?, Some(created));
        assert!(get_insurance_by_name(&db, "unimed").await?.is_none());
        Ok(())
    }
}
