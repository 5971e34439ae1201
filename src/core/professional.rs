//! Professional business logic - registration, listing and soft deactivation.

use crate::{
    entities::{Professional, professional},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Func};
use tracing::{debug, info, warn};

/// Registers a new professional.
///
/// Name uniqueness is enforced by the storage constraint only; a duplicate name
/// surfaces as `Error::Database` (see `Error::is_unique_violation`).
pub async fn create_professional(
    db: &DatabaseConnection,
    name: String,
    specialty: String,
) -> Result<professional::Model> {
    let professional = professional::ActiveModel {
        name: Set(name),
        specialty: Set(specialty),
        active: Set(true),
        ..Default::default()
    };

    let result = professional.insert(db).await?;
    info!(id = result.id, name = %result.name, "Professional registered");
    Ok(result)
}

/// Retrieves all active professionals, ordered alphabetically by name.
pub async fn get_professionals(db: &DatabaseConnection) -> Result<Vec<professional::Model>> {
    debug!("Loading active professionals");
    Professional::find()
        .filter(professional::Column::Active.eq(true))
        .order_by_asc(Expr::expr(Func::lower(Expr::col(professional::Column::Name))))
        .order_by_asc(professional::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a professional by exact name, active or not.
pub async fn get_professional_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<professional::Model>> {
    Professional::find()
        .filter(professional::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a professional by primary key.
pub async fn get_professional_by_id(
    db: &DatabaseConnection,
    professional_id: i64,
) -> Result<Option<professional::Model>> {
    Professional::find_by_id(professional_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Activates or deactivates a professional. Returns `None` if the id does not exist.
pub async fn set_professional_active(
    db: &DatabaseConnection,
    professional_id: i64,
    active: bool,
) -> Result<Option<professional::Model>> {
    let Some(existing) = Professional::find_by_id(professional_id).one(db).await? else {
        warn!(professional_id, "Professional not found, nothing to update");
        return Ok(None);
    };

    let mut model: professional::ActiveModel = existing.into();
    model.active = Set(active);
    let updated = model.update(db).await?;
    info!(id = updated.id, active, "Professional active flag changed");
    Ok(Some(updated))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_professional() -> Result<()> {
        let db = setup_test_db().await?;

        let created =
            create_professional(&db, "Dr. Bruno Lima".to_string(), "Dermatology".to_string())
                .await?;

        assert_eq!(created.name, "Dr. Bruno Lima");
        assert_eq!(created.specialty, "Dermatology");
        assert!(created.active);
        assert_eq!(get_professional_by_id(&db, created.id).await?, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_unique_violation() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_professional(&db, "Dr. Bruno Lima").await?;

        let err = create_test_professional(&db, "Dr. Bruno Lima")
            .await
            .unwrap_err();
        assert!(err.is_unique_violation(), "unexpected error: {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_professionals_active_and_sorted() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_professional(&db, "Dr. Zeca").await?;
        let hidden = create_test_professional(&db, "Dr. Marcos").await?;
        create_test_professional(&db, "Dra. Ana").await?;

        set_professional_active(&db, hidden.id, false).await?;

        let names: Vec<String> = get_professionals(&db)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Dr. Zeca", "Dra. Ana"]);

        create_test_professional(&db, "dr. Carlos").await?;
        let names: Vec<String> = get_professionals(&db)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["dr. Carlos", "Dr. Zeca", "Dra. Ana"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_professional_by_name_includes_inactive() -> Result<()> {
        let db = setup_test_db().await?;
        let prof = create_test_professional(&db, "Dr. Marcos").await?;
        set_professional_active(&db, prof.id, false).await?;

        let found = get_professional_by_name(&db, "Dr. Marcos").await?.unwrap();
        assert!(!found.active);
        assert!(get_professional_by_name(&db, "Dr. Nobody").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_professional_active_missing() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(set_professional_active(&db, 42, false).await?.is_none());
        Ok(())
    }
}
