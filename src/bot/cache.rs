//! Short-lived read cache for listings shown by the bot.
//!
//! Autocomplete fires on every keystroke, so professional, insurance and patient
//! listings are kept in memory for `cache_ttl_secs`. Every command that writes
//! calls [`ReadCache::invalidate`] before replying, so a user never sees a
//! listing older than their own last write.

use crate::{
    core::{insurance, patient, professional},
    entities::{insurance as insurance_entity, patient as patient_entity, professional as professional_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::{
    collections::HashMap,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::trace;

/// A map whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    /// Stores `value` under `key`, resetting its age. Expired entries are
    /// dropped on the way, so the map only holds what is still fresh.
    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Cached read models used by autocomplete and listing commands.
#[derive(Debug, Clone)]
pub struct ReadCache {
    professionals: Arc<TtlCache<(), Vec<professional_entity::Model>>>,
    insurances: Arc<TtlCache<(), Vec<insurance_entity::Model>>>,
    patients: Arc<TtlCache<String, Vec<patient_entity::Model>>>,
}

impl ReadCache {
    /// Creates empty caches sharing one time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            professionals: Arc::new(TtlCache::new(ttl)),
            insurances: Arc::new(TtlCache::new(ttl)),
            patients: Arc::new(TtlCache::new(ttl)),
        }
    }

    /// Active professionals, by name.
    pub async fn professionals(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Vec<professional_entity::Model>> {
        if let Some(hit) = self.professionals.get(&()).await {
            trace!("professionals cache hit");
            return Ok(hit);
        }
        let fresh = professional::get_professionals(db).await?;
        self.professionals.insert((), fresh.clone()).await;
        Ok(fresh)
    }

    /// Active insurances, by name.
    pub async fn insurances(&self, db: &DatabaseConnection) -> Result<Vec<insurance_entity::Model>> {
        if let Some(hit) = self.insurances.get(&()).await {
            trace!("insurances cache hit");
            return Ok(hit);
        }
        let fresh = insurance::get_insurances(db).await?;
        self.insurances.insert((), fresh.clone()).await;
        Ok(fresh)
    }

    /// Patients matching `search`, keyed by the normalized search term.
    pub async fn patients(
        &self,
        db: &DatabaseConnection,
        search: &str,
    ) -> Result<Vec<patient_entity::Model>> {
        let key = search.trim().to_lowercase();
        if let Some(hit) = self.patients.get(&key).await {
            trace!(search = %key, "patients cache hit");
            return Ok(hit);
        }
        let fresh = patient::get_patients(db, Some(key.as_str())).await?;
        self.patients.insert(key, fresh.clone()).await;
        Ok(fresh)
    }

    /// Forgets everything; called after every write.
    pub async fn invalidate(&self) {
        self.professionals.clear().await;
        self.insurances.clear().await;
        self.patients.clear().await;
        trace!("read cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_ttl_cache_hit_and_clear() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"a").await, None);

        cache.insert("a", 1).await;
        assert_eq!(cache.get(&"a").await, Some(1));

        cache.clear().await;
        assert_eq!(cache.get(&"a").await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_hits() {
        let cache: TtlCache<(), u32> = TtlCache::new(Duration::ZERO);
        cache.insert((), 7).await;
        assert_eq!(cache.get(&()).await, None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_on_insert() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::ZERO);
        for key in 0..1000 {
            cache.insert(key, key).await;
        }
        assert_eq!(cache.entries.read().await.len(), 1);

        let fresh: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60));
        for key in 0..10 {
            fresh.insert(key, key).await;
        }
        assert_eq!(fresh.entries.read().await.len(), 10);
    }

    #[tokio::test]
    async fn test_read_cache_serves_stale_until_invalidated() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = ReadCache::new(Duration::from_secs(300));
        create_test_professional(&db, "Dra. Ana Souza").await?;

        assert_eq!(cache.professionals(&db).await?.len(), 1);

        create_test_professional(&db, "Dr. Bruno Lima").await?;
        assert_eq!(cache.professionals(&db).await?.len(), 1);

        cache.invalidate().await;
        assert_eq!(cache.professionals(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_patient_cache_keys_by_search() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = ReadCache::new(Duration::from_secs(300));
        create_test_patient(&db, "Ana Paula").await?;
        create_test_patient(&db, "Carlos Pereira").await?;

        assert_eq!(cache.patients(&db, "ANA").await?.len(), 1);
        assert_eq!(cache.patients(&db, "").await?.len(), 2);
        assert_eq!(cache.insurances(&db).await?.len(), 0);
        Ok(())
    }
}
