use std::collections::{HashMap, HashSet};

use meter_client::domain::PropertyId;

use super::ParseError;
use crate::store::PropertyStore;

/// Resolves Portfolio Manager ids to properties, remembering both hits and misses.
#[derive(Debug, Default)]
pub struct PropertyResolver {
    resolved: HashMap<String, PropertyId>,
    unlinkable: Vec<String>,
    unlinkable_seen: HashSet<String>,
}

impl PropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when no property state in the organization carries this id.
    ///
    /// Hits are cached, so each id reaches the store at most once per resolver
    /// (misses are looked up again but only recorded once).
    pub async fn resolve<P>(
        &mut self,
        store: &P,
        org_id: i64,
        source_id: &str,
    ) -> Result<Option<PropertyId>, ParseError>
    where
        P: PropertyStore + ?Sized,
    {
        if let Some(property_id) = self.resolved.get(source_id) {
            tracing::debug!(source_id, %property_id, "property id cache hit");
            return Ok(Some(*property_id));
        }

        let found = store
            .first_property_id(org_id, source_id)
            .await
            .map_err(|e| ParseError::Store(e.to_string()))?;

        match found {
            Some(property_id) => {
                self.resolved.insert(source_id.to_string(), property_id);
                Ok(Some(property_id))
            }
            None => {
                if self.unlinkable_seen.insert(source_id.to_string()) {
                    tracing::warn!(org_id, source_id, "no property found for portfolio manager id");
                    metrics::counter!("meter_parser_unlinkable_pm_ids_total").increment(1);
                    self.unlinkable.push(source_id.to_string());
                }
                Ok(None)
            }
        }
    }

    /// Ids that could not be linked, in the order they were first seen.
    pub fn unlinkable(&self) -> &[String] {
        &self.unlinkable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingStore {
        known: HashMap<String, PropertyId>,
        lookups: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl PropertyStore for CountingStore {
        async fn first_property_id(
            &self,
            _org_id: i64,
            pm_property_id: &str,
        ) -> anyhow::Result<Option<PropertyId>> {
            self.lookups
                .lock()
                .map_err(|_| anyhow::anyhow!("poisoned"))?
                .push(pm_property_id.to_string());
            Ok(self.known.get(pm_property_id).copied())
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl PropertyStore for FailingStore {
        async fn first_property_id(&self, _: i64, _: &str) -> anyhow::Result<Option<PropertyId>> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn resolved_ids_are_cached() {
        let mut store = CountingStore::default();
        store.known.insert("5766973".to_string(), PropertyId(17));
        let mut resolver = PropertyResolver::new();

        for _ in 0..3 {
            let found = resolver.resolve(&store, 1, "5766973").await.unwrap();
            assert_eq!(found, Some(PropertyId(17)));
        }

        assert_eq!(store.lookups.lock().unwrap().len(), 1);
        assert!(resolver.unlinkable().is_empty());
    }

    #[tokio::test]
    async fn unlinkable_ids_are_recorded_once() {
        let store = CountingStore::default();
        let mut resolver = PropertyResolver::new();

        assert_eq!(resolver.resolve(&store, 1, "111").await.unwrap(), None);
        assert_eq!(resolver.resolve(&store, 1, "222").await.unwrap(), None);
        assert_eq!(resolver.resolve(&store, 1, "111").await.unwrap(), None);

        assert_eq!(resolver.unlinkable(), ["111".to_string(), "222".to_string()]);
    }

    #[tokio::test]
    async fn store_failures_are_fatal() {
        let mut resolver = PropertyResolver::new();
        let err = resolver.resolve(&FailingStore, 1, "111").await.unwrap_err();
        assert!(matches!(err, ParseError::Store(msg) if msg.contains("connection refused")));
        assert!(resolver.unlinkable().is_empty());
    }
}
