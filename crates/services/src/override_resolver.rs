use std::sync::Arc;

use flash_core::model::{OverrideField, Overrides};
use storage::repository::SettingsStore;

use crate::error::OverrideError;

/// Reads the location-dependent answer overrides from the settings store.
///
/// Nothing is cached; every call reads the store so edits show up on the
/// next reload.
#[derive(Clone)]
pub struct OverrideResolver {
    store: Arc<dyn SettingsStore>,
}

impl OverrideResolver {
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Current overrides. Blank or unreadable settings are left out.
    pub async fn current_overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        for field in OverrideField::ALL {
            match self.store.get(field.key()).await {
                Ok(Some(value)) => {
                    overrides.insert(field, &value);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("failed to read override {field}: {err}");
                }
            }
        }
        overrides
    }

    /// Persist a trimmed override value. A blank value clears the override.
    ///
    /// # Errors
    ///
    /// Returns `OverrideError::Storage` if the store rejects the write.
    pub async fn save_override(
        &self,
        field: OverrideField,
        value: &str,
    ) -> Result<(), OverrideError> {
        self.store.set(field.key(), value.trim()).await?;
        log::debug!("saved override {field}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flash_core::model::CardId;
    use storage::repository::{InMemorySettingsStore, StorageError};

    struct BrokenStore;

    #[async_trait]
    impl SettingsStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn maps_fields_to_fixed_ids() {
        let store = InMemorySettingsStore::new();
        store.set("senator", "Jane Doe").await.unwrap();
        store.set("representative", "  Pat Roe ").await.unwrap();
        store.set("governor", "Alex Poe").await.unwrap();
        store.set("capital", "Albany").await.unwrap();

        let overrides = OverrideResolver::new(Arc::new(store)).current_overrides().await;

        assert_eq!(overrides.get(CardId::new(23)), Some("Jane Doe"));
        assert_eq!(overrides.get(CardId::new(29)), Some("Pat Roe"));
        assert_eq!(overrides.get(CardId::new(61)), Some("Alex Poe"));
        assert_eq!(overrides.get(CardId::new(62)), Some("Albany"));
    }

    #[tokio::test]
    async fn blank_values_are_absent() {
        let store = InMemorySettingsStore::new();
        store.set("governor", "   ").await.unwrap();

        let overrides = OverrideResolver::new(Arc::new(store)).current_overrides().await;
        assert!(overrides.is_empty());
    }

    #[tokio::test]
    async fn reads_fresh_values_each_call() {
        let store = Arc::new(InMemorySettingsStore::new());
        let resolver = OverrideResolver::new(store.clone());
        assert!(resolver.current_overrides().await.is_empty());

        resolver
            .save_override(OverrideField::Capital, " Sacramento ")
            .await
            .unwrap();
        assert_eq!(
            store.get("capital").await.unwrap().as_deref(),
            Some("Sacramento")
        );
        assert_eq!(
            resolver.current_overrides().await.get(CardId::new(62)),
            Some("Sacramento")
        );
    }

    #[tokio::test]
    async fn unreadable_store_yields_no_overrides() {
        let resolver = OverrideResolver::new(Arc::new(BrokenStore));
        assert!(resolver.current_overrides().await.is_empty());

        let err = resolver
            .save_override(OverrideField::Senator, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, OverrideError::Storage(_)));
    }
}
