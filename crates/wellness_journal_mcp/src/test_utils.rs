//! Shared test helpers for handler unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use wellness_engine::{
    EntryStore, MemoryEntryStore, StoreError, StoreReceipt, StoredEntry, WellnessEntry,
};

use crate::{JournalService, WellnessMcpHandler};

pub fn memory_handler() -> WellnessMcpHandler {
    WellnessMcpHandler::new(JournalService::new(
        Arc::new(MemoryEntryStore::new()),
        None,
        30,
    ))
}

/// Store whose every operation fails as unavailable.
pub struct FailingStore;

#[async_trait]
impl EntryStore for FailingStore {
    async fn put(
        &self,
        _entry: &WellnessEntry,
        _access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError> {
        Err(StoreError::StorageUnavailable("disk offline".into()))
    }

    async fn get(
        &self,
        _id: &str,
        _access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError> {
        Err(StoreError::StorageUnavailable("disk offline".into()))
    }

    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError> {
        Err(StoreError::StorageUnavailable("disk offline".into()))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable("disk offline".into()))
    }
}
