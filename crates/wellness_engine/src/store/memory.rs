use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use super::{
    EntryStore, StoreReceipt, StoredEntry, StoredRecord, open_record, seal_record,
    sort_newest_first,
};
use crate::StoreError;
use crate::entry::WellnessEntry;

/// Process-local store. Records are kept in their stored form, sealed or not.
#[derive(Default)]
pub struct MemoryEntryStore {
    records: RwLock<HashMap<String, StoredRecord>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    #[cfg(test)]
    pub(crate) async fn tamper<F: FnOnce(&mut StoredRecord)>(&self, id: &str, f: F) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            f(record);
        }
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn put(
        &self,
        entry: &WellnessEntry,
        access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError> {
        let record = seal_record(entry, access_key)?;
        let receipt = record.receipt.clone();
        self.records.write().await.insert(receipt.id.clone(), record);
        Ok(receipt)
    }

    async fn get(
        &self,
        id: &str,
        access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError> {
        let record = self
            .records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        open_record(record, access_key)
    }

    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError> {
        let mut receipts: Vec<StoreReceipt> = self
            .records
            .read()
            .await
            .values()
            .map(|r| r.receipt.clone())
            .collect();
        sort_newest_first(&mut receipts);
        Ok(receipts)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
