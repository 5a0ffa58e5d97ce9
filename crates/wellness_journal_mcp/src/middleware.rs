//! Store wrapper that adds timing logs and metrics to every operation.

use std::sync::Arc;
use std::time::Instant;

use secrecy::SecretString;
use tracing::debug;
use wellness_engine::observability::{outcome_label, record_store_operation};
use wellness_engine::{EntryStore, StoreError, StoreReceipt, StoredEntry, WellnessEntry};

#[derive(Clone)]
pub struct LoggingStore {
    inner: Arc<dyn EntryStore>,
}

impl LoggingStore {
    pub fn new(inner: Arc<dyn EntryStore>) -> Self {
        Self { inner }
    }

    async fn with_logging<F, Fut, T>(&self, op: &'static str, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(Arc<dyn EntryStore>) -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        let start = Instant::now();
        debug!(op, "store operation started");

        let result = operation(self.inner.clone()).await;

        let elapsed = start.elapsed();
        let outcome = outcome_label(&result);
        record_store_operation(op, outcome, elapsed);
        match &result {
            Ok(_) => debug!(op, ?elapsed, "store operation completed"),
            Err(e) => debug!(op, ?elapsed, error = %e, "store operation failed"),
        }
        result
    }
}

#[async_trait::async_trait]
impl EntryStore for LoggingStore {
    async fn put(
        &self,
        entry: &WellnessEntry,
        access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError> {
        self.with_logging("put", |s| async move { s.put(entry, access_key).await })
            .await
    }

    async fn get(
        &self,
        id: &str,
        access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError> {
        self.with_logging("get", |s| async move { s.get(id, access_key).await })
            .await
    }

    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError> {
        self.with_logging("list", |s| async move { s.list().await })
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.with_logging("delete", |s| async move { s.delete(id).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wellness_engine::{EntryInput, MemoryEntryStore, normalize};

    fn entry() -> WellnessEntry {
        normalize(&EntryInput::default())
    }

    #[tokio::test]
    async fn passes_operations_through() {
        let store = LoggingStore::new(Arc::new(MemoryEntryStore::new()));
        let receipt = store.put(&entry(), None).await.expect("put");
        assert_eq!(store.list().await.expect("list").len(), 1);
        assert_eq!(store.get(&receipt.id, None).await.expect("get").entry, entry());
        store.delete(&receipt.id).await.expect("delete");
        assert!(matches!(
            store.get(&receipt.id, None).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn batch_counts_results() {
        let store = LoggingStore::new(Arc::new(MemoryEntryStore::new()));
        let batch = store.put_batch(&[entry(), entry(), entry()], None).await;
        assert_eq!(batch.stored, 3);
        assert_eq!(batch.failed, 0);
        let indices: Vec<_> = batch.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
