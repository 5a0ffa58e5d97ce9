//! Entry storage.
//!
//! Every backend persists the same [`StoredRecord`] shape: a receipt plus
//! either the plain canonical entry or a [`SealedPayload`]. Sealing, hashing
//! and integrity checks live here so backends only move records around.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::config::{Config, StoreBackend};
use crate::entry::WellnessEntry;
use crate::retry::RetryPolicy;
use crate::seal::{self, SealedPayload};

mod file;
mod memory;

pub use file::FileEntryStore;
pub use memory::MemoryEntryStore;

pub const RECORD_ID_PREFIX: &str = "WAL";
const ID_SUFFIX_LEN: usize = 8;
const ID_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Metadata kept next to every record.
///
/// The receipt is never sealed: `date`, `timestamp` and `size` stay readable
/// for sealed records so `list()` can order and window the journal without a
/// key. Only the entry body is encrypted.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
pub struct StoreReceipt {
    pub id: String,
    pub content_hash: String,
    pub encrypted: bool,
    pub timestamp: DateTime<Utc>,
    /// Bytes of canonical entry JSON.
    pub size: usize,
    /// Journal date of the stored entry.
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct StoredEntry {
    pub entry: WellnessEntry,
    pub receipt: StoreReceipt,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RecordBody {
    Plain { entry: WellnessEntry },
    Sealed(SealedPayload),
}

/// On-disk / in-memory record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StoredRecord {
    pub receipt: StoreReceipt,
    pub body: RecordBody,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct BatchItem {
    /// Position in the submitted batch.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<StoreReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct BatchResult {
    pub stored: usize,
    pub failed: usize,
    pub items: Vec<BatchItem>,
}

impl BatchResult {
    pub fn push(&mut self, index: usize, result: Result<StoreReceipt, StoreError>) {
        match result {
            Ok(receipt) => {
                self.stored += 1;
                self.items.push(BatchItem {
                    index,
                    receipt: Some(receipt),
                    error: None,
                });
            }
            Err(e) => {
                self.failed += 1;
                self.items.push(BatchItem {
                    index,
                    receipt: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }
}

#[async_trait]
pub trait EntryStore: Send + Sync + 'static {
    /// Persist a canonical entry, sealing it when `access_key` is given.
    async fn put(
        &self,
        entry: &WellnessEntry,
        access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError>;

    /// Fetch an entry and verify its content hash.
    async fn get(
        &self,
        id: &str,
        access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError>;

    /// Receipts of every stored record, newest first.
    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Store several entries; one failure does not abort the rest.
    async fn put_batch(
        &self,
        entries: &[WellnessEntry],
        access_key: Option<&SecretString>,
    ) -> BatchResult {
        let mut result = BatchResult::default();
        for (index, entry) in entries.iter().enumerate() {
            result.push(index, self.put(entry, access_key).await);
        }
        result
    }
}

/// `WAL-<unix millis>-<8 uppercase alphanumerics>`.
pub fn new_record_id(now: DateTime<Utc>) -> Result<String, StoreError> {
    let bytes = seal::random_bytes::<ID_SUFFIX_LEN>()?;
    let suffix: String = bytes
        .iter()
        .map(|b| ID_ALPHABET[usize::from(*b) % ID_ALPHABET.len()] as char)
        .collect();
    Ok(format!(
        "{RECORD_ID_PREFIX}-{}-{suffix}",
        now.timestamp_millis()
    ))
}

/// Whether `id` has the shape of a record id. Backends use this to reject
/// ids that could escape their namespace.
pub fn is_valid_record_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == RECORD_ID_PREFIX
        && !millis.is_empty()
        && millis.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == ID_SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Build the record for a new entry.
pub fn seal_record(
    entry: &WellnessEntry,
    access_key: Option<&SecretString>,
) -> Result<StoredRecord, StoreError> {
    let now = Utc::now();
    let json = seal::canonical_json(entry)?;
    let receipt = StoreReceipt {
        id: new_record_id(now)?,
        content_hash: seal::hash_bytes(&json),
        encrypted: access_key.is_some(),
        timestamp: now,
        size: json.len(),
        date: entry.date,
    };
    let body = match access_key {
        Some(key) => RecordBody::Sealed(seal::seal(&json, key)?),
        None => RecordBody::Plain {
            entry: entry.clone(),
        },
    };
    Ok(StoredRecord { receipt, body })
}

/// Recover and verify the entry held by `record`.
pub fn open_record(
    record: StoredRecord,
    access_key: Option<&SecretString>,
) -> Result<StoredEntry, StoreError> {
    let StoredRecord { receipt, body } = record;
    let entry = match body {
        RecordBody::Plain { entry } => entry,
        RecordBody::Sealed(payload) => {
            let key = access_key.ok_or_else(|| {
                StoreError::DecryptionFailure(format!("record {} is sealed; access key required", receipt.id))
            })?;
            let plaintext = seal::unseal(&payload, key)?;
            serde_json::from_slice(&plaintext)?
        }
    };
    let actual = seal::content_hash(&entry)?;
    if actual != receipt.content_hash {
        return Err(StoreError::IntegrityMismatch {
            id: receipt.id,
            expected: receipt.content_hash,
            actual,
        });
    }
    Ok(StoredEntry { entry, receipt })
}

/// Newest journal date first. Entries for the same day order by store time,
/// then id, so the order is total and backfilled days land where they belong.
pub fn sort_newest_first(receipts: &mut [StoreReceipt]) {
    receipts.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Load up to `limit` most recent entries as analysis history.
///
/// Sealed records that `access_key` cannot open are skipped with a warning;
/// every other failure is returned.
pub async fn load_history(
    store: &dyn EntryStore,
    access_key: Option<&SecretString>,
    limit: usize,
) -> Result<Vec<WellnessEntry>, StoreError> {
    let receipts = store.list().await?;
    let mut history = Vec::with_capacity(receipts.len().min(limit));
    for receipt in receipts.into_iter().take(limit) {
        match store.get(&receipt.id, access_key).await {
            Ok(stored) => history.push(stored.entry),
            Err(StoreError::DecryptionFailure(reason)) => {
                tracing::warn!(id = %receipt.id, %reason, "skipping unreadable record in history");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(history)
}

/// Wraps a store and retries operations that fail with a transient error.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: EntryStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: EntryStore> EntryStore for RetryingStore<S> {
    async fn put(
        &self,
        entry: &WellnessEntry,
        access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError> {
        self.policy
            .retry_async(|| self.inner.put(entry, access_key))
            .await
    }

    async fn get(
        &self,
        id: &str,
        access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError> {
        self.policy
            .retry_async(|| self.inner.get(id, access_key))
            .await
    }

    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError> {
        self.policy.retry_async(|| self.inner.list()).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.policy.retry_async(|| self.inner.delete(id)).await
    }
}

/// Build the store selected by `config`, wrapped with the default retry policy.
pub fn from_config(config: &Config) -> Arc<dyn EntryStore> {
    match config.backend {
        StoreBackend::File => Arc::new(RetryingStore::new(
            FileEntryStore::new(config.store_dir.clone()),
            RetryPolicy::default(),
        )),
        StoreBackend::Memory => Arc::new(MemoryEntryStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryInput;
    use crate::normalize::normalize_with_fallback;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry() -> WellnessEntry {
        let input: EntryInput =
            serde_json::from_value(json!({"date": "2025-08-01", "mood": {"mood_score": 6}})).unwrap();
        normalize_with_fallback(&input, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
    }

    #[test]
    fn record_id_shape() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let id = new_record_id(now).unwrap();
        assert!(id.starts_with(&format!("WAL-{}-", now.timestamp_millis())));
        assert!(is_valid_record_id(&id), "{id}");
    }

    #[test]
    fn rejects_malformed_ids() {
        for id in [
            "",
            "WAL-123-abcdefgh",
            "WAL-123-ABC",
            "WAL--ABCDEFGH",
            "WAL-12x-ABCDEFGH",
            "../etc/passwd",
            "WAL-1-ABCDEFGH/../x",
        ] {
            assert!(!is_valid_record_id(id), "{id}");
        }
        assert!(is_valid_record_id("WAL-1700000000000-AB12CD34"));
    }

    #[test]
    fn plain_record_roundtrip() {
        let e = entry();
        let record = seal_record(&e, None).unwrap();
        assert!(!record.receipt.encrypted);
        let opened = open_record(record, None).unwrap();
        assert_eq!(opened.entry, e);
    }

    #[test]
    fn sealed_record_requires_key() {
        let key = SecretString::new("pw".into());
        let record = seal_record(&entry(), Some(&key)).unwrap();
        assert!(record.receipt.encrypted);
        assert!(matches!(
            open_record(record.clone(), None),
            Err(StoreError::DecryptionFailure(_))
        ));
        assert_eq!(open_record(record, Some(&key)).unwrap().entry, entry());
    }

    #[test]
    fn tampered_plain_record_is_integrity_mismatch() {
        let mut record = seal_record(&entry(), None).unwrap();
        if let RecordBody::Plain { entry } = &mut record.body {
            entry.mood.mood_score = 10;
        }
        assert!(matches!(
            open_record(record, None),
            Err(StoreError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn sort_newest_first_orders_by_date_then_timestamp() {
        let mk = |id: &str, day: u32, secs: i64| StoreReceipt {
            id: id.into(),
            content_hash: String::new(),
            encrypted: false,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
            size: 0,
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        };
        // "old" was saved last but describes the earliest day
        let mut receipts = vec![
            mk("a", 2, 1),
            mk("old", 1, 9),
            mk("c", 3, 3),
            mk("b", 2, 2),
            mk("d", 2, 2),
        ];
        sort_newest_first(&mut receipts);
        let ids: Vec<_> = receipts.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "b", "a", "old"]);
    }
}
