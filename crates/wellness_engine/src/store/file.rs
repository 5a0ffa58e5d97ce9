use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use super::{
    EntryStore, StoreReceipt, StoredEntry, StoredRecord, is_valid_record_id, open_record,
    seal_record, sort_newest_first,
};
use crate::StoreError;
use crate::entry::WellnessEntry;

/// One `<id>.json` file per record under a directory.
///
/// Writes go to a temporary file first and are renamed into place. The lock
/// serializes writers within this process; readers share it.
pub struct FileEntryStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl FileEntryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_record_id(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    async fn read_record(&self, path: &Path, id: &str) -> Result<StoredRecord, StoreError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(id.to_string()),
            _ => unavailable("read", path, e),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn unavailable(op: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::StorageUnavailable(format!("{op} {}: {e}", path.display()))
}

/// Write `bytes` to `tmp`, then rename it over `path`. A failed rename
/// removes `tmp` so no partial record is left behind.
async fn write_atomically(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    tokio::fs::write(tmp, bytes)
        .await
        .map_err(|e| unavailable("write", tmp, e))?;
    if let Err(e) = tokio::fs::rename(tmp, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(tmp).await {
            tracing::warn!(path = %tmp.display(), error = %cleanup, "failed to remove temporary record");
        }
        return Err(unavailable("rename", path, e));
    }
    Ok(())
}

#[async_trait]
impl EntryStore for FileEntryStore {
    async fn put(
        &self,
        entry: &WellnessEntry,
        access_key: Option<&SecretString>,
    ) -> Result<StoreReceipt, StoreError> {
        let record = seal_record(entry, access_key)?;
        let path = self.record_path(&record.receipt.id)?;
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&record)?;

        let _guard = self.lock.write().await;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| unavailable("create", &self.dir, e))?;
        write_atomically(&tmp, &path, &bytes).await?;
        tracing::debug!(id = %record.receipt.id, path = %path.display(), "record written");
        Ok(record.receipt)
    }

    async fn get(
        &self,
        id: &str,
        access_key: Option<&SecretString>,
    ) -> Result<StoredEntry, StoreError> {
        let path = self.record_path(id)?;
        let record = {
            let _guard = self.lock.read().await;
            self.read_record(&path, id).await?
        };
        open_record(record, access_key)
    }

    async fn list(&self) -> Result<Vec<StoreReceipt>, StoreError> {
        let _guard = self.lock.read().await;
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable("list", &self.dir, e)),
        };
        let mut receipts = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| unavailable("list", &self.dir, e))?
        {
            let path = item.path();
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".json"))
            else {
                continue;
            };
            if !is_valid_record_id(id) {
                continue;
            }
            match self.read_record(&path, id).await {
                Ok(record) => receipts.push(record.receipt),
                // deleted between read_dir and read
                Err(StoreError::NotFound(_)) => {}
                Err(StoreError::Serialization(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unparseable record");
                }
                Err(e) => return Err(e),
            }
        }
        sort_newest_first(&mut receipts);
        Ok(receipts)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.record_path(id)?;
        let _guard = self.lock.write().await;
        tokio::fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(id.to_string()),
            _ => unavailable("delete", &path, e),
        })
    }
}
