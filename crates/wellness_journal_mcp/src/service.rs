//! Journal operations shared by the MCP tools and the HTTP routes.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use secrecy::SecretString;
use tracing::info;

use wellness_engine::observability::record_analysis;
use wellness_engine::store::load_history;
use wellness_engine::{
    BatchResult, EntryInput, EntryStore, HistorySummary, RiskFinding, StoreError, StoredEntry,
    TrendReport, WellnessAnalysis, WellnessEntry, analyze, analyze_trends, detect_pattern_risks,
    detect_risks, normalize, summarize_history,
};

use crate::error::{McpError, McpResult};
use crate::types::{
    DeleteEntryResult, ListEntriesResult, StoreEntryResult, VerifyEntryResult,
};

pub const SERVICE_CALLS_TOTAL: &str = "wellness_service_calls_total";
pub const SERVICE_CALL_SECONDS: &str = "wellness_service_call_seconds";

fn record_call<T>(op: &'static str, result: &McpResult<T>, elapsed: Duration) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::counter!(SERVICE_CALLS_TOTAL, "op" => op, "outcome" => outcome).increment(1);
    metrics::histogram!(SERVICE_CALL_SECONDS, "op" => op).record(elapsed.as_secs_f64());
}

async fn instrumented<T, F>(op: &'static str, call: F) -> McpResult<T>
where
    F: Future<Output = McpResult<T>>,
{
    let start = Instant::now();
    let result = call.await;
    record_call(op, &result, start.elapsed());
    result
}

#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn EntryStore>,
    default_key: Option<SecretString>,
    history_limit: usize,
}

impl JournalService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        default_key: Option<SecretString>,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            default_key,
            history_limit,
        }
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// A per-call key wins over the configured default.
    fn resolve_key(&self, key: Option<String>) -> Option<SecretString> {
        key.filter(|k| !k.is_empty())
            .map(|k| SecretString::new(k.into()))
            .or_else(|| self.default_key.clone())
    }

    pub async fn store_entry(
        &self,
        input: &EntryInput,
        access_key: Option<String>,
    ) -> McpResult<StoreEntryResult> {
        instrumented("store_entry", async move {
            let entry = normalize(input);
            let key = self.resolve_key(access_key);
            let receipt = self.store.put(&entry, key.as_ref()).await?;
            info!(id = %receipt.id, date = %entry.date, encrypted = receipt.encrypted, "entry stored");
            Ok(StoreEntryResult { receipt, entry })
        })
        .await
    }

    pub async fn store_entries(
        &self,
        inputs: &[EntryInput],
        access_key: Option<String>,
    ) -> McpResult<BatchResult> {
        instrumented("store_entries", async move {
            if inputs.is_empty() {
                return Err(McpError::Validation("entries must not be empty".into()));
            }
            let entries: Vec<WellnessEntry> = inputs.iter().map(normalize).collect();
            let key = self.resolve_key(access_key);
            let result = self.store.put_batch(&entries, key.as_ref()).await;
            info!(stored = result.stored, failed = result.failed, "batch stored");
            Ok(result)
        })
        .await
    }

    pub async fn get_entry(&self, id: &str, access_key: Option<String>) -> McpResult<StoredEntry> {
        instrumented("get_entry", async move {
            let key = self.resolve_key(access_key);
            Ok(self.store.get(id, key.as_ref()).await?)
        })
        .await
    }

    /// Integrity failures are reported as `valid: false`; every other store
    /// error is returned.
    pub async fn verify_entry(
        &self,
        id: &str,
        access_key: Option<String>,
        expected_hash: Option<String>,
    ) -> McpResult<VerifyEntryResult> {
        instrumented("verify_entry", async move {
            let key = self.resolve_key(access_key);
            match self.store.get(id, key.as_ref()).await {
                Ok(stored) => {
                    let expected =
                        expected_hash.unwrap_or_else(|| stored.receipt.content_hash.clone());
                    let actual = wellness_engine::seal::content_hash(&stored.entry)?;
                    let valid = wellness_engine::seal::verify_integrity(&stored.entry, &expected);
                    Ok(VerifyEntryResult {
                        id: id.to_string(),
                        valid,
                        expected_hash: expected,
                        actual_hash: Some(actual),
                        reason: (!valid).then(|| "content hash does not match".to_string()),
                    })
                }
                Err(StoreError::IntegrityMismatch {
                    expected, actual, ..
                }) => Ok(VerifyEntryResult {
                    id: id.to_string(),
                    valid: false,
                    expected_hash: expected,
                    actual_hash: Some(actual),
                    reason: Some("stored record was modified".into()),
                }),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    pub async fn list_entries(&self, limit: Option<usize>) -> McpResult<ListEntriesResult> {
        instrumented("list_entries", async move {
            let all = self.store.list().await?;
            let total = all.len();
            let entries = match limit {
                Some(n) => all.into_iter().take(n).collect(),
                None => all,
            };
            Ok(ListEntriesResult { total, entries })
        })
        .await
    }

    pub async fn delete_entry(&self, id: &str) -> McpResult<DeleteEntryResult> {
        instrumented("delete_entry", async move {
            self.store.delete(id).await?;
            info!(%id, "entry deleted");
            Ok(DeleteEntryResult {
                id: id.to_string(),
                deleted: true,
            })
        })
        .await
    }

    /// Explicit history when given, else the entries for the most recent
    /// journal days in the store.
    pub async fn resolve_history(
        &self,
        history: Option<&[EntryInput]>,
        limit: Option<usize>,
        access_key: Option<String>,
    ) -> McpResult<Vec<WellnessEntry>> {
        if let Some(inputs) = history {
            return Ok(inputs.iter().map(normalize).collect());
        }
        let key = self.resolve_key(access_key);
        let limit = limit.unwrap_or(self.history_limit).max(1);
        Ok(load_history(self.store.as_ref(), key.as_ref(), limit).await?)
    }

    pub async fn risks(
        &self,
        input: &EntryInput,
        include_patterns: bool,
        access_key: Option<String>,
    ) -> McpResult<(Vec<RiskFinding>, Vec<RiskFinding>)> {
        instrumented("detect_risks", async move {
            let entry = normalize(input);
            let risks = detect_risks(&entry);
            let pattern_risks = if include_patterns {
                let history = self.resolve_history(None, None, access_key).await?;
                detect_pattern_risks(&history)
            } else {
                Vec::new()
            };
            Ok((risks, pattern_risks))
        })
        .await
    }

    pub async fn analyze_entry(
        &self,
        input: &EntryInput,
        history: Option<&[EntryInput]>,
        access_key: Option<String>,
    ) -> McpResult<WellnessAnalysis> {
        instrumented("analyze_entry", async move {
            let entry = normalize(input);
            let history = self.resolve_history(history, None, access_key).await?;
            Ok(self.run_analysis(&entry, &history))
        })
        .await
    }

    pub async fn analyze_stored_entry(
        &self,
        id: &str,
        access_key: Option<String>,
    ) -> McpResult<WellnessAnalysis> {
        instrumented("analyze_stored_entry", async move {
            let key = self.resolve_key(access_key.clone());
            let stored = self.store.get(id, key.as_ref()).await?;
            let history = self.resolve_history(None, None, access_key).await?;
            Ok(self.run_analysis(&stored.entry, &history))
        })
        .await
    }

    fn run_analysis(&self, entry: &WellnessEntry, history: &[WellnessEntry]) -> WellnessAnalysis {
        let analysis = analyze(entry, history);
        record_analysis(&analysis);
        info!(
            date = %analysis.date,
            score = analysis.composite.overall_score,
            status = analysis.composite.status.label(),
            risks = analysis.risks.len(),
            pattern_risks = analysis.pattern_risks.len(),
            history = history.len(),
            "entry analyzed"
        );
        analysis
    }

    pub async fn trends(
        &self,
        history: Option<&[EntryInput]>,
        limit: Option<usize>,
        access_key: Option<String>,
    ) -> McpResult<TrendReport> {
        instrumented("get_trends", async move {
            let history = self.resolve_history(history, limit, access_key).await?;
            Ok(analyze_trends(&history))
        })
        .await
    }

    pub async fn history_summary(
        &self,
        history: Option<&[EntryInput]>,
        limit: Option<usize>,
        access_key: Option<String>,
    ) -> McpResult<HistorySummary> {
        instrumented("get_history_summary", async move {
            let history = self.resolve_history(history, limit, access_key).await?;
            Ok(summarize_history(&history))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wellness_engine::MemoryEntryStore;

    fn input(v: serde_json::Value) -> EntryInput {
        serde_json::from_value(v).expect("input")
    }

    fn service() -> JournalService {
        JournalService::new(Arc::new(MemoryEntryStore::new()), None, 30)
    }

    #[tokio::test]
    async fn stored_entry_is_normalized() {
        let svc = service();
        let res = svc
            .store_entry(&input(json!({"mood": {"mood_score": 42}})), None)
            .await
            .expect("store");
        assert_eq!(res.entry.mood.mood_score, 10);
        let got = svc.get_entry(&res.receipt.id, None).await.expect("get");
        assert_eq!(got.entry, res.entry);
    }

    #[tokio::test]
    async fn default_key_seals_entries() {
        let svc = JournalService::new(
            Arc::new(MemoryEntryStore::new()),
            Some(SecretString::new("default".into())),
            30,
        );
        let res = svc.store_entry(&input(json!({})), None).await.expect("store");
        assert!(res.receipt.encrypted);
        assert!(svc.get_entry(&res.receipt.id, None).await.is_ok());
        let wrong = svc.get_entry(&res.receipt.id, Some("other".into())).await;
        assert!(matches!(
            wrong,
            Err(McpError::Store(StoreError::DecryptionFailure(_)))
        ));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let svc = service();
        assert!(matches!(
            svc.store_entries(&[], None).await,
            Err(McpError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn verify_reports_hash_mismatch() {
        let svc = service();
        let res = svc.store_entry(&input(json!({})), None).await.expect("store");
        let ok = svc
            .verify_entry(&res.receipt.id, None, None)
            .await
            .expect("verify");
        assert!(ok.valid);
        let bad = svc
            .verify_entry(&res.receipt.id, None, Some("00".repeat(32)))
            .await
            .expect("verify");
        assert!(!bad.valid);
        assert!(bad.reason.is_some());
    }

    #[tokio::test]
    async fn analysis_uses_stored_history() {
        let svc = service();
        for day in 1..=3 {
            svc.store_entry(
                &input(json!({
                    "date": format!("2025-04-0{day}"),
                    "sleep": {"hours": 4},
                    "exercise": {"type": "walk", "duration_minutes": 20}
                })),
                None,
            )
            .await
            .expect("store");
        }
        let analysis = svc
            .analyze_entry(&input(json!({"date": "2025-04-04", "sleep": {"hours": 4}})), None, None)
            .await
            .expect("analyze");
        assert_eq!(analysis.summary.entry_count, 3);
        assert!(!analysis.pattern_risks.is_empty());
    }

    #[tokio::test]
    async fn explicit_history_bypasses_store() {
        let svc = service();
        let history = vec![input(json!({"date": "2025-01-01"})), input(json!({"date": "2025-01-02"}))];
        let summary = svc
            .history_summary(Some(&history), None, None)
            .await
            .expect("summary");
        assert_eq!(summary.entry_count, 2);
    }

    #[test]
    fn calls_are_counted_per_op_and_outcome() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            let ok: McpResult<()> = Ok(());
            let missing: McpResult<()> = Err(StoreError::NotFound("WAL-1-ABCDEFGH".into()).into());
            record_call("get_entry", &ok, Duration::from_millis(3));
            record_call("get_entry", &missing, Duration::from_millis(1));
        });
        let rendered = handle.render();
        assert!(rendered.contains(SERVICE_CALLS_TOTAL), "{rendered}");
        assert!(rendered.contains(r#"outcome="not_found""#), "{rendered}");
        assert!(rendered.contains(r#"op="get_entry""#), "{rendered}");
        assert!(rendered.contains(SERVICE_CALL_SECONDS), "{rendered}");
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let svc = service();
        for _ in 0..3 {
            svc.store_entry(&input(json!({})), None).await.expect("store");
        }
        let listed = svc.list_entries(Some(2)).await.expect("list");
        assert_eq!(listed.total, 3);
        assert_eq!(listed.entries.len(), 2);
    }
}
