//! Tool parameter and result types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use wellness_engine::{
    CompositeResult, EntryInput, Recommendation, RiskFinding, StoreReceipt, WellnessEntry,
};

// === Storage ===

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct StoreEntryParams {
    pub entry: EntryInput,
    /// Seals the stored record. Overrides the server's default key.
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct StoreEntriesParams {
    pub entries: Vec<EntryInput>,
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct EntryIdParams {
    /// Record id, e.g. `WAL-1718000000000-AB12CD34`.
    pub id: String,
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DeleteEntryParams {
    pub id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct VerifyEntryParams {
    pub id: String,
    pub access_key: Option<String>,
    /// Hash to compare against; defaults to the hash recorded at store time.
    pub expected_hash: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ListEntriesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct StoreEntryResult {
    pub receipt: StoreReceipt,
    /// Canonical form that was stored.
    pub entry: WellnessEntry,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ListEntriesResult {
    pub total: usize,
    pub entries: Vec<StoreReceipt>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DeleteEntryResult {
    pub id: String,
    pub deleted: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct VerifyEntryResult {
    pub id: String,
    pub valid: bool,
    pub expected_hash: String,
    pub actual_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// === Engine ===

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct EntryParams {
    pub entry: EntryInput,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DetectRisksParams {
    pub entry: EntryInput,
    /// Also evaluate history-wide patterns over stored entries.
    pub include_patterns: Option<bool>,
    pub access_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AnalyzeEntryParams {
    pub entry: EntryInput,
    /// Explicit history. When omitted the most recent stored entries are used.
    pub history: Option<Vec<EntryInput>>,
    pub access_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct HistoryParams {
    pub history: Option<Vec<EntryInput>>,
    /// Number of stored entries to load when no history is given.
    pub limit: Option<usize>,
    pub access_key: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ScoreResult {
    pub entry: WellnessEntry,
    pub composite: CompositeResult,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RisksResult {
    pub risks: Vec<RiskFinding>,
    pub pattern_risks: Vec<RiskFinding>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RecommendationsResult {
    pub recommendations: Vec<Recommendation>,
}

// === Prompts ===

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DailyCheckInParams {
    /// YYYY-MM-DD; defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct WeeklyReviewParams {
    pub days_back: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RiskFollowUpParams {
    /// Risk kind to focus on, e.g. `high_stress`.
    pub risk: Option<String>,
}
