//! Wellness journal scoring engine and entry storage.
//!
//! The engine modules (`normalize`, `scoring`, `risk`, `trends`, `insights`,
//! `analysis`) are pure functions over canonical [`WellnessEntry`] values.
//! Persistence lives behind the async [`EntryStore`] trait.

use thiserror::Error;

pub mod analysis;
pub mod config;
pub mod entry;
pub mod insights;
pub mod normalize;
pub mod observability;
pub mod retry;
pub mod risk;
pub mod scoring;
pub mod seal;
pub mod store;
pub mod trends;
pub mod utils;

pub use analysis::{HistorySummary, SleepAssessment, WellnessAnalysis, analyze, summarize_history};
pub use config::{Config, StoreBackend};
pub use entry::{EntryInput, Intensity, WellnessEntry};
pub use insights::{
    Insight, InsightCategory, Priority, Recommendation, RecommendationCategory,
    generate_insights, generate_recommendations,
};
pub use normalize::{normalize, normalize_with_fallback};
pub use risk::{RiskFinding, RiskKind, Severity, detect_pattern_risks, detect_risks};
pub use scoring::{CompositeResult, SubScores, WellnessStatus, compute_composite, compute_sub_scores};
pub use store::{
    BatchItem, BatchResult, EntryStore, FileEntryStore, MemoryEntryStore, RetryingStore,
    StoreReceipt, StoredEntry,
};
pub use trends::{TrendDirection, TrendMetric, TrendReport, TrendResult, analyze_trends};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("integrity mismatch for {id}: expected {expected}, computed {actual}")]
    IntegrityMismatch {
        id: String,
        expected: String,
        actual: String,
    },
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("decryption failed: {0}")]
    DecryptionFailure(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("sealing failed: {0}")]
    Seal(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::StorageUnavailable(_))
    }

    /// Stable snake_case label, used for metrics and HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::IntegrityMismatch { .. } => "integrity_mismatch",
            StoreError::NotFound(_) => "not_found",
            StoreError::DecryptionFailure(_) => "decryption_failure",
            StoreError::StorageUnavailable(_) => "storage_unavailable",
            StoreError::Serialization(_) => "serialization",
            StoreError::Seal(_) => "seal",
            StoreError::Config(_) => "config",
        }
    }
}
