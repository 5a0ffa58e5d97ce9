//! Metric names and recording helpers.

use std::time::Duration;

use serde::Serialize;

use crate::StoreError;
use crate::analysis::WellnessAnalysis;

pub const STORE_OPERATIONS_TOTAL: &str = "wellness_store_operations_total";
pub const STORE_OPERATION_SECONDS: &str = "wellness_store_operation_seconds";
pub const ANALYSES_TOTAL: &str = "wellness_analyses_total";
pub const RISK_FINDINGS_TOTAL: &str = "wellness_risk_findings_total";

#[derive(Clone, Debug, Serialize)]
pub struct Health {
    pub ready: bool,
    pub store: &'static str,
}

impl Health {
    pub fn readiness(store: &'static str) -> Self {
        Self { ready: true, store }
    }
}

/// Outcome label for a store operation result.
pub fn outcome_label<T>(result: &Result<T, StoreError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

pub fn record_store_operation(op: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(STORE_OPERATIONS_TOTAL, "op" => op, "outcome" => outcome).increment(1);
    metrics::histogram!(STORE_OPERATION_SECONDS, "op" => op).record(elapsed.as_secs_f64());
}

pub fn record_analysis(analysis: &WellnessAnalysis) {
    metrics::counter!(ANALYSES_TOTAL).increment(1);
    for finding in analysis.all_risks() {
        metrics::counter!(RISK_FINDINGS_TOTAL, "kind" => finding.kind.as_str()).increment(1);
    }
}
