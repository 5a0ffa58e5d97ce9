//! One-call analysis of an entry against its history.

use std::collections::HashMap;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::WellnessEntry;
use crate::insights::{
    Insight, Recommendation, generate_insights_with, generate_recommendations, sort_by_priority,
};
use crate::risk::{RiskFinding, detect_pattern_risks, detect_risks, sort_by_severity};
use crate::scoring::{CompositeResult, compute_composite};
use crate::trends::{TrendReport, analyze_trends};
use crate::utils::{mean, round1};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SleepAssessment {
    Good,
    #[default]
    NeedsImprovement,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct HistorySummary {
    pub entry_count: usize,
    pub average_mood: f64,
    pub average_sleep_hours: f64,
    pub average_stress: f64,
    pub sleep_assessment: SleepAssessment,
    pub exercise_sessions: usize,
    /// Mean minutes per recorded session.
    pub average_exercise_minutes: f64,
    pub most_common_exercise: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct WellnessAnalysis {
    pub date: NaiveDate,
    pub composite: CompositeResult,
    /// Per-entry findings, most severe first.
    pub risks: Vec<RiskFinding>,
    pub pattern_risks: Vec<RiskFinding>,
    pub trends: TrendReport,
    pub insights: Vec<Insight>,
    /// Highest priority first.
    pub recommendations: Vec<Recommendation>,
    pub summary: HistorySummary,
}

impl WellnessAnalysis {
    pub fn all_risks(&self) -> impl Iterator<Item = &RiskFinding> {
        self.risks.iter().chain(self.pattern_risks.iter())
    }
}

/// Run every engine stage for `entry`. `history` may be in any order and may
/// or may not include `entry` itself.
pub fn analyze(entry: &WellnessEntry, history: &[WellnessEntry]) -> WellnessAnalysis {
    let composite = compute_composite(entry);
    let trends = analyze_trends(history);

    let mut risks = detect_risks(entry);
    sort_by_severity(&mut risks);
    let mut pattern_risks = detect_pattern_risks(history);
    sort_by_severity(&mut pattern_risks);

    let insights = generate_insights_with(entry, &composite, history, &trends);
    let mut recommendations = generate_recommendations(entry, history);
    sort_by_priority(&mut recommendations);

    WellnessAnalysis {
        date: entry.date,
        composite,
        risks,
        pattern_risks,
        trends,
        insights,
        recommendations,
        summary: summarize_history(history),
    }
}

pub fn summarize_history(history: &[WellnessEntry]) -> HistorySummary {
    if history.is_empty() {
        return HistorySummary::default();
    }
    let avg = |f: fn(&WellnessEntry) -> f64| {
        let values: Vec<f64> = history.iter().map(f).collect();
        round1(mean(&values).unwrap_or(0.0))
    };
    let average_sleep_hours = avg(|e| e.sleep.hours);
    let sleep_assessment = if (7.0..=9.0).contains(&average_sleep_hours) {
        SleepAssessment::Good
    } else {
        SleepAssessment::NeedsImprovement
    };

    let sessions: Vec<&WellnessEntry> = history.iter().filter(|e| e.exercise.is_recorded()).collect();
    let total_minutes: f64 = sessions
        .iter()
        .map(|e| f64::from(e.exercise.duration_minutes))
        .sum();
    let average_exercise_minutes = if sessions.is_empty() {
        0.0
    } else {
        round1(total_minutes / sessions.len() as f64)
    };

    HistorySummary {
        entry_count: history.len(),
        average_mood: avg(|e| f64::from(e.mood.mood_score)),
        average_sleep_hours,
        average_stress: avg(|e| f64::from(e.mental_health.stress_level)),
        sleep_assessment,
        exercise_sessions: sessions.len(),
        average_exercise_minutes,
        most_common_exercise: most_common_exercise(&sessions),
    }
}

/// Highest count wins; ties go to the alphabetically first type.
fn most_common_exercise(sessions: &[&WellnessEntry]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for kind in sessions.iter().filter_map(|e| e.exercise.kind.as_deref()) {
        *counts.entry(kind).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_kind, a_count), (b_kind, b_count)| {
            a_count.cmp(b_count).then_with(|| b_kind.cmp(a_kind))
        })
        .map(|(kind, _)| kind.to_string())
}
