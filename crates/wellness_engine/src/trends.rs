//! Windowed trend classification.
//!
//! History is sorted newest first. The mean of the 3 most recent values is
//! compared with the mean of the 3 values before them; a difference above
//! [`TREND_THRESHOLD`] is a direction, anything smaller is stable.
//!
//! Directions are raw numeric movement. For stress a falling value is good
//! news; callers that present directions to users must consult
//! [`TrendMetric::higher_is_better`].

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::WellnessEntry;
use crate::utils::mean;

pub const TREND_WINDOW: usize = 3;
pub const TREND_THRESHOLD: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    #[default]
    Stable,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    Mood,
    Sleep,
    Stress,
    Exercise,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 4] = [
        TrendMetric::Mood,
        TrendMetric::Sleep,
        TrendMetric::Stress,
        TrendMetric::Exercise,
    ];

    pub fn value(&self, entry: &WellnessEntry) -> f64 {
        match self {
            TrendMetric::Mood => f64::from(entry.mood.mood_score),
            TrendMetric::Sleep => entry.sleep.hours,
            TrendMetric::Stress => f64::from(entry.mental_health.stress_level),
            TrendMetric::Exercise => f64::from(entry.exercise.duration_minutes),
        }
    }

    /// `false` for stress: an "improving" (rising) stress series is bad news.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, TrendMetric::Stress)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendMetric::Mood => "mood",
            TrendMetric::Sleep => "sleep",
            TrendMetric::Stress => "stress",
            TrendMetric::Exercise => "exercise",
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Oldest first.
    pub series: Vec<TrendPoint>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct TrendReport {
    pub mood: TrendResult,
    pub sleep: TrendResult,
    pub stress: TrendResult,
    pub exercise: TrendResult,
}

impl TrendReport {
    pub fn get(&self, metric: TrendMetric) -> &TrendResult {
        match metric {
            TrendMetric::Mood => &self.mood,
            TrendMetric::Sleep => &self.sleep,
            TrendMetric::Stress => &self.stress,
            TrendMetric::Exercise => &self.exercise,
        }
    }

    fn get_mut(&mut self, metric: TrendMetric) -> &mut TrendResult {
        match metric {
            TrendMetric::Mood => &mut self.mood,
            TrendMetric::Sleep => &mut self.sleep,
            TrendMetric::Stress => &mut self.stress,
            TrendMetric::Exercise => &mut self.exercise,
        }
    }
}

/// Sort a copy of `history` newest first. Entries sharing a date keep their
/// relative input order.
pub fn newest_first(history: &[WellnessEntry]) -> Vec<&WellnessEntry> {
    let mut sorted: Vec<&WellnessEntry> = history.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Classify a newest-first value series.
pub fn classify(values_newest_first: &[f64]) -> TrendDirection {
    if values_newest_first.len() < 2 {
        return TrendDirection::Stable;
    }
    let split = TREND_WINDOW.min(values_newest_first.len());
    let recent = &values_newest_first[..split];
    let older_end = (split + TREND_WINDOW).min(values_newest_first.len());
    let older = &values_newest_first[split..older_end];
    let (Some(recent_avg), Some(older_avg)) = (mean(recent), mean(older)) else {
        return TrendDirection::Stable;
    };
    let diff = recent_avg - older_avg;
    if diff > TREND_THRESHOLD {
        TrendDirection::Improving
    } else if diff < -TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

/// Trend per metric over a history supplied in any order.
pub fn analyze_trends(history: &[WellnessEntry]) -> TrendReport {
    let mut report = TrendReport::default();
    if history.len() < 2 {
        return report;
    }
    let sorted = newest_first(history);
    for metric in TrendMetric::ALL {
        let values: Vec<f64> = sorted.iter().map(|e| metric.value(e)).collect();
        let series = sorted
            .iter()
            .rev()
            .map(|e| TrendPoint {
                date: e.date,
                value: metric.value(e),
            })
            .collect();
        let result = report.get_mut(metric);
        result.direction = classify(&values);
        result.series = series;
    }
    report
}
