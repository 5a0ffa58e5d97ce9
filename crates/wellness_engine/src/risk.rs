//! Rule-based risk detection.
//!
//! [`detect_risks`] evaluates the per-entry rule table against one entry.
//! [`detect_pattern_risks`] evaluates history-wide rules; it is a separate
//! operation and its findings are never mixed into the per-entry list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::WellnessEntry;
use crate::utils::mean;

pub const SLEEP_DEPRIVATION_HOURS: f64 = 6.0;
pub const SEVERE_SLEEP_DEPRIVATION_HOURS: f64 = 4.0;
pub const HIGH_STRESS_LEVEL: u8 = 8;
pub const HIGH_ANXIETY_LEVEL: u8 = 8;
pub const LOW_ACTIVITY_MINUTES: u32 = 15;
pub const LOW_MOOD_SCORE: u8 = 3;
pub const SEVERE_SYMPTOM_LEVEL: u8 = 7;

/// Pattern rules need at least this many entries.
pub const PATTERN_MIN_ENTRIES: usize = 3;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    SleepDeprivation,
    HighStress,
    HighAnxiety,
    Sedentary,
    LowActivity,
    LowMood,
    SevereSymptoms,
    ChronicStressPattern,
    SedentaryPattern,
    LowResiliencePattern,
    SleepDeficitPattern,
    PersistentSymptomsPattern,
}

impl RiskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskKind::SleepDeprivation => "sleep_deprivation",
            RiskKind::HighStress => "high_stress",
            RiskKind::HighAnxiety => "high_anxiety",
            RiskKind::Sedentary => "sedentary",
            RiskKind::LowActivity => "low_activity",
            RiskKind::LowMood => "low_mood",
            RiskKind::SevereSymptoms => "severe_symptoms",
            RiskKind::ChronicStressPattern => "chronic_stress_pattern",
            RiskKind::SedentaryPattern => "sedentary_pattern",
            RiskKind::LowResiliencePattern => "low_resilience_pattern",
            RiskKind::SleepDeficitPattern => "sleep_deficit_pattern",
            RiskKind::PersistentSymptomsPattern => "persistent_symptoms_pattern",
        }
    }
}

/// Ordered from least to most severe.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct RiskFinding {
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

impl RiskFinding {
    fn new(
        kind: RiskKind,
        severity: Severity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// Evaluate every per-entry rule; findings come back in detection order.
pub fn detect_risks(entry: &WellnessEntry) -> Vec<RiskFinding> {
    let mut risks = Vec::new();

    let hours = entry.sleep.hours;
    if hours < SLEEP_DEPRIVATION_HOURS {
        let severity = if hours < SEVERE_SLEEP_DEPRIVATION_HOURS {
            Severity::High
        } else {
            Severity::Medium
        };
        risks.push(RiskFinding::new(
            RiskKind::SleepDeprivation,
            severity,
            format!("Sleep deprivation: only {hours} hours of sleep recorded. Recommended: 7-9 hours."),
            "Try to establish a consistent sleep schedule and create a relaxing bedtime routine.",
        ));
    }

    let stress = entry.mental_health.stress_level;
    if stress >= HIGH_STRESS_LEVEL {
        risks.push(RiskFinding::new(
            RiskKind::HighStress,
            Severity::High,
            format!("High stress: stress level at {stress}/10."),
            "Consider stress management techniques like meditation, deep breathing, or taking breaks.",
        ));
    }

    let anxiety = entry.mental_health.anxiety_level;
    if anxiety >= HIGH_ANXIETY_LEVEL {
        risks.push(RiskFinding::new(
            RiskKind::HighAnxiety,
            Severity::High,
            format!("High anxiety: anxiety level at {anxiety}/10."),
            "Practice mindfulness, consider talking to someone, or try relaxation exercises.",
        ));
    }

    let minutes = entry.exercise.duration_minutes;
    if minutes == 0 {
        risks.push(RiskFinding::new(
            RiskKind::Sedentary,
            Severity::Medium,
            "Sedentary day: no physical activity recorded.",
            "Aim for at least 30 minutes of moderate activity daily. Start with a 10-minute walk.",
        ));
    } else if minutes < LOW_ACTIVITY_MINUTES {
        risks.push(RiskFinding::new(
            RiskKind::LowActivity,
            Severity::Low,
            format!("Low activity: only {minutes} minutes of exercise today."),
            "Increase activity gradually. The WHO recommends 150 minutes per week.",
        ));
    }

    let mood = entry.mood.mood_score;
    if mood <= LOW_MOOD_SCORE {
        risks.push(RiskFinding::new(
            RiskKind::LowMood,
            Severity::High,
            format!("Low mood: mood score is {mood}/10."),
            "Consider reaching out to friends, family, or a mental health professional for support.",
        ));
    }

    let symptoms = &entry.symptoms;
    if symptoms.has_symptoms && symptoms.severity >= SEVERE_SYMPTOM_LEVEL {
        risks.push(RiskFinding::new(
            RiskKind::SevereSymptoms,
            Severity::High,
            format!("Severe symptoms: symptom severity at {}/10.", symptoms.severity),
            "Consider consulting a healthcare professional if symptoms persist.",
        ));
    }

    risks
}

/// Evaluate history-wide rules. Returns nothing for fewer than
/// [`PATTERN_MIN_ENTRIES`] entries; at most one finding per kind.
pub fn detect_pattern_risks(history: &[WellnessEntry]) -> Vec<RiskFinding> {
    let mut risks = Vec::new();
    if history.len() < PATTERN_MIN_ENTRIES {
        return risks;
    }
    let n = history.len() as f64;
    let avg = |f: fn(&WellnessEntry) -> f64| {
        let values: Vec<f64> = history.iter().map(f).collect();
        mean(&values).unwrap_or(0.0)
    };
    let share = |f: fn(&WellnessEntry) -> bool| history.iter().filter(|e| f(e)).count() as f64 / n;

    let avg_sleep = avg(|e| e.sleep.hours);
    if avg_sleep < 5.0 {
        risks.push(RiskFinding::new(
            RiskKind::SleepDeficitPattern,
            Severity::Critical,
            format!("Severe sleep deprivation: average sleep is {avg_sleep:.1} hours."),
            "Consult a sleep specialist and keep a consistent sleep schedule.",
        ));
    } else if avg_sleep < 6.5 {
        risks.push(RiskFinding::new(
            RiskKind::SleepDeficitPattern,
            Severity::High,
            format!("Insufficient sleep: average sleep is {avg_sleep:.1} hours."),
            "Aim for 7-9 hours nightly, keep a consistent bedtime and reduce blue light exposure.",
        ));
    }

    let avg_stress = avg(|e| f64::from(e.mental_health.stress_level));
    let avg_anxiety = avg(|e| f64::from(e.mental_health.anxiety_level));
    if avg_stress > 8.0 || avg_anxiety > 8.0 {
        risks.push(RiskFinding::new(
            RiskKind::ChronicStressPattern,
            Severity::Critical,
            format!(
                "Chronic stress: average stress {avg_stress:.1}/10, average anxiety {avg_anxiety:.1}/10."
            ),
            "Seek professional counseling and build a daily relaxation practice.",
        ));
    } else if avg_stress > 6.5 || avg_anxiety > 6.5 {
        risks.push(RiskFinding::new(
            RiskKind::ChronicStressPattern,
            Severity::High,
            format!(
                "Elevated stress: average stress {avg_stress:.1}/10, average anxiety {avg_anxiety:.1}/10."
            ),
            "Use stress management techniques such as meditation, yoga and regular exercise.",
        ));
    }

    let exercise_rate = share(|e| e.exercise.is_recorded());
    if exercise_rate < 0.2 {
        risks.push(RiskFinding::new(
            RiskKind::SedentaryPattern,
            Severity::High,
            format!("Sedentary lifestyle: exercise logged on {:.0}% of days.", exercise_rate * 100.0),
            "Start with 20-30 minute daily walks and build up gradually.",
        ));
    } else if exercise_rate < 0.43 {
        risks.push(RiskFinding::new(
            RiskKind::SedentaryPattern,
            Severity::Medium,
            format!("Low physical activity: exercise logged on {:.0}% of days.", exercise_rate * 100.0),
            "Aim for 150 minutes of moderate exercise per week.",
        ));
    }

    let low_gratitude_rate = share(|e| e.gratitude_len() < 10);
    if low_gratitude_rate > 0.7 {
        risks.push(RiskFinding::new(
            RiskKind::LowResiliencePattern,
            Severity::Medium,
            "Low resilience: gratitude is rarely recorded.",
            "Keep a daily gratitude journal and make time for social connection.",
        ));
    }

    let symptom_rate = share(|e| e.symptoms.has_symptoms);
    if symptom_rate > 0.5 {
        risks.push(RiskFinding::new(
            RiskKind::PersistentSymptomsPattern,
            Severity::High,
            format!("Persistent symptoms: reported on {:.0}% of days.", symptom_rate * 100.0),
            "Consult a healthcare provider and keep tracking symptom severity.",
        ));
    }

    risks
}

/// Stable sort, most severe first; equal severities keep detection order.
pub fn sort_by_severity(findings: &mut [RiskFinding]) {
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
}
