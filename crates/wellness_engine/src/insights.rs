//! Insight and recommendation generation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::WellnessEntry;
use crate::scoring::{CompositeResult, compute_composite};
use crate::trends::{TREND_WINDOW, TrendDirection, TrendMetric, TrendReport, analyze_trends, newest_first};
use crate::utils::mean;

pub const EXCELLENT_SCORE: u8 = 80;
pub const GREAT_MOOD_SCORE: u8 = 8;
pub const GRATITUDE_INSIGHT_MIN_CHARS: usize = 20;
pub const LOW_MOOD_PATTERN_AVG: f64 = 4.0;
pub const SHORT_SLEEP_PATTERN_AVG: f64 = 6.0;

pub const RECOMMENDED_SLEEP_HOURS: f64 = 7.0;
pub const STRESS_RECOMMENDATION_LEVEL: u8 = 7;
pub const RECOMMENDED_EXERCISE_MINUTES: u32 = 30;
pub const RECOMMENDED_WATER_GLASSES: f64 = 8.0;
pub const MOOD_SUPPORT_SCORE: u8 = 5;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Positive,
    Warning,
    Info,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Insight {
    pub category: InsightCategory,
    pub message: String,
}

impl Insight {
    fn new(category: InsightCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Sleep,
    Stress,
    Exercise,
    Nutrition,
    MentalHealth,
}

/// Ordered from least to most urgent.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub suggestions: Vec<String>,
}

impl Recommendation {
    fn new(
        category: RecommendationCategory,
        priority: Priority,
        title: &str,
        suggestions: &[&str],
    ) -> Self {
        Self {
            category,
            priority,
            title: title.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Insights for `entry` given its history (any order).
pub fn generate_insights(entry: &WellnessEntry, history: &[WellnessEntry]) -> Vec<Insight> {
    let composite = compute_composite(entry);
    let trends = analyze_trends(history);
    generate_insights_with(entry, &composite, history, &trends)
}

/// Same as [`generate_insights`] with the composite and trends already computed.
pub fn generate_insights_with(
    entry: &WellnessEntry,
    composite: &CompositeResult,
    history: &[WellnessEntry],
    trends: &TrendReport,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if composite.overall_score >= EXCELLENT_SCORE {
        insights.push(Insight::new(
            InsightCategory::Positive,
            "Excellent! You're maintaining great wellness habits. Keep it up!",
        ));
    }

    if entry.mood.mood_score >= GREAT_MOOD_SCORE {
        insights.push(Insight::new(
            InsightCategory::Positive,
            "Great mood today! Your positive energy is wonderful.",
        ));
    }

    if (7.0..=9.0).contains(&entry.sleep.hours) {
        insights.push(Insight::new(
            InsightCategory::Positive,
            "Perfect sleep duration! You're getting the recommended 7-9 hours.",
        ));
    }

    if entry.gratitude_len() > GRATITUDE_INSIGHT_MIN_CHARS {
        insights.push(Insight::new(
            InsightCategory::Positive,
            "Practicing gratitude is excellent for mental wellness!",
        ));
    }

    insights.extend(pattern_insights(history));
    insights.extend(trend_insights(trends));
    insights
}

/// Warnings from the most recent three entries of `history`.
fn pattern_insights(history: &[WellnessEntry]) -> Vec<Insight> {
    let mut insights = Vec::new();
    if history.len() < TREND_WINDOW {
        return insights;
    }
    let recent: Vec<&WellnessEntry> = newest_first(history).into_iter().take(TREND_WINDOW).collect();

    let moods: Vec<f64> = recent.iter().map(|e| f64::from(e.mood.mood_score)).collect();
    if mean(&moods).is_some_and(|avg| avg < LOW_MOOD_PATTERN_AVG) {
        insights.push(Insight::new(
            InsightCategory::Warning,
            "Pattern alert: your mood has been consistently low over the past few days.",
        ));
    }

    let sleep: Vec<f64> = recent.iter().map(|e| e.sleep.hours).collect();
    if mean(&sleep).is_some_and(|avg| avg < SHORT_SLEEP_PATTERN_AVG) {
        insights.push(Insight::new(
            InsightCategory::Warning,
            "Pattern alert: you've been getting insufficient sleep consistently.",
        ));
    }

    insights
}

fn trend_insights(trends: &TrendReport) -> Vec<Insight> {
    TrendMetric::ALL
        .iter()
        .filter_map(|metric| {
            let direction = trends.get(*metric).direction;
            let rising = match direction {
                TrendDirection::Stable => return None,
                TrendDirection::Improving => true,
                TrendDirection::Declining => false,
            };
            let good_news = rising == metric.higher_is_better();
            let verb = if rising { "rising" } else { "falling" };
            let tail = if good_news {
                "nice progress."
            } else {
                "worth keeping an eye on."
            };
            Some(Insight::new(
                InsightCategory::Info,
                format!("Your {} has been {verb} over recent entries, {tail}", metric.label()),
            ))
        })
        .collect()
}

/// Per-domain recommendations for the current entry. The rules read only the
/// current entry; `_history` keeps the call shape shared with insights.
pub fn generate_recommendations(
    entry: &WellnessEntry,
    _history: &[WellnessEntry],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if entry.sleep.hours < RECOMMENDED_SLEEP_HOURS {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Sleep,
            Priority::High,
            "Improve Sleep Quality",
            &[
                "Establish a consistent bedtime routine",
                "Avoid screens 1 hour before bed",
                "Keep your bedroom cool and dark",
                "Limit caffeine intake after 2 PM",
                "Try relaxation techniques like meditation",
            ],
        ));
    }

    if entry.mental_health.stress_level >= STRESS_RECOMMENDATION_LEVEL {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Stress,
            Priority::High,
            "Stress Management",
            &[
                "Practice deep breathing exercises (4-7-8 technique)",
                "Take regular breaks throughout the day",
                "Try progressive muscle relaxation",
                "Consider mindfulness meditation",
                "Engage in activities you enjoy",
            ],
        ));
    }

    if entry.exercise.duration_minutes < RECOMMENDED_EXERCISE_MINUTES {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Exercise,
            Priority::Medium,
            "Increase Physical Activity",
            &[
                "Aim for 30 minutes of moderate activity daily",
                "Start with 10-minute walks and gradually increase",
                "Try activities you enjoy: dancing, cycling, swimming",
                "Use stairs instead of elevators",
                "Take walking breaks during work",
            ],
        ));
    }

    if entry.nutrition.water_intake < RECOMMENDED_WATER_GLASSES {
        recommendations.push(Recommendation::new(
            RecommendationCategory::Nutrition,
            Priority::Medium,
            "Hydration Goals",
            &[
                "Aim for 8-10 glasses of water daily",
                "Keep a water bottle nearby",
                "Set hourly hydration reminders",
                "Include water-rich foods in your diet",
                "Monitor your hydration throughout the day",
            ],
        ));
    }

    if entry.mood.mood_score <= MOOD_SUPPORT_SCORE {
        recommendations.push(Recommendation::new(
            RecommendationCategory::MentalHealth,
            Priority::High,
            "Mental Wellness Support",
            &[
                "Practice daily gratitude journaling",
                "Connect with friends and family",
                "Engage in hobbies and activities you love",
                "Consider talking to a mental health professional",
                "Practice self-compassion and self-care",
            ],
        ));
    }

    recommendations
}

/// Stable sort, highest priority first.
pub fn sort_by_priority(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
}
