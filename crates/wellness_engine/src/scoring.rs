//! Sub-score calculators and the weighted composite.
//!
//! Every calculator is a pure function of one canonical entry and returns a
//! value in `[0, 100]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entry::{Exercise, Intensity, MentalHealth, Sleep, WellnessEntry};

pub const WEIGHT_MOOD: f64 = 0.25;
pub const WEIGHT_SLEEP: f64 = 0.20;
pub const WEIGHT_EXERCISE: f64 = 0.15;
pub const WEIGHT_STRESS: f64 = 0.20;
pub const WEIGHT_MENTAL_HEALTH: f64 = 0.20;

/// Gratitude notes longer than this earn the mental-health bonus.
pub const GRATITUDE_BONUS_MIN_CHARS: usize = 10;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct SubScores {
    pub mood: f64,
    pub sleep: f64,
    pub exercise: f64,
    pub stress: f64,
    pub mental_health: f64,
}

impl SubScores {
    /// Weighted sum, not rounded.
    pub fn weighted_total(&self) -> f64 {
        self.mood * WEIGHT_MOOD
            + self.sleep * WEIGHT_SLEEP
            + self.exercise * WEIGHT_EXERCISE
            + self.stress * WEIGHT_STRESS
            + self.mental_health * WEIGHT_MENTAL_HEALTH
    }
}

/// Ordered from worst to best so `Ord` follows the score.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum WellnessStatus {
    Critical,
    NeedsAttention,
    Good,
    Excellent,
}

impl WellnessStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => WellnessStatus::Critical,
            40..=59 => WellnessStatus::NeedsAttention,
            60..=79 => WellnessStatus::Good,
            _ => WellnessStatus::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WellnessStatus::Critical => "Critical",
            WellnessStatus::NeedsAttention => "Needs Attention",
            WellnessStatus::Good => "Good",
            WellnessStatus::Excellent => "Excellent",
        }
    }

    /// Display color, fixed per status.
    pub fn color(&self) -> &'static str {
        match self {
            WellnessStatus::Critical => "#ef4444",
            WellnessStatus::NeedsAttention => "#f59e0b",
            WellnessStatus::Good => "#3b82f6",
            WellnessStatus::Excellent => "#10b981",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct CompositeResult {
    pub overall_score: u8,
    pub status: WellnessStatus,
    pub status_color: String,
    pub sub_scores: SubScores,
}

fn clamp_score(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

pub fn mood_score(entry: &WellnessEntry) -> f64 {
    clamp_score(f64::from(entry.mood.mood_score) / 10.0 * 100.0)
}

pub fn sleep_score(sleep: &Sleep) -> f64 {
    let hours = sleep.hours;
    let mut score = 50.0;
    if (7.0..=9.0).contains(&hours) {
        score += 30.0;
    } else if (6.0..=10.0).contains(&hours) {
        score += 20.0;
    } else {
        score -= 20.0;
    }
    score += (f64::from(sleep.quality) - 5.0) * 4.0;
    clamp_score(score)
}

pub fn exercise_score(exercise: &Exercise) -> f64 {
    let mut score = 30.0;
    if !exercise.is_recorded() || exercise.duration_minutes == 0 {
        return score;
    }
    score += match exercise.duration_minutes {
        d if d >= 30 => 40.0,
        d if d >= 15 => 25.0,
        _ => 10.0,
    };
    score += match exercise.intensity {
        Intensity::High => 10.0,
        Intensity::Moderate => 5.0,
        Intensity::Light => 0.0,
    };
    clamp_score(score)
}

/// Inverted: lower stress and anxiety give a higher score.
pub fn stress_score(mental: &MentalHealth) -> f64 {
    let avg = (f64::from(mental.stress_level) + f64::from(mental.anxiety_level)) / 2.0;
    clamp_score(100.0 - (avg - 1.0) * 10.0)
}

pub fn mental_health_score(mental: &MentalHealth) -> f64 {
    let mut score = 50.0;
    if mental.gratitude.chars().count() > GRATITUDE_BONUS_MIN_CHARS {
        score += 20.0;
    }
    if !mental.challenges.is_empty() {
        // naming a challenge counts as engagement
        score += 10.0;
    }
    let load = f64::from(mental.stress_level) + f64::from(mental.anxiety_level) - 10.0;
    score -= load * 3.0;
    clamp_score(score)
}

pub fn compute_sub_scores(entry: &WellnessEntry) -> SubScores {
    SubScores {
        mood: mood_score(entry),
        sleep: sleep_score(&entry.sleep),
        exercise: exercise_score(&entry.exercise),
        stress: stress_score(&entry.mental_health),
        mental_health: mental_health_score(&entry.mental_health),
    }
}

pub fn compute_composite(entry: &WellnessEntry) -> CompositeResult {
    let sub_scores = compute_sub_scores(entry);
    let overall_score = sub_scores.weighted_total().round().clamp(0.0, 100.0) as u8;
    let status = WellnessStatus::from_score(overall_score);
    CompositeResult {
        overall_score,
        status,
        status_color: status.color().to_string(),
        sub_scores,
    }
}
