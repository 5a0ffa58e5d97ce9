//! Entry validation and normalization.
//!
//! This is the only place where defaults and clamping happen. Every engine
//! function downstream assumes a canonical [`WellnessEntry`].

use chrono::{NaiveDate, Utc};

use crate::entry::{
    EntryInput, Exercise, Intensity, MentalHealth, Mood, Nutrition, Sleep, Symptoms,
    WellnessEntry,
};
use crate::utils::parse_entry_date;

/// Neutral midpoint for 1-10 scales.
pub const NEUTRAL_SCALE: u8 = 5;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

/// Normalize with today's UTC date as the fallback for a missing or invalid date.
pub fn normalize(input: &EntryInput) -> WellnessEntry {
    normalize_with_fallback(input, Utc::now().date_naive())
}

/// Normalize a raw entry, using `fallback_date` when the entry carries no usable date.
pub fn normalize_with_fallback(input: &EntryInput, fallback_date: NaiveDate) -> WellnessEntry {
    let date = input
        .date
        .as_deref()
        .and_then(parse_entry_date)
        .unwrap_or(fallback_date);

    let mood = input.mood.clone().unwrap_or_default();
    let sleep = input.sleep.clone().unwrap_or_default();
    let exercise = input.exercise.clone().unwrap_or_default();
    let nutrition = input.nutrition.clone().unwrap_or_default();
    let symptoms = input.symptoms.clone().unwrap_or_default();
    let mental = input.mental_health.clone().unwrap_or_default();

    let kind = exercise
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    WellnessEntry {
        date,
        mood: Mood {
            current_mood: text(mood.current_mood),
            mood_score: scale(mood.mood_score, 1, 10, NEUTRAL_SCALE),
            description: text(mood.description),
        },
        sleep: Sleep {
            hours: bounded(sleep.hours, MAX_SLEEP_HOURS),
            quality: scale(sleep.quality, 1, 10, NEUTRAL_SCALE),
        },
        exercise: Exercise {
            kind,
            duration_minutes: bounded(exercise.duration_minutes, MAX_DURATION_MINUTES).round()
                as u32,
            intensity: exercise
                .intensity
                .as_deref()
                .map(Intensity::parse_lenient)
                .unwrap_or_default(),
        },
        nutrition: Nutrition {
            water_intake: bounded(nutrition.water_intake, f64::MAX),
            notes: text(nutrition.notes),
        },
        symptoms: Symptoms {
            has_symptoms: symptoms.has_symptoms.unwrap_or(false),
            severity: scale(symptoms.severity, 0, 10, 0),
        },
        mental_health: MentalHealth {
            stress_level: scale(mental.stress_level, 1, 10, NEUTRAL_SCALE),
            anxiety_level: scale(mental.anxiety_level, 1, 10, NEUTRAL_SCALE),
            gratitude: text(mental.gratitude),
            challenges: text(mental.challenges),
        },
        notes: text(input.notes.clone()),
    }
}

/// Round to the nearest integer and clamp into `[min, max]`; missing or
/// non-finite values take `default`.
fn scale(value: Option<f64>, min: u8, max: u8, default: u8) -> u8 {
    match value {
        Some(v) if v.is_finite() => v.round().clamp(f64::from(min), f64::from(max)) as u8,
        _ => default,
    }
}

/// Non-negative quantity with an upper bound; missing or non-finite is 0.
fn bounded(value: Option<f64>, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.min(max),
        _ => 0.0,
    }
}

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}
