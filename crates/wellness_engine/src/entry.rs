//! Journal entry types.
//!
//! [`EntryInput`] is what callers submit: every block and every field is
//! optional and numbers may arrive as any JSON number. [`WellnessEntry`] is the
//! canonical record produced by [`crate::normalize`]; all engine functions
//! take the canonical form only.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    #[default]
    Moderate,
    High,
}

impl Intensity {
    /// Case-insensitive parse; unknown labels fall back to `Moderate`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "low" => Intensity::Light,
            "high" | "vigorous" => Intensity::High,
            _ => Intensity::Moderate,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Mood {
    pub current_mood: String,
    /// 1-10
    pub mood_score: u8,
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Sleep {
    pub hours: f64,
    /// 1-10
    pub quality: u8,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Exercise {
    /// `None` when no activity was recorded.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub duration_minutes: u32,
    pub intensity: Intensity,
}

impl Exercise {
    pub fn is_recorded(&self) -> bool {
        self.kind.is_some()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Nutrition {
    /// Glasses of water.
    pub water_intake: f64,
    pub notes: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct Symptoms {
    pub has_symptoms: bool,
    /// 0-10
    pub severity: u8,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MentalHealth {
    /// 1-10
    pub stress_level: u8,
    /// 1-10
    pub anxiety_level: u8,
    pub gratitude: String,
    pub challenges: String,
}

/// One day's canonical wellness record.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct WellnessEntry {
    pub date: NaiveDate,
    pub mood: Mood,
    pub sleep: Sleep,
    pub exercise: Exercise,
    pub nutrition: Nutrition,
    pub symptoms: Symptoms,
    pub mental_health: MentalHealth,
    pub notes: String,
}

impl WellnessEntry {
    /// Number of characters in the gratitude note.
    pub fn gratitude_len(&self) -> usize {
        self.mental_health.gratitude.chars().count()
    }
}

// === Raw input ===

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct MoodInput {
    pub current_mood: Option<String>,
    pub mood_score: Option<f64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SleepInput {
    pub hours: Option<f64>,
    pub quality: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ExerciseInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub duration_minutes: Option<f64>,
    pub intensity: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct NutritionInput {
    pub water_intake: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SymptomsInput {
    pub has_symptoms: Option<bool>,
    pub severity: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct MentalHealthInput {
    pub stress_level: Option<f64>,
    pub anxiety_level: Option<f64>,
    pub gratitude: Option<String>,
    pub challenges: Option<String>,
}

/// A journal entry as submitted by a caller.
///
/// Field names match [`WellnessEntry`], so the JSON of a canonical entry is
/// also a valid `EntryInput`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct EntryInput {
    /// YYYY-MM-DD or an RFC 3339 timestamp
    pub date: Option<String>,
    pub mood: Option<MoodInput>,
    pub sleep: Option<SleepInput>,
    pub exercise: Option<ExerciseInput>,
    pub nutrition: Option<NutritionInput>,
    pub symptoms: Option<SymptomsInput>,
    pub mental_health: Option<MentalHealthInput>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn intensity_parse_is_lenient() {
        assert_eq!(Intensity::parse_lenient("HIGH"), Intensity::High);
        assert_eq!(Intensity::parse_lenient(" light "), Intensity::Light);
        assert_eq!(Intensity::parse_lenient("extreme"), Intensity::Moderate);
        assert_eq!(Intensity::parse_lenient(""), Intensity::Moderate);
    }

    #[test]
    fn entry_input_accepts_sparse_json() {
        let payload = json!({"mood": {"mood_score": 7}, "exercise": {"type": "run"}});
        let input: EntryInput = serde_json::from_value(payload).expect("deserialize input");
        assert_eq!(input.mood.unwrap().mood_score, Some(7.0));
        assert_eq!(input.exercise.unwrap().kind.as_deref(), Some("run"));
        assert!(input.sleep.is_none());
    }

    #[test]
    fn exercise_type_serializes_as_type() {
        let ex = Exercise {
            kind: Some("swim".into()),
            duration_minutes: 20,
            intensity: Intensity::High,
        };
        let v = serde_json::to_value(&ex).expect("serialize");
        assert_eq!(v["type"], "swim");
        assert_eq!(v["intensity"], "high");
    }
}
