use chrono::NaiveDate;
use serde_json::json;
use wellness_engine::{
    EntryInput, RiskKind, Severity, TrendDirection, TrendMetric, WellnessEntry, WellnessStatus,
    analyze, analyze_trends, compute_composite, detect_risks, normalize_with_fallback,
};

fn entry(v: serde_json::Value) -> WellnessEntry {
    let input: EntryInput = serde_json::from_value(v).expect("input");
    normalize_with_fallback(&input, NaiveDate::from_ymd_opt(2025, 2, 1).expect("date"))
}

#[test]
fn struggling_day_yields_exactly_five_risks() {
    let e = entry(json!({
        "sleep": {"hours": 3},
        "mental_health": {"stress_level": 9, "anxiety_level": 9},
        "mood": {"mood_score": 2},
        "exercise": {"duration_minutes": 0}
    }));
    let risks = detect_risks(&e);
    let kinds: Vec<_> = risks.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RiskKind::SleepDeprivation,
            RiskKind::HighStress,
            RiskKind::HighAnxiety,
            RiskKind::Sedentary,
            RiskKind::LowMood,
        ]
    );
    assert_eq!(risks[0].severity, Severity::High);
}

#[test]
fn healthy_day_has_no_risks() {
    let e = entry(json!({
        "sleep": {"hours": 8},
        "mental_health": {"stress_level": 3, "anxiety_level": 3},
        "mood": {"mood_score": 8},
        "exercise": {"type": "run", "duration_minutes": 45}
    }));
    assert!(detect_risks(&e).is_empty());
}

#[test]
fn composite_is_deterministic() {
    let e = entry(json!({"mood": {"mood_score": 6}, "sleep": {"hours": 6.5, "quality": 4}}));
    let first = compute_composite(&e);
    for _ in 0..10 {
        assert_eq!(compute_composite(&e), first);
    }
}

#[test]
fn composite_status_tracks_score() {
    let e = entry(json!({
        "mood": {"mood_score": 1},
        "sleep": {"hours": 2, "quality": 1},
        "mental_health": {"stress_level": 10, "anxiety_level": 10}
    }));
    let c = compute_composite(&e);
    assert!(c.overall_score < 40, "{}", c.overall_score);
    assert_eq!(c.status, WellnessStatus::Critical);
}

#[test]
fn improving_sleep_history() {
    // newest first: 8,8,8,4,4,4
    let history: Vec<_> = [8.0, 8.0, 8.0, 4.0, 4.0, 4.0]
        .iter()
        .enumerate()
        .map(|(i, h)| entry(json!({"date": format!("2025-02-{:02}", 20 - i), "sleep": {"hours": h}})))
        .collect();
    let report = analyze_trends(&history);
    assert_eq!(report.get(TrendMetric::Sleep).direction, TrendDirection::Improving);
}

#[test]
fn analysis_serializes_with_snake_case_labels() {
    let history: Vec<_> = (1..=3)
        .map(|d| {
            entry(json!({
                "date": format!("2025-02-{d:02}"),
                "sleep": {"hours": 4},
                "mental_health": {"stress_level": 9}
            }))
        })
        .collect();
    let analysis = analyze(&history[2], &history);
    let v = serde_json::to_value(&analysis).expect("json");
    assert_eq!(v["date"], "2025-02-03");
    assert_eq!(v["risks"][0]["severity"], "high");
    assert!(
        v["pattern_risks"]
            .as_array()
            .expect("array")
            .iter()
            .any(|r| r["kind"] == "chronic_stress_pattern")
    );
    assert_eq!(v["summary"]["sleep_assessment"], "needs_improvement");
    assert_eq!(v["trends"]["sleep"]["direction"], "stable");
}
