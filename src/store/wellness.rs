use crate::models::{Mood, WellnessRecord, MAX_SLEEP_HOURS, MAX_WATER_CUPS};
use crate::storage::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellnessAction {
    SetMood(Option<Mood>),
    SetSleepHours(i64),
    SetSteps(i64),
    SetWaterCups(i64),
}

impl WellnessAction {
    /// Storage key holding the field this action writes
    pub fn storage_key(&self) -> &'static str {
        match self {
            WellnessAction::SetMood(_) => keys::MOOD,
            WellnessAction::SetSleepHours(_) => keys::SLEEP,
            WellnessAction::SetSteps(_) => keys::STEPS,
            WellnessAction::SetWaterCups(_) => keys::WATER,
        }
    }
}

/// Apply `action` to `record`, clamping numeric fields to their ranges.
/// Returns true when a field changed.
pub fn reduce(record: &mut WellnessRecord, action: WellnessAction) -> bool {
    let before = record.clone();
    match action {
        WellnessAction::SetMood(mood) => record.mood = mood,
        WellnessAction::SetSleepHours(hours) => {
            record.sleep_hours = hours.clamp(0, MAX_SLEEP_HOURS as i64) as u8;
        }
        WellnessAction::SetSteps(steps) => {
            record.steps = steps.clamp(0, u32::MAX as i64) as u32;
        }
        WellnessAction::SetWaterCups(cups) => {
            record.water_cups = cups.clamp(0, MAX_WATER_CUPS as i64) as u8;
        }
    }
    *record != before
}

/// JSON value written under the action's storage key
pub fn field_json(record: &WellnessRecord, action: &WellnessAction) -> serde_json::Value {
    match action {
        WellnessAction::SetMood(_) => {
            serde_json::Value::String(record.mood.map(Mood::name).unwrap_or("").to_string())
        }
        WellnessAction::SetSleepHours(_) => record.sleep_hours.into(),
        WellnessAction::SetSteps(_) => record.steps.into(),
        WellnessAction::SetWaterCups(_) => record.water_cups.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Great,
    Good,
    Fair,
    Low,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::Great => "Great",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Low => "Low",
        }
    }
}

/// One wellness metric as shown on the stats overview
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub rating: Rating,
    /// 0.0..=1.0
    pub progress: f64,
}

pub const STEP_GOAL: u32 = 10_000;

pub fn sleep_rating(hours: u8) -> Rating {
    match hours {
        h if h >= 7 => Rating::Good,
        h if h >= 5 => Rating::Fair,
        _ => Rating::Low,
    }
}

pub fn steps_rating(steps: u32) -> Rating {
    match steps {
        s if s >= STEP_GOAL => Rating::Great,
        s if s >= 5_000 => Rating::Good,
        _ => Rating::Low,
    }
}

pub fn water_rating(cups: u8) -> Rating {
    match cups {
        c if c >= MAX_WATER_CUPS => Rating::Great,
        c if c >= 5 => Rating::Good,
        _ => Rating::Low,
    }
}

/// Sleep, steps and water metrics for the overview
pub fn metrics(record: &WellnessRecord) -> [Metric; 3] {
    [
        Metric {
            label: "Sleep",
            value: format!("{} hours", record.sleep_hours),
            rating: sleep_rating(record.sleep_hours),
            progress: record.sleep_hours as f64 / MAX_SLEEP_HOURS as f64,
        },
        Metric {
            label: "Steps",
            value: format!("{} steps", record.steps),
            rating: steps_rating(record.steps),
            progress: (record.steps as f64 / STEP_GOAL as f64).min(1.0),
        },
        Metric {
            label: "Water",
            value: format!("{} cups", record.water_cups),
            rating: water_rating(record.water_cups),
            progress: record.water_cups as f64 / MAX_WATER_CUPS as f64,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_are_clamped() {
        let mut record = WellnessRecord::default();
        reduce(&mut record, WellnessAction::SetSleepHours(14));
        reduce(&mut record, WellnessAction::SetSteps(-20));
        reduce(&mut record, WellnessAction::SetWaterCups(12));
        assert_eq!(record.sleep_hours, 10);
        assert_eq!(record.steps, 0);
        assert_eq!(record.water_cups, 8);

        reduce(&mut record, WellnessAction::SetSleepHours(-1));
        assert_eq!(record.sleep_hours, 0);
    }

    #[test]
    fn reduce_reports_changes() {
        let mut record = WellnessRecord::default();
        assert!(reduce(&mut record, WellnessAction::SetMood(Some(Mood::Sleepy))));
        assert!(!reduce(&mut record, WellnessAction::SetMood(Some(Mood::Sleepy))));
        assert!(reduce(&mut record, WellnessAction::SetMood(None)));
        assert!(!reduce(&mut record, WellnessAction::SetSteps(0)));
    }

    #[test]
    fn field_json_matches_storage_format() {
        let record = WellnessRecord {
            mood: Some(Mood::Happy),
            sleep_hours: 7,
            steps: 8000,
            water_cups: 5,
        };
        assert_eq!(field_json(&record, &WellnessAction::SetMood(None)), "Happy");
        assert_eq!(field_json(&record, &WellnessAction::SetSteps(0)), 8000);
        assert_eq!(WellnessAction::SetWaterCups(0).storage_key(), keys::WATER);
    }

    #[test]
    fn ratings_follow_thresholds() {
        assert_eq!(sleep_rating(7), Rating::Good);
        assert_eq!(sleep_rating(5), Rating::Fair);
        assert_eq!(sleep_rating(4), Rating::Low);
        assert_eq!(steps_rating(10_000), Rating::Great);
        assert_eq!(steps_rating(5_000), Rating::Good);
        assert_eq!(water_rating(8), Rating::Great);
        assert_eq!(water_rating(4), Rating::Low);
    }

    #[test]
    fn step_progress_is_capped() {
        let record = WellnessRecord { steps: 25_000, ..Default::default() };
        assert_eq!(metrics(&record)[1].progress, 1.0);
    }
}
