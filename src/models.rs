use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Day-of-week bucket key. Serialized as the English day name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn today() -> Self {
        Self::from(Local::now().weekday())
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts full or three-letter day names, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| {
                let name = d.name().to_lowercase();
                name == lower || name[..3] == lower
            })
            .ok_or_else(|| format!("unknown weekday '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String, // RFC 3339, UTC
}

impl Task {
    pub fn new(text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            completed: false,
            created_at: now_rfc3339(),
        }
    }
}

/// Tasks grouped by weekday
pub type TasksByDay = BTreeMap<Weekday, Vec<Task>>;

/// Seven empty day buckets
pub fn empty_week() -> TasksByDay {
    Weekday::ALL.iter().map(|d| (*d, Vec::new())).collect()
}

/// Wellness mood picked on the tracker page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Sleepy,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Sleepy, Mood::Neutral];

    pub fn name(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Sleepy => "Sleepy",
            Mood::Neutral => "Neutral",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Sleepy => "😴",
            Mood::Neutral => "😐",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().to_lowercase() == lower)
            .ok_or_else(|| format!("unknown mood '{}'", s))
    }
}

/// Stored as `""` when no mood has been picked yet
mod optional_mood {
    use super::Mood;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mood: &Option<Mood>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(mood.map(Mood::name).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Mood>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

pub const MAX_SLEEP_HOURS: u8 = 10;
pub const MAX_WATER_CUPS: u8 = 8;

/// Numeric wellness fields were historically written either as JSON numbers
/// or as the raw text-input string. Blank strings and null read as zero.
pub mod lenient_number {
    use super::{MAX_SLEEP_HOURS, MAX_WATER_CUPS};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn parse(value: &Value) -> Result<i64, String> {
        match value {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| format!("number out of range: {}", n)),
            Value::String(s) if s.trim().is_empty() => Ok(0),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|f| f as i64))
                    .map_err(|_| format!("not a number: '{}'", s))
            }
            other => Err(format!("expected a number, got {}", other)),
        }
    }

    fn clamped<'de, D: Deserializer<'de>>(d: D, max: i64) -> Result<i64, D::Error> {
        let value = Value::deserialize(d)?;
        parse(&value).map(|n| n.clamp(0, max)).map_err(serde::de::Error::custom)
    }

    pub fn sleep_hours<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        clamped(d, MAX_SLEEP_HOURS as i64).map(|n| n as u8)
    }

    pub fn steps<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        clamped(d, u32::MAX as i64).map(|n| n as u32)
    }

    pub fn water_cups<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        clamped(d, MAX_WATER_CUPS as i64).map(|n| n as u8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessRecord {
    #[serde(with = "optional_mood")]
    pub mood: Option<Mood>,
    #[serde(default, deserialize_with = "lenient_number::sleep_hours")]
    pub sleep_hours: u8,
    #[serde(default, deserialize_with = "lenient_number::steps")]
    pub steps: u32,
    #[serde(default, deserialize_with = "lenient_number::water_cups")]
    pub water_cups: u8,
}

/// Moods offered by the journal composer. Serialized as the emoji.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JournalMood {
    #[default]
    #[serde(rename = "😊")]
    Happy,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😡")]
    Angry,
    #[serde(rename = "😌")]
    Relaxed,
    #[serde(rename = "😰")]
    Anxious,
}

impl JournalMood {
    pub const ALL: [JournalMood; 5] = [
        JournalMood::Happy,
        JournalMood::Sad,
        JournalMood::Angry,
        JournalMood::Relaxed,
        JournalMood::Anxious,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            JournalMood::Happy => "😊",
            JournalMood::Sad => "😢",
            JournalMood::Angry => "😡",
            JournalMood::Relaxed => "😌",
            JournalMood::Anxious => "😰",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JournalMood::Happy => "Happy",
            JournalMood::Sad => "Sad",
            JournalMood::Angry => "Angry",
            JournalMood::Relaxed => "Relaxed",
            JournalMood::Anxious => "Anxious",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalPost {
    pub id: u64,
    pub caption: String,
    pub mood: JournalMood,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub timestamp: String, // display string, e.g. "Today at 8:45 AM"
    #[serde(default)]
    pub is_new: bool,
}

/// Reference to uploaded media held in the blob store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogPostType {
    Text,
    Image,
    Music,
}

impl BlogPostType {
    pub const ALL: [BlogPostType; 3] = [BlogPostType::Text, BlogPostType::Image, BlogPostType::Music];

    pub fn label(self) -> &'static str {
        match self {
            BlogPostType::Text => "text",
            BlogPostType::Image => "image",
            BlogPostType::Music => "music",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPost {
    pub content: String,
    pub is_private: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePost {
    pub image: MediaRef,
    pub is_private: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicPost {
    pub music: MediaRef,
    pub is_private: bool,
    pub timestamp: String,
}

/// A blog post from any bucket, tagged with its originating type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlogPost {
    Text(TextPost),
    Image(ImagePost),
    Music(MusicPost),
}

impl BlogPost {
    pub fn kind(&self) -> BlogPostType {
        match self {
            BlogPost::Text(_) => BlogPostType::Text,
            BlogPost::Image(_) => BlogPostType::Image,
            BlogPost::Music(_) => BlogPostType::Music,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            BlogPost::Text(p) => &p.timestamp,
            BlogPost::Image(p) => &p.timestamp,
            BlogPost::Music(p) => &p.timestamp,
        }
    }

    pub fn is_private(&self) -> bool {
        match self {
            BlogPost::Text(p) => p.is_private,
            BlogPost::Image(p) => p.is_private,
            BlogPost::Music(p) => p.is_private,
        }
    }

    /// One-line summary for lists
    pub fn summary(&self) -> String {
        match self {
            BlogPost::Text(p) => p.content.lines().next().unwrap_or_default().to_string(),
            BlogPost::Image(p) => format!("🖼 {}", p.image.file_name),
            BlogPost::Music(p) => format!("🎵 {}", p.music.file_name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed_tasks_count: usize,
    pub total_tasks_count: usize,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub timestamp: String,
    pub tasks: TasksByDay,
    pub wellness: WellnessRecord,
    pub stats: TaskStats,
}

/// Current UTC time as RFC 3339 with millisecond precision
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// "Today at 8:45 AM"
pub fn display_time(at: DateTime<Local>) -> String {
    let (is_pm, hour) = at.hour12();
    format!(
        "Today at {}:{:02} {}",
        hour,
        at.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn weekday_parses_full_and_short_names() {
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!("Sun".parse::<Weekday>(), Ok(Weekday::Sunday));
        assert!("Funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn weekday_wraps_around() {
        assert_eq!(Weekday::Sunday.next(), Weekday::Monday);
        assert_eq!(Weekday::Monday.prev(), Weekday::Sunday);
    }

    #[test]
    fn task_json_uses_camel_case() {
        let task = Task::new("stretch".to_string());
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn week_map_serializes_day_names_as_keys() {
        let json = serde_json::to_string(&empty_week()).unwrap();
        assert!(json.starts_with("{\"Monday\":[]"));
        let back: TasksByDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 7);
    }

    #[test]
    fn unset_mood_is_empty_string() {
        let record = WellnessRecord::default();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mood"], "");
        let happy = WellnessRecord { mood: Some(Mood::Happy), ..record };
        assert_eq!(serde_json::to_value(&happy).unwrap()["mood"], "Happy");
    }

    #[test]
    fn wellness_accepts_text_input_numbers() {
        let record: WellnessRecord =
            serde_json::from_str(r#"{"mood":"Sleepy","sleepHours":"7","steps":"8000","waterCups":""}"#).unwrap();
        assert_eq!(
            record,
            WellnessRecord { mood: Some(Mood::Sleepy), sleep_hours: 7, steps: 8000, water_cups: 0 }
        );
    }

    #[test]
    fn wellness_numbers_are_clamped_when_read() {
        let record: WellnessRecord =
            serde_json::from_str(r#"{"mood":"","sleepHours":14,"steps":-5,"waterCups":"12"}"#).unwrap();
        assert_eq!(record.sleep_hours, MAX_SLEEP_HOURS);
        assert_eq!(record.steps, 0);
        assert_eq!(record.water_cups, MAX_WATER_CUPS);
        assert!(serde_json::from_str::<WellnessRecord>(r#"{"mood":"","steps":"lots"}"#).is_err());
    }

    #[test]
    fn journal_mood_serializes_as_emoji() {
        assert_eq!(serde_json::to_string(&JournalMood::Relaxed).unwrap(), "\"😌\"");
    }

    #[test]
    fn display_time_uses_twelve_hour_clock() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 20, 5, 0).unwrap();
        assert_eq!(display_time(at), "Today at 8:05 PM");
        let morning = Local.with_ymd_and_hms(2024, 5, 1, 0, 30, 0).unwrap();
        assert_eq!(display_time(morning), "Today at 12:30 AM");
    }
}
