use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const DEFAULT_MAX_PER_WEEK: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Gain,
    Loss,
}

impl ActivityKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "gain" => Some(Self::Gain),
            "loss" => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gain => "gain",
            Self::Loss => "loss",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_max_per_week() -> u32 {
    DEFAULT_MAX_PER_WEEK
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GainActivity {
    pub id: String,
    pub name: String,
    pub points: f64,
    #[serde(default = "default_max_per_week")]
    pub max_per_week: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossActivity {
    pub id: String,
    pub name: String,
    pub points: f64,
}

/// The activity catalog. One global document, always written whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Configuration {
    #[serde(default)]
    pub gains: Vec<GainActivity>,
    #[serde(default)]
    pub losses: Vec<LossActivity>,
}

impl Configuration {
    pub fn gain(&self, id: &str) -> Option<&GainActivity> {
        self.gains.iter().find(|item| item.id == id)
    }

    pub fn loss(&self, id: &str) -> Option<&LossActivity> {
        self.losses.iter().find(|item| item.id == id)
    }
}

/// Point value as found on a stored event.
///
/// Older records may hold strings or other junk here; [`Points::amount`]
/// coerces whatever is present instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Points(pub Value);

impl Points {
    pub fn amount(&self) -> f64 {
        match &self.0 {
            Value::Number(number) => number.as_f64().unwrap_or(0.0),
            Value::String(text) => leading_number(text).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

impl From<f64> for Points {
    fn from(value: f64) -> Self {
        Self(serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number))
    }
}

/// Reads the longest decimal number at the start of `text` (after
/// whitespace), exponent included, ignoring whatever follows it.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;
    let mut number = text[..end].to_string();

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if frac_digits > 0 {
            number.push_str(&text[end..end + 1 + frac_digits]);
        }
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits(end + 1 + sign);
        if exp_digits > 0 {
            number.push_str(&text[end..end + 1 + sign + exp_digits]);
        }
    }
    number.parse().ok()
}

/// One logged occurrence. Never edited after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub activity_id: String,
    pub name: String,
    pub points: Points,
    pub date: String,
    pub week: String,
    /// Kept as written so records with an unknown type survive a rewrite.
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn activity_kind(&self) -> Option<ActivityKind> {
        ActivityKind::parse(&self.kind)
    }
}

/// An event before the store has given it an id and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub activity_id: String,
    pub name: String,
    pub points: f64,
    pub date: String,
    pub week: String,
    pub kind: ActivityKind,
}

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEventRequest {
    pub activity_id: String,
    pub kind: String,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddEventResponse {
    pub event_id: String,
    pub activity_id: String,
    pub date: String,
    pub week: String,
}

#[derive(Debug, Deserialize)]
pub struct UndoRequest {
    pub activity_id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UndoResponse {
    /// Nothing logged for the activity; no request was made.
    Noop,
    Confirm { event_id: String, prompt: String },
    Deleted { event_id: String },
}

/// One editor's working copy of the catalog.
#[derive(Debug, Serialize)]
pub struct DraftView {
    pub draft_id: String,
    #[serde(flatten)]
    pub config: Configuration,
}

#[derive(Debug, Deserialize)]
pub struct NewActivityRequest {
    pub name: String,
    pub points: String,
    #[serde(default)]
    pub max_per_week: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainStatus {
    Available,
    DoneToday,
    WeeklyLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControlView {
    Idle,
    Pending,
    Failed { message: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GainRow {
    pub id: String,
    pub name: String,
    pub points: f64,
    pub max_per_week: u32,
    pub weekly_count: usize,
    pub done_today: bool,
    pub status: GainStatus,
    pub progress: f64,
    pub control: ControlView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LossRow {
    pub id: String,
    pub name: String,
    pub points: f64,
    pub control: ControlView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Board {
    pub date: String,
    pub week: String,
    pub week_label: String,
    pub month: String,
    pub month_label: String,
    pub gains: Vec<GainRow>,
    pub losses: Vec<LossRow>,
    pub monthly_total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn points_coerce_legacy_values() {
        assert_eq!(Points(json!(10)).amount(), 10.0);
        assert_eq!(Points(json!("4.5")).amount(), 4.5);
        assert_eq!(Points(json!("12abc")).amount(), 12.0);
        assert_eq!(Points(json!("1e3")).amount(), 1000.0);
        assert_eq!(Points(json!("abc")).amount(), 0.0);
        assert_eq!(Points(json!(null)).amount(), 0.0);
        assert_eq!(Points(json!({"nested": 1})).amount(), 0.0);
    }

    #[test]
    fn leading_number_reads_prefix() {
        assert_eq!(leading_number("  7pts"), Some(7.0));
        assert_eq!(leading_number("-3.25x"), Some(-3.25));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("1.234.5"), Some(1.234));
        assert_eq!(leading_number("1e3"), Some(1000.0));
        assert_eq!(leading_number("2.5E-1pts"), Some(0.25));
        assert_eq!(leading_number("4e"), Some(4.0));
        assert_eq!(leading_number("3e+x"), Some(3.0));
        assert_eq!(leading_number("e5"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn configuration_fills_missing_members() {
        let cfg: Configuration = serde_json::from_value(json!({
            "gains": [{ "id": "run_1", "name": "Run", "points": 10 }]
        }))
        .unwrap();
        assert_eq!(cfg.gains[0].max_per_week, DEFAULT_MAX_PER_WEEK);
        assert!(cfg.losses.is_empty());
    }

    #[test]
    fn event_uses_stored_field_names() {
        let event: Event = serde_json::from_value(json!({
            "id": "e1",
            "activityId": "run_1",
            "name": "Run",
            "points": "10",
            "date": "2024-03-05",
            "week": "2024-W10",
            "type": "bonus",
            "timestamp": "2024-03-05T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.activity_kind(), None);
        assert_eq!(event.points.amount(), 10.0);
        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["activityId"], "run_1");
        assert_eq!(back["type"], "bonus");
    }
}
