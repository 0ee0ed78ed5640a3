use chrono::{DateTime, NaiveDate, Utc};
use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Bar color used when the API sends an empty color string.
pub const DEFAULT_MILESTONE_COLOR: Color32 = Color32::from_rgb(0x63, 0x66, 0xF1);

/// A dated milestone of a product, optionally attached to one version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub product_id: Uuid,
    /// `None` means the milestone is product-level.
    #[serde(default)]
    pub product_version_id: Option<Uuid>,
    pub label: String,
    #[serde(with = "iso_instant")]
    pub start_date: DateTime<Utc>,
    /// Open-ended milestones have no end date.
    #[serde(default, with = "iso_instant::option")]
    pub end_date: Option<DateTime<Utc>>,
    /// Category tag, e.g. alpha, beta, ga, support.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(with = "hex_color", default = "default_color")]
    pub color: Color32,
}

fn default_color() -> Color32 {
    DEFAULT_MILESTONE_COLOR
}

impl Milestone {
    /// Create a product-level, open-ended milestone.
    pub fn new(product_id: Uuid, label: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            product_version_id: None,
            label: label.into(),
            start_date: start,
            end_date: None,
            kind: String::new(),
            color: DEFAULT_MILESTONE_COLOR,
        }
    }

    pub fn with_version(mut self, version_id: Uuid) -> Self {
        self.product_version_id = Some(version_id);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn start_ms(&self) -> f64 {
        self.start_date.timestamp_millis() as f64
    }

    /// End instant in milliseconds, falling back to the start.
    pub fn end_or_start_ms(&self) -> f64 {
        self.end_date
            .map(|end| end.timestamp_millis() as f64)
            .unwrap_or_else(|| self.start_ms())
    }

    /// True when `[start, end_or_start]` touches the calendar year (UTC).
    pub fn overlaps_year(&self, year: i32) -> bool {
        let (Some(from), Some(to)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year + 1, 1, 1),
        ) else {
            return false;
        };
        let from = from.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() as f64;
        let to = to.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() as f64;
        self.start_ms() < to && self.end_or_start_ms() >= from
    }

    /// True when the milestone touches the inclusive day window.
    pub fn overlaps_days(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        let after_from = from.map_or(true, |from| {
            self.end_or_start_ms() >= from.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() as f64
        });
        let before_to = to.map_or(true, |to| {
            let next = to.succ_opt().unwrap_or(to);
            self.start_ms() < next.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis() as f64
        });
        after_from && before_to
    }

    /// Color as `#RRGGBB`, for exports.
    pub fn color_hex(&self) -> String {
        hex_color::to_hex(self.color)
    }
}

/// A milestone field that could not be parsed from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("invalid ISO-8601 timestamp '{0}'")]
    Timestamp(String),
    #[error("invalid hex color '{0}': expected #RRGGBB")]
    Color(String),
}

/// Serde helper for ISO-8601 instants: RFC 3339 or a bare `YYYY-MM-DD`
/// (read as midnight UTC).
pub mod iso_instant {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::FieldError;

    pub fn parse(s: &str) -> Result<DateTime<Utc>, FieldError> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(naive.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
        }
        Err(FieldError::Timestamp(s.to_string()))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) if !s.trim().is_empty() => {
                    super::parse(&s).map(Some).map_err(serde::de::Error::custom)
                }
                _ => Ok(None),
            }
        }
    }
}

/// Serde helper for `Color32` stored as a `#RRGGBB` string.
pub mod hex_color {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::FieldError;

    pub fn to_hex(color: Color32) -> String {
        let [r, g, b, _] = color.to_array();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_hex(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Ok(super::DEFAULT_MILESTONE_COLOR);
        }
        parse_hex_color(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_hex_color(s: &str) -> Result<Color32, FieldError> {
        let invalid = || FieldError::Color(s.trim().to_string());
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).map_err(|_| invalid());
        Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}
