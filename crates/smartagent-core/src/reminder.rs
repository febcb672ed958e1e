use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::defaults;

/// A due reminder as reported by `GET /reminders/due`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DueReminder {
    pub title: String,
    pub remind_at: RemindAt,
}

/// `remind_at` arrives either as an ISO-8601 string or as epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RemindAt {
    Epoch(f64),
    Text(String),
}

impl DueReminder {
    pub fn new(title: impl Into<String>, remind_at: RemindAt) -> Self {
        Self {
            title: title.into(),
            remind_at,
        }
    }

    pub fn key(&self) -> ReminderKey {
        ReminderKey {
            title: self.title.clone(),
            remind_at: self.remind_at.canonical(),
        }
    }

    /// Notification body in the local timezone: `"<title> at <time>"`.
    pub fn notification_body(&self) -> String {
        self.notification_body_in(&Local)
    }

    pub fn notification_body_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!("{} at {}", self.title, self.remind_at.display_in(tz))
    }
}

impl RemindAt {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Resolve to an instant. Naive date-times are local time, bare dates UTC.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            RemindAt::Epoch(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                DateTime::<Utc>::from_timestamp_millis(*ms as i64)
            }
            RemindAt::Text(s) => parse_timestamp(s.trim()),
        }
    }

    /// Time of day rendered in `tz`, or the raw value if it does not parse.
    pub fn display_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self.to_datetime() {
            Some(dt) => dt
                .with_timezone(tz)
                .format(defaults::REMINDER_TIME_FORMAT)
                .to_string(),
            None => self.to_string(),
        }
    }

    /// Stable form used for de-duplication.
    pub fn canonical(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.to_rfc3339(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for RemindAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemindAt::Epoch(ms) => write!(f, "{ms}"),
            RemindAt::Text(s) => f.write_str(s),
        }
    }
}

/// Read a timestamp string the way a browser `Date` does: explicit offsets
/// win, a bare date is UTC midnight, a date-time without offset is local.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Minute precision with an offset: `18:00Z`, `18:00+05:30`.
    if let Some(naive) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M") {
            return Some(dt.and_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()?;

    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Identity of a delivered reminder within one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub title: String,
    pub remind_at: String,
}
