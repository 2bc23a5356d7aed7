//! Event types shared by the repository, the filter and the selection flow.
//!
//! An event is either *global* (fetched from the holiday provider, read-only)
//! or a *user* event (created locally, fully editable). The two kinds live in
//! separate partitions of the repository and never share ids.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar event as stored, merged and rendered.
///
/// Field names match the persisted layout (`isGlobal` is camel-cased on disk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    /// ISO-8601 date (global events) or date-time (user events)
    pub start: String,
    /// Only user events carry an end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default)]
    pub is_global: bool,
}

impl Event {
    /// A provider-sourced event: no end, never editable.
    pub fn global(id: impl Into<String>, title: impl Into<String>, start: impl Into<String>) -> Self {
        Event {
            id: id.into(),
            title: title.into(),
            start: start.into(),
            end: None,
            is_global: true,
        }
    }

    /// A locally owned event built from an already validated draft.
    pub fn user(id: impl Into<String>, draft: &EventDraft) -> Self {
        Event {
            id: id.into(),
            title: draft.title.clone(),
            start: draft.start.clone(),
            end: Some(draft.end.clone()),
            is_global: false,
        }
    }

    /// Overwrite the mutable fields. `id` and `is_global` are left alone.
    pub(crate) fn apply(&mut self, draft: &EventDraft) {
        self.title = draft.title.clone();
        self.start = draft.start.clone();
        self.end = Some(draft.end.clone());
    }

    /// Parsed start, if the stored string is well-formed.
    pub fn start_time(&self) -> Option<EventTime> {
        EventTime::parse(&self.start)
    }

    /// Field values as an editable draft.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            start: self.start.clone(),
            end: self.end.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Candidate field values for creating or editing a user event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start: String,
    pub end: String,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        EventDraft {
            title: title.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    /// Draft pre-filled from a clicked date cell.
    pub fn on_date(date: &str) -> Self {
        EventDraft {
            title: String::new(),
            start: date.to_string(),
            end: date.to_string(),
        }
    }

    /// Check that every field is present and the times are well-formed and ordered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.start.trim().is_empty() {
            return Err(ValidationError::MissingField("start"));
        }
        if self.end.trim().is_empty() {
            return Err(ValidationError::MissingField("end"));
        }

        let start = EventTime::parse(&self.start).ok_or_else(|| ValidationError::InvalidTime {
            field: "start",
            value: self.start.clone(),
        })?;
        let end = EventTime::parse(&self.end).ok_or_else(|| ValidationError::InvalidTime {
            field: "end",
            value: self.end.clone(),
        })?;

        if end < start {
            return Err(ValidationError::EndBeforeStart {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }

        Ok(())
    }
}

/// An ISO-8601 event time as written by the provider or the user.
///
/// No timezone normalization happens here. Offset date-times order by the
/// instant they name; floating dates and date-times have no zone and are
/// read as UTC wall clock for comparison. Equality follows the ordering, so
/// `2024-01-27` equals `2024-01-27T00:00`.
#[derive(Debug, Clone, Copy)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

impl EventTime {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(EventTime::Date(date));
        }

        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(EventTime::DateTime(dt));
            }
        }

        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(EventTime::DateTimeOffset)
    }

    /// Calendar day as written, in the value's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTime(dt) => dt.date(),
            EventTime::DateTimeOffset(dt) => dt.date_naive(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Point in time used for ordering; dates sit at midnight.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(NaiveTime::MIN),
            EventTime::DateTime(dt) => *dt,
            EventTime::DateTimeOffset(dt) => dt.naive_utc(),
        }
    }
}

impl PartialEq for EventTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventTime {}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_only() {
        let t = EventTime::parse("2024-01-26").unwrap();
        assert!(t.is_all_day());
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 1, 26).unwrap());
    }

    #[test]
    fn parses_datetime_local_input() {
        assert!(matches!(
            EventTime::parse("2024-01-27T08:00"),
            Some(EventTime::DateTime(_))
        ));
        assert!(matches!(
            EventTime::parse("2024-01-27T08:00:30"),
            Some(EventTime::DateTime(_))
        ));
    }

    #[test]
    fn parses_provider_offset_datetime() {
        let t = EventTime::parse("2024-03-10T18:30:00+05:30").unwrap();
        assert!(matches!(t, EventTime::DateTimeOffset(_)));
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(EventTime::parse("tomorrow").is_none());
        assert!(EventTime::parse("2024-13-01").is_none());
        assert!(EventTime::parse("").is_none());
    }

    #[test]
    fn date_sorts_before_same_day_datetime() {
        let date = EventTime::parse("2024-01-27").unwrap();
        let morning = EventTime::parse("2024-01-27T08:00").unwrap();
        assert!(date < morning);
    }

    #[test]
    fn offset_times_compare_as_instants() {
        let ist = EventTime::parse("2024-03-10T10:00:00+05:30").unwrap();
        let utc = EventTime::parse("2024-03-10T06:00:00Z").unwrap();
        assert!(ist < utc);

        let same = EventTime::parse("2024-03-10T04:30:00Z").unwrap();
        assert_eq!(ist, same);
        assert_eq!(ist.cmp(&same), Ordering::Equal);
    }

    #[test]
    fn midnight_equals_bare_date() {
        let date = EventTime::parse("2024-01-27").unwrap();
        let midnight = EventTime::parse("2024-01-27T00:00").unwrap();
        assert_eq!(date, midnight);
        assert_eq!(date.cmp(&midnight), Ordering::Equal);
    }

    #[test]
    fn offset_date_stays_in_its_own_offset() {
        let late = EventTime::parse("2024-03-10T23:30:00-05:00").unwrap();
        assert_eq!(late.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn draft_accepts_later_end_in_another_offset() {
        let draft = EventDraft::new("Call", "2024-03-10T10:00:00+05:30", "2024-03-10T06:00:00Z");
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn draft_accepts_end_at_the_same_instant() {
        assert_eq!(EventDraft::new("Launch", "2024-01-27T00:00", "2024-01-27").validate(), Ok(()));
        assert_eq!(
            EventDraft::new("Call", "2024-03-10T10:00:00+05:30", "2024-03-10T04:30:00Z").validate(),
            Ok(())
        );
    }

    #[test]
    fn draft_requires_all_fields() {
        assert_eq!(
            EventDraft::new("", "2024-01-27T08:00", "2024-01-27T09:00").validate(),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            EventDraft::new("Gym", "  ", "2024-01-27T09:00").validate(),
            Err(ValidationError::MissingField("start"))
        );
        assert_eq!(
            EventDraft::new("Gym", "2024-01-27T08:00", "").validate(),
            Err(ValidationError::MissingField("end"))
        );
    }

    #[test]
    fn draft_rejects_unparseable_times() {
        let err = EventDraft::new("Gym", "soon", "2024-01-27T09:00")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTime { field: "start", .. }));
    }

    #[test]
    fn draft_rejects_end_before_start() {
        let err = EventDraft::new("Gym", "2024-01-27T09:00", "2024-01-27T08:00")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    }

    #[test]
    fn date_cell_draft_only_needs_a_title() {
        let mut draft = EventDraft::on_date("2024-01-27");
        assert_eq!(draft.validate(), Err(ValidationError::MissingField("title")));
        draft.title = "Picnic".into();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn global_events_serialize_without_end() {
        let event = Event::global("g1", "Republic Day", "2024-01-26");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"id":"g1","title":"Republic Day","start":"2024-01-26","isGlobal":true}"#
        );
    }

    #[test]
    fn apply_keeps_identity() {
        let mut event = Event::user("u1", &EventDraft::new("Gym", "2024-01-27T08:00", "2024-01-27T09:00"));
        event.apply(&EventDraft::new("Gym Session", "2024-01-27T08:30", "2024-01-27T09:30"));
        assert_eq!(event.id, "u1");
        assert!(!event.is_global);
        assert_eq!(event.title, "Gym Session");
        assert_eq!(event.end.as_deref(), Some("2024-01-27T09:30"));
    }
}
