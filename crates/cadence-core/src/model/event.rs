use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::rule::RecurrenceRule;

/// Lifecycle state of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Confirmed,
    Completed,
    Postponed,
    Cancelled,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Postponed => "postponed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted event record.
///
/// Exactly one of the following holds for any record: `is_template` is
/// true (series template), `parent_event_id` is set (generated
/// occurrence), or neither (standalone event). `recurrence_rule` is
/// present iff `is_template` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: uuid::Uuid,
    pub parent_event_id: Option<uuid::Uuid>,
    pub is_template: bool,
    pub is_override: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub status: EventStatus,
}

impl Event {
    /// A preserved occurrence survives resynchronization of its parent
    /// template untouched: it was either completed or individually
    /// edited after generation.
    #[must_use]
    pub fn is_preserved(&self) -> bool {
        self.status == EventStatus::Completed || self.is_override
    }
}

/// Insert struct for creating new event records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub parent_event_id: Option<uuid::Uuid>,
    pub is_template: bool,
    pub is_override: bool,
    pub recurrence_rule: Option<RecurrenceRule>,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub status: EventStatus,
}

impl NewEvent {
    /// ## Summary
    /// Materializes one generated occurrence of `template` on `date`.
    ///
    /// Descriptive fields are copied from the template, the day-span of
    /// a multi-day template is kept, and the occurrence starts life as
    /// `Pending` with no override mark.
    #[must_use]
    pub fn occurrence_of(template: &Event, date: NaiveDate) -> Self {
        let span = template.end_date.signed_duration_since(template.start_date);
        Self {
            parent_event_id: Some(template.id),
            is_template: false,
            is_override: false,
            recurrence_rule: None,
            title: template.title.clone(),
            description: template.description.clone(),
            venue: template.venue.clone(),
            start_date: date,
            end_date: date + span,
            start_time: template.start_time,
            end_time: template.end_time,
            all_day: template.all_day,
            status: EventStatus::Pending,
        }
    }
}

/// User-editable fields of an event as submitted by a caller.
///
/// Relationship fields (`is_template`, `parent_event_id`,
/// `is_override`, `recurrence_rule`) are never taken from a draft;
/// the save workflow derives them from the draft's prior relationship
/// and the submitted rule. `id` is `None` for not-yet-persisted
/// records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub all_day: bool,
    pub status: EventStatus,
}

impl EventDraft {
    /// Shapes the draft as a plain standalone record.
    #[must_use]
    pub fn into_standalone(self) -> NewEvent {
        self.into_shape(None, false, false, None)
    }

    /// Shapes the draft as a series template carrying `rule`.
    #[must_use]
    pub fn into_template(self, rule: RecurrenceRule) -> NewEvent {
        self.into_shape(None, true, false, Some(rule))
    }

    /// Shapes the draft as an individually edited occurrence of
    /// `parent_id`. The override mark is forced on so the occurrence is
    /// exempt from any future regeneration of its series.
    #[must_use]
    pub fn into_override(self, parent_id: uuid::Uuid) -> NewEvent {
        self.into_shape(Some(parent_id), false, true, None)
    }

    fn into_shape(
        self,
        parent_event_id: Option<uuid::Uuid>,
        is_template: bool,
        is_override: bool,
        recurrence_rule: Option<RecurrenceRule>,
    ) -> NewEvent {
        NewEvent {
            parent_event_id,
            is_template,
            is_override,
            recurrence_rule,
            title: self.title,
            description: self.description,
            venue: self.venue,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            status: self.status,
        }
    }
}
