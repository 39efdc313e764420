//! Events and selection of the event to drive.

use chrono::NaiveDateTime;

use crate::{
    error::RemoteError,
    remote::records::EventRecord,
    types::{AgendaId, EventId},
};

/// Timestamp format of `enddate` in the legacy API.
pub const END_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An event that may carry an agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event id.
    pub id: EventId,
    /// Event title.
    pub name: String,
    /// End time, local to the instance.
    pub end: NaiveDateTime,
    /// Whether an agenda is linked.
    pub has_agenda: bool,
    /// Linked agenda id when the record names it.
    pub agenda_id: Option<AgendaId>,
}

impl Event {
    pub fn from_record(record: EventRecord) -> Result<Self, RemoteError> {
        let end = NaiveDateTime::parse_from_str(record.end_date.trim(), END_DATE_FORMAT).map_err(|e| {
            RemoteError::Decode(format!("event {} enddate {:?}: {e}", record.id, record.end_date))
        })?;
        let has_agenda = record.has_agenda();

        Ok(Self {
            id: record.id,
            name: record.label,
            end,
            has_agenda,
            agenda_id: record.agenda_id,
        })
    }
}

/// The event with an agenda that ends soonest, not before `now`.
pub fn select_next_event<I>(events: I, now: NaiveDateTime) -> Option<Event>
where
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .filter(|event| event.has_agenda && event.end >= now)
        .min_by_key(|event| event.end)
}
