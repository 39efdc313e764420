use std::borrow::Cow;

use crate::{
    item::AgendaItem,
    remote::records::LivePositionRecord,
    types::{PositionId, START_POSITION},
};

use super::agenda::Agenda;

/// Snapshot of the remote live pointer resolved against one agenda.
///
/// Never mutated; actions produce a new snapshot. The agenda must outlive it.
#[derive(Debug, Clone, Copy)]
pub struct LivePosition<'a> {
    agenda: &'a Agenda,
    position_id: PositionId,
    extra_seconds: i64,
}

impl<'a> LivePosition<'a> {
    pub fn new(agenda: &'a Agenda, position_id: PositionId, extra_seconds: i64) -> Self {
        Self {
            agenda,
            position_id,
            extra_seconds,
        }
    }

    pub fn from_record(agenda: &'a Agenda, record: LivePositionRecord) -> Self {
        Self::new(agenda, record.position_id, record.extra_seconds)
    }

    pub fn agenda(&self) -> &'a Agenda {
        self.agenda
    }

    pub fn position_id(&self) -> PositionId {
        self.position_id
    }

    /// Seconds added to (or, when negative, taken from) the live item.
    pub fn extra_seconds(&self) -> i64 {
        self.extra_seconds
    }

    pub fn current_item(&self) -> Option<Cow<'a, AgendaItem>> {
        self.agenda.item_at_position(self.position_id)
    }

    /// `None` at the start sentinel.
    pub fn previous_item(&self) -> Option<Cow<'a, AgendaItem>> {
        if self.position_id == START_POSITION {
            return None;
        }
        self.agenda.item_at_position(self.position_id - 1)
    }

    /// `None` once the pointer sits on or past the end sentinel.
    pub fn next_item(&self) -> Option<Cow<'a, AgendaItem>> {
        let next = self.position_id.checked_add(1)?;
        self.agenda.item_at_position(next)
    }

    pub fn is_at_start(&self) -> bool {
        self.position_id == START_POSITION
    }

    pub fn is_at_end(&self) -> bool {
        self.position_id >= self.agenda.end_position_id()
    }

    pub fn to_record(&self) -> LivePositionRecord {
        LivePositionRecord {
            position_id: self.position_id,
            extra_seconds: self.extra_seconds,
        }
    }
}

impl PartialEq for LivePosition<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.agenda, other.agenda)
            && self.position_id == other.position_id
            && self.extra_seconds == other.extra_seconds
    }
}
