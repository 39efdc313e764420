//! Fetch/advance/reverse/time-adjust protocol against the remote live pointer.
//!
//! Every mutating action fetches the current pointer, derives the target from
//! the agenda and writes it back. Advance and reverse translate the target
//! item's sortkey into a position id right before the write, so the write
//! addresses the item that was the neighbour at fetch time.

use tracing::{debug, info};

use crate::{
    core::{Agenda, LivePosition},
    error::ControlError,
    remote::{RemoteService, records::LivePositionRecord},
    types::{EventId, Sortkey},
};

/// Result of a mutating action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    /// A write was issued; the position is the one written.
    Written(LivePosition<'a>),
    /// Nothing to do; the position is the one fetched.
    Unchanged(LivePosition<'a>),
}

impl<'a> Step<'a> {
    pub fn position(&self) -> LivePosition<'a> {
        match *self {
            Self::Written(position) | Self::Unchanged(position) => position,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Drives the live pointer of one remote service.
#[derive(Debug)]
pub struct LivePositionController<'r, R: ?Sized> {
    remote: &'r R,
}

impl<'r, R> LivePositionController<'r, R>
where
    R: RemoteService + ?Sized,
{
    pub fn new(remote: &'r R) -> Self {
        Self { remote }
    }

    /// Reads the remote pointer and binds it to `agenda`.
    pub async fn fetch<'a>(&self, event_id: EventId, agenda: &'a Agenda) -> Result<LivePosition<'a>, ControlError> {
        let record = self.remote.live_position(event_id, agenda.id()).await?;
        Ok(LivePosition::from_record(agenda, record))
    }

    /// Moves to the next item; a no-op on or past the end sentinel.
    pub async fn advance<'a>(&self, event_id: EventId, agenda: &'a Agenda) -> Result<Step<'a>, ControlError> {
        info!(event_id, "advancing live agenda position");
        let current = self.fetch(event_id, agenda).await?;
        let Some(next) = current.next_item() else {
            debug!(position_id = current.position_id(), "already at or past the end");
            return Ok(Step::Unchanged(current));
        };
        self.jump_to(event_id, agenda, next.sortkey()).await
    }

    /// Moves to the previous item; a no-op on the start sentinel and when
    /// the pointer sits more than one past the end sentinel.
    pub async fn reverse<'a>(&self, event_id: EventId, agenda: &'a Agenda) -> Result<Step<'a>, ControlError> {
        info!(event_id, "reversing live agenda position");
        let current = self.fetch(event_id, agenda).await?;
        let Some(previous) = current.previous_item() else {
            debug!(position_id = current.position_id(), "no previous item");
            return Ok(Step::Unchanged(current));
        };
        self.jump_to(event_id, agenda, previous.sortkey()).await
    }

    /// Adds `seconds` to the live item's time. Negative values reduce it.
    pub async fn add_time<'a>(
        &self,
        event_id: EventId,
        agenda: &'a Agenda,
        seconds: i64,
    ) -> Result<Step<'a>, ControlError> {
        info!(event_id, seconds, "adjusting current live agenda item time");
        let current = self.fetch(event_id, agenda).await?;
        let record = LivePositionRecord {
            position_id: current.position_id(),
            extra_seconds: current.extra_seconds().saturating_add(seconds),
        };
        self.write(event_id, agenda, record).await
    }

    /// Takes `seconds` from the live item's time; the result may go negative.
    pub async fn reduce_time<'a>(
        &self,
        event_id: EventId,
        agenda: &'a Agenda,
        seconds: i64,
    ) -> Result<Step<'a>, ControlError> {
        self.add_time(event_id, agenda, seconds.saturating_neg()).await
    }

    async fn jump_to<'a>(
        &self,
        event_id: EventId,
        agenda: &'a Agenda,
        sortkey: Sortkey,
    ) -> Result<Step<'a>, ControlError> {
        let position_id = agenda
            .position_id_from_sortkey(sortkey)
            .ok_or(ControlError::SortkeyNotFound(sortkey))?;
        let record = LivePositionRecord {
            position_id,
            extra_seconds: 0,
        };
        self.write(event_id, agenda, record).await
    }

    async fn write<'a>(
        &self,
        event_id: EventId,
        agenda: &'a Agenda,
        record: LivePositionRecord,
    ) -> Result<Step<'a>, ControlError> {
        self.remote.write_live_position(event_id, record).await?;
        debug!(
            event_id,
            position_id = record.position_id,
            extra_seconds = record.extra_seconds,
            "live position written"
        );
        Ok(Step::Written(LivePosition::from_record(agenda, record)))
    }
}
