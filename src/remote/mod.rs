//! Remote service seam, wire records and the bundled implementations.

/// HTTP client for the ChurchTools AJAX API.
pub mod churchtools;
/// Deterministic in-process remote for tests and offline runs.
pub mod memory;
/// Wire records and lenient deserializers.
pub mod records;

use std::{future::Future, pin::Pin};

use crate::{
    error::RemoteResult,
    types::{AgendaId, EventId},
};

use records::{AgendaRecord, EventRecord, ItemRecord, LivePositionRecord, SongRecord};

/// Boxed, sendable future returned by [`RemoteService`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations consumed from the service that stores agendas and the live pointer.
pub trait RemoteService: Send + Sync {
    /// Establishes a session. Defaults to a no-op.
    fn connect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async { Ok(()) })
    }

    /// Ends the session. Defaults to a no-op.
    fn disconnect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async { Ok(()) })
    }

    /// All events the service knows about; filtering happens locally.
    fn upcoming_events(&self) -> BoxFuture<'_, RemoteResult<Vec<EventRecord>>>;

    /// Agenda metadata for `event_id`.
    fn agenda_for_event(&self, event_id: EventId) -> BoxFuture<'_, RemoteResult<AgendaRecord>>;

    /// Every item of an agenda, headers included, in no particular order.
    fn agenda_items(&self, agenda_id: AgendaId) -> BoxFuture<'_, RemoteResult<Vec<ItemRecord>>>;

    /// The whole song catalog.
    fn all_songs(&self) -> BoxFuture<'_, RemoteResult<Vec<SongRecord>>>;

    /// Current live pointer of an event's agenda.
    fn live_position(
        &self,
        event_id: EventId,
        agenda_id: AgendaId,
    ) -> BoxFuture<'_, RemoteResult<LivePositionRecord>>;

    /// Replaces the live pointer of an event.
    fn write_live_position(
        &self,
        event_id: EventId,
        position: LivePositionRecord,
    ) -> BoxFuture<'_, RemoteResult<()>>;
}
