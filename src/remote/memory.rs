use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    error::{RemoteError, RemoteResult},
    types::{AgendaId, EventId},
};

use super::{
    BoxFuture, RemoteService,
    records::{AgendaRecord, EventRecord, ItemRecord, LivePositionRecord, SongRecord},
};

#[derive(Debug, Default)]
struct State {
    events: Vec<EventRecord>,
    agendas: HashMap<EventId, AgendaRecord>,
    items: HashMap<AgendaId, Vec<ItemRecord>>,
    songs: Vec<SongRecord>,
    positions: HashMap<EventId, LivePositionRecord>,
    writes: Vec<(EventId, LivePositionRecord)>,
    fail_next: usize,
    fail_named: HashMap<&'static str, usize>,
    connected: bool,
}

/// Remote service kept entirely in memory.
///
/// Every write is recorded so callers can assert on the exact protocol, and
/// failures can be injected for the next `n` calls.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    state: Mutex<State>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an event together with its agenda and item records.
    pub fn with_event(self, event: EventRecord, agenda: AgendaRecord, items: Vec<ItemRecord>) -> Self {
        {
            let mut state = self.lock();
            state.agendas.insert(event.id, agenda.clone());
            state.items.insert(agenda.id, items);
            state.events.push(event);
        }
        self
    }

    pub fn with_songs(self, songs: Vec<SongRecord>) -> Self {
        self.lock().songs = songs;
        self
    }

    /// Moves the live pointer as another client would, without recording a write.
    pub fn set_live_position(&self, event_id: EventId, position: LivePositionRecord) {
        self.lock().positions.insert(event_id, position);
    }

    /// Replaces the stored items of an agenda.
    pub fn set_items(&self, agenda_id: AgendaId, items: Vec<ItemRecord>) {
        self.lock().items.insert(agenda_id, items);
    }

    pub fn live_position_of(&self, event_id: EventId) -> LivePositionRecord {
        self.lock().positions.get(&event_id).copied().unwrap_or_default()
    }

    /// Every write issued so far, oldest first.
    pub fn writes(&self) -> Vec<(EventId, LivePositionRecord)> {
        self.lock().writes.clone()
    }

    /// Makes the next `calls` remote calls fail with a transport error.
    pub fn fail_next_calls(&self, calls: usize) {
        self.lock().fail_next = calls;
    }

    /// Makes the next `calls` calls named `call` (e.g. `"live_position"`) fail.
    pub fn fail_next_calls_to(&self, call: &'static str, calls: usize) {
        self.lock().fail_named.insert(call, calls);
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, call: &'static str) -> RemoteResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(RemoteError::Transport(format!("injected failure in {call}")));
        }
        if let Some(left) = state.fail_named.get_mut(call)
            && *left > 0
        {
            *left -= 1;
            return Err(RemoteError::Transport(format!("injected failure in {call}")));
        }
        debug!(call, "in-memory remote call");
        Ok(state)
    }
}

impl RemoteService for InMemoryRemote {
    fn connect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            self.begin("connect")?.connected = true;
            Ok(())
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            self.begin("disconnect")?.connected = false;
            Ok(())
        })
    }

    fn upcoming_events(&self) -> BoxFuture<'_, RemoteResult<Vec<EventRecord>>> {
        Box::pin(async move { Ok(self.begin("upcoming_events")?.events.clone()) })
    }

    fn agenda_for_event(&self, event_id: EventId) -> BoxFuture<'_, RemoteResult<AgendaRecord>> {
        Box::pin(async move {
            self.begin("agenda_for_event")?
                .agendas
                .get(&event_id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(format!("agenda for event {event_id}")))
        })
    }

    fn agenda_items(&self, agenda_id: AgendaId) -> BoxFuture<'_, RemoteResult<Vec<ItemRecord>>> {
        Box::pin(async move {
            Ok(self
                .begin("agenda_items")?
                .items
                .get(&agenda_id)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn all_songs(&self) -> BoxFuture<'_, RemoteResult<Vec<SongRecord>>> {
        Box::pin(async move { Ok(self.begin("all_songs")?.songs.clone()) })
    }

    fn live_position(
        &self,
        event_id: EventId,
        _agenda_id: AgendaId,
    ) -> BoxFuture<'_, RemoteResult<LivePositionRecord>> {
        Box::pin(async move {
            Ok(self
                .begin("live_position")?
                .positions
                .get(&event_id)
                .copied()
                .unwrap_or_default())
        })
    }

    fn write_live_position(
        &self,
        event_id: EventId,
        position: LivePositionRecord,
    ) -> BoxFuture<'_, RemoteResult<()>> {
        Box::pin(async move {
            let mut state = self.begin("write_live_position")?;
            state.positions.insert(event_id, position);
            state.writes.push((event_id, position));
            Ok(())
        })
    }
}
