//! One reload generation: the selected event and its fully built agenda.

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::{
    core::{Agenda, LivePosition},
    error::ControlError,
    event::{Event, select_next_event},
    item::AgendaItem,
    remote::RemoteService,
    song::SongCatalog,
    variables::VariableSnapshot,
};

/// Event plus agenda, read-only once loaded. A reload replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Session {
    event: Event,
    agenda: Agenda,
}

impl Session {
    pub fn new(event: Event, agenda: Agenda) -> Self {
        Self { event, agenda }
    }

    /// Selects the next event with an agenda and builds that agenda.
    pub async fn load<R>(remote: &R, now: NaiveDateTime) -> Result<Self, ControlError>
    where
        R: RemoteService + ?Sized,
    {
        let events = remote
            .upcoming_events()
            .await?
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                Event::from_record(record)
                    .inspect_err(|e| warn!(event_id = id, "skipping event: {e}"))
                    .ok()
            });
        let event = select_next_event(events, now).ok_or(ControlError::NoUpcomingEvent)?;
        Self::load_for_event(remote, event).await
    }

    /// Builds the agenda of `event`: metadata, items, then song enrichment.
    pub async fn load_for_event<R>(remote: &R, event: Event) -> Result<Self, ControlError>
    where
        R: RemoteService + ?Sized,
    {
        let mut agenda = Agenda::from_record(remote.agenda_for_event(event.id).await?);

        let records = remote.agenda_items(agenda.id()).await?;
        agenda.add_items(records.into_iter().map(AgendaItem::from_record))?;

        let catalog = SongCatalog::from_records(remote.all_songs().await?);
        let linked = agenda.link_songs(&catalog);

        info!(
            event_id = event.id,
            agenda_id = agenda.id(),
            agenda = agenda.name(),
            items = agenda.len(),
            linked_songs = linked,
            "selected event {:?} as next event",
            event.name
        );
        Ok(Self { event, agenda })
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    /// Variable values for `position`, which must come from this session's agenda.
    pub fn variables(&self, position: &LivePosition<'_>) -> VariableSnapshot {
        VariableSnapshot::new(&self.event, position)
    }
}
