use std::{borrow::Cow, collections::BTreeMap};

use tracing::debug;

use crate::{
    error::AgendaError,
    item::AgendaItem,
    remote::records::AgendaRecord,
    song::SongCatalog,
    types::{AgendaId, END_SORTKEY, PositionId, START_POSITION, START_SORTKEY, Sortkey, is_sentinel_sortkey},
};

/// Ordered collection of the addressable items of one agenda.
///
/// Items are keyed by their sparse remote sortkey. Position ids are the dense,
/// 1-based ranks of those keys, with `0` and `last + 1` reserved for the
/// virtual start and end items. Ranks are derived from the current key set on
/// every call, so the mapping stays correct while items are still being added.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    id: AgendaId,
    name: String,
    items: BTreeMap<Sortkey, AgendaItem>,
}

impl Agenda {
    pub fn new(id: AgendaId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: BTreeMap::new(),
        }
    }

    pub fn from_record(record: AgendaRecord) -> Self {
        Self::new(record.id, record.label)
    }

    pub fn id(&self) -> AgendaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts `item` by sortkey.
    ///
    /// Headers are dropped silently and a later item with the same sortkey
    /// replaces the earlier one. Sortkeys reserved for the sentinels are
    /// rejected, since the end position would then translate to itself.
    pub fn add_item(&mut self, item: AgendaItem) -> Result<(), AgendaError> {
        if item.is_header() {
            return Ok(());
        }
        if is_sentinel_sortkey(item.sortkey()) {
            return Err(AgendaError::SentinelSortkey {
                item_id: item.id(),
                sortkey: item.sortkey(),
            });
        }

        if let Some(prev) = self.items.insert(item.sortkey(), item) {
            debug!(sortkey = prev.sortkey(), replaced = prev.id(), "agenda item replaced");
        }
        Ok(())
    }

    /// Adds every item, stopping at the first rejected one.
    pub fn add_items<I>(&mut self, items: I) -> Result<(), AgendaError>
    where
        I: IntoIterator<Item = AgendaItem>,
    {
        for item in items {
            self.add_item(item)?;
        }
        Ok(())
    }

    /// Dense position of `sortkey`, or `None` when no such item is stored.
    pub fn position_id_from_sortkey(&self, sortkey: Sortkey) -> Option<PositionId> {
        match sortkey {
            START_SORTKEY => Some(START_POSITION),
            END_SORTKEY => Some(self.end_position_id()),
            _ if self.items.contains_key(&sortkey) => {
                Some(to_position(self.items.range(..sortkey).count() + 1))
            }
            _ => None,
        }
    }

    /// Sortkey at `position_id`; positions past the last item map to the end sentinel.
    pub fn sortkey_from_position_id(&self, position_id: PositionId) -> Sortkey {
        if position_id == START_POSITION {
            return START_SORTKEY;
        }

        let idx = usize::try_from(position_id - 1).unwrap_or(usize::MAX);
        self.items.keys().nth(idx).copied().unwrap_or(END_SORTKEY)
    }

    /// Rank of the item with the greatest sortkey; `0` for an empty agenda.
    ///
    /// Sentinel sortkeys never enter the map, so the greatest key is always a
    /// real item and its rank is the item count.
    pub fn last_position_id(&self) -> PositionId {
        to_position(self.items.len())
    }

    /// Position of the virtual end item.
    pub fn end_position_id(&self) -> PositionId {
        self.last_position_id().saturating_add(1)
    }

    /// Item at `position_id`, including the two sentinels.
    ///
    /// Real items are borrowed; sentinels are built on demand. Positions past
    /// the end sentinel yield `None`.
    pub fn item_at_position(&self, position_id: PositionId) -> Option<Cow<'_, AgendaItem>> {
        let last = self.last_position_id();
        if position_id == START_POSITION {
            Some(Cow::Owned(AgendaItem::start()))
        } else if position_id <= last {
            let sortkey = self.sortkey_from_position_id(position_id);
            self.items.get(&sortkey).map(Cow::Borrowed)
        } else if position_id == last.saturating_add(1) {
            Some(Cow::Owned(AgendaItem::end()))
        } else {
            None
        }
    }

    /// Stored items in sortkey order.
    pub fn items(&self) -> impl Iterator<Item = &AgendaItem> {
        self.items.values()
    }

    pub fn song_items(&self) -> impl Iterator<Item = &AgendaItem> {
        self.items.values().filter(|item| item.is_song())
    }

    /// Enriches song items from `catalog`; returns how many were linked.
    pub fn link_songs(&mut self, catalog: &SongCatalog) -> usize {
        let mut linked = 0;
        for item in self.items.values_mut().filter(|item| item.is_song()) {
            let Some(arrangement_id) = item.arrangement_id() else {
                continue;
            };
            if let Some(arrangement) = catalog.arrangement(arrangement_id)
                && item.link_arrangement(arrangement)
            {
                linked += 1;
            }
        }
        debug!(agenda_id = self.id, linked, "linked song items");
        linked
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn to_position(rank: usize) -> PositionId {
    PositionId::try_from(rank).unwrap_or(PositionId::MAX)
}
