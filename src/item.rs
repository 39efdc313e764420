//! Agenda item value type and its sentinel factories.

use crate::{
    remote::records::ItemRecord,
    song::ArrangementRef,
    types::{ArrangementId, END_ITEM_ID, END_SORTKEY, ItemId, START_ITEM_ID, START_SORTKEY, SongId, Sortkey},
};

/// Label shown for the virtual start item.
pub const START_LABEL: &str = "-- Not started yet --";
/// Label shown for the virtual end item.
pub const END_LABEL: &str = "-- End --";

/// Type tag of an agenda entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Virtual "not started yet" position.
    Start,
    /// Virtual "ended" position.
    End,
    /// Organizational header; never addressable.
    Header,
    /// Song linked to an arrangement.
    Song(ArrangementId),
    /// Any other entry.
    Plain,
}

/// Song data attached to a song item after catalog lookup.
///
/// Holds copies of the catalog values; the item does not own the song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedArrangement {
    /// Arrangement id.
    pub arrangement_id: ArrangementId,
    /// Arrangement title.
    pub arrangement_name: String,
    /// Owning song id.
    pub song_id: SongId,
    /// Owning song title.
    pub song_name: String,
}

/// One entry of an agenda, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    id: ItemId,
    sortkey: Sortkey,
    label: String,
    kind: ItemKind,
    arrangement: Option<LinkedArrangement>,
}

impl AgendaItem {
    /// Builds an item from a remote record.
    ///
    /// The header flag takes precedence; a song needs a non-null, non-zero
    /// arrangement id.
    pub fn from_record(record: ItemRecord) -> Self {
        let kind = if record.is_header {
            ItemKind::Header
        } else {
            match record.arrangement_id {
                Some(arrangement_id) if arrangement_id != 0 => ItemKind::Song(arrangement_id),
                _ => ItemKind::Plain,
            }
        };

        Self {
            id: record.id,
            sortkey: record.sortkey,
            label: record.label,
            kind,
            arrangement: None,
        }
    }

    /// The virtual item before the first real one.
    pub fn start() -> Self {
        Self::sentinel(START_ITEM_ID, START_SORTKEY, START_LABEL, ItemKind::Start)
    }

    /// The virtual item after the last real one.
    pub fn end() -> Self {
        Self::sentinel(END_ITEM_ID, END_SORTKEY, END_LABEL, ItemKind::End)
    }

    fn sentinel(id: ItemId, sortkey: Sortkey, label: &str, kind: ItemKind) -> Self {
        Self {
            id,
            sortkey,
            label: label.to_string(),
            kind,
            arrangement: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn sortkey(&self) -> Sortkey {
        self.sortkey
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The item's own title, ignoring any linked song.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name to present: the linked song's title for songs, otherwise the label.
    pub fn display_name(&self) -> &str {
        match (&self.kind, &self.arrangement) {
            (ItemKind::Song(_), Some(linked)) => &linked.song_name,
            _ => &self.label,
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == ItemKind::Header
    }

    pub fn is_song(&self) -> bool {
        matches!(self.kind, ItemKind::Song(_))
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, ItemKind::Start | ItemKind::End)
    }

    pub fn arrangement_id(&self) -> Option<ArrangementId> {
        match self.kind {
            ItemKind::Song(id) => Some(id),
            _ => None,
        }
    }

    pub fn linked_arrangement(&self) -> Option<&LinkedArrangement> {
        self.arrangement.as_ref()
    }

    /// Attaches catalog data to a song item. Returns whether anything was linked.
    ///
    /// Non-song items and arrangements with a different id are ignored;
    /// linking the same arrangement twice leaves the item unchanged.
    pub fn link_arrangement(&mut self, arrangement: ArrangementRef<'_>) -> bool {
        if self.arrangement_id() != Some(arrangement.id()) {
            return false;
        }

        let song = arrangement.song();
        self.arrangement = Some(LinkedArrangement {
            arrangement_id: arrangement.id(),
            arrangement_name: arrangement.name().to_string(),
            song_id: song.id,
            song_name: song.name.clone(),
        });
        true
    }
}
