//! Shared primitive IDs and sentinel constants.

/// Remote agenda item identifier.
pub type ItemId = i64;
/// Sparse ordering key of an agenda item in the remote store.
pub type Sortkey = i64;
/// Dense, user-facing position within an agenda.
///
/// `0` is the "not started" sentinel and `last + 1` is the "ended" sentinel.
pub type PositionId = u32;
/// Song arrangement identifier.
pub type ArrangementId = i64;
/// Song identifier.
pub type SongId = i64;
/// Remote agenda identifier.
pub type AgendaId = i64;
/// Remote event identifier.
pub type EventId = i64;

/// Sortkey reserved for the virtual start item.
pub const START_SORTKEY: Sortkey = -1;
/// Sortkey reserved for the virtual end item.
pub const END_SORTKEY: Sortkey = -2;
/// Item id reserved for the virtual start item.
pub const START_ITEM_ID: ItemId = -1;
/// Item id reserved for the virtual end item.
pub const END_ITEM_ID: ItemId = -2;
/// Position of the virtual start item.
pub const START_POSITION: PositionId = 0;

/// Returns true when `sortkey` is one of the two sentinel values.
pub fn is_sentinel_sortkey(sortkey: Sortkey) -> bool {
    sortkey == START_SORTKEY || sortkey == END_SORTKEY
}
