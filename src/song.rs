//! Song catalog used to enrich song items with display data.

use hashbrown::{HashMap, HashSet};

use crate::{
    remote::records::SongRecord,
    types::{ArrangementId, SongId},
};

/// One arrangement of a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongArrangement {
    /// Arrangement id.
    pub id: ArrangementId,
    /// Arrangement title.
    pub name: String,
    /// Id of the owning song; navigational only.
    pub song_id: SongId,
}

/// A song and the arrangements it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Song id.
    pub id: SongId,
    /// Song title.
    pub name: String,
    /// Owned arrangements.
    pub arrangements: Vec<SongArrangement>,
}

impl Song {
    /// Builds a song from its remote record, linking every arrangement back by id.
    pub fn from_record(record: SongRecord) -> Self {
        let song_id = record.id;
        let arrangements = record
            .arrangements
            .into_vec()
            .into_iter()
            .map(|a| SongArrangement {
                id: a.id,
                name: a.label,
                song_id,
            })
            .collect();

        Self {
            id: song_id,
            name: record.label,
            arrangements,
        }
    }

    /// Ids of all arrangements of this song.
    pub fn arrangement_ids(&self) -> HashSet<ArrangementId> {
        self.arrangements.iter().map(|a| a.id).collect()
    }
}

/// Arrangement lookup result that can navigate back to its song.
#[derive(Debug, Clone, Copy)]
pub struct ArrangementRef<'a> {
    song: &'a Song,
    arrangement: &'a SongArrangement,
}

impl<'a> ArrangementRef<'a> {
    pub fn id(&self) -> ArrangementId {
        self.arrangement.id
    }

    pub fn name(&self) -> &'a str {
        &self.arrangement.name
    }

    pub fn song(&self) -> &'a Song {
        self.song
    }
}

/// Arrangement id index over all known songs, rebuilt on every reload.
#[derive(Debug, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
    by_arrangement: HashMap<ArrangementId, (usize, usize)>,
}

impl SongCatalog {
    /// Indexes `songs` by arrangement id. A later duplicate id replaces an earlier one.
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let mut by_arrangement = HashMap::new();
        for (song_idx, song) in songs.iter().enumerate() {
            for (arr_idx, arrangement) in song.arrangements.iter().enumerate() {
                by_arrangement.insert(arrangement.id, (song_idx, arr_idx));
            }
        }

        Self { songs, by_arrangement }
    }

    pub fn from_records(records: Vec<SongRecord>) -> Self {
        Self::from_songs(records.into_iter().map(Song::from_record).collect())
    }

    pub fn arrangement(&self, id: ArrangementId) -> Option<ArrangementRef<'_>> {
        let (song_idx, arr_idx) = *self.by_arrangement.get(&id)?;
        let song = self.songs.get(song_idx)?;
        let arrangement = song.arrangements.get(arr_idx)?;
        Some(ArrangementRef { song, arrangement })
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Number of indexed arrangements.
    pub fn len(&self) -> usize {
        self.by_arrangement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_arrangement.is_empty()
    }
}
