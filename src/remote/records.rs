//! Wire records exchanged with the remote service.
//!
//! The legacy ChurchTools AJAX API encodes most integers as strings, uses
//! `"0"`/`"1"` flags and returns PHP-style collections that are either JSON
//! objects keyed by id or plain arrays. The deserializers here accept all of
//! those shapes and pass the values through unchanged otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{AgendaId, ArrangementId, EventId, ItemId, PositionId, SongId, Sortkey};

/// One agenda item as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Remote item id.
    #[serde(deserialize_with = "de::int")]
    pub id: ItemId,
    /// Sparse ordering key.
    #[serde(deserialize_with = "de::int")]
    pub sortkey: Sortkey,
    /// Organizational header flag (`header_yn`).
    #[serde(rename = "header_yn", default, deserialize_with = "de::flag")]
    pub is_header: bool,
    /// Item title (`bezeichnung`).
    #[serde(rename = "bezeichnung", default, deserialize_with = "de::text")]
    pub label: String,
    /// Linked song arrangement, if any.
    #[serde(default, deserialize_with = "de::opt_int")]
    pub arrangement_id: Option<ArrangementId>,
}

/// Song arrangement as listed inside a [`SongRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementRecord {
    /// Arrangement id.
    #[serde(deserialize_with = "de::int")]
    pub id: ArrangementId,
    /// Arrangement title.
    #[serde(rename = "bezeichnung", default, deserialize_with = "de::text")]
    pub label: String,
}

/// Song with its arrangements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Song id.
    #[serde(deserialize_with = "de::int")]
    pub id: SongId,
    /// Song title.
    #[serde(rename = "bezeichnung", default, deserialize_with = "de::text")]
    pub label: String,
    /// Arrangements keyed by arrangement id on the wire.
    #[serde(rename = "arrangement", default)]
    pub arrangements: Keyed<ArrangementRecord>,
}

/// Event metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event id.
    #[serde(deserialize_with = "de::int")]
    pub id: EventId,
    /// Event title.
    #[serde(rename = "bezeichnung", default, deserialize_with = "de::text")]
    pub label: String,
    /// End date, `%Y-%m-%d %H:%M:%S` local time.
    #[serde(rename = "enddate", default, deserialize_with = "de::text")]
    pub end_date: String,
    /// Inline agenda marker. Null, `false`, `0` and `""` mean no agenda;
    /// anything else, including the string `"0"`, means there is one.
    #[serde(default)]
    pub agenda: Option<Value>,
    /// Linked agenda id.
    #[serde(default, deserialize_with = "de::opt_int")]
    pub agenda_id: Option<AgendaId>,
}

impl EventRecord {
    /// Whether the remote store links an agenda to this event.
    pub fn has_agenda(&self) -> bool {
        let inline = match &self.agenda {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        };
        inline || self.agenda_id.is_some()
    }
}

/// Agenda metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaRecord {
    /// Agenda id.
    #[serde(deserialize_with = "de::int")]
    pub id: AgendaId,
    /// Agenda title.
    #[serde(rename = "bezeichnung", default, deserialize_with = "de::text")]
    pub label: String,
}

/// Remote live pointer: current position plus time adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LivePositionRecord {
    /// Current position id; missing or null means "not started".
    #[serde(rename = "pos_id", default, deserialize_with = "de::position_or_zero")]
    pub position_id: PositionId,
    /// Seconds added to the current item; may be negative.
    #[serde(rename = "addseconds", default, deserialize_with = "de::int_or_zero")]
    pub extra_seconds: i64,
}

/// Collection that arrives either as an id-keyed object or as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keyed<T>(pub Vec<T>);

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Keyed<T> {
    /// Unwraps the collected values.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Keyed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape<T> {
            Map(BTreeMap<String, T>),
            Seq(Vec<T>),
            Null(()),
        }

        Ok(match Shape::<T>::deserialize(deserializer)? {
            Shape::Map(map) => Self(map.into_values().collect()),
            Shape::Seq(seq) => Self(seq),
            Shape::Null(()) => Self(Vec::new()),
        })
    }
}

pub(crate) mod de {
    use serde::{Deserialize, Deserializer, de::Error};

    use crate::types::PositionId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Bool(bool),
        Str(String),
    }

    impl Scalar {
        fn to_int<E: Error>(self) -> Result<Option<i64>, E> {
            match self {
                Self::Int(n) => Ok(Some(n)),
                Self::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(Some(f as i64))
                }
                Self::Float(f) => Err(E::custom(format!("invalid integer {f}"))),
                Self::Bool(b) => Ok(Some(i64::from(b))),
                Self::Str(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        return Ok(None);
                    }
                    s.parse::<i64>()
                        .map(Some)
                        .map_err(|e| E::custom(format!("invalid integer {s:?}: {e}")))
                }
            }
        }
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Scalar::deserialize(d)?
            .to_int()?
            .ok_or_else(|| D::Error::custom("expected an integer, found an empty string"))
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Option::<Scalar>::deserialize(d)? {
            Some(v) => v.to_int(),
            None => Ok(None),
        }
    }

    pub fn int_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(opt_int(d)?.unwrap_or(0))
    }

    pub fn position_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<PositionId, D::Error> {
        let raw = int_or_zero(d)?;
        PositionId::try_from(raw)
            .map_err(|_| D::Error::custom(format!("position id out of range: {raw}")))
    }

    /// Only `1` (or `"1"`, or `true`) is set.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(opt_int(d)? == Some(1))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
    }
}
