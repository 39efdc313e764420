//! Error taxonomy shared by the agenda model, the controller and the runtime.

use thiserror::Error;

use crate::types::{ItemId, PositionId, Sortkey};

/// Errors raised by the remote service seam.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("remote transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success HTTP status.
    #[error("remote returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The response envelope did not report success.
    #[error("remote call {call} failed: {message}")]
    Envelope {
        /// `module/function` that was called.
        call: String,
        /// Message or status reported by the server.
        message: String,
    },
    /// The payload could not be decoded.
    #[error("remote response decode error: {0}")]
    Decode(String),
    /// Login or logout was rejected.
    #[error("remote authentication failed: {0}")]
    Auth(String),
    /// The requested record does not exist remotely.
    #[error("remote record not found: {0}")]
    NotFound(String),
}

/// Internal-consistency failures of the agenda model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgendaError {
    /// A real item carries a sortkey reserved for a sentinel. Accepting it
    /// would make the end position resolve to itself.
    #[error("item {item_id} uses reserved sentinel sortkey {sortkey}")]
    SentinelSortkey {
        /// Offending item.
        item_id: ItemId,
        /// Its sortkey.
        sortkey: Sortkey,
    },
}

/// Failures of a live-position action.
#[derive(Debug, Error)]
pub enum ControlError {
    /// No event and agenda have been loaded yet.
    #[error("no event selected yet; reload first")]
    NotReady,
    /// A position id could not be resolved against the agenda.
    #[error("position {0} is outside the agenda")]
    PositionNotFound(PositionId),
    /// A sortkey taken from the agenda no longer translates to a position.
    #[error("sortkey {0} is not part of the agenda")]
    SortkeyNotFound(Sortkey),
    /// A remote fetch or write failed; local state is unchanged.
    #[error(transparent)]
    RemoteUnavailable(#[from] RemoteError),
    /// The agenda violated one of its invariants.
    #[error(transparent)]
    Agenda(#[from] AgendaError),
    /// Reload found no upcoming event that has an agenda.
    #[error("no upcoming event with an agenda")]
    NoUpcomingEvent,
}

/// Convenience alias for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;
