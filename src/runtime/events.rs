//! Runtime event stream payloads.

use crate::{
    types::{AgendaId, EventId},
    variables::VariableSnapshot,
};

/// Control-surface action processed by the runtime loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select the next event and rebuild its agenda.
    Reload,
    /// Re-read the live pointer without changing it.
    Refresh,
    /// Go to the next agenda item.
    Advance,
    /// Go to the previous agenda item.
    Reverse,
    /// Add seconds to the live item.
    AddTime(i64),
    /// Take seconds from the live item.
    ReduceTime(i64),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Refresh => "refresh",
            Self::Advance => "advance",
            Self::Reverse => "reverse",
            Self::AddTime(_) => "add_time",
            Self::ReduceTime(_) => "reduce_time",
        }
    }
}

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaEvent {
    /// A new agenda generation replaced the previous one.
    Reloaded {
        /// Selected event.
        event_id: EventId,
        /// Its agenda.
        agenda_id: AgendaId,
        /// Addressable items in the agenda.
        item_count: usize,
    },
    /// The published variables changed.
    PositionChanged(VariableSnapshot),
    /// An action failed; the previous state is still valid.
    ActionFailed {
        /// [`Action::name`] of the failed action.
        action: &'static str,
        /// Rendered error.
        message: String,
    },
}
