//! Read-only values published to the control surface.

use serde::Serialize;

use crate::{
    core::LivePosition,
    event::Event,
    item::AgendaItem,
    types::{EventId, PositionId},
};

/// `(variable_id, label)` of every published variable.
pub const VARIABLE_DEFINITIONS: &[(&str, &str)] = &[
    ("selectedEventName", "Selected event name"),
    ("selectedEventId", "Selected event id"),
    ("previousAgendaItemName", "Previous agenda item name"),
    ("currentAgendaItemName", "Current agenda item name"),
    ("nextAgendaItemName", "Next agenda item name"),
    ("currentAgendaItemExtraSeconds", "Current agenda item extra seconds"),
];

/// Owned copy of the live state, safe to send across tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSnapshot {
    pub event_id: EventId,
    pub event_name: String,
    pub position_id: PositionId,
    pub extra_seconds: i64,
    /// Empty when there is nothing before the current item.
    pub previous_item_name: String,
    pub current_item_name: String,
    /// Empty when there is nothing after the current item.
    pub next_item_name: String,
}

impl VariableSnapshot {
    pub fn new(event: &Event, position: &LivePosition<'_>) -> Self {
        Self {
            event_id: event.id,
            event_name: event.name.clone(),
            position_id: position.position_id(),
            extra_seconds: position.extra_seconds(),
            previous_item_name: name_of(position.previous_item().as_deref()),
            current_item_name: name_of(position.current_item().as_deref()),
            next_item_name: name_of(position.next_item().as_deref()),
        }
    }

    /// Values keyed by the ids in [`VARIABLE_DEFINITIONS`], in the same order.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("selectedEventName", self.event_name.clone()),
            ("selectedEventId", self.event_id.to_string()),
            ("previousAgendaItemName", self.previous_item_name.clone()),
            ("currentAgendaItemName", self.current_item_name.clone()),
            ("nextAgendaItemName", self.next_item_name.clone()),
            ("currentAgendaItemExtraSeconds", self.extra_seconds.to_string()),
        ]
    }
}

fn name_of(item: Option<&AgendaItem>) -> String {
    item.map(|item| item.display_name().to_string()).unwrap_or_default()
}
