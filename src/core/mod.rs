//! Agenda position model: sortkey/position translation and live pointer lookups.

/// Ordered agenda and the sortkey/position translation.
pub mod agenda;
/// Live pointer snapshot and neighbour lookups.
pub mod position;

pub use agenda::Agenda;
pub use position::LivePosition;
