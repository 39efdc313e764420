//! Drive a remote presentation agenda from a control surface.
//!
//! The remote service stores agenda items under sparse sortkeys and keeps a
//! live pointer `{pos_id, addseconds}` per event. This crate maps the sortkeys
//! to a dense position sequence framed by two virtual items ("not started" and
//! "ended"), and implements next/previous/time-adjust actions on top of it.
//!
//! # Examples
//!
//! Position translation with [`core::Agenda`]:
//! ```
//! use agendalive::{core::Agenda, item::AgendaItem, remote::records::ItemRecord};
//!
//! let mut agenda = Agenda::new(1, "Sunday service");
//! for (id, sortkey) in [(10, 5), (11, 2), (12, 9)] {
//!     agenda.add_item(AgendaItem::from_record(ItemRecord {
//!         id,
//!         sortkey,
//!         is_header: false,
//!         label: format!("item {id}"),
//!         arrangement_id: None,
//!     })).expect("add");
//! }
//! assert_eq!(agenda.position_id_from_sortkey(5), Some(2));
//! assert_eq!(agenda.sortkey_from_position_id(1), 2);
//! assert_eq!(agenda.last_position_id(), 3);
//! assert!(agenda.item_at_position(4).expect("end").is_sentinel());
//! ```
//!
//! Runtime usage against ChurchTools:
//! ```no_run
//! use std::sync::Arc;
//!
//! use agendalive::{
//!     config::AppConfig,
//!     remote::churchtools::ChurchToolsClient,
//!     runtime::handle::spawn_agendalive,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = AppConfig::load("agendalive.toml").expect("config");
//! let client = ChurchToolsClient::new(&config.connection).expect("client");
//! let handle = spawn_agendalive(Arc::new(client), config.runtime);
//! let vars = handle.advance().await.expect("advance");
//! println!("now: {}", vars.current_item_name);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Configuration file model.
pub mod config;
/// Live-position action protocol.
pub mod controller;
/// Agenda position model.
pub mod core;
/// Error types.
pub mod error;
/// Events and next-event selection.
pub mod event;
/// Agenda item value type.
pub mod item;
/// Tracing setup.
pub mod logging;
/// Remote service seam and implementations.
pub mod remote;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Loaded event plus agenda.
pub mod session;
/// Song catalog index.
pub mod song;
/// Shared primitive types.
pub mod types;
/// Values published to the control surface.
pub mod variables;
