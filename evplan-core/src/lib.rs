//! Client-side state for evplan, a collaborative event planner.
//!
//! This crate holds everything the user interface needs, independent of how
//! it is rendered:
//! - `session` for who is logged in
//! - `backend` and `protocol` for talking to the event service
//! - `view_model` for the organized/invited collections and every operation on them
//! - `search` for the search projection

pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod protocol;
pub mod search;
pub mod session;
pub mod view_model;

#[cfg(test)]
mod testing;

pub use backend::{Backend, HttpBackend};
pub use config::ClientConfig;
pub use error::{EvPlanError, EvPlanResult};
// Re-export all event types at crate root for convenience
pub use event::*;
pub use search::{RoleFilter, SearchProjection, SearchQuery};
pub use session::{IdentityChange, Session, SessionStore};
pub use view_model::{Collection, Confirm, DeleteOutcome, EventViewModel, EventsView, LoadTicket};
