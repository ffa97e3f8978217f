//! Booking lifecycle engine for an item-sharing service.
//!
//! Users list items; other users request time-bounded bookings on them;
//! owners approve or reject. The engine owns the lifecycle rules, the
//! time-relative classification (current/past/future), and the read views
//! that merge bookings, items, and users. Storage and user/item CRUD live
//! behind the collaborator traits in [`engine::store`].

pub mod engine;
pub mod model;
pub mod observability;

pub use engine::{Engine, EngineError};
