//! Roster client
//!
//! Client-side manager for a remote team member collection: searchable and
//! filterable listing, validated create and edit forms, confirmed deletes,
//! and transient notifications, all driven by a single-owner session.

pub mod api;
pub mod config;
pub mod console;
pub mod errors;
pub mod interaction;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod session;
pub mod store;
pub mod sync;
pub mod timer;
pub mod validation;
