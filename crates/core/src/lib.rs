//! PlayScore domain core.
//!
//! Pure domain types, status state machines, and validation helpers shared
//! by the DB and API layers. This crate performs no I/O.

pub mod account_status;
pub mod error;
pub mod game_status;
pub mod moderation;
pub mod rating;
pub mod roles;
pub mod types;
