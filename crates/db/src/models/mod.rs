//! Row types and DTOs, one module per table group.

pub mod comment;
pub mod evaluation;
pub mod event;
pub mod game;
pub mod notification;
pub mod refresh_token;
pub mod role;
pub mod user;
