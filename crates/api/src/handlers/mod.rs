//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod evaluations;
pub mod games;
pub mod maintenance;
pub mod notifications;
