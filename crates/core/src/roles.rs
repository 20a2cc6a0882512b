//! Well-known role names.
//!
//! Roles live in the `roles` table and are assigned through `user_roles`;
//! these constants must match the seeded role names. Role membership is the
//! single authority for authorization decisions.

/// Full moderation and administration rights.
pub const ROLE_ADMIN: &str = "admin";

/// May create games and submit them for review.
pub const ROLE_DEVELOPER: &str = "developer";

/// Default role: may comment on and evaluate published games.
pub const ROLE_PLAYER: &str = "player";

/// All roles seeded by the initial migration.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_DEVELOPER, ROLE_PLAYER];
