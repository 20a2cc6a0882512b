//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod evaluation_repo;
pub mod event_repo;
pub mod game_repo;
pub mod notification_repo;
pub mod refresh_token_repo;
pub mod role_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use evaluation_repo::EvaluationRepo;
pub use event_repo::EventRepo;
pub use game_repo::GameRepo;
pub use notification_repo::NotificationRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
