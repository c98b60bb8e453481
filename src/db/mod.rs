//! SQLite persistence.
//!
//! - Database initialization, schema and pragma configuration
//! - Owner-scoped repository for tipsters, picks and follows

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{NewFollow, NewPick, Repository, TipsterCascade};
