pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod stats;

pub use config::Config;
pub use db::{init_db, NewFollow, NewPick, Repository};
pub use domain::{
    BetResult, Decimal, Follow, FollowId, Odds, Pick, PickId, PickKind, Stake, Tipster, TipsterId,
    UserId,
};
pub use error::AppError;
