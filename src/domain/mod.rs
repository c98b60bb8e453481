//! Domain types for the picks tracker.

pub mod decimal;
pub mod follow;
pub mod pick;
pub mod primitives;
pub mod tipster;

pub use decimal::Decimal;
pub use follow::Follow;
pub use pick::Pick;
pub use primitives::{
    BetResult, FollowId, Odds, PickId, PickKind, Stake, TipsterId, UserId,
};
pub use tipster::Tipster;

use thiserror::Error;

/// Validation errors for domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("odds must be greater than 1.0, got {0}")]
    OddsOutOfRange(Decimal),
    #[error("stake must be between {min} and {max}, got {got}")]
    StakeOutOfRange {
        got: Decimal,
        min: i64,
        max: i64,
    },
    #[error("unknown result label: {0}")]
    UnknownResultLabel(String),
    #[error("unknown pick kind label: {0}")]
    UnknownPickKindLabel(String),
}
