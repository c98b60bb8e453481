//! Statistics aggregation engine.
//!
//! Pure, synchronous folds over pick and follow collections. Nothing in this
//! module touches the database or the clock; handlers load records through
//! the repository and hand them to these functions on every request.

pub mod aggregate;
pub mod distribution;
pub mod profit;
pub mod traceability;

pub use aggregate::{aggregate, aggregate_follows, WagerStats};
pub use distribution::{
    bin, category_distribution, follow_odds_distribution, follow_stake_distribution, odds_buckets,
    odds_distribution, pick_kind_distribution, sport_distribution, stake_buckets,
    stake_distribution, BinCount, BucketSpec,
};
pub use profit::{follow_profit, pick_profit, profit};
pub use traceability::{compare, TraceabilityStats};
