//! Profit of a single resolved bet.

use crate::domain::{BetResult, Decimal, Follow, Odds, Pick, Stake};

/// Monetary outcome of one bet, in stake units.
///
/// Won pays `(odds - 1) * stake`, Lost costs the stake, Void and Pending
/// contribute nothing. Total for all inputs; exhaustive over the result enum.
pub fn profit(odds: Odds, stake: Stake, result: BetResult) -> Decimal {
    profit_unchecked(odds.value(), stake.value(), result)
}

/// Same formula over raw decimals, for folds that already hold validated
/// terms.
pub(crate) fn profit_unchecked(odds: Decimal, stake: Decimal, result: BetResult) -> Decimal {
    match result {
        BetResult::Won => (odds - Decimal::one()) * stake,
        BetResult::Lost => -stake,
        BetResult::Void | BetResult::Pending => Decimal::zero(),
    }
}

/// Profit of a pick under the tipster's published terms.
pub fn pick_profit(pick: &Pick) -> Decimal {
    profit(pick.odds, pick.stake, pick.result)
}

/// Profit of the user's own bet, from the follow's terms.
///
/// Always derived from the follow's fields; there is no cached profit column
/// that could drift from the formula.
pub fn follow_profit(follow: &Follow) -> Decimal {
    profit(follow.odds, follow.stake, follow.result)
}
