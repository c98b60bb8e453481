//! Domain primitives: id newtypes, bet results, pick kinds, odds and stakes.

use crate::domain::{Decimal, DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Owning user id. Every record is scoped to exactly one user.
    UserId
);
string_id!(
    /// Tipster id.
    TipsterId
);
string_id!(
    /// Pick id.
    PickId
);
string_id!(
    /// Follow id.
    FollowId
);

/// Outcome of a pick or a follow.
///
/// A closed enum instead of free-text labels: a typo can no longer fall
/// through to a zero-profit branch unnoticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Won,
    Lost,
    Void,
    Pending,
}

impl BetResult {
    /// True iff the bet has an outcome (anything but Pending).
    pub fn is_resolved(&self) -> bool {
        !matches!(self, BetResult::Pending)
    }

    /// Parse a result label, case-insensitively.
    ///
    /// Accepts the English names and the legacy Spanish labels found in
    /// exported data ("Ganada", "Perdida", "Pendiente").
    ///
    /// # Errors
    /// Returns `DomainError::UnknownResultLabel` for anything else.
    pub fn parse_label(label: &str) -> Result<Self, DomainError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "won" | "ganada" => Ok(BetResult::Won),
            "lost" | "perdida" => Ok(BetResult::Lost),
            "void" => Ok(BetResult::Void),
            "pending" | "pendiente" => Ok(BetResult::Pending),
            _ => Err(DomainError::UnknownResultLabel(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetResult::Won => "won",
            BetResult::Lost => "lost",
            BetResult::Void => "void",
            BetResult::Pending => "pending",
        }
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When the pick was placed relative to the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickKind {
    Pre,
    Live,
    Combined,
}

impl PickKind {
    /// Parse a kind label, case-insensitively ("Combinado" is the legacy
    /// spelling of Combined).
    ///
    /// # Errors
    /// Returns `DomainError::UnknownPickKindLabel` for anything else.
    pub fn parse_label(label: &str) -> Result<Self, DomainError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "pre" => Ok(PickKind::Pre),
            "live" => Ok(PickKind::Live),
            "combined" | "combinado" => Ok(PickKind::Combined),
            _ => Err(DomainError::UnknownPickKindLabel(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PickKind::Pre => "pre",
            PickKind::Live => "live",
            PickKind::Combined => "combined",
        }
    }
}

impl fmt::Display for PickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Smallest stake allowed, in units.
pub const STAKE_MIN: i64 = 1;
/// Largest stake allowed, in units.
pub const STAKE_MAX: i64 = 10;

/// Decimal odds, validated to be greater than 1.0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Odds(Decimal);

impl Odds {
    /// # Errors
    /// Returns `DomainError::OddsOutOfRange` for odds <= 1.0.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value > Decimal::one() {
            Ok(Odds(value))
        } else {
            Err(DomainError::OddsOutOfRange(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Odds {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Odds::new(value)
    }
}

impl From<Odds> for Decimal {
    fn from(odds: Odds) -> Decimal {
        odds.0
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stake in units, validated to lie within [STAKE_MIN, STAKE_MAX].
///
/// Picks use whole units; a user's own follow may record a fractional stake,
/// so the inner value is a decimal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Stake(Decimal);

impl Stake {
    /// # Errors
    /// Returns `DomainError::StakeOutOfRange` for stakes outside the bounds.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value >= Decimal::from_int(STAKE_MIN) && value <= Decimal::from_int(STAKE_MAX) {
            Ok(Stake(value))
        } else {
            Err(DomainError::StakeOutOfRange {
                got: value,
                min: STAKE_MIN,
                max: STAKE_MAX,
            })
        }
    }

    pub fn from_units(units: i64) -> Result<Self, DomainError> {
        Stake::new(Decimal::from_int(units))
    }

    /// True when the stake is a whole number of units. Picks stake whole
    /// units only; a follow may record a fractional stake.
    pub fn is_whole_units(&self) -> bool {
        self.0.inner().fract().is_zero()
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Stake {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Stake::new(value)
    }
}

impl From<Stake> for Decimal {
    fn from(stake: Stake) -> Decimal {
        stake.0
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
