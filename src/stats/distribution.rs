//! Bucketing of picks and follows for charting.

use crate::domain::{Decimal, Follow, Pick};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One bucket count, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCount {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BucketRule {
    /// Half-open interval `[min, max)`; `max == None` means unbounded above.
    Range { min: Decimal, max: Option<Decimal> },
    /// Exact value match, for integer stake buckets.
    Exact(Decimal),
}

/// A labelled bucket definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    pub label: String,
    rule: BucketRule,
}

impl BucketSpec {
    pub fn range(label: impl Into<String>, min: Decimal, max: Option<Decimal>) -> Self {
        BucketSpec {
            label: label.into(),
            rule: BucketRule::Range { min, max },
        }
    }

    pub fn exact(label: impl Into<String>, value: Decimal) -> Self {
        BucketSpec {
            label: label.into(),
            rule: BucketRule::Exact(value),
        }
    }

    fn contains(&self, value: Decimal) -> bool {
        match &self.rule {
            BucketRule::Range { min, max } => {
                value >= *min && max.map_or(true, |m| value < m)
            }
            BucketRule::Exact(expected) => value == *expected,
        }
    }
}

/// Count items per bucket, preserving bucket declaration order.
///
/// Empty input yields a zero count for every declared bucket.
pub fn bin<T>(items: &[T], value: impl Fn(&T) -> Decimal, buckets: &[BucketSpec]) -> Vec<BinCount> {
    buckets
        .iter()
        .map(|bucket| BinCount {
            label: bucket.label.clone(),
            count: items.iter().filter(|i| bucket.contains(value(i))).count() as u32,
        })
        .collect()
}

/// Odds ranges used by the odds charts.
pub fn odds_buckets() -> Vec<BucketSpec> {
    let dec = |s: &str| Decimal::from_str_canonical(s).unwrap();
    vec![
        BucketSpec::range("< 1.5", Decimal::zero(), Some(dec("1.5"))),
        BucketSpec::range("1.5 - 2", dec("1.5"), Some(dec("2"))),
        BucketSpec::range("2 - 3", dec("2"), Some(dec("3"))),
        BucketSpec::range("3 - 5", dec("3"), Some(dec("5"))),
        BucketSpec::range("> 5", dec("5"), None),
    ]
}

/// Whole-unit stake buckets, `1u` through `10u`.
pub fn stake_buckets() -> Vec<BucketSpec> {
    (1..=10)
        .map(|units| BucketSpec::exact(format!("{}u", units), Decimal::from_int(units)))
        .collect()
}

pub fn odds_distribution(picks: &[Pick]) -> Vec<BinCount> {
    bin(picks, |p| p.odds.value(), &odds_buckets())
}

pub fn stake_distribution(picks: &[Pick]) -> Vec<BinCount> {
    bin(picks, |p| p.stake.value(), &stake_buckets())
}

pub fn follow_odds_distribution(follows: &[Follow]) -> Vec<BinCount> {
    bin(follows, |f| f.odds.value(), &odds_buckets())
}

pub fn follow_stake_distribution(follows: &[Follow]) -> Vec<BinCount> {
    bin(follows, |f| f.stake.value(), &stake_buckets())
}

/// Count items by a free-form category key, sorted by descending count.
///
/// Ties break on label so repeated runs over the same input produce the same
/// output. Empty input yields an empty vec; there is no fixed bucket list.
pub fn category_distribution<T>(items: &[T], key: impl Fn(&T) -> &str) -> Vec<BinCount> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }

    let mut bins: Vec<BinCount> = counts
        .into_iter()
        .map(|(label, count)| BinCount {
            label: label.to_string(),
            count,
        })
        .collect();
    bins.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    bins
}

pub fn sport_distribution(picks: &[Pick]) -> Vec<BinCount> {
    category_distribution(picks, |p| p.sport.as_str())
}

pub fn pick_kind_distribution(picks: &[Pick]) -> Vec<BinCount> {
    category_distribution(picks, |p| p.kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BetResult, Odds, PickId, PickKind, Stake, TipsterId, UserId};
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn pick(odds: &str, stake: i64, sport: &str, kind: PickKind) -> Pick {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        Pick {
            id: PickId::new("p"),
            user: UserId::new("u1"),
            tipster_id: TipsterId::new("t1"),
            event: "A vs B".to_string(),
            sport: sport.to_string(),
            kind,
            bet_type: "1X2".to_string(),
            bookmaker: "Bet365".to_string(),
            odds: Odds::new(dec(odds)).unwrap(),
            stake: Stake::from_units(stake).unwrap(),
            event_date: date,
            event_time: date.and_hms_opt(20, 0, 0).unwrap().time(),
            placed_at: date.and_hms_opt(20, 0, 0).unwrap(),
            result: BetResult::Pending,
            comments: String::new(),
        }
    }

    #[test]
    fn test_odds_buckets_are_half_open() {
        let picks = vec![
            pick("1.49", 1, "Football", PickKind::Pre),
            pick("1.5", 1, "Football", PickKind::Pre),
            pick("2.0", 1, "Football", PickKind::Pre),
            pick("5.0", 1, "Football", PickKind::Pre),
            pick("12.0", 1, "Football", PickKind::Pre),
        ];
        let bins = odds_distribution(&picks);

        assert_eq!(bins[0], BinCount { label: "< 1.5".to_string(), count: 1 });
        // 1.5 belongs to the second bucket, not the first.
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[3].count, 0);
        assert_eq!(bins[4].count, 2);
    }

    #[test]
    fn test_stake_buckets_count_exact_units() {
        let picks = vec![
            pick("2.0", 3, "Football", PickKind::Pre),
            pick("2.0", 3, "Football", PickKind::Pre),
            pick("2.0", 5, "Football", PickKind::Pre),
            pick("2.0", 5, "Football", PickKind::Pre),
            pick("2.0", 5, "Football", PickKind::Pre),
        ];
        let bins = stake_distribution(&picks);

        for bin in &bins {
            match bin.label.as_str() {
                "3u" => assert_eq!(bin.count, 2),
                "5u" => assert_eq!(bin.count, 3),
                _ => assert_eq!(bin.count, 0, "bucket {} should be empty", bin.label),
            }
        }
        assert_eq!(bins.len(), 10);
    }

    #[test]
    fn test_empty_input_yields_zero_counts() {
        let bins = odds_distribution(&[]);
        assert_eq!(bins.len(), 5);
        assert!(bins.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_bucket_order_is_declaration_order_not_count_order() {
        let picks = vec![
            pick("6.0", 1, "Football", PickKind::Pre),
            pick("6.5", 1, "Football", PickKind::Pre),
            pick("1.2", 1, "Football", PickKind::Pre),
        ];
        let bins = odds_distribution(&picks);
        let labels: Vec<&str> = bins.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["< 1.5", "1.5 - 2", "2 - 3", "3 - 5", "> 5"]);
    }

    #[test]
    fn test_category_distribution_sorts_by_descending_count() {
        let picks = vec![
            pick("2.0", 1, "Tennis", PickKind::Pre),
            pick("2.0", 1, "Football", PickKind::Pre),
            pick("2.0", 1, "Football", PickKind::Pre),
        ];
        let bins = sport_distribution(&picks);
        assert_eq!(bins[0].label, "Football");
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].label, "Tennis");
    }

    #[test]
    fn test_category_distribution_breaks_ties_by_label() {
        let picks = vec![
            pick("2.0", 1, "Tennis", PickKind::Pre),
            pick("2.0", 1, "Football", PickKind::Pre),
        ];
        let bins = sport_distribution(&picks);
        assert_eq!(bins[0].label, "Football");
        assert_eq!(bins[1].label, "Tennis");
    }

    #[test]
    fn test_pick_kind_distribution() {
        let picks = vec![
            pick("2.0", 1, "Football", PickKind::Live),
            pick("2.0", 1, "Football", PickKind::Live),
            pick("2.0", 1, "Football", PickKind::Pre),
        ];
        let bins = pick_kind_distribution(&picks);
        assert_eq!(bins[0], BinCount { label: "live".to_string(), count: 2 });
        assert_eq!(bins[1], BinCount { label: "pre".to_string(), count: 1 });
    }

    #[test]
    fn test_fractional_follow_stake_misses_exact_buckets() {
        use crate::domain::FollowId;
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let follow = Follow {
            id: FollowId::new("f1"),
            user: UserId::new("u1"),
            tipster_id: TipsterId::new("t1"),
            pick_id: PickId::new("p1"),
            bookmaker: "Betfair".to_string(),
            odds: Odds::new(dec("2.0")).unwrap(),
            stake: Stake::new(dec("2.5")).unwrap(),
            bet_type: "1X2".to_string(),
            result: BetResult::Pending,
            is_error: false,
            followed_date: date,
            followed_time: date.and_hms_opt(19, 0, 0).unwrap().time(),
            followed_at: date.and_hms_opt(19, 0, 0).unwrap(),
            comments: String::new(),
        };

        let bins = follow_stake_distribution(&[follow]);
        assert!(bins.iter().all(|b| b.count == 0));
    }
}
