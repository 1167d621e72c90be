//! Synthetic monthly search-interest series for a topic.

use chrono::{Datelike, NaiveDate};

use crate::model::{Query, TrendPoint};
use crate::random::RandomSource;

pub const TREND_MONTHS: usize = 12;
pub const MIN_INTEREST: f64 = 20.0;
pub const MAX_INTEREST: f64 = 100.0;

/// Synthesize a 12-month interest series ending at `anchor`'s month.
///
/// Not a fallback: there is no live trends provider. A random base level
/// (40..70) is combined with a sine oscillation, ±5 noise and a +2/month
/// drift, then clamped to `[20, 100]`. Output differs on every call unless
/// the random source is seeded.
pub fn synthesize(query: &Query, anchor: NaiveDate, rng: &dyn RandomSource) -> Vec<TrendPoint> {
    let base = 40.0 + (rng.next_f64() * 30.0).floor();

    trailing_months(anchor, TREND_MONTHS)
        .into_iter()
        .enumerate()
        .map(|(index, date)| {
            let step = index as f64;
            let variation = (step * 0.5).sin() * 15.0 + rng.next_f64() * 10.0 - 5.0;
            let interest = (base + variation + step * 2.0).clamp(MIN_INTEREST, MAX_INTEREST);

            TrendPoint {
                keyword: query.to_string(),
                interest: interest.round() as u32,
                date,
            }
        })
        .collect()
}

/// `count` month labels, oldest first, the last being `anchor`'s month.
fn trailing_months(anchor: NaiveDate, count: usize) -> Vec<String> {
    let anchor_index = anchor.year() * 12 + anchor.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = anchor_index - back;
            format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ConstantRandom, SeededRandom, ThreadRandom};

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
    }

    #[test]
    fn always_twelve_points_in_bounds() {
        let query = Query::parse("solid state batteries").unwrap();
        for _ in 0..200 {
            let series = synthesize(&query, anchor(), &ThreadRandom);
            assert_eq!(series.len(), TREND_MONTHS);
            assert!(series.iter().all(|p| (20..=100).contains(&p.interest)));
            assert!(series.iter().all(|p| p.keyword == "solid state batteries"));
        }
    }

    #[test]
    fn months_cross_year_boundary() {
        let labels = trailing_months(anchor(), TREND_MONTHS);
        assert_eq!(labels.first().map(String::as_str), Some("2023-02"));
        assert_eq!(labels.last().map(String::as_str), Some("2024-01"));
    }

    #[test]
    fn edge_randomness_stays_in_bounds() {
        let query = Query::parse("q").unwrap();
        let high = synthesize(&query, anchor(), &ConstantRandom(1.0));
        // base 69, noise +5, sin(0) = 0.
        assert_eq!(high[0].interest, 74);
        assert!(high.iter().all(|p| p.interest <= 100));

        let low = synthesize(&query, anchor(), &ConstantRandom(0.0));
        // base 40, noise -5, sin(0) = 0.
        assert_eq!(low[0].interest, 35);
        assert!(low.iter().all(|p| p.interest >= 20));
    }

    #[test]
    fn seeded_series_repeat() {
        let query = Query::parse("q").unwrap();
        let a = synthesize(&query, anchor(), &SeededRandom::new(42));
        let b = synthesize(&query, anchor(), &SeededRandom::new(42));
        assert_eq!(a, b);
    }
}
