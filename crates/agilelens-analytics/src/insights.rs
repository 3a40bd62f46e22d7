// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of AgileLens.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Negative price reports and appliance scheduling hints

use agilelens_types::{
    NegativePriceReport, PricePeriod, Recommendation, RecommendationPriority, UsageRecommendations,
};

use crate::statistics::sorted_by_price;

/// Below this (p/kWh) a period is "very cheap"
const VERY_CHEAP_BELOW: f64 = 5.0;
/// Below this (p/kWh) a period is still good value
const CHEAP_BELOW: f64 = 15.0;
/// Above this (p/kWh) usage should be deferred
const EXPENSIVE_ABOVE: f64 = 30.0;
/// Periods listed per recommendation, negative prices excepted
const MAX_LISTED: usize = 10;

/// Every negative period, most negative first
#[must_use]
pub fn negative_price_report(periods: &[PricePeriod]) -> NegativePriceReport {
    let negative: Vec<PricePeriod> = periods.iter().filter(|p| p.is_negative()).cloned().collect();
    let prices = sorted_by_price(&negative);

    NegativePriceReport {
        count: prices.len(),
        total_value: prices.iter().map(|p| p.value_inc_vat).sum(),
        prices,
    }
}

fn uses(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Group upcoming periods into usage recommendations
///
/// Bands overlap on purpose: negative periods are also listed as very cheap.
#[must_use]
pub fn usage_recommendations(periods: &[PricePeriod]) -> UsageRecommendations {
    let sorted = sorted_by_price(periods);
    let mut recommendations = Vec::new();

    let negative: Vec<_> = sorted.iter().filter(|p| p.is_negative()).cloned().collect();
    if !negative.is_empty() {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Urgent,
            message: format!(
                "{} periods with NEGATIVE prices! You get paid to use electricity",
                negative.len()
            ),
            periods: negative,
            suggested_uses: uses(&[
                "Charge electric vehicle",
                "Run dishwasher/washing machine",
                "Charge batteries/power banks",
                "Heat water",
            ]),
        });
    }

    let very_cheap: Vec<_> = sorted
        .iter()
        .filter(|p| p.value_inc_vat < VERY_CHEAP_BELOW)
        .collect();
    if !very_cheap.is_empty() {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            message: format!(
                "{} periods under {VERY_CHEAP_BELOW}p/kWh - great time for high-power usage",
                very_cheap.len()
            ),
            periods: very_cheap.into_iter().take(MAX_LISTED).cloned().collect(),
            suggested_uses: uses(&[
                "EV charging",
                "Laundry and drying",
                "Baking/cooking",
                "Running power tools",
            ]),
        });
    }

    let cheap: Vec<_> = sorted
        .iter()
        .filter(|p| (VERY_CHEAP_BELOW..CHEAP_BELOW).contains(&p.value_inc_vat))
        .collect();
    if !cheap.is_empty() {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            message: format!(
                "{} periods between {VERY_CHEAP_BELOW}-{CHEAP_BELOW}p/kWh - good value",
                cheap.len()
            ),
            periods: cheap.into_iter().take(MAX_LISTED).cloned().collect(),
            suggested_uses: uses(&[
                "General appliance use",
                "Computer/gaming sessions",
                "Vacuuming/cleaning",
            ]),
        });
    }

    let mut expensive: Vec<_> = periods
        .iter()
        .filter(|p| p.value_inc_vat > EXPENSIVE_ABOVE)
        .cloned()
        .collect();
    if !expensive.is_empty() {
        let total = expensive.len();
        expensive.sort_by_key(|p| p.valid_from);
        expensive.truncate(MAX_LISTED);
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Avoid,
            message: format!("{total} expensive periods (>{EXPENSIVE_ABOVE}p/kWh) - reduce usage"),
            periods: expensive,
            suggested_uses: uses(&[
                "Delay high-power appliances",
                "Switch off non-essential items",
                "Use battery-stored power if available",
            ]),
        });
    }

    UsageRecommendations {
        total_periods: periods.len(),
        cheapest_period: sorted.first().cloned(),
        most_expensive_period: sorted.last().cloned(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn series(prices: &[f64]) -> Vec<PricePeriod> {
        let start: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 12, 14, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let from = start + TimeDelta::minutes(30 * i as i64);
                PricePeriod::new(from, from + TimeDelta::minutes(30), *v, *v).unwrap()
            })
            .collect()
    }

    fn priorities(recs: &UsageRecommendations) -> Vec<RecommendationPriority> {
        recs.recommendations.iter().map(|r| r.priority).collect()
    }

    #[test]
    fn test_negative_report_most_negative_first() {
        let report = negative_price_report(&series(&[5.0, -1.0, -4.5, 0.0, -2.0]));
        assert_eq!(report.count, 3);
        assert!((report.total_value - -7.5).abs() < 1e-9);
        let values: Vec<f64> = report.prices.iter().map(|p| p.value_inc_vat).collect();
        assert_eq!(values, vec![-4.5, -2.0, -1.0]);
    }

    #[test]
    fn test_all_bands() {
        let recs = usage_recommendations(&series(&[-1.0, 3.0, 10.0, 20.0, 35.0]));
        assert_eq!(
            priorities(&recs),
            vec![
                RecommendationPriority::Urgent,
                RecommendationPriority::High,
                RecommendationPriority::Medium,
                RecommendationPriority::Avoid,
            ]
        );
        // Negative periods are also very cheap
        assert_eq!(recs.recommendations[1].periods.len(), 2);
        assert_eq!(recs.total_periods, 5);
        assert!((recs.cheapest_period.unwrap().value_inc_vat - -1.0).abs() < 1e-9);
        assert!((recs.most_expensive_period.unwrap().value_inc_vat - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_avoid_band_is_chronological_and_capped() {
        let mut prices = vec![40.0; 12];
        prices[0] = 90.0;
        let recs = usage_recommendations(&series(&prices));

        assert_eq!(priorities(&recs), vec![RecommendationPriority::Avoid]);
        let avoid = &recs.recommendations[0];
        assert_eq!(avoid.periods.len(), 10);
        assert!(avoid.message.starts_with("12 expensive periods"));
        assert!(avoid.periods.windows(2).all(|w| w[0].valid_from < w[1].valid_from));
        assert!((avoid.periods[0].value_inc_vat - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_priority_serializes_upper_case() {
        let recs = usage_recommendations(&series(&[-3.0]));
        let json = serde_json::to_value(&recs).unwrap();
        assert_eq!(json["recommendations"][0]["priority"], "URGENT");
    }

    #[test]
    fn test_no_prices_no_recommendations() {
        let recs = usage_recommendations(&[]);
        assert!(recs.recommendations.is_empty());
        assert!(recs.cheapest_period.is_none());
    }
}
