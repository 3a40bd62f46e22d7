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

use agilelens_types::{ConsumptionInterval, ConsumptionStatistics, PricePeriod, PriceStatistics};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::TOP_N;

/// Price statistics over `value_inc_vat`
///
/// Cheapest and most expensive periods come from one stable ascending sort,
/// so ties keep their input order. An empty slice yields the zero value.
#[must_use]
pub fn price_statistics(periods: &[PricePeriod]) -> PriceStatistics {
    if periods.is_empty() {
        return PriceStatistics::default();
    }

    let count = periods.len();
    let mut sum = 0.0;
    let mut minimum = f64::INFINITY;
    let mut maximum = f64::NEG_INFINITY;
    let mut negative_count = 0;
    let mut total_negative_value = 0.0;

    for period in periods {
        let value = period.value_inc_vat;
        sum += value;
        minimum = minimum.min(value);
        maximum = maximum.max(value);
        if period.is_negative() {
            negative_count += 1;
            total_negative_value += value;
        }
    }

    let sorted = sorted_by_price(periods);

    PriceStatistics {
        count,
        average: sum / count as f64,
        minimum,
        maximum,
        negative_count,
        total_negative_value,
        cheapest_periods: sorted.iter().take(TOP_N).cloned().collect(),
        most_expensive_periods: sorted.iter().rev().take(TOP_N).cloned().collect(),
    }
}

/// Stable ascending sort by `value_inc_vat`
///
/// `-0.0` and `0.0` compare equal and keep their input order. Prices are
/// finite once ingested.
pub(crate) fn sorted_by_price(periods: &[PricePeriod]) -> Vec<PricePeriod> {
    let mut sorted = periods.to_vec();
    sorted.sort_by(|a, b| {
        a.value_inc_vat
            .partial_cmp(&b.value_inc_vat)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Totals, peak and per-day breakdown of metered consumption
///
/// The peak is the first interval holding the maximum reading. Days are UTC
/// calendar dates of `interval_start`.
#[must_use]
pub fn consumption_statistics(intervals: &[ConsumptionInterval]) -> ConsumptionStatistics {
    let Some(first) = intervals.first() else {
        return ConsumptionStatistics::default();
    };

    let mut total_kwh = 0.0;
    let mut peak = first;
    let mut daily_breakdown: BTreeMap<_, f64> = BTreeMap::new();

    for interval in intervals {
        total_kwh += interval.consumption_kwh;
        if interval.consumption_kwh > peak.consumption_kwh {
            peak = interval;
        }
        *daily_breakdown.entry(interval.date()).or_default() += interval.consumption_kwh;
    }

    ConsumptionStatistics {
        total_kwh,
        period_count: intervals.len(),
        average_per_period: total_kwh / intervals.len() as f64,
        peak_consumption: peak.consumption_kwh,
        peak_period: Some(peak.clone()),
        daily_breakdown,
    }
}
