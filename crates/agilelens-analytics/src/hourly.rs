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

//! Hourly roll-up of half-hourly series

use agilelens_types::{ConsumptionInterval, HourlyBucket, HourlyTotal, PricePeriod};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::collections::BTreeMap;

#[derive(Debug)]
struct Accumulator {
    sum: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }
}

fn top_of_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::hours(1))
        .unwrap_or(instant)
}

/// Bucket records by the UTC hour of `time_fn`, ascending
///
/// Each bucket carries the average, min, max and count of `value_fn`. Sums
/// are not produced here; callers derive them as `average * count`.
pub fn aggregate_by_hour<T>(
    records: &[T],
    value_fn: impl Fn(&T) -> f64,
    time_fn: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<HourlyBucket> {
    let mut buckets: BTreeMap<DateTime<Utc>, Accumulator> = BTreeMap::new();
    for record in records {
        buckets
            .entry(top_of_hour(time_fn(record)))
            .or_insert_with(Accumulator::new)
            .push(value_fn(record));
    }

    buckets
        .into_iter()
        .map(|(hour, acc)| HourlyBucket {
            hour,
            average: acc.sum / acc.count as f64,
            min: acc.min,
            max: acc.max,
            count: acc.count,
        })
        .collect()
}

/// Hourly average unit rate (inc VAT) keyed by `valid_from`
#[must_use]
pub fn hourly_prices(periods: &[PricePeriod]) -> Vec<HourlyBucket> {
    aggregate_by_hour(periods, |p| p.value_inc_vat, |p| p.valid_from)
}

/// Hourly consumption totals keyed by `interval_start`
#[must_use]
pub fn hourly_consumption(intervals: &[ConsumptionInterval]) -> Vec<HourlyTotal> {
    aggregate_by_hour(intervals, |c| c.consumption_kwh, |c| c.interval_start)
        .into_iter()
        .map(|bucket| HourlyTotal {
            hour: bucket.hour,
            total: bucket.average * bucket.count as f64,
            min: bucket.min,
            max: bucket.max,
            count: bucket.count,
        })
        .collect()
}
