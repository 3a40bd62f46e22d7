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

//! Cost reconstruction: pair consumption with unit rates and compare tariffs

use agilelens_types::{
    ConsumptionInterval, CostAnalysis, DailyComparison, MatchCoverage, PeriodCost, PricePeriod,
    TariffComparison,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::TOP_N;

#[derive(Debug, Default)]
struct DayTotals {
    kwh: f64,
    fixed_unit_cost: f64,
    agile_unit_cost: f64,
}

/// Price of each period keyed by its minute-truncated UTC start
///
/// A later duplicate start overwrites an earlier one.
fn price_lookup(prices: &[PricePeriod]) -> HashMap<String, f64> {
    prices
        .iter()
        .map(|p| (p.minute_key(), p.value_inc_vat))
        .collect()
}

/// Ranking price: intervals with no positive usage never rank as cheap
fn ranking_price(cost: &PeriodCost) -> f64 {
    if cost.consumption_kwh > 0.0 {
        cost.price_pence
    } else {
        f64::INFINITY
    }
}

fn by_ranking_price(a: &PeriodCost, b: &PeriodCost) -> Ordering {
    ranking_price(a)
        .partial_cmp(&ranking_price(b))
        .unwrap_or(Ordering::Equal)
}

/// Cost of `consumption` at Agile `prices`, compared against a flat tariff
///
/// Intervals without a price at the same minute still count towards
/// `total_kwh` and the flat-tariff cost, but not towards any Agile cost.
/// How many were left out is reported in `coverage`.
#[must_use]
pub fn cost_analysis(
    prices: &[PricePeriod],
    consumption: &[ConsumptionInterval],
    tariff: &TariffComparison,
) -> CostAnalysis {
    if prices.is_empty() || consumption.is_empty() {
        return CostAnalysis::empty(tariff);
    }

    let lookup = price_lookup(prices);
    let flat_rate = tariff.flat_rate_pence;

    let mut total_kwh = 0.0;
    let mut total_cost = 0.0;
    let mut cost_by_period = Vec::with_capacity(consumption.len());
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    let mut coverage = MatchCoverage::default();

    for interval in consumption {
        let kwh = interval.consumption_kwh;
        total_kwh += kwh;

        let day = days.entry(interval.date()).or_default();
        day.kwh += kwh;
        day.fixed_unit_cost += kwh * flat_rate;

        let Some(&price) = lookup.get(&interval.minute_key()) else {
            coverage.unmatched_intervals += 1;
            if coverage.first_unmatched.is_none() {
                coverage.first_unmatched = Some(interval.interval_start);
            }
            continue;
        };

        let cost = kwh * price;
        total_cost += cost;
        day.agile_unit_cost += cost;
        coverage.matched_intervals += 1;
        cost_by_period.push(PeriodCost {
            interval_start: interval.interval_start,
            interval_end: interval.interval_end,
            consumption_kwh: kwh,
            price_pence: price,
            cost_pence: cost,
        });
    }

    coverage.coverage_ratio = coverage.matched_intervals as f64 / consumption.len() as f64;
    if coverage.is_complete() {
        debug!("Matched all {} consumption intervals to prices", consumption.len());
    } else {
        warn!(
            "{} of {} consumption intervals have no matching price (first at {:?}); \
             they are excluded from Agile cost",
            coverage.unmatched_intervals,
            consumption.len(),
            coverage.first_unmatched
        );
    }

    let weighted_average_price = if total_kwh == 0.0 {
        0.0
    } else {
        total_cost / total_kwh
    };

    let days_in_period = days.len();
    let standing_days = days_in_period as f64;
    let fixed_total = total_kwh * flat_rate + standing_days * tariff.fixed_standing_charge_pence;
    let agile_total = total_cost + standing_days * tariff.agile_standing_charge_pence;
    let total_savings = fixed_total - agile_total;

    let daily_comparison = days
        .into_iter()
        .map(|(date, day)| {
            let fixed_day_total = day.fixed_unit_cost + tariff.fixed_standing_charge_pence;
            let agile_day_total = day.agile_unit_cost + tariff.agile_standing_charge_pence;
            let savings = fixed_day_total - agile_day_total;
            DailyComparison {
                date,
                kwh: day.kwh,
                fixed_unit_cost: day.fixed_unit_cost,
                agile_unit_cost: day.agile_unit_cost,
                fixed_day_total,
                agile_day_total,
                savings,
                agile_cheaper: savings > 0.0,
            }
        })
        .collect();

    let mut ranked = cost_by_period.clone();
    ranked.sort_by(by_ranking_price);
    let cheapest_hours = ranked.iter().take(TOP_N).cloned().collect();
    let most_expensive_hours = ranked.iter().rev().take(TOP_N).cloned().collect();

    CostAnalysis {
        total_cost_pence: total_cost,
        total_cost_pounds: total_cost / 100.0,
        total_kwh,
        weighted_average_price,
        savings_vs_flat_rate: total_kwh * flat_rate - total_cost,
        flat_rate_pence: flat_rate,
        fixed_standing_charge_pence: tariff.fixed_standing_charge_pence,
        agile_standing_charge_pence: tariff.agile_standing_charge_pence,
        days_in_period,
        fixed_total_pence: fixed_total,
        fixed_total_pounds: fixed_total / 100.0,
        agile_total_pence: agile_total,
        agile_total_pounds: agile_total / 100.0,
        total_savings_pence: total_savings,
        total_savings_pounds: total_savings / 100.0,
        agile_cheaper: total_savings > 0.0,
        daily_comparison,
        cost_by_period,
        cheapest_hours,
        most_expensive_hours,
        coverage,
    }
}
