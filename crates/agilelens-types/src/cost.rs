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

//! Cost reconstruction and tariff comparison records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::round;

fn default_flat_rate() -> f64 {
    24.50
}

fn default_fixed_standing_charge() -> f64 {
    53.35
}

fn default_agile_standing_charge() -> f64 {
    48.79
}

/// Rates the variable tariff is compared against (all pence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffComparison {
    /// Flat unit rate (p/kWh), typical standard variable tariff
    #[serde(default = "default_flat_rate")]
    pub flat_rate_pence: f64,

    /// Daily standing charge on the flat tariff (p/day)
    #[serde(default = "default_fixed_standing_charge")]
    pub fixed_standing_charge_pence: f64,

    /// Daily standing charge on the Agile tariff (p/day)
    #[serde(default = "default_agile_standing_charge")]
    pub agile_standing_charge_pence: f64,
}

impl Default for TariffComparison {
    fn default() -> Self {
        Self {
            flat_rate_pence: default_flat_rate(),
            fixed_standing_charge_pence: default_fixed_standing_charge(),
            agile_standing_charge_pence: default_agile_standing_charge(),
        }
    }
}

impl TariffComparison {
    #[must_use]
    pub fn with_flat_rate(self, flat_rate_pence: f64) -> Self {
        Self {
            flat_rate_pence,
            ..self
        }
    }
}

/// Cost of one consumption interval that matched a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCost {
    pub interval_start: DateTime<Utc>,
    pub interval_end: DateTime<Utc>,
    #[serde(serialize_with = "round::energy")]
    pub consumption_kwh: f64,
    pub price_pence: f64,
    #[serde(serialize_with = "round::money")]
    pub cost_pence: f64,
}

/// Flat vs Agile for a single day, standing charges included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyComparison {
    pub date: NaiveDate,
    #[serde(serialize_with = "round::energy")]
    pub kwh: f64,
    #[serde(serialize_with = "round::money")]
    pub fixed_unit_cost: f64,
    #[serde(serialize_with = "round::money")]
    pub agile_unit_cost: f64,
    #[serde(serialize_with = "round::money")]
    pub fixed_day_total: f64,
    #[serde(serialize_with = "round::money")]
    pub agile_day_total: f64,
    /// Positive when Agile was cheaper
    #[serde(serialize_with = "round::money")]
    pub savings: f64,
    pub agile_cheaper: bool,
}

/// How much of the consumption series found a matching price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchCoverage {
    pub matched_intervals: usize,
    pub unmatched_intervals: usize,
    /// matched / total, 0 when there is no consumption
    #[serde(serialize_with = "round::energy")]
    pub coverage_ratio: f64,
    pub first_unmatched: Option<DateTime<Utc>>,
}

impl MatchCoverage {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched_intervals == 0
    }
}

/// Realized cost of metered consumption at Agile prices
///
/// `total_kwh` counts every interval; cost fields only count intervals with a
/// matching price, so `total_kwh` may exceed the kWh in `cost_by_period`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    #[serde(serialize_with = "round::money")]
    pub total_cost_pence: f64,
    #[serde(serialize_with = "round::money")]
    pub total_cost_pounds: f64,
    #[serde(serialize_with = "round::energy")]
    pub total_kwh: f64,
    #[serde(serialize_with = "round::money")]
    pub weighted_average_price: f64,
    /// Unit cost only, standing charges excluded
    #[serde(serialize_with = "round::money")]
    pub savings_vs_flat_rate: f64,

    pub flat_rate_pence: f64,
    pub fixed_standing_charge_pence: f64,
    pub agile_standing_charge_pence: f64,

    pub days_in_period: usize,
    #[serde(serialize_with = "round::money")]
    pub fixed_total_pence: f64,
    #[serde(serialize_with = "round::money")]
    pub fixed_total_pounds: f64,
    #[serde(serialize_with = "round::money")]
    pub agile_total_pence: f64,
    #[serde(serialize_with = "round::money")]
    pub agile_total_pounds: f64,
    /// fixed_total - agile_total, standing charges included
    #[serde(serialize_with = "round::money")]
    pub total_savings_pence: f64,
    #[serde(serialize_with = "round::money")]
    pub total_savings_pounds: f64,
    pub agile_cheaper: bool,

    pub daily_comparison: Vec<DailyComparison>,
    pub cost_by_period: Vec<PeriodCost>,
    pub cheapest_hours: Vec<PeriodCost>,
    pub most_expensive_hours: Vec<PeriodCost>,
    pub coverage: MatchCoverage,
}

impl CostAnalysis {
    /// Zero-valued analysis that still echoes the comparison rates
    #[must_use]
    pub fn empty(tariff: &TariffComparison) -> Self {
        Self {
            flat_rate_pence: tariff.flat_rate_pence,
            fixed_standing_charge_pence: tariff.fixed_standing_charge_pence,
            agile_standing_charge_pence: tariff.agile_standing_charge_pence,
            ..Self::default()
        }
    }
}
