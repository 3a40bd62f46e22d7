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

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::consumption::ConsumptionInterval;
use crate::pricing::PricePeriod;
use crate::round;

/// Aggregate statistics over a list of price periods (inc VAT)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub count: usize,
    #[serde(serialize_with = "round::money")]
    pub average: f64,
    #[serde(serialize_with = "round::money")]
    pub minimum: f64,
    #[serde(serialize_with = "round::money")]
    pub maximum: f64,
    pub negative_count: usize,
    /// Sum over negative periods only, always <= 0
    #[serde(serialize_with = "round::money")]
    pub total_negative_value: f64,
    /// Up to 5, cheapest first
    pub cheapest_periods: Vec<PricePeriod>,
    /// Up to 5, most expensive first
    pub most_expensive_periods: Vec<PricePeriod>,
}

/// Aggregate statistics over metered consumption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionStatistics {
    #[serde(serialize_with = "round::energy")]
    pub total_kwh: f64,
    pub period_count: usize,
    #[serde(serialize_with = "round::energy")]
    pub average_per_period: f64,
    #[serde(serialize_with = "round::energy")]
    pub peak_consumption: f64,
    pub peak_period: Option<ConsumptionInterval>,
    /// kWh per UTC calendar date
    #[serde(serialize_with = "round::energy_by_date")]
    pub daily_breakdown: BTreeMap<NaiveDate, f64>,
}

/// One day of the daily consumption series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyKwh {
    pub date: NaiveDate,
    #[serde(serialize_with = "round::energy")]
    pub kwh: f64,
}

impl ConsumptionStatistics {
    /// Daily breakdown as a list, oldest date first
    #[must_use]
    pub fn daily_series(&self) -> Vec<DailyKwh> {
        self.daily_breakdown
            .iter()
            .map(|(date, kwh)| DailyKwh {
                date: *date,
                kwh: *kwh,
            })
            .collect()
    }
}
