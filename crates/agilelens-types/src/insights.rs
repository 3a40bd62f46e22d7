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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::PricePeriod;
use crate::round;

/// Values of one UTC hour, typically two half-hourly records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Top of the hour
    #[serde(rename = "timestamp")]
    pub hour: DateTime<Utc>,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Summed consumption of one UTC hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTotal {
    #[serde(rename = "timestamp")]
    pub hour: DateTime<Utc>,
    #[serde(serialize_with = "round::energy")]
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Prices around "now": current, upcoming and recent past
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceWindow {
    pub current: Option<PricePeriod>,
    /// Ascending by `valid_from`
    pub upcoming: Vec<PricePeriod>,
    pub past_24h: Vec<PricePeriod>,
    /// Up to 5 cheapest upcoming, cheapest first
    pub best_upcoming: Vec<PricePeriod>,
    pub has_negative_upcoming: bool,
}

/// All negative ("plunge") periods in a range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegativePriceReport {
    pub count: usize,
    #[serde(serialize_with = "round::money")]
    pub total_value: f64,
    /// Most negative first
    pub prices: Vec<PricePeriod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationPriority {
    Urgent,
    High,
    Medium,
    Avoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub message: String,
    pub periods: Vec<PricePeriod>,
    pub suggested_uses: Vec<String>,
}

/// When to run high-power appliances in the analysed window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageRecommendations {
    pub total_periods: usize,
    pub cheapest_period: Option<PricePeriod>,
    pub most_expensive_period: Option<PricePeriod>,
    pub recommendations: Vec<Recommendation>,
}
