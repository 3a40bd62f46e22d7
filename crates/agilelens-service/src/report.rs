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

//! Records returned by [`crate::InsightService`], ready to serialize

use agilelens_types::{
    AgileProduct, ConsumptionInterval, ConsumptionStatistics, CostAnalysis, DailyKwh,
    NegativePriceReport, PricePeriod, PriceStatistics, UsageRecommendations,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use agilelens_types::round;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub region: String,
    pub period_from: DateTime<Utc>,
    pub period_to: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: CostAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Human label, e.g. "This Week"
    pub period: String,
    pub period_from: DateTime<Utc>,
    pub period_to: DateTime<Utc>,
    pub prices: PriceStatistics,
    pub consumption: ConsumptionStatistics,
    pub cost: CostAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConsumption {
    pub days: u32,
    #[serde(serialize_with = "round::energy")]
    pub total_kwh: f64,
    pub daily: Vec<DailyKwh>,
}

/// Readings since midnight, which may lag a day or two upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayConsumption {
    pub date: NaiveDate,
    pub count: usize,
    pub consumption: Vec<ConsumptionInterval>,
    pub stats: ConsumptionStatistics,
}

/// Agile products on offer next to the configured one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub count: usize,
    pub current_product_code: Option<String>,
    /// Newest Agile product upstream; differs from the configured code once
    /// a new product launches
    pub latest_product_code: Option<String>,
    pub products: Vec<AgileProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativePrices {
    pub days_searched: u32,
    #[serde(flatten)]
    pub report: NegativePriceReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub hours_analyzed: u32,
    #[serde(flatten)]
    pub recommendations: UsageRecommendations,
}

/// Statistics since UTC midnight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayStatistics {
    pub prices: PriceStatistics,
    pub consumption: ConsumptionStatistics,
}

/// Everything the main dashboard shows, from one price and one consumption fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub timestamp: DateTime<Utc>,
    pub region: String,
    pub current_price: Option<PricePeriod>,
    /// Next 12 hours
    pub upcoming_prices: Vec<PricePeriod>,
    pub best_upcoming: Vec<PricePeriod>,
    pub has_negative_upcoming: bool,
    pub prices_48h: Vec<PricePeriod>,
    pub consumption_7d: Vec<ConsumptionInterval>,
    pub today: TodayStatistics,
    pub cost_analysis: CostAnalysis,
}
