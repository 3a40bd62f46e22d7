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

//! AgileLens shared types
//!
//! Value types for the two half-hourly input series (unit prices and metered
//! consumption) plus every derived record the analytics layer produces.
//! Derived records keep full precision internally and round only when they
//! are serialized.

pub mod consumption;
pub mod cost;
pub mod error;
pub mod ingest;
pub mod insights;
pub mod pricing;
pub mod products;
pub mod round;
pub mod statistics;

pub use consumption::ConsumptionInterval;
pub use cost::{CostAnalysis, DailyComparison, MatchCoverage, PeriodCost, TariffComparison};
pub use error::IngestError;
pub use ingest::{parse_consumption, parse_prices};
pub use insights::{
    HourlyBucket, HourlyTotal, NegativePriceReport, PriceWindow, Recommendation,
    RecommendationPriority, UsageRecommendations,
};
pub use pricing::{PricePeriod, minute_key};
pub use products::{AgileProduct, parse_agile_products};
pub use statistics::{ConsumptionStatistics, DailyKwh, PriceStatistics};
