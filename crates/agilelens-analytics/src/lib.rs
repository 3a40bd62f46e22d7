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

//! Pure analytics over half-hourly Agile price and consumption series
//!
//! Every function here is total on well-formed input, including empty
//! slices, and never mutates its arguments.

pub mod cost;
pub mod hourly;
pub mod insights;
pub mod periods;
pub mod statistics;
pub mod window;

pub use cost::cost_analysis;
pub use hourly::{aggregate_by_hour, hourly_consumption, hourly_prices};
pub use insights::{negative_price_report, usage_recommendations};
pub use periods::{SummaryPeriod, UnknownSummaryPeriod};
pub use statistics::{consumption_statistics, price_statistics};
pub use window::current_and_upcoming;

/// How many entries the "cheapest" / "most expensive" lists hold
pub const TOP_N: usize = 5;
