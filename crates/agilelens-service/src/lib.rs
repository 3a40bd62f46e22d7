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

//! Configuration, upstream sources and the cache-aside insight service

pub mod config;
pub mod error;
pub mod file_source;
pub mod octopus;
pub mod report;
pub mod service;
pub mod source;

pub use config::{AppConfig, MeterCredentials, OctopusConfig, SystemConfig};
pub use error::{Result, ServiceError, UpstreamError};
pub use file_source::FileSource;
pub use octopus::OctopusClient;
pub use report::{
    CostReport, Dashboard, DailyConsumption, NegativePrices, PeriodSummary, ProductCatalog,
    RecommendationReport, TodayConsumption, TodayStatistics,
};
pub use service::InsightService;
pub use source::SeriesSource;
