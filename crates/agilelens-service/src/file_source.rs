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

use agilelens_types::{ConsumptionInterval, PricePeriod, parse_consumption, parse_prices};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, ServiceError, UpstreamError};
use crate::source::SeriesSource;

/// Series exported to JSON files, for offline analysis
///
/// Files hold either the upstream `{"results": [...]}` envelope or a bare
/// array. They are re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    prices: PathBuf,
    consumption: Option<PathBuf>,
    label: String,
}

impl FileSource {
    pub fn new(prices: impl Into<PathBuf>) -> Self {
        let prices = prices.into();
        let label = file_label(&prices);
        Self {
            prices,
            consumption: None,
            label,
        }
    }

    #[must_use]
    pub fn with_consumption(mut self, consumption: impl Into<PathBuf>) -> Self {
        self.consumption = Some(consumption.into());
        self
    }
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_owned()
}

async fn read(path: &Path) -> std::result::Result<String, UpstreamError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| UpstreamError::Io {
            path: path.to_owned(),
            source,
        })
}

#[async_trait]
impl SeriesSource for FileSource {
    fn price_discriminator(&self) -> String {
        format!("file-{}", self.label)
    }

    fn meter_discriminator(&self) -> String {
        self.consumption
            .as_deref()
            .map_or_else(|| "file-none".to_owned(), |p| format!("file-{}", file_label(p)))
    }

    /// Periods overlapping `[period_from, period_to)`
    async fn fetch_prices(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<PricePeriod>> {
        let body = read(&self.prices).await?;
        let prices: Vec<PricePeriod> = parse_prices(&body)
            .map_err(UpstreamError::from)?
            .into_iter()
            .filter(|p| p.valid_to > period_from && p.valid_from < period_to)
            .collect();

        info!("Read {} price periods from {}", prices.len(), self.prices.display());
        Ok(prices)
    }

    /// Intervals starting in `[period_from, period_to)`
    async fn fetch_consumption(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<ConsumptionInterval>> {
        let Some(path) = &self.consumption else {
            return Err(ServiceError::Configuration(
                "no consumption file configured".to_owned(),
            ));
        };

        let body = read(path).await?;
        let consumption: Vec<ConsumptionInterval> = parse_consumption(&body)
            .map_err(UpstreamError::from)?
            .into_iter()
            .filter(|c| c.interval_start >= period_from && c.interval_start < period_to)
            .collect();

        info!("Read {} consumption periods from {}", consumption.len(), path.display());
        Ok(consumption)
    }
}
