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

use agilelens_types::{AgileProduct, ConsumptionInterval, PricePeriod};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::Result;

/// Where raw half-hourly series come from
///
/// Implementations return records validated and sorted oldest first. They
/// own their network or disk access, including any timeout policy.
#[async_trait]
pub trait SeriesSource: Send + Sync + fmt::Debug {
    /// Distinguishes price series in cache keys, e.g. the full tariff code
    fn price_discriminator(&self) -> String;

    /// Region shown in reports
    fn region(&self) -> String {
        self.price_discriminator()
    }

    /// Product code prices are fetched for, when the source has one
    fn product_code(&self) -> Option<String> {
        None
    }

    /// Distinguishes consumption series in cache keys, e.g. the MPAN
    fn meter_discriminator(&self) -> String;

    async fn fetch_prices(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<PricePeriod>>;

    async fn fetch_consumption(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<ConsumptionInterval>>;

    /// Agile products on offer, newest first
    ///
    /// Sources without a product catalogue list nothing.
    async fn fetch_products(&self) -> Result<Vec<AgileProduct>> {
        Ok(Vec::new())
    }
}
