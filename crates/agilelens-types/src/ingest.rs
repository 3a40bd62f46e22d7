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

//! Ingestion boundary for raw series.
//!
//! Accepts either the upstream paginated envelope (`{"results": [...]}`) or a
//! bare JSON array. Every record is validated and the series is returned
//! oldest first.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::consumption::ConsumptionInterval;
use crate::error::Result;
use crate::pricing::PricePeriod;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { results: Vec<T> },
    Bare(Vec<T>),
}

pub(crate) fn records<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let payload: Payload<T> = serde_json::from_str(json)?;
    Ok(match payload {
        Payload::Envelope { results } => results,
        Payload::Bare(items) => items,
    })
}

/// Parse, validate and sort a price series
pub fn parse_prices(json: &str) -> Result<Vec<PricePeriod>> {
    let mut prices: Vec<PricePeriod> = records(json)?;
    for period in &prices {
        period.validate()?;
    }
    prices.sort_by_key(|p| p.valid_from);
    Ok(prices)
}

/// Parse, validate and sort a consumption series
pub fn parse_consumption(json: &str) -> Result<Vec<ConsumptionInterval>> {
    let mut consumption: Vec<ConsumptionInterval> = records(json)?;
    for interval in &consumption {
        interval.validate()?;
    }
    consumption.sort_by_key(|c| c.interval_start);
    Ok(consumption)
}
