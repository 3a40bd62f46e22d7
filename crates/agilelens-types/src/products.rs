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

//! Tariff products listed by the upstream catalogue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ingest::records;

/// Marker the upstream uses in every Agile product code
const AGILE_MARKER: &str = "AGILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgileProduct {
    /// e.g. `AGILE-24-10-01`
    pub code: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_variable: bool,
    #[serde(default)]
    pub is_green: bool,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_to: Option<DateTime<Utc>>,
}

impl AgileProduct {
    #[must_use]
    pub fn is_agile(&self) -> bool {
        self.code.contains(AGILE_MARKER)
    }
}

/// Agile products from a catalogue page, in upstream order
///
/// The upstream lists the newest product first.
pub fn parse_agile_products(json: &str) -> Result<Vec<AgileProduct>> {
    let products: Vec<AgileProduct> = records(json)?;
    Ok(products.into_iter().filter(AgileProduct::is_agile).collect())
}
