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

use crate::error::{IngestError, Result};

// ============= Unit Price Periods (Agile) =============

/// A single half-hourly unit price
/// Covers the half-open interval `[valid_from, valid_to)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePeriod {
    /// Start of the period (inclusive)
    pub valid_from: DateTime<Utc>,

    /// End of the period (exclusive)
    pub valid_to: DateTime<Utc>,

    /// Unit rate excluding VAT (pence/kWh), may be negative
    pub value_exc_vat: f64,

    /// Unit rate including VAT (pence/kWh), may be negative
    pub value_inc_vat: f64,
}

impl PricePeriod {
    /// Build a validated price period
    pub fn new(
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
        value_exc_vat: f64,
        value_inc_vat: f64,
    ) -> Result<Self> {
        let period = Self {
            valid_from,
            valid_to,
            value_exc_vat,
            value_inc_vat,
        };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<()> {
        if self.valid_from >= self.valid_to {
            return Err(IngestError::EmptyInterval {
                start: self.valid_from,
                end: self.valid_to,
            });
        }
        if !self.value_exc_vat.is_finite() {
            return Err(IngestError::NonFinite {
                field: "value_exc_vat",
                start: self.valid_from,
            });
        }
        if !self.value_inc_vat.is_finite() {
            return Err(IngestError::NonFinite {
                field: "value_inc_vat",
                start: self.valid_from,
            });
        }
        Ok(())
    }

    /// True if `instant` falls inside `[valid_from, valid_to)`
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.valid_from <= instant && instant < self.valid_to
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value_inc_vat < 0.0
    }

    /// Matching key for cost reconstruction, see [`minute_key`]
    #[must_use]
    pub fn minute_key(&self) -> String {
        minute_key(self.valid_from)
    }
}

/// Timestamp truncated to minute precision: `YYYY-MM-DDTHH:MM` in UTC
///
/// Price periods and consumption intervals are paired on this key, so both
/// series must share alignment for a match.
#[must_use]
pub fn minute_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M").to_string()
}
