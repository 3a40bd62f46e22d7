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

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::pricing::minute_key;

/// A single half-hourly smart meter reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionInterval {
    /// Start of the interval (inclusive)
    pub interval_start: DateTime<Utc>,

    /// End of the interval (exclusive)
    pub interval_end: DateTime<Utc>,

    /// Energy used in the interval (kWh)
    /// Upstream calls this field `consumption`
    #[serde(alias = "consumption")]
    pub consumption_kwh: f64,
}

impl ConsumptionInterval {
    pub fn new(
        interval_start: DateTime<Utc>,
        interval_end: DateTime<Utc>,
        consumption_kwh: f64,
    ) -> Result<Self> {
        let interval = Self {
            interval_start,
            interval_end,
            consumption_kwh,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Negative readings are passed through, only shape is checked
    pub fn validate(&self) -> Result<()> {
        if self.interval_start >= self.interval_end {
            return Err(IngestError::EmptyInterval {
                start: self.interval_start,
                end: self.interval_end,
            });
        }
        if !self.consumption_kwh.is_finite() {
            return Err(IngestError::NonFinite {
                field: "consumption_kwh",
                start: self.interval_start,
            });
        }
        Ok(())
    }

    /// Calendar date (UTC) this reading is booked to
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.interval_start.date_naive()
    }

    #[must_use]
    pub fn minute_key(&self) -> String {
        minute_key(self.interval_start)
    }
}
