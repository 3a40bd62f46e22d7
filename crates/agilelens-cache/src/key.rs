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

//! Cache key layout: `<domain>:<discriminator>:<from>:<to>`

use chrono::{DateTime, Utc};
use std::fmt;

/// The two kinds of raw series that get cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDomain {
    /// Unit rates, discriminated by region / tariff
    Prices,
    /// Meter readings, discriminated by meter identifier
    Consumption,
}

impl CacheDomain {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::Consumption => "consumption",
        }
    }

    /// Key for one query; a missing bound is written as `none`
    #[must_use]
    pub fn key(
        &self,
        discriminator: &str,
        period_from: Option<DateTime<Utc>>,
        period_to: Option<DateTime<Utc>>,
    ) -> String {
        format!(
            "{}:{}:{}:{}",
            self.as_str(),
            discriminator,
            bound(period_from),
            bound(period_to)
        )
    }

    /// Pattern matching every key of this domain
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{}:*", self.as_str())
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn bound(instant: Option<DateTime<Utc>>) -> String {
    instant.map_or_else(|| "none".to_owned(), |t| t.to_rfc3339())
}
