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

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid period '{0}', use: today, yesterday, week, month")]
pub struct UnknownSummaryPeriod(pub String);

/// Named reporting window, bounded in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    #[default]
    Today,
    Yesterday,
    /// Since Monday 00:00
    Week,
    /// Since the 1st of the month
    Month,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl SummaryPeriod {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Week => "This Week",
            Self::Month => "This Month",
        }
    }

    /// `[from, to)` of this period as seen at `now`
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        match self {
            Self::Today => (midnight(today), now),
            Self::Yesterday => {
                let start = midnight(today) - TimeDelta::days(1);
                (start, start + TimeDelta::days(1))
            }
            Self::Week => {
                let since_monday = i64::from(today.weekday().num_days_from_monday());
                (midnight(today - TimeDelta::days(since_monday)), now)
            }
            Self::Month => (midnight(today - TimeDelta::days(i64::from(today.day0()))), now),
        }
    }
}

impl FromStr for SummaryPeriod {
    type Err = UnknownSummaryPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(UnknownSummaryPeriod(s.to_owned())),
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
