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

use agilelens_analytics::SummaryPeriod;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "agilelens",
    author,
    version,
    about = "Octopus Agile price and consumption insights"
)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the series come from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read unit rates from an API-shaped JSON file instead of the Octopus API
    #[arg(long, global = true, value_name = "PATH")]
    pub prices_file: Option<PathBuf>,

    /// Read meter readings from an API-shaped JSON file (requires --prices-file)
    #[arg(long, global = true, value_name = "PATH", requires = "prices_file")]
    pub consumption_file: Option<PathBuf>,
}

/// Optional query window, RFC 3339 timestamps
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WindowArgs {
    #[arg(long, value_name = "TIMESTAMP")]
    pub from: Option<DateTime<Utc>>,

    #[arg(long, value_name = "TIMESTAMP")]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Raw unit rates (default: 24 h back to 24 h ahead)
    Prices(WindowArgs),

    /// Price statistics over a window
    PriceStats(WindowArgs),

    /// Current period and the next 12 hours
    Current,

    /// Hourly average unit rates
    HourlyPrices(WindowArgs),

    /// Raw meter readings (default: last 7 days)
    Consumption(WindowArgs),

    /// Consumption statistics over a window
    ConsumptionStats(WindowArgs),

    /// Hourly consumption totals
    HourlyConsumption(WindowArgs),

    /// Today's readings with statistics
    Today,

    /// kWh per day
    Daily {
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=365))]
        days: u32,
    },

    /// Periods with a negative unit rate, from `--days` back to tomorrow
    Negative {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=30))]
        days: u32,
    },

    /// Agile cost compared with a flat tariff
    Cost {
        #[command(flatten)]
        window: WindowArgs,

        /// Flat comparison rate in pence per kWh
        #[arg(long, value_name = "PENCE")]
        flat_rate: Option<f64>,
    },

    /// Prices, consumption and cost for a named period
    Summary {
        #[arg(default_value = "today", help = "today, yesterday, week or month")]
        period: SummaryPeriod,
    },

    /// Appliance scheduling hints
    Recommend {
        /// Look-ahead in hours, clamped to 1..=48
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },

    /// Combined dashboard view
    Dashboard,

    /// Agile products on offer upstream
    Products,

    /// Drop cached series matching a pattern
    Invalidate {
        #[arg(default_value = "*")]
        pattern: String,
    },
}
