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

mod cli;

use agilelens_cache::{CacheManager, Clock, SystemClock};
use agilelens_service::{AppConfig, FileSource, InsightService, OctopusClient, SeriesSource};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, SourceArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured level; logs go to stderr so stdout stays JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.system.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting AgileLens v{} (region {}, cache {})",
        env!("CARGO_PKG_VERSION"),
        config.octopus.region,
        if config.cache.enabled { "on" } else { "off" }
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = build_source(&cli.source, &config)?;
    let cache = Arc::new(CacheManager::connect(config.cache.clone(), Arc::clone(&clock)).await);
    let service = InsightService::new(source, Arc::clone(&cache), clock, config.tariff);

    let outcome = run(&service, cli.command, cli.pretty).await;

    debug!("Cache counters: {:?}", cache.stats());
    cache.close();
    outcome
}

fn build_source(args: &SourceArgs, config: &AppConfig) -> anyhow::Result<Arc<dyn SeriesSource>> {
    let Some(prices) = &args.prices_file else {
        return Ok(Arc::new(OctopusClient::new(&config.octopus)?));
    };

    info!("Reading series from {}", prices.display());
    let mut source = FileSource::new(prices);
    if let Some(consumption) = &args.consumption_file {
        source = source.with_consumption(consumption);
    }
    Ok(Arc::new(source))
}

async fn run(service: &InsightService, command: Commands, pretty: bool) -> anyhow::Result<()> {
    match command {
        Commands::Prices(w) => emit(&service.prices(w.from, w.to).await?, pretty),
        Commands::PriceStats(w) => emit(&service.price_statistics(w.from, w.to).await?, pretty),
        Commands::Current => emit(&service.current_prices().await?, pretty),
        Commands::HourlyPrices(w) => emit(&service.hourly_prices(w.from, w.to).await?, pretty),
        Commands::Consumption(w) => emit(&service.consumption(w.from, w.to).await?, pretty),
        Commands::ConsumptionStats(w) => {
            emit(&service.consumption_statistics(w.from, w.to).await?, pretty)
        }
        Commands::HourlyConsumption(w) => {
            emit(&service.hourly_consumption(w.from, w.to).await?, pretty)
        }
        Commands::Today => emit(&service.today_consumption().await?, pretty),
        Commands::Daily { days } => emit(&service.daily_consumption(days).await?, pretty),
        Commands::Negative { days } => emit(&service.negative_prices(days).await?, pretty),
        Commands::Cost { window, flat_rate } => emit(
            &service
                .cost_analysis(window.from, window.to, flat_rate)
                .await?,
            pretty,
        ),
        Commands::Summary { period } => emit(&service.summary(period).await?, pretty),
        Commands::Recommend { hours } => emit(&service.recommendations(hours).await?, pretty),
        Commands::Dashboard => emit(&service.dashboard().await?, pretty),
        Commands::Products => emit(&service.products().await?, pretty),
        Commands::Invalidate { pattern } => {
            service.invalidate(&pattern).await;
            emit(&serde_json::json!({ "cleared": pattern }), pretty)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
