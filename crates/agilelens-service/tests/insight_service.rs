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
use agilelens_cache::{CacheConfig, CacheDomain, CacheManager, Clock, ManualClock};
use agilelens_service::{InsightService, Result, SeriesSource, ServiceError};
use agilelens_types::{AgileProduct, ConsumptionInterval, PricePeriod, TariffComparison};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Three days of synthetic half-hourly data around 2024-12-14
#[derive(Debug, Default)]
struct FakeSource {
    price_fetches: AtomicUsize,
    consumption_fetches: AtomicUsize,
    no_meter: bool,
    empty: bool,
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 13, 0, 0, 0).unwrap()
}

fn slot(index: i64) -> DateTime<Utc> {
    base() + TimeDelta::minutes(30 * index)
}

/// Price of slot `i`: negative overnight, peak in the evening
fn price_of(index: i64) -> f64 {
    match index.rem_euclid(48) {
        4..=7 => -2.0,
        34..=37 => 35.0,
        h => 10.0 + h as f64 * 0.25,
    }
}

#[async_trait]
impl SeriesSource for FakeSource {
    fn price_discriminator(&self) -> String {
        "H".to_owned()
    }

    fn meter_discriminator(&self) -> String {
        "1200012345678".to_owned()
    }

    fn product_code(&self) -> Option<String> {
        Some("AGILE-24-10-01".to_owned())
    }

    async fn fetch_prices(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<PricePeriod>> {
        self.price_fetches.fetch_add(1, Ordering::SeqCst);
        if self.empty {
            return Ok(Vec::new());
        }
        Ok((0..48 * 3)
            .map(|i| {
                let v = price_of(i);
                PricePeriod::new(slot(i), slot(i + 1), v / 1.05, v).unwrap()
            })
            .filter(|p| p.valid_to > period_from && p.valid_from < period_to)
            .collect())
    }

    async fn fetch_consumption(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<ConsumptionInterval>> {
        if self.no_meter {
            return Err(ServiceError::Configuration("MPAN not configured".to_owned()));
        }
        self.consumption_fetches.fetch_add(1, Ordering::SeqCst);
        Ok((0..48 * 3)
            .map(|i| ConsumptionInterval::new(slot(i), slot(i + 1), 0.5).unwrap())
            .filter(|c| c.interval_start >= period_from && c.interval_start < period_to)
            .collect())
    }

    async fn fetch_products(&self) -> Result<Vec<AgileProduct>> {
        Ok(["AGILE-25-04-01", "AGILE-24-10-01"]
            .into_iter()
            .map(|code| AgileProduct {
                code: code.to_owned(),
                full_name: format!("Agile Octopus {code}"),
                display_name: "Agile Octopus".to_owned(),
                description: String::new(),
                is_variable: true,
                is_green: true,
                brand: None,
                available_from: None,
                available_to: None,
            })
            .collect())
    }
}

struct Harness {
    service: InsightService,
    source: Arc<FakeSource>,
    clock: Arc<ManualClock>,
}

fn harness_with(source: FakeSource) -> Harness {
    // 2024-12-14 (Saturday) 12:10 UTC
    let clock = Arc::new(ManualClock::new(slot(48 + 24) + TimeDelta::minutes(10)));
    let source = Arc::new(source);
    let cache = Arc::new(CacheManager::new(CacheConfig::default(), clock.clone()));
    let service = InsightService::new(
        source.clone(),
        cache,
        clock.clone(),
        TariffComparison::default(),
    );
    Harness {
        service,
        source,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(FakeSource::default())
}

#[tokio::test]
async fn test_prices_are_served_from_cache_within_a_slot() {
    let h = harness();

    let first = h.service.prices(None, None).await.unwrap();
    h.clock.advance(TimeDelta::minutes(5));
    let second = h.service.prices(None, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.source.price_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(h.service.cache().stats().local_hits, 1);
}

#[tokio::test]
async fn test_cache_entry_expires_after_ttl() {
    let h = harness();
    let from = slot(48);
    let to = slot(96);

    h.service.prices(Some(from), Some(to)).await.unwrap();
    h.clock.advance(TimeDelta::seconds(3600));
    h.service.prices(Some(from), Some(to)).await.unwrap();
    assert_eq!(h.source.price_fetches.load(Ordering::SeqCst), 1);

    h.clock.advance(TimeDelta::seconds(1));
    h.service.prices(Some(from), Some(to)).await.unwrap();
    assert_eq!(h.source.price_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_results_are_not_cached() {
    let h = harness_with(FakeSource {
        empty: true,
        ..FakeSource::default()
    });

    assert!(h.service.prices(None, None).await.unwrap().is_empty());
    assert!(h.service.prices(None, None).await.unwrap().is_empty());
    assert_eq!(h.source.price_fetches.load(Ordering::SeqCst), 2);
    assert!(h.service.cache().is_empty());
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let h = harness();

    h.service.prices(None, None).await.unwrap();
    h.service.invalidate("prices:").await;
    h.service.prices(None, None).await.unwrap();

    assert_eq!(h.source.price_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_current_prices_window() {
    let h = harness();
    let window = h.service.current_prices().await.unwrap();

    let current = window.current.unwrap();
    assert_eq!(current.valid_from, slot(48 + 24));
    assert_eq!(window.upcoming.len(), 24);
    assert_eq!(window.past_24h.len(), 48);
    assert!(!window.has_negative_upcoming);
}

#[tokio::test]
async fn test_cost_analysis_over_explicit_window() {
    let h = harness();
    // 2024-12-13 00:00 to 04:00, eight slots at 0.5 kWh
    let report = h
        .service
        .cost_analysis(Some(slot(0)), Some(slot(8)), Some(30.0))
        .await
        .unwrap();

    let analysis = &report.analysis;
    assert_eq!(report.region, "H");
    assert!((analysis.total_kwh - 4.0).abs() < 1e-9);
    assert!(analysis.coverage.is_complete());
    // slots 0-3 at 10.0..10.75, slots 4-7 at -2.0
    let expected = 0.5 * (10.0 + 10.25 + 10.5 + 10.75) + 0.5 * 4.0 * -2.0;
    assert!((analysis.total_cost_pence - expected).abs() < 1e-9);
    assert!((analysis.flat_rate_pence - 30.0).abs() < f64::EPSILON);
    assert_eq!(analysis.days_in_period, 1);
}

#[tokio::test]
async fn test_consumption_needs_meter_configuration() {
    let h = harness_with(FakeSource {
        no_meter: true,
        ..FakeSource::default()
    });

    let result = h.service.cost_analysis(None, None, None).await;
    assert!(matches!(result, Err(ServiceError::Configuration(_))));

    // Prices alone still work
    assert!(h.service.price_statistics(None, None).await.is_ok());
}

#[tokio::test]
async fn test_summary_yesterday() {
    let h = harness();
    let summary = h.service.summary(SummaryPeriod::Yesterday).await.unwrap();

    assert_eq!(summary.period, "Yesterday");
    assert_eq!(summary.period_from, slot(0));
    assert_eq!(summary.period_to, slot(48));
    assert_eq!(summary.prices.count, 48);
    assert_eq!(summary.prices.negative_count, 4);
    assert!((summary.consumption.total_kwh - 24.0).abs() < 1e-9);
    assert_eq!(summary.cost.days_in_period, 1);
}

#[tokio::test]
async fn test_summary_rejects_unknown_name() {
    let h = harness();
    let result = h.service.summary_named("fortnight").await;
    assert!(matches!(result, Err(ServiceError::UnknownPeriod(_))));
}

#[tokio::test]
async fn test_dashboard_today_only_counts_since_midnight() {
    let h = harness();
    let dashboard = h.service.dashboard().await.unwrap();

    assert_eq!(dashboard.region, "H");
    assert!(dashboard.current_price.is_some());
    assert_eq!(dashboard.upcoming_prices.len(), 24);
    // 00:00 to 12:00 on the 14th
    assert_eq!(dashboard.today.consumption.period_count, 24);
    assert_eq!(dashboard.consumption_7d.len(), 72);
    assert_eq!(h.source.consumption_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recommendations_clamp_look_ahead() {
    let h = harness();
    let report = h.service.recommendations(500).await.unwrap();

    assert_eq!(report.hours_analyzed, 48);
    assert!(!report.recommendations.recommendations.is_empty());
}

#[tokio::test]
async fn test_negative_prices_and_daily_consumption() {
    let h = harness();

    // 2024-12-12 12:00 to 2024-12-15 12:00, the last day is published ahead
    let negative = h.service.negative_prices(2).await.unwrap();
    assert_eq!(negative.days_searched, 2);
    assert_eq!(negative.report.count, 12);
    assert!((negative.report.total_value - -24.0).abs() < 1e-9);

    let daily = h.service.daily_consumption(2).await.unwrap();
    assert_eq!(daily.daily.len(), 2);
    assert!((daily.total_kwh - 36.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_negative_prices_include_published_future_periods() {
    let h = harness();
    let now = h.clock.now();

    let negative = h.service.negative_prices(1).await.unwrap();
    let future: Vec<_> = negative
        .report
        .prices
        .iter()
        .filter(|p| p.valid_from > now)
        .collect();

    assert_eq!(negative.report.count, 8);
    assert_eq!(future.len(), 4);
    assert!(future.iter().all(|p| p.valid_from >= slot(96 + 4)));
}

#[tokio::test]
async fn test_day_ranges_are_clamped() {
    let h = harness();

    let daily = h.service.daily_consumption(u32::MAX).await.unwrap();
    assert_eq!(daily.days, 365);
    assert!((daily.total_kwh - 36.0).abs() < 1e-9);

    let negative = h.service.negative_prices(u32::MAX).await.unwrap();
    assert_eq!(negative.days_searched, 30);

    let daily = h.service.daily_consumption(0).await.unwrap();
    assert_eq!(daily.days, 1);
}

#[tokio::test]
async fn test_consumption_statistics_default_to_thirty_days() {
    let h = harness();
    let now = slot(48 + 24);

    let stats = h.service.consumption_statistics(None, None).await.unwrap();
    assert_eq!(stats.period_count, 72);

    let key = CacheDomain::Consumption.key(
        "1200012345678",
        Some(now - TimeDelta::days(30)),
        Some(now),
    );
    assert!(h.service.cache().remaining_ttl(&key).is_some());
}

#[tokio::test]
async fn test_today_consumption_starts_at_midnight() {
    let h = harness();
    let today = h.service.today_consumption().await.unwrap();

    assert_eq!(today.date, NaiveDate::from_ymd_opt(2024, 12, 14).unwrap());
    assert_eq!(today.count, 24);
    assert_eq!(today.consumption[0].interval_start, slot(48));
    assert!((today.stats.total_kwh - 12.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_products_report_newer_release() {
    let h = harness();
    let catalog = h.service.products().await.unwrap();

    assert_eq!(catalog.count, 2);
    assert_eq!(catalog.current_product_code.as_deref(), Some("AGILE-24-10-01"));
    assert_eq!(catalog.latest_product_code.as_deref(), Some("AGILE-25-04-01"));
}
