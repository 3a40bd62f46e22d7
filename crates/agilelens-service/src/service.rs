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

use agilelens_analytics::{
    SummaryPeriod, consumption_statistics, cost_analysis, current_and_upcoming,
    hourly_consumption, hourly_prices, negative_price_report, price_statistics,
    usage_recommendations,
};
use agilelens_cache::{CacheDomain, CacheManager, Clock};
use agilelens_types::{
    ConsumptionInterval, ConsumptionStatistics, HourlyBucket, HourlyTotal, PricePeriod,
    PriceStatistics, PriceWindow, TariffComparison,
};
use chrono::{DateTime, DurationRound, NaiveTime, TimeDelta, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::report::{
    CostReport, Dashboard, DailyConsumption, NegativePrices, PeriodSummary, ProductCatalog,
    RecommendationReport, TodayConsumption, TodayStatistics,
};
use crate::source::SeriesSource;

const PRICE_LOOKBACK: TimeDelta = TimeDelta::hours(24);
const PRICE_LOOKAHEAD: TimeDelta = TimeDelta::hours(24);
const CONSUMPTION_LOOKBACK: TimeDelta = TimeDelta::days(7);
const STATS_LOOKBACK: TimeDelta = TimeDelta::days(30);
const SLOT: TimeDelta = TimeDelta::minutes(30);

/// Look-ahead for the current price window (hours)
pub const CURRENT_HOURS_AHEAD: u32 = 12;
/// Upcoming periods shown on the dashboard
const DASHBOARD_UPCOMING: usize = 24;
/// Bounds for recommendation look-ahead (hours)
const RECOMMENDATION_HOURS: (u32, u32) = (1, 48);
/// Bounds for the daily consumption history (days)
const DAILY_DAYS: (u32, u32) = (1, 365);
/// Bounds for the negative price search (days)
const NEGATIVE_DAYS: (u32, u32) = (1, 30);

/// Cache-aside front for the analytics functions
///
/// Raw series are cached by query signature; derived records are always
/// recomputed. Default windows are aligned to the half-hour slot so calls
/// within the same slot share cache entries.
pub struct InsightService {
    source: Arc<dyn SeriesSource>,
    cache: Arc<CacheManager>,
    clock: Arc<dyn Clock>,
    tariff: TariffComparison,
}

impl fmt::Debug for InsightService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightService")
            .field("source", &self.source)
            .field("cache", &self.cache)
            .field("tariff", &self.tariff)
            .finish_non_exhaustive()
    }
}

fn clamp_days(days: u32, (min, max): (u32, u32)) -> u32 {
    let clamped = days.clamp(min, max);
    if clamped != days {
        debug!("Clamped day range from {days} to {clamped}");
    }
    clamped
}

fn days_before(instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    instant
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl InsightService {
    pub fn new(
        source: Arc<dyn SeriesSource>,
        cache: Arc<CacheManager>,
        clock: Arc<dyn Clock>,
        tariff: TariffComparison,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            tariff,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    #[must_use]
    pub fn tariff(&self) -> TariffComparison {
        self.tariff
    }

    /// Start of the current half-hour slot
    fn slot_now(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        now.duration_trunc(SLOT).unwrap_or(now)
    }

    async fn cache_aside<T>(
        &self,
        key: String,
        fetch: impl Future<Output = Result<Vec<T>>>,
    ) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(cached) = self.cache.get::<Vec<T>>(&key).await
            && !cached.is_empty()
        {
            debug!("Returning cached series for {key}");
            return Ok(cached);
        }

        let fetched = fetch.await?;
        if !fetched.is_empty() {
            self.cache.set(&key, &fetched, None).await;
        }
        Ok(fetched)
    }

    async fn prices_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePeriod>> {
        let key = CacheDomain::Prices.key(&self.source.price_discriminator(), Some(from), Some(to));
        self.cache_aside(key, self.source.fetch_prices(from, to)).await
    }

    async fn consumption_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ConsumptionInterval>> {
        let key =
            CacheDomain::Consumption.key(&self.source.meter_discriminator(), Some(from), Some(to));
        self.cache_aside(key, self.source.fetch_consumption(from, to))
            .await
    }

    /// Unit rates, by default from 24 h ago to 24 h ahead
    pub async fn prices(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<PricePeriod>> {
        let now = self.slot_now();
        self.prices_between(
            from.unwrap_or(now - PRICE_LOOKBACK),
            to.unwrap_or(now + PRICE_LOOKAHEAD),
        )
        .await
    }

    /// Meter readings, by default the last 7 days
    pub async fn consumption(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ConsumptionInterval>> {
        let now = self.slot_now();
        self.consumption_between(from.unwrap_or(now - CONSUMPTION_LOOKBACK), to.unwrap_or(now))
            .await
    }

    pub async fn price_statistics(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PriceStatistics> {
        Ok(price_statistics(&self.prices(from, to).await?))
    }

    /// Current period plus the next 12 hours
    pub async fn current_prices(&self) -> Result<PriceWindow> {
        let prices = self.prices(None, None).await?;
        Ok(current_and_upcoming(
            &prices,
            self.clock.now(),
            CURRENT_HOURS_AHEAD,
        ))
    }

    pub async fn hourly_prices(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<HourlyBucket>> {
        Ok(hourly_prices(&self.prices(from, to).await?))
    }

    pub async fn hourly_consumption(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<HourlyTotal>> {
        Ok(hourly_consumption(&self.consumption(from, to).await?))
    }

    /// Consumption statistics, by default over the last 30 days
    pub async fn consumption_statistics(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ConsumptionStatistics> {
        let now = self.slot_now();
        let consumption = self
            .consumption_between(
                from.unwrap_or(now - STATS_LOOKBACK),
                to.unwrap_or(now),
            )
            .await?;
        Ok(consumption_statistics(&consumption))
    }

    /// Readings since midnight UTC with their statistics
    pub async fn today_consumption(&self) -> Result<TodayConsumption> {
        let now = self.slot_now();
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let consumption = self.consumption_between(midnight, now).await?;

        Ok(TodayConsumption {
            date: midnight.date_naive(),
            count: consumption.len(),
            stats: consumption_statistics(&consumption),
            consumption,
        })
    }

    /// kWh per day over the last `days` days (1 to 365)
    pub async fn daily_consumption(&self, days: u32) -> Result<DailyConsumption> {
        let days = clamp_days(days, DAILY_DAYS);
        let now = self.slot_now();
        let from = days_before(now, days);
        let stats = consumption_statistics(&self.consumption_between(from, now).await?);

        Ok(DailyConsumption {
            days,
            total_kwh: stats.total_kwh,
            daily: stats.daily_series(),
        })
    }

    /// Negative periods from `days` days back (1 to 30) to the end of the
    /// published rates, 24 h ahead
    pub async fn negative_prices(&self, days: u32) -> Result<NegativePrices> {
        let days = clamp_days(days, NEGATIVE_DAYS);
        let now = self.slot_now();
        let from = days_before(now, days);
        let prices = self.prices_between(from, now + PRICE_LOOKAHEAD).await?;

        Ok(NegativePrices {
            days_searched: days,
            report: negative_price_report(&prices),
        })
    }

    /// Realized cost over a window, by default the last 7 days
    ///
    /// `flat_rate_pence` overrides the configured comparison rate.
    pub async fn cost_analysis(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        flat_rate_pence: Option<f64>,
    ) -> Result<CostReport> {
        let now = self.slot_now();
        let from = from.unwrap_or(now - CONSUMPTION_LOOKBACK);
        let to = to.unwrap_or(now);
        let tariff = flat_rate_pence.map_or(self.tariff, |rate| self.tariff.with_flat_rate(rate));

        let (prices, consumption) = tokio::try_join!(
            self.prices_between(from, to),
            self.consumption_between(from, to)
        )?;

        Ok(CostReport {
            region: self.source.region(),
            period_from: from,
            period_to: to,
            analysis: cost_analysis(&prices, &consumption, &tariff),
        })
    }

    /// Prices, consumption and cost for a named period
    pub async fn summary(&self, period: SummaryPeriod) -> Result<PeriodSummary> {
        let (from, to) = period.bounds(self.clock.now());

        let (prices, consumption) = tokio::try_join!(
            self.prices_between(from, to),
            self.consumption_between(from, to)
        )?;

        Ok(PeriodSummary {
            period: period.label().to_owned(),
            period_from: from,
            period_to: to,
            prices: price_statistics(&prices),
            consumption: consumption_statistics(&consumption),
            cost: cost_analysis(&prices, &consumption, &self.tariff),
        })
    }

    /// Same as [`InsightService::summary`], with the period given by name
    pub async fn summary_named(&self, period: &str) -> Result<PeriodSummary> {
        self.summary(period.parse()?).await
    }

    /// Dashboard data from one 48 h price window and 7 days of consumption
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let now = self.clock.now();
        let (prices, consumption) =
            tokio::try_join!(self.prices(None, None), self.consumption(None, None))?;

        let window = current_and_upcoming(&prices, now, CURRENT_HOURS_AHEAD);
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today_prices: Vec<_> = prices
            .iter()
            .filter(|p| p.valid_from >= today_start)
            .cloned()
            .collect();
        let today_consumption: Vec<_> = consumption
            .iter()
            .filter(|c| c.interval_start >= today_start)
            .cloned()
            .collect();

        let mut upcoming_prices = window.upcoming;
        upcoming_prices.truncate(DASHBOARD_UPCOMING);

        Ok(Dashboard {
            timestamp: now,
            region: self.source.region(),
            current_price: window.current,
            upcoming_prices,
            best_upcoming: window.best_upcoming,
            has_negative_upcoming: window.has_negative_upcoming,
            today: TodayStatistics {
                prices: price_statistics(&today_prices),
                consumption: consumption_statistics(&today_consumption),
            },
            cost_analysis: cost_analysis(&prices, &consumption, &self.tariff),
            prices_48h: prices,
            consumption_7d: consumption,
        })
    }

    /// Appliance scheduling hints for the next `hours_ahead` hours (1 to 48)
    pub async fn recommendations(&self, hours_ahead: u32) -> Result<RecommendationReport> {
        let (min, max) = RECOMMENDATION_HOURS;
        let hours = hours_ahead.clamp(min, max);
        if hours != hours_ahead {
            debug!("Clamped recommendation look-ahead from {hours_ahead}h to {hours}h");
        }

        let from = self.slot_now();
        let prices = self
            .prices_between(from, from + TimeDelta::hours(i64::from(hours)))
            .await?;

        Ok(RecommendationReport {
            hours_analyzed: hours,
            recommendations: usage_recommendations(&prices),
        })
    }

    /// Agile products upstream, next to the configured product code
    ///
    /// Not cached: the catalogue is small and only read on demand.
    pub async fn products(&self) -> Result<ProductCatalog> {
        let products = self.source.fetch_products().await?;
        let current = self.source.product_code();
        let latest = products.first().map(|p| p.code.clone());

        if let (Some(current), Some(latest)) = (&current, &latest)
            && current != latest
        {
            warn!("Configured product {current} is not the newest Agile product ({latest})");
        }

        Ok(ProductCatalog {
            count: products.len(),
            current_product_code: current,
            latest_product_code: latest,
            products,
        })
    }

    /// Drop cached series matching `pattern` (`"*"` for everything)
    pub async fn invalidate(&self, pattern: &str) {
        self.cache.clear(pattern).await;
    }
}
