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

//! Octopus Energy REST client
//!
//! Unit rates are public; consumption needs HTTP basic auth with the API key
//! as user name and an empty password.

use agilelens_types::{
    AgileProduct, ConsumptionInterval, PricePeriod, parse_agile_products, parse_consumption,
    parse_prices,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{MeterCredentials, OctopusConfig};
use crate::error::{Result, ServiceError, UpstreamError};
use crate::source::SeriesSource;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Enough for every half hour of a month in one page
const PRICE_PAGE_SIZE: &str = "1500";
/// Enough for every half hour of a year in one page
const CONSUMPTION_PAGE_SIZE: &str = "25000";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Clone)]
pub struct OctopusClient {
    client: Client,
    base_url: String,
    product_code: String,
    region: String,
    credentials: Option<MeterCredentials>,
}

impl fmt::Debug for OctopusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctopusClient")
            .field("base_url", &self.base_url)
            .field("tariff_code", &self.tariff_code())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl OctopusClient {
    /// Client for the configured tariff
    ///
    /// Missing meter credentials are not an error here; consumption calls
    /// fail with a configuration error instead.
    pub fn new(config: &OctopusConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("agilelens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            product_code: config.product_code.clone(),
            region: config.region.clone(),
            credentials: config.consumption_credentials().ok(),
        })
    }

    #[must_use]
    pub fn tariff_code(&self) -> String {
        format!("E-1R-{}-{}", self.product_code, self.region)
    }

    fn prices_url(&self) -> String {
        format!(
            "{}/products/{}/electricity-tariffs/{}/standard-unit-rates/",
            self.base_url,
            self.product_code,
            self.tariff_code()
        )
    }

    fn products_url(&self) -> String {
        format!("{}/products/", self.base_url)
    }

    fn consumption_url(credentials: &MeterCredentials, base_url: &str) -> String {
        format!(
            "{}/electricity-meter-points/{}/meters/{}/consumption/",
            base_url, credentials.mpan, credentials.serial_number
        )
    }

    fn credentials(&self) -> Result<&MeterCredentials> {
        self.credentials.as_ref().ok_or_else(|| {
            ServiceError::Configuration(
                "OCTOPUS_API_KEY, MPAN, and SERIAL_NUMBER must be configured to fetch consumption data"
                    .to_owned(),
            )
        })
    }

    /// Send and return the body of a successful response
    async fn body(request: RequestBuilder) -> std::result::Result<String, UpstreamError> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.text().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Octopus API rejected the credentials");
                Err(UpstreamError::Unauthorized)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!("Octopus API returned {status}: {message}");
                Err(UpstreamError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl SeriesSource for OctopusClient {
    /// Full tariff code, so a product change never reuses old cache entries
    fn price_discriminator(&self) -> String {
        self.tariff_code()
    }

    fn region(&self) -> String {
        self.region.clone()
    }

    fn product_code(&self) -> Option<String> {
        Some(self.product_code.clone())
    }

    fn meter_discriminator(&self) -> String {
        self.credentials
            .as_ref()
            .map_or_else(|| "unconfigured".to_owned(), |c| c.mpan.clone())
    }

    async fn fetch_prices(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<PricePeriod>> {
        info!("Fetching prices from {period_from} to {period_to}");
        let url = self.prices_url();
        debug!("GET {url}");

        let request = self.client.get(&url).query(&[
            ("period_from", period_from.format(TIMESTAMP_FORMAT).to_string()),
            ("period_to", period_to.format(TIMESTAMP_FORMAT).to_string()),
            ("page_size", PRICE_PAGE_SIZE.to_owned()),
        ]);

        let body = Self::body(request).await?;
        let prices = parse_prices(&body).map_err(UpstreamError::from)?;
        info!("Retrieved {} price periods", prices.len());
        Ok(prices)
    }

    async fn fetch_consumption(
        &self,
        period_from: DateTime<Utc>,
        period_to: DateTime<Utc>,
    ) -> Result<Vec<ConsumptionInterval>> {
        let credentials = self.credentials()?;
        info!("Fetching consumption from {period_from} to {period_to}");
        let url = Self::consumption_url(credentials, &self.base_url);
        debug!("GET {url}");

        let request = self
            .client
            .get(&url)
            .basic_auth(&credentials.api_key, Some(""))
            .query(&[
                ("period_from", period_from.format(TIMESTAMP_FORMAT).to_string()),
                ("period_to", period_to.format(TIMESTAMP_FORMAT).to_string()),
                ("page_size", CONSUMPTION_PAGE_SIZE.to_owned()),
                ("order_by", "period".to_owned()),
            ]);

        let body = Self::body(request).await?;
        let consumption = parse_consumption(&body).map_err(UpstreamError::from)?;
        info!("Retrieved {} consumption periods", consumption.len());
        Ok(consumption)
    }

    /// Green, variable, non-tracker products filtered to Agile codes
    async fn fetch_products(&self) -> Result<Vec<AgileProduct>> {
        let url = self.products_url();
        debug!("GET {url}");

        let request = self.client.get(&url).query(&[
            ("is_variable", "true"),
            ("is_green", "true"),
            ("is_tracker", "false"),
        ]);

        let body = Self::body(request).await?;
        let products = parse_agile_products(&body).map_err(UpstreamError::from)?;
        info!("Found {} Agile products", products.len());
        Ok(products)
    }
}
