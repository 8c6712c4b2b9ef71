use crate::{
    Config,
    error::ApiError,
    model::{Location, WeatherSnapshot},
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Read-only access to a weather service.
///
/// Implementations do not retry, time out or cache; every call is one request.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Candidate locations matching free text.
    async fn fetch_locations(&self, query: &str) -> Result<Vec<Location>, ApiError>;

    /// Current conditions plus `days` days of forecast for a city.
    async fn fetch_forecast(&self, city_name: &str, days: u8)
    -> Result<WeatherSnapshot, ApiError>;
}

/// Construct the provider described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolved_api_key()?;
    let provider = WeatherApiProvider::with_base_url(api_key, config.base_url.clone());
    Ok(Box::new(provider))
}
