use crate::{
    Config,
    error::ProviderError,
    model::{CurrentConditions, LocationCandidate},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

/// Turns free-text place names into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Up to `count` candidates for `name`, best match first. An empty list is not an error.
    async fn search(
        &self,
        name: &str,
        count: usize,
    ) -> Result<Vec<LocationCandidate>, ProviderError>;
}

/// Current conditions at a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ProviderError>;
}

/// Construct the Open-Meteo provider from a validated config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<OpenMeteoProvider>> {
    config.validate()?;

    Ok(Arc::new(OpenMeteoProvider::new(
        config.geocoding_url.clone(),
        config.forecast_url.clone(),
        config.language.clone(),
    )))
}
