//! Core library for the `weather` client.
//!
//! This crate defines:
//! - Location and weather models, plus the weather code table
//! - Abstraction over geocoding and weather providers (Open-Meteo)
//! - Debounced search and weather controllers, tied together by [`App`]
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also drive other front ends.

pub mod app;
pub mod codes;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::{App, Changed};
pub use codes::describe;
pub use config::Config;
pub use controller::{SearchQueryState, WEATHER_FETCH_FAILED, WeatherState};
pub use error::ProviderError;
pub use model::{CurrentConditions, LocationCandidate, WeatherSnapshot};
pub use provider::{Geocoder, WeatherProvider, open_meteo::OpenMeteoProvider};
pub use view::WeatherView;
