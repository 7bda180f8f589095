use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codes::describe;

/// A geocoded place offered as a search suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for LocationCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// Current readings as reported by the weather service, before a location label is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_speed_unit: String,
    pub weather_code: i64,
}

/// Weather for one location at fetch time. Built in one step and never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub apparent_temperature: f64,
    /// Relative humidity, 0-100.
    pub humidity: f64,
    /// Surface pressure in hPa.
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_speed_unit: String,
    pub weather_code: i64,
    pub location_name: String,
    pub location_country: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// The location label always comes from the geocoding candidate; the
    /// weather payload carries none.
    pub fn new(conditions: CurrentConditions, location: &LocationCandidate) -> Self {
        Self {
            temperature: conditions.temperature,
            apparent_temperature: conditions.apparent_temperature,
            humidity: conditions.humidity,
            pressure: conditions.pressure,
            wind_speed: conditions.wind_speed,
            wind_speed_unit: conditions.wind_speed_unit,
            weather_code: conditions.weather_code,
            location_name: location.name.clone(),
            location_country: location.country.clone(),
            fetched_at: Utc::now(),
        }
    }

    pub fn condition(&self) -> &'static str {
        describe(self.weather_code)
    }
}
