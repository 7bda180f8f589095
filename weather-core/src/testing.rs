//! In-memory providers for controller and session tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::{
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crate::{
    error::ProviderError,
    model::{CurrentConditions, LocationCandidate},
    provider::{Geocoder, WeatherProvider},
};

pub fn london() -> LocationCandidate {
    LocationCandidate {
        name: "London".into(),
        country: "United Kingdom".into(),
        latitude: 51.5,
        longitude: -0.12,
    }
}

pub fn paris() -> LocationCandidate {
    LocationCandidate {
        name: "Paris".into(),
        country: "France".into(),
        latitude: 48.85,
        longitude: 2.35,
    }
}

pub fn overcast_london() -> CurrentConditions {
    CurrentConditions {
        temperature: 15.0,
        apparent_temperature: 14.0,
        humidity: 70.0,
        pressure: 1012.0,
        wind_speed: 10.0,
        wind_speed_unit: "km/h".into(),
        weather_code: 3,
    }
}

fn server_error(service: &'static str) -> ProviderError {
    ProviderError::Status {
        service,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "upstream unavailable".into(),
    }
}

#[derive(Debug, Default)]
pub struct FakeGeocoder {
    results: Mutex<Vec<LocationCandidate>>,
    failing: AtomicBool,
    calls: Mutex<Vec<(String, usize)>>,
}

impl FakeGeocoder {
    pub fn returning(results: Vec<LocationCandidate>) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }

    pub fn set_results(&self, results: Vec<LocationCandidate>) {
        *self.results.lock().unwrap() = results;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn last_count(&self) -> Option<usize> {
        self.calls.lock().unwrap().last().map(|(_, n)| *n)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(
        &self,
        name: &str,
        count: usize,
    ) -> Result<Vec<LocationCandidate>, ProviderError> {
        self.calls.lock().unwrap().push((name.to_string(), count));

        if self.failing.load(Ordering::SeqCst) {
            return Err(server_error("fake geocoding"));
        }

        Ok(self.results.lock().unwrap().clone())
    }
}

#[derive(Debug)]
pub struct FakeWeather {
    conditions: CurrentConditions,
    failing: AtomicBool,
    fail_latitudes: Mutex<Vec<f64>>,
    delays: Mutex<Vec<(f64, Duration)>>,
    calls: Mutex<Vec<(f64, f64)>>,
}

impl FakeWeather {
    pub fn returning(conditions: CurrentConditions) -> Self {
        Self {
            conditions,
            failing: AtomicBool::new(false),
            fail_latitudes: Mutex::new(Vec::new()),
            delays: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        let fake = Self::returning(overcast_london());
        fake.set_failing(true);
        fake
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_for(&self, latitude: f64) {
        self.fail_latitudes.lock().unwrap().push(latitude);
    }

    pub fn delay_for(&self, latitude: f64, delay: Duration) {
        self.delays.lock().unwrap().push((latitude, delay));
    }

    pub fn calls(&self) -> Vec<(f64, f64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ProviderError> {
        self.calls.lock().unwrap().push((latitude, longitude));

        let delay = self
            .delays
            .lock()
            .unwrap()
            .iter()
            .find(|(lat, _)| *lat == latitude)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fails_here = self.fail_latitudes.lock().unwrap().contains(&latitude);
        if fails_here || self.failing.load(Ordering::SeqCst) {
            return Err(server_error("fake forecast"));
        }

        Ok(self.conditions.clone())
    }
}
