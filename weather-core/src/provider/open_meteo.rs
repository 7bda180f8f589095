use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::{
    error::ProviderError,
    model::{CurrentConditions, LocationCandidate},
};

use super::{Geocoder, WeatherProvider};

const GEOCODING: &str = "Open-Meteo geocoding";
const FORECAST: &str = "Open-Meteo forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,surface_pressure,wind_speed_10m,weather_code";

/// Geocoding and current-weather lookups against Open-Meteo. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    language: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_url: String, forecast_url: String, language: String) -> Self {
        Self {
            geocoding_url,
            forecast_url,
            language,
            http: Client::new(),
        }
    }

    fn search_request(&self, name: &str, count: usize) -> RequestBuilder {
        self.http.get(&self.geocoding_url).query(&[
            ("name", name),
            ("count", count.to_string().as_str()),
            ("language", self.language.as_str()),
            ("format", "json"),
        ])
    }

    fn current_request(&self, latitude: f64, longitude: f64) -> RequestBuilder {
        self.http.get(&self.forecast_url).query(&[
            ("latitude", latitude.to_string().as_str()),
            ("longitude", longitude.to_string().as_str()),
            ("current", CURRENT_FIELDS),
        ])
    }

    async fn get_body(
        &self,
        service: &'static str,
        request: RequestBuilder,
    ) -> Result<String, ProviderError> {
        let request = request
            .build()
            .map_err(|source| ProviderError::Request { service, source })?;
        debug!("{service}: GET {}", request.url());

        let res = self
            .http
            .execute(request)
            .await
            .map_err(|source| ProviderError::Request { service, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Request { service, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                service,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    async fn search(
        &self,
        name: &str,
        count: usize,
    ) -> Result<Vec<LocationCandidate>, ProviderError> {
        let body = self
            .get_body(GEOCODING, self.search_request(name, count))
            .await?;

        parse_geocoding(&body)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ProviderError> {
        let body = self
            .get_body(FORECAST, self.current_request(latitude, longitude))
            .await?;

        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    // Some places (e.g. in disputed territories) come back without a country.
    #[serde(default)]
    country: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    surface_pressure: f64,
    wind_speed_10m: f64,
    weather_code: i64,
}

#[derive(Debug, Deserialize)]
struct OmCurrentUnits {
    wind_speed_10m: String,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
    current_units: OmCurrentUnits,
}

/// Parse a geocoding payload. A missing `results` field means no matches.
pub fn parse_geocoding(body: &str) -> Result<Vec<LocationCandidate>, ProviderError> {
    let parsed: OmGeocodingResponse = serde_json::from_str(body)
        .map_err(|source| ProviderError::Parse { service: GEOCODING, source })?;

    Ok(parsed
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|p| LocationCandidate {
            name: p.name,
            country: p.country,
            latitude: p.latitude,
            longitude: p.longitude,
        })
        .collect())
}

/// Parse a forecast payload requested with the `current` field list.
pub fn parse_current(body: &str) -> Result<CurrentConditions, ProviderError> {
    let parsed: OmForecastResponse = serde_json::from_str(body)
        .map_err(|source| ProviderError::Parse { service: FORECAST, source })?;

    let OmForecastResponse { current, current_units } = parsed;

    Ok(CurrentConditions {
        temperature: current.temperature_2m,
        apparent_temperature: current.apparent_temperature,
        humidity: current.relative_humidity_2m,
        pressure: current.surface_pressure,
        wind_speed: current.wind_speed_10m,
        wind_speed_unit: current_units.wind_speed_10m,
        weather_code: current.weather_code,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    fn provider(base: &str) -> OpenMeteoProvider {
        OpenMeteoProvider::new(
            format!("{base}/v1/search"),
            format!("{base}/v1/forecast"),
            "en".to_string(),
        )
    }

    /// Serve exactly one canned HTTP response; yields the request line received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            request.lines().next().unwrap_or_default().to_string()
        });

        (base, handle)
    }

    #[test]
    fn search_request_carries_geocoding_parameters() {
        let request = provider("https://geo.test")
            .search_request("São Paulo", 5)
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/v1/search");
        assert_eq!(
            request.url().query(),
            Some("name=S%C3%A3o+Paulo&count=5&language=en&format=json")
        );
    }

    #[test]
    fn search_request_uses_configured_language() {
        let p = OpenMeteoProvider::new(
            "https://geo.test/v1/search".into(),
            "https://wx.test/v1/forecast".into(),
            "de".into(),
        );
        let request = p.search_request("Wien", 3).build().unwrap();
        assert_eq!(request.url().query(), Some("name=Wien&count=3&language=de&format=json"));
    }

    #[test]
    fn current_request_carries_coordinates_and_fields() {
        let request = provider("https://wx.test")
            .current_request(51.5, -0.12)
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/v1/forecast");
        assert_eq!(
            request.url().query(),
            Some(
                "latitude=51.5&longitude=-0.12&current=temperature_2m%2Crelative_humidity_2m%2C\
                 apparent_temperature%2Csurface_pressure%2Cwind_speed_10m%2Cweather_code"
            )
        );
    }

    #[tokio::test]
    async fn search_round_trips_over_http() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"results":[{"name":"London","country":"United Kingdom","latitude":51.5,"longitude":-0.12}]}"#,
        )
        .await;

        let candidates = provider(&base).search("Lond", 5).await.unwrap();
        assert_eq!(candidates[0].to_string(), "London, United Kingdom");

        let request_line = server.await.unwrap();
        assert_eq!(
            request_line,
            "GET /v1/search?name=Lond&count=5&language=en&format=json HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn non_success_status_maps_to_status_error() {
        let (base, server) = serve_once("503 Service Unavailable", "down").await;

        let err = provider(&base).current(51.5, -0.12).await.unwrap_err();
        match &err {
            ProviderError::Status { service, status, body } => {
                assert_eq!(*service, FORECAST);
                assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("status 503"));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = provider(&base).search("Lond", 5).await.unwrap_err();
        assert!(matches!(err, ProviderError::Request { .. }));
    }

    #[test]
    fn geocoding_maps_results() {
        let body = r#"{
            "results": [
                {"id": 2643743, "name": "London", "latitude": 51.50853, "longitude": -0.12574,
                 "country_code": "GB", "country": "United Kingdom", "admin1": "England"},
                {"id": 6058560, "name": "London", "latitude": 42.98339, "longitude": -81.23304,
                 "country": "Canada"}
            ],
            "generationtime_ms": 0.7
        }"#;

        let candidates = parse_geocoding(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].to_string(), "London, United Kingdom");
        assert_eq!(candidates[1].country, "Canada");
        assert!((candidates[0].latitude - 51.50853).abs() < 1e-9);
    }

    #[test]
    fn geocoding_without_results_is_empty() {
        assert!(parse_geocoding(r#"{"generationtime_ms": 0.2}"#).unwrap().is_empty());
        assert!(parse_geocoding(r#"{"results": []}"#).unwrap().is_empty());
    }

    #[test]
    fn geocoding_tolerates_missing_country() {
        let body = r#"{"results": [{"name": "Somewhere", "latitude": 1.0, "longitude": 2.0}]}"#;
        let candidates = parse_geocoding(body).unwrap();
        assert_eq!(candidates[0].country, "");
    }

    #[test]
    fn geocoding_rejects_garbage() {
        let err = parse_geocoding("<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn current_maps_fields_and_unit() {
        let body = r#"{
            "latitude": 51.5, "longitude": -0.12,
            "current_units": {"time": "iso8601", "temperature_2m": "°C", "relative_humidity_2m": "%",
                "apparent_temperature": "°C", "surface_pressure": "hPa", "wind_speed_10m": "km/h",
                "weather_code": "wmo code"},
            "current": {"time": "2024-05-01T12:00", "interval": 900, "temperature_2m": 15,
                "relative_humidity_2m": 70, "apparent_temperature": 14, "surface_pressure": 1012,
                "wind_speed_10m": 10, "weather_code": 3}
        }"#;

        let c = parse_current(body).unwrap();
        assert_eq!(c.temperature, 15.0);
        assert_eq!(c.apparent_temperature, 14.0);
        assert_eq!(c.humidity, 70.0);
        assert_eq!(c.pressure, 1012.0);
        assert_eq!(c.wind_speed, 10.0);
        assert_eq!(c.wind_speed_unit, "km/h");
        assert_eq!(c.weather_code, 3);
    }

    #[test]
    fn current_without_units_is_an_error() {
        let body = r#"{"current": {"temperature_2m": 15, "relative_humidity_2m": 70,
            "apparent_temperature": 14, "surface_pressure": 1012, "wind_speed_10m": 10,
            "weather_code": 3}}"#;
        assert!(matches!(parse_current(body), Err(ProviderError::Parse { .. })));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
