use crate::model::WeatherSnapshot;

/// Display strings for the results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub title: String,
    pub temperature: String,
    pub condition: String,
    pub feels_like: String,
    pub wind: String,
    pub humidity: String,
    pub pressure: String,
}

impl From<&WeatherSnapshot> for WeatherView {
    fn from(snap: &WeatherSnapshot) -> Self {
        Self {
            title: format!("{}, {}", snap.location_name, snap.location_country),
            temperature: format!("{}°C", round(snap.temperature)),
            condition: snap.condition().to_string(),
            feels_like: format!("{}°C", round(snap.apparent_temperature)),
            wind: format!("{} {}", snap.wind_speed, snap.wind_speed_unit),
            humidity: format!("{}%", snap.humidity),
            pressure: format!("{} hPa", round(snap.pressure)),
        }
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}
