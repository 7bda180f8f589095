use chrono::Local;
use weather_core::{SearchQueryState, WeatherSnapshot, WeatherState, WeatherView};

pub fn suggestions(state: &SearchQueryState) -> String {
    if state.candidates.is_empty() {
        return "No suggestions.".to_string();
    }

    state
        .candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("  {}. {c}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn weather_panel(snap: &WeatherSnapshot) -> String {
    let view = WeatherView::from(snap);
    let fetched = snap.fetched_at.with_timezone(&Local).format("%H:%M");

    format!(
        "{title}\n  {temp}  {condition}\n  Feels like  {feels}\n  Wind speed  {wind}\n  Humidity    {humidity}\n  Pressure    {pressure}\n  (fetched {fetched})",
        title = view.title,
        temp = view.temperature,
        condition = view.condition,
        feels = view.feels_like,
        wind = view.wind,
        humidity = view.humidity,
        pressure = view.pressure,
    )
}

pub fn weather_state(state: &WeatherState) -> String {
    if let Some(err) = &state.error_message {
        return format!("Error: {err}");
    }

    match (&state.snapshot, state.loading) {
        (_, true) => "Loading weather...".to_string(),
        (Some(snap), false) => weather_panel(snap),
        (None, false) => String::new(),
    }
}
