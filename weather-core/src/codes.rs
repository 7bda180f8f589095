//! WMO weather interpretation codes as used by Open-Meteo.

/// Description used for codes missing from the table.
pub const UNKNOWN_CONDITION: &str = "Unknown";

// Sorted by code for binary search.
const WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Foggy"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (71, "Slight snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Human-readable condition for a weather code; never fails.
pub fn describe(code: i64) -> &'static str {
    WEATHER_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|idx| WEATHER_CODES[idx].1)
        .unwrap_or(UNKNOWN_CONDITION)
}
