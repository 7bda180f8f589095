//! Search and weather controllers.
//!
//! Controllers own their state and spawn lookups onto the runtime. Results
//! never touch state from the spawned task: they come back as [`Update`]s over
//! a channel and are applied by whoever drives the session, so all mutation
//! happens on one logical loop.

use tokio::sync::mpsc;

use crate::{
    error::ProviderError,
    model::{CurrentConditions, LocationCandidate},
};

pub mod search;
pub mod weather;

pub use search::{SearchController, SearchOptions, SearchQueryState};
pub use weather::{WEATHER_FETCH_FAILED, WeatherController, WeatherOutcome, WeatherState};

/// Result of a spawned lookup, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub enum Update {
    Suggestions {
        seq: u64,
        query: String,
        result: Result<Vec<LocationCandidate>, ProviderError>,
    },
    Weather {
        seq: u64,
        candidate: LocationCandidate,
        result: Result<CurrentConditions, ProviderError>,
    },
}

pub type UpdateSender = mpsc::UnboundedSender<Update>;

/// Monotonic request counter. Only the most recently issued number is current.
#[derive(Debug, Default)]
pub struct Sequence(u64);

impl Sequence {
    pub fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.0 == seq
    }
}
