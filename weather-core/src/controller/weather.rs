use log::{debug, warn};
use std::sync::Arc;

use super::{Sequence, Update, UpdateSender};
use crate::{
    error::ProviderError,
    model::{CurrentConditions, LocationCandidate, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Shown for every weather failure, whatever the cause.
pub const WEATHER_FETCH_FAILED: &str = "Failed to fetch weather data. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub snapshot: Option<WeatherSnapshot>,
    pub loading: bool,
    pub error_message: Option<String>,
}

/// What applying a weather update did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherOutcome {
    /// A newer selection was issued since; nothing changed.
    Stale,
    Resolved,
    Failed,
}

/// Holds the weather for the most recently selected location.
#[derive(Debug)]
pub struct WeatherController {
    state: WeatherState,
    provider: Arc<dyn WeatherProvider>,
    seq: Sequence,
    updates: UpdateSender,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn WeatherProvider>, updates: UpdateSender) -> Self {
        Self {
            state: WeatherState::default(),
            provider,
            seq: Sequence::default(),
            updates,
        }
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Start fetching weather for `candidate`. The previous snapshot stays
    /// visible until this fetch resolves. Must run inside a tokio runtime.
    pub fn select_location(&mut self, candidate: LocationCandidate) {
        self.state.loading = true;
        self.state.error_message = None;
        let seq = self.seq.next();

        let provider = Arc::clone(&self.provider);
        let updates = self.updates.clone();

        // Earlier fetches keep running; their results are dropped in `apply`.
        tokio::spawn(async move {
            debug!("weather lookup #{seq} for {candidate}");
            let result = provider
                .current(candidate.latitude, candidate.longitude)
                .await;
            let _ = updates.send(Update::Weather {
                seq,
                candidate,
                result,
            });
        });
    }

    pub fn apply(
        &mut self,
        seq: u64,
        candidate: &LocationCandidate,
        result: Result<CurrentConditions, ProviderError>,
    ) -> WeatherOutcome {
        if !self.seq.is_current(seq) {
            debug!("discarding stale weather #{seq} for {candidate}");
            return WeatherOutcome::Stale;
        }

        self.state.loading = false;

        match result {
            Ok(conditions) => {
                self.state.snapshot = Some(WeatherSnapshot::new(conditions, candidate));
                self.state.error_message = None;
                WeatherOutcome::Resolved
            }
            Err(err) => {
                warn!("weather for {candidate} unavailable: {err}");
                self.state.snapshot = None;
                self.state.error_message = Some(WEATHER_FETCH_FAILED.to_string());
                WeatherOutcome::Failed
            }
        }
    }
}
