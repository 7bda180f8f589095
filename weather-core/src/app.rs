use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    Config,
    controller::{
        SearchController, SearchOptions, SearchQueryState, Update, WeatherController,
        WeatherOutcome, WeatherState,
    },
    model::LocationCandidate,
    provider::{Geocoder, WeatherProvider, provider_from_config},
};

/// Which part of the session a resolved update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Changed {
    Suggestions,
    Weather,
}

/// One interactive session: a search box feeding a weather panel.
///
/// Owns both controllers and the receiving end of their update channel.
/// Drive it by forwarding user input and awaiting [`App::next_update`].
#[derive(Debug)]
pub struct App {
    search: SearchController,
    weather: WeatherController,
    updates: mpsc::UnboundedReceiver<Update>,
}

impl App {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        provider: Arc<dyn WeatherProvider>,
        config: &Config,
    ) -> Self {
        let (tx, updates) = mpsc::unbounded_channel();

        Self {
            search: SearchController::new(geocoder, SearchOptions::from(config), tx.clone()),
            weather: WeatherController::new(provider, tx),
            updates,
        }
    }

    /// Session backed by Open-Meteo for both lookups.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider.clone(), provider, config))
    }

    pub fn search(&self) -> &SearchQueryState {
        self.search.state()
    }

    pub fn weather(&self) -> &WeatherState {
        self.weather.state()
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.search.on_input_change(text);
    }

    /// Pick the suggestion at `index`. Returns false if there is none.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let Some(candidate) = self.search.candidate(index).cloned() else {
            return false;
        };
        self.search.replace_input(candidate.to_string());
        self.weather.select_location(candidate);
        true
    }

    /// Form submission: always the top suggestion, never free text. A lookup
    /// still pending for newer keystrokes is abandoned so it cannot bring the
    /// suggestions back after the weather resolves.
    pub fn submit(&mut self) -> bool {
        let Some(candidate) = self.search.candidate(0).cloned() else {
            return false;
        };
        self.search.abandon_lookup();
        self.weather.select_location(candidate);
        true
    }

    pub fn select_location(&mut self, candidate: LocationCandidate) {
        self.weather.select_location(candidate);
    }

    /// Apply one update. Returns `None` if it was stale.
    pub fn apply(&mut self, update: Update) -> Option<Changed> {
        match update {
            Update::Suggestions { seq, query, result } => self
                .search
                .apply(seq, &query, result)
                .then_some(Changed::Suggestions),
            Update::Weather {
                seq,
                candidate,
                result,
            } => match self.weather.apply(seq, &candidate, result) {
                WeatherOutcome::Stale => None,
                WeatherOutcome::Resolved => {
                    self.search.dismiss();
                    Some(Changed::Weather)
                }
                WeatherOutcome::Failed => Some(Changed::Weather),
            },
        }
    }

    /// Wait for the next update that actually changes state.
    pub async fn next_update(&mut self) -> Option<Changed> {
        loop {
            let update = self.updates.recv().await?;
            if let Some(changed) = self.apply(update) {
                return Some(changed);
            }
        }
    }
}
