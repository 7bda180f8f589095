use log::{debug, warn};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;

use super::{Sequence, Update, UpdateSender};
use crate::{Config, error::ProviderError, model::LocationCandidate, provider::Geocoder};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQueryState {
    pub raw_input: String,
    pub candidates: Vec<LocationCandidate>,
    /// True while a lookup is scheduled or in flight.
    pub is_loading: bool,
    /// Suggestion failures are silent, so this stays `None`.
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub suggestion_count: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_chars: config.min_query_chars,
            suggestion_count: config.suggestion_count,
        }
    }
}

/// Debounced search-as-you-type over a [`Geocoder`].
///
/// At most one lookup is pending at a time; every keystroke aborts it and
/// issues a new sequence number, so results of superseded lookups are dropped
/// even if their request already went out.
#[derive(Debug)]
pub struct SearchController {
    state: SearchQueryState,
    geocoder: Arc<dyn Geocoder>,
    options: SearchOptions,
    seq: Sequence,
    pending: Option<JoinHandle<()>>,
    updates: UpdateSender,
}

impl SearchController {
    pub fn new(geocoder: Arc<dyn Geocoder>, options: SearchOptions, updates: UpdateSender) -> Self {
        Self {
            state: SearchQueryState::default(),
            geocoder,
            options,
            seq: Sequence::default(),
            pending: None,
            updates,
        }
    }

    pub fn state(&self) -> &SearchQueryState {
        &self.state
    }

    pub fn candidate(&self, index: usize) -> Option<&LocationCandidate> {
        self.state.candidates.get(index)
    }

    /// Record the new input and reschedule the lookup. Must run inside a tokio runtime.
    pub fn on_input_change(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.raw_input = text.clone();
        self.cancel_pending();
        let seq = self.seq.next();

        if text.chars().count() < self.options.min_query_chars {
            self.state.candidates.clear();
            self.state.is_loading = false;
            return;
        }

        self.state.is_loading = true;

        let geocoder = Arc::clone(&self.geocoder);
        let updates = self.updates.clone();
        let SearchOptions {
            debounce,
            suggestion_count,
            ..
        } = self.options;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!("geocoding lookup #{seq} for {text:?}");

            let result = geocoder.search(&text, suggestion_count).await;
            // A closed channel means the session is gone; nothing left to update.
            let _ = updates.send(Update::Suggestions {
                seq,
                query: text,
                result,
            });
        }));
    }

    /// Replace the input text without triggering a lookup, e.g. after a
    /// suggestion was picked. Any pending lookup is abandoned.
    pub fn replace_input(&mut self, text: impl Into<String>) {
        self.state.raw_input = text.into();
        self.abandon_lookup();
    }

    /// Drop any scheduled or in-flight lookup, keeping input and suggestions.
    pub fn abandon_lookup(&mut self) {
        self.cancel_pending();
        self.seq.next();
        self.state.is_loading = false;
    }

    /// Hide the current suggestions.
    pub fn dismiss(&mut self) {
        self.state.candidates.clear();
    }

    /// Apply a finished lookup. Returns false if it was superseded.
    pub fn apply(
        &mut self,
        seq: u64,
        query: &str,
        result: Result<Vec<LocationCandidate>, ProviderError>,
    ) -> bool {
        if !self.seq.is_current(seq) {
            debug!("discarding stale suggestions #{seq} for {query:?}");
            return false;
        }

        self.pending = None;
        self.state.is_loading = false;

        match result {
            Ok(candidates) => {
                debug!("{} suggestion(s) for {query:?}", candidates.len());
                self.state.candidates = candidates;
            }
            Err(err) => {
                warn!("suggestions for {query:?} unavailable: {err}");
                self.state.candidates.clear();
            }
        }

        true
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
