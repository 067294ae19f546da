//! Dashboard application state.
//!
//! An explicit message-dispatch state machine: the event loop translates
//! terminal input and the load completion into [`Msg`] values, and
//! [`App::update`] runs each message to completion before the next is
//! dispatched. All state lives here; drawing reads it and never mutates.

use crate::dataset::{Dataset, DistrictRecord};
use crate::error::Error;
use crate::history::RateHistory;
use crate::search::{self, is_searchable};

/// Page-level lifecycle of the dashboard.
///
/// `Loading` moves to `Ready` on load success and `Failed` on load
/// failure. `Failed` is terminal for the session: the dashboard keeps
/// running but no data operation can succeed.
#[derive(Debug)]
pub enum Phase {
    /// The dataset load is still in flight.
    Loading,
    /// The dataset snapshot is loaded and searchable.
    Ready(Dataset),
    /// The dataset could not be loaded; the message is shown persistently.
    Failed(String),
}

/// A single dispatched event.
#[derive(Debug)]
pub enum Msg {
    /// The startup load finished.
    DataLoaded(Result<Dataset, Error>),
    /// A printable character was typed into the search box.
    QueryChar(char),
    /// Backspace in the search box.
    QueryBackspace,
    /// Move the result selection up.
    MoveUp,
    /// Move the result selection down.
    MoveDown,
    /// Select the highlighted search result.
    Select,
    /// Hide the results panel (interaction outside the search widget).
    Dismiss,
    /// Quit the dashboard.
    Quit,
}

/// The dashboard state container.
///
/// Owns the one loaded snapshot; every reader borrows from it.
#[derive(Debug)]
pub struct App {
    phase: Phase,
    query: String,
    results_open: bool,
    selected: usize,
    detail: Option<RateHistory>,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create the initial (loading, no data) state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            query: String::new(),
            results_open: false,
            selected: 0,
            detail: None,
            should_quit: false,
        }
    }

    /// Apply one message, running it to completion.
    pub fn update(&mut self, msg: Msg) {
        match msg {
            Msg::DataLoaded(Ok(dataset)) => {
                if matches!(self.phase, Phase::Loading) {
                    self.phase = Phase::Ready(dataset);
                }
            }
            Msg::DataLoaded(Err(err)) => {
                if matches!(self.phase, Phase::Loading) {
                    self.phase = Phase::Failed(err.to_string());
                }
            }
            Msg::QueryChar(c) => {
                self.query.push(c);
                self.on_query_changed();
            }
            Msg::QueryBackspace => {
                self.query.pop();
                self.on_query_changed();
            }
            Msg::MoveUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Msg::MoveDown => {
                let count = self.matches().len();
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            Msg::Select => self.select_highlighted(),
            Msg::Dismiss => {
                self.results_open = false;
            }
            Msg::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// The records of the loaded snapshot; empty until the load succeeds.
    #[must_use]
    pub fn records(&self) -> &[DistrictRecord] {
        match &self.phase {
            Phase::Ready(dataset) => dataset.records(),
            Phase::Loading | Phase::Failed(_) => &[],
        }
    }

    /// Current matches for the results panel.
    ///
    /// Empty whenever the panel is hidden; the panel itself renders a
    /// placeholder row when this is empty while the panel is open.
    #[must_use]
    pub fn matches(&self) -> Vec<&DistrictRecord> {
        if !self.results_open {
            return Vec::new();
        }
        search::search(self.records(), &self.query)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Current search box contents.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the results panel is visible.
    #[must_use]
    pub fn results_open(&self) -> bool {
        self.results_open
    }

    /// Index of the highlighted result.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The currently rendered district history, if one was selected.
    #[must_use]
    pub fn detail(&self) -> Option<&RateHistory> {
        self.detail.as_ref()
    }

    /// Whether the event loop should exit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn on_query_changed(&mut self) {
        // Queries below the length threshold suppress the search entirely.
        self.results_open = is_searchable(&self.query);
        self.selected = 0;
    }

    fn select_highlighted(&mut self) {
        if !self.results_open {
            return;
        }
        let chosen = self.matches().get(self.selected).map(|r| (*r).clone());
        if let Some(record) = chosen {
            self.query = record.name.clone();
            self.detail = Some(RateHistory::derive(&record));
            self.results_open = false;
            self.selected = 0;
        }
    }
}
