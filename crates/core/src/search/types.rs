//! Types for the debounced query controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::place::Place;

/// Lifecycle phase of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPhase {
    /// No query in progress and no results showing.
    Idle,
    /// Input is non-blank; a request is scheduled or in flight.
    Pending,
    /// The last accepted response has been applied. An empty candidate
    /// list is still `Ready`, not `Failed`.
    Ready,
    /// The last accepted response was an error.
    Failed,
}

/// A whole-value snapshot of the controller state.
///
/// Published through a watch channel so consumers always observe term,
/// candidates and phase together, never a partial update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySnapshot {
    /// Raw input text, updated synchronously on every keystroke.
    pub term: String,
    /// Candidates from the last accepted response, most relevant first.
    pub candidates: Vec<Place>,
    pub phase: QueryPhase,
}

impl QuerySnapshot {
    pub(crate) fn new(term: String) -> Self {
        Self {
            term,
            candidates: Vec::new(),
            phase: QueryPhase::Idle,
        }
    }

    /// Whether the results dropdown should be showing.
    ///
    /// Derived, not stored: visible while a request is pending (so the
    /// loading row shows without delay) or once results are in.
    pub fn dropdown_visible(&self) -> bool {
        match self.phase {
            QueryPhase::Pending => true,
            QueryPhase::Ready => !self.candidates.is_empty(),
            QueryPhase::Idle | QueryPhase::Failed => false,
        }
    }
}

/// Tunables for the query controller.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Quiescence window after the last keystroke before a request
    /// is issued.
    pub debounce_window: Duration,
    /// Cap on candidates kept from an accepted response.
    pub max_candidates: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(300),
            max_candidates: 5,
        }
    }
}
