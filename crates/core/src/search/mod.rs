//! Debounced place search.
//!
//! This module owns the text input state: it coalesces keystrokes into at
//! most one geocode request per quiescence window and guarantees the UI only
//! ever reflects the response to the most recently issued request.

mod controller;
mod types;

pub use controller::QueryController;
pub use types::{QueryOptions, QueryPhase, QuerySnapshot};
