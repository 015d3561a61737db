//! Readiness of the in-memory dataset.
//!
//! Moves `Empty → Populating → Ready` on a successful load, or
//! `Populating → Failed` when fetching or parsing fails.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetState {
    /// No load attempted yet
    #[default]
    Empty,

    /// Download or parse in flight
    Populating,

    /// A complete dataset is live
    Ready,

    /// Last load attempt failed; dataset stays empty
    Failed,
}

impl DatasetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetState::Empty => "empty",
            DatasetState::Populating => "populating",
            DatasetState::Ready => "ready",
            DatasetState::Failed => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DatasetState::Ready)
    }
}

impl fmt::Display for DatasetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
