//! Historical event loading.
//!
//! Events live in a JSON array on disk. Order in the file is kept; the
//! timeline sorts by date when it schedules arrivals.

use std::path::Path;

use timestream_types::Event;
use tracing::info;

/// Errors that can occur when loading the event file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read event file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a JSON array of events.
    #[error("failed to parse event file {path}: {source}")]
    Json {
        /// Path that was parsed.
        path: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Parse events from a JSON array.
pub fn parse_events(json: &str) -> Result<Vec<Event>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Load events from the JSON file at `path`.
pub fn load_events(path: &Path) -> Result<Vec<Event>, LoadError> {
    let path_str = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path_str.clone(),
        source,
    })?;
    let events = parse_events(&contents).map_err(|source| LoadError::Json {
        path: path_str.clone(),
        source,
    })?;
    info!(path = path_str.as_str(), count = events.len(), "Events loaded");
    Ok(events)
}
