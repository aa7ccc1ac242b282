//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: timestream_core::config::ConfigError,
    },

    /// The event file could not be loaded.
    #[error("event load error: {source}")]
    Load {
        /// The underlying loader error.
        #[from]
        source: crate::loader::LoadError,
    },

    /// Persona sampling failed.
    #[error("spawner error: {source}")]
    Spawner {
        /// The underlying spawner error.
        #[from]
        source: crate::spawner::SpawnError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: timestream_observer::ServerError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: timestream_core::runner::RunnerError,
    },
}
