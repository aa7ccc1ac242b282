//! Activity model, generation pipeline, and tick cycle for the TimeStream
//! persona simulation.
//!
//! The crate decides *when* a persona posts (a self-exciting activity
//! model over post histories and scheduled events) and *what* gets posted
//! (a two-pass scratchpad/render pipeline, scored and gated).
//!
//! # Modules
//!
//! - [`activity`] -- Per-persona posting intensity and bounded histories.
//! - [`clock`] -- Tick counter and simulation time.
//! - [`cognition`] -- Scratchpad construction (first generation pass).
//! - [`config`] -- Configuration loading from `timestream-config.yaml`.
//! - [`gate`] -- Generate, score, and accept or suppress.
//! - [`lexicon`] -- Period vocabulary loading.
//! - [`render`] -- Public text rendering, anachronism filter, lexicon ratio.
//! - [`runner`] -- Async simulation loop with tick callbacks.
//! - [`scorer`] -- Temporal, voice, and consistency scores.
//! - [`settings`] -- Runtime-adjustable generation settings.
//! - [`social`] -- Follower index.
//! - [`tick`] -- One round of selection and generation.
//! - [`timeline`] -- Event ordering and arrival times.
//! - [`unit`] -- Clamping and rounding helpers.

pub mod activity;
pub mod clock;
pub mod cognition;
pub mod config;
pub mod gate;
pub mod lexicon;
pub mod render;
pub mod runner;
pub mod scorer;
pub mod settings;
pub mod social;
pub mod tick;
pub mod timeline;
pub mod unit;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::ActivityModel;
pub use config::{ConfigError, SimulationConfig};
pub use gate::{GenerationOutcome, GenerationRequest, generate};
pub use lexicon::Lexicon;
pub use settings::RuntimeSettings;
