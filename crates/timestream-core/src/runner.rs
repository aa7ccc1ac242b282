//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`run_tick`] until the tick limit is reached
//! or a stop is requested through [`RuntimeSettings`], sleeping the tick
//! interval between ticks. A [`TickCallback`] sees every completed tick.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::config::WorldConfig;
use crate::settings::RuntimeSettings;
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    StopRequested,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Total posts accepted over the run.
    pub total_posts: u64,
}

/// Callback invoked after each tick completes.
///
/// The engine uses this to push accepted posts to observers.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// `world.max_ticks == 0` runs until a stop is requested.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation<R: Rng + Send + ?Sized>(
    state: &mut SimulationState,
    world: &WorldConfig,
    settings: &Arc<RuntimeSettings>,
    rng: &mut R,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut total_posts: u64 = 0;

    info!(
        max_ticks = world.max_ticks,
        tick_interval_ms = world.tick_interval_ms,
        personas = state.personas.len(),
        events = state.events.len(),
        "Simulation starting"
    );

    loop {
        if settings.is_stop_requested() {
            info!("Stop requested");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::StopRequested,
                final_summary: last_summary,
                total_ticks,
                total_posts,
            });
        }

        let summary = tick::run_tick(state, settings, rng, Utc::now())?;
        total_ticks = total_ticks.saturating_add(1);
        total_posts =
            total_posts.saturating_add(u64::try_from(summary.posts.len()).unwrap_or(u64::MAX));

        callback.on_tick(&summary, state);

        if world.max_ticks > 0 && summary.tick >= world.max_ticks {
            info!(tick = summary.tick, max_ticks = world.max_ticks, "Tick limit reached");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
                total_posts,
            });
        }

        last_summary = Some(summary);

        if world.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(world.tick_interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        total_posts = result.total_posts,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );
    if result.final_summary.is_none() {
        warn!("Simulation ended with no ticks executed");
    }
}
