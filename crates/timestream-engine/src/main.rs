//! Engine binary for the TimeStream persona simulation.
//!
//! This is the main entry point that wires together configuration, the
//! event timeline, the persona population, the observer API, and the tick
//! loop. It runs until the tick limit is reached or the process receives
//! Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `timestream-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load events and the period lexicon
//! 4. Sample the persona population
//! 5. Create runtime settings and start the Observer API server
//! 6. Run the simulation loop
//! 7. Log the result

mod error;
mod loader;
mod observer_callback;
mod spawner;

use std::path::Path;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use timestream_core::config::SimulationConfig;
use timestream_core::runner;
use timestream_core::tick::SimulationState;
use timestream_core::{Lexicon, RuntimeSettings};
use timestream_observer::{AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Configuration file read from the working directory.
const CONFIG_PATH: &str = "timestream-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is configured from it, so this comes first.
    let loaded = load_config(Path::new(CONFIG_PATH))?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_else(|| {
        let mut defaults = SimulationConfig::default();
        defaults.infrastructure.apply_env_overrides();
        defaults
    });

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"))
        }))
        .with_target(true)
        .init();

    info!("timestream-engine starting");
    if !found {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        era = config.world.era,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.world.max_ticks,
        "Configuration loaded"
    );

    // 3. Load events and lexicon.
    let events = loader::load_events(Path::new(&config.data.events_path))
        .map_err(EngineError::from)?;
    let lexicon = Lexicon::load(&config.data.lexicon_path);

    // 4. Sample personas.
    let mut rng = StdRng::seed_from_u64(config.world.seed);
    let count = usize::try_from(config.population.persona_count).unwrap_or(usize::MAX);
    let personas = spawner::sample_personas(
        count,
        &config.world.era,
        &config.population.regions,
        &mut rng,
    )
    .map_err(EngineError::from)?;

    // 5. Runtime settings and Observer API server.
    let settings = Arc::new(RuntimeSettings::from_config(&config.generation));
    let app_state = Arc::new(AppState::new(Arc::clone(&settings)));
    {
        let mut snap = app_state.snapshot.write().await;
        snap.personas.clone_from(&personas);
        snap.events.clone_from(&events);
        snap.era.clone_from(&config.world.era);
    }
    let _observer_handle = timestream_observer::spawn_observer(
        ServerConfig::from(&config.infrastructure),
        Arc::clone(&app_state),
    )
    .map_err(EngineError::from)?;

    // Ctrl-C asks the runner to stop after the current tick.
    {
        let settings = Arc::clone(&settings);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    settings.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    // 6. Run the simulation.
    let mut sim_state = SimulationState::new(&config, personas, events, lexicon);
    let mut callback = ObserverCallback::new(app_state);

    info!(
        personas = sim_state.personas.len(),
        events = sim_state.events.len(),
        lexicon_words = sim_state.lexicon.len(),
        "Simulation state assembled, entering tick loop"
    );

    let result = runner::run_simulation(
        &mut sim_state,
        &config.world,
        &settings,
        &mut rng,
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "timestream-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from `path`.
///
/// Returns `None` when the file does not exist so the caller can fall back
/// to defaults.
fn load_config(path: &Path) -> Result<Option<SimulationConfig>, EngineError> {
    if path.exists() {
        Ok(Some(SimulationConfig::from_file(path)?))
    } else {
        Ok(None)
    }
}
