//! Tick cycle: one round of the cooperative posting loop.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter and simulation time.
//! 2. **Selection** -- evaluate every persona's activity intensity and run
//!    one Bernoulli trial per persona against the capped trigger
//!    probability.
//! 3. **Grounding** -- find the event that arrived within the event window,
//!    if any.
//! 4. **Generation** -- run the generation gate for at most
//!    `max_attempts_per_tick` selected personas, in population order, and
//!    register every accepted post with the activity model.
//!
//! The tick loop is the only writer of the activity model, so post
//! histories never see concurrent appends. Given the same state, settings
//! and seeded random source, a tick is deterministic apart from post ids.

use chrono::{DateTime, Utc};
use rand::Rng;
use timestream_types::{Event, EventId, Persona, Post};
use tracing::debug;

use crate::activity::{ActivityModel, trigger_probability};
use crate::clock::{ClockError, SimulationClock};
use crate::config::{EraFeatureTable, GenerationConfig, SimulationConfig};
use crate::gate::{self, GenerationOutcome, GenerationRequest};
use crate::lexicon::Lexicon;
use crate::settings::RuntimeSettings;
use crate::timeline;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulation time of the tick.
    pub sim_time: f64,
    /// Event in play during the tick.
    pub active_event: Option<EventId>,
    /// Personas whose trial fired.
    pub candidates: usize,
    /// Generation attempts actually made.
    pub attempted: usize,
    /// Attempts the gate suppressed.
    pub suppressed: usize,
    /// Posts accepted this tick, in generation order.
    pub posts: Vec<Post>,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// Tick counter and simulation time.
    pub clock: SimulationClock,
    /// Activity model and post histories.
    pub activity: ActivityModel,
    /// The population, immutable after bootstrap.
    pub personas: Vec<Persona>,
    /// The loaded events.
    pub events: Vec<Event>,
    /// Era every persona writes in.
    pub era: String,
    /// Period vocabulary.
    pub lexicon: Lexicon,
    /// Era feature table.
    pub eras: EraFeatureTable,
    /// Generation limits.
    pub generation: GenerationConfig,
}

impl SimulationState {
    /// Assemble the state for a fresh run with simulation origin 0.0.
    pub fn new(
        config: &SimulationConfig,
        personas: Vec<Persona>,
        events: Vec<Event>,
        lexicon: Lexicon,
    ) -> Self {
        let origin = 0.0;
        let activity = ActivityModel::new(&personas, &events, origin, config.activity.clone());
        Self {
            clock: SimulationClock::new(
                origin,
                std::time::Duration::from_millis(config.world.tick_interval_ms),
            ),
            activity,
            personas,
            events,
            era: config.world.era.clone(),
            lexicon,
            eras: config.eras.clone(),
            generation: config.generation.clone(),
        }
    }
}

/// Execute one tick.
///
/// Accepted posts always carry their debug payload; consumers strip it
/// per client.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows.
pub fn run_tick<R: Rng + ?Sized>(
    state: &mut SimulationState,
    settings: &RuntimeSettings,
    rng: &mut R,
    timestamp: DateTime<Utc>,
) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;
    let t = state.clock.sim_time();

    // --- Phase 2: Selection ---
    let ceiling = state.generation.trigger_ceiling;
    let mut selected: Vec<usize> = Vec::new();
    for (idx, persona) in state.personas.iter().enumerate() {
        let p = trigger_probability(state.activity.intensity(persona, t), ceiling);
        if rng.random::<f64>() < p {
            selected.push(idx);
        }
    }
    let candidates = selected.len();

    // --- Phase 3: Grounding ---
    let event = timeline::active_event(
        state.activity.schedule(),
        t,
        state.generation.event_window_secs,
    )
    .cloned();

    // --- Phase 4: Generation ---
    let reflectiveness = settings.reflectiveness();
    let creativity = settings.creativity();
    let mut attempted: usize = 0;
    let mut suppressed: usize = 0;
    let mut posts = Vec::new();

    for idx in selected
        .into_iter()
        .take(state.generation.max_attempts_per_tick)
    {
        let Some(persona) = state.personas.get(idx) else {
            continue;
        };
        attempted = attempted.saturating_add(1);
        let request = GenerationRequest {
            persona,
            era: &state.era,
            timestamp,
            event: event.as_ref(),
            lexicon: &state.lexicon,
            eras: &state.eras,
            reflectiveness,
            creativity,
            include_debug_meta: true,
        };
        match gate::generate(&request, rng) {
            GenerationOutcome::Posted(post) => {
                state.activity.register_post(&persona.id, t);
                posts.push(*post);
            }
            GenerationOutcome::Suppressed { .. } => {
                suppressed = suppressed.saturating_add(1);
            }
        }
    }

    debug!(
        tick,
        sim_time = t,
        candidates,
        attempted,
        suppressed,
        posted = posts.len(),
        event = event.as_ref().map(|e| e.id.as_str()),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        sim_time: t,
        active_event: event.map(|e| e.id),
        candidates,
        attempted,
        suppressed,
        posts,
    })
}
