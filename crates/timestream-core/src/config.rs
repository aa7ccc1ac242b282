//! Configuration loading and typed config structures for the TimeStream
//! simulation.
//!
//! The canonical configuration lives in `timestream-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every section is optional; anything left out falls back to the defaults
//! below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use timestream_types::EraFeatures;

/// Era key used when a requested era has no feature entry.
pub const DEFAULT_ERA: &str = "1914-08";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `timestream-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, era, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Population bootstrap parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Activity-intensity model parameters.
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Generation pipeline and tick-selection parameters.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Era-keyed platform feature table.
    #[serde(default)]
    pub eras: EraFeatureTable,

    /// Locations of the event file and lexicon.
    #[serde(default)]
    pub data: DataConfig,

    /// Network settings for the observer server.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the observer bind
    /// address:
    /// - `OBSERVER_HOST` overrides `infrastructure.observer_host`
    /// - `OBSERVER_PORT` overrides `infrastructure.observer_port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml reads an empty document as a unit value, not a map.
        if yaml.trim().is_empty() {
            let mut config = Self::default();
            config.infrastructure.apply_env_overrides();
            return Ok(config);
        }
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Era the population posts from.
    #[serde(default = "default_era")]
    pub era: String,

    /// Real-time milliseconds per tick. Simulation time advances by the
    /// same amount (in seconds) each tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            era: default_era(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Population bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of personas sampled at startup.
    #[serde(default = "default_persona_count")]
    pub persona_count: u32,

    /// Regions personas are drawn from.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            persona_count: default_persona_count(),
            regions: default_regions(),
        }
    }
}

/// Parameters of the self-exciting activity model.
///
/// Time quantities are in simulation seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityConfig {
    /// Base posting rate (lambda zero).
    #[serde(default = "default_base_rate")]
    pub base_rate: f64,

    /// Boost contributed by each recent own post at zero age.
    #[serde(default = "default_self_boost")]
    pub self_boost: f64,

    /// Declared follow-based contagion coefficient. Carried as
    /// configuration only; the intensity formula does not read it.
    #[serde(default = "default_follow_boost")]
    pub follow_boost: f64,

    /// Decay constant of the self-excitation kernel.
    #[serde(default = "default_decay_tau")]
    pub decay_tau: f64,

    /// Multiplier per region; unlisted regions use 1.0.
    #[serde(default = "default_region_bias")]
    pub region_bias: BTreeMap<String, f64>,

    /// Number of post timestamps retained per persona.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Number of most recent posts feeding the self-excitation term.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// A persona counts as recently active if its latest post is younger
    /// than this.
    #[serde(default = "default_contagion_window")]
    pub contagion_window: f64,

    /// Contagion bonus per recently active persona.
    #[serde(default = "default_contagion_per_persona")]
    pub contagion_per_persona: f64,

    /// Upper bound of the contagion bonus.
    #[serde(default = "default_contagion_cap")]
    pub contagion_cap: f64,

    /// Spacing between consecutive event arrivals.
    #[serde(default = "default_event_interval_secs")]
    pub event_interval_secs: f64,

    /// How long an arrived event keeps spiking intensity.
    #[serde(default = "default_event_spike_window")]
    pub event_spike_window: f64,

    /// Spike height at arrival.
    #[serde(default = "default_event_spike")]
    pub event_spike: f64,

    /// Decay constant of the event spike.
    #[serde(default = "default_event_spike_tau")]
    pub event_spike_tau: f64,

    /// Spike multiplier when the event happened in the persona's region.
    #[serde(default = "default_home_region_multiplier")]
    pub home_region_multiplier: f64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            self_boost: default_self_boost(),
            follow_boost: default_follow_boost(),
            decay_tau: default_decay_tau(),
            region_bias: default_region_bias(),
            history_capacity: default_history_capacity(),
            recent_window: default_recent_window(),
            contagion_window: default_contagion_window(),
            contagion_per_persona: default_contagion_per_persona(),
            contagion_cap: default_contagion_cap(),
            event_interval_secs: default_event_interval_secs(),
            event_spike_window: default_event_spike_window(),
            event_spike: default_event_spike(),
            event_spike_tau: default_event_spike_tau(),
            home_region_multiplier: default_home_region_multiplier(),
        }
    }
}

/// Generation pipeline and per-tick selection parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    /// Initial reflectiveness in `[0, 1]`.
    #[serde(default = "default_reflectiveness")]
    pub reflectiveness: f64,

    /// Initial creativity in `[0, 1]`.
    #[serde(default = "default_creativity")]
    pub creativity: f64,

    /// Whether posts carry the scratchpad and scores.
    #[serde(default)]
    pub debug_meta: bool,

    /// Maximum generation attempts processed per tick.
    #[serde(default = "default_max_attempts_per_tick")]
    pub max_attempts_per_tick: usize,

    /// Ceiling applied to intensity before it is used as a trigger
    /// probability.
    #[serde(default = "default_trigger_ceiling")]
    pub trigger_ceiling: f64,

    /// An event is the tick's grounding event while younger than this.
    #[serde(default = "default_event_window_secs")]
    pub event_window_secs: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            reflectiveness: default_reflectiveness(),
            creativity: default_creativity(),
            debug_meta: false,
            max_attempts_per_tick: default_max_attempts_per_tick(),
            trigger_ceiling: default_trigger_ceiling(),
            event_window_secs: default_event_window_secs(),
        }
    }
}

/// Era-keyed platform feature table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EraFeatureTable(pub BTreeMap<String, EraFeatures>);

impl EraFeatureTable {
    /// Features for `era`, falling back to [`DEFAULT_ERA`] and then to the
    /// built-in defaults.
    pub fn features_for(&self, era: &str) -> EraFeatures {
        self.0
            .get(era)
            .or_else(|| self.0.get(DEFAULT_ERA))
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for EraFeatureTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(DEFAULT_ERA.to_owned(), EraFeatures::default());
        Self(table)
    }
}

/// Locations of the external data files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataConfig {
    /// JSON array of historical events.
    #[serde(default = "default_events_path")]
    pub events_path: String,

    /// Newline-separated period lexicon.
    #[serde(default = "default_lexicon_path")]
    pub lexicon_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
            lexicon_path: default_lexicon_path(),
        }
    }
}

/// Observer server bind address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Host the observer binds to.
    #[serde(default = "default_observer_host")]
    pub observer_host: String,

    /// Observer HTTP/WebSocket port.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl InfrastructureConfig {
    /// Override the bind address with environment variables when set.
    ///
    /// An `OBSERVER_PORT` that does not parse as a port is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OBSERVER_HOST") {
            self.observer_host = val;
        }
        if let Some(port) = std::env::var("OBSERVER_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
        {
            self.observer_port = port;
        }
    }
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            observer_host: default_observer_host(),
            observer_port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "TimeStream 2-Pass".to_owned()
}

const fn default_seed() -> u64 {
    42
}

fn default_era() -> String {
    DEFAULT_ERA.to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_persona_count() -> u32 {
    60
}

fn default_regions() -> Vec<String> {
    vec![
        "Europe-West".to_owned(),
        "Europe-Central".to_owned(),
        "Europe-Balkans".to_owned(),
        "Europe-North".to_owned(),
        "Europe-South".to_owned(),
    ]
}

const fn default_base_rate() -> f64 {
    0.03
}

const fn default_self_boost() -> f64 {
    0.06
}

const fn default_follow_boost() -> f64 {
    0.04
}

const fn default_decay_tau() -> f64 {
    12.0
}

fn default_region_bias() -> BTreeMap<String, f64> {
    let mut m = BTreeMap::new();
    m.insert("Europe-Balkans".to_owned(), 1.1);
    m
}

const fn default_history_capacity() -> usize {
    50
}

const fn default_recent_window() -> usize {
    5
}

const fn default_contagion_window() -> f64 {
    6.0
}

const fn default_contagion_per_persona() -> f64 {
    0.001
}

const fn default_contagion_cap() -> f64 {
    0.1
}

const fn default_event_interval_secs() -> f64 {
    10.0
}

const fn default_event_spike_window() -> f64 {
    15.0
}

const fn default_event_spike() -> f64 {
    0.15
}

const fn default_event_spike_tau() -> f64 {
    6.0
}

const fn default_home_region_multiplier() -> f64 {
    1.6
}

const fn default_reflectiveness() -> f64 {
    0.6
}

const fn default_creativity() -> f64 {
    0.4
}

const fn default_max_attempts_per_tick() -> usize {
    4
}

const fn default_trigger_ceiling() -> f64 {
    0.5
}

const fn default_event_window_secs() -> f64 {
    6.0
}

fn default_events_path() -> String {
    "data/events_1914.json".to_owned()
}

fn default_lexicon_path() -> String {
    "data/lexicon_1910s_en.txt".to_owned()
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.era, DEFAULT_ERA);
        assert_eq!(config.population.persona_count, 60);
        assert_eq!(config.population.regions.len(), 5);
        assert_eq!(config.activity.history_capacity, 50);
        assert_eq!(config.generation.max_attempts_per_tick, 4);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Stream"
  seed: 123
  era: "1914-08"
  tick_interval_ms: 250
  max_ticks: 20

population:
  persona_count: 12
  regions:
    - Europe-West
    - Europe-Balkans

activity:
  base_rate: 0.05
  self_boost: 0.08
  decay_tau: 10.0
  region_bias:
    Europe-Balkans: 1.2
    Europe-North: 0.9

generation:
  reflectiveness: 0.7
  creativity: 0.2
  debug_meta: true
  max_attempts_per_tick: 2

eras:
  "1914-08":
    hashtags: false
    retweet_prefix: "RT"
    quote_tweet: false
    max_chars: 120

data:
  events_path: "fixtures/events.json"
  lexicon_path: "fixtures/lexicon.txt"

infrastructure:
  observer_port: 9090

logging:
  level: "debug"
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Test Stream");
        assert_eq!(config.world.seed, 123);
        assert_eq!(config.world.max_ticks, 20);
        assert_eq!(config.population.persona_count, 12);
        assert_eq!(config.activity.region_bias.len(), 2);
        assert!(config.generation.debug_meta);
        assert_eq!(config.generation.max_attempts_per_tick, 2);
        assert_eq!(config.eras.features_for("1914-08").max_chars, 120);
        assert_eq!(config.data.events_path, "fixtures/events.json");
        assert_eq!(config.logging.level, "debug");
        // Untouched fields keep their defaults.
        assert_eq!(config.activity.history_capacity, 50);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "world:\n  seed: 7\n";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.tick_interval_ms, 1_000);
        assert_eq!(config.population.persona_count, 60);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn parse_invalid_yaml_is_an_error() {
        let config = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn unknown_era_falls_back_to_default_era() {
        let table = EraFeatureTable::default();
        let features = table.features_for("1999-01");
        assert_eq!(features, EraFeatures::default());

        let empty = EraFeatureTable(BTreeMap::new());
        assert_eq!(empty.features_for("1914-08").max_chars, 140);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("timestream-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
