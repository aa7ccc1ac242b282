//! Runtime-adjustable generation settings.
//!
//! Shared between the tick loop and the observer API. Reals are stored as
//! `f64` bit patterns in [`AtomicU64`] so neither side takes a lock.
//! Every write clamps to `[0, 1]`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::unit::clamp_unit;

/// Live settings for the generation pipeline.
#[derive(Debug)]
pub struct RuntimeSettings {
    /// Reflectiveness as `f64` bits.
    reflectiveness: AtomicU64,
    /// Creativity as `f64` bits.
    creativity: AtomicU64,
    /// Whether clients receive debug payloads by default.
    debug_meta: AtomicBool,
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
}

/// Point-in-time copy of [`RuntimeSettings`], as served over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    /// Global reflectiveness.
    pub reflectiveness: f64,
    /// Global creativity.
    pub creativity: f64,
    /// Default debug payload visibility.
    pub debug_meta: bool,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SettingsUpdate {
    /// New reflectiveness.
    #[serde(default)]
    pub reflectiveness: Option<f64>,
    /// New creativity.
    #[serde(default)]
    pub creativity: Option<f64>,
    /// New debug payload visibility.
    #[serde(default)]
    pub debug_meta: Option<bool>,
}

impl RuntimeSettings {
    /// Create settings with the given initial values, clamped.
    pub fn new(reflectiveness: f64, creativity: f64, debug_meta: bool) -> Self {
        Self {
            reflectiveness: AtomicU64::new(clamp_unit(reflectiveness).to_bits()),
            creativity: AtomicU64::new(clamp_unit(creativity).to_bits()),
            debug_meta: AtomicBool::new(debug_meta),
            stop_requested: AtomicBool::new(false),
        }
    }

    /// Create settings from the `generation` config section.
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.reflectiveness, config.creativity, config.debug_meta)
    }

    // -----------------------------------------------------------------------
    // Tunables
    // -----------------------------------------------------------------------

    /// Current reflectiveness.
    pub fn reflectiveness(&self) -> f64 {
        f64::from_bits(self.reflectiveness.load(Ordering::Acquire))
    }

    /// Set reflectiveness, clamped to `[0, 1]`.
    pub fn set_reflectiveness(&self, value: f64) {
        self.reflectiveness
            .store(clamp_unit(value).to_bits(), Ordering::Release);
    }

    /// Current creativity.
    pub fn creativity(&self) -> f64 {
        f64::from_bits(self.creativity.load(Ordering::Acquire))
    }

    /// Set creativity, clamped to `[0, 1]`.
    pub fn set_creativity(&self, value: f64) {
        self.creativity
            .store(clamp_unit(value).to_bits(), Ordering::Release);
    }

    /// Whether debug payloads are shown by default.
    pub fn debug_meta(&self) -> bool {
        self.debug_meta.load(Ordering::Acquire)
    }

    /// Toggle default debug payload visibility.
    pub fn set_debug_meta(&self, value: bool) {
        self.debug_meta.store(value, Ordering::Release);
    }

    /// Apply a partial update and return the resulting snapshot.
    pub fn apply(&self, update: SettingsUpdate) -> SettingsSnapshot {
        if let Some(r) = update.reflectiveness {
            self.set_reflectiveness(r);
        }
        if let Some(c) = update.creativity {
            self.set_creativity(c);
        }
        if let Some(d) = update.debug_meta {
            self.set_debug_meta(d);
        }
        self.snapshot()
    }

    /// Copy the current values.
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            reflectiveness: self.reflectiveness(),
            creativity: self.creativity(),
            debug_meta: self.debug_meta(),
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Ask the runner to stop after the current tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}
