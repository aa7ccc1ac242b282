//! Self-exciting activity model deciding *when* personas post.
//!
//! The posting rate of a persona at time `t` is built from four parts:
//!
//! 1. a base rate,
//! 2. a Hawkes-style self-excitation term over the persona's own most
//!    recent posts (bursty re-posting),
//! 3. a coarse population contagion bonus counting personas that posted
//!    very recently,
//! 4. spikes for freshly arrived historical events, amplified when the
//!    event happened in the persona's own region,
//!
//! and the sum is scaled by a per-region bias. The result is an unclamped
//! rate; the tick loop turns it into a trigger probability with
//! [`trigger_probability`].
//!
//! The model owns the bounded post history of every persona. Histories
//! are only written through [`ActivityModel::register_post`].

use std::collections::{BTreeMap, VecDeque};

use timestream_types::{Event, Persona, PersonaId};

use crate::config::ActivityConfig;
use crate::social::SocialIndex;
use crate::timeline::{self, ScheduledEvent};
use crate::unit::clamp_unit;

/// Activity-intensity model with per-persona post history.
#[derive(Debug, Clone)]
pub struct ActivityModel {
    /// Model parameters.
    config: ActivityConfig,
    /// Post timestamps per persona, oldest first, bounded by
    /// `config.history_capacity`.
    histories: BTreeMap<PersonaId, VecDeque<f64>>,
    /// Events with their arrival times.
    schedule: Vec<ScheduledEvent>,
    /// Follower index, built once at construction.
    social: SocialIndex,
}

impl ActivityModel {
    /// Create a model for `personas`, scheduling `events` from
    /// `origin_time`.
    pub fn new(
        personas: &[Persona],
        events: &[Event],
        origin_time: f64,
        config: ActivityConfig,
    ) -> Self {
        let schedule =
            timeline::schedule_with_interval(events, origin_time, config.event_interval_secs);
        let histories = personas
            .iter()
            .map(|p| (p.id.clone(), VecDeque::new()))
            .collect();
        Self {
            config,
            histories,
            schedule,
            social: SocialIndex::build(personas),
        }
    }

    /// Posting rate of `persona` at simulation time `t`.
    ///
    /// Never below the base rate as long as every configured region bias
    /// is at least 1.0. Not clamped: callers derive a probability with
    /// [`trigger_probability`].
    pub fn intensity(&self, persona: &Persona, t: f64) -> f64 {
        let mut lambda = self.config.base_rate;
        lambda += self.self_excitation(&persona.id, t);
        lambda += self.contagion(t);
        lambda += self.event_spikes(persona, t);
        lambda * self.region_bias(&persona.region)
    }

    /// Record that `persona_id` posted at time `t`.
    ///
    /// The oldest entry is evicted once the history exceeds its capacity.
    pub fn register_post(&mut self, persona_id: &PersonaId, t: f64) {
        let capacity = self.config.history_capacity.max(1);
        let history = self.histories.entry(persona_id.clone()).or_default();
        history.push_back(t);
        while history.len() > capacity {
            history.pop_front();
        }
    }

    /// Post timestamps of `persona_id`, oldest first.
    pub fn history(&self, persona_id: &PersonaId) -> Vec<f64> {
        self.histories
            .get(persona_id)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of retained post timestamps for `persona_id`.
    pub fn history_len(&self, persona_id: &PersonaId) -> usize {
        self.histories.get(persona_id).map_or(0, VecDeque::len)
    }

    /// Time of the most recent post by `persona_id`.
    pub fn last_post_time(&self, persona_id: &PersonaId) -> Option<f64> {
        self.histories
            .get(persona_id)
            .and_then(|h| h.back().copied())
    }

    /// Multiplier for `region`; 1.0 when the region is not listed.
    pub fn region_bias(&self, region: &str) -> f64 {
        self.config.region_bias.get(region).copied().unwrap_or(1.0)
    }

    /// The event schedule.
    pub fn schedule(&self) -> &[ScheduledEvent] {
        &self.schedule
    }

    /// Personas following `persona_id`.
    pub fn followers_of(&self, persona_id: &PersonaId) -> &[PersonaId] {
        self.social.followers_of(persona_id)
    }

    /// The follower index.
    pub const fn social(&self) -> &SocialIndex {
        &self.social
    }

    /// Model parameters.
    pub const fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Decaying boost from the persona's own most recent posts.
    fn self_excitation(&self, persona_id: &PersonaId, t: f64) -> f64 {
        let Some(history) = self.histories.get(persona_id) else {
            return 0.0;
        };
        let tau = self.config.decay_tau.max(f64::EPSILON);
        history
            .iter()
            .rev()
            .take(self.config.recent_window)
            .map(|&ts| self.config.self_boost * (-(t - ts) / tau).exp())
            .sum()
    }

    /// Bonus for how many personas posted within the contagion window.
    ///
    /// Scans every history; cost grows with the population size.
    fn contagion(&self, t: f64) -> f64 {
        let mut recent: u32 = 0;
        for &latest in self.histories.values().filter_map(VecDeque::back) {
            if t - latest < self.config.contagion_window {
                recent = recent.saturating_add(1);
            }
        }
        (f64::from(recent) * self.config.contagion_per_persona).min(self.config.contagion_cap)
    }

    /// Spikes for events that arrived within the spike window.
    fn event_spikes(&self, persona: &Persona, t: f64) -> f64 {
        let tau = self.config.event_spike_tau.max(f64::EPSILON);
        self.schedule
            .iter()
            .filter_map(|entry| {
                let dt = t - entry.arrival_time;
                if !(0.0..self.config.event_spike_window).contains(&dt) {
                    return None;
                }
                let mut spike = self.config.event_spike * (-dt / tau).exp();
                if persona.region == entry.event.region {
                    spike *= self.config.home_region_multiplier;
                }
                Some(spike)
            })
            .sum()
    }
}

/// Turn a rate into a per-tick trigger probability, capped at `ceiling`.
pub fn trigger_probability(intensity: f64, ceiling: f64) -> f64 {
    clamp_unit(intensity.min(ceiling))
}
