//! Core entity structs: personas, historical events, posts and the
//! per-attempt generation records.
//!
//! Field names match the JSON the dashboard consumes. Style and score
//! fields are plain `f64` values in `[0, 1]` (stances in `[-1, 1]`); the
//! functions that produce them clamp at the boundary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Feeling, Intent};
use crate::ids::{EventId, PersonaId, PostId};

/// Topic key used for a persona's stance on the war.
pub const WAR_TOPIC: &str = "war";

/// Neutral value for any missing cognitive-style trait.
pub const NEUTRAL_STYLE: f64 = 0.5;

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// How a persona writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VoiceStyle {
    /// Register of the prose, 0.0 (casual) to 1.0 (stiff).
    #[serde(default = "neutral_style")]
    pub formality: f64,
    /// Dialect tag, e.g. `EN_1910s`.
    #[serde(default)]
    pub dialect: String,
}

impl Default for VoiceStyle {
    fn default() -> Self {
        Self {
            formality: NEUTRAL_STYLE,
            dialect: String::new(),
        }
    }
}

/// How a persona thinks. Every trait lies in `[0, 1]`; traits missing
/// from the source data default to [`NEUTRAL_STYLE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CognitiveStyle {
    /// Tendency to deliberate before speaking.
    #[serde(default = "neutral_style")]
    pub reflectiveness: f64,
    /// Confidence in one's own opinions.
    #[serde(default = "neutral_style")]
    pub certainty: f64,
    /// Fondness for irony.
    #[serde(default = "neutral_style")]
    pub irony: f64,
    /// Willingness to say something risky.
    #[serde(default = "neutral_style")]
    pub risk_appetite: f64,
}

impl Default for CognitiveStyle {
    fn default() -> Self {
        Self {
            reflectiveness: NEUTRAL_STYLE,
            certainty: NEUTRAL_STYLE,
            irony: NEUTRAL_STYLE,
            risk_appetite: NEUTRAL_STYLE,
        }
    }
}

const fn neutral_style() -> f64 {
    NEUTRAL_STYLE
}

/// A simulated identity with fixed stance and style attributes.
///
/// Created once at population bootstrap and never mutated afterwards.
/// Social edges reference other personas by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Persona {
    /// Stable persona identifier.
    pub id: PersonaId,
    /// Public handle shown on posts.
    pub handle: String,
    /// Era key the persona belongs to, e.g. `1914-08`.
    #[serde(default)]
    pub era: String,
    /// Home region, e.g. `Europe-West`.
    pub region: String,
    /// Occupation, presentational only.
    #[serde(default)]
    pub occupation: String,
    /// Topic to stance in `[-1, 1]`.
    #[serde(default)]
    pub alignment: BTreeMap<String, f64>,
    /// Voice attributes.
    #[serde(default)]
    pub voice: VoiceStyle,
    /// Cognitive traits.
    #[serde(default)]
    pub cognitive_style: CognitiveStyle,
    /// Personas this persona follows.
    #[serde(default)]
    pub following: Vec<PersonaId>,
    /// Personas following this persona.
    #[serde(default)]
    pub followers: Vec<PersonaId>,
}

impl Persona {
    /// Stance on `topic`, or 0.0 when the persona has none recorded.
    pub fn stance(&self, topic: &str) -> f64 {
        self.alignment.get(topic).copied().unwrap_or(0.0)
    }

    /// Stance on the war, the topic every scoring rule keys on.
    pub fn war_stance(&self) -> f64 {
        self.stance(WAR_TOPIC)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A historical occurrence that posts can cite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Event identifier from the event file.
    pub id: EventId,
    /// ISO date `YYYY-MM-DD`; sorts lexicographically.
    pub date: String,
    /// Short headline.
    pub title: String,
    /// One-sentence summary.
    pub summary: String,
    /// Region the event happened in.
    pub region: String,
    /// Sources backing the event.
    #[serde(default)]
    pub citations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Era features
// ---------------------------------------------------------------------------

/// Platform affordances available in a given era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EraFeatures {
    /// Whether hashtags may appear.
    pub hashtags: bool,
    /// Text used to prefix a re-share.
    pub retweet_prefix: String,
    /// Whether quoting another post is allowed.
    pub quote_tweet: bool,
    /// Character budget for a post body.
    pub max_chars: usize,
}

impl Default for EraFeatures {
    fn default() -> Self {
        Self {
            hashtags: false,
            retweet_prefix: String::from("RT"),
            quote_tweet: false,
            max_chars: 140,
        }
    }
}

/// Era features plus the engagement counters attached to every new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PostFeatures {
    /// Times re-shared.
    pub retweets: u32,
    /// Replies received.
    pub replies: u32,
    /// Times quoted.
    pub quotes: u32,
    /// Affordances of the post's era.
    #[serde(flatten)]
    pub era: EraFeatures,
}

impl PostFeatures {
    /// Features for a freshly created post: counters at zero.
    pub const fn fresh(era: EraFeatures) -> Self {
        Self {
            retweets: 0,
            replies: 0,
            quotes: 0,
            era,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation records
// ---------------------------------------------------------------------------

/// Ephemeral inner state computed before a candidate post is rendered.
///
/// Lives for one generation attempt only and is exposed solely through
/// [`DebugMeta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scratchpad {
    /// What the persona means to do.
    pub intent: Intent,
    /// Confidence in `[0.05, 0.95]`, two decimals.
    pub confidence: f64,
    /// Whether the post talks about the persona itself.
    pub self_reference: bool,
    /// Imagined audience, presentational only.
    pub audience_model: String,
    /// Emotional colouring.
    pub feeling: Feeling,
    /// Risk appetite for this attempt in `[0, 1]`, two decimals.
    pub risk: f64,
    /// Rendered inner monologue.
    pub thought: String,
}

/// Sub-scores and composite for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scores {
    /// Temporal grounding score.
    pub temporal: f64,
    /// Period-voice score.
    pub voice: f64,
    /// Stance consistency score.
    pub consistency: f64,
    /// Weighted composite, serialized as `final`.
    #[serde(rename = "final")]
    pub composite: f64,
}

/// Debug payload attached to a post when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DebugMeta {
    /// The scratchpad the post was rendered from.
    pub scratchpad: Scratchpad,
    /// Scores, rounded to two decimals.
    pub scores: Scores,
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// Reference from a post to the event that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Grounding {
    /// The cited event.
    pub event_id: EventId,
    /// Event headline at the time of posting.
    pub title: String,
    /// Sources of the event.
    pub citations: Vec<String>,
}

impl From<&Event> for Grounding {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            citations: event.citations.clone(),
        }
    }
}

/// An accepted, published post. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Post {
    /// Unique post identifier.
    pub id: PostId,
    /// Author persona.
    pub persona_id: PersonaId,
    /// Author handle.
    pub handle: String,
    /// Wall-clock creation time.
    pub timestamp: DateTime<Utc>,
    /// Final, filtered and length-capped text.
    pub text: String,
    /// Era affordances and engagement counters.
    pub features: PostFeatures,
    /// Events the post is anchored to; empty when ungrounded.
    #[serde(default)]
    pub grounding: Vec<Grounding>,
    /// Scratchpad and scores, only in debug mode.
    #[serde(default)]
    pub meta: Option<DebugMeta>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_style_keys_default_to_neutral() {
        let json = r#"{"id":"p_0001","handle":"h","region":"Europe-West","cognitive_style":{"certainty":0.9}}"#;
        let parsed: Result<Persona, _> = serde_json::from_str(json);
        assert!(parsed.is_ok());
        if let Ok(persona) = parsed {
            assert!((persona.cognitive_style.certainty - 0.9).abs() < f64::EPSILON);
            assert!((persona.cognitive_style.risk_appetite - NEUTRAL_STYLE).abs() < f64::EPSILON);
            assert!(persona.war_stance().abs() < f64::EPSILON);
            assert!(persona.following.is_empty());
        }
    }

    #[test]
    fn event_citations_default_to_empty() {
        let json = r#"{"id":"e1","date":"1914-08-04","title":"T","summary":"S","region":"Europe-West"}"#;
        let parsed: Result<Event, _> = serde_json::from_str(json);
        assert!(parsed.is_ok_and(|e| e.citations.is_empty()));
    }

    #[test]
    fn post_features_flatten_era_flags() {
        let features = PostFeatures::fresh(EraFeatures::default());
        let value = serde_json::to_value(&features).unwrap_or_default();
        assert_eq!(value["retweets"], 0);
        assert_eq!(value["max_chars"], 140);
        assert_eq!(value["retweet_prefix"], "RT");
    }

    #[test]
    fn composite_serializes_as_final() {
        let scores = Scores {
            temporal: 1.0,
            voice: 0.9,
            consistency: 0.8,
            composite: 0.9,
        };
        let value = serde_json::to_value(scores).unwrap_or_default();
        assert!(value.get("final").is_some());
        assert!(value.get("composite").is_none());
    }
}
