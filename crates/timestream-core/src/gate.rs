//! Two-pass generation gate: scratchpad, render, score, then accept or
//! suppress.
//!
//! A candidate whose intent is `refrain` and whose composite score falls
//! below [`SUPPRESSION_THRESHOLD`] is suppressed. Suppression is an
//! ordinary outcome, not an error. Every other candidate becomes a
//! [`Post`].

use chrono::{DateTime, Utc};
use rand::Rng;
use timestream_types::{
    DebugMeta, EraFeatures, Event, Grounding, Intent, Persona, Post, PostFeatures, PostId, Scores,
    Scratchpad,
};
use tracing::debug;

use crate::cognition::build_scratchpad;
use crate::config::EraFeatureTable;
use crate::lexicon::Lexicon;
use crate::render::render_candidate;
use crate::scorer::score_candidate;
use crate::unit::{clamp_unit, round2};

/// Composite score a refraining candidate must reach to be posted anyway.
pub const SUPPRESSION_THRESHOLD: f64 = 0.75;

/// Everything one generation attempt needs.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// The persona speaking.
    pub persona: &'a Persona,
    /// Era key used to look up text features.
    pub era: &'a str,
    /// Timestamp stamped on an accepted post.
    pub timestamp: DateTime<Utc>,
    /// Event the persona reacts to, if any.
    pub event: Option<&'a Event>,
    /// Period vocabulary for the voice score.
    pub lexicon: &'a Lexicon,
    /// Era feature table.
    pub eras: &'a EraFeatureTable,
    /// Global reflectiveness, clamped to `[0, 1]` on use.
    pub reflectiveness: f64,
    /// Global creativity, clamped to `[0, 1]` on use.
    pub creativity: f64,
    /// Attach scratchpad and scores to the post.
    pub include_debug_meta: bool,
}

/// A rendered and scored candidate, before the accept decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Inner state from the first pass.
    pub scratchpad: Scratchpad,
    /// Public text from the second pass.
    pub text: String,
    /// Era features in force.
    pub features: EraFeatures,
    /// Unrounded scores.
    pub scores: Scores,
}

impl Candidate {
    /// Whether the gate would suppress this candidate.
    pub fn is_suppressed(&self) -> bool {
        should_suppress(self.scratchpad.intent, self.scores.composite)
    }
}

/// Result of one generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The candidate was accepted.
    Posted(Box<Post>),
    /// The persona refrained and the candidate scored too low.
    Suppressed {
        /// Inner state of the suppressed attempt.
        scratchpad: Scratchpad,
        /// Scores of the suppressed candidate.
        scores: Scores,
    },
}

impl GenerationOutcome {
    /// The post, when accepted.
    pub fn post(&self) -> Option<&Post> {
        match self {
            Self::Posted(post) => Some(post),
            Self::Suppressed { .. } => None,
        }
    }

    /// Consume the outcome, yielding the post when accepted.
    pub fn into_post(self) -> Option<Post> {
        match self {
            Self::Posted(post) => Some(*post),
            Self::Suppressed { .. } => None,
        }
    }

    /// Whether the attempt was suppressed.
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }
}

/// The suppression rule: refrain with a composite below the threshold.
pub fn should_suppress(intent: Intent, composite: f64) -> bool {
    intent == Intent::Refrain && composite < SUPPRESSION_THRESHOLD
}

/// Run both passes and score the result without deciding.
pub fn draft<R: Rng + ?Sized>(request: &GenerationRequest<'_>, rng: &mut R) -> Candidate {
    let reflectiveness = clamp_unit(request.reflectiveness);
    let creativity = clamp_unit(request.creativity);
    let features = request.eras.features_for(request.era);

    let scratchpad = build_scratchpad(
        request.persona,
        request.event,
        reflectiveness,
        creativity,
        rng,
    );
    let text = render_candidate(request.event, &scratchpad, &features, rng);
    let scores = score_candidate(
        request.persona,
        request.event,
        &text,
        request.lexicon,
        scratchpad.risk,
    );

    Candidate {
        scratchpad,
        text,
        features,
        scores,
    }
}

/// Generate a post for the request, or suppress it.
pub fn generate<R: Rng + ?Sized>(
    request: &GenerationRequest<'_>,
    rng: &mut R,
) -> GenerationOutcome {
    let candidate = draft(request, rng);

    if candidate.is_suppressed() {
        debug!(
            persona_id = %request.persona.id,
            composite = candidate.scores.composite,
            "Generation suppressed"
        );
        return GenerationOutcome::Suppressed {
            scratchpad: candidate.scratchpad,
            scores: candidate.scores,
        };
    }

    let grounding = request.event.map(Grounding::from).into_iter().collect();
    let meta = request.include_debug_meta.then(|| DebugMeta {
        scores: rounded(candidate.scores),
        scratchpad: candidate.scratchpad,
    });

    GenerationOutcome::Posted(Box::new(Post {
        id: PostId::new(),
        persona_id: request.persona.id.clone(),
        handle: request.persona.handle.clone(),
        timestamp: request.timestamp,
        text: candidate.text,
        features: PostFeatures::fresh(candidate.features),
        grounding,
        meta,
    }))
}

fn rounded(scores: Scores) -> Scores {
    Scores {
        temporal: round2(scores.temporal),
        voice: round2(scores.voice),
        consistency: round2(scores.consistency),
        composite: round2(scores.composite),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use timestream_types::Feeling;

    use crate::test_support::{event, persona};

    use super::*;

    fn request<'a>(
        persona: &'a Persona,
        event: Option<&'a Event>,
        lexicon: &'a Lexicon,
        eras: &'a EraFeatureTable,
    ) -> GenerationRequest<'a> {
        GenerationRequest {
            persona,
            era: "1914-08",
            timestamp: Utc::now(),
            event,
            lexicon,
            eras,
            reflectiveness: 0.3,
            creativity: 0.2,
            include_debug_meta: false,
        }
    }

    #[test]
    fn mobilisation_scenario() {
        let p = persona("p_0001", "Europe-Central", 0.9);
        let mut ev = event("ev_mob", "1914-08-01", "Europe-Central");
        ev.title = String::from("Mobilisation Ordered");
        let lexicon = Lexicon::empty();
        let eras = EraFeatureTable::default();
        let req = request(&p, Some(&ev), &lexicon, &eras);

        for seed in 0..50 {
            let candidate = draft(&req, &mut SmallRng::seed_from_u64(seed));
            assert_eq!(candidate.scratchpad.feeling, Feeling::Resolute);
            assert!((candidate.scores.temporal - 1.0).abs() < f64::EPSILON);

            if let Some(post) = generate(&req, &mut SmallRng::seed_from_u64(seed)).into_post() {
                assert_eq!(post.grounding.len(), 1);
                assert_eq!(post.grounding.first().map(|g| g.event_id.as_str()), Some("ev_mob"));
                assert_eq!(post.persona_id, p.id);
                assert!(post.meta.is_none());
            }
        }
    }

    #[test]
    fn suppression_law_holds() {
        let mut p = persona("p_0001", "Europe-West", 0.0);
        p.cognitive_style.risk_appetite = 1.0;
        let lexicon = Lexicon::empty();
        let eras = EraFeatureTable::default();
        let mut req = request(&p, None, &lexicon, &eras);
        req.creativity = 1.0;

        let mut suppressed = 0;
        let mut posted = 0;
        for seed in 0..300 {
            let candidate = draft(&req, &mut SmallRng::seed_from_u64(seed));
            let outcome = generate(&req, &mut SmallRng::seed_from_u64(seed));
            let expected = candidate.scratchpad.intent == Intent::Refrain
                && candidate.scores.composite < SUPPRESSION_THRESHOLD;
            assert_eq!(outcome.is_suppressed(), expected, "seed {seed}");
            if outcome.is_suppressed() {
                suppressed += 1;
            } else {
                posted += 1;
            }
        }
        assert!(suppressed > 0);
        assert!(posted > 0);
    }

    #[test]
    fn refrain_with_high_composite_still_posts() {
        assert!(!should_suppress(Intent::Refrain, 0.75));
        assert!(should_suppress(Intent::Refrain, 0.7499));
        assert!(!should_suppress(Intent::Assert, 0.0));
        assert!(!should_suppress(Intent::Question, 0.1));
    }

    #[test]
    fn debug_meta_only_when_requested() {
        let p = persona("p_0001", "Europe-West", 0.5);
        let ev = event("e1", "1914-08-04", "Europe-West");
        let lexicon = Lexicon::from_words(["war"]);
        let eras = EraFeatureTable::default();
        let mut req = request(&p, Some(&ev), &lexicon, &eras);
        req.include_debug_meta = true;

        let post = (0..20)
            .find_map(|seed| generate(&req, &mut SmallRng::seed_from_u64(seed)).into_post());
        let post = post.unwrap();
        let meta = post.meta.unwrap();
        assert!((meta.scores.temporal - 1.0).abs() < f64::EPSILON);
        assert!((meta.scores.composite * 100.0 - (meta.scores.composite * 100.0).round()).abs() < 1e-9);
        assert_eq!(post.features.retweets, 0);
        assert_eq!(post.features.era.max_chars, 140);
    }

    #[test]
    fn out_of_range_tunables_are_clamped() {
        let p = persona("p_0001", "Europe-West", 0.0);
        let lexicon = Lexicon::empty();
        let eras = EraFeatureTable::default();
        let mut wild = request(&p, None, &lexicon, &eras);
        wild.reflectiveness = 7.0;
        wild.creativity = f64::NAN;
        let mut tame = wild;
        tame.reflectiveness = 1.0;
        tame.creativity = 0.0;

        let a = draft(&wild, &mut SmallRng::seed_from_u64(4));
        let b = draft(&tame, &mut SmallRng::seed_from_u64(4));
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_era_falls_back() {
        let p = persona("p_0001", "Europe-West", 0.0);
        let lexicon = Lexicon::empty();
        let eras = EraFeatureTable::default();
        let mut req = request(&p, None, &lexicon, &eras);
        req.era = "1066-10";
        let candidate = draft(&req, &mut SmallRng::seed_from_u64(1));
        assert_eq!(candidate.features.max_chars, 140);
    }

    #[test]
    fn posts_never_exceed_budget_or_carry_banned_words() {
        let p = persona("p_0001", "Europe-West", -0.6);
        let mut ev = event("e1", "1914-08-04", "Europe-West");
        ev.summary = format!("{} smartphone.", "Long dispatch text ".repeat(12));
        let lexicon = Lexicon::empty();
        let eras = EraFeatureTable::default();
        let req = request(&p, Some(&ev), &lexicon, &eras);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..100 {
            if let Some(post) = generate(&req, &mut rng).into_post() {
                assert!(post.text.chars().count() <= 140);
                assert!(!post.text.to_lowercase().contains("smartphone"));
            }
        }
    }
}
