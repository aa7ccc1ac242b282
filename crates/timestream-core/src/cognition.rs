//! First pass of generation: the persona's private inner state.
//!
//! A scratchpad is built per attempt and thrown away afterwards. It
//! decides the intent (assert, question or refrain), how confident and
//! how risky the persona feels, and a short inner monologue. Only the
//! debug payload of a post ever exposes it.
//!
//! The order of random draws is fixed: intent draws, then the
//! self-reference draw, then the audience pick, then the hedge pick.
//! Reordering them changes every seeded outcome.

use rand::Rng;
use timestream_types::{Event, Feeling, Intent, Persona, Scratchpad};

use crate::unit::{clamp, clamp_unit, round2};

/// Hedges that may open an inner thought.
pub const SELF_REF_PHRASES: [&str; 8] = [
    "I confess",
    "I fear",
    "I wonder",
    "I reckon",
    "I daresay",
    "It seems to me",
    "Permit me to say",
    "I cannot help but think",
];

/// Who the persona imagines will read the post.
pub const AUDIENCES: [&str; 8] = [
    "my office mates",
    "the neighbours",
    "the lads at the pub",
    "the parish circle",
    "the local paper",
    "the recruiting sergeant",
    "our foreman",
    "the club",
];

/// Topic of the monologue when no event is in play.
const FALLBACK_TOPIC: &str = "rumours from the wireless";

/// Reflectiveness above which a persona counts as cautious.
const CAUTIOUS_ABOVE: f64 = 0.6;

/// Stance magnitude beyond which a persona holds a firm view.
const FIRM_STANCE: f64 = 0.4;

/// Derive a scratchpad for `persona`, optionally reacting to `event`.
///
/// `reflectiveness` and `creativity` are expected in `[0, 1]`; the gate
/// clamps them before calling.
pub fn build_scratchpad<R: Rng + ?Sized>(
    persona: &Persona,
    event: Option<&Event>,
    reflectiveness: f64,
    creativity: f64,
    rng: &mut R,
) -> Scratchpad {
    let stance = persona.war_stance();
    let cautious = reflectiveness > CAUTIOUS_ABOVE;
    let caution_shift = if cautious { 0.1 } else { -0.05 };
    let risk = clamp_unit(persona.cognitive_style.risk_appetite + creativity * 0.3 - caution_shift);

    let intent = choose_intent(cautious, stance, risk, rng);

    let confidence_shift = if intent == Intent::Assert { 0.1 } else { -0.1 };
    let confidence = clamp(
        persona.cognitive_style.certainty * 0.8 + confidence_shift,
        0.05,
        0.95,
    );

    let self_ref_threshold = if cautious { 0.6 } else { 0.25 };
    let self_reference = rng.random::<f64>() < self_ref_threshold;

    let audience = pick(&AUDIENCES, rng);
    let feeling = feeling_for(stance);

    let topic = event.map_or(FALLBACK_TOPIC, |e| e.title.as_str());
    let mut thought = format!(
        "{}; thinking on {topic} leaves me {feeling}.",
        opener_for(stance)
    );
    if self_reference {
        let hedge = pick(&SELF_REF_PHRASES, rng);
        thought = format!("{hedge}, {}", thought.to_lowercase());
    }

    Scratchpad {
        intent,
        confidence: round2(confidence),
        self_reference,
        audience_model: audience.to_owned(),
        feeling,
        risk: round2(risk),
        thought,
    }
}

/// Question check first, refrain check second, assert otherwise.
fn choose_intent<R: Rng + ?Sized>(cautious: bool, stance: f64, risk: f64, rng: &mut R) -> Intent {
    if cautious && stance.abs() < 0.2 && rng.random::<f64>() < 0.3 {
        return Intent::Question;
    }
    if rng.random::<f64>() < risk * 0.2 {
        return Intent::Refrain;
    }
    Intent::Assert
}

/// Map a war stance to the dominant feeling.
pub fn feeling_for(stance: f64) -> Feeling {
    if stance < -FIRM_STANCE {
        Feeling::Anxious
    } else if stance > FIRM_STANCE {
        Feeling::Resolute
    } else {
        Feeling::Uncertain
    }
}

fn opener_for(stance: f64) -> &'static str {
    if stance > FIRM_STANCE {
        "We must be steady"
    } else if stance < -FIRM_STANCE {
        "Heavens keep us"
    } else {
        "Best keep our heads"
    }
}

/// Uniform pick from a non-empty constant table.
pub(crate) fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    if options.is_empty() {
        return "";
    }
    let idx = rng.random_range(0..options.len());
    options.get(idx).copied().unwrap_or_default()
}
