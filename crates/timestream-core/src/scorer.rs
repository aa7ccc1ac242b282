//! Readable sub-scores for a rendered candidate and their composite.
//!
//! Every score lies in `[0, 1]`. The composite weighs temporal grounding,
//! period voice and stance consistency, minus a penalty for risk above
//! 0.7.

use timestream_types::{Event, Persona, Scores};

use crate::lexicon::Lexicon;
use crate::render::tokens_in_lexicon_ratio;
use crate::unit::clamp_unit;

/// Cues suggesting enthusiasm for the war.
pub const PRO_WAR_CUES: [&str; 4] = ["forward", "onwards", "to arms", "khaki"];

/// Cues suggesting reluctance or a wish for peace.
pub const ANTI_WAR_CUES: [&str; 4] = ["pray", "mercy", "cease", "armistice"];

/// Consistency score for text at odds with the persona's stance.
pub const INCONSISTENT: f64 = 0.4;

/// Consistency score otherwise.
pub const CONSISTENT: f64 = 0.8;

/// Risk above which the composite is penalised.
const RISK_TOLERANCE: f64 = 0.7;

/// 1.0 when the post is anchored to an event, 0.6 otherwise.
pub const fn score_temporal(event: Option<&Event>) -> f64 {
    if event.is_some() { 1.0 } else { 0.6 }
}

/// Voice score from a lexicon ratio.
pub fn score_voice(lexicon_ratio: f64) -> f64 {
    clamp_unit(0.6 + 0.4 * lexicon_ratio)
}

/// Whether `text` contradicts `persona`'s war stance.
///
/// Cues are matched as substrings of the lowercased text.
pub fn score_consistency(persona: &Persona, text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let pro_war = PRO_WAR_CUES.iter().any(|cue| lowered.contains(cue));
    let anti_war = ANTI_WAR_CUES.iter().any(|cue| lowered.contains(cue));
    let stance = persona.war_stance();
    if (pro_war && stance < -0.4) || (anti_war && stance > 0.4) {
        INCONSISTENT
    } else {
        CONSISTENT
    }
}

/// Weighted composite of the sub-scores, clamped to `[0, 1]`.
pub fn composite_score(temporal: f64, voice: f64, consistency: f64, risk: f64) -> f64 {
    let base = 0.4 * temporal + 0.35 * voice + 0.25 * consistency;
    let penalty = 0.2 * (risk - RISK_TOLERANCE).max(0.0);
    clamp_unit(base - penalty)
}

/// Score a rendered candidate in one go.
pub fn score_candidate(
    persona: &Persona,
    event: Option<&Event>,
    text: &str,
    lexicon: &Lexicon,
    risk: f64,
) -> Scores {
    let temporal = score_temporal(event);
    let voice = score_voice(tokens_in_lexicon_ratio(text, lexicon));
    let consistency = score_consistency(persona, text);
    Scores {
        temporal,
        voice,
        consistency,
        composite: composite_score(temporal, voice, consistency, risk),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{event, persona};

    use super::*;

    #[test]
    fn temporal_depends_on_grounding() {
        let ev = event("e1", "1914-08-01", "Europe-West");
        assert!((score_temporal(Some(&ev)) - 1.0).abs() < f64::EPSILON);
        assert!((score_temporal(None) - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn voice_from_ratio() {
        assert!((score_voice(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((score_voice(0.0) - 0.6).abs() < f64::EPSILON);
        assert!((score_voice(0.5) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn pro_war_cue_against_dove_is_inconsistent() {
        let dove = persona("p_0001", "Europe-West", -0.7);
        assert!((score_consistency(&dove, "Onwards, to arms!") - INCONSISTENT).abs() < f64::EPSILON);
        assert!((score_consistency(&dove, "We pray for peace.") - CONSISTENT).abs() < f64::EPSILON);
    }

    #[test]
    fn anti_war_cue_against_hawk_is_inconsistent() {
        let hawk = persona("p_0001", "Europe-West", 0.7);
        assert!((score_consistency(&hawk, "Have mercy.") - INCONSISTENT).abs() < f64::EPSILON);
        assert!((score_consistency(&hawk, "Khaki everywhere.") - CONSISTENT).abs() < f64::EPSILON);
    }

    #[test]
    fn cues_match_as_substrings() {
        let dove = persona("p_0001", "Europe-West", -0.7);
        assert!((score_consistency(&dove, "Straightforward news.") - INCONSISTENT).abs() < f64::EPSILON);
    }

    #[test]
    fn composite_stays_in_unit_interval() {
        for t in [0.0, 0.6, 1.0] {
            for v in [0.0, 0.6, 1.0] {
                for c in [0.0, 0.4, 0.8, 1.0] {
                    for r in [0.0, 0.7, 0.9, 1.0, 5.0] {
                        let s = composite_score(t, v, c, r);
                        assert!((0.0..=1.0).contains(&s));
                    }
                }
            }
        }
    }

    #[test]
    fn risk_penalty_applies_above_tolerance() {
        let calm = composite_score(1.0, 1.0, 0.8, 0.7);
        let bold = composite_score(1.0, 1.0, 0.8, 1.0);
        assert!((calm - 0.95).abs() < 1e-12);
        assert!((calm - bold - 0.06).abs() < 1e-12);
    }

    #[test]
    fn score_candidate_combines_everything() {
        let p = persona("p_0001", "Europe-West", 0.0);
        let lexicon = Lexicon::from_words(["war", "peace"]);
        let scores = score_candidate(&p, None, "war peace xyz", &lexicon, 0.2);
        assert!((scores.voice - 1.0).abs() < f64::EPSILON);
        assert!((scores.temporal - 0.6).abs() < f64::EPSILON);
        assert!((scores.composite - (0.24 + 0.35 + 0.2)).abs() < 1e-12);
    }
}
