//! Second pass of generation: public text from a scratchpad.
//!
//! Rendering assembles up to three fragments (an opener, an optional
//! hedge, an optional feeling-coloured closer), strips anachronistic
//! vocabulary, then fits the result into the era's character budget.
//!
//! The module also hosts the lexicon ratio used by the voice score, since
//! it shares the banned-word list with the filter.

use rand::Rng;
use timestream_types::{EraFeatures, Event, Feeling, Scratchpad};

use crate::cognition::pick;
use crate::lexicon::Lexicon;

/// Words that must never appear in a period post.
pub const BANNED_WORDS: [&str; 15] = [
    "selfie",
    "podcast",
    "smartphone",
    "wifi",
    "streaming",
    "hashtag",
    "ai",
    "dm",
    "algorithm",
    "crypto",
    "blockchain",
    "influencer",
    "meme",
    "lol",
    "emoji",
];

/// Marker appended to truncated text.
pub const ELLIPSIS: char = '…';

/// Characters trimmed from both ends of a token before the banned check.
const EDGE_PUNCTUATION: [char; 8] = ['.', ',', ';', ':', '!', '?', '—', '-'];

/// Chance that a feeling-coloured closer is appended.
const CLOSER_PROBABILITY: f64 = 0.7;

/// Longest alphabetic word admitted without a lexicon match.
const SHORT_WORD_CHARS: usize = 6;

const MUSINGS: [&str; 4] = [
    "The office is hushed this morning.",
    "Queues at the post; whispers everywhere.",
    "Wireless carries grave reports.",
    "Factory floor abuzz; lads speak of enlistment.",
];

const HEDGES: [&str; 5] = ["I fear", "I wonder", "It seems to me", "I reckon", "I confess"];

const ANXIOUS_CLOSERS: [&str; 3] = [
    "God save us.",
    "One prays common sense shall prevail.",
    "Best keep our heads.",
];

const RESOLUTE_CLOSERS: [&str; 3] = ["Steady on.", "To work, then.", "Let us do our part."];

const UNCERTAIN_CLOSERS: [&str; 2] = [
    "The gazette makes for stern reading.",
    "Neighbours whisper of bills and trains.",
];

/// Whether `word` is a banned anachronism. Expects a lowercased word.
pub fn is_banned(word: &str) -> bool {
    BANNED_WORDS.contains(&word)
}

/// Render the public text for `scratchpad`, optionally grounded in
/// `event`, within the budget of `features`.
pub fn render_candidate<R: Rng + ?Sized>(
    event: Option<&Event>,
    scratchpad: &Scratchpad,
    features: &EraFeatures,
    rng: &mut R,
) -> String {
    let mut fragments: Vec<String> = Vec::with_capacity(3);

    let opener = match event {
        Some(ev) => {
            let openers = [
                format!("{}.", ev.title),
                format!("News from {}: {}.", ev.region, ev.title.to_lowercase()),
                ev.summary.clone(),
            ];
            let idx = rng.random_range(0..openers.len());
            openers.into_iter().nth(idx).unwrap_or_default()
        }
        None => pick(&MUSINGS, rng).to_owned(),
    };
    fragments.push(opener);

    if scratchpad.self_reference {
        fragments.push(pick(&HEDGES, rng).to_owned());
    }

    if rng.random::<f64>() < CLOSER_PROBABILITY {
        fragments.push(pick(closers_for(scratchpad.feeling), rng).to_owned());
    }

    let text = filter_anachronisms(&fragments.join(" "));
    truncate_to_budget(&text, features.max_chars)
}

const fn closers_for(feeling: Feeling) -> &'static [&'static str] {
    match feeling {
        Feeling::Anxious => &ANXIOUS_CLOSERS,
        Feeling::Resolute => &RESOLUTE_CLOSERS,
        Feeling::Uncertain => &UNCERTAIN_CLOSERS,
    }
}

/// Drop every whitespace-delimited token whose edge-trimmed, lowercased
/// form is banned, and rejoin the rest with single spaces.
pub fn filter_anachronisms(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| {
            let lowered = token.to_lowercase();
            !is_banned(lowered.trim_matches(EDGE_PUNCTUATION.as_slice()))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fit `text` into `max_chars` characters.
///
/// Longer text keeps its first `max_chars - 1` characters followed by
/// [`ELLIPSIS`]. A zero budget yields an empty string.
pub fn truncate_to_budget(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let Some(keep) = max_chars.checked_sub(1) else {
        return String::new();
    };
    let mut out: String = text.chars().take(keep).collect();
    out.push(ELLIPSIS);
    out
}

/// Share of scorable words that sound in-period, in `[0, 1]`.
///
/// Tokens keep only word characters and apostrophes and are lowercased.
/// Banned words are left out entirely. A word passes when it is not
/// purely alphabetic, the lexicon is empty, the lexicon holds it, or it
/// is at most six characters long. Returns 1.0 when nothing is scorable.
pub fn tokens_in_lexicon_ratio(text: &str, lexicon: &Lexicon) -> f64 {
    let mut scorable = 0.0;
    let mut ok = 0.0;
    for token in text.split_whitespace() {
        let word: String = token
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '\'')
            .flat_map(char::to_lowercase)
            .collect();
        if word.is_empty() || is_banned(&word) {
            continue;
        }
        scorable += 1.0;
        let alphabetic = word.chars().all(char::is_alphabetic);
        if !alphabetic
            || lexicon.is_empty()
            || lexicon.contains(&word)
            || word.chars().count() <= SHORT_WORD_CHARS
        {
            ok += 1.0;
        }
    }
    if scorable > 0.0 { ok / scorable } else { 1.0 }
}
