//! Persona spawner for seeding the simulation population.
//!
//! At startup the spawner samples N personas with random names, regions,
//! occupations, stances and styles, then wires a follow network: each
//! persona follows about `sqrt(N)` distinct others, drawn from a pool in
//! which personas of its own region appear twice. Follower lists are
//! derived from the finished `following` lists in a second pass.

use std::collections::BTreeMap;

use rand::Rng;
use timestream_core::social::SocialIndex;
use timestream_core::unit::round2;
use timestream_types::{CognitiveStyle, Persona, PersonaId, VoiceStyle};
use tracing::info;

/// Errors that can occur when sampling personas.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// No regions were configured to place personas in.
    #[error("no regions configured for persona placement")]
    NoRegions,
}

// -----------------------------------------------------------------------
// Pools
// -----------------------------------------------------------------------

const FIRST_NAMES: &[&str] = &[
    "Arthur", "Beatrice", "Cecil", "Dorothy", "Edmund", "Florence", "George", "Harold",
    "Irene", "James", "Katherine", "Leonard", "Mabel", "Nora", "Oswald", "Phoebe",
    "Quentin", "Rose", "Stanley", "Trudy", "Ursula", "Victor", "Winifred", "Yvonne",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Baker", "Cartwright", "Dalton", "Ellis", "Foster", "Gibson", "Harris",
    "Ingram", "Jenkins", "Kensington", "Lyons", "Morris", "Nolan", "Osborne", "Parker",
    "Quince", "Rowley", "Stephens", "Turner", "Underhill", "Vickers", "Watson", "Yorke",
];

const OCCUPATIONS: &[&str] = &[
    "clerk",
    "teacher",
    "journalist",
    "shopkeeper",
    "porter",
    "seamstress",
    "student",
    "banker",
    "factory worker",
    "soldier",
    "nurse",
];

/// Topics every persona holds a stance on.
pub const TOPICS: &[&str] = &["war", "imperialism", "mobilisation", "alliances"];

/// Dialect tag given to every sampled voice.
const DIALECT: &str = "EN_1910s";

/// Random lowercase letters appended to a handle.
const HANDLE_SUFFIX_LEN: usize = 3;

/// Minimum number of personas each persona follows.
const MIN_FOLLOWING: usize = 2;

// -----------------------------------------------------------------------
// Sampling
// -----------------------------------------------------------------------

/// Sample `count` personas for `era`, placed in `regions`, and wire their
/// follow network.
///
/// # Errors
///
/// Returns [`SpawnError::NoRegions`] if `regions` is empty.
pub fn sample_personas<R: Rng + ?Sized>(
    count: usize,
    era: &str,
    regions: &[String],
    rng: &mut R,
) -> Result<Vec<Persona>, SpawnError> {
    if regions.is_empty() {
        return Err(SpawnError::NoRegions);
    }

    let mut personas: Vec<Persona> = (0..count)
        .map(|i| sample_persona(i, era, regions, rng))
        .collect();

    wire_following(&mut personas, rng);
    let index = SocialIndex::build(&personas);
    index.apply_followers(&mut personas);

    info!(
        count = personas.len(),
        era,
        follows_each = following_target(count),
        "Personas sampled"
    );
    Ok(personas)
}

fn sample_persona<R: Rng + ?Sized>(
    index: usize,
    era: &str,
    regions: &[String],
    rng: &mut R,
) -> Persona {
    let first = pick(FIRST_NAMES, rng).copied().unwrap_or_default();
    let last = pick(LAST_NAMES, rng).copied().unwrap_or_default();
    let name = format!("{first} {last}");
    let region = pick(regions, rng).cloned().unwrap_or_default();
    let occupation = pick(OCCUPATIONS, rng).copied().unwrap_or_default().to_owned();

    let alignment: BTreeMap<String, f64> = TOPICS
        .iter()
        .map(|topic| ((*topic).to_owned(), rng.random_range(-1.0..=1.0)))
        .collect();

    let voice = VoiceStyle {
        formality: round2(rng.random_range(0.4..=0.9)),
        dialect: String::from(DIALECT),
    };

    let cognitive_style = CognitiveStyle {
        reflectiveness: round2(rng.random_range(0.3..=0.8)),
        certainty: round2(rng.random_range(0.3..=0.8)),
        irony: round2(rng.random_range(0.0..=0.3)),
        risk_appetite: round2(rng.random_range(0.2..=0.7)),
    };

    Persona {
        id: PersonaId::new(format!("p_{index:04}")),
        handle: handle_for(&name, rng),
        era: era.to_owned(),
        region,
        occupation,
        alignment,
        voice,
        cognitive_style,
        following: Vec::new(),
        followers: Vec::new(),
    }
}

/// Lowercase letters of `name`, an underscore, and a random suffix.
fn handle_for<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    let mut handle: String = name
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    handle.push('_');
    for _ in 0..HANDLE_SUFFIX_LEN {
        handle.push(char::from(rng.random_range(b'a'..=b'z')));
    }
    handle
}

/// How many personas each persona follows in a population of `count`.
fn following_target(count: usize) -> usize {
    count.isqrt().max(MIN_FOLLOWING)
}

/// Fill every persona's `following` list.
///
/// Candidates are drawn without replacement from a pool where same-region
/// personas are listed twice, so neighbours are twice as likely.
fn wire_following<R: Rng + ?Sized>(personas: &mut [Persona], rng: &mut R) {
    let target = following_target(personas.len());
    let directory: Vec<(PersonaId, String)> = personas
        .iter()
        .map(|p| (p.id.clone(), p.region.clone()))
        .collect();

    for persona in personas.iter_mut() {
        let mut pool: Vec<&PersonaId> = directory
            .iter()
            .filter(|(id, region)| *id != persona.id && *region == persona.region)
            .chain(directory.iter().filter(|(id, _)| *id != persona.id))
            .map(|(id, _)| id)
            .collect();

        let mut following = Vec::with_capacity(target);
        while following.len() < target && !pool.is_empty() {
            let idx = rng.random_range(0..pool.len());
            let Some(chosen) = pool.get(idx).copied() else {
                break;
            };
            pool.retain(|id| *id != chosen);
            following.push(chosen.clone());
        }
        persona.following = following;
    }
}

/// Uniform pick from `pool`; `None` only when the pool is empty.
fn pick<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R) -> Option<&'a T> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.random_range(0..pool.len()))
}
