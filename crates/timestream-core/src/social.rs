//! Follower index over the persona population.
//!
//! Personas only carry the ids of the personas they follow. The index is
//! built in two passes: forward (`following`) edges are collected first,
//! then the reverse (`followers`) side is derived from them. Nothing is
//! mutated while only half of the graph exists.

use std::collections::BTreeMap;

use timestream_types::{Persona, PersonaId};
use tracing::debug;

/// Forward and reverse follow edges keyed by persona id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialIndex {
    /// Persona to the personas it follows.
    following: BTreeMap<PersonaId, Vec<PersonaId>>,
    /// Persona to the personas following it.
    followers: BTreeMap<PersonaId, Vec<PersonaId>>,
}

impl SocialIndex {
    /// Build the index from the personas' `following` lists.
    ///
    /// Edges pointing at ids outside the population are kept on the
    /// forward side but produce no reverse entry.
    pub fn build(personas: &[Persona]) -> Self {
        // Pass 1: forward edges.
        let mut following: BTreeMap<PersonaId, Vec<PersonaId>> = BTreeMap::new();
        for persona in personas {
            following.insert(persona.id.clone(), persona.following.clone());
        }

        // Pass 2: reverse index, seeded so every persona has an entry.
        let mut followers: BTreeMap<PersonaId, Vec<PersonaId>> = following
            .keys()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        for (follower, targets) in &following {
            for target in targets {
                if let Some(list) = followers.get_mut(target) {
                    list.push(follower.clone());
                } else {
                    debug!(follower = %follower, target = %target, "Follow edge to unknown persona");
                }
            }
        }

        Self {
            following,
            followers,
        }
    }

    /// Personas that `id` follows.
    pub fn following_of(&self, id: &PersonaId) -> &[PersonaId] {
        self.following.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Personas that follow `id`.
    pub fn followers_of(&self, id: &PersonaId) -> &[PersonaId] {
        self.followers.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Write the derived follower lists back onto the personas.
    pub fn apply_followers(&self, personas: &mut [Persona]) {
        for persona in personas {
            persona.followers = self.followers_of(&persona.id).to_vec();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(id: &str, following: &[&str]) -> Persona {
        Persona {
            id: PersonaId::new(id),
            handle: id.to_owned(),
            era: String::from("1914-08"),
            region: String::from("Europe-West"),
            occupation: String::from("clerk"),
            alignment: BTreeMap::new(),
            voice: timestream_types::VoiceStyle::default(),
            cognitive_style: timestream_types::CognitiveStyle::default(),
            following: following.iter().map(|f| PersonaId::new(*f)).collect(),
            followers: Vec::new(),
        }
    }

    #[test]
    fn reverse_edges_are_derived() {
        let personas = vec![
            persona("a", &["b", "c"]),
            persona("b", &["c"]),
            persona("c", &[]),
        ];
        let index = SocialIndex::build(&personas);

        assert_eq!(index.following_of(&PersonaId::new("a")).len(), 2);
        let c_followers: Vec<&str> = index
            .followers_of(&PersonaId::new("c"))
            .iter()
            .map(PersonaId::as_str)
            .collect();
        assert_eq!(c_followers, vec!["a", "b"]);
        assert!(index.followers_of(&PersonaId::new("a")).is_empty());
    }

    #[test]
    fn unknown_targets_are_skipped() {
        let personas = vec![persona("a", &["ghost"])];
        let index = SocialIndex::build(&personas);
        assert!(index.followers_of(&PersonaId::new("ghost")).is_empty());
        assert_eq!(index.following_of(&PersonaId::new("a")).len(), 1);
    }

    #[test]
    fn apply_followers_fills_personas() {
        let mut personas = vec![persona("a", &["b"]), persona("b", &["a"])];
        let index = SocialIndex::build(&personas);
        index.apply_followers(&mut personas);
        assert!(personas.iter().all(|p| p.followers.len() == 1));
    }
}
