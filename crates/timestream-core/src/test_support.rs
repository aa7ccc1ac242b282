//! Fixture builders shared by the unit tests of this crate.

use std::collections::BTreeMap;

use timestream_types::{CognitiveStyle, Event, EventId, Persona, PersonaId, VoiceStyle};

/// A persona in `region` with the given stance on war.
pub fn persona(id: &str, region: &str, war_stance: f64) -> Persona {
    let mut alignment = BTreeMap::new();
    alignment.insert(String::from("war"), war_stance);
    Persona {
        id: PersonaId::new(id),
        handle: format!("{id}_abc"),
        era: String::from("1914-08"),
        region: region.to_owned(),
        occupation: String::from("clerk"),
        alignment,
        voice: VoiceStyle {
            formality: 0.7,
            dialect: String::from("EN_1910s"),
        },
        cognitive_style: CognitiveStyle::default(),
        following: Vec::new(),
        followers: Vec::new(),
    }
}

/// An event dated `date` in `region`.
pub fn event(id: &str, date: &str, region: &str) -> Event {
    Event {
        id: EventId::new(id),
        date: date.to_owned(),
        title: format!("Event {id}"),
        summary: format!("Something happened ({id})."),
        region: region.to_owned(),
        citations: vec![String::from("The Times")],
    }
}
