//! Shared type definitions for the TimeStream persona simulation.
//!
//! This crate is the single source of truth for the records that cross
//! crate boundaries: personas and historical events coming in, posts and
//! their debug payloads going out. Types flow downstream to `TypeScript`
//! via `ts-rs` for the stream dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes (UUID-backed post ids, string keys for
//!   personas and events)
//! - [`enums`] -- Scratchpad enumerations ([`Intent`], [`Feeling`])
//! - [`structs`] -- Personas, events, era features, posts and scratchpads

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Feeling, Intent};
pub use ids::{EventId, PersonaId, PostId};
pub use structs::{
    CognitiveStyle, DebugMeta, EraFeatures, Event, Grounding, NEUTRAL_STYLE, Persona, Post,
    PostFeatures, Scores, Scratchpad, VoiceStyle, WAR_TOPIC,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings into `bindings/` relative to the crate
        // root when the exports are triggered.
        use ts_rs::TS;

        let _ = crate::ids::PostId::export_all();
        let _ = crate::ids::PersonaId::export_all();
        let _ = crate::ids::EventId::export_all();

        let _ = crate::enums::Intent::export_all();
        let _ = crate::enums::Feeling::export_all();

        let _ = crate::structs::VoiceStyle::export_all();
        let _ = crate::structs::CognitiveStyle::export_all();
        let _ = crate::structs::Persona::export_all();
        let _ = crate::structs::Event::export_all();
        let _ = crate::structs::EraFeatures::export_all();
        let _ = crate::structs::PostFeatures::export_all();
        let _ = crate::structs::Scratchpad::export_all();
        let _ = crate::structs::Scores::export_all();
        let _ = crate::structs::DebugMeta::export_all();
        let _ = crate::structs::Grounding::export_all();
        let _ = crate::structs::Post::export_all();
    }
}
