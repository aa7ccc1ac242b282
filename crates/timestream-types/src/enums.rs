//! Enumeration types carried by the generation scratchpad.
//!
//! Both enums serialize as lowercase strings (`"assert"`, `"anxious"`, ...)
//! so debug payloads keep the keys the dashboard already reads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// What a persona means to do with a post during one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Intent {
    /// State an opinion outright.
    Assert,
    /// Pose the topic as an open question.
    Question,
    /// Lean toward staying silent; the gate may suppress the post.
    Refrain,
}

impl Intent {
    /// Lowercase wire name of the intent.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Question => "question",
            Self::Refrain => "refrain",
        }
    }
}

impl core::fmt::Display for Intent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Feeling
// ---------------------------------------------------------------------------

/// Emotional colouring derived from a persona's stance on the war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Feeling {
    /// Strongly opposed to the war (stance below -0.4).
    Anxious,
    /// Strongly in favour of the war (stance above 0.4).
    Resolute,
    /// Anything in between.
    Uncertain,
}

impl Feeling {
    /// Lowercase wire name of the feeling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anxious => "anxious",
            Self::Resolute => "resolute",
            Self::Uncertain => "uncertain",
        }
    }
}

impl core::fmt::Display for Feeling {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_wire_names() {
        let json = serde_json::to_string(&Intent::Refrain).unwrap_or_default();
        assert_eq!(json, "\"refrain\"");
        assert_eq!(Intent::Question.to_string(), "question");
    }

    #[test]
    fn feeling_round_trips_from_lowercase() {
        let parsed: Result<Feeling, _> = serde_json::from_str("\"resolute\"");
        assert_eq!(parsed.ok(), Some(Feeling::Resolute));
    }
}
