//! Period vocabulary used to score how "in-era" a candidate text sounds.
//!
//! The lexicon file is plain text, one word per line. Blank lines and
//! lines starting with `#` are ignored; words are lowercased.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{info, warn};

/// A set of lowercase period words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: BTreeSet<String>,
}

impl Lexicon {
    /// An empty lexicon. Scores against it fall back to neutral values.
    pub const fn empty() -> Self {
        Self {
            words: BTreeSet::new(),
        }
    }

    /// Build a lexicon from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse lexicon file contents.
    pub fn parse(contents: &str) -> Self {
        Self::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load the lexicon from `path`.
    ///
    /// A missing or unreadable file yields an empty lexicon and a warning.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let lexicon = Self::parse(&contents);
                info!(path = %path.display(), words = lexicon.len(), "Lexicon loaded");
                lexicon
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Lexicon unavailable, using empty set");
                Self::empty()
            }
        }
    }

    /// Whether `word` (case-insensitive) is a period word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Whether the lexicon holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }
}
