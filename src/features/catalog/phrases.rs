//! Phrase catalog loading
//!
//! The catalog is an ordered list of phrase strings read from a JSON file.
//! Any read or parse failure degrades to a small built-in set - a missing or
//! broken phrase file must never stop the bot, and the catalog is guaranteed
//! non-empty so rotation always has something to pick from. Indices are
//! stable for the lifetime of the process; a restart may renumber.

use std::fs;
use std::path::Path;

use log::{info, warn};

/// Built-in phrases used when the catalog file cannot be loaded.
const BUILTIN_PHRASES: &[&str] = &[
    "💖 You are loved more than you know! 💖",
    "🌟 You make the world brighter just by being in it! 🌟",
    "🌹 Someone is thinking about you right now! 🌹",
    "☀️ Today is better because you are in it! ☀️",
];

/// Immutable-after-load catalog of affirmation phrases.
///
/// Guaranteed to contain at least one phrase.
#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    phrases: Vec<String>,
}

impl PhraseCatalog {
    /// Build a catalog from an explicit phrase list.
    ///
    /// An empty list is replaced with the built-in phrases to uphold the
    /// non-empty guarantee.
    pub fn new(phrases: Vec<String>) -> Self {
        if phrases.is_empty() {
            warn!("Phrase list is empty, using {} built-in phrases", BUILTIN_PHRASES.len());
            return Self::builtin();
        }
        PhraseCatalog { phrases }
    }

    /// Load the catalog from a JSON file containing an array of strings.
    ///
    /// This is the one place where a parse failure is absorbed rather than
    /// surfaced: on any failure the built-in catalog is returned and the
    /// degradation is logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Could not read phrase file {}: {e} - using built-in phrases",
                    path.display()
                );
                return Self::builtin();
            }
        };

        match serde_json::from_str::<Vec<String>>(&data) {
            Ok(phrases) if !phrases.is_empty() => {
                info!("Loaded {} phrases from {}", phrases.len(), path.display());
                PhraseCatalog { phrases }
            }
            Ok(_) => {
                warn!("Phrase file {} is empty - using built-in phrases", path.display());
                Self::builtin()
            }
            Err(e) => {
                warn!(
                    "Could not parse phrase file {}: {e} - using built-in phrases",
                    path.display()
                );
                Self::builtin()
            }
        }
    }

    fn builtin() -> Self {
        PhraseCatalog {
            phrases: BUILTIN_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Phrase at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.phrases.get(index).map(String::as_str)
    }

    /// Number of phrases in the catalog. Always at least 1.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always false; the catalog is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// All phrases, in catalog order.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}
