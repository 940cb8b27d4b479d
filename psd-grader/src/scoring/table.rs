//! Scoring vocabulary table
//!
//! The three term lists the heuristic looks for, each as `term -> weight`:
//! - `notation_terms`: each distinct term found adds its weight to the notation count
//! - `fast_tempo_terms`: any term with a non-zero weight found marks the piece as fast
//! - `accidental_symbols`: every occurrence adds its weight to the accidental count
//!
//! A weight of 0 disables a term. Terms are matched as substrings of the
//! lower-cased text, so they are stored lower-cased.
//!
//! In TOML (`[scoring]` section), a supplied sub-table replaces that whole
//! vocabulary; omitted sub-tables keep the built-in lists:
//!
//! ```toml
//! [scoring.accidental_symbols]
//! "#" = 1
//! "♯" = 1
//! "♭" = 1
//! b = 0    # stop counting the letter b as a flat
//! ```

use crate::error::{GraderError, GraderResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const NOTATION_TERMS: [&str; 13] = [
    "triplet",
    "sixteenth",
    "16th",
    "thirty-second",
    "32nd",
    "crescendo",
    "diminuendo",
    "staccato",
    "legato",
    "arpeggio",
    "trill",
    "mordent",
    "turn",
];

const FAST_TEMPO_TERMS: [&str; 4] = ["allegro", "presto", "vivace", "veloce"];

/// `b` is here because extracted text renders flats as a plain letter b.
/// It also counts every b (and B) in ordinary words.
const ACCIDENTAL_SYMBOLS: [&str; 4] = ["#", "♯", "♭", "b"];

/// Weighted term lists used by the difficulty scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringTable {
    pub notation_terms: BTreeMap<String, u32>,
    pub fast_tempo_terms: BTreeMap<String, u32>,
    pub accidental_symbols: BTreeMap<String, u32>,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            notation_terms: unit_weights(&NOTATION_TERMS),
            fast_tempo_terms: unit_weights(&FAST_TEMPO_TERMS),
            accidental_symbols: unit_weights(&ACCIDENTAL_SYMBOLS),
        }
    }
}

fn unit_weights(terms: &[&str]) -> BTreeMap<String, u32> {
    terms.iter().map(|t| (t.to_string(), 1)).collect()
}

impl ScoringTable {
    /// Parse a `[scoring]` TOML table
    pub fn from_toml(table: &toml::Table) -> GraderResult<Self> {
        let parsed: ScoringTable = toml::Value::Table(table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| GraderError::ScoringTable(e.to_string()))?;
        Ok(parsed.normalized())
    }

    /// Render as a TOML table (for writing a starter config)
    pub fn to_toml(&self) -> GraderResult<toml::Table> {
        match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => Ok(table),
            Ok(other) => Err(GraderError::ScoringTable(format!(
                "expected a table, got {}",
                other.type_str()
            ))),
            Err(e) => Err(GraderError::ScoringTable(e.to_string())),
        }
    }

    /// Lower-case every term and drop empty ones
    ///
    /// Terms that collide after lower-casing keep the larger weight.
    pub fn normalized(self) -> Self {
        Self {
            notation_terms: normalize_terms("notation_terms", self.notation_terms),
            fast_tempo_terms: normalize_terms("fast_tempo_terms", self.fast_tempo_terms),
            accidental_symbols: normalize_terms("accidental_symbols", self.accidental_symbols),
        }
    }

    /// True when the letter `b` still counts as a flat
    pub fn counts_letter_b(&self) -> bool {
        self.accidental_symbols.get("b").is_some_and(|&w| w > 0)
    }
}

fn normalize_terms(list: &str, terms: BTreeMap<String, u32>) -> BTreeMap<String, u32> {
    let mut normalized = BTreeMap::new();
    for (term, weight) in terms {
        if term.is_empty() {
            warn!(list, "Ignoring empty scoring term");
            continue;
        }
        let entry = normalized.entry(term.to_lowercase()).or_insert(weight);
        *entry = (*entry).max(weight);
    }
    normalized
}
