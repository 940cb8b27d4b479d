//! Difficulty Scorer
//!
//! Maps a document's [`FeatureSet`] to a difficulty [`Tier`] with a score
//! and the reasons behind it.
//!
//! # Rules
//! Each rule adds points and (usually) a reason. All five always run, in
//! this order:
//!
//! | Rule        | +0                 | +1                 | +2            |
//! |-------------|--------------------|--------------------|---------------|
//! | Pages       | 1 page             | 2 pages            | 3+ pages      |
//! | Notation    | no terms           | count 1..=3        | count > 3     |
//! | Tempo       | no fast tempo word | any fast tempo word | -            |
//! | Accidentals | count <= 10        | count 11..=20      | count > 20    |
//! | Text volume | <= 2000 chars      | 2001..=5000 chars  | > 5000 chars  |
//!
//! Only the text-volume rule gives a reason when it adds nothing.
//!
//! # Tier
//! Total `<= 2` is Easy, `3..=5` Medium, `>= 6` Hard.

pub mod table;

pub use table::ScoringTable;

use crate::models::{FeatureSet, ScoreReport, Tier};
use tracing::debug;

const NOTATION_MANY: u32 = 3;
const ACCIDENTALS_SOME: u32 = 10;
const ACCIDENTALS_MANY: u32 = 20;
const TEXT_LONG: usize = 2000;
const TEXT_VERY_LONG: usize = 5000;

/// Points and optional reason produced by one rule
type RuleHit = (u32, Option<String>);

/// Heuristic difficulty scorer
///
/// Stateless apart from its immutable vocabulary table, so one instance can
/// be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DifficultyScorer {
    table: ScoringTable,
}

impl DifficultyScorer {
    /// Scorer with the built-in vocabularies
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: ScoringTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// Grade one document
    pub fn score(&self, features: &FeatureSet) -> ScoreReport {
        let text_lower = features.extracted_text().to_lowercase();

        let hits = [
            self.score_pages(features.page_count()),
            self.score_notation(&text_lower),
            self.score_tempo(&text_lower),
            self.score_accidentals(&text_lower),
            self.score_text_volume(features.text_length()),
        ];

        let mut score = 0;
        let mut reasons = Vec::new();
        for (points, reason) in hits {
            score += points;
            reasons.extend(reason);
        }

        let tier = Tier::from_score(score);

        debug!(
            tier = %tier,
            score,
            pages = features.page_count(),
            chars = features.text_length(),
            "Scored document"
        );

        ScoreReport {
            tier,
            score,
            reasons,
        }
    }

    fn score_pages(&self, page_count: u32) -> RuleHit {
        match page_count {
            0 | 1 => (0, Some("1 page (simple)".to_string())),
            2 => (1, Some("2 pages (moderate)".to_string())),
            n => (2, Some(format!("{} pages (complex)", n))),
        }
    }

    fn score_notation(&self, text_lower: &str) -> RuleHit {
        let count: u32 = self
            .table
            .notation_terms
            .iter()
            .filter(|(term, _)| text_lower.contains(term.as_str()))
            .map(|(_, &weight)| weight)
            .fold(0u32, u32::saturating_add);

        if count > NOTATION_MANY {
            (2, Some(format!("many complex notation marks ({})", count)))
        } else if count > 0 {
            (1, Some(format!("some complex notation marks ({})", count)))
        } else {
            (0, None)
        }
    }

    fn score_tempo(&self, text_lower: &str) -> RuleHit {
        let fast = self
            .table
            .fast_tempo_terms
            .iter()
            .any(|(term, &weight)| weight > 0 && text_lower.contains(term.as_str()));

        if fast {
            (1, Some("fast tempo".to_string()))
        } else {
            (0, None)
        }
    }

    fn score_accidentals(&self, text_lower: &str) -> RuleHit {
        let count: u32 = self
            .table
            .accidental_symbols
            .iter()
            .filter(|(_, &weight)| weight > 0)
            .map(|(symbol, &weight)| {
                let occurrences = u32::try_from(text_lower.matches(symbol.as_str()).count())
                    .unwrap_or(u32::MAX);
                occurrences.saturating_mul(weight)
            })
            .fold(0u32, u32::saturating_add);

        if count > ACCIDENTALS_MANY {
            (2, Some(format!("many accidentals ({})", count)))
        } else if count > ACCIDENTALS_SOME {
            (1, Some(format!("some accidentals ({})", count)))
        } else {
            (0, None)
        }
    }

    fn score_text_volume(&self, text_length: usize) -> RuleHit {
        if text_length > TEXT_VERY_LONG {
            (2, Some(format!("very long content ({} chars)", text_length)))
        } else if text_length > TEXT_LONG {
            (1, Some(format!("long content ({} chars)", text_length)))
        } else {
            (0, Some(format!("short content ({} chars)", text_length)))
        }
    }
}
