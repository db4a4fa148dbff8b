//! Header-to-field scoring.
//!
//! A header that equals the field key, label or one of its aliases (after
//! compaction) scores 100. Otherwise the score blends Jaro-Winkler and edit
//! similarity against the closest candidate spelling, with a penalty when the
//! two texts share no word.

use rapidfuzz::distance::{indel, jaro_winkler};
use serde::{Deserialize, Serialize};
use tj_model::SchemaField;

use crate::utils::{compact_key, shares_token, tokens};

/// Multiplier applied when header and candidate share no word.
const TOKEN_NO_OVERLAP_PENALTY: f64 = 0.6;

/// Weight of Jaro-Winkler in the blended similarity; the rest is edit similarity.
const JARO_WEIGHT: f64 = 0.5;

/// Score for a single header-field pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScore {
    /// Final confidence, 0 to 100.
    pub score: u8,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// True when the score came from an exact alias match.
    pub fn is_alias_match(&self) -> bool {
        self.explanation.iter().any(|c| c.name == ALIAS_MATCH)
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    /// Component value (negative for penalties).
    pub value: f64,
    pub description: String,
}

const ALIAS_MATCH: &str = "Alias match";

/// Spellings a header is compared against: key, label, then aliases.
fn candidates(field: &SchemaField) -> impl Iterator<Item = &'static str> {
    [field.key, field.label]
        .into_iter()
        .chain(field.aliases.iter().copied())
}

/// Scores CSV headers against schema fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Exact compacted match against the key, label or an alias.
    pub fn alias_match(&self, header: &str, field: &SchemaField) -> Option<&'static str> {
        let compact = compact_key(header);
        if compact.is_empty() {
            return None;
        }
        candidates(field).find(|candidate| compact_key(candidate) == compact)
    }

    /// Scores one header against one field.
    pub fn score(&self, header: &str, field: &SchemaField) -> ColumnScore {
        if let Some(alias) = self.alias_match(header, field) {
            return ColumnScore {
                score: 100,
                explanation: vec![ScoreComponent {
                    name: ALIAS_MATCH.to_string(),
                    value: 1.0,
                    description: format!("'{header}' matches '{alias}' of {}", field.label),
                }],
            };
        }

        let compact = compact_key(header);
        if compact.is_empty() {
            return ColumnScore {
                score: 0,
                explanation: Vec::new(),
            };
        }
        let header_tokens = tokens(header);

        let mut best: Option<(f64, f64, f64, &str)> = None;
        for candidate in candidates(field) {
            let other = compact_key(candidate);
            let name_sim = jaro_winkler::similarity(compact.chars(), other.chars());
            let edit_sim = indel::normalized_similarity(compact.chars(), other.chars());
            let mut blended = JARO_WEIGHT * name_sim + (1.0 - JARO_WEIGHT) * edit_sim;
            if !shares_token(&header_tokens, &tokens(candidate)) {
                blended *= TOKEN_NO_OVERLAP_PENALTY;
            }
            if best.is_none_or(|(score, ..)| blended > score) {
                best = Some((blended, name_sim, edit_sim, candidate));
            }
        }
        let Some((blended, name_sim, edit_sim, candidate)) = best else {
            return ColumnScore {
                score: 0,
                explanation: Vec::new(),
            };
        };

        let mut explanation = vec![
            ScoreComponent {
                name: "Name similarity".to_string(),
                value: name_sim,
                description: format!("'{header}' vs '{candidate}'"),
            },
            ScoreComponent {
                name: "Edit similarity".to_string(),
                value: edit_sim,
                description: format!("'{header}' vs '{candidate}'"),
            },
        ];
        let weighted = JARO_WEIGHT * name_sim + (1.0 - JARO_WEIGHT) * edit_sim;
        if blended < weighted {
            explanation.push(ScoreComponent {
                name: "No shared words".to_string(),
                value: TOKEN_NO_OVERLAP_PENALTY - 1.0,
                description: format!("'{header}' and '{candidate}' have no word in common"),
            });
        }

        ColumnScore {
            score: to_percent(blended),
            explanation,
        }
    }
}

fn to_percent(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}
