//! Column mapping for trade CSV imports.
//!
//! Mapping runs in three layers:
//!
//! 1. [`HeaderMatcher`] scores each header against the field catalog.
//! 2. [`ValuePatternMatcher`] inspects sampled cells for dates, times and
//!    direction or outcome vocabularies.
//! 3. [`merge_matches`] combines both into one mapping where each field is
//!    held by at most one column.
//!
//! [`MappingState`] then carries the mapping through manual edits.

mod error;
mod header;
mod merge;
mod options;
mod patterns;
mod score;
mod state;
mod utils;

pub use error::{MappingError, Result};
pub use header::HeaderMatcher;
pub use merge::{enforce_one_to_one, merge_matches};
pub use options::MatchOptions;
pub use patterns::{ValueHint, ValueKind, ValueMatchReport, ValuePatternMatcher, ValueSuggestion};
pub use score::{ColumnScore, ScoreComponent, ScoringEngine};
pub use state::{MappingState, MappingSummary};
pub use utils::{compact_key, normalize_text};
