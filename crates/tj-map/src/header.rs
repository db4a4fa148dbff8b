//! Header matching.

use std::collections::{BTreeMap, BTreeSet};

use tj_model::{ColumnMatch, SchemaField, TRADE_FIELDS};
use tracing::debug;

use crate::options::MatchOptions;
use crate::score::{ColumnScore, ScoringEngine};

/// Assigns schema fields to CSV headers by header text alone.
///
/// Assignment is one greedy pass in file order: each header takes its best
/// still-unclaimed field when that score reaches the threshold. An exact
/// alias scores 100. Ties go to the field listed first in the catalog.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    engine: ScoringEngine,
    options: MatchOptions,
    fields: &'static [SchemaField],
}

impl Default for HeaderMatcher {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}

impl HeaderMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            engine: ScoringEngine::new(),
            options,
            fields: TRADE_FIELDS,
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Scores a header, taking the better of its own text and its gloss.
    pub fn score(&self, header: &str, gloss: Option<&str>, field: &SchemaField) -> ColumnScore {
        let own = self.engine.score(header, field);
        match gloss {
            Some(gloss) => {
                let translated = self.engine.score(gloss, field);
                if translated.score > own.score {
                    translated
                } else {
                    own
                }
            }
            None => own,
        }
    }

    /// Matches headers using their own text only.
    pub fn match_headers(&self, headers: &[String]) -> Vec<ColumnMatch> {
        self.match_with_glosses(headers, &BTreeMap::new())
    }

    /// Matches headers, also scoring the translated gloss of each header.
    ///
    /// Output keeps one entry per header, in file order, with the original
    /// header text.
    pub fn match_with_glosses(
        &self,
        headers: &[String],
        glosses: &BTreeMap<String, String>,
    ) -> Vec<ColumnMatch> {
        let mut matches: Vec<ColumnMatch> = headers.iter().map(ColumnMatch::unassigned).collect();
        let mut claimed: BTreeSet<&'static str> = BTreeSet::new();
        let gloss_of = |header: &str| glosses.get(header).map(String::as_str);

        for (idx, header) in headers.iter().enumerate() {
            let mut best: Option<(&'static SchemaField, u8)> = None;
            for field in self.fields {
                if claimed.contains(field.key) {
                    continue;
                }
                let score = self.score(header, gloss_of(header), field).score;
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((field, score));
                }
            }
            match best {
                Some((field, score)) if score >= self.options.header_threshold => {
                    claimed.insert(field.key);
                    matches[idx].assign(field.key, score);
                    debug!(header = %header, field = field.key, score, "header matched");
                }
                Some((field, score)) => {
                    debug!(header = %header, closest = field.key, score, "header left unmatched");
                }
                None => {}
            }
        }
        matches
    }
}
