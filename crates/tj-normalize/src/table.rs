//! Per-import lookup of categorical values.
//!
//! The table is filled from the distinct values observed in each categorical
//! column. Built-in aliases resolve first; values they miss may later be
//! resolved by translation, but a translated entry never replaces an alias
//! entry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tj_model::field::keys;
use tj_model::{CATEGORICAL_FIELDS, Direction, TradeOutcome};
use tracing::debug;

use crate::aliases::{fold_token, resolve_categorical};

/// Where a table entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Alias,
    Translated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationEntry {
    pub canonical: String,
    pub source: EntrySource,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizationTable {
    entries: BTreeMap<String, BTreeMap<String, NormalizationEntry>>,
    /// Raw spellings no alias resolved, per field, in first-seen form.
    pending: BTreeMap<String, BTreeSet<String>>,
}

/// Canonical spelling when `value` is already canonical for `field`.
fn canonical_spelling(field: &str, value: &str) -> Option<&'static str> {
    match field {
        keys::DIRECTION => value.parse::<Direction>().ok().map(|d| d.as_str()),
        keys::TRADE_OUTCOME | keys::BE_FINAL_RESULT => {
            value.parse::<TradeOutcome>().ok().map(|o| o.as_str())
        }
        _ => None,
    }
}

impl NormalizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records observed raw values for a categorical field.
    ///
    /// Values matching a built-in alias get an alias entry; the rest are kept
    /// as unresolved. Non-categorical fields are ignored.
    pub fn observe<'a>(&mut self, field: &str, values: impl IntoIterator<Item = &'a str>) {
        if !CATEGORICAL_FIELDS.contains(&field) {
            return;
        }
        for raw in values {
            let key = fold_token(raw);
            if key.is_empty() {
                continue;
            }
            if let Some(canonical) = resolve_categorical(field, raw) {
                self.entries.entry(field.to_string()).or_default().insert(
                    key,
                    NormalizationEntry {
                        canonical: canonical.to_string(),
                        source: EntrySource::Alias,
                    },
                );
            } else if !self.has_entry(field, &key) {
                self.pending
                    .entry(field.to_string())
                    .or_default()
                    .insert(raw.trim().to_string());
            }
        }
    }

    fn has_entry(&self, field: &str, key: &str) -> bool {
        self.entries
            .get(field)
            .is_some_and(|entries| entries.contains_key(key))
    }

    /// Raw values of `field` that nothing has resolved yet.
    pub fn unresolved(&self, field: &str) -> Vec<String> {
        self.pending
            .get(field)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Fields that still have unresolved values.
    pub fn fields_with_unresolved(&self) -> Vec<String> {
        self.pending
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, _)| field.clone())
            .collect()
    }

    /// Adds translated entries for `field`; returns how many were accepted.
    ///
    /// A translation is accepted only when its target is a canonical value
    /// for the field and the raw value has no alias resolution.
    pub fn merge_translated(&mut self, field: &str, translations: &BTreeMap<String, String>) -> usize {
        if !CATEGORICAL_FIELDS.contains(&field) {
            return 0;
        }
        let mut accepted = 0;
        for (raw, target) in translations {
            let key = fold_token(raw);
            if key.is_empty() || resolve_categorical(field, raw).is_some() {
                continue;
            }
            let Some(canonical) = canonical_spelling(field, target) else {
                debug!(field, raw = %raw, "ignored non-canonical translated value");
                continue;
            };
            let entries = self.entries.entry(field.to_string()).or_default();
            if entries
                .get(&key)
                .is_some_and(|entry| entry.source == EntrySource::Alias)
            {
                continue;
            }
            entries.insert(
                key.clone(),
                NormalizationEntry {
                    canonical: canonical.to_string(),
                    source: EntrySource::Translated,
                },
            );
            if let Some(pending) = self.pending.get_mut(field) {
                pending.retain(|value| fold_token(value) != key);
            }
            accepted += 1;
        }
        accepted
    }

    /// Canonical value for a raw cell, from the table or the built-in aliases.
    pub fn resolve(&self, field: &str, raw: &str) -> Option<&str> {
        let key = fold_token(raw);
        if let Some(entry) = self.entries.get(field).and_then(|entries| entries.get(&key)) {
            return Some(entry.canonical.as_str());
        }
        resolve_categorical(field, raw)
    }

    pub fn entry(&self, field: &str, raw: &str) -> Option<&NormalizationEntry> {
        self.entries.get(field)?.get(&fold_token(raw))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_observe_splits_resolved_and_pending() {
        let mut table = NormalizationTable::new();
        table.observe(keys::DIRECTION, ["Buy", "Achat", "Vente", "buy"]);
        assert_eq!(table.resolve(keys::DIRECTION, "BUY"), Some("Long"));
        assert_eq!(table.unresolved(keys::DIRECTION), vec!["Achat", "Vente"]);
        assert_eq!(table.fields_with_unresolved(), vec![keys::DIRECTION]);
    }

    #[test]
    fn test_translation_fills_pending() {
        let mut table = NormalizationTable::new();
        table.observe(keys::TRADE_OUTCOME, ["Gagné", "Perdu"]);
        let accepted = table.merge_translated(
            keys::TRADE_OUTCOME,
            &translations(&[("Gagné", "Win"), ("Perdu", "lose")]),
        );
        assert_eq!(accepted, 2);
        assert_eq!(table.resolve(keys::TRADE_OUTCOME, "gagné"), Some("Win"));
        assert_eq!(table.resolve(keys::TRADE_OUTCOME, "PERDU"), Some("Lose"));
        assert!(table.unresolved(keys::TRADE_OUTCOME).is_empty());
    }

    #[test]
    fn test_translation_never_overrides_alias() {
        let mut table = NormalizationTable::new();
        table.observe(keys::DIRECTION, ["buy"]);
        let accepted =
            table.merge_translated(keys::DIRECTION, &translations(&[("buy", "Short")]));
        assert_eq!(accepted, 0);
        assert_eq!(table.resolve(keys::DIRECTION, "buy"), Some("Long"));
        assert_eq!(
            table.entry(keys::DIRECTION, "buy").map(|e| e.source),
            Some(EntrySource::Alias)
        );
    }

    #[test]
    fn test_non_canonical_translation_rejected() {
        let mut table = NormalizationTable::new();
        table.observe(keys::DIRECTION, ["Achat"]);
        let accepted =
            table.merge_translated(keys::DIRECTION, &translations(&[("Achat", "purchase")]));
        assert_eq!(accepted, 0);
        assert_eq!(table.resolve(keys::DIRECTION, "Achat"), None);
    }

    #[test]
    fn test_non_categorical_fields_ignored() {
        let mut table = NormalizationTable::new();
        table.observe(keys::MARKET, ["EURUSD"]);
        assert!(table.is_empty());
        assert!(table.unresolved(keys::MARKET).is_empty());
    }
}
