//! Best-effort enrichment of deterministic matches with translations.
//!
//! Only text with non-ASCII characters triggers a call: unmatched ASCII
//! headers are assumed to be English already and are left for manual mapping.

use std::collections::BTreeMap;
use std::time::Duration;

use tj_model::{CATEGORICAL_FIELDS, ColumnMatch};
use tj_normalize::NormalizationTable;
use tracing::{debug, info, warn};

use crate::error::{Result, TranslateError};
use crate::translator::Translator;
use crate::types::{
    HeaderTranslationRequest, HeaderTranslations, ValueTranslationRequest, ValueTranslations,
};

/// Accepted translations for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// Original header to English gloss.
    pub header_glosses: HeaderTranslations,
    /// Field key to (raw value to canonical value).
    pub values: ValueTranslations,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.header_glosses.is_empty() && self.values.values().all(BTreeMap::is_empty)
    }
}

/// True for non-blank text with at least one non-ASCII character.
pub fn needs_translation(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.is_ascii()
}

/// Unassigned headers worth translating.
pub fn header_candidates(matches: &[ColumnMatch]) -> Vec<String> {
    matches
        .iter()
        .filter(|m| !m.is_assigned() && needs_translation(&m.csv_header))
        .map(|m| m.csv_header.clone())
        .collect()
}

/// Unresolved categorical values worth translating, per field.
///
/// A field qualifies when any of its unresolved values is non-ASCII; all of
/// its unresolved values are then sent, ASCII ones like "Perdu" included.
pub fn value_candidates(table: &NormalizationTable) -> BTreeMap<String, Vec<String>> {
    CATEGORICAL_FIELDS
        .iter()
        .filter_map(|field| {
            let values = table.unresolved(field);
            values
                .iter()
                .any(|value| needs_translation(value))
                .then(|| ((*field).to_string(), values))
        })
        .collect()
}

fn usable(original: &str, translated: &str) -> bool {
    let translated = translated.trim();
    !translated.is_empty() && !translated.eq_ignore_ascii_case(original.trim())
}

/// Keeps glosses for requested headers that are non-empty and differ from the header.
pub fn accept_header_translations(
    requested: &[String],
    response: HeaderTranslations,
) -> HeaderTranslations {
    response
        .into_iter()
        .filter(|(header, gloss)| requested.contains(header) && usable(header, gloss))
        .map(|(header, gloss)| (header, gloss.trim().to_string()))
        .collect()
}

/// Keeps translations for requested fields and values that are non-empty and differ.
pub fn accept_value_translations(
    requested: &BTreeMap<String, Vec<String>>,
    response: ValueTranslations,
) -> ValueTranslations {
    response
        .into_iter()
        .filter_map(|(field, values)| {
            let asked = requested.get(&field)?;
            let kept: BTreeMap<String, String> = values
                .into_iter()
                .filter(|(raw, canonical)| asked.contains(raw) && usable(raw, canonical))
                .map(|(raw, canonical)| (raw, canonical.trim().to_string()))
                .collect();
            (!kept.is_empty()).then_some((field, kept))
        })
        .collect()
}

async fn with_budget<T>(
    budget: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(budget, call)
        .await
        .unwrap_or_else(|_| Err(TranslateError::Timeout(budget.as_millis())))
}

/// Runs header and value translation concurrently and filters the answers.
///
/// Never fails: any error, including running past `budget`, is logged and
/// that half of the enrichment is left empty.
pub async fn enrich(
    translator: &dyn Translator,
    headers: Vec<String>,
    values: BTreeMap<String, Vec<String>>,
    budget: Duration,
) -> Enrichment {
    let header_request = HeaderTranslationRequest {
        headers: headers.clone(),
    };
    let value_request = ValueTranslationRequest {
        fields: values.clone(),
    };

    let header_call = async {
        if header_request.headers.is_empty() {
            return Ok(HeaderTranslations::new());
        }
        with_budget(budget, translator.translate_headers(&header_request)).await
    };
    let value_call = async {
        if value_request.is_empty() {
            return Ok(ValueTranslations::new());
        }
        with_budget(budget, translator.translate_values(&value_request)).await
    };
    let (header_result, value_result) = futures::join!(header_call, value_call);

    let header_glosses = match header_result {
        Ok(response) => accept_header_translations(&headers, response),
        Err(err) => {
            warn!(error = %err, "{}", err.user_message());
            HeaderTranslations::new()
        }
    };
    let values = match value_result {
        Ok(response) => accept_value_translations(&values, response),
        Err(err) => {
            warn!(error = %err, "{}", err.user_message());
            ValueTranslations::new()
        }
    };

    let accepted_values: usize = values.values().map(BTreeMap::len).sum();
    if header_glosses.is_empty() && accepted_values == 0 {
        debug!("no translations accepted");
    } else {
        info!(
            headers = header_glosses.len(),
            values = accepted_values,
            "accepted translations"
        );
    }
    Enrichment {
        header_glosses,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tj_model::field::keys;

    #[test]
    fn test_needs_translation() {
        assert!(needs_translation("Résultat"));
        assert!(needs_translation("方向"));
        assert!(!needs_translation("Column A"));
        assert!(!needs_translation("   "));
    }

    #[test]
    fn test_header_candidates_skip_assigned_and_ascii() {
        let matches = vec![
            ColumnMatch::assigned("Datum", keys::TRADE_DATE, 70),
            ColumnMatch::unassigned("Résultat"),
            ColumnMatch::unassigned("Column A"),
        ];
        assert_eq!(header_candidates(&matches), vec!["Résultat"]);
    }

    #[test]
    fn test_value_candidates() {
        let mut table = NormalizationTable::new();
        table.observe(keys::TRADE_OUTCOME, ["Gagné", "Win", "Perdu"]);
        table.observe(keys::DIRECTION, ["Buy", "sideways"]);
        let candidates = value_candidates(&table);
        assert_eq!(
            candidates.get(keys::TRADE_OUTCOME),
            Some(&vec!["Gagné".to_string(), "Perdu".to_string()])
        );
        assert!(!candidates.contains_key(keys::DIRECTION));
    }

    #[test]
    fn test_accept_header_translations() {
        let requested = vec!["Résultat".to_string(), "Richtung".to_string()];
        let response = HeaderTranslations::from([
            ("Résultat".to_string(), " result ".to_string()),
            ("Richtung".to_string(), "richtung".to_string()),
            ("Other".to_string(), "market".to_string()),
        ]);
        let accepted = accept_header_translations(&requested, response);
        assert_eq!(
            accepted,
            HeaderTranslations::from([("Résultat".to_string(), "result".to_string())])
        );
    }

    #[test]
    fn test_accept_value_translations() {
        let requested = BTreeMap::from([(
            keys::TRADE_OUTCOME.to_string(),
            vec!["Gagné".to_string()],
        )]);
        let response = ValueTranslations::from([
            (
                keys::TRADE_OUTCOME.to_string(),
                BTreeMap::from([
                    ("Gagné".to_string(), "Win".to_string()),
                    ("Perdu".to_string(), "Lose".to_string()),
                ]),
            ),
            (
                keys::DIRECTION.to_string(),
                BTreeMap::from([("Achat".to_string(), "Long".to_string())]),
            ),
        ]);
        let accepted = accept_value_translations(&requested, response);
        assert_eq!(accepted.len(), 1);
        assert_eq!(
            accepted[keys::TRADE_OUTCOME],
            BTreeMap::from([("Gagné".to_string(), "Win".to_string())])
        );
    }
}
