//! Wire types for the translator service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Original header to English gloss.
pub type HeaderTranslations = BTreeMap<String, String>;

/// Field key to (raw value to canonical value).
pub type ValueTranslations = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderTranslationRequest {
    pub headers: Vec<String>,
}

/// Raw categorical values grouped by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTranslationRequest {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValueTranslationRequest {
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }
}
