//! Remote translation for CSV headers and categorical values.
//!
//! Translation only ever adds information: a failed, slow or malformed
//! response leaves the import with its deterministic matches.

mod config;
mod enrich;
mod error;
mod http;
mod translator;
mod types;

pub use config::TranslatorConfig;
pub use enrich::{
    Enrichment, accept_header_translations, accept_value_translations, enrich,
    header_candidates, needs_translation, value_candidates,
};
pub use error::{Result, TranslateError};
pub use http::HttpTranslator;
pub use translator::{NoopTranslator, Translator};
pub use types::{
    HeaderTranslationRequest, HeaderTranslations, ValueTranslationRequest, ValueTranslations,
};
