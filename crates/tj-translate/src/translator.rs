//! The translator seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{HeaderTranslationRequest, HeaderTranslations, ValueTranslationRequest, ValueTranslations};

/// A text service that glosses headers and maps raw values to canonical ones.
///
/// Implementations return whatever the service answered; filtering of
/// unusable entries happens in [`crate::enrich`].
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_headers(&self, request: &HeaderTranslationRequest)
    -> Result<HeaderTranslations>;

    async fn translate_values(&self, request: &ValueTranslationRequest)
    -> Result<ValueTranslations>;
}

/// Translator used when translation is disabled; answers with nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate_headers(
        &self,
        _request: &HeaderTranslationRequest,
    ) -> Result<HeaderTranslations> {
        Ok(HeaderTranslations::new())
    }

    async fn translate_values(
        &self,
        _request: &ValueTranslationRequest,
    ) -> Result<ValueTranslations> {
        Ok(ValueTranslations::new())
    }
}
