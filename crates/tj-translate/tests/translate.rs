//! Enrichment against fake and local HTTP translators.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tj_model::field::keys;
use tj_translate::{
    HeaderTranslationRequest, HeaderTranslations, HttpTranslator, NoopTranslator, Result,
    TranslateError, Translator, TranslatorConfig, ValueTranslationRequest, ValueTranslations,
    enrich,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct FixedTranslator;

#[async_trait]
impl Translator for FixedTranslator {
    async fn translate_headers(
        &self,
        request: &HeaderTranslationRequest,
    ) -> Result<HeaderTranslations> {
        Ok(request
            .headers
            .iter()
            .map(|h| (h.clone(), "result".to_string()))
            .collect())
    }

    async fn translate_values(
        &self,
        _request: &ValueTranslationRequest,
    ) -> Result<ValueTranslations> {
        Ok(BTreeMap::from([(
            keys::TRADE_OUTCOME.to_string(),
            BTreeMap::from([
                ("Gagné".to_string(), "Win".to_string()),
                ("Perdu".to_string(), "Lose".to_string()),
            ]),
        )]))
    }
}

struct BrokenTranslator;

#[async_trait]
impl Translator for BrokenTranslator {
    async fn translate_headers(
        &self,
        _request: &HeaderTranslationRequest,
    ) -> Result<HeaderTranslations> {
        Err(TranslateError::Network("connection refused".to_string()))
    }

    async fn translate_values(
        &self,
        _request: &ValueTranslationRequest,
    ) -> Result<ValueTranslations> {
        Err(TranslateError::Malformed("expected object".to_string()))
    }
}

struct SlowTranslator;

#[async_trait]
impl Translator for SlowTranslator {
    async fn translate_headers(
        &self,
        request: &HeaderTranslationRequest,
    ) -> Result<HeaderTranslations> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        FixedTranslator.translate_headers(request).await
    }

    async fn translate_values(
        &self,
        request: &ValueTranslationRequest,
    ) -> Result<ValueTranslations> {
        FixedTranslator.translate_values(request).await
    }
}

fn outcome_values() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(
        keys::TRADE_OUTCOME.to_string(),
        vec!["Gagné".to_string(), "Perdu".to_string()],
    )])
}

#[tokio::test]
async fn fixed_translator_fills_both_halves() {
    let enrichment = enrich(
        &FixedTranslator,
        vec!["Résultat".to_string()],
        outcome_values(),
        Duration::from_secs(5),
    )
    .await;
    assert_eq!(enrichment.header_glosses["Résultat"], "result");
    assert_eq!(enrichment.values[keys::TRADE_OUTCOME]["Perdu"], "Lose");
}

#[tokio::test]
async fn failures_are_swallowed() {
    let enrichment = enrich(
        &BrokenTranslator,
        vec!["Résultat".to_string()],
        outcome_values(),
        Duration::from_secs(5),
    )
    .await;
    assert!(enrichment.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_half_times_out_alone() {
    let enrichment = enrich(
        &SlowTranslator,
        vec!["Résultat".to_string()],
        outcome_values(),
        Duration::from_secs(2),
    )
    .await;
    assert!(enrichment.header_glosses.is_empty());
    assert_eq!(enrichment.values[keys::TRADE_OUTCOME]["Gagné"], "Win");
}

#[tokio::test]
async fn nothing_to_translate_skips_calls() {
    let enrichment = enrich(
        &BrokenTranslator,
        Vec::new(),
        BTreeMap::new(),
        Duration::from_secs(1),
    )
    .await;
    assert!(enrichment.is_empty());
    let enrichment = enrich(
        &NoopTranslator,
        vec!["Résultat".to_string()],
        outcome_values(),
        Duration::from_secs(1),
    )
    .await;
    assert!(enrichment.is_empty());
}

/// Serves one canned HTTP response and returns the base URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{addr}")
}

fn config(endpoint: &str) -> TranslatorConfig {
    TranslatorConfig {
        enabled: true,
        endpoint: Some(endpoint.to_string()),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn http_translator_parses_headers() {
    let endpoint = serve_once("HTTP/1.1 200 OK", r#"{"Résultat":"result"}"#).await;
    let translator = HttpTranslator::new(&endpoint, &config(&endpoint)).unwrap();
    let response = translator
        .translate_headers(&HeaderTranslationRequest {
            headers: vec!["Résultat".to_string()],
        })
        .await
        .unwrap();
    assert_eq!(response["Résultat"], "result");
}

#[tokio::test]
async fn http_translator_reports_status() {
    let endpoint = serve_once("HTTP/1.1 503 Service Unavailable", r#"{"error":"busy"}"#).await;
    let translator = HttpTranslator::new(&endpoint, &config(&endpoint)).unwrap();
    let err = translator
        .translate_values(&ValueTranslationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Status { status: 503, .. }));
}

#[tokio::test]
async fn http_translator_rejects_malformed_body() {
    let endpoint = serve_once("HTTP/1.1 200 OK", r#"["not", "a", "map"]"#).await;
    let translator = HttpTranslator::new(&endpoint, &config(&endpoint)).unwrap();
    let err = translator
        .translate_headers(&HeaderTranslationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Malformed(_)));
}
