//! LibreTranslate-compatible HTTP client

use super::Translator;
use crate::error::MenuError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Deserialize)]
struct ProviderError {
    error: String,
}

/// Client for `POST {base_url}/translate`
#[derive(Debug, Clone)]
pub struct LibreTranslateClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, MenuError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("menu-ocr-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                MenuError::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}/translate", base_url.trim_end_matches('/')),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for LibreTranslateClient {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, MenuError> {
        let body = TranslateRequest {
            q: text,
            source: "auto",
            target: target_language,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| MenuError::TranslationError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Rate limits and quota errors come back with a JSON `error` field
            let detail = response
                .json::<ProviderError>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| "no details".to_string());
            return Err(MenuError::TranslationError(format!(
                "Provider returned {}: {}",
                status, detail
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| MenuError::TranslationError(format!("Invalid response: {}", e)))?;

        Ok(parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = LibreTranslateClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/translate");
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let client = LibreTranslateClient::new("http://localhost:5000", Some(String::new())).unwrap();
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = TranslateRequest {
            q: "Mercimek çorbası",
            source: "auto",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "Mercimek çorbası", "source": "auto", "target": "en", "format": "text"})
        );
    }
}
