//! Generation service boundary and its Gemini REST implementation
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GuardConfig;
use crate::error::{GuardResult, ServiceError};

/// One text generation against the external service, with an explicit secret.
///
/// Implementations report failures as raw [`ServiceError`]s and leave retry
/// decisions to the gateway.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str, secret: &str) -> Result<String, ServiceError>;
}

// Finish reasons the service uses for refused content
const BLOCKING_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini `generateContent` over HTTPS.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GuardConfig) -> GuardResult<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("vncontentguard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(secret: &str) -> Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(secret).map_err(|_| ServiceError::Status {
            code: 400,
            message: "API key contains characters not allowed in a header".to_string(),
        })?;
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Pull the generated text out of a decoded response, or report a block.
    fn extract_text(response: GenerateResponse) -> Result<String, ServiceError> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ServiceError::Blocked { reason });
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(ServiceError::Decode("response has no candidates".to_string()));
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                return Err(ServiceError::Blocked {
                    reason: reason.to_string(),
                });
            }
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ServiceError::Decode("candidate carries no text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str, secret: &str) -> Result<String, ServiceError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model, prompt_chars = prompt.chars().count(), "generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(Self::headers(secret)?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let decoded: GenerateResponse = response.json().await?;
        Self::extract_text(decoded)
    }
}

// ======== wire types ========

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Result<String, ServiceError> {
        GeminiClient::extract_text(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_text_parts_are_joined() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(decode(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_prompt_block_is_reported() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            decode(raw),
            Err(ServiceError::Blocked {
                reason: "SAFETY".to_string()
            })
        );
    }

    #[test]
    fn test_safety_finish_reason_is_reported() {
        let raw = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(matches!(decode(raw), Err(ServiceError::Blocked { .. })));
    }

    #[test]
    fn test_empty_candidates_is_decode_error() {
        assert!(matches!(decode(r#"{"candidates":[]}"#), Err(ServiceError::Decode(_))));
    }

    #[test]
    fn test_secret_with_newline_is_rejected_before_sending() {
        assert!(GeminiClient::headers("bad\nkey").is_err());
        assert!(GeminiClient::headers("AIza-good-key").is_ok());
    }
}
