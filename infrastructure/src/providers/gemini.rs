//! Gemini gateway
//!
//! Calls the `generateContent` endpoint of the Generative Language API and
//! requests JSON output, with a response schema when the caller has one.

use crate::config::FileGeminiConfig;
use async_trait::async_trait;
use deepthink_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use deepthink_domain::core::string::truncate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name, e.g. "gemini-2.5-pro"
    pub model: String,
    /// API root, without the version segment
    pub base_url: String,
    /// HTTP client timeout. Independent of the invoker's hard timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = FileGeminiConfig::default();
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: defaults.base_url,
            timeout: Duration::from_secs(defaults.timeout_seconds),
        }
    }

    /// Build from the `[gemini]` section and an already resolved key
    pub fn from_file(file: &FileGeminiConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: file.model.clone(),
            base_url: file.base_url.clone(),
            timeout: Duration::from_secs(file.timeout_seconds),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`LlmGateway`] over the Gemini REST API
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    safety_settings: Vec<GeminiSafetySetting>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Serialize)]
struct GeminiSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

impl GeminiRequest {
    fn from_generation(request: &GenerationRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
                response_mime_type: "application/json",
                response_schema: request.response_schema.as_ref().map(gemini_schema),
            },
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| GeminiSafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts
    fn into_text(self) -> Result<String, GatewayError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GatewayError::InvalidResponse(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GatewayError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            debug!(finish_reason = ?candidate.finish_reason, "Gemini returned no text");
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Gemini's schema dialect spells types in upper case
fn gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(gemini_schema).collect()),
        other => other.clone(),
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Connection(error.to_string())
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            temperature = request.temperature,
            max_output_tokens = request.max_output_tokens,
            structured = request.response_schema.is_some(),
            "Gemini request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&GeminiRequest::from_generation(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = truncate(&body, 300);
            warn!(status = status.as_u16(), "Gemini request failed");
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                GatewayError::RateLimited(message)
            } else {
                GatewayError::RequestFailed {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let text = parsed.into_text()?;
        debug!(response_len = text.len(), "Gemini response");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn gateway(server: &MockServer) -> GeminiGateway {
        let config = GeminiConfig::new("test-key", "gemini-test")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_secs(5));
        GeminiGateway::new(config).unwrap()
    }

    fn request(schema: Option<Value>) -> GenerationRequest {
        GenerationRequest {
            prompt: "Plan this".to_string(),
            temperature: 0.3,
            max_output_tokens: 100,
            response_schema: schema,
        }
    }

    fn text_response(parts: &[&str]) -> ResponseTemplate {
        let parts: Vec<Value> = parts.iter().map(|t| json!({ "text": t })).collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        }))
    }

    #[tokio::test]
    async fn test_generate_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Plan this" }] }],
                "generationConfig": {
                    "maxOutputTokens": 100,
                    "responseMimeType": "application/json"
                }
            })))
            .respond_with(text_response(&["{\"task\":", " \"x\"}"]))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server).generate(&request(None)).await.unwrap();
        assert_eq!(text, "{\"task\": \"x\"}");
    }

    #[tokio::test]
    async fn test_schema_types_uppercased() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(body_partial_json(json!({
                "generationConfig": {
                    "responseSchema": {
                        "type": "OBJECT",
                        "properties": { "task": { "type": "STRING" } }
                    }
                }
            })))
            .respond_with(text_response(&["{}"]))
            .expect(1)
            .mount(&server)
            .await;

        let schema = json!({
            "type": "object",
            "properties": { "task": { "type": "string" } }
        });
        gateway(&server).generate(&request(Some(schema))).await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = gateway(&server).generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::RateLimited(ref m) if m == "quota exceeded"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = gateway(&server).generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_missing_text_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "MAX_TOKENS" }]
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(ref m) if m.contains("SAFETY")));
    }

    #[tokio::test]
    async fn test_slow_server_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response(&["late"]).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let config = GeminiConfig::new("test-key", "gemini-test")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200));
        let err = GeminiGateway::new(config)
            .unwrap()
            .generate(&request(None))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_gemini_schema_nested_arrays() {
        let schema = json!({
            "type": "array",
            "items": { "type": "object", "properties": { "type": { "type": "string" } } }
        });
        let converted = gemini_schema(&schema);
        assert_eq!(converted["type"], "ARRAY");
        assert_eq!(converted["items"]["type"], "OBJECT");
        // A property literally named "type" keeps its name
        assert_eq!(converted["items"]["properties"]["type"]["type"], "STRING");
    }

    #[test]
    fn test_from_file_config() {
        let file = FileGeminiConfig::default();
        let config = GeminiConfig::from_file(&file, "k");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout, Duration::from_secs(180));
    }
}
