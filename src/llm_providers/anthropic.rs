use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::traits::{LLMError, LLMProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    model: String,
    system_prompt: String,
    base_url: String,
    max_tokens: u32,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String, system_prompt: String) -> Self {
        Self {
            api_key,
            model,
            system_prompt,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

// === Request Structs ===
#[derive(Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    system: &'a str,
    messages: Vec<UserMessage<'a>>,
}

// === Response Structs ===
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Text of the first content block, which must be a non-blank text block.
fn first_text(response: MessagesResponse) -> Result<String, LLMError> {
    if response.stop_reason.as_deref() == Some("max_tokens") {
        warn!("Anthropic response hit the output token ceiling; JSON may be truncated");
    }

    match response.content.into_iter().next() {
        Some(ContentBlock {
            kind,
            text: Some(text),
        }) if kind == "text" && !text.trim().is_empty() => Ok(text),
        _ => Err(LLMError::EmptyResponse),
    }
}

impl LLMProvider for AnthropicProvider {
    #[instrument(skip(self, input), fields(model = %self.model, input_len = input.len()))]
    fn query<'a>(
        &'a self,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LLMError>> + Send + 'a>> {
        Box::pin(async move {
            debug!("Querying Anthropic messages endpoint");

            let url = format!("{}/v1/messages", self.base_url);

            let request_body = MessagesRequest {
                model: &self.model,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                system: &self.system_prompt,
                messages: vec![UserMessage {
                    role: "user",
                    content: vec![TextBlock {
                        kind: "text",
                        text: input,
                    }],
                }],
            };

            let response = self
                .client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request_body)
                .send()
                .await
                .map_err(|e| {
                    error!("Error sending request to Anthropic: {:?}", e);
                    LLMError::Network(e.to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!("HTTP error from Anthropic: {} {}", status, body);
                return Err(LLMError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: MessagesResponse = response.json().await.map_err(|e| {
                error!("Error parsing response from Anthropic: {:?}", e);
                LLMError::InvalidResponse(e.to_string())
            })?;

            let result = first_text(parsed)?;
            debug!("Received {} characters from Anthropic", result.len());
            Ok(result)
        })
    }
}
