use async_trait::async_trait;
use ponder_conversation::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, trace};

use crate::{
    error::{Error, Result},
    provider::{Provider, ProviderId},
    query::ChatQuery,
};

static PROVIDER: ProviderId = ProviderId::Anthropic;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com/v1".to_owned(),
            model: "claude-3-sonnet-20240229".to_owned(),
            max_tokens: 1024,
        }
    }
}

/// Anthropic Claude, whole-response calls only.
#[derive(Debug, Clone)]
pub struct Anthropic {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl TryFrom<&AnthropicConfig> for Anthropic {
    type Error = Error;

    fn try_from(config: &AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(PROVIDER));
        }

        let mut base_url = config.base_url.clone();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http_client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

impl Anthropic {
    /// Build request for the Anthropic Messages API.
    ///
    /// The system instruction goes into the top-level `system` field; the
    /// conversation itself only knows user and assistant roles.
    fn build_request(&self, query: &ChatQuery) -> MessagesRequest {
        let messages = query
            .conversation()
            .map(|message| WireMessage {
                role: match message.role {
                    Role::Assistant => "assistant",
                    _ => "user",
                },
                content: message.content.clone(),
            })
            .collect::<Vec<_>>();

        trace!(
            model = self.model,
            messages_size = messages.len(),
            "Built Anthropic request."
        );

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages,
            system: query.system().map(str::to_owned),
        }
    }
}

#[async_trait]
impl Provider for Anthropic {
    async fn chat_completion(&self, query: ChatQuery) -> Result<String> {
        debug!(model = self.model, "Starting Anthropic chat completion.");

        let request = self.build_request(&query);
        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let status_text = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned();
            let body = response.text().await.unwrap_or_default();

            error!(status = status.as_u16(), body, "Unexpected response.");

            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(&body, &status_text),
            });
        }

        let response = response.json::<MessagesResponse>().await?;
        Ok(response.into_text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,

    #[serde(flatten)]
    _extra: Value,
}

impl MessagesResponse {
    /// The first text block, empty if the response carried none.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .find_map(|block| block.text)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,

    #[serde(flatten)]
    _extra: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Prefer the provider's own error message when the body parses, falling
/// back to the raw body, then to the HTTP status text.
fn api_error_message(body: &str, status_text: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error.message;
    }

    if !body.trim().is_empty() {
        return body.trim().to_owned();
    }

    status_text.to_owned()
}

#[cfg(test)]
#[path = "anthropic_tests.rs"]
mod tests;
