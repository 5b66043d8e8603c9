use async_trait::async_trait;
use ponder_conversation::Role;
use ponder_openai::{
    Client,
    types::request::{self, RequestMessage},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    provider::{Provider, ProviderId},
    query::ChatQuery,
};

static PROVIDER: ProviderId = ProviderId::Glm;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://open.bigmodel.cn/api/paas/v4".to_owned(),
            model: "glm-4".to_owned(),
        }
    }
}

/// Zhipu GLM. Speaks the OpenAI-compatible dialect, streaming included.
#[derive(Debug, Clone)]
pub struct Glm {
    client: Client,
    model: String,
}

impl TryFrom<&GlmConfig> for Glm {
    type Error = Error;

    fn try_from(config: &GlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(PROVIDER));
        }

        Ok(Self {
            client: Client::new(&config.api_key).with_base_url(&config.base_url),
            model: config.model.clone(),
        })
    }
}

impl Glm {
    /// Build request for the GLM API.
    ///
    /// The system instruction travels as a leading `system` entry; GLM only
    /// distinguishes user and assistant for the rest, so any other role maps
    /// to `user`.
    fn build_request(&self, query: &ChatQuery) -> request::ChatCompletion {
        let mut messages = Vec::with_capacity(query.messages.len());

        if let Some(system) = query.system() {
            messages.push(RequestMessage::system(system));
        }

        for message in query.conversation() {
            messages.push(match message.role {
                Role::Assistant => RequestMessage::assistant(&message.content),
                _ => RequestMessage::user(&message.content),
            });
        }

        trace!(
            model = self.model,
            messages_size = messages.len(),
            "Built GLM request."
        );

        request::ChatCompletion {
            model: self.model.clone(),
            messages,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Provider for Glm {
    fn supports_streaming(&self) -> bool {
        true
    }

    async fn chat_completion(&self, query: ChatQuery) -> Result<String> {
        debug!(model = self.model, "Starting GLM chat completion.");

        let request = self.build_request(&query);
        let response = self.client.chat_completion(request).await?;
        Ok(response.into_content())
    }

    async fn chat_completion_stream(
        &self,
        query: ChatQuery,
        on_increment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        debug!(model = self.model, "Starting GLM chat completion stream.");

        let request = self.build_request(&query);
        self.client
            .chat_completion_stream(request, on_increment)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
#[path = "glm_tests.rs"]
mod tests;
