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

static PROVIDER: ProviderId = ProviderId::Openai;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenaiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for OpenaiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-3.5-turbo".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Openai {
    client: Client,
    model: String,
}

impl TryFrom<&OpenaiConfig> for Openai {
    type Error = Error;

    fn try_from(config: &OpenaiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(PROVIDER));
        }

        Ok(Self {
            client: Client::new(&config.api_key).with_base_url(&config.base_url),
            model: config.model.clone(),
        })
    }
}

impl Openai {
    /// Build request for the OpenAI API. Roles map through one-to-one,
    /// system included.
    fn build_request(&self, query: &ChatQuery) -> request::ChatCompletion {
        let messages = query
            .messages
            .iter()
            .map(|message| match message.role {
                Role::System => RequestMessage::system(&message.content),
                Role::User => RequestMessage::user(&message.content),
                Role::Assistant => RequestMessage::assistant(&message.content),
            })
            .collect::<Vec<_>>();

        trace!(
            model = self.model,
            messages_size = messages.len(),
            "Built OpenAI request."
        );

        request::ChatCompletion {
            model: self.model.clone(),
            messages,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Provider for Openai {
    fn supports_streaming(&self) -> bool {
        true
    }

    async fn chat_completion(&self, query: ChatQuery) -> Result<String> {
        debug!(model = self.model, "Starting OpenAI chat completion.");

        let request = self.build_request(&query);
        let response = self.client.chat_completion(request).await?;
        Ok(response.into_content())
    }

    async fn chat_completion_stream(
        &self,
        query: ChatQuery,
        on_increment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        debug!(model = self.model, "Starting OpenAI chat completion stream.");

        let request = self.build_request(&query);
        self.client
            .chat_completion_stream(request, on_increment)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
