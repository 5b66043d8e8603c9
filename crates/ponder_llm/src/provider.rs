pub mod anthropic;
pub mod glm;
pub mod mock;
pub mod openai;

use std::{fmt, str::FromStr};

use anthropic::Anthropic;
use async_trait::async_trait;
use glm::Glm;
use openai::Openai;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    query::ChatQuery,
};

/// The closed set of supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Glm,
    Openai,
    Anthropic,
}

impl ProviderId {
    /// Human-readable provider name for configuration UIs.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Glm => "GLM (Zhipu)",
            Self::Openai => "OpenAI (GPT)",
            Self::Anthropic => "Claude (Anthropic)",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glm => f.write_str("glm"),
            Self::Openai => f.write_str("openai"),
            Self::Anthropic => f.write_str("anthropic"),
        }
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "glm" => Ok(Self::Glm),
            "openai" => Ok(Self::Openai),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(Error::UnknownProvider(s.to_owned())),
        }
    }
}

/// Per-provider credentials and endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub glm: glm::GlmConfig,
    pub openai: openai::OpenaiConfig,
    pub anthropic: anthropic::AnthropicConfig,
}

/// An LLM backend the turn orchestrator can talk to.
#[async_trait]
pub trait Provider: fmt::Debug + Send + Sync {
    /// Whether the provider can deliver incremental response text.
    ///
    /// Streaming-capable providers get the two-stage generation path;
    /// everything else degrades to a single whole-response call.
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Perform a non-streaming chat completion, returning the full text.
    async fn chat_completion(&self, query: ChatQuery) -> Result<String>;

    /// Perform a streaming chat completion.
    ///
    /// `on_increment` observes the entire accumulated text after every
    /// received fragment. Resolves with the final text.
    ///
    /// The default implementation degrades to the single-shot call and
    /// reports one increment with the whole response.
    async fn chat_completion_stream(
        &self,
        query: ChatQuery,
        on_increment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        let text = self.chat_completion(query).await?;
        on_increment(&text);
        Ok(text)
    }
}

/// Construct the provider selected by `id` from its configuration.
///
/// Fails before any network activity when the provider's credential is
/// missing.
pub fn get_provider(id: ProviderId, config: &ProvidersConfig) -> Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = match id {
        ProviderId::Glm => Box::new(Glm::try_from(&config.glm)?),
        ProviderId::Openai => Box::new(Openai::try_from(&config.openai)?),
        ProviderId::Anthropic => Box::new(Anthropic::try_from(&config.anthropic)?),
    };

    Ok(provider)
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
