//! Drives one user turn through its provider calls and conversation-store
//! writes.
//!
//! Streaming-capable providers get a two-stage generation: a first pass
//! elicits only a reasoning trace, a second pass (seeded with that trace,
//! without the conversation history) elicits only the answer. Both stages
//! render live into the placeholder assistant message. Providers without
//! streaming degrade to a single whole-response call.

use ponder_conversation::{ConversationId, ConversationStore, Message, MessageId, Role};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    extract::{self, SegmentTags},
    prompt,
    provider::Provider,
    query::ChatQuery,
    title,
};

/// Per-turn configuration.
#[derive(Debug, Clone, Default)]
pub struct TurnConfig {
    /// The user's configured system prompt. A built-in default applies when
    /// unset or blank.
    pub system_prompt: Option<String>,

    /// Sentinel tags delimiting thinking and answer segments.
    pub tags: SegmentTags,
}

/// Provider-call outcome of a turn, before finalization.
enum TurnFlow {
    /// A real answer was produced.
    Success(String),

    /// Stage one produced a trace but stage two failed; the content keeps
    /// the trace with an inline error as the answer.
    Degraded(String),
}

/// Runs turns for a conversation against one provider.
///
/// At most one turn may be in flight per conversation; serializing
/// submissions is the caller's responsibility (the reference UI disables
/// input while a turn is loading).
pub struct Orchestrator<'a> {
    provider: &'a dyn Provider,
    store: &'a mut dyn ConversationStore,
    config: TurnConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        provider: &'a dyn Provider,
        store: &'a mut dyn ConversationStore,
        config: TurnConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Run one turn: append the user message, then stream the assistant
    /// reply into a placeholder message until it finalizes.
    ///
    /// Provider failures never bubble out of a started turn; they finalize
    /// the placeholder with an inline error instead. The returned id is the
    /// assistant message, already finalized by the time this resolves.
    pub async fn run_turn(
        &mut self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<MessageId> {
        self.store
            .append_message(conversation, Message::user(text.trim()))?;

        self.complete_turn(conversation).await
    }

    /// Edit a previous user message and replay from there: everything after
    /// the edited message is discarded, then the turn reruns with the new
    /// content.
    pub async fn edit_and_resend(
        &mut self,
        conversation: ConversationId,
        message: MessageId,
        text: &str,
    ) -> Result<MessageId> {
        self.store
            .update_message_content(conversation, message, text.trim())?;
        self.store.truncate_after(conversation, message)?;

        self.complete_turn(conversation).await
    }

    async fn complete_turn(&mut self, conversation: ConversationId) -> Result<MessageId> {
        let history = self.store.messages(conversation)?;
        let Some((current, prior)) = history.split_last() else {
            return Err(Error::MissingUserMessage);
        };
        if current.role != Role::User {
            return Err(Error::MissingUserMessage);
        }

        let first_round = prior.iter().all(|m| m.role == Role::System);
        let user_text = current.content.clone();

        let placeholder = self
            .store
            .append_message(conversation, Message::assistant_placeholder())?;

        debug!(
            %conversation,
            message = %placeholder,
            two_stage = self.provider.supports_streaming(),
            "Starting turn."
        );

        let flow = if self.provider.supports_streaming() {
            self.two_stage(conversation, placeholder, prior, &user_text)
                .await
        } else {
            self.single_call(prior, &user_text).await
        };

        let (content, success) = match flow {
            Ok(TurnFlow::Success(content)) => (content, true),
            Ok(TurnFlow::Degraded(content)) => (content, false),
            Err(error) => {
                warn!(%conversation, %error, "Turn failed.");
                (format!("Error: {error}"), false)
            }
        };

        self.store
            .update_message_content(conversation, placeholder, &content)?;
        self.store
            .set_message_streaming(conversation, placeholder, false)?;

        if success && first_round {
            let answer = extract::extract(&self.config.tags, &content, false).answer;
            let title = title::generate(&user_text, Some(&answer));

            debug!(%conversation, title, "Auto-titling conversation after first turn.");
            self.store.rename_if_auto(conversation, &title)?;
        }

        Ok(placeholder)
    }

    async fn two_stage(
        &mut self,
        conversation: ConversationId,
        placeholder: MessageId,
        prior: &[Message],
        user_text: &str,
    ) -> Result<TurnFlow> {
        let tags = self.config.tags.clone();
        let provider = self.provider;
        let store = &mut *self.store;

        // Stage one: elicit only the reasoning trace, against the full
        // conversation history.
        let query = ChatQuery::default()
            .with_system(prompt::thinking_system(&tags))
            .with_history(prior)
            .with_user(user_text);

        let mut on_increment = |accumulated: &str| {
            let segments = extract::extract(&tags, accumulated, true);
            let thinking = if segments.thinking.is_empty() {
                accumulated.trim().to_owned()
            } else {
                segments.thinking
            };

            // Answer pane renders empty until stage two starts.
            let content = extract::compose(&tags, &thinking, "");
            if let Err(error) = store.update_message_content(conversation, placeholder, &content) {
                warn!(%error, "Failed to write streamed thinking update.");
            }
        };

        let stage_one = provider
            .chat_completion_stream(query, &mut on_increment)
            .await?;

        let segments = extract::extract(&tags, &stage_one, false);
        let thinking = if segments.thinking.is_empty() {
            segments.answer
        } else {
            segments.thinking
        };

        debug!(thinking_len = thinking.len(), "Stage one complete.");

        // Stage two: a fresh context seeded with the trace. Deliberately no
        // conversation history; the trace already distilled it.
        let query = ChatQuery::default()
            .with_system(prompt::answer_system(
                self.config.system_prompt.as_deref(),
                &thinking,
            ))
            .with_user(prompt::answer_instruction(&tags));

        let mut on_increment = |accumulated: &str| {
            let segments = extract::extract(&tags, accumulated, true);
            let content = extract::compose(&tags, &thinking, &segments.answer);
            if let Err(error) = store.update_message_content(conversation, placeholder, &content) {
                warn!(%error, "Failed to write streamed answer update.");
            }
        };

        match provider.chat_completion_stream(query, &mut on_increment).await {
            Ok(stage_two) => {
                let segments = extract::extract(&tags, &stage_two, false);
                let answer = if segments.answer.is_empty() {
                    stage_two.trim().to_owned()
                } else {
                    segments.answer
                };

                Ok(TurnFlow::Success(extract::compose(&tags, &thinking, &answer)))
            }
            Err(error) => {
                warn!(%error, "Stage two failed; keeping the thinking trace.");

                Ok(TurnFlow::Degraded(extract::compose(
                    &tags,
                    &thinking,
                    &format!("Error: {error}"),
                )))
            }
        }
    }

    /// Single-call path for providers without streaming: one request with
    /// the user's own system prompt and history, tags extracted from the
    /// full response if the model happened to emit them.
    async fn single_call(&mut self, prior: &[Message], user_text: &str) -> Result<TurnFlow> {
        let tags = &self.config.tags;

        let query = ChatQuery::default()
            .with_system(prompt::base_system(self.config.system_prompt.as_deref()))
            .with_history(prior)
            .with_user(user_text);

        let text = self.provider.chat_completion(query).await?;
        let segments = extract::extract(tags, &text, false);

        // Untagged responses stay plain; tagged ones keep the composite
        // encoding so the renderer can split them.
        let content = if segments.thinking.is_empty() {
            segments.answer
        } else {
            extract::compose(tags, &segments.thinking, &segments.answer)
        };

        Ok(TurnFlow::Success(content))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
