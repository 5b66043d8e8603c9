//! Mock provider for testing turn orchestration without real API calls.
//!
//! Scripts a sequence of per-call outcomes and records every query it
//! receives, so tests can assert both what the orchestrator sent and how it
//! handled what came back.

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;

use super::Provider;
use crate::{
    error::{Error, Result},
    query::ChatQuery,
};

/// One scripted provider-call outcome.
#[derive(Debug, Clone)]
pub enum MockCall {
    /// Stream the fragments one by one, then resolve with their
    /// concatenation.
    Chunks(Vec<String>),

    /// Resolve with the whole text at once.
    Text(String),

    /// Fail the call with the given message.
    Fail(String),
}

impl MockCall {
    #[must_use]
    pub fn chunks(fragments: &[&str]) -> Self {
        Self::Chunks(fragments.iter().map(|s| (*s).to_owned()).collect())
    }

    #[must_use]
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_owned())
    }

    #[must_use]
    pub fn fail(message: &str) -> Self {
        Self::Fail(message.to_owned())
    }
}

#[derive(Debug, Default)]
pub struct MockProvider {
    streaming: bool,
    script: Mutex<VecDeque<MockCall>>,
    queries: Mutex<Vec<ChatQuery>>,
}

impl MockProvider {
    /// A streaming-capable mock; gets the two-stage path.
    #[must_use]
    pub fn streaming(script: Vec<MockCall>) -> Self {
        Self {
            streaming: true,
            script: Mutex::new(script.into()),
            queries: Mutex::default(),
        }
    }

    /// A whole-response-only mock; gets the single-call path.
    #[must_use]
    pub fn single_shot(script: Vec<MockCall>) -> Self {
        Self {
            streaming: false,
            script: Mutex::new(script.into()),
            queries: Mutex::default(),
        }
    }

    /// Every query received so far, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<ChatQuery> {
        self.queries.lock().expect("not poisoned").clone()
    }

    fn next_call(&self, query: ChatQuery) -> Result<MockCall> {
        self.queries.lock().expect("not poisoned").push(query);

        self.script
            .lock()
            .expect("not poisoned")
            .pop_front()
            .ok_or_else(|| Error::InvalidResponse("mock script exhausted".to_owned()))
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn supports_streaming(&self) -> bool {
        self.streaming
    }

    async fn chat_completion(&self, query: ChatQuery) -> Result<String> {
        match self.next_call(query)? {
            MockCall::Chunks(fragments) => Ok(fragments.concat()),
            MockCall::Text(text) => Ok(text),
            MockCall::Fail(message) => Err(Error::Api {
                status: 500,
                message,
            }),
        }
    }

    async fn chat_completion_stream(
        &self,
        query: ChatQuery,
        on_increment: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String> {
        match self.next_call(query)? {
            MockCall::Chunks(fragments) => {
                let mut accumulated = String::new();
                for fragment in fragments {
                    accumulated.push_str(&fragment);
                    on_increment(&accumulated);
                }
                Ok(accumulated)
            }
            MockCall::Text(text) => {
                on_increment(&text);
                Ok(text)
            }
            MockCall::Fail(message) => Err(Error::Api {
                status: 500,
                message,
            }),
        }
    }
}
