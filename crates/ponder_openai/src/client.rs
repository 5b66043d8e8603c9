use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, error, trace};

use crate::{
    error::{Error, Result},
    sse,
    types::{request, response},
};

/// Client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl Client {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_owned(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        self
    }

    /// Build HTTP headers required for making API calls.
    /// Returns an error if any header value cannot be constructed.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key)
                .parse()
                .map_err(|e| Error::Config(format!("Invalid API key header format: {e}")))?,
        );

        Ok(headers)
    }

    async fn post(&self, request: &request::ChatCompletion) -> Result<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);
        let headers = self.build_headers()?;

        trace!(
            %url,
            model = request.model,
            messages_size = request.messages.len(),
            stream = request.stream,
            "Triggering request."
        );

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        trace!(
            status = status.as_u16(),
            content_length = response.content_length().unwrap_or_default(),
            "Received response."
        );

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

        Ok(response)
    }

    /// Perform a single-shot chat completion.
    pub async fn chat_completion(
        &self,
        request: request::ChatCompletion,
    ) -> Result<response::ChatCompletion> {
        debug!(model = request.model, "Requesting chat completion.");

        let response = self.post(&request).await?;
        response
            .json::<response::ChatCompletion>()
            .await
            .map_err(Into::into)
    }

    /// Perform a streaming chat completion, resolving with the full text.
    ///
    /// `on_increment` observes the entire accumulated text after each
    /// content-carrying frame, per [`sse::read_data_lines`].
    pub async fn chat_completion_stream(
        &self,
        mut request: request::ChatCompletion,
        on_increment: &mut (dyn FnMut(&str) + Send),
    ) -> Result<String> {
        request.stream = true;
        debug!(model = request.model, "Requesting streaming chat completion.");

        let response = self.post(&request).await?;

        sse::read_data_lines(
            response.bytes_stream(),
            |payload| {
                serde_json::from_str::<response::Chunk>(payload)
                    .ok()
                    .and_then(response::Chunk::into_delta_content)
            },
            on_increment,
        )
        .await
    }
}

/// Prefer the provider's own error message when the body parses, falling
/// back to the raw body, then to the HTTP status text.
fn api_error_message(body: &str, status_text: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<response::ErrorBody>(body) {
        return parsed.error.message;
    }

    if !body.trim().is_empty() {
        return body.trim().to_owned();
    }

    status_text.to_owned()
}
