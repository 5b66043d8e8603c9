use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A non-streaming chat completion response.
///
/// Deliberately lenient: only the fields the engine consumes are modeled,
/// everything else is retained opaquely so provider-specific extras don't
/// fail deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(flatten)]
    _extra: Value,
}

impl ChatCompletion {
    /// The assistant text of the first choice, empty if absent.
    #[must_use]
    pub fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,

    #[serde(flatten)]
    _extra: Value,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    // Can be null, e.g. when the model answered with a refusal object only.
    #[serde(default, deserialize_with = "null_as_empty_string")]
    pub content: String,

    #[serde(flatten)]
    _extra: Value,
}

/// One streamed chunk of a chat completion.
#[derive(Debug, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl Chunk {
    /// The incremental text carried by the first choice, if any.
    #[must_use]
    pub fn into_delta_content(self) -> Option<String> {
        self.choices.into_iter().next()?.delta.content
    }
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    pub delta: Delta,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body of a failed request, `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

fn null_as_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
