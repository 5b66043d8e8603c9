//! Conversation title derivation from the first completed turn.

use std::sync::LazyLock;

use regex::Regex;

/// Title used when nothing usable survives the cleanup.
pub const DEFAULT_TITLE: &str = "New chat";

/// Maximum title length, in characters.
const MAX_CHARS: usize = 20;

static HEADINGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s+").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// Derive a short conversation title from the first exchange.
///
/// The user message is preferred; a very short one (under three characters)
/// falls back to the assistant's answer. Markdown markers are stripped, the
/// text is capped at [`MAX_CHARS`] characters with a word-boundary backoff,
/// and trailing punctuation is removed.
#[must_use]
pub fn generate(user_message: &str, assistant_message: Option<&str>) -> String {
    let mut text = user_message.trim();

    if text.chars().count() < 3
        && let Some(assistant) = assistant_message
    {
        text = assistant.trim();
    }

    let text = strip_markdown(text);
    let chars: Vec<char> = text.chars().collect();
    let mut title: Vec<char> = chars.iter().take(MAX_CHARS).copied().collect();

    // When the cap cut mid-sentence, back off to the last word boundary, as
    // long as that keeps a reasonable length.
    if chars.len() > MAX_CHARS
        && let Some(last_space) = title.iter().rposition(|c| *c == ' ')
        && last_space > 10
    {
        title.truncate(last_space);
    }

    while title
        .last()
        .is_some_and(|c| "。，、；：！？,;:!?.".contains(*c))
    {
        title.pop();
    }

    let title = title.into_iter().collect::<String>().trim().to_owned();
    if title.is_empty() {
        return DEFAULT_TITLE.to_owned();
    }

    title
}

fn strip_markdown(text: &str) -> String {
    // Fenced blocks go first, before the inline-code pass can eat their
    // fence backticks pairwise.
    let text = CODE_BLOCK.replace_all(text, "");
    let text = HEADINGS.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = NEWLINES.replace_all(&text, " ");
    text.trim().to_owned()
}

#[cfg(test)]
#[path = "title_tests.rs"]
mod tests;
