//! Segmentation of model output into thinking and answer parts.
//!
//! Models following the two-stage protocol wrap their reasoning and their
//! final answer in sentinel tags. The extractor splits a response buffer into
//! both parts, tolerating the realities of a live stream: a tag that has been
//! opened but not yet closed, a model echoing literal tag text inside its own
//! prose, and models that never tag their output at all.

use serde::{Deserialize, Serialize};

/// The sentinel tag pairs delimiting thinking and answer segments.
///
/// Shared between the turn orchestrator (which instructs the model to emit
/// them and composes message content with them) and whatever renders that
/// content, so both sides always agree on the exact markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTags {
    pub thinking_open: String,
    pub thinking_close: String,
    pub answer_open: String,
    pub answer_close: String,
}

impl Default for SegmentTags {
    fn default() -> Self {
        Self {
            thinking_open: "<think>".to_owned(),
            thinking_close: "</think>".to_owned(),
            answer_open: "<answer>".to_owned(),
            answer_close: "</answer>".to_owned(),
        }
    }
}

/// The two segments extracted from a response buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub thinking: String,
    pub answer: String,
}

/// Split a response buffer into thinking and answer segments.
///
/// In finalized mode (`streaming = false`) only well-formed closed spans
/// count: the first `open..close` span of each pair yields that segment's
/// text, trimmed. The two pairs are matched independently, in either order.
///
/// In streaming mode (`streaming = true`) the buffer is a prefix of the
/// eventual response, so an opened-but-unclosed tag yields everything after
/// the opening tag as provisional text. For the answer the *last* occurrence
/// of the opening tag wins, guarding against the model echoing the literal
/// tag inside its reasoning. A segment that starts with a stray literal copy
/// of its own tag (model artifact) has that one copy stripped.
///
/// Either mode: when nothing matched at all, the whole trimmed buffer is the
/// answer, so untagged output still displays.
#[must_use]
pub fn extract(tags: &SegmentTags, buffer: &str, streaming: bool) -> Segments {
    let (thinking, answer) = if streaming {
        (streaming_thinking(tags, buffer), streaming_answer(tags, buffer))
    } else {
        (
            closed_inner(buffer, &tags.thinking_open, &tags.thinking_close)
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
            closed_inner(buffer, &tags.answer_open, &tags.answer_close)
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
        )
    };

    // Nothing matched: the model ignored the tag protocol, so the raw buffer
    // is the answer.
    if thinking.is_empty() && answer.is_empty() {
        return Segments {
            thinking: String::new(),
            answer: buffer.trim().to_owned(),
        };
    }

    Segments { thinking, answer }
}

/// Render thinking and answer back into the composite message encoding.
///
/// The answer pane is always present, even while still empty, so a renderer
/// can show both sections from the first streamed increment on.
#[must_use]
pub fn compose(tags: &SegmentTags, thinking: &str, answer: &str) -> String {
    format!(
        "{}\n{thinking}\n{}\n{}\n{answer}\n{}",
        tags.thinking_open, tags.thinking_close, tags.answer_open, tags.answer_close,
    )
}

fn streaming_thinking(tags: &SegmentTags, buffer: &str) -> String {
    let provisional = match closed_inner(buffer, &tags.thinking_open, &tags.thinking_close) {
        Some(inner) => inner,
        None => match buffer.find(&tags.thinking_open) {
            Some(pos) => &buffer[pos + tags.thinking_open.len()..],
            None => return String::new(),
        },
    };

    strip_stray_tag(provisional.trim(), &tags.thinking_open, &tags.thinking_close)
}

fn streaming_answer(tags: &SegmentTags, buffer: &str) -> String {
    let provisional = match closed_inner(buffer, &tags.answer_open, &tags.answer_close) {
        Some(inner) => inner,
        // The model may echo the literal opening tag inside its reasoning, so
        // only the last occurrence marks the real (unclosed) answer.
        None => match buffer.rfind(&tags.answer_open) {
            Some(pos) => &buffer[pos + tags.answer_open.len()..],
            None => return String::new(),
        },
    };

    strip_stray_tag(provisional.trim(), &tags.answer_open, &tags.answer_close)
}

/// First `open..close` span of the buffer, both tags present.
fn closed_inner<'a>(buffer: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = buffer.find(open)? + open.len();
    let end = buffer[start..].find(close)? + start;
    Some(&buffer[start..end])
}

/// Strip one leading literal copy of the segment's own tag, if present.
fn strip_stray_tag(text: &str, open: &str, close: &str) -> String {
    text.strip_prefix(open)
        .or_else(|| text.strip_prefix(close))
        .unwrap_or(text)
        .trim()
        .to_owned()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
