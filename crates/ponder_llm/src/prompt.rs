//! Prompt text for the two generation stages.

use crate::extract::SegmentTags;

/// Fallback system prompt when the user has not configured one.
pub(crate) const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Process each request thoughtfully and methodically.";

/// System prompt for the first stage, eliciting only the reasoning trace.
pub(crate) fn thinking_system(tags: &SegmentTags) -> String {
    format!(
        "You are a careful reasoning assistant. Think through the user's request step by step, \
         considering the full conversation so far, but do not answer it yet. Wrap your entire \
         reasoning between {open} and {close}, and write nothing outside those markers.",
        open = tags.thinking_open,
        close = tags.thinking_close,
    )
}

/// The user's configured system prompt, or the default when unset or blank.
pub(crate) fn base_system(system_prompt: Option<&str>) -> &str {
    match system_prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt.trim(),
        _ => DEFAULT_SYSTEM_PROMPT,
    }
}

/// System context for the second stage: the user's configured prompt (or the
/// default) with the stage-one reasoning trace embedded as a labeled section.
pub(crate) fn answer_system(system_prompt: Option<&str>, thinking: &str) -> String {
    let base = base_system(system_prompt);

    format!(
        "{base}\n\n\
         ## Reasoning trace\n\n\
         Here is some additional context added by an AI co-worker of mine, they are an expert \
         on this subject and should be taken seriously:\n\n\
         {thinking}"
    )
}

/// The single synthetic user instruction closing out the second stage.
pub(crate) fn answer_instruction(tags: &SegmentTags) -> String {
    format!(
        "Using the reasoning trace above, write only the final answer, wrapped between {open} \
         and {close}. Do not repeat the reasoning.",
        open = tags.answer_open,
        close = tags.answer_close,
    )
}
