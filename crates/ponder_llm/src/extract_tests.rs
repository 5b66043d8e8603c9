use pretty_assertions::assert_eq;

use super::*;

fn tags() -> SegmentTags {
    SegmentTags::default()
}

fn segments(thinking: &str, answer: &str) -> Segments {
    Segments {
        thinking: thinking.to_owned(),
        answer: answer.to_owned(),
    }
}

#[test]
fn finalized_extracts_both_closed_spans() {
    let buffer = "<think>step one</think><answer>42</answer>";

    assert_eq!(
        extract(&tags(), buffer, false),
        segments("step one", "42")
    );
}

#[test]
fn finalized_trims_surrounding_whitespace() {
    let buffer = "  <think>\n  step one \n</think>\n\n<answer>\n 42\t</answer>  ";

    assert_eq!(
        extract(&tags(), buffer, false),
        segments("step one", "42")
    );
}

#[test]
fn finalized_handles_reversed_tag_order() {
    let buffer = "<answer>42</answer><think>step one</think>";

    assert_eq!(
        extract(&tags(), buffer, false),
        segments("step one", "42")
    );
}

#[test]
fn no_tags_falls_back_to_answer() {
    for streaming in [false, true] {
        assert_eq!(
            extract(&tags(), "  plain text reply \n", streaming),
            segments("", "plain text reply"),
            "streaming = {streaming}"
        );
    }
}

#[test]
fn finalized_is_idempotent() {
    let buffer = "<think>pondering</think><answer>done</answer>";

    let first = extract(&tags(), buffer, false);
    let second = extract(&tags(), buffer, false);

    assert_eq!(first, second);
}

#[test]
fn unclosed_tags_fall_back_in_finalized_mode() {
    let buffer = "<think>still going";

    // Neither span is closed, so the raw-buffer fallback kicks in.
    assert_eq!(
        extract(&tags(), buffer, false),
        segments("", "<think>still going")
    );
}

#[test]
fn streaming_progression_scenario() {
    let buffers = [
        ("<think>ste", "ste", ""),
        ("<think>step on", "step on", ""),
        ("<think>step one</think><answer>4", "step one", "4"),
    ];

    for (buffer, thinking, answer) in buffers {
        assert_eq!(
            extract(&tags(), buffer, true),
            segments(thinking, answer),
            "buffer: {buffer}"
        );
    }
}

#[test]
fn streaming_sequence_preserves_emitted_text() {
    // Prefix extensions of one response, with chunk boundaries landing
    // mid-word and mid-tag. Emitted thinking text is never lost once the
    // opening tag has appeared; a partial closing tag rides along as
    // provisional text until it completes.
    let steps = [
        ("<thi", "", "<thi"),
        ("<think>al", "al", ""),
        ("<think>alpha be", "alpha be", ""),
        ("<think>alpha beta</th", "alpha beta</th", ""),
        ("<think>alpha beta</think><answer>gam", "alpha beta", "gam"),
        (
            "<think>alpha beta</think><answer>gamma delta</answer>",
            "alpha beta",
            "gamma delta",
        ),
    ];

    for (buffer, thinking, answer) in steps {
        assert_eq!(
            extract(&tags(), buffer, true),
            segments(thinking, answer),
            "buffer: {buffer}"
        );
    }
}

#[test]
fn answer_tag_echoed_in_thinking_does_not_leak() {
    // The model writes the literal answer tag inside its reasoning; the last
    // occurrence marks the real answer.
    let buffer = "<think>I should wrap it in <answer> next</think><answer>42";

    assert_eq!(
        extract(&tags(), buffer, true),
        segments("I should wrap it in <answer> next", "42")
    );
}

#[test]
fn stray_leading_tag_is_stripped_once() {
    let buffer = "<think><think>doubled open";
    assert_eq!(extract(&tags(), buffer, true).thinking, "doubled open");

    let buffer = "<answer><answer>42</answer>";
    assert_eq!(extract(&tags(), buffer, true).answer, "42");
}

#[test]
fn empty_closed_spans_fall_back_to_raw_buffer() {
    // Matches the lenient empty-check: an empty span is indistinguishable
    // from no match, so the raw buffer wins.
    let buffer = "<answer></answer>";

    assert_eq!(
        extract(&tags(), buffer, false),
        segments("", "<answer></answer>")
    );
}

#[test]
fn untagged_streaming_output_displays_progressively() {
    assert_eq!(extract(&tags(), "partial rep", true), segments("", "partial rep"));
    assert_eq!(
        extract(&tags(), "partial reply grows", true),
        segments("", "partial reply grows")
    );
}

#[test]
fn streaming_closed_spans_match_finalized_mode() {
    let buffer = "<think>done</think><answer>result</answer>";

    assert_eq!(
        extract(&tags(), buffer, true),
        extract(&tags(), buffer, false)
    );
}

#[test]
fn compose_extract_round_trip() {
    let composed = compose(&tags(), "greeting", "hi there");

    assert_eq!(
        extract(&tags(), &composed, false),
        segments("greeting", "hi there")
    );
}

#[test]
fn compose_renders_empty_answer_pane() {
    let composed = compose(&tags(), "thinking so far", "");

    assert!(composed.contains("<answer>"));
    assert!(composed.contains("</answer>"));
    assert_eq!(
        extract(&tags(), &composed, true),
        segments("thinking so far", "")
    );
}

#[test]
fn multibyte_content_extracts_cleanly() {
    let buffer = "<think>思考过程</think><answer>你好，世界</answer>";

    assert_eq!(
        extract(&tags(), buffer, false),
        segments("思考过程", "你好，世界")
    );
}

#[test]
fn custom_tag_markers() {
    let tags = SegmentTags {
        thinking_open: "<思考>".to_owned(),
        thinking_close: "</思考>".to_owned(),
        answer_open: "<回答>".to_owned(),
        answer_close: "</回答>".to_owned(),
    };

    let buffer = "<思考>推理</思考><回答>答案</回答>";

    assert_eq!(extract(&tags, buffer, false), segments("推理", "答案"));
}
