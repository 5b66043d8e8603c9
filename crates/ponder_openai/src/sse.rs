//! Incremental reading of `data:`-framed event streams.

use std::io;

use bytes::Bytes;
use futures::{Stream, TryStreamExt as _};
use tokio_util::{
    codec::{FramedRead, LinesCodec},
    io::StreamReader,
};
use tracing::trace;

use crate::error::{Error, Result};

/// Prefix of a data-carrying line.
const DATA_PREFIX: &str = "data:";

/// Payload marking the end of the stream.
///
/// See: <https://platform.openai.com/docs/api-reference/chat-streaming>
const DONE_SENTINEL: &str = "[DONE]";

/// Read an SSE byte stream to completion, reporting progress per data line.
///
/// Bytes are framed into lines as they arrive, so lines (and multi-byte
/// characters) split across chunk boundaries reassemble correctly. For each
/// complete line:
///
/// - lines without the `data:` prefix (comments, keep-alives, blanks) are
///   skipped,
/// - a `[DONE]` payload ends the read loop early,
/// - otherwise `parse_line` extracts the text carried by the payload;
///   payloads it rejects are skipped silently, since providers interleave
///   non-content frames with content ones.
///
/// Extracted text accumulates into a buffer owned by the loop, and
/// `on_increment` observes the entire accumulation after every append, not
/// the delta. Resolves with the final accumulation, whether the sentinel was
/// seen or the transport simply ended.
pub async fn read_data_lines<S, E, P, F>(
    stream: S,
    parse_line: P,
    mut on_increment: F,
) -> Result<String>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
    P: Fn(&str) -> Option<String>,
    F: FnMut(&str),
{
    let stream = std::pin::pin!(stream.map_err(io::Error::other));
    let reader = StreamReader::new(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new());
    let mut accumulated = String::new();

    while let Some(line) = lines
        .try_next()
        .await
        .map_err(|e| Error::Stream(e.to_string()))?
    {
        let line = line.trim();
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };

        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            trace!("Received end-of-stream sentinel.");
            return Ok(accumulated);
        }

        let Some(text) = parse_line(payload) else {
            trace!(payload, "Skipping non-content data line.");
            continue;
        };

        accumulated.push_str(&text);
        on_increment(&accumulated);
    }

    Ok(accumulated)
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
