//! SSE stream parsing for streaming RAG responses.
//!
//! The gateway streams answer text as `data:` lines carrying JSON deltas,
//! terminated by a `data: [DONE]` sentinel. Nothing is buffered across
//! requests; each call decodes its own byte stream from scratch.

use futures::{Stream, StreamExt};
use serde::Deserialize;

use atrium_core::{Error, Result, TokenStream};

/// One delta frame from the streaming endpoint.
#[derive(Debug, Deserialize)]
struct AnswerDelta {
    #[serde(default)]
    delta: Option<String>,
}

/// Parse an SSE byte stream into a stream of answer-text deltas.
pub fn token_stream(
    stream: impl Stream<Item = std::result::Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
) -> TokenStream {
    let tokens = stream
        .map(|chunk_result| {
            chunk_result.map_err(|e| Error::Stream(format!("stream error: {}", e)))
        })
        .filter_map(|result| async move {
            match result {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    parse_sse_chunk(&text)
                }
                Err(e) => Some(Err(e)),
            }
        });

    Box::pin(tokens)
}

/// Parse a single SSE chunk and extract accumulated delta text.
///
/// Returns `None` for keep-alive noise and for the `[DONE]` sentinel.
pub fn parse_sse_chunk(chunk: &str) -> Option<Result<String>> {
    let mut content = String::new();

    for line in chunk.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        // End of stream marker
        if line == "data: [DONE]" {
            return None;
        }

        if let Some(data) = line.strip_prefix("data: ") {
            match serde_json::from_str::<AnswerDelta>(data) {
                Ok(frame) => {
                    if let Some(delta) = frame.delta {
                        content.push_str(&delta);
                    }
                }
                Err(e) => {
                    return Some(Err(Error::Stream(format!(
                        "failed to parse SSE chunk: {}",
                        e
                    ))));
                }
            }
        }
    }

    if content.is_empty() {
        None
    } else {
        Some(Ok(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_chunk_with_delta() {
        let chunk = r#"data: {"delta":"Machine learning"}"#;
        let result = parse_sse_chunk(chunk);
        assert_eq!(result.unwrap().unwrap(), "Machine learning");
    }

    #[test]
    fn test_parse_sse_chunk_done() {
        assert!(parse_sse_chunk("data: [DONE]").is_none());
    }

    #[test]
    fn test_parse_sse_chunk_empty_delta() {
        let chunk = r#"data: {}"#;
        assert!(parse_sse_chunk(chunk).is_none());
    }

    #[test]
    fn test_parse_sse_chunk_comment_and_blank() {
        assert!(parse_sse_chunk(": keep-alive").is_none());
        assert!(parse_sse_chunk("").is_none());
    }

    #[test]
    fn test_parse_sse_chunk_multiple_lines() {
        let chunk = "data: {\"delta\":\"Hello\"}\n\ndata: {\"delta\":\" world\"}";
        assert_eq!(parse_sse_chunk(chunk).unwrap().unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_sse_chunk_stops_at_done() {
        let chunk = "data: {\"delta\":\"tail\"}\ndata: [DONE]";
        // Sentinel wins: the frame is truncated there.
        assert!(parse_sse_chunk(chunk).is_none());
    }

    #[test]
    fn test_parse_sse_chunk_invalid_json() {
        let result = parse_sse_chunk("data: {invalid}");
        assert!(result.unwrap().is_err());
    }
}
