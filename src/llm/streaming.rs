//! Streaming response handling

use std::pin::Pin;

use futures::Stream;
use futures::StreamExt;

use crate::errors::Result;

/// Streaming text response from the LLM gateway.
///
/// Wraps a lazy, forward-only sequence of assistant text chunks; dropping
/// it drops the upstream connection.
pub struct StreamingResponse {
    stream: Pin<Box<dyn Stream<Item = Result<String>> + Send>>,
}

impl StreamingResponse {
    pub fn new(stream: Pin<Box<dyn Stream<Item = Result<String>> + Send>>) -> Self {
        Self { stream }
    }

    /// Wrap a gateway SSE response, yielding decoded assistant deltas.
    ///
    /// The event-stream format is `data: <json>` lines; each carries a
    /// `choices[0].delta.content` fragment until the `[DONE]` marker.
    /// Network chunk boundaries are arbitrary and may fall inside a line
    /// or inside a multi-byte character, so bytes are buffered raw and
    /// decoded only once a full line is available.
    pub fn from_sse_response(response: reqwest::Response) -> Self {
        let chunks = response
            .bytes_stream()
            .map(|chunk| Some(chunk.map_err(crate::HajjRagError::from)))
            .chain(futures::stream::iter([None]));
        let stream = chunks.scan(Vec::new(), |buffer: &mut Vec<u8>, chunk| {
            let item = match chunk {
                Some(Ok(bytes)) => {
                    buffer.extend_from_slice(&bytes);
                    Ok(drain_complete_lines(buffer))
                }
                Some(Err(e)) => Err(e),
                // Upstream end; the final line may lack a trailing newline
                None => Ok(flush_buffer(buffer)),
            };
            futures::future::ready(Some(item))
        });

        Self::new(Box::pin(stream))
    }

    /// Collect all chunks into a single string
    pub async fn collect_text(mut self) -> Result<String> {
        let mut result = String::new();
        while let Some(chunk) = self.stream.next().await {
            result.push_str(&chunk?);
        }
        Ok(result)
    }

    /// Get the underlying stream
    pub fn into_stream(self) -> Pin<Box<dyn Stream<Item = Result<String>> + Send>> {
        self.stream
    }
}

/// Decode and consume every complete line currently in the buffer,
/// concatenating the deltas those lines carry.
fn drain_complete_lines(buffer: &mut Vec<u8>) -> String {
    let mut text = String::new();
    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        if let Some(delta) = delta_from_line(&String::from_utf8_lossy(&line)) {
            text.push_str(&delta);
        }
    }
    text
}

/// Decode whatever remains in the buffer as the final line.
fn flush_buffer(buffer: &mut Vec<u8>) -> String {
    let text = delta_from_line(&String::from_utf8_lossy(buffer)).unwrap_or_default();
    buffer.clear();
    text
}

/// Extract the assistant text delta from one SSE line, if it carries one.
fn delta_from_line(line: &str) -> Option<String> {
    let data = line.trim().strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(data).ok()?;
    value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_from_data_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"Tawaf "}}]}"#;
        assert_eq!(delta_from_line(line), Some("Tawaf ".to_string()));
    }

    #[test]
    fn test_done_marker_yields_nothing() {
        assert_eq!(delta_from_line("data: [DONE]"), None);
    }

    #[test]
    fn test_non_data_lines_ignored() {
        assert_eq!(delta_from_line(""), None);
        assert_eq!(delta_from_line(": keep-alive"), None);
        assert_eq!(delta_from_line("event: message"), None);
    }

    #[test]
    fn test_malformed_json_ignored() {
        assert_eq!(delta_from_line("data: {not json"), None);
    }

    #[test]
    fn test_delta_without_content_ignored() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(delta_from_line(line), None);
    }

    #[test]
    fn test_drain_decodes_only_complete_lines() {
        let mut buffer = Vec::new();

        // First chunk ends mid-character: 0xD9 is the first byte of "م"
        buffer.extend_from_slice(b"data: {\"choices\":[{\"delta\":{\"content\":\"\xD9");
        assert_eq!(drain_complete_lines(&mut buffer), "");

        // The second chunk completes the character and the line
        buffer.extend_from_slice(b"\x85\"}}]}\n");
        assert_eq!(drain_complete_lines(&mut buffer), "م");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_flush_recovers_unterminated_final_line() {
        let mut buffer: Vec<u8> =
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Safa\"}}]}".to_vec();
        assert_eq!(flush_buffer(&mut buffer), "Safa");
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_collect_text_concatenates_chunks() {
        let chunks: Vec<Result<String>> = vec![
            Ok("Circle ".to_string()),
            Ok("the Kaaba".to_string()),
            Ok(String::new()),
            Ok(" seven times.".to_string()),
        ];
        let response = StreamingResponse::new(Box::pin(futures::stream::iter(chunks)));
        assert_eq!(
            response.collect_text().await.unwrap(),
            "Circle the Kaaba seven times."
        );
    }
}
