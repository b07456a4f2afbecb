//! Streaming Response Handling
//!
//! Decodes OpenAI-style server-sent events into text fragments and forwards
//! fragments to a progress sink while they arrive.

use std::collections::VecDeque;
use std::io::Write;
use std::pin::Pin;

use futures::{Stream, StreamExt, TryStreamExt};
use serde::Deserialize;
use serde_json::Value;

use super::provider::TextStream;
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, OverloadError, Result};

// =============================================================================
// Progress Sinks
// =============================================================================

/// Receives fragments of generated text as they stream in
pub trait ProgressSink: Send {
    fn chunk(&mut self, text: &str);

    /// Called once after the last fragment of a stream, and after a failed
    /// stream that already produced fragments
    fn finish(&mut self) {}
}

/// Echoes fragments to stdout, flushing after each one
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn chunk(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }

    fn finish(&mut self) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(b"\n");
        let _ = out.flush();
    }
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn chunk(&mut self, _text: &str) {}
}

/// Drain a text stream into one string, echoing each fragment to `sink`
pub async fn collect_text(stream: TextStream, sink: &mut dyn ProgressSink) -> Result<String> {
    let mut echoed = false;
    let result = stream
        .try_fold(String::new(), |mut acc, fragment| {
            sink.chunk(&fragment);
            echoed = true;
            acc.push_str(&fragment);
            async move { Ok(acc) }
        })
        .await;

    if result.is_ok() || echoed {
        sink.finish();
    }
    result
}

// =============================================================================
// SSE Decoding
// =============================================================================

/// One meaningful line of an event stream
#[derive(Debug, PartialEq, Eq)]
pub enum SseEvent {
    /// A content delta (possibly empty)
    Data(String),
    /// The `[DONE]` terminator
    Done,
    /// Comments, blank lines and non-data fields
    Ignore,
}

/// OpenAI-style error object, shared by HTTP error bodies and in-stream errors
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    /// Some backends send numeric codes
    #[serde(default)]
    pub code: Option<Value>,
}

impl ApiErrorBody {
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Parse a single line (without its line terminator)
pub fn parse_sse_line(line: &str, provider: &str) -> Result<SseEvent> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with(':') {
        return Ok(SseEvent::Ignore);
    }

    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseEvent::Ignore);
    };
    let data = data.trim_start();

    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data).map_err(|e| {
        LlmError::with_provider(
            ErrorCategory::Unknown,
            format!("Malformed stream chunk: {}", e),
            provider,
        )
    })?;

    if let Some(error) = chunk.error {
        return Err(
            ErrorClassifier::classify_stream_error(error.code_str(), &error.message, provider)
                .into(),
        );
    }

    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();

    Ok(SseEvent::Data(content))
}

struct SseDecoder<S> {
    body: Pin<Box<S>>,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
    provider: String,
}

impl<S> SseDecoder<S> {
    fn handle_line(&mut self, raw: &[u8]) -> Result<()> {
        let line = String::from_utf8_lossy(raw);
        match parse_sse_line(line.trim_end_matches('\n'), &self.provider)? {
            SseEvent::Data(text) if !text.is_empty() => self.pending.push_back(text),
            SseEvent::Done => self.done = true,
            _ => {}
        }
        Ok(())
    }

    /// Consume every complete line in the buffer.
    ///
    /// Splitting on the `\n` byte never cuts a multi-byte character.
    fn drain_lines(&mut self) -> Result<()> {
        while !self.done {
            let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.handle_line(&line)?;
        }
        Ok(())
    }
}

/// Turn a raw byte stream of server-sent events into a stream of text deltas
pub fn decode_sse<S, B, E>(body: S, provider: &str) -> TextStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let decoder = SseDecoder {
        body: Box::pin(body),
        buffer: Vec::new(),
        pending: VecDeque::new(),
        done: false,
        provider: provider.to_string(),
    };

    futures::stream::try_unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(text) = decoder.pending.pop_front() {
                return Ok::<_, OverloadError>(Some((text, decoder)));
            }
            if decoder.done {
                return Ok(None);
            }

            match decoder.body.next().await {
                Some(Ok(bytes)) => {
                    decoder.buffer.extend_from_slice(bytes.as_ref());
                    decoder.drain_lines()?;
                }
                Some(Err(e)) => {
                    return Err(LlmError::with_provider(
                        ErrorCategory::Network,
                        format!("Stream interrupted: {}", e),
                        &decoder.provider,
                    )
                    .into());
                }
                None => {
                    let rest = std::mem::take(&mut decoder.buffer);
                    if !rest.is_empty() {
                        decoder.handle_line(&rest)?;
                    }
                    decoder.done = true;
                }
            }
        }
    })
    .boxed()
}
