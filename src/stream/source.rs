//! Frame producers.
//!
//! Two upstream behaviors are normalized to one outward contract:
//! [`UpstreamEventStream`] translates a true provider SSE byte stream,
//! [`SyntheticWordStream`] replays a fully buffered answer word by word
//! with artificial pacing. Callers hold a [`StreamSource`] and never care
//! which variant produced the frames.

use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use super::encoder::FrameSink;
use super::frame::Frame;
use super::sse::SseLineDecoder;
use crate::sources::Source;

/// Pause inserted before text frames when a search notification is sent.
const SEARCH_NOTICE_PAUSE: Duration = Duration::from_millis(900);

/// Default artificial delay between synthetic word frames.
const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(8);

/// A producer of outward frames, independent of upstream behavior.
pub enum StreamSource {
    Upstream(UpstreamEventStream),
    Synthetic(SyntheticWordStream),
}

impl StreamSource {
    /// Drive the source to completion, writing frames into `sink`.
    ///
    /// Returns early without error when the sink reports a client
    /// disconnect; the terminal frame is guaranteed to be last when the
    /// client is still connected.
    pub async fn produce(self, sink: FrameSink) {
        match self {
            StreamSource::Upstream(s) => s.produce(sink).await,
            StreamSource::Synthetic(s) => s.produce(sink).await,
        }
    }
}

// ── True upstream streaming ──────────────────────────────────────────────

/// Claude streaming events; everything but text deltas is ignored.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum UpstreamEvent {
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: DeltaPayload },
    #[serde(rename = "message_stop")]
    MessageStop,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct DeltaPayload {
    #[serde(default)]
    text: Option<String>,
}

/// Translates an upstream SSE byte stream into outward frames.
pub struct UpstreamEventStream {
    stream: BoxStream<'static, Result<Bytes, String>>,
    sources: Vec<Source>,
}

impl UpstreamEventStream {
    pub fn new<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display,
    {
        Self {
            stream: stream.map(|item| item.map_err(|e| e.to_string())).boxed(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    async fn produce(mut self, sink: FrameSink) {
        let mut decoder = SseLineDecoder::new();
        let mut full_text = String::new();

        while let Some(chunk) = self.stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::warn!(error = %e, "upstream stream aborted");
                    sink.send(Frame::Error { error: e }).await;
                    return;
                }
            };

            for payload in decoder.feed(&chunk) {
                let event = match serde_json::from_str::<UpstreamEvent>(&payload) {
                    Ok(event) => event,
                    Err(e) => {
                        // Imperfect upstream framing is tolerated; the
                        // line is skipped, the stream continues.
                        tracing::debug!(error = %e, "skipping unparsable stream line");
                        continue;
                    }
                };

                match event {
                    UpstreamEvent::ContentBlockDelta { delta } => {
                        if let Some(text) = delta.text {
                            full_text.push_str(&text);
                            if !sink.send(Frame::Text { content: text }).await {
                                return;
                            }
                        }
                    }
                    UpstreamEvent::MessageStop => {
                        sink.send(Frame::Completed {
                            full_text,
                            sources: self.sources,
                        })
                        .await;
                        return;
                    }
                    UpstreamEvent::Other => {}
                }
            }
        }

        sink.send(Frame::Completed {
            full_text,
            sources: self.sources,
        })
        .await;
    }
}

// ── Simulated streaming ──────────────────────────────────────────────────

/// Replays a buffered answer word by word to preserve streaming UX.
pub struct SyntheticWordStream {
    text: String,
    sources: Vec<Source>,
    word_delay: Duration,
    search_notice: Option<String>,
}

impl SyntheticWordStream {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            word_delay: DEFAULT_WORD_DELAY,
            search_notice: None,
        }
    }

    /// Attach sources; a `search_start` frame with `notice` is emitted
    /// before the first word.
    pub fn with_sources(mut self, sources: Vec<Source>, notice: impl Into<String>) -> Self {
        if !sources.is_empty() {
            self.search_notice = Some(notice.into());
        }
        self.sources = sources;
        self
    }

    pub fn with_word_delay(mut self, delay: Duration) -> Self {
        self.word_delay = delay;
        self
    }

    async fn produce(self, sink: FrameSink) {
        if let Some(message) = self.search_notice {
            if !sink.send(Frame::SearchStart { message }).await {
                return;
            }
            tokio::time::sleep(SEARCH_NOTICE_PAUSE).await;
        }

        for content in word_chunks(&self.text) {
            if !sink.send(Frame::Text { content }).await {
                return;
            }
            tokio::time::sleep(self.word_delay).await;
        }

        sink.send(Frame::Completed {
            full_text: self.text,
            sources: self.sources,
        })
        .await;
    }
}

/// Split into word-sized chunks that keep their trailing whitespace, so
/// the concatenation of all chunks reproduces the input exactly. Line
/// and paragraph breaks survive into the terminal `fullText`.
fn word_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut at_boundary = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            current.push(ch);
            at_boundary = true;
        } else {
            if at_boundary {
                chunks.push(std::mem::take(&mut current));
                at_boundary = false;
            }
            current.push(ch);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
