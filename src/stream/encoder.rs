//! Wire encoding of frames and the channel-backed response body.
//!
//! A handler calls [`streaming_response`] to obtain an axum `Response`
//! plus a [`FrameSink`]; a spawned producer task writes frames into the
//! sink while axum drains the channel into the client connection. When
//! the client disconnects the body is dropped, the channel closes, and
//! the next `send` fails. The producer task observes this and stops,
//! so no timers or upstream readers outlive the request.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use tokio::sync::mpsc;

use super::frame::Frame;

/// Outward framing format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Newline-delimited JSON objects (Gemini, Grok).
    Ndjson,
    /// `data: <json>\n\n` records (Claude streaming endpoint).
    Sse,
}

impl WireFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Ndjson => "application/x-ndjson; charset=utf-8",
            WireFormat::Sse => "text/event-stream; charset=utf-8",
        }
    }

    pub fn encode(&self, frame: &Frame) -> Bytes {
        // Frame is serde-serializable with infallible field types.
        let json = serde_json::to_string(frame).unwrap_or_default();
        match self {
            WireFormat::Ndjson => Bytes::from(format!("{json}\n")),
            WireFormat::Sse => Bytes::from(format!("data: {json}\n\n")),
        }
    }
}

/// Sending half of a streaming response.
pub struct FrameSink {
    tx: mpsc::Sender<Bytes>,
    format: WireFormat,
}

impl FrameSink {
    /// Encode and send one frame. Returns `false` once the client has
    /// disconnected; producers should stop at that point.
    pub async fn send(&self, frame: Frame) -> bool {
        self.tx.send(self.format.encode(&frame)).await.is_ok()
    }
}

/// Build a streaming response and the sink feeding it.
pub fn streaming_response(format: WireFormat) -> (Response, FrameSink) {
    let (tx, rx) = mpsc::channel::<Bytes>(32);

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
        // Static header values cannot fail to parse.
        .unwrap_or_default();

    (response, FrameSink { tx, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndjson_is_one_object_per_line() {
        let bytes = WireFormat::Ndjson.encode(&Frame::text("slovo"));
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        let frame: Frame = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(frame, Frame::text("slovo"));
    }

    #[test]
    fn sse_wraps_json_in_data_record() {
        let bytes = WireFormat::Sse.encode(&Frame::text("slovo"));
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("data: "));
        assert!(text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn sink_reports_disconnect() {
        let (response, sink) = streaming_response(WireFormat::Ndjson);
        drop(response);
        assert!(!sink.send(Frame::text("orphaned")).await);
    }
}
