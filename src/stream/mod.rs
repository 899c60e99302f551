//! Streaming normalization.
//!
//! Every chat endpoint presents the browser with the same incremental
//! frame protocol whether or not the upstream provider actually streams.
//! A [`StreamSource`] is either a true upstream event stream (Claude SSE)
//! or a synthetic word-by-word replay of a fully buffered answer
//! (Gemini, Grok). Both produce the same [`Frame`] sequence into a
//! [`FrameSink`], encoded as NDJSON or SSE on the wire.

pub mod encoder;
pub mod frame;
pub mod source;
pub mod sse;

pub use encoder::{streaming_response, FrameSink, WireFormat};
pub use frame::Frame;
pub use source::{StreamSource, SyntheticWordStream, UpstreamEventStream};
pub use sse::SseLineDecoder;
