//! Incremental decoder for upstream server-sent-event byte streams.
//!
//! Upstream chunks arrive at arbitrary byte boundaries; the decoder
//! buffers partial lines, yields complete ones, and strips the `data: `
//! prefix. Multi-byte UTF-8 sequences split across chunks are handled by
//! buffering raw bytes and only converting complete lines.

/// Buffering line decoder for `data: <json>` event streams.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one upstream chunk, returning the payloads of every complete
    /// `data:` line it finished. Non-data lines (event names, comments,
    /// blank keep-alives) are dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }

        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_chunks_reassemble_into_lines() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.feed(b"data: {\"a\":").is_empty());
        let lines = decoder.feed(b"1}\n\n");
        assert_eq!(lines, vec![r#"{"a":1}"#.to_string()]);
    }

    #[test]
    fn non_data_lines_are_skipped() {
        let mut decoder = SseLineDecoder::new();
        let lines = decoder.feed(b"event: message_start\ndata: {}\n: ping\n");
        assert_eq!(lines, vec!["{}".to_string()]);
    }

    #[test]
    fn utf8_split_across_chunks_survives() {
        let mut decoder = SseLineDecoder::new();
        let text = "data: {\"t\":\"příliš žluťoučký\"}\n".as_bytes();
        let (a, b) = text.split_at(17); // middle of a multi-byte char
        assert!(decoder.feed(a).is_empty());
        let lines = decoder.feed(b);
        assert_eq!(lines, vec![r#"{"t":"příliš žluťoučký"}"#.to_string()]);
    }
}
