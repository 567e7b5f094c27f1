//! Live change events over server-sent events.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, Stream, StreamExt};
use knowledgedb_core::documents as docs;
use knowledgedb_core::LiveEvent;

use crate::{Client, ClientError, Result};

/// Stream of [`LiveEvent`]s for one collection.
///
/// Ends when the server closes the connection. Dropping it closes the
/// connection.
pub struct LiveStream {
    inner: BoxStream<'static, Result<LiveEvent>>,
}

impl Stream for LiveStream {
    type Item = Result<LiveEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Client {
    /// Subscribe to inserts, updates and deletes in `collection`.
    ///
    /// Fails up front with the usual error normalization if the server
    /// refuses the subscription.
    pub async fn subscribe(&self, collection: &str) -> Result<LiveStream> {
        let response = self.dispatch(&docs::live(collection)).await?;
        tracing::info!(collection, "Subscribed to live events");

        let bytes = response.bytes_stream().boxed();
        let inner = futures::stream::unfold(
            (bytes, EventDecoder::default(), VecDeque::<String>::new()),
            |(mut bytes, mut decoder, mut pending)| async move {
                loop {
                    if let Some(data) = pending.pop_front() {
                        let event = LiveEvent::from_data(&data);
                        return Some((Ok(event), (bytes, decoder, pending)));
                    }
                    match bytes.next().await {
                        Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                        Some(Err(err)) => {
                            return Some((Err(ClientError::from(err)), (bytes, decoder, pending)))
                        }
                        None => return None,
                    }
                }
            },
        )
        .boxed();

        Ok(LiveStream { inner })
    }
}

/// Incremental `text/event-stream` decoder.
///
/// Collects `data:` lines until a blank line ends the event, then yields
/// the joined data. Comments and other fields (`event:`, `id:`, `retry:`)
/// are ignored. Bytes are buffered until a full line is available, so
/// multi-byte characters split across chunks survive.
#[derive(Debug, Default)]
struct EventDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl EventDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            if line.is_empty() {
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }

            if let Some(value) = line.strip_prefix("data:") {
                self.data
                    .push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_splits_events() {
        let mut decoder = EventDecoder::default();
        let events = decoder.push(b"data: {\"type\":\"connected\"}\n\ndata: {\"type\":\"x\"}\n\n");
        assert_eq!(events, vec![r#"{"type":"connected"}"#, r#"{"type":"x"}"#]);
    }

    #[test]
    fn test_decoder_handles_partial_chunks() {
        let mut decoder = EventDecoder::default();
        assert!(decoder.push(b"data: {\"type\":").is_empty());
        assert!(decoder.push(b"\"caf\xC3").is_empty());
        let events = decoder.push(b"\xA9\"}\r\n\r\n");
        assert_eq!(events, vec![r#"{"type":"café"}"#]);
    }

    #[test]
    fn test_decoder_ignores_comments_and_fields() {
        let mut decoder = EventDecoder::default();
        let events = decoder.push(b": keep-alive\n\nevent: update\nid: 7\ndata: a\ndata: b\n\n");
        assert_eq!(events, vec!["a\nb"]);
    }
}
