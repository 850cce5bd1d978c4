// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events framing for POST /api/chat/stream.
//!
//! Every event is a single `data:` line holding a JSON object tagged by
//! `type`:
//! ```text
//! data: {"type":"start","message":"Starting analysis..."}
//!
//! data: {"type":"chunk","content":"partial text"}
//!
//! data: {"type":"done"}
//! ```
//! A failed fragment produces one `{"type":"error","message":...}` event and
//! closes the stream; no `done` follows it.

use std::convert::Infallible;

use axum::response::sse::Event;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use njaaia_core::FragmentStream;
use serde::Serialize;
use tracing::warn;

/// Message carried by the opening event.
pub const START_MESSAGE: &str = "Starting analysis...";

/// One event of the chat stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    Start { message: String },
    Chunk { content: String },
    Done,
    Error { message: String },
}

impl StreamFrame {
    /// Encodes the frame as an SSE `data:` event.
    pub fn to_event(&self) -> Event {
        Event::default().json_data(self).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode stream frame");
            Event::default().data(r#"{"type":"error","message":"failed to encode event"}"#)
        })
    }
}

/// Frames a fragment stream: `start`, one `chunk` per fragment, then `done`.
///
/// The first failed fragment becomes an `error` frame and ends the
/// sequence.
pub fn frames(fragments: FragmentStream) -> impl Stream<Item = StreamFrame> + Send {
    let start = stream::once(future::ready(StreamFrame::Start {
        message: START_MESSAGE.to_string(),
    }));

    let body = fragments
        .map(Some)
        .chain(stream::once(future::ready(None)))
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            let frame = match item {
                Some(Ok(content)) => StreamFrame::Chunk { content },
                Some(Err(e)) => {
                    *failed = true;
                    warn!(error = %e, "chat stream failed after start");
                    StreamFrame::Error {
                        message: e.detail().to_string(),
                    }
                }
                None => StreamFrame::Done,
            };
            future::ready(Some(frame))
        });

    start.chain(body)
}

/// SSE events for a fragment stream, ready for `axum::response::sse::Sse`.
pub fn chat_events(
    fragments: FragmentStream,
) -> impl Stream<Item = Result<Event, Infallible>> + Send {
    frames(fragments).map(|frame| Ok(frame.to_event()))
}
