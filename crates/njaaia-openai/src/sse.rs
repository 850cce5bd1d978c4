// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental decoder for streamed chat-completion responses.
//!
//! [`SseLineDecoder`] is a carry-buffer state machine: each pushed chunk is
//! appended to the bytes of the unterminated line left over from the
//! previous chunk, and every complete line is emitted. Lines are split on
//! raw bytes before UTF-8 decoding, so a multi-byte character cut across two
//! network reads is reassembled intact.
//!
//! [`fragments`] drives the decoder over a response body and yields the
//! `choices[0].delta.content` text of each `data:` payload.

use std::collections::VecDeque;
use std::fmt::Display;

use futures::stream::{self, Stream, StreamExt};
use njaaia_core::{FragmentStream, NjaaiaError};
use tracing::trace;

use crate::types::ChatCompletionChunk;

/// Prefix of an event line carrying a payload.
const DATA_PREFIX: &[u8] = b"data: ";

/// Payload marking the end of the stream.
const DONE_PAYLOAD: &str = "[DONE]";

/// A decoded event line of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// The payload following `data: `.
    Data(String),
    /// The `data: [DONE]` sentinel.
    Done,
}

/// Splits a byte stream into event lines, carrying partial lines forward.
///
/// Lines without the `data: ` prefix (comments, `event:` fields, blank
/// separators) are dropped. An unterminated line left when the body ends is
/// never emitted.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    carry: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every line it completes, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.carry.extend_from_slice(chunk);

        let Some(last_newline) = self.carry.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.carry.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.carry, rest);

        complete
            .split(|&b| b == b'\n')
            .filter_map(parse_line)
            .collect()
    }

    /// Number of buffered bytes belonging to an unterminated line.
    pub fn pending(&self) -> usize {
        self.carry.len()
    }
}

fn parse_line(line: &[u8]) -> Option<SseLine> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let payload = String::from_utf8_lossy(payload);
    if payload == DONE_PAYLOAD {
        Some(SseLine::Done)
    } else {
        Some(SseLine::Data(payload.into_owned()))
    }
}

/// Extracts the content delta from one `data:` payload.
///
/// Unparseable JSON is skipped rather than treated as fatal.
fn delta_text(payload: &str) -> Option<String> {
    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => chunk.delta_content().map(str::to_string),
        Err(e) => {
            trace!(error = %e, payload_len = payload.len(), "skipping unparseable stream payload");
            None
        }
    }
}

struct FragmentState<S> {
    body: std::pin::Pin<Box<S>>,
    decoder: SseLineDecoder,
    ready: VecDeque<String>,
    finished: bool,
}

impl<S> FragmentState<S> {
    /// Decodes one chunk into `ready`. Returns true once `[DONE]` is seen.
    fn absorb(&mut self, chunk: &[u8]) -> bool {
        for line in self.decoder.push(chunk) {
            match line {
                SseLine::Done => return true,
                SseLine::Data(payload) => {
                    if let Some(text) = delta_text(&payload) {
                        self.ready.push_back(text);
                    }
                }
            }
        }
        false
    }
}

/// Turns a streamed response body into text fragments.
///
/// Fragments come out in arrival order. The stream ends cleanly on `[DONE]`
/// (fragments decoded earlier in the same chunk are still yielded) or when
/// the body ends. A body read error yields one `Err` and ends the stream.
pub fn fragments<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = FragmentState {
        body: Box::pin(body),
        decoder: SseLineDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.ready.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    state.finished = state.absorb(chunk.as_ref());
                }
                Some(Err(e)) => {
                    state.finished = true;
                    let err = NjaaiaError::provider(format!("stream read failed: {e}"));
                    return Some((Err(err), state));
                }
                None => {
                    if state.decoder.pending() > 0 {
                        trace!(
                            pending = state.decoder.pending(),
                            "dropping unterminated final line"
                        );
                    }
                    state.finished = true;
                }
            }
        }
    }))
}
