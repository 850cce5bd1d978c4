// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the njaaia chat relay.
//!
//! Serves the relay endpoint (`POST /api/chat`), its capability listing
//! (`GET /api/chat`), the server-sent-event stream (`POST /api/chat/stream`)
//! and a health probe. All upstream work goes through the shared
//! [`ChatProvider`](njaaia_core::ChatProvider).

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
pub use sse::StreamFrame;
