//! `WebSocket` handler for the live post stream.
//!
//! Clients connect to `GET /ws/stream` and receive one
//! `{"type": "posts", "data": [...]}` text frame per tick that accepted at
//! least one post. The optional `debug_meta` query parameter
//! (`1`, `true`, `yes`, `on`) decides per connection whether posts keep
//! their scratchpad and scores; without it the runtime setting applies at
//! send time.
//!
//! If a client falls behind, lagged batches are skipped and the client
//! resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::handlers::flag_enabled;
use crate::state::{AppState, PostBatch, StreamFrame, visible_posts};

/// Query parameters for `GET /ws/stream`.
#[derive(Debug, serde::Deserialize)]
pub struct StreamQuery {
    /// Keep debug payloads on streamed posts.
    pub debug_meta: Option<String>,
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming posts.
///
/// # Route
///
/// `GET /ws/stream`
pub async fn ws_stream(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<StreamQuery>,
) -> impl IntoResponse {
    let debug_meta = params.debug_meta.as_deref().map(flag_enabled);
    ws.on_upgrade(move |socket| handle_ws(socket, state, debug_meta))
}

/// Serialize a batch for one client.
fn encode(batch: &PostBatch, include_meta: bool) -> Result<String, serde_json::Error> {
    let posts = visible_posts(&batch.posts, include_meta);
    serde_json::to_string(&StreamFrame::posts(&posts))
}

/// Handle the `WebSocket` lifecycle: subscribe to the broadcast channel
/// and forward each non-empty batch as a text frame.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, debug_meta: Option<bool>) {
    debug!(?debug_meta, "WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(batch) => {
                        if batch.posts.is_empty() {
                            continue;
                        }
                        let include_meta = debug_meta.unwrap_or_else(|| state.settings.debug_meta());
                        let json = match encode(&batch, include_meta) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!(tick = batch.tick, "Failed to serialize post batch: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use timestream_types::{
        DebugMeta, EraFeatures, Feeling, Intent, PersonaId, Post, PostFeatures, PostId, Scores,
        Scratchpad,
    };

    use super::*;

    fn batch_with_meta() -> PostBatch {
        let meta = DebugMeta {
            scratchpad: Scratchpad {
                intent: Intent::Assert,
                confidence: 0.5,
                self_reference: false,
                audience_model: String::from("the club"),
                feeling: Feeling::Uncertain,
                risk: 0.4,
                thought: String::from("Best keep our heads."),
            },
            scores: Scores {
                temporal: 0.6,
                voice: 1.0,
                consistency: 0.8,
                composite: 0.79,
            },
        };
        PostBatch {
            tick: 4,
            posts: vec![Post {
                id: PostId::new(),
                persona_id: PersonaId::new("p_0001"),
                handle: String::from("nora_abc"),
                timestamp: Utc::now(),
                text: String::from("Wireless carries grave reports."),
                features: PostFeatures::fresh(EraFeatures::default()),
                grounding: Vec::new(),
                meta: Some(meta),
            }],
        }
    }

    #[test]
    fn encode_strips_meta_unless_requested() {
        let batch = batch_with_meta();

        let plain: serde_json::Value = serde_json::from_str(&encode(&batch, false).unwrap()).unwrap();
        assert_eq!(plain["type"], "posts");
        assert!(plain["data"][0]["meta"].is_null());

        let debug: serde_json::Value = serde_json::from_str(&encode(&batch, true).unwrap()).unwrap();
        assert_eq!(debug["data"][0]["meta"]["scores"]["final"], 0.79);
        assert_eq!(debug["data"][0]["meta"]["scratchpad"]["intent"], "assert");
    }
}
