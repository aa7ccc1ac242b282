//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for accepted posts, an
//! in-memory [`StreamSnapshot`] that the REST endpoints serve, and the
//! runtime settings shared with the tick loop.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use timestream_core::RuntimeSettings;
use timestream_types::{Event, Persona, Post};
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for post batches.
///
/// A subscriber that falls behind by more than this many batches receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest one.
const BROADCAST_CAPACITY: usize = 256;

/// Number of accepted posts kept for `GET /posts`.
pub const RECENT_POSTS_CAPACITY: usize = 200;

/// Posts accepted during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PostBatch {
    /// Tick that produced the posts.
    pub tick: u64,
    /// The posts, with debug payloads attached.
    pub posts: Vec<Post>,
}

/// Wire frame pushed to `WebSocket` clients:
/// `{"type": "posts", "data": [...]}`.
#[derive(Debug, Serialize)]
pub struct StreamFrame<'a> {
    /// Frame kind, always `"posts"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// The posts.
    pub data: &'a [Post],
}

impl<'a> StreamFrame<'a> {
    /// A `posts` frame over `posts`.
    pub const fn posts(posts: &'a [Post]) -> Self {
        Self {
            kind: "posts",
            data: posts,
        }
    }
}

/// Copy `posts`, dropping the debug payload unless `include_meta`.
pub fn visible_posts(posts: &[Post], include_meta: bool) -> Vec<Post> {
    posts
        .iter()
        .cloned()
        .map(|mut post| {
            if !include_meta {
                post.meta = None;
            }
            post
        })
        .collect()
}

/// In-memory view of the simulation served by REST endpoints.
///
/// Updated each tick by the engine so the observer never blocks the tick
/// cycle.
#[derive(Debug, Clone, Default)]
pub struct StreamSnapshot {
    /// The population.
    pub personas: Vec<Persona>,
    /// Loaded events.
    pub events: Vec<Event>,
    /// Era of the run.
    pub era: String,
    /// Last completed tick.
    pub current_tick: u64,
    /// Posts accepted over the whole run.
    pub total_posts: u64,
    /// Most recent accepted posts, oldest first.
    pub recent_posts: VecDeque<Post>,
}

impl StreamSnapshot {
    /// Record a completed tick and its accepted posts.
    pub fn record(&mut self, tick: u64, posts: &[Post]) {
        self.current_tick = tick;
        for post in posts {
            self.recent_posts.push_back(post.clone());
            self.total_posts = self.total_posts.saturating_add(1);
        }
        while self.recent_posts.len() > RECENT_POSTS_CAPACITY {
            self.recent_posts.pop_front();
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for post batches.
    pub tx: broadcast::Sender<Arc<PostBatch>>,
    /// The current snapshot (updated each tick).
    pub snapshot: Arc<RwLock<StreamSnapshot>>,
    /// Runtime settings shared with the tick loop.
    pub settings: Arc<RuntimeSettings>,
}

impl AppState {
    /// Create application state around shared runtime settings.
    pub fn new(settings: Arc<RuntimeSettings>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(StreamSnapshot::default())),
            settings,
        }
    }

    /// Subscribe to the post broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PostBatch>> {
        self.tx.subscribe()
    }

    /// Publish a batch to all connected clients.
    ///
    /// Returns the number of receivers. 0 when no clients are connected,
    /// which is not an error.
    pub fn broadcast(&self, batch: PostBatch) -> usize {
        self.tx.send(Arc::new(batch)).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(RuntimeSettings::default()))
    }
}
