//! Tick callback that updates the Observer API state.
//!
//! After each tick, this callback records the accepted posts in the
//! in-memory [`StreamSnapshot`] and broadcasts a [`PostBatch`] to all
//! connected `WebSocket` clients.
//!
//! [`StreamSnapshot`]: timestream_observer::StreamSnapshot

use std::sync::Arc;

use timestream_core::runner::TickCallback;
use timestream_core::tick::{SimulationState, TickSummary};
use timestream_observer::state::RECENT_POSTS_CAPACITY;
use timestream_observer::{AppState, PostBatch};
use timestream_types::Post;
use tracing::debug;

/// Callback that bridges the tick cycle to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
    /// Posts not yet written to the snapshot because a reader held the lock.
    /// Holds at most the snapshot's recent-post capacity.
    pending: Vec<Post>,
    /// Deferred posts dropped from `pending`, still owed to the total count.
    overflow: u64,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            pending: Vec::new(),
            overflow: 0,
        }
    }
}

impl TickCallback for ObserverCallback {
    fn on_tick(&mut self, summary: &TickSummary, _sim: &SimulationState) {
        self.pending.extend(summary.posts.iter().cloned());
        let excess = self.pending.len().saturating_sub(RECENT_POSTS_CAPACITY);
        if excess > 0 {
            self.pending.drain(..excess);
            self.overflow = self
                .overflow
                .saturating_add(u64::try_from(excess).unwrap_or(u64::MAX));
        }

        // try_write keeps the tick loop from blocking on REST readers; a
        // missed update is carried to the next tick.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.record(summary.tick, &self.pending);
            snap.total_posts = snap.total_posts.saturating_add(self.overflow);
            self.pending.clear();
            self.overflow = 0;
        } else {
            debug!(
                tick = summary.tick,
                pending = self.pending.len(),
                "Snapshot busy, deferring update"
            );
        }

        if summary.posts.is_empty() {
            return;
        }
        let receivers = self.state.broadcast(PostBatch {
            tick: summary.tick,
            posts: summary.posts.clone(),
        });
        debug!(
            tick = summary.tick,
            posts = summary.posts.len(),
            receivers,
            "Post batch broadcast"
        );
    }
}
