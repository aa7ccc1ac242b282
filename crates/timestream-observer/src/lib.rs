//! Observer API server for the TimeStream persona simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/stream`) streaming accepted posts in
//!   real time via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the population, the events, recent posts and
//!   service health
//! - **Settings endpoints** to read and adjust reflectiveness, creativity
//!   and debug payload visibility while the simulation runs
//!
//! # Architecture
//!
//! The observer reads from an in-memory [`StreamSnapshot`] that the engine
//! updates each tick, so REST reads never block the tick cycle. Runtime
//! settings are shared with the tick loop through lock-free atomics.
//!
//! [`StreamSnapshot`]: state::StreamSnapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerConfig, ServerError, spawn_observer, start_server};
pub use state::{AppState, PostBatch, StreamSnapshot};
