//! REST API endpoint handlers for the Observer server.
//!
//! All reads are served from the in-memory [`StreamSnapshot`] and the
//! shared [`RuntimeSettings`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness plus population, event count and era |
//! | `GET` | `/events` | Loaded events |
//! | `GET` | `/personas` | Persona summaries with follower counts |
//! | `GET` | `/personas/{id}` | Single persona |
//! | `GET` | `/posts` | Most recent accepted posts |
//! | `GET` | `/settings` | Current runtime settings |
//! | `POST` | `/settings` | Partial settings update |
//!
//! [`StreamSnapshot`]: crate::state::StreamSnapshot
//! [`RuntimeSettings`]: timestream_core::RuntimeSettings

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use timestream_core::settings::SettingsUpdate;
use timestream_types::{Persona, PersonaId};
use tracing::info;

use crate::error::ObserverError;
use crate::state::{AppState, RECENT_POSTS_CAPACITY, visible_posts};

/// Posts returned by `GET /posts` when no limit is given.
const DEFAULT_POSTS_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /posts`.
#[derive(Debug, serde::Deserialize)]
pub struct PostsQuery {
    /// Maximum number of posts to return (default 50, at most 200).
    pub limit: Option<usize>,
    /// Include debug payloads (`1`, `true`, `yes`, `on`). Defaults to the
    /// runtime setting.
    pub debug_meta: Option<String>,
}

/// Whether a query flag is switched on.
pub fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Resolve a per-request debug flag against the runtime default.
pub fn wants_meta(param: Option<&str>, default: bool) -> bool {
    param.map_or(default, flag_enabled)
}

fn persona_summary(persona: &Persona) -> serde_json::Value {
    serde_json::json!({
        "id": persona.id,
        "handle": persona.handle,
        "era": persona.era,
        "region": persona.region,
        "occupation": persona.occupation,
        "alignment": persona.alignment,
        "voice": persona.voice,
        "followers": persona.followers.len(),
        "following": persona.following.len(),
        "cognitive_style": persona.cognitive_style,
    })
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report liveness and the size of the loaded world.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(serde_json::json!({
        "status": "ok",
        "personas": snapshot.personas.len(),
        "events": snapshot.events.len(),
        "era": snapshot.era,
        "tick": snapshot.current_tick,
    }))
}

// ---------------------------------------------------------------------------
// GET /events
// ---------------------------------------------------------------------------

/// List the loaded events in file order.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.events)?))
}

// ---------------------------------------------------------------------------
// GET /personas
// ---------------------------------------------------------------------------

/// List persona summaries. Social edges are reported as counts.
pub async fn list_personas(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let personas: Vec<serde_json::Value> =
        snapshot.personas.iter().map(persona_summary).collect();
    Json(personas)
}

/// Get one persona with its full follow lists.
pub async fn get_persona(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    let persona_id = PersonaId::new(id);
    let persona = snapshot
        .personas
        .iter()
        .find(|p| p.id == persona_id)
        .ok_or_else(|| ObserverError::NotFound {
            kind: "persona",
            id: persona_id.to_string(),
        })?;
    Ok(Json(serde_json::to_value(persona)?))
}

// ---------------------------------------------------------------------------
// GET /posts
// ---------------------------------------------------------------------------

/// Most recent accepted posts, oldest first.
pub async fn recent_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostsQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let limit = params.limit.unwrap_or(DEFAULT_POSTS_LIMIT);
    if limit == 0 {
        return Err(ObserverError::InvalidQuery(
            "limit must be at least 1".to_owned(),
        ));
    }
    let limit = limit.min(RECENT_POSTS_CAPACITY);
    let include_meta = wants_meta(params.debug_meta.as_deref(), state.settings.debug_meta());

    let snapshot = state.snapshot.read().await;
    let skip = snapshot.recent_posts.len().saturating_sub(limit);
    let window: Vec<_> = snapshot.recent_posts.iter().skip(skip).cloned().collect();
    let posts = visible_posts(&window, include_meta);

    Ok(Json(serde_json::json!({
        "count": posts.len(),
        "total": snapshot.total_posts,
        "posts": posts,
    })))
}

// ---------------------------------------------------------------------------
// GET/POST /settings
// ---------------------------------------------------------------------------

/// Current runtime settings.
pub async fn get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.settings.snapshot())
}

/// Apply a partial settings update. Values are clamped to `[0, 1]`.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> impl IntoResponse {
    let snapshot = state.settings.apply(update);
    info!(
        reflectiveness = snapshot.reflectiveness,
        creativity = snapshot.creativity,
        debug_meta = snapshot.debug_meta,
        "Runtime settings updated"
    );
    Json(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        for on in ["1", "true", "TRUE", "yes", "On"] {
            assert!(flag_enabled(on), "{on}");
        }
        for off in ["0", "false", "no", "off", "", "maybe"] {
            assert!(!flag_enabled(off), "{off}");
        }
    }

    #[test]
    fn meta_defaults_to_setting() {
        assert!(wants_meta(None, true));
        assert!(!wants_meta(None, false));
        assert!(wants_meta(Some("yes"), false));
        assert!(!wants_meta(Some("0"), true));
    }
}
