//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use timestream_core::RuntimeSettings;
use timestream_observer::router::build_router;
use timestream_observer::state::AppState;
use timestream_types::{
    CognitiveStyle, DebugMeta, EraFeatures, Event, EventId, Feeling, Grounding, Intent, Persona,
    PersonaId, Post, PostFeatures, PostId, Scores, Scratchpad, VoiceStyle,
};
use tower::ServiceExt;

fn persona(id: &str, handle: &str, following: &[&str], followers: &[&str]) -> Persona {
    Persona {
        id: PersonaId::new(id),
        handle: handle.to_owned(),
        era: String::from("1914-08"),
        region: String::from("Europe-West"),
        occupation: String::from("clerk"),
        alignment: BTreeMap::from([(String::from("war"), 0.6)]),
        voice: VoiceStyle {
            formality: 0.7,
            dialect: String::from("EN_1910s"),
        },
        cognitive_style: CognitiveStyle::default(),
        following: following.iter().map(|f| PersonaId::new(*f)).collect(),
        followers: followers.iter().map(|f| PersonaId::new(*f)).collect(),
    }
}

fn event() -> Event {
    Event {
        id: EventId::new("ev_1914_08_04_britain"),
        date: String::from("1914-08-04"),
        title: String::from("Britain Declares War"),
        summary: String::from("Britain declares war on Germany."),
        region: String::from("Europe-West"),
        citations: vec![String::from("The Times, 5 August 1914")],
    }
}

fn post(persona: &Persona, text: &str, event: &Event) -> Post {
    Post {
        id: PostId::new(),
        persona_id: persona.id.clone(),
        handle: persona.handle.clone(),
        timestamp: Utc::now(),
        text: text.to_owned(),
        features: PostFeatures::fresh(EraFeatures::default()),
        grounding: vec![Grounding::from(event)],
        meta: Some(DebugMeta {
            scratchpad: Scratchpad {
                intent: Intent::Assert,
                confidence: 0.72,
                self_reference: true,
                audience_model: String::from("my neighbours"),
                feeling: Feeling::Resolute,
                risk: 0.5,
                thought: String::from("Duty calls."),
            },
            scores: Scores {
                temporal: 0.8,
                voice: 0.9,
                consistency: 0.8,
                composite: 0.83,
            },
        }),
    }
}

async fn make_test_state() -> Arc<AppState> {
    let state = Arc::new(AppState::new(Arc::new(RuntimeSettings::new(
        0.6, 0.4, false,
    ))));

    let arthur = persona("p_0000", "arthur_abc", &["p_0001"], &[]);
    let nora = persona("p_0001", "nora_def", &[], &["p_0000"]);
    let ev = event();
    let posts = vec![
        post(&arthur, "The wireless says Britain stands firm.", &ev),
        post(&nora, "Grave news in the gazette this morning.", &ev),
        post(&arthur, "We must do our duty.", &ev),
    ];

    {
        let mut snap = state.snapshot.write().await;
        snap.personas = vec![arthur, nora];
        snap.events = vec![ev];
        snap.era = String::from("1914-08");
        snap.record(7, &posts);
    }

    state
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(state: Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let router = build_router(state);
    let response = router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(state: Arc<AppState>, path: &str, body: &str) -> (StatusCode, Value) {
    let router = build_router(state);
    let response = router
        .oneshot(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (status, json) = get_json(make_test_state().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["personas"], 2);
    assert_eq!(json["events"], 1);
    assert_eq!(json["era"], "1914-08");
    assert_eq!(json["tick"], 7);
}

#[tokio::test]
async fn test_list_events() {
    let (status, json) = get_json(make_test_state().await, "/events").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["id"], "ev_1914_08_04_britain");
    assert_eq!(json[0]["date"], "1914-08-04");
}

#[tokio::test]
async fn test_list_personas_reports_edge_counts() {
    let (status, json) = get_json(make_test_state().await, "/personas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["handle"], "arthur_abc");
    assert_eq!(json[0]["following"], 1);
    assert_eq!(json[0]["followers"], 0);
    assert_eq!(json[1]["followers"], 1);
}

#[tokio::test]
async fn test_get_persona_by_id() {
    let (status, json) = get_json(make_test_state().await, "/personas/p_0001").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["handle"], "nora_def");
    assert_eq!(json["followers"][0], "p_0000");
}

#[tokio::test]
async fn test_get_persona_not_found() {
    let (status, json) = get_json(make_test_state().await, "/personas/p_9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["error"].as_str().unwrap().contains("p_9999"));
}

#[tokio::test]
async fn test_recent_posts_hide_meta_by_default() {
    let (status, json) = get_json(make_test_state().await, "/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["total"], 3);
    assert_eq!(json["posts"][0]["text"], "The wireless says Britain stands firm.");
    assert!(json["posts"][0]["meta"].is_null());
    assert_eq!(
        json["posts"][0]["grounding"][0]["event_id"],
        "ev_1914_08_04_britain"
    );
}

#[tokio::test]
async fn test_recent_posts_limit_keeps_newest() {
    let (status, json) = get_json(make_test_state().await, "/posts?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["posts"][1]["text"], "We must do our duty.");
}

#[tokio::test]
async fn test_recent_posts_with_debug_meta() {
    let (status, json) = get_json(make_test_state().await, "/posts?debug_meta=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["posts"][0]["meta"]["scores"]["final"], 0.83);
    assert_eq!(json["posts"][0]["meta"]["scratchpad"]["feeling"], "resolute");
}

#[tokio::test]
async fn test_recent_posts_zero_limit_rejected() {
    let (status, json) = get_json(make_test_state().await, "/posts?limit=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_get_settings() {
    let (status, json) = get_json(make_test_state().await, "/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reflectiveness"], 0.6);
    assert_eq!(json["creativity"], 0.4);
    assert_eq!(json["debug_meta"], false);
}

#[tokio::test]
async fn test_update_settings_clamps_and_keeps_missing_fields() {
    let state = make_test_state().await;
    let (status, json) = post_json(
        Arc::clone(&state),
        "/settings",
        r#"{"reflectiveness": 1.7, "debug_meta": true}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reflectiveness"], 1.0);
    assert_eq!(json["creativity"], 0.4);
    assert_eq!(json["debug_meta"], true);

    // The runtime default now exposes debug payloads.
    let (_, posts) = get_json(state, "/posts").await;
    assert!(posts["posts"][0]["meta"].is_object());
}
