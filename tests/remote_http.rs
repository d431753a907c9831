// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire-contract tests for the HTTP datastore client and the chat-completion
//! AI backend, driven against local mock servers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::RawQuery,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use caravel::ai::{generate, HttpAi};
use caravel::model::{Document, TourFields, TourId};
use caravel::query::TourQuery;
use caravel::store::{HttpTourStore, TourStore};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn tour_row(id: &str, title: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2026-02-01T09:00:00Z",
        "title": title,
        "slug": slug,
        "tour_type": "group",
        "destination": "Norway",
        "promo_url": null,
        "content": {},
        "logistics": {},
        "itinerary": [],
        "provisions": {},
        "requirements": {},
        "pricing": {},
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn list_sends_a_postgrest_query_and_reads_the_total() {
    let captured: Arc<Mutex<Option<(String, HeaderMap)>>> = Arc::new(Mutex::new(None));
    let state = captured.clone();
    let router = Router::new().route(
        "/tours",
        get(move |RawQuery(query): RawQuery, headers: HeaderMap| {
            let state = state.clone();
            async move {
                *state.lock().expect("lock") = Some((query.unwrap_or_default(), headers));
                (
                    [(header::CONTENT_RANGE, "0-1/42")],
                    Json(json!([
                        tour_row("t:1", "Fjord Week", "fjord-week"),
                        tour_row("t:2", "Atlas Trek", "atlas-trek"),
                    ])),
                )
            }
        }),
    );
    let base = serve(router).await;

    let store = HttpTourStore::new(&base, "service-key").expect("client");
    let page = store
        .list(&TourQuery::with_page_size(10))
        .await
        .expect("list");

    assert_eq!(page.total, 42);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].fields().title(), "Fjord Week");
    assert_eq!(page.rows[1].fields().slug(), "atlas-trek");

    let (query, headers) = captured.lock().expect("lock").clone().expect("captured");
    assert!(query.contains("order=created_at.desc"), "{query}");
    assert!(query.contains("offset=0"), "{query}");
    assert!(query.contains("limit=10"), "{query}");
    assert_eq!(header_str(&headers, "apikey"), Some("service-key"));
    assert_eq!(
        header_str(&headers, "authorization"),
        Some("Bearer service-key")
    );
    assert_eq!(header_str(&headers, "prefer"), Some("count=exact"));
}

#[tokio::test]
async fn permission_failures_are_classified_from_the_error_body() {
    let router = Router::new().route(
        "/tours",
        get(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({"code": "42501", "message": "row-level security"})),
            )
        }),
    );
    let base = serve(router).await;

    let store = HttpTourStore::new(&base, "service-key").expect("client");
    let err = store
        .list(&TourQuery::with_page_size(10))
        .await
        .expect_err("permission error");

    assert!(err.is_permission_denied());
    assert!(err.to_string().contains("row-level security"), "{err}");
}

#[tokio::test]
async fn missing_content_range_is_a_decode_failure() {
    let router = Router::new().route("/tours", get(|| async { Json(json!([])) }));
    let base = serve(router).await;

    let store = HttpTourStore::new(&base, "service-key").expect("client");
    let err = store
        .list(&TourQuery::with_page_size(10))
        .await
        .expect_err("missing total");
    assert!(err.to_string().contains("Content-Range"), "{err}");
}

#[tokio::test]
async fn insert_posts_the_fields_and_returns_the_representation() {
    let captured: Arc<Mutex<Option<(HeaderMap, Value)>>> = Arc::new(Mutex::new(None));
    let state = captured.clone();
    let router = Router::new().route(
        "/tours",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let state = state.clone();
            async move {
                *state.lock().expect("lock") = Some((headers, body));
                (
                    StatusCode::CREATED,
                    Json(json!([tour_row("t:new", "Alpine Loop", "alpine-loop")])),
                )
            }
        }),
    );
    let base = serve(router).await;

    let mut fields = TourFields::default();
    fields.set_title("Alpine Loop");
    fields.set_slug("alpine-loop");
    fields.set_destination("Switzerland");

    let store = HttpTourStore::new(&base, "service-key").expect("client");
    let saved = store.insert(&fields).await.expect("insert");

    assert_eq!(saved.id().to_string(), "t:new");
    assert_eq!(saved.fields().title(), "Alpine Loop");

    let (headers, body) = captured.lock().expect("lock").clone().expect("captured");
    assert_eq!(header_str(&headers, "prefer"), Some("return=representation"));
    assert_eq!(body["title"], "Alpine Loop");
    assert_eq!(body["slug"], "alpine-loop");
    assert_eq!(body["destination"], "Switzerland");
    assert_eq!(body["tour_type"], "group");
    assert!(body.get("id").is_none(), "the server assigns ids");
    assert!(body.get("created_at").is_none());
}

#[tokio::test]
async fn slug_probe_excludes_the_row_being_edited() {
    let captured: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let state = captured.clone();
    let router = Router::new().route(
        "/tours",
        get(move |RawQuery(query): RawQuery| {
            let state = state.clone();
            async move {
                *state.lock().expect("lock") = Some(query.unwrap_or_default());
                Json(json!([]))
            }
        }),
    );
    let base = serve(router).await;

    let store = HttpTourStore::new(&base, "service-key").expect("client");
    let exclude = TourId::new("abc123").expect("id");
    let taken = store
        .slug_exists("fjord-week", Some(&exclude))
        .await
        .expect("probe");

    assert!(!taken);
    let query = captured.lock().expect("lock").clone().expect("captured");
    assert!(query.contains("slug=eq.fjord-week"), "{query}");
    assert!(query.contains("id=neq.abc123"), "{query}");
}

#[tokio::test]
async fn generate_round_trips_through_the_chat_endpoint() {
    let captured: Arc<Mutex<Option<(HeaderMap, Value)>>> = Arc::new(Mutex::new(None));
    let state = captured.clone();
    let router = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let state = state.clone();
            async move {
                *state.lock().expect("lock") = Some((headers, body));
                Json(json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": "```json\n{\"headline\": \"Seven fjords\"}\n```",
                        }
                    }]
                }))
            }
        }),
    );
    let base = serve(router).await;

    let ai = HttpAi::new(format!("{base}/v1/chat/completions"), "ai-key", "test-model")
        .expect("client");
    let document = Document::parse(r#"{"headline": "old"}"#).expect("document");
    let generated = generate(&ai, &document, "replace the headline")
        .await
        .expect("generate");

    assert_eq!(
        generated,
        Document::parse(r#"{"headline": "Seven fjords"}"#).expect("document")
    );

    let (headers, body) = captured.lock().expect("lock").clone().expect("captured");
    assert_eq!(header_str(&headers, "authorization"), Some("Bearer ai-key"));
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["role"], "system");
    let system = body["messages"][0]["content"].as_str().expect("system");
    assert!(system.contains(r#""headline": "old""#), "{system}");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "replace the headline");
}

#[tokio::test]
async fn chat_service_errors_bubble_up_with_the_status() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "overloaded") }),
    );
    let base = serve(router).await;

    let ai = HttpAi::new(format!("{base}/v1/chat/completions"), "ai-key", "test-model")
        .expect("client");
    let err = generate(&ai, &Document::empty_map(), "anything")
        .await
        .expect_err("status error");

    assert!(err.to_string().contains("500"), "{err}");
}
