// tests/test_conversation_api.rs

mod test_helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use convo::api::create_router;
use convo::conversation::{FORBIDDEN_MESSAGE, ObjectRef, Owner};

async fn get_json(app: &axum::Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{uri}: {content_type}");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_owner_reads_private_conversation_with_assistant() {
    let (state, store) = test_helpers::create_test_state().await;

    let assistant_id = ObjectRef::generate();
    store
        .insert_assistant(&test_helpers::assistant(&assistant_id))
        .await
        .unwrap();
    let conv = test_helpers::conversation(Owner::User("alice".into()), Some(assistant_id.as_str()));
    store.insert_conversation(&conv).await.unwrap();

    let app = create_router(state);
    let (status, body) = get_json(
        &app,
        &format!("/conversation/{}/messages", conv.id),
        &[("x-user-id", "alice")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shared"], false);
    assert_eq!(body["title"], "🍰 Cheesecake recipe");
    assert_eq!(body["model"], "mistral-7b");
    assert_eq!(body["preprompt"], "Be concise.");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["from"], "user");
    assert_eq!(body["assistant"]["_id"], assistant_id.as_str());
    assert_eq!(body["assistant"]["name"], "Chef");
}

#[tokio::test]
async fn test_anonymous_session_reads_its_own_conversation() {
    let (state, store) = test_helpers::create_test_state().await;
    let conv = test_helpers::conversation(Owner::Session("sess-1".into()), None);
    store.insert_conversation(&conv).await.unwrap();

    let app = create_router(state);
    let uri = format!("/conversation/{}/messages", conv.id);

    let (status, body) = get_json(&app, &uri, &[("cookie", "session=sess-1")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assistant"].is_null());

    // No cookie at all: a fresh session owns nothing
    let (status, _) = get_json(&app, &uri, &[]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_shared_link_is_public() {
    let (state, store) = test_helpers::create_test_state().await;
    store
        .insert_shared_conversation(&test_helpers::shared_conversation("Ab3dE5g"))
        .await
        .unwrap();

    let app = create_router(state);
    let (status, body) = get_json(&app, "/conversation/Ab3dE5g/messages", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shared"], true);
    assert!(body["preprompt"].is_null());
    assert_eq!(body["title"], "📰 Latest news");
}

#[tokio::test]
async fn test_error_statuses() {
    let (state, store) = test_helpers::create_test_state().await;
    let conv = test_helpers::conversation(Owner::User("alice".into()), None);
    store.insert_conversation(&conv).await.unwrap();
    let app = create_router(state);

    // Unknown share token
    let (status, body) = get_json(&app, "/conversation/missing/messages", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Conversation not found");

    // Malformed identifier
    let (status, body) = get_json(&app, "/conversation/not-an-id/messages", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid conversation ID format");

    // Someone else's conversation
    let (status, body) = get_json(
        &app,
        &format!("/conversation/{}/messages", conv.id),
        &[("x-user-id", "bob")],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], FORBIDDEN_MESSAGE);

    // Well-formed but nonexistent
    let (status, _) = get_json(
        &app,
        &format!("/conversation/{}/messages", ObjectRef::generate()),
        &[("x-user-id", "alice")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let (state, _store) = test_helpers::create_test_state().await;
    sqlx::query("DROP TABLE conversations")
        .execute(&state.db)
        .await
        .unwrap();

    let app = create_router(state);
    let (status, body) = get_json(
        &app,
        &format!("/conversation/{}/messages", ObjectRef::generate()),
        &[("x-user-id", "alice")],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_health() {
    let (state, _store) = test_helpers::create_test_state().await;
    let app = create_router(state);

    let (status, body) = get_json(&app, "/health", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}
