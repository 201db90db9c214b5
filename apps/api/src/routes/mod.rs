pub mod content;
pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::chat::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/content", get(content::handle_get_content))
        // Chat API
        .route(
            "/api/v1/chat/quick-questions",
            get(handlers::handle_quick_questions),
        )
        .route("/api/v1/chat/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/chat/sessions/:id",
            delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/chat/sessions/:id/messages",
            post(handlers::handle_ask),
        )
        .route(
            "/api/v1/chat/sessions/:id/transcript",
            get(handlers::handle_get_transcript).delete(handlers::handle_reset_transcript),
        )
        .route(
            "/api/v1/chat/sessions/:id/config",
            put(handlers::handle_update_config),
        )
        .route(
            "/api/v1/chat/sessions/:id/export",
            get(handlers::handle_export),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::prompts::APOLOGY;
    use crate::chat::resolver::tests::{resolver_with, StubBackend};
    use crate::chat::session::SessionStore;
    use crate::config::Config;
    use crate::content::ContentRecord;

    fn make_app(backend: Arc<StubBackend>, env_key: Option<&str>) -> Router {
        let mut pairs = Vec::new();
        if let Some(key) = env_key {
            pairs.push(("ANTHROPIC_API_KEY".to_string(), key.to_string()));
        }
        let config = Config::from_lookup(|k| {
            pairs
                .iter()
                .find(|(name, _)| name == k)
                .map(|(_, v)| v.clone())
        })
        .unwrap();

        let state = AppState {
            config,
            content: Arc::new(ContentRecord::builtin().unwrap()),
            resolver: resolver_with(backend),
            sessions: SessionStore::new(),
        };
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 256)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_session(app: &Router) -> String {
        let (status, json) = send_json(app, "POST", "/api/v1/chat/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        json["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = make_app(StubBackend::replying("unused"), None);
        let (status, json) = send_json(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "portfolio-api");
    }

    #[tokio::test]
    async fn test_content_and_quick_questions() {
        let app = make_app(StubBackend::replying("unused"), None);

        let (status, json) = send_json(&app, "GET", "/api/v1/content", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["most_recent_role"]["company"], "Mission Cloud");

        let (status, json) = send_json(&app, "GET", "/api/v1/chat/quick-questions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_create_session_returns_greeting() {
        let app = make_app(StubBackend::replying("unused"), None);
        let (status, json) = send_json(&app, "POST", "/api/v1/chat/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json["greeting"]
            .as_str()
            .unwrap()
            .starts_with("Hi there! I'm Kelby James Enevold"));
    }

    #[tokio::test]
    async fn test_ask_without_key_uses_local_rules() {
        let backend = StubBackend::replying("unused");
        let app = make_app(backend.clone(), None);
        let id = create_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "Can you tell me about AWS training programs?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["strategy"], "local");
        assert_eq!(json["degraded"], false);
        assert_eq!(json["transcript_len"], 2);
        assert!(json["reply"].as_str().unwrap().contains("extensive AWS experience"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_message_rejected_and_not_recorded() {
        let app = make_app(StubBackend::replying("unused"), None);
        let id = create_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "    "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");

        let (_, transcript) = send_json(
            &app,
            "GET",
            &format!("/api/v1/chat/sessions/{id}/transcript"),
            None,
        )
        .await;
        assert_eq!(transcript.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_env_key_failure_answers_with_apology() {
        let app = make_app(StubBackend::failing(500), Some("sk-env"));
        let id = create_session(&app).await;

        let (status, json) = send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "What about AWS?"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reply"], APOLOGY);
        assert_eq!(json["strategy"], "remote");
        assert_eq!(json["degraded"], true);
        assert_eq!(json["transcript_len"], 2);
    }

    #[tokio::test]
    async fn test_session_key_switches_to_remote() {
        let backend = StubBackend::replying("Remote answer.");
        let app = make_app(backend.clone(), None);
        let id = create_session(&app).await;
        let messages = format!("/api/v1/chat/sessions/{id}/messages");

        let (_, first) = send_json(&app, "POST", &messages, Some(json!({"message": "Hi"}))).await;
        assert_eq!(first["strategy"], "local");

        let (status, _) = send_json(
            &app,
            "PUT",
            &format!("/api/v1/chat/sessions/{id}/config"),
            Some(json!({"api_key": "sk-session", "model": "claude-custom"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, second) = send_json(&app, "POST", &messages, Some(json!({"message": "Hi"}))).await;
        assert_eq!(second["strategy"], "remote");
        assert_eq!(second["reply"], "Remote answer.");

        let (key, model, _, _) = backend.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(key, "sk-session");
        assert_eq!(model, "claude-custom");
    }

    #[tokio::test]
    async fn test_reset_clears_transcript() {
        let app = make_app(StubBackend::replying("unused"), None);
        let id = create_session(&app).await;
        send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "Hello"})),
        )
        .await;

        let transcript_uri = format!("/api/v1/chat/sessions/{id}/transcript");
        let (_, before) = send_json(&app, "GET", &transcript_uri, None).await;
        assert_eq!(before.as_array().unwrap().len(), 2);
        assert_eq!(before[0]["speaker"], "user");
        assert_eq!(before[1]["speaker"], "assistant");

        let (status, _) = send_json(&app, "DELETE", &transcript_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, after) = send_json(&app, "GET", &transcript_uri, None).await;
        assert_eq!(after.as_array().unwrap().len(), 0);

        // Resetting an already empty transcript is a no-op.
        let (status, _) = send_json(&app, "DELETE", &transcript_uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_export_formats() {
        let app = make_app(StubBackend::replying("unused"), None);
        let id = create_session(&app).await;
        send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "Hello"})),
        )
        .await;

        let (status, json) = send_json(
            &app,
            "GET",
            &format!("/api/v1/chat/sessions/{id}/export"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["messages"][0]["text"], "Hello");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);

        let (status, bytes) = send(
            &app,
            "GET",
            &format!("/api/v1/chat/sessions/{id}/export?format=markdown"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let markdown = String::from_utf8(bytes).unwrap();
        assert!(markdown.starts_with("# Conversation with Portfolio Chatbot"));
        assert!(markdown.contains("**You**: Hello"));
        assert!(markdown.contains("**Kelby James Enevold**: "));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = make_app(StubBackend::replying("unused"), None);
        let id = uuid::Uuid::new_v4();

        let (status, json) = send_json(
            &app,
            "POST",
            &format!("/api/v1/chat/sessions/{id}/messages"),
            Some(json!({"message": "Hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (status, _) = send_json(&app, "DELETE", &format!("/api/v1/chat/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = make_app(StubBackend::replying("unused"), None);
        let id = create_session(&app).await;

        let (status, _) = send_json(&app, "DELETE", &format!("/api/v1/chat/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(
            &app,
            "GET",
            &format!("/api/v1/chat/sessions/{id}/transcript"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
