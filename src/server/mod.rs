//! HTTP gateway
//!
//! Validates inbound chat-completion requests, serializes reply collection
//! through the exclusion gate, maps reply outcomes onto the fixed set of
//! wire responses, and drives the audit log and the shutdown controller.
//!
//! Transport-level failures (malformed JSON, unknown routes, disallowed
//! methods) are answered here with structured bodies and never reach a
//! reply source.

pub mod shutdown;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde_json::json;

use hal_core::audit::{AuditLog, RecordKind};
use hal_core::chat::{ChatRequest, ChatResponse};
use hal_core::gate::RequestGate;
use hal_core::reply::{ReplyOutcome, ReplySource};
use hal_core::{debug_log, error_log, info_log, warn_log};

use crate::server::shutdown::ShutdownHandle;

/// Shared server state. The gate is owned here rather than being process
/// global, so independent instances can coexist (and be unit tested).
pub struct AppState {
    pub gate: RequestGate,
    pub reply: Arc<dyn ReplySource>,
    pub audit: Option<AuditLog>,
    pub daemon_mode: bool,
    pub shutdown: ShutdownHandle,
}

/// Build the router with its explicit dispatch table.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/v1/chat/completions",
            post(chat_completions).fallback(method_not_allowed),
        )
        .route("/api/you", delete(shutdown_daemon).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
}

/// Bearer-token check. The header is read but verification always
/// succeeds regardless of content - an explicit no-op, not an oversight.
fn authenticate(headers: &HeaderMap) -> bool {
    let _token = headers.get(header::AUTHORIZATION);
    true
}

fn error_json(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

/// `POST /v1/chat/completions`
///
/// The raw JSON value is kept alongside the typed request so the audit log
/// records the inbound payload verbatim.
async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let _authenticated = authenticate(&headers);

    let Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug_log!("rejected malformed body: {rejection}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "validation_error",
                    "detail": rejection.body_text(),
                })),
            )
                .into_response();
        }
    };

    let request: ChatRequest = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(e) => {
            debug_log!("rejected invalid schema: {e}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "validation_error",
                    "detail": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    debug_log!(
        "request received: model={} messages={}",
        request.model,
        request.messages.len()
    );

    // Non-blocking: a request arriving while another holds the gate is
    // rejected immediately, it never waits or queues.
    let Some(permit) = state.gate.try_acquire() else {
        warn_log!("another request is in progress; rejecting");
        return error_json(StatusCode::SERVICE_UNAVAILABLE, "server_busy");
    };

    // The gated span starts here. Both audit writes happen inside it;
    // no await sits between acquiring the permit and handing it to the
    // collection task.
    if let Some(audit) = &state.audit {
        if let Err(e) = audit.append(RecordKind::Request, &raw) {
            error_log!("{e}");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, "internal_error");
        }
    }

    // Reply collection runs on its own task and carries the permit with
    // it. A client disconnect drops this future, but the slot stays taken
    // until the collection task itself finishes, so a half-open operator
    // session can never overlap with a new one.
    let reply = Arc::clone(&state.reply);
    let collect_request = request.clone();
    let collector = tokio::spawn(async move {
        let result = reply.collect(&collect_request).await;
        (result, permit)
    });

    let (outcome, _permit) = match collector.await {
        Ok((Ok(outcome), permit)) => (outcome, permit),
        Ok((Err(e), permit)) => {
            error_log!("reply source failed: {e}");
            (ReplyOutcome::InternalError, permit)
        }
        Err(e) => {
            error_log!("reply collection task failed: {e}");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, "internal_error");
        }
    };
    debug_log!("reply outcome: {outcome:?}");

    let (status, body) = match &outcome {
        ReplyOutcome::Success(text) => {
            let response = ChatResponse::new(&request.model, text);
            (StatusCode::OK, json!(response))
        }
        ReplyOutcome::CannotAnswer => (StatusCode::OK, json!({ "error": "cannot_answer" })),
        ReplyOutcome::InternalError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "internal_error" }),
        ),
        ReplyOutcome::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "forbidden" })),
        ReplyOutcome::Busy => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "server_busy" }),
        ),
    };

    if let Some(audit) = &state.audit {
        let record = match &outcome {
            ReplyOutcome::Success(text) => json!({ "role": "assistant", "content": text }),
            _ => body.clone(),
        };
        if let Err(e) = audit.append(RecordKind::Response, &record) {
            error_log!("{e}");
            return error_json(StatusCode::INTERNAL_SERVER_ERROR, "internal_error");
        }
    }

    (status, Json(body)).into_response()
}

/// `DELETE /api/you` - remote shutdown, daemon mode only.
async fn shutdown_daemon(State(state): State<Arc<AppState>>) -> Response {
    if !state.daemon_mode {
        return error_json(StatusCode::BAD_REQUEST, "not_in_daemon_mode");
    }

    info_log!("shutdown requested; terminating after grace delay");
    state.shutdown.schedule();

    (StatusCode::OK, Json(json!({ "message": "shutting_down" }))).into_response()
}

async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "detail": format!("no route for {uri}"),
        })),
    )
        .into_response()
}

async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "method_not_allowed",
            "detail": format!("{method} is not allowed for {uri}"),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use hal_core::reply::FixedReply;
    use hal_core::HalError;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state_with(
        reply: Arc<dyn ReplySource>,
        daemon_mode: bool,
        audit: Option<AuditLog>,
    ) -> Arc<AppState> {
        Arc::new(AppState {
            gate: RequestGate::new(),
            reply,
            audit,
            daemon_mode,
            shutdown: ShutdownHandle::new(),
        })
    }

    fn daemon_state(text: &str) -> Arc<AppState> {
        state_with(Arc::new(FixedReply::new(text)), true, None)
    }

    /// Reply source returning a preset outcome, standing in for the
    /// operator session in router tests.
    struct ScriptedReply(ReplyOutcome);

    #[async_trait]
    impl ReplySource for ScriptedReply {
        async fn collect(&self, _request: &ChatRequest) -> Result<ReplyOutcome, HalError> {
            Ok(self.0.clone())
        }
    }

    fn chat_request(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/chat/completions")
            .header("content-type", "application/json")
            .header("authorization", "Bearer fake-token")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    fn hi_request() -> serde_json::Value {
        json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hi"}]
        })
    }

    #[tokio::test]
    async fn test_daemon_mode_returns_fixed_reply() {
        let app = build_router(daemon_state("OK"));

        let (status, body) = send(app, chat_request(&hi_request())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["object"], "chat.completion");
        assert_eq!(body["choices"][0]["index"], 0);
        assert_eq!(body["choices"][0]["message"]["role"], "assistant");
        assert_eq!(body["choices"][0]["message"]["content"], "OK");
        assert_eq!(body["choices"][0]["finish_reason"], "stop");
    }

    #[tokio::test]
    async fn test_structured_content_accepted() {
        let app = build_router(daemon_state("OK"));
        let request = json!({
            "model": "gpt-4",
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "a"},
                    {"type": "text", "text": "b"}
                ]
            }]
        });

        let (status, body) = send(app, chat_request(&request)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["choices"][0]["message"]["content"], "OK");
    }

    #[tokio::test]
    async fn test_busy_while_gate_held() {
        let state = daemon_state("OK");
        let app = build_router(Arc::clone(&state));

        let permit = state.gate.try_acquire().unwrap();
        let (status, body) = send(app.clone(), chat_request(&hi_request())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "server_busy");

        // Releasing the gate lets the next attempt through.
        drop(permit);
        let (status, _) = send(app, chat_request(&hi_request())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_operator_forbidden_maps_to_403() {
        let state = state_with(Arc::new(ScriptedReply(ReplyOutcome::Forbidden)), false, None);
        let app = build_router(state);

        let (status, body) = send(app, chat_request(&hi_request())).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn test_operator_cannot_answer_maps_to_200() {
        let state = state_with(
            Arc::new(ScriptedReply(ReplyOutcome::CannotAnswer)),
            false,
            None,
        );
        let app = build_router(state);

        let (status, body) = send(app, chat_request(&hi_request())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "cannot_answer");
    }

    #[tokio::test]
    async fn test_operator_internal_error_maps_to_500() {
        let state = state_with(
            Arc::new(ScriptedReply(ReplyOutcome::InternalError)),
            false,
            None,
        );
        let app = build_router(state);

        let (status, body) = send(app, chat_request(&hi_request())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }

    /// Reply source that suspends until released, standing in for an
    /// operator session in progress.
    struct HeldReply(Arc<tokio::sync::Notify>);

    #[async_trait]
    impl ReplySource for HeldReply {
        async fn collect(&self, _request: &ChatRequest) -> Result<ReplyOutcome, HalError> {
            self.0.notified().await;
            Ok(ReplyOutcome::Success("late".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_disconnect_keeps_gate_held_until_session_ends() {
        let release = Arc::new(tokio::sync::Notify::new());
        let state = state_with(Arc::new(HeldReply(Arc::clone(&release))), false, None);
        let app = build_router(Arc::clone(&state));

        // Drop the response future mid-collection, as a disconnecting
        // client would.
        let pending = app.oneshot(chat_request(&hi_request()));
        let aborted = tokio::time::timeout(std::time::Duration::from_millis(50), pending).await;
        assert!(aborted.is_err());

        // The session is still live, so the slot must stay taken.
        assert!(state.gate.try_acquire().is_none());

        // Once the session finishes the slot frees.
        release.notify_one();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(state.gate.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_gate_released_after_each_request() {
        let state = daemon_state("OK");
        let app = build_router(Arc::clone(&state));

        for _ in 0..3 {
            let (status, _) = send(app.clone(), chat_request(&hi_request())).await;
            assert_eq!(status, StatusCode::OK);
        }
        assert!(state.gate.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let app = build_router(daemon_state("OK"));
        let request = Request::builder()
            .method("POST")
            .uri("/v1/chat/completions")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_missing_model_is_validation_error() {
        let app = build_router(daemon_state("OK"));
        let request = json!({"messages": [{"role": "user", "content": "Hi"}]});

        let (status, body) = send(app, chat_request(&request)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = build_router(daemon_state("OK"));
        let request = Request::builder()
            .method("GET")
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let app = build_router(daemon_state("OK"));
        let request = Request::builder()
            .method("GET")
            .uri("/v1/chat/completions")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "method_not_allowed");
    }

    #[tokio::test]
    async fn test_shutdown_outside_daemon_mode_is_400() {
        let state = state_with(Arc::new(ScriptedReply(ReplyOutcome::CannotAnswer)), false, None);
        let app = build_router(state);
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/you")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "not_in_daemon_mode");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_in_daemon_mode_schedules_exit() {
        let state = daemon_state("OK");
        let shutdown = state.shutdown.clone();
        let app = build_router(state);
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/you")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "shutting_down");
        shutdown.triggered().await;
    }

    #[tokio::test]
    async fn test_audit_records_request_then_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.ndjson");
        let state = state_with(
            Arc::new(FixedReply::new("OK")),
            true,
            Some(AuditLog::new(&path)),
        );
        let app = build_router(state);

        let request = hi_request();
        let (status, _) = send(app, chat_request(&request)).await;
        assert_eq!(status, StatusCode::OK);

        let contents = std::fs::read_to_string(&path).unwrap();
        let records: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "request");
        assert_eq!(records[0]["data"], request);
        assert_eq!(records[1]["type"], "response");
        assert_eq!(
            records[1]["data"],
            json!({"role": "assistant", "content": "OK"})
        );
    }

    #[tokio::test]
    async fn test_busy_rejection_writes_no_audit_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.ndjson");
        let state = state_with(
            Arc::new(FixedReply::new("OK")),
            true,
            Some(AuditLog::new(&path)),
        );
        let app = build_router(Arc::clone(&state));

        let _permit = state.gate.try_acquire().unwrap();
        let (status, _) = send(app, chat_request(&hi_request())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!path.exists());
    }
}
