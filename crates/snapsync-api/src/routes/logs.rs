//! Log viewer routes: proxied to the upstream SnapSync API.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use snapsync_common::{
    error::SnapResult,
    models::{ClearLogsRequest, LogQuery, LogView, SuccessResponse},
};
use std::sync::Arc;

use crate::{
    extract::{ApiJson, ApiQuery},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/logs", get(get_logs))
        .route("/logs/clear", post(clear_logs))
}

/// GET /api/logs?type=app|access&filter=...: Filtered, level-tagged log lines.
async fn get_logs(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LogQuery>,
) -> SnapResult<Json<LogView>> {
    let text = state.upstream()?.fetch_log_text(query.log_type).await?;
    Ok(Json(LogView::from_text(
        query.log_type,
        &text,
        query.filter.as_deref(),
    )))
}

/// POST /api/logs/clear: Ask the upstream to truncate a log.
async fn clear_logs(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ClearLogsRequest>,
) -> SnapResult<Json<SuccessResponse>> {
    state.upstream()?.clear_logs(&body).await?;
    tracing::info!(log_type = ?body.log_type, "Logs cleared");
    Ok(Json(SuccessResponse::OK))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{self, json_request, send};
    use axum::http::StatusCode;
    use axum::{routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serve a fake upstream on an ephemeral port and return its base URL.
    async fn spawn_upstream(cleared: Arc<Mutex<Vec<Value>>>) -> String {
        let app = Router::new()
            .route(
                "/api/logs/download",
                get(|| async { "INFO boot\n\nERROR disk full\nGET /api/images 200\n" }),
            )
            .route(
                "/api/logs/access",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/logs/clear",
                post(move |Json(body): Json<Value>| {
                    let cleared = cleared.clone();
                    async move {
                        cleared.lock().unwrap().push(body);
                        "ok"
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn router_for(base_url: Option<String>) -> Router {
        let mut config = test_support::config();
        config.upstream.base_url = base_url;
        test_support::router_with(config)
    }

    #[tokio::test]
    async fn test_logs_without_upstream() {
        let request = json_request("GET", "/api/logs", json!(null));
        let (status, body) = send(router_for(None), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_app_logs_filtered_and_tagged() {
        let base = spawn_upstream(Arc::default()).await;
        let request = json_request("GET", "/api/logs?type=app&filter=Disk", json!(null));
        let (status, body) = send(router_for(Some(base)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["log_type"], "app");
        assert_eq!(body["total"], 3);
        assert_eq!(
            body["lines"],
            json!([{ "text": "ERROR disk full", "level": "error" }])
        );
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_502() {
        let base = spawn_upstream(Arc::default()).await;
        let request = json_request("GET", "/api/logs?type=access", json!(null));
        let (status, body) = send(router_for(Some(base)), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to fetch logs (upstream status 500)");
    }

    #[tokio::test]
    async fn test_clear_forwards_log_type() {
        let cleared = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_upstream(cleared.clone()).await;
        let request = json_request("POST", "/api/logs/clear", json!({ "logType": "access" }));
        let (status, body) = send(router_for(Some(base)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            cleared.lock().unwrap().as_slice(),
            &[json!({ "logType": "access" })]
        );
    }

    #[tokio::test]
    async fn test_unknown_log_type_is_json_400() {
        let request = json_request("GET", "/api/logs?type=kernel", json!(null));
        let (status, body) = send(router_for(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_clear_accepts_snake_case_body() {
        let cleared = Arc::new(Mutex::new(Vec::new()));
        let base = spawn_upstream(cleared.clone()).await;
        let request = json_request("POST", "/api/logs/clear", json!({ "log_type": "app" }));
        let (status, _) = send(router_for(Some(base)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            cleared.lock().unwrap().as_slice(),
            &[json!({ "logType": "app" })]
        );
    }
}
