#[cfg(test)]
mod tests {
    use super::super::*;
    use analysis_core::{
        AnalysisError, PriceBar, PriceHistoryProvider, SamplingInterval, StatementKind, StatementProvider,
        StatementRow, Ticker,
    };
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::time::{Duration, Instant};
    use tower::ServiceExt;

    struct FixedPrices;

    #[async_trait]
    impl PriceHistoryProvider for FixedPrices {
        async fn fetch_history(
            &self,
            _ticker: &Ticker,
            _window_days: u32,
            _interval: SamplingInterval,
        ) -> Result<Vec<PriceBar>, AnalysisError> {
            Ok((0..30)
                .map(|i| {
                    let close = 50.0 + (i % 7) as f64;
                    PriceBar {
                        timestamp: Utc.timestamp_opt(1_700_000_000 + i * 86_400, 0).unwrap(),
                        open: close - 0.5,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        adjusted_close: close,
                        volume: 5_000.0,
                    }
                })
                .collect())
        }
    }

    struct NoStatements;

    #[async_trait]
    impl StatementProvider for NoStatements {
        async fn fetch_statement(
            &self,
            _ticker: &Ticker,
            _kind: StatementKind,
            _limit: u32,
        ) -> Result<Vec<StatementRow>, AnalysisError> {
            Err(AnalysisError::ApiError("FMP_API_KEY is not configured".to_string()))
        }
    }

    fn state() -> AppState {
        let controller = DashboardController::new(Arc::new(FixedPrices), Arc::new(NoStatements));
        AppState::new(controller, session_store::DEFAULT_SESSION_IDLE)
    }

    fn app() -> Router {
        build_router(state())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, HeaderMap, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = send(&app(), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_index_serves_embedded_ui() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/sessions"));
    }

    #[tokio::test]
    async fn test_timeframes_table() {
        let (status, _, body) = send(&app(), Method::GET, "/api/timeframes", None).await;
        assert_eq!(status, StatusCode::OK);
        let frames = body["data"].as_array().unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0]["label"], "1 minute");
        assert_eq!(frames[5]["history_days"], 1800);
        assert_eq!(frames[5]["interval"], "1mo");
        let defaults: Vec<&Value> = frames.iter().filter(|f| f["default"] == true).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0]["label"], "1 day");
    }

    #[tokio::test]
    async fn test_stateless_dashboard() {
        let (status, _, body) = send(
            &app(),
            Method::POST,
            "/api/dashboard",
            Some(json!({ "ticker": "msft", "show_rsi": true, "moving_averages": [10] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let report = &body["data"];
        assert_eq!(report["ticker"], "MSFT");
        assert_eq!(report["time_frame"], "1 day");
        assert_eq!(report["chart"]["title"], "MSFT Stock Price Chart (1 day)");

        let names: Vec<&str> = report["chart"]["series"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["SMA10", "RSI"]);

        // statements unavailable: every ratio degrades, the request still succeeds
        let ratios = report["ratios"].as_array().unwrap();
        assert_eq!(ratios.len(), 9);
        assert!(ratios.iter().all(|r| r["value"] == "N/A"));
        assert!(!report["notices"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let (status, _, body) = send(&app(), Method::POST, "/api/dashboard", Some(json!({ "std_dev": 7.5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("7.5"));

        let (status, _, _) = send(
            &app(),
            Method::POST,
            "/api/dashboard",
            Some(json!({ "time_frame": "1 week" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app();

        let (status, _, body) = send(&app, Method::POST, "/api/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["config"]["ticker"], "AAPL");
        assert_eq!(body["data"]["config"]["indicators"]["std_dev"], 2.0);

        let uri = format!("/api/sessions/{}", id);
        let (status, _, body) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "ticker": "nvda", "time_frame": "1 hour" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["ticker"], "NVDA");

        // re-render with a config change only; the ticker is remembered
        let (status, _, body) = send(
            &app,
            Method::POST,
            &format!("{}/submit", uri),
            Some(json!({ "show_macd": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["ticker"], "NVDA");
        assert_eq!(body["data"]["time_frame"], "1 hour");
        assert!(body["data"]["chart"]["panels"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["panel"] == "macd"));

        let (status, _, body) = send(&app, Method::POST, &format!("{}/submit", uri), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["config"]["show_macd"], true);

        let (status, _, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_rejected_session_update_keeps_config() {
        let app = app();
        let (_, _, body) = send(&app, Method::POST, "/api/sessions", None).await;
        let uri = format!("/api/sessions/{}", body["data"]["id"].as_str().unwrap());

        let (status, _, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "ticker": "TSLA", "moving_averages": [10, 200] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, _, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["data"]["config"]["ticker"], "AAPL");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/sessions/{}/submit", uuid::Uuid::new_v4());
        let (status, _, body) = send(&app(), Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_request_id_propagated_or_generated() {
        let request = Request::builder()
            .uri("/api/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");

        let (_, headers, _) = send(&app(), Method::GET, "/api/health", None).await;
        let generated = headers["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[tokio::test]
    async fn test_submit_with_invalid_update_is_rejected() {
        let app = app();
        let (_, _, body) = send(&app, Method::POST, "/api/sessions", None).await;
        let uri = format!("/api/sessions/{}", body["data"]["id"].as_str().unwrap());

        let (status, _, body) = send(
            &app,
            Method::POST,
            &format!("{}/submit", uri),
            Some(json!({ "ticker": "TSLA", "show_macd": "yes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/submit", uri))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (_, _, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["data"]["config"]["ticker"], "AAPL");
        assert_eq!(body["data"]["config"]["indicators"]["show_macd"], false);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let state = state();
        let app = build_router(state.clone());

        for _ in 0..5 {
            send(&app, Method::POST, "/api/sessions", None).await;
        }
        let (_, _, body) = send(&app, Method::POST, "/api/sessions", None).await;
        let uri = format!("/api/sessions/{}", body["data"]["id"].as_str().unwrap());
        assert_eq!(state.sessions.len(), 6);

        let idle = state.sessions.idle_ttl() + Duration::from_secs(1);
        assert_eq!(state.sessions.cleanup_at(Instant::now() + idle), 6);
        assert!(state.sessions.is_empty());

        let (status, _, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
