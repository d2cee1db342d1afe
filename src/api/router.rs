//! API router. Returns a composable `Router` with every route under `/api/`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let max_upload_bytes = ctx.max_upload_bytes;

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/reports/simplify", post(endpoints::reports::simplify))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::pipeline::acquisition::MockOcrFactory;
    use crate::pipeline::processor::ReportSimplifier;
    use crate::pipeline::structuring::{LlmClient, ScriptedLlmClient, StructuredModel, StructuringError};

    const BOUNDARY: &str = "medreport-test-boundary";

    const EXTRACT_TWO: &str = r#"{"tests_raw": ["Hemoglobin 10.2 g/dL (12.0-16.0)", "WBC 11200/uL (4000-11000)"]}"#;
    const NORMALIZE_TWO: &str = r#"[
        {"name": "Hemoglobin", "value": 10.2, "unit": "g/dL", "ref_range": {"low": 12.0, "high": 16.0}},
        {"name": "White Blood Cell Count", "value": 11200, "unit": "/uL", "ref_range": {"low": 4000, "high": 11000}}
    ]"#;
    const SUMMARY_TWO: &str = r#"{"summary": "Your hemoglobin is a little low and your WBC is a little high.",
        "explanations": ["Low hemoglobin means fewer oxygen-carrying cells.", "High WBC can occur with infections."]}"#;

    fn app_with(responses: &[&str], ocr_text: &str) -> (Router, Arc<ScriptedLlmClient>, Arc<MockOcrFactory>) {
        let llm = Arc::new(ScriptedLlmClient::new(responses.iter().copied()));
        let ocr = Arc::new(MockOcrFactory::with_text(ocr_text));
        let simplifier = ReportSimplifier::new(StructuredModel::new(llm.clone(), "medgemma"), ocr.clone());
        let app = api_router(ApiContext::new(Arc::new(simplifier), 1024 * 1024));
        (app, llm, ocr)
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/reports/simplify")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(image: Option<&[u8]>, text: Option<&str>) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"reportImage\"; filename=\"report.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(text) = text {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\n{text}\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/reports/simplify")
            .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_returns_version() {
        let (app, _, _) = app_with(&[], "");
        let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn json_text_returns_report() {
        let (app, llm, _) = app_with(&[EXTRACT_TWO, NORMALIZE_TWO, SUMMARY_TWO], "");
        let body = serde_json::json!({"text": "Hemoglobin 10.2 g/dL (Low)\nWBC 11200/uL (High)"});
        let response = app.oneshot(json_request(&body.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        let tests = json["report"]["tests"].as_array().unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0]["status"], "low");
        assert_eq!(tests[1]["name"], "WBC");
        assert_eq!(tests[1]["status"], "high");
        assert_eq!(json["report"]["explanations"].as_array().unwrap().len(), 2);
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn multipart_text_field_accepted() {
        let (app, _, ocr) = app_with(&[EXTRACT_TWO, NORMALIZE_TWO, SUMMARY_TWO], "");
        let response = app
            .oneshot(multipart_request(None, Some("Hemoglobin 10.2 g/dL\nWBC 11200/uL")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ocr.created(), 0);
    }

    #[tokio::test]
    async fn multipart_image_goes_through_ocr() {
        let (app, _, ocr) = app_with(
            &[EXTRACT_TWO, NORMALIZE_TWO, SUMMARY_TWO],
            "Hemoglobin 10.2 g/dL\nWBC 11200/uL",
        );
        let response = app
            .oneshot(multipart_request(Some(&[0x89, 0x50, 0x4E, 0x47]), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ocr.created(), 1);
        assert_eq!(ocr.terminated(), 1);
    }

    #[tokio::test]
    async fn no_input_returns_400_with_guidance() {
        let (app, llm, _) = app_with(&[], "");
        let response = app.oneshot(multipart_request(None, Some("  \n"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("reportImage"));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_json_and_missing_body_return_400() {
        let (app, _, _) = app_with(&[], "");
        let response = app.clone().oneshot(json_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .method("POST")
            .uri("/api/reports/simplify")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_returns_400() {
        let (app, _, _) = app_with(&[], "");
        let response = app.oneshot(json_request("{\"text\": ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["message"].as_str().unwrap().starts_with("Could not read"));
    }

    #[tokio::test]
    async fn guardrail_violation_returns_generic_500() {
        let normalize_five = r#"[{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}, {"name": "E"}]"#;
        let (app, _, _) = app_with(&[r#"{"tests_raw": ["Glucose 5.1 mmol/L"]}"#, normalize_five], "");
        let response = app
            .oneshot(json_request(r#"{"text": "Glucose 5.1 mmol/L"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn blank_image_returns_500_and_releases_worker() {
        let (app, llm, ocr) = app_with(&[EXTRACT_TWO], "");
        let response = app
            .oneshot(multipart_request(Some(&[0xFF, 0xD8, 0xFF]), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(llm.call_count(), 0);
        assert_eq!(ocr.terminated(), 1);
    }

    struct PanickingLlm;

    impl LlmClient for PanickingLlm {
        fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, StructuringError> {
            panic!("model backend crashed");
        }

        fn list_models(&self) -> Result<Vec<String>, StructuringError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn pipeline_panic_returns_generic_500() {
        let ocr = Arc::new(MockOcrFactory::with_text(""));
        let simplifier = ReportSimplifier::new(StructuredModel::new(Arc::new(PanickingLlm), "medgemma"), ocr);
        let app = api_router(ApiContext::new(Arc::new(simplifier), 1024 * 1024));

        let response = app
            .oneshot(json_request(r#"{"text": "Glucose 5.1 mmol/L"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn cors_headers_present() {
        let (app, _, _) = app_with(&[], "");
        let req = Request::builder()
            .uri("/api/health")
            .header("Origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
