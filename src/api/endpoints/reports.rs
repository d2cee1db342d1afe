//! `POST /api/reports/simplify`

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, SimplifyResponse, SimplifyTextRequest};
use crate::pipeline::acquisition::{ReportInput, MISSING_INPUT_MESSAGE};

/// Multipart field carrying the report image.
pub const IMAGE_FIELD: &str = "reportImage";
/// Multipart field (or JSON key) carrying report text.
pub const TEXT_FIELD: &str = "text";

/// Accepts a multipart upload (`reportImage`, optional `text`) or a JSON
/// `{ "text": ... }` body. The pipeline runs on a blocking worker thread.
pub async fn simplify(
    State(ctx): State<ApiContext>,
    request: Request,
) -> Result<Json<SimplifyResponse>, ApiError> {
    let (image, text) = read_report_parts(&ctx, request).await?;
    let input = ReportInput::from_parts(image, text)?;

    let simplifier = Arc::clone(&ctx.simplifier);
    let report = tokio::task::spawn_blocking(move || simplifier.simplify(input))
        .await
        .map_err(|e| ApiError::Internal(format!("Pipeline task failed: {e}")))??;

    Ok(Json(SimplifyResponse {
        status: "success",
        report,
    }))
}

type ReportParts = (Option<Vec<u8>>, Option<String>);

async fn read_report_parts(ctx: &ApiContext, request: Request) -> Result<ReportParts, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, ctx)
            .await
            .map_err(|e| unreadable(&e.body_text()))?;
        read_multipart(multipart).await
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<SimplifyTextRequest>::from_request(request, ctx)
            .await
            .map_err(|e| unreadable(&e.body_text()))?;
        Ok((None, body.text))
    } else {
        Ok((None, None))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<ReportParts, ApiError> {
    let mut image = None;
    let mut text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| unreadable(&e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let bytes = field.bytes().await.map_err(|e| unreadable(&e.body_text()))?;
                image = Some(bytes.to_vec());
            }
            Some(TEXT_FIELD) => {
                text = Some(field.text().await.map_err(|e| unreadable(&e.body_text()))?);
            }
            _ => {}
        }
    }

    Ok((image, text))
}

fn unreadable(detail: &str) -> ApiError {
    tracing::warn!(detail, "Unreadable request body");
    ApiError::BadRequest(format!("Could not read the request body. {MISSING_INPUT_MESSAGE}"))
}
