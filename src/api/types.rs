use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::SimplifiedReport;
use crate::pipeline::processor::ReportSimplifier;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub simplifier: Arc<ReportSimplifier>,
    pub max_upload_bytes: usize,
}

impl ApiContext {
    pub fn new(simplifier: Arc<ReportSimplifier>, max_upload_bytes: usize) -> Self {
        Self {
            simplifier,
            max_upload_bytes,
        }
    }
}

/// JSON request body for text submissions.
#[derive(Debug, Deserialize)]
pub struct SimplifyTextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SimplifyResponse {
    pub status: &'static str,
    pub report: SimplifiedReport,
}
