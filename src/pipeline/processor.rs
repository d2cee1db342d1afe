//! Report simplification orchestrator.
//!
//! Drives one run end to end:
//! acquire → sanitize → extract → normalize → status → guardrail →
//! summarize → safety filter → assemble.
//!
//! Capabilities are injected (`LlmClient` behind `StructuredModel`,
//! `OcrWorkerFactory`) so every path runs against test doubles.

use std::sync::Arc;

use uuid::Uuid;

use super::acquisition::{acquire_text, OcrWorkerFactory, OllamaVisionOcrFactory, ReportInput};
use super::guardrail::check_fabrication;
use super::safety::filter_summary;
use super::status::resolve_records;
use super::structuring::{
    extract_candidate_lines, normalize_candidate_lines, sanitize_report_text, OllamaClient,
    StructuredModel, StructuringError,
};
use super::summarize::summarize;
use super::PipelineError;
use crate::config::AppConfig;
use crate::models::SimplifiedReport;

pub struct ReportSimplifier {
    model: StructuredModel,
    ocr: Arc<dyn OcrWorkerFactory>,
}

impl ReportSimplifier {
    pub fn new(model: StructuredModel, ocr: Arc<dyn OcrWorkerFactory>) -> Self {
        Self { model, ocr }
    }

    /// Run the full pipeline. Blocking: call from a worker thread.
    pub fn simplify(&self, input: ReportInput) -> Result<SimplifiedReport, PipelineError> {
        let report_id = Uuid::new_v4().to_string();
        let _span = tracing::info_span!("simplify_report", report_id = %report_id).entered();
        let start = std::time::Instant::now();

        let from_image = matches!(input, ReportInput::Image(_));
        tracing::info!(source = input.kind(), "Simplification started");

        let raw_text = acquire_text(input, self.ocr.as_ref())?;

        let sanitized = sanitize_report_text(&raw_text, &report_id);
        if sanitized.text.is_empty() {
            // Caller text is the caller's fault; unusable OCR output is not.
            return Err(if from_image {
                PipelineError::Extraction("image yielded no usable text after cleaning".into())
            } else {
                PipelineError::Input("The report contains no readable text after cleaning.".into())
            });
        }

        let candidates = extract_candidate_lines(&self.model, &sanitized.text)?;
        tracing::info!(candidates = candidates.len(), "Candidate lines extracted");

        let partials = normalize_candidate_lines(&self.model, &candidates)?;
        let records = resolve_records(partials);
        tracing::info!(records = records.len(), "Records normalized");

        check_fabrication(&records, &candidates)?;

        let draft = summarize(&self.model, &records)?;
        let draft = filter_summary(draft, &records);

        let report = SimplifiedReport::assemble(records, draft.summary, draft.explanations);

        tracing::info!(
            tests = report.tests.len(),
            abnormal = report.abnormal_count(),
            elapsed_ms = %start.elapsed().as_millis(),
            "Simplification complete"
        );

        Ok(report)
    }
}

/// Wire the production simplifier to Ollama.
///
/// Builds blocking HTTP clients: call before entering the async runtime.
pub fn build_simplifier(config: &AppConfig) -> Result<ReportSimplifier, StructuringError> {
    let client = Arc::new(OllamaClient::new(&config.ollama_url, config.llm_timeout_secs)?);

    if let Err(e) = client.ensure_model(&config.llm_model) {
        tracing::warn!(
            model = %config.llm_model,
            url = %client.base_url(),
            error = %e,
            "Model not available yet; requests will fail until it is pulled"
        );
    }

    let model = StructuredModel::new(client.clone(), &config.llm_model);
    let ocr = Arc::new(OllamaVisionOcrFactory::new(
        client,
        &config.vision_model,
        config.unload_vision_after_ocr(),
    ));
    Ok(ReportSimplifier::new(model, ocr))
}
