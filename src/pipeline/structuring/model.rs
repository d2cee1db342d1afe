//! Generative-model capability: prompt in, JSON value out.

use std::sync::Arc;

use serde_json::Value;

use super::prompt::REPORT_SYSTEM_PROMPT;
use super::types::LlmClient;
use crate::pipeline::safety::sanitize_llm_output;
use crate::pipeline::PipelineError;

/// Wraps an `LlmClient` and a model name. Shared across requests; every
/// call is independent.
#[derive(Clone)]
pub struct StructuredModel {
    llm: Arc<dyn LlmClient>,
    model_name: String,
}

impl StructuredModel {
    pub fn new(llm: Arc<dyn LlmClient>, model_name: &str) -> Self {
        Self {
            llm,
            model_name: model_name.to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Send `prompt` and parse the reply as a JSON object or array.
    ///
    /// Transport failures surface as `PipelineError::Model`; a reply that is
    /// not structured data surfaces as `PipelineError::ModelResponse`.
    pub fn invoke(&self, prompt: &str) -> Result<Value, PipelineError> {
        let start = std::time::Instant::now();
        let raw = self
            .llm
            .generate(&self.model_name, prompt, REPORT_SYSTEM_PROMPT)?;

        tracing::debug!(
            model = %self.model_name,
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = raw.len(),
            "Model call complete"
        );

        parse_structured_response(&raw)
    }
}

/// Strip model artifacts and code fences, then parse as JSON.
///
/// If the cleaned text still fails to parse, the outermost `{...}` or
/// `[...]` span is tried once before giving up.
pub fn parse_structured_response(raw: &str) -> Result<Value, PipelineError> {
    let cleaned = strip_code_fences(&sanitize_llm_output(raw));
    if cleaned.is_empty() {
        return Err(PipelineError::ModelResponse("empty model response".into()));
    }

    let parsed = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(first_err) => outermost_json_span(&cleaned)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| PipelineError::ModelResponse(first_err.to_string()))?,
    };

    if parsed.is_object() || parsed.is_array() {
        Ok(parsed)
    } else {
        Err(PipelineError::ModelResponse(
            "model response is not a JSON object or array".into(),
        ))
    }
}

/// Remove every ```` ```json ```` / ```` ``` ```` marker and trim.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        // Drop a language tag directly after the opening fence.
        let tag_len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_alphanumeric())
            .count();
        if rest[..tag_len].eq_ignore_ascii_case("json") {
            rest = &rest[tag_len..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn outermost_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
