use serde_json::Value;

use super::model::StructuredModel;
use super::prompt::{build_extraction_prompt, CANDIDATE_LINES_KEY};
use crate::pipeline::PipelineError;

/// Ask the model to split raw report text into candidate result lines.
///
/// Returns at least one non-blank line, in document order.
pub fn extract_candidate_lines(
    model: &StructuredModel,
    raw_text: &str,
) -> Result<Vec<String>, PipelineError> {
    let prompt = build_extraction_prompt(raw_text);
    let response = model.invoke(&prompt)?;
    candidate_lines_from_response(&response)
}

/// Read the `tests_raw` array. A missing key, a non-array, a non-string
/// element or an empty result all count as no output.
pub fn candidate_lines_from_response(response: &Value) -> Result<Vec<String>, PipelineError> {
    let items = response
        .get(CANDIDATE_LINES_KEY)
        .and_then(Value::as_array)
        .ok_or(PipelineError::ModelOutputEmpty)?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let line = item.as_str().ok_or(PipelineError::ModelOutputEmpty)?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    if lines.is_empty() {
        return Err(PipelineError::ModelOutputEmpty);
    }
    Ok(lines)
}
