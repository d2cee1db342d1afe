use serde_json::Value;

use super::structuring::{build_summary_prompt, StructuredModel};
use super::PipelineError;
use crate::models::ResultRecord;

/// Model-written summary before the safety filter runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryDraft {
    pub summary: String,
    pub explanations: Vec<String>,
}

/// Ask the model for a one-sentence summary and one explanation per
/// abnormal record.
pub fn summarize(model: &StructuredModel, records: &[ResultRecord]) -> Result<SummaryDraft, PipelineError> {
    let prompt = build_summary_prompt(records);
    let response = model.invoke(&prompt)?;
    let draft = draft_from_response(&response)?;

    let abnormal = records.iter().filter(|r| r.status.is_abnormal()).count();
    if draft.explanations.len() != abnormal {
        tracing::warn!(
            explanations = draft.explanations.len(),
            abnormal,
            "Explanation count differs from abnormal result count"
        );
    }

    Ok(draft)
}

/// `summary` must be a string and `explanations` an array of strings.
pub fn draft_from_response(response: &Value) -> Result<SummaryDraft, PipelineError> {
    let summary = response
        .get("summary")
        .and_then(Value::as_str)
        .ok_or_else(|| PipelineError::ModelResponse("summary missing or not a string".into()))?;

    let explanations = response
        .get("explanations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PipelineError::ModelResponse("explanations missing or not an array".into())
        })?
        .iter()
        .map(|e| {
            e.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                PipelineError::ModelResponse("explanation is not a string".into())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SummaryDraft {
        summary: summary.trim().to_string(),
        explanations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReferenceRange, ResultStatus};
    use crate::pipeline::structuring::MockLlmClient;
    use serde_json::json;
    use std::sync::Arc;

    fn records() -> Vec<ResultRecord> {
        vec![ResultRecord {
            name: "WBC".into(),
            value: Some(11200.0),
            unit: "/uL".into(),
            ref_range: ReferenceRange::new(4000.0, 11000.0),
            status: ResultStatus::High,
        }]
    }

    #[test]
    fn parses_summary_and_explanations() {
        let model = StructuredModel::new(
            Arc::new(MockLlmClient::new(
                r#"{"summary": "Your WBC is slightly high.", "explanations": ["High WBC can occur with infections."]}"#,
            )),
            "medgemma",
        );
        let draft = summarize(&model, &records()).unwrap();
        assert_eq!(draft.summary, "Your WBC is slightly high.");
        assert_eq!(draft.explanations, vec!["High WBC can occur with infections."]);
    }

    #[test]
    fn count_mismatch_is_not_an_error() {
        let model = StructuredModel::new(
            Arc::new(MockLlmClient::new(r#"{"summary": "ok", "explanations": []}"#)),
            "medgemma",
        );
        let draft = summarize(&model, &records()).unwrap();
        assert!(draft.explanations.is_empty());
    }

    #[test]
    fn missing_summary_rejected() {
        let err = draft_from_response(&json!({"explanations": []})).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
    }

    #[test]
    fn ill_typed_fields_rejected() {
        let err = draft_from_response(&json!({"summary": 3, "explanations": []})).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
        let err = draft_from_response(&json!({"summary": "s", "explanations": "e"})).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
        let err = draft_from_response(&json!({"summary": "s", "explanations": [1]})).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
    }

    #[test]
    fn array_response_rejected() {
        let err = draft_from_response(&json!([{"summary": "s"}])).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
    }
}
