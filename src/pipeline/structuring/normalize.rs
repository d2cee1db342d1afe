use serde_json::Value;

use super::model::StructuredModel;
use super::prompt::build_normalization_prompt;
use super::vocabulary::{canonical_test_name, implausibility};
use crate::models::PartialRecord;
use crate::pipeline::PipelineError;

/// Ask the model to turn each candidate line into a `PartialRecord`.
///
/// The record count is not checked here; the guardrail does that.
pub fn normalize_candidate_lines(
    model: &StructuredModel,
    lines: &[String],
) -> Result<Vec<PartialRecord>, PipelineError> {
    let prompt = build_normalization_prompt(lines);
    let response = model.invoke(&prompt)?;
    let records = partial_records_from_response(response)?;

    for record in &records {
        if let Some(finding) = implausibility(record) {
            tracing::warn!(test = %record.name, %finding, "Implausible lab value, possibly misread");
        }
    }

    Ok(records)
}

/// Accept a top-level array, or an object holding the array under `tests`.
/// Every element must be an object with a non-empty string `name`.
pub fn partial_records_from_response(response: Value) -> Result<Vec<PartialRecord>, PipelineError> {
    let items = match response {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("tests") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(PipelineError::ModelResponse(
                    "normalization output is not an array of records".into(),
                ))
            }
        },
        _ => {
            return Err(PipelineError::ModelResponse(
                "normalization output is not an array of records".into(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(PipelineError::ModelResponse(format!(
                    "record {index} is not an object"
                )));
            }
            let mut record: PartialRecord = serde_json::from_value(item).map_err(|e| {
                PipelineError::ModelResponse(format!("record {index} is malformed: {e}"))
            })?;
            record.name = canonical_test_name(&record.name);
            if record.name.is_empty() {
                return Err(PipelineError::ModelResponse(format!(
                    "record {index} has an empty name"
                )));
            }
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferenceRange;
    use crate::pipeline::structuring::ollama::MockLlmClient;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn normalizes_lines_into_records() {
        let model = StructuredModel::new(
            Arc::new(MockLlmClient::new(
                r#"[
                  {"name": "Hemoglobin", "value": 10.2, "unit": "g/dL", "ref_range": {"low": 12.0, "high": 16.0}},
                  {"name": "White Blood Cell Count", "value": 11200, "unit": "/uL", "ref_range": {"low": 4000, "high": 11000}}
                ]"#,
            )),
            "medgemma",
        );
        let lines = vec!["Hemoglobin 10.2 g/dL".to_string(), "WBC 11200/uL".to_string()];
        let records = normalize_candidate_lines(&model, &lines).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Hemoglobin");
        assert_eq!(records[0].ref_range, ReferenceRange::new(12.0, 16.0));
        assert_eq!(records[1].name, "WBC");
        assert_eq!(records[1].value, Some(11200.0));
    }

    #[test]
    fn accepts_object_wrapping_tests_array() {
        let records =
            partial_records_from_response(json!({"tests": [{"name": "TSH", "value": 2.1}]})).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "TSH");
    }

    #[test]
    fn empty_array_is_allowed() {
        assert!(partial_records_from_response(json!([])).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        let err = partial_records_from_response(json!({"name": "TSH"})).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
    }

    #[test]
    fn rejects_non_object_elements() {
        let err = partial_records_from_response(json!(["TSH 2.1"])).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(msg) if msg.contains("record 0")));
    }

    #[test]
    fn rejects_missing_or_blank_name() {
        let err = partial_records_from_response(json!([{"value": 1}])).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
        let err = partial_records_from_response(json!([{"name": "  "}])).unwrap_err();
        assert!(matches!(err, PipelineError::ModelResponse(_)));
    }

    #[test]
    fn model_status_never_survives() {
        let records = partial_records_from_response(json!([
            {"name": "WBC", "value": 3000, "unit": "/uL", "status": "normal",
             "ref_range": {"low": 4000, "high": 11000}}
        ]))
        .unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert!(json.get("status").is_none());
    }
}
