use crate::models::{ResultRecord, ResultStatus};
use crate::pipeline::summarize::SummaryDraft;

use super::keywords::scan_keywords;

/// Replace any flagged summary or explanation with deterministic wording
/// derived from the records. Clean text passes through unchanged.
pub fn filter_summary(draft: SummaryDraft, records: &[ResultRecord]) -> SummaryDraft {
    let violations = scan_keywords(&draft.summary);
    let summary = if violations.is_empty() {
        draft.summary
    } else {
        tracing::warn!(
            violations = violations.len(),
            first_reason = violations[0].reason,
            "Unsafe summary language, replacing with template"
        );
        template_summary(records)
    };

    let abnormal: Vec<&ResultRecord> = records.iter().filter(|r| r.status.is_abnormal()).collect();
    let explanations = draft
        .explanations
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let violations = scan_keywords(&text);
            if violations.is_empty() {
                return text;
            }
            tracing::warn!(
                index,
                violations = violations.len(),
                first_reason = violations[0].reason,
                "Unsafe explanation language, replacing with template"
            );
            abnormal
                .get(index)
                .map(|r| template_explanation(r))
                .unwrap_or_else(|| "This result is outside its reference range.".to_string())
        })
        .collect();

    SummaryDraft {
        summary,
        explanations,
    }
}

/// One sentence naming the abnormal results and their direction.
pub fn template_summary(records: &[ResultRecord]) -> String {
    if records.is_empty() {
        return "No test results were found in this report.".to_string();
    }

    let abnormal: Vec<String> = records
        .iter()
        .filter(|r| r.status.is_abnormal())
        .map(|r| format!("{} ({})", r.name, r.status))
        .collect();

    match abnormal.len() {
        0 => format!(
            "All {} of your results are within their reference ranges.",
            records.len()
        ),
        n => format!(
            "{n} of your {} results are outside their reference ranges: {}.",
            records.len(),
            abnormal.join(", ")
        ),
    }
}

pub fn template_explanation(record: &ResultRecord) -> String {
    let direction = match record.status {
        ResultStatus::High => "above",
        ResultStatus::Low => "below",
        ResultStatus::Normal => "within",
    };
    format!("{} is {direction} its reference range.", record.name)
}
