use crate::models::ResultRecord;

use super::PipelineError;

/// Extra records tolerated over the candidate-line count before a run is
/// treated as fabricated. Normalization may legitimately split one line
/// (e.g. a blood-pressure pair) into more than one record.
pub const GUARDRAIL_TOLERANCE: usize = 2;

/// Fail when `records > candidates + GUARDRAIL_TOLERANCE`.
pub fn check_fabrication(records: &[ResultRecord], candidates: &[String]) -> Result<(), PipelineError> {
    let (r, c) = (records.len(), candidates.len());
    if r > c + GUARDRAIL_TOLERANCE {
        tracing::warn!(records = r, candidates = c, "Record count exceeds candidate lines, rejecting");
        return Err(PipelineError::GuardrailViolation {
            records: r,
            candidates: c,
        });
    }
    Ok(())
}
