//! Local, deterministic status resolution. The model never decides status.

use crate::models::{PartialRecord, ReferenceRange, ResultRecord, ResultStatus};

/// `low` if `value < low`, `high` if `value > high`, otherwise `normal`.
/// Any missing input resolves to `normal`.
pub fn resolve_status(value: Option<f64>, range: &ReferenceRange) -> ResultStatus {
    match (value, range.low, range.high) {
        (Some(v), Some(low), Some(_)) if v < low => ResultStatus::Low,
        (Some(v), Some(_), Some(high)) if v > high => ResultStatus::High,
        _ => ResultStatus::Normal,
    }
}

/// Attach a computed status to every record, preserving order.
pub fn resolve_records(partials: Vec<PartialRecord>) -> Vec<ResultRecord> {
    partials
        .into_iter()
        .map(|partial| {
            if partial.value.is_none() || !partial.ref_range.is_complete() {
                tracing::warn!(
                    test = %partial.name,
                    has_value = partial.value.is_some(),
                    has_low = partial.ref_range.low.is_some(),
                    has_high = partial.ref_range.high.is_some(),
                    "Incomplete result data, status defaults to normal"
                );
            }
            let status = resolve_status(partial.value, &partial.ref_range);
            ResultRecord::from_partial(partial, status)
        })
        .collect()
}
