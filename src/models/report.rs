use serde::{Deserialize, Serialize};

use super::lab::ResultRecord;

/// Patient-facing output of one simplification run. Returned to the
/// caller and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedReport {
    pub tests: Vec<ResultRecord>,
    pub summary: String,
    pub explanations: Vec<String>,
}

impl SimplifiedReport {
    /// Pure composition of the pipeline outputs.
    pub fn assemble(tests: Vec<ResultRecord>, summary: String, explanations: Vec<String>) -> Self {
        Self {
            tests,
            summary,
            explanations,
        }
    }

    pub fn abnormal_count(&self) -> usize {
        self.tests.iter().filter(|t| t.status.is_abnormal()).count()
    }
}
