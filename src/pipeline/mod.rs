pub mod acquisition;
pub mod structuring;
pub mod safety;
pub mod status;
pub mod guardrail;
pub mod summarize;
pub mod processor;

use thiserror::Error;

use acquisition::OcrError;
use structuring::StructuringError;

/// Every way a simplification run can fail. Any variant aborts the run;
/// nothing is retried and no partial report is produced.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Caller supplied nothing usable. The only client-facing class.
    #[error("Invalid input: {0}")]
    Input(String),

    /// Image-to-text produced no text or failed.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Model reply was not the structured data the stage asked for.
    #[error("Model response could not be parsed: {0}")]
    ModelResponse(String),

    #[error("Model found no test result lines in the report")]
    ModelOutputEmpty,

    /// More records came back than candidate lines allow.
    #[error("Guardrail violation: {records} records from {candidates} candidate lines")]
    GuardrailViolation { records: usize, candidates: usize },

    #[error("Model call failed: {0}")]
    Model(#[from] StructuringError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl From<OcrError> for PipelineError {
    fn from(e: OcrError) -> Self {
        Self::Extraction(e.to_string())
    }
}
