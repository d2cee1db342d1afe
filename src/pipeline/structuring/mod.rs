pub mod types;
pub mod ollama;
pub mod model;
pub mod sanitize;
pub mod prompt;
pub mod vocabulary;
pub mod extract;
pub mod normalize;

pub use types::*;
pub use ollama::*;
pub use model::*;
pub use sanitize::*;
pub use prompt::*;
pub use vocabulary::*;
pub use extract::*;
pub use normalize::*;

use thiserror::Error;

/// Transport-level failures of the generative model capability.
/// Content-level failures (unparseable or incomplete output) are
/// reported as `PipelineError::ModelResponse` instead.
#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("No compatible model available")]
    NoModelAvailable,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}
