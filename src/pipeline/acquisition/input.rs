use super::types::{OcrWorker, OcrWorkerFactory};
use super::OcrError;
use crate::pipeline::PipelineError;

/// Guidance returned to callers that send nothing usable.
pub const MISSING_INPUT_MESSAGE: &str =
    "No report provided. Upload an image as 'reportImage' or send the report text as 'text'.";

/// Exactly one source per run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportInput {
    Image(Vec<u8>),
    Text(String),
}

impl ReportInput {
    /// Pick the source from what the caller sent. An image wins over text;
    /// empty bytes and blank text count as absent.
    pub fn from_parts(image: Option<Vec<u8>>, text: Option<String>) -> Result<Self, PipelineError> {
        if let Some(bytes) = image.filter(|b| !b.is_empty()) {
            if text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
                tracing::debug!("Both image and text supplied, ignoring text");
            }
            return Ok(Self::Image(bytes));
        }
        match text {
            Some(t) if !t.trim().is_empty() => Ok(Self::Text(t)),
            _ => Err(PipelineError::Input(MISSING_INPUT_MESSAGE.into())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
        }
    }
}

/// Owns a worker for one recognition and terminates it on drop, so the
/// worker is released on every exit path.
pub struct ScopedOcrWorker {
    worker: Box<dyn OcrWorker>,
}

impl ScopedOcrWorker {
    pub fn create(factory: &dyn OcrWorkerFactory) -> Result<Self, OcrError> {
        Ok(Self {
            worker: factory.create_worker()?,
        })
    }

    pub fn recognize(&mut self, image: &[u8]) -> Result<String, OcrError> {
        let page = self.worker.recognize(image)?;
        if page.text.trim().is_empty() {
            return Err(OcrError::NoTextDetected);
        }
        tracing::info!(
            text_len = page.text.len(),
            confidence = page.confidence,
            "Image text recognized"
        );
        Ok(page.text)
    }
}

impl Drop for ScopedOcrWorker {
    fn drop(&mut self) {
        self.worker.terminate();
    }
}

/// Produce raw report text. Text input passes through untouched.
pub fn acquire_text(input: ReportInput, ocr: &dyn OcrWorkerFactory) -> Result<String, PipelineError> {
    match input {
        ReportInput::Text(text) => Ok(text),
        ReportInput::Image(bytes) => {
            let mut worker = ScopedOcrWorker::create(ocr)?;
            Ok(worker.recognize(&bytes)?)
        }
    }
}
