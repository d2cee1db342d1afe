//! Image-to-text through an Ollama vision model.
//!
//! The model stays loaded while a worker is alive; terminating the worker
//! asks Ollama to unload it (`keep_alive: 0`) unless the same model also
//! serves the text stages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use base64::Engine as _;

use super::types::{OcrPageResult, OcrWorker, OcrWorkerFactory};
use super::OcrError;
use crate::pipeline::safety::sanitize_llm_output;
use crate::pipeline::structuring::VisionClient;

const OCR_SYSTEM_PROMPT: &str = "\
You are a medical document text extractor. Transcribe ALL visible text \
from the provided lab report image exactly as written. Do not summarize, \
interpret or add anything.";

const OCR_USER_PROMPT: &str = "\
Extract all visible text from this lab report image. Keep each test result \
(name, value, unit, reference range) on its own line, in reading order.";

pub struct OllamaVisionOcrFactory {
    client: Arc<dyn VisionClient>,
    model_name: String,
    unload_on_release: bool,
}

impl OllamaVisionOcrFactory {
    /// `unload_on_release` must be false when the vision model is also the
    /// text model, or every image request evicts it mid-pipeline.
    pub fn new(client: Arc<dyn VisionClient>, model_name: &str, unload_on_release: bool) -> Self {
        Self {
            client,
            model_name: model_name.to_string(),
            unload_on_release,
        }
    }
}

impl OcrWorkerFactory for OllamaVisionOcrFactory {
    fn create_worker(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        Ok(Box::new(OllamaVisionOcrWorker {
            client: Arc::clone(&self.client),
            model_name: self.model_name.clone(),
            unload_on_release: self.unload_on_release,
            terminated: false,
        }))
    }
}

pub struct OllamaVisionOcrWorker {
    client: Arc<dyn VisionClient>,
    model_name: String,
    unload_on_release: bool,
    terminated: bool,
}

impl OcrWorker for OllamaVisionOcrWorker {
    fn recognize(&mut self, image: &[u8]) -> Result<OcrPageResult, OcrError> {
        let _span = tracing::info_span!(
            "vision_ocr",
            model = %self.model_name,
            image_size = image.len(),
        )
        .entered();
        let start = std::time::Instant::now();

        let images = vec![base64::engine::general_purpose::STANDARD.encode(image)];
        let raw = self
            .client
            .chat_with_images(&self.model_name, OCR_USER_PROMPT, &images, Some(OCR_SYSTEM_PROMPT))
            .map_err(|e| OcrError::Processing(format!("Vision OCR failed: {e}")))?;

        let text = sanitize_llm_output(&raw);
        let confidence = heuristic_confidence(&text);

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            text_len = text.len(),
            confidence,
            "Vision OCR complete"
        );

        Ok(OcrPageResult { text, confidence })
    }

    fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        if !self.unload_on_release {
            tracing::debug!(model = %self.model_name, "Vision model shared, keeping it loaded");
            return;
        }
        if let Err(e) = self.client.unload_model(&self.model_name) {
            tracing::warn!(model = %self.model_name, error = %e, "Failed to unload vision model");
        }
    }
}

/// Vision models give no per-word confidence; estimate from output length.
fn heuristic_confidence(text: &str) -> f32 {
    match text.len() {
        0 => 0.0,
        1..=49 => 0.2,
        50..=199 => 0.4,
        200..=499 => 0.6,
        _ => 0.8,
    }
}

/// Test double that returns fixed text (or a failure) and counts worker
/// creation and termination.
pub struct MockOcrFactory {
    outcome: Result<String, String>,
    created: Arc<AtomicUsize>,
    terminated: Arc<AtomicUsize>,
}

impl MockOcrFactory {
    pub fn with_text(text: &str) -> Self {
        Self::new(Ok(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    fn new(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            created: Arc::new(AtomicUsize::new(0)),
            terminated: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn terminated(&self) -> usize {
        self.terminated.load(Ordering::SeqCst)
    }
}

impl OcrWorkerFactory for MockOcrFactory {
    fn create_worker(&self) -> Result<Box<dyn OcrWorker>, OcrError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockOcrWorker {
            outcome: self.outcome.clone(),
            terminated: Arc::clone(&self.terminated),
            done: false,
        }))
    }
}

struct MockOcrWorker {
    outcome: Result<String, String>,
    terminated: Arc<AtomicUsize>,
    done: bool,
}

impl OcrWorker for MockOcrWorker {
    fn recognize(&mut self, _image: &[u8]) -> Result<OcrPageResult, OcrError> {
        match &self.outcome {
            Ok(text) => Ok(OcrPageResult {
                text: text.clone(),
                confidence: heuristic_confidence(text),
            }),
            Err(message) => Err(OcrError::Processing(message.clone())),
        }
    }

    fn terminate(&mut self) {
        if !self.done {
            self.done = true;
            self.terminated.fetch_add(1, Ordering::SeqCst);
        }
    }
}
