use super::OcrError;

/// Text recognized from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPageResult {
    pub text: String,
    /// Heuristic 0.0..=1.0; engines without real scores estimate it.
    pub confidence: f32,
}

/// Creates one OCR worker per image. Shared by every request.
pub trait OcrWorkerFactory: Send + Sync {
    fn create_worker(&self) -> Result<Box<dyn OcrWorker>, OcrError>;
}

/// A single-use image-to-text worker holding engine resources until
/// `terminate` is called.
pub trait OcrWorker: Send {
    fn recognize(&mut self, image: &[u8]) -> Result<OcrPageResult, OcrError>;

    /// Release engine resources. Must tolerate being called more than once.
    fn terminate(&mut self);
}
