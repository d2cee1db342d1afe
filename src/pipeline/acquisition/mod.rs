//! Input acquisition: turns an uploaded image or submitted text into raw
//! report text. Images go through an `OcrWorker` that is always released.

pub mod types;
pub mod input;
pub mod vision_ocr;

pub use types::*;
pub use input::*;
pub use vision_ocr::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR worker initialization failed: {0}")]
    WorkerInit(String),

    #[error("OCR processing failed: {0}")]
    Processing(String),

    #[error("No text detected in image")]
    NoTextDetected,
}
