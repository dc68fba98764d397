//! Image upload handling and OCR text extraction

pub mod ocr;
pub mod upload;

pub use ocr::{extract_text, OcrAttempt, OcrAttemptReport, OcrEngine, OcrOutcome, TesseractOcr};
pub use upload::{secure_filename, stored_filename};
