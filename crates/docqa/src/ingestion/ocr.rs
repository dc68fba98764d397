//! Text extraction from document images via tesseract
//!
//! Extraction walks an ordered list of attempts (one per page segmentation mode)
//! and keeps the first one that yields enough text. Every failed attempt is
//! logged and recorded in the outcome.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// One OCR invocation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrAttempt {
    /// OCR engine mode (`--oem`)
    pub engine_mode: u8,
    /// Page segmentation mode (`--psm`)
    pub page_segmentation_mode: u8,
}

impl OcrAttempt {
    /// Attempts in the order configured
    pub fn from_config(config: &OcrConfig) -> Vec<Self> {
        config
            .page_segmentation_modes
            .iter()
            .map(|&psm| Self {
                engine_mode: config.engine_mode,
                page_segmentation_mode: psm,
            })
            .collect()
    }

    /// Short label for logs, e.g. `oem3/psm6`
    pub fn label(&self) -> String {
        format!("oem{}/psm{}", self.engine_mode, self.page_segmentation_mode)
    }
}

/// Something that can read text out of an image file
pub trait OcrEngine: Send + Sync {
    /// Run a single recognition attempt
    fn recognize(&self, image: &Path, attempt: &OcrAttempt) -> Result<String>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Record of a single attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrAttemptReport {
    pub attempt: String,
    pub success: bool,
    pub error: Option<String>,
    pub chars_extracted: Option<usize>,
    pub duration_ms: u64,
}

/// Result of walking the attempt list
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    /// Trimmed text from the first successful attempt, if any
    pub text: Option<String>,
    pub attempts: Vec<OcrAttemptReport>,
}

/// Try each attempt in order and keep the first whose trimmed output is longer
/// than `min_chars`.
///
/// Returns `Ok` with `text: None` when the engine ran but never produced enough
/// text, and an error only when every attempt failed outright.
pub fn extract_text(
    engine: &dyn OcrEngine,
    image: &Path,
    attempts: &[OcrAttempt],
    min_chars: usize,
    filename: &str,
) -> Result<OcrOutcome> {
    let start = Instant::now();
    let mut reports = Vec::with_capacity(attempts.len());

    for attempt in attempts {
        let attempt_start = Instant::now();
        let result = engine.recognize(image, attempt);
        let duration_ms = attempt_start.elapsed().as_millis() as u64;

        match result {
            Ok(text) => {
                let trimmed = text.trim();
                let chars = trimmed.chars().count();
                if chars > min_chars {
                    reports.push(OcrAttemptReport {
                        attempt: attempt.label(),
                        success: true,
                        error: None,
                        chars_extracted: Some(chars),
                        duration_ms,
                    });
                    tracing::info!(
                        "[{}] {} '{}' extracted {} chars in {}ms",
                        filename,
                        engine.name(),
                        attempt.label(),
                        chars,
                        start.elapsed().as_millis()
                    );
                    return Ok(OcrOutcome {
                        text: Some(trimmed.to_string()),
                        attempts: reports,
                    });
                }

                tracing::debug!(
                    "[{}] '{}' returned {} chars (need more than {})",
                    filename,
                    attempt.label(),
                    chars,
                    min_chars
                );
                reports.push(OcrAttemptReport {
                    attempt: attempt.label(),
                    success: false,
                    error: Some("Too little text".to_string()),
                    chars_extracted: Some(chars),
                    duration_ms,
                });
            }
            Err(e) => {
                tracing::warn!("[{}] '{}' failed: {}", filename, attempt.label(), e);
                reports.push(OcrAttemptReport {
                    attempt: attempt.label(),
                    success: false,
                    error: Some(e.to_string()),
                    chars_extracted: None,
                    duration_ms,
                });
            }
        }
    }

    let all_errored = !reports.is_empty() && reports.iter().all(|r| r.chars_extracted.is_none());
    if all_errored {
        let details = reports
            .iter()
            .map(|r| format!("{}: {}", r.attempt, r.error.as_deref().unwrap_or("unknown error")))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::ocr(filename, details));
    }

    tracing::warn!(
        "[{}] No usable text after {} OCR attempts",
        filename,
        reports.len()
    );
    Ok(OcrOutcome {
        text: None,
        attempts: reports,
    })
}

/// OCR engine backed by the `tesseract` command line tool
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Check that the binary can be executed
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.tesseract_path)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path, attempt: &OcrAttempt) -> Result<String> {
        let output = Command::new(&self.config.tesseract_path)
            .arg(image)
            .arg("stdout")
            .args(["-l", self.config.language.as_str()])
            .arg("--oem")
            .arg(attempt.engine_mode.to_string())
            .arg("--psm")
            .arg(attempt.page_segmentation_mode.to_string())
            .output()
            .map_err(|e| Error::Internal(format!("tesseract failed to start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Internal(format!("tesseract error: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
