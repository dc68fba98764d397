//! Application state for the document Q&A server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::DocQaConfig;
use crate::error::{Error, Result};
use crate::ingestion::{OcrAttempt, OcrEngine, TesseractOcr};
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocQaConfig,
    /// Live sessions and their documents
    sessions: SessionStore,
    /// OCR engine used for uploads
    ocr_engine: Arc<dyn OcrEngine>,
    /// OCR attempts, in order
    ocr_attempts: Vec<OcrAttempt>,
    /// Set once the server is accepting connections
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state backed by tesseract
    pub fn new(config: DocQaConfig) -> Result<Self> {
        let tesseract = TesseractOcr::new(config.ocr.clone());
        if tesseract.is_available() {
            tracing::info!("tesseract found at '{}'", config.ocr.tesseract_path);
        } else {
            tracing::warn!(
                "tesseract not available at '{}'. Uploads will fail until it is installed (apt install tesseract-ocr)",
                config.ocr.tesseract_path
            );
        }
        Self::with_ocr_engine(config, Arc::new(tesseract))
    }

    /// Create application state with a specific OCR engine
    pub fn with_ocr_engine(config: DocQaConfig, ocr_engine: Arc<dyn OcrEngine>) -> Result<Self> {
        config.validate()?;

        std::fs::create_dir_all(&config.upload.upload_dir).map_err(|e| {
            Error::Config(format!(
                "Failed to create upload directory {}: {}",
                config.upload.upload_dir.display(),
                e
            ))
        })?;
        tracing::info!("Upload directory: {}", config.upload.upload_dir.display());

        let ocr_attempts = OcrAttempt::from_config(&config.ocr);
        tracing::info!(
            "OCR engine '{}' with {} attempts",
            ocr_engine.name(),
            ocr_attempts.len()
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions: SessionStore::new(),
                ocr_engine,
                ocr_attempts,
                ready: RwLock::new(false),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &DocQaConfig {
        &self.inner.config
    }

    /// Get session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get OCR engine
    pub fn ocr_engine(&self) -> Arc<dyn OcrEngine> {
        Arc::clone(&self.inner.ocr_engine)
    }

    /// Get OCR attempts
    pub fn ocr_attempts(&self) -> &[OcrAttempt] {
        &self.inner.ocr_attempts
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
