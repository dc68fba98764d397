//! docqa: OCR-backed question answering over uploaded document images
//!
//! Images are run through tesseract and the extracted text is kept per session.
//! Questions are answered by a deterministic pipeline: keyword classification,
//! regex extraction, and template rendering with line-matching fallbacks.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod server;
pub mod session;
pub mod types;

pub use analysis::{analyze, analyze_document_content, classify, literal_search, Analysis, Category};
pub use config::DocQaConfig;
pub use error::{Error, Result};
pub use server::DocQaServer;
