//! Request and response types for the HTTP API

pub mod request;
pub mod response;

pub use request::{AskRequest, DeleteFileRequest, SearchRequest};
pub use response::{
    AskResponse, DocumentListResponse, DocumentSummary, SearchResponse, SessionResponse,
    SuccessResponse, UploadResponse, UploadResult,
};
