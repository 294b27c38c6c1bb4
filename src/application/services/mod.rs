//! Application services - Use case implementations
//!
//! Each service receives its ports at construction and is built once in
//! `AppState::new`.

pub mod document_processor;
pub mod extraction_service;
pub mod persistence_service;
pub mod record_mapper;
pub mod review_service;
pub mod saved_data_service;
pub mod upload_service;

#[cfg(test)]
pub mod test_support;

pub use extraction_service::{ExtractionError, ExtractionService, SAMPLE_CONTENT};
pub use persistence_service::{
    ChapterStoryResolver, PersistenceService, PersistenceServiceImpl, SaveError, SaveOptions,
    SaveResult,
};
pub use review_service::{
    ApprovalOutcome, ReviewError, ReviewItem, ReviewService, ReviewSession, WizardStep,
};
pub use saved_data_service::{SavedData, SavedDataError, SavedDataService};
pub use upload_service::{
    UploadError, UploadLimits, UploadOutcome, UploadRequest, UploadService, UploadServiceImpl,
};
