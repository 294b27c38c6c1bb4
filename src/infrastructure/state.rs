//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::{ObjectStoragePort, Repositories};
use crate::application::services::{
    ChapterStoryResolver, ExtractionService, PersistenceService, PersistenceServiceImpl,
    ReviewService, SavedDataService, UploadLimits, UploadService, UploadServiceImpl,
};
use crate::infrastructure::config::{AppConfig, DOCUMENTS_BUCKET};
use crate::infrastructure::persistence::SqliteRepository;
use crate::infrastructure::storage::LocalObjectStorage;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    // Application services
    pub extraction_service: Arc<ExtractionService>,
    pub persistence_service: Arc<dyn PersistenceService>,
    pub review_service: ReviewService,
    pub upload_service: Arc<dyn UploadService>,
    pub saved_data_service: SavedDataService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Initialize SQLite repository and schema
        let repository = SqliteRepository::connect(&config.database_url).await?;

        // Initialize object storage
        let storage = Arc::new(LocalObjectStorage::new(&config.storage_root, DOCUMENTS_BUCKET));

        Ok(Self::with_adapters(config, repository.repositories(), storage))
    }

    /// Wire the application services on top of already constructed adapters
    pub fn with_adapters(
        config: AppConfig,
        repositories: Repositories,
        storage: Arc<dyn ObjectStoragePort>,
    ) -> Self {
        let extraction_service = Arc::new(ExtractionService::new(config.extraction_delay));
        // Saved and uploaded chapters share one placeholder story per user
        let chapter_stories = Arc::new(ChapterStoryResolver::new(
            repositories.stories.clone(),
            config.chapter_story_policy,
        ));
        let persistence_service: Arc<dyn PersistenceService> = Arc::new(
            PersistenceServiceImpl::with_resolver(repositories.clone(), chapter_stories.clone()),
        );
        let review_service = ReviewService::new(
            extraction_service.clone(),
            persistence_service.clone(),
            config.review_session_ttl,
        );
        let upload_service: Arc<dyn UploadService> = Arc::new(UploadServiceImpl::new(
            storage,
            repositories.clone(),
            chapter_stories,
            UploadLimits {
                max_bytes: config.max_upload_bytes,
                max_document_bytes: config.max_document_bytes,
            },
        ));
        let saved_data_service = SavedDataService::new(repositories, config.saved_data_limit);

        Self {
            config,
            extraction_service,
            persistence_service,
            review_service,
            upload_service,
            saved_data_service,
        }
    }
}
