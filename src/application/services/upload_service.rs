//! Upload Service - Stores an uploaded document and files it as a chapter
//!
//! Every step short-circuits on failure. An object that was stored before a
//! later step failed stays in storage.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{ObjectStoragePort, Repositories, StorageError};
use crate::application::services::document_processor::{
    self, DocumentFormat, ExtractedContent,
};
use crate::application::services::persistence_service::{ChapterStoryError, ChapterStoryResolver};
use crate::domain::entities::Chapter;
use crate::domain::value_objects::{StoryId, UserId};

/// Summary given to the placeholder story created for an upload
pub const UPLOADED_FILE_STORY_SUMMARY: &str = "Story created from uploaded file";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("Unsupported file type: {0}. Accepted types are .txt, .docx, .doc and .pdf")]
    UnsupportedFileType(String),
    #[error("File exceeds the upload limit of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("File upload failed: {0}")]
    Storage(String),
    #[error("File processing failed: {0}")]
    Processing(String),
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error("Failed to create story: {0}")]
    StoryCreation(String),
    #[error("Failed to save chapter: {0}")]
    ChapterCreation(String),
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub chapter_title: Option<String>,
    pub story_id: Option<StoryId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub story_id: String,
    pub chapter_id: String,
}

/// `{millis}-{random base36}.{ext}`
pub fn generate_object_name(extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..11)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        suffix,
        extension
    )
}

#[async_trait]
pub trait UploadService: Send + Sync {
    /// Store, process and file an upload as chapter 1 of a story
    async fn upload_and_process(
        &self,
        user_id: Option<UserId>,
        request: UploadRequest,
    ) -> Result<UploadOutcome, UploadError>;

    /// Remove one of the caller's stored objects
    async fn delete_file(&self, user_id: Option<UserId>, file_name: &str) -> Result<(), UploadError>;
}

/// Size caps applied to an upload
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Raw upload size
    pub max_bytes: usize,
    /// Decompressed size of a `.docx` document body
    pub max_document_bytes: u64,
}

pub struct UploadServiceImpl {
    storage: Arc<dyn ObjectStoragePort>,
    repositories: Repositories,
    chapter_stories: Arc<ChapterStoryResolver>,
    limits: UploadLimits,
}

impl UploadServiceImpl {
    pub fn new(
        storage: Arc<dyn ObjectStoragePort>,
        repositories: Repositories,
        chapter_stories: Arc<ChapterStoryResolver>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            storage,
            repositories,
            chapter_stories,
            limits,
        }
    }

    fn validate(&self, request: &UploadRequest) -> Result<String, UploadError> {
        if DocumentFormat::from_file_name(&request.file_name).is_none() {
            return Err(UploadError::UnsupportedFileType(request.file_name.clone()));
        }
        if request.bytes.len() > self.limits.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.limits.max_bytes,
            });
        }
        document_processor::extension(&request.file_name)
            .ok_or_else(|| UploadError::UnsupportedFileType(request.file_name.clone()))
    }

    async fn store(&self, user_id: UserId, extension: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let key = format!("{}/{}", user_id, generate_object_name(extension));
        self.storage
            .upload(&key, bytes)
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))
    }

    async fn process(&self, path: &str) -> Result<ExtractedContent, UploadError> {
        let bytes = self
            .storage
            .download(path)
            .await
            .map_err(|e| UploadError::Processing(e.to_string()))?;
        document_processor::extract_content(&bytes, path, self.limits.max_document_bytes)
            .map_err(|e| UploadError::Processing(e.to_string()))
    }
}

#[async_trait]
impl UploadService for UploadServiceImpl {
    #[instrument(skip(self, request), fields(file_name = %request.file_name, size = request.bytes.len()))]
    async fn upload_and_process(
        &self,
        user_id: Option<UserId>,
        request: UploadRequest,
    ) -> Result<UploadOutcome, UploadError> {
        let user_id = user_id.ok_or(UploadError::NotAuthenticated)?;
        let extension = self.validate(&request)?;

        let file_path = self.store(user_id, &extension, &request.bytes).await?;
        debug!(file_path = %file_path, "Stored upload");

        let content = self.process(&file_path).await.map_err(|e| {
            warn!(file_path = %file_path, error = %e, "Stored object left behind");
            e
        })?;

        let story_id = self
            .chapter_stories
            .resolve(user_id, request.story_id, UPLOADED_FILE_STORY_SUMMARY)
            .await
            .map_err(|e| match e {
                ChapterStoryError::StoryNotFound(id) => UploadError::StoryNotFound(id),
                ChapterStoryError::Repository(e) => UploadError::StoryCreation(e.to_string()),
            })?;

        let title = request
            .chapter_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Chapter from {}", request.file_name));
        let mut chapter = Chapter::new(story_id, user_id, title, 1);
        chapter.word_count = document_processor::word_count(&content.plain);
        chapter.summary = Some(format!(
            "Content extracted from uploaded file: {}",
            request.file_name
        ));
        chapter.content_plain = Some(content.plain);
        chapter.content_xml = Some(content.xml);

        let chapter_id = self
            .repositories
            .chapters
            .create(&chapter)
            .await
            .map_err(|e| UploadError::ChapterCreation(e.to_string()))?;

        info!(chapter_id = %chapter_id, story_id = %story_id, "Processed upload into chapter");
        Ok(UploadOutcome {
            success: true,
            message: format!(
                "Successfully uploaded and processed file: {}",
                request.file_name
            ),
            file_path,
            story_id: story_id.to_string(),
            chapter_id: chapter_id.to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn delete_file(&self, user_id: Option<UserId>, file_name: &str) -> Result<(), UploadError> {
        let user_id = user_id.ok_or(UploadError::NotAuthenticated)?;
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return Err(UploadError::InvalidFileName(file_name.to_string()));
        }

        let key = format!("{}/{}", user_id, file_name);
        match self.storage.remove(&key).await {
            Ok(()) => {
                info!(key = %key, "Deleted stored file");
                Ok(())
            }
            Err(StorageError::NotFound(_)) => Err(UploadError::FileNotFound(file_name.to_string())),
            Err(e) => Err(UploadError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        repositories, InMemoryRepository, InMemoryStorage,
    };
    use crate::domain::value_objects::ChapterStoryPolicy;

    struct Fixture {
        repo: Arc<InMemoryRepository>,
        storage: Arc<InMemoryStorage>,
        service: UploadServiceImpl,
    }

    fn fixture_with(storage: InMemoryStorage, policy: ChapterStoryPolicy) -> Fixture {
        let repo = Arc::new(InMemoryRepository::default());
        let storage = Arc::new(storage);
        let resolver = Arc::new(ChapterStoryResolver::new(repo.clone(), policy));
        let limits = UploadLimits {
            max_bytes: 1024,
            max_document_bytes: 64 * 1024,
        };
        let service = UploadServiceImpl::new(storage.clone(), repositories(&repo), resolver, limits);
        Fixture {
            repo,
            storage,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(InMemoryStorage::default(), ChapterStoryPolicy::AlwaysCreate)
    }

    fn request(name: &str, bytes: &[u8]) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
            chapter_title: None,
            story_id: None,
        }
    }

    #[test]
    fn test_object_name_shape() {
        let name = generate_object_name("txt");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "txt");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 11);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_text_upload_becomes_chapter_one() {
        let f = fixture();
        let user = UserId::new();

        let outcome = f
            .service
            .upload_and_process(Some(user), request("notes.txt", b"Line one\nLine two"))
            .await
            .unwrap();

        assert_eq!(outcome.message, "Successfully uploaded and processed file: notes.txt");
        assert!(outcome.file_path.starts_with(&format!("{}/", user)));
        assert!(outcome.file_path.ends_with(".txt"));

        let chapters = f.repo.chapters.lock().unwrap();
        let chapter = &chapters[0];
        assert_eq!(chapter.title, "Chapter from notes.txt");
        assert_eq!(chapter.chapter_number, 1);
        assert_eq!(chapter.word_count, 4);
        assert_eq!(chapter.content_plain.as_deref(), Some("Line one\nLine two"));
        assert!(chapter
            .content_xml
            .as_deref()
            .unwrap()
            .contains("<paragraph id=\"2\">Line two</paragraph>"));
        assert_eq!(
            chapter.summary.as_deref(),
            Some("Content extracted from uploaded file: notes.txt")
        );

        let stories = f.repo.stories.lock().unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].summary.as_deref(), Some("Story created from uploaded file"));
    }

    #[tokio::test]
    async fn test_chapter_title_and_story_are_honoured() {
        let f = fixture();
        let user = UserId::new();
        let story = crate::domain::entities::Story::new(user, "Existing");
        f.repo.stories.lock().unwrap().push(story.clone());

        let mut req = request("draft.pdf", b"%PDF");
        req.chapter_title = Some("Prologue".to_string());
        req.story_id = Some(story.id);
        f.service.upload_and_process(Some(user), req).await.unwrap();

        assert_eq!(f.repo.story_count(), 1);
        let chapter = f.repo.chapters.lock().unwrap()[0].clone();
        assert_eq!(chapter.title, "Prologue");
        assert_eq!(chapter.story_id, story.id);
        assert!(chapter
            .content_plain
            .unwrap()
            .starts_with("Extracted content from "));
    }

    #[tokio::test]
    async fn test_upload_requires_user() {
        let f = fixture();
        let err = f
            .service
            .upload_and_process(None, request("notes.txt", b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NotAuthenticated));
        assert!(f.storage.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected_before_storage() {
        let f = fixture();
        let err = f
            .service
            .upload_and_process(Some(UserId::new()), request("cover.png", b"png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFileType(_)));
        assert!(f.storage.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let f = fixture();
        let err = f
            .service
            .upload_and_process(Some(UserId::new()), request("big.txt", &[b'a'; 2048]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn test_processing_failure_leaves_object_and_no_rows() {
        let storage = InMemoryStorage {
            fail_downloads: true,
            ..Default::default()
        };
        let f = fixture_with(storage, ChapterStoryPolicy::AlwaysCreate);
        let err = f
            .service
            .upload_and_process(Some(UserId::new()), request("notes.txt", b"text"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "File processing failed: Storage I/O error: connection reset");
        assert_eq!(f.storage.objects.lock().unwrap().len(), 1);
        assert_eq!(f.repo.story_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_story_is_rejected() {
        let f = fixture();
        let mut req = request("notes.txt", b"text");
        let missing = StoryId::new();
        req.story_id = Some(missing);
        let err = f
            .service
            .upload_and_process(Some(UserId::new()), req)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::StoryNotFound(id) if id == missing));
        assert_eq!(f.repo.chapter_count(), 0);
    }

    #[tokio::test]
    async fn test_story_of_another_user_is_rejected() {
        let f = fixture();
        let story = crate::domain::entities::Story::new(UserId::new(), "Someone else's");
        f.repo.stories.lock().unwrap().push(story.clone());

        let mut req = request("notes.txt", b"text");
        req.story_id = Some(story.id);
        let err = f
            .service
            .upload_and_process(Some(UserId::new()), req)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::StoryNotFound(_)));
        assert_eq!(f.repo.chapter_count(), 0);
    }

    #[tokio::test]
    async fn test_find_or_create_reuses_placeholder_across_uploads() {
        let f = fixture_with(InMemoryStorage::default(), ChapterStoryPolicy::FindOrCreate);
        let user = UserId::new();
        for name in ["one.txt", "two.txt"] {
            f.service
                .upload_and_process(Some(user), request(name, b"text"))
                .await
                .unwrap();
        }
        assert_eq!(f.repo.story_count(), 1);
        assert_eq!(f.repo.chapter_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_file_is_scoped_to_user() {
        let f = fixture();
        let user = UserId::new();
        let outcome = f
            .service
            .upload_and_process(Some(user), request("notes.txt", b"text"))
            .await
            .unwrap();
        let file_name = outcome.file_path.rsplit('/').next().unwrap().to_string();

        let other = f.service.delete_file(Some(UserId::new()), &file_name).await;
        assert!(matches!(other, Err(UploadError::FileNotFound(_))));

        f.service.delete_file(Some(user), &file_name).await.unwrap();
        assert!(f.storage.objects.lock().unwrap().is_empty());

        let traversal = f.service.delete_file(Some(user), "../secret.txt").await;
        assert!(matches!(traversal, Err(UploadError::InvalidFileName(_))));
    }
}
