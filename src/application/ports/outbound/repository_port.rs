//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{Chapter, CharacterProfile, CharacterRecord, Location, Story};
use crate::domain::value_objects::{ChapterId, CharacterProfileId, LocationId, StoryId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Character Repository Port
// =============================================================================

/// Repository port for character profiles and their child rows
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Insert the profile, then its abilities and relationships
    async fn create(&self, record: &CharacterRecord) -> Result<CharacterProfileId, RepositoryError>;

    /// Most recent profiles owned by a user
    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<CharacterProfile>, RepositoryError>;
}

// =============================================================================
// Location Repository Port
// =============================================================================

#[async_trait]
pub trait LocationRepositoryPort: Send + Sync {
    async fn create(&self, location: &Location) -> Result<LocationId, RepositoryError>;

    async fn list_for_user(&self, user_id: UserId, limit: i64)
        -> Result<Vec<Location>, RepositoryError>;
}

// =============================================================================
// Story Repository Port
// =============================================================================

#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    async fn create(&self, story: &Story) -> Result<StoryId, RepositoryError>;

    /// A story by id, only if the user owns it
    async fn find_for_user(
        &self,
        user_id: UserId,
        story_id: StoryId,
    ) -> Result<Option<Story>, RepositoryError>;

    /// The user's oldest draft placeholder story, if one exists
    async fn find_placeholder(&self, user_id: UserId) -> Result<Option<Story>, RepositoryError>;

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Story>, RepositoryError>;
}

// =============================================================================
// Chapter Repository Port
// =============================================================================

#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// Insert a chapter; its story must already exist
    async fn create(&self, chapter: &Chapter) -> Result<ChapterId, RepositoryError>;

    async fn list_for_user(&self, user_id: UserId, limit: i64)
        -> Result<Vec<Chapter>, RepositoryError>;
}

/// The full set of repositories a service may need
#[derive(Clone)]
pub struct Repositories {
    pub characters: Arc<dyn CharacterRepositoryPort>,
    pub locations: Arc<dyn LocationRepositoryPort>,
    pub stories: Arc<dyn StoryRepositoryPort>,
    pub chapters: Arc<dyn ChapterRepositoryPort>,
}
