//! Persistence Service - Saves extracted items into the story tables
//!
//! Items are saved one after another. A failing item is recorded and the
//! batch moves on; nothing already written is rolled back.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{Repositories, RepositoryError, StoryRepositoryPort};
use crate::application::services::record_mapper;
use crate::domain::entities::{ExtractedItem, Story};
use crate::domain::value_objects::{ChapterStoryPolicy, ItemType, StoryId, UserId};

/// Summary given to the placeholder story created for a saved chapter
pub const SAVED_CHAPTER_STORY_SUMMARY: &str = "Story extracted from content";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("User not authenticated")]
    NotAuthenticated,
}

/// One item that could not be written
#[derive(Debug, Clone, thiserror::Error)]
#[error("Failed to save {item_type}: {cause}")]
pub struct ItemSaveError {
    pub item_type: ItemType,
    pub cause: String,
}

impl ItemSaveError {
    fn new(item_type: ItemType, cause: impl Display) -> Self {
        Self {
            item_type,
            cause: cause.to_string(),
        }
    }
}

/// Identifier of a row created for the item at `index`
#[derive(Debug, Clone, Serialize)]
pub struct SavedRecord {
    pub index: usize,
    pub item_type: ItemType,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub saved: Vec<SavedRecord>,
}

impl SaveResult {
    pub fn from_outcomes(saved: Vec<SavedRecord>, errors: Vec<ItemSaveError>) -> Self {
        let mut message = format!("Successfully saved {} items", saved.len());
        if !errors.is_empty() {
            message.push_str(&format!(", {} failed", errors.len()));
        }
        Self {
            success: errors.is_empty(),
            message,
            errors: if errors.is_empty() {
                None
            } else {
                Some(errors.iter().map(ToString::to_string).collect())
            },
            saved,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Story that saved chapters attach to; skips placeholder handling
    pub story_id: Option<StoryId>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChapterStoryError {
    /// Missing, or owned by another user
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Picks the story a new chapter belongs to
///
/// An explicit story must belong to the caller. Otherwise `AlwaysCreate`
/// inserts a fresh placeholder story and `FindOrCreate` reuses the caller's
/// existing one. One resolver is shared by every service that files
/// chapters, so the find-then-create step never runs twice at once.
pub struct ChapterStoryResolver {
    stories: Arc<dyn StoryRepositoryPort>,
    policy: ChapterStoryPolicy,
    placeholder_lock: Mutex<()>,
}

impl ChapterStoryResolver {
    pub fn new(stories: Arc<dyn StoryRepositoryPort>, policy: ChapterStoryPolicy) -> Self {
        Self {
            stories,
            policy,
            placeholder_lock: Mutex::new(()),
        }
    }

    pub async fn resolve(
        &self,
        user_id: UserId,
        explicit: Option<StoryId>,
        placeholder_summary: &str,
    ) -> Result<StoryId, ChapterStoryError> {
        if let Some(story_id) = explicit {
            return match self.stories.find_for_user(user_id, story_id).await? {
                Some(story) => Ok(story.id),
                None => Err(ChapterStoryError::StoryNotFound(story_id)),
            };
        }

        if self.policy == ChapterStoryPolicy::AlwaysCreate {
            return Ok(self.create_placeholder(user_id, placeholder_summary).await?);
        }

        let _guard = self.placeholder_lock.lock().await;
        if let Some(existing) = self.stories.find_placeholder(user_id).await? {
            debug!(story_id = %existing.id, "Reusing placeholder story");
            return Ok(existing.id);
        }
        Ok(self.create_placeholder(user_id, placeholder_summary).await?)
    }

    async fn create_placeholder(
        &self,
        user_id: UserId,
        summary: &str,
    ) -> Result<StoryId, RepositoryError> {
        let story = Story::placeholder(user_id, summary);
        let story_id = self.stories.create(&story).await?;
        debug!(story_id = %story_id, "Created placeholder story");
        Ok(story_id)
    }
}

/// Persistence service trait defining the save use cases
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Save every item for the current user, collecting per-item failures
    async fn save_items(
        &self,
        user_id: Option<UserId>,
        items: &[ExtractedItem],
        options: SaveOptions,
    ) -> Result<SaveResult, SaveError>;

    /// Save one item; returns the id of the row created for it
    async fn save_item(
        &self,
        user_id: UserId,
        item: &ExtractedItem,
        options: SaveOptions,
    ) -> Result<String, ItemSaveError>;
}

pub struct PersistenceServiceImpl {
    repositories: Repositories,
    chapter_stories: Arc<ChapterStoryResolver>,
}

impl PersistenceServiceImpl {
    pub fn new(repositories: Repositories, policy: ChapterStoryPolicy) -> Self {
        let chapter_stories = Arc::new(ChapterStoryResolver::new(
            repositories.stories.clone(),
            policy,
        ));
        Self::with_resolver(repositories, chapter_stories)
    }

    /// Share a resolver with other services that file chapters
    pub fn with_resolver(
        repositories: Repositories,
        chapter_stories: Arc<ChapterStoryResolver>,
    ) -> Self {
        Self {
            repositories,
            chapter_stories,
        }
    }

    async fn write(
        &self,
        user_id: UserId,
        item: &ExtractedItem,
        options: SaveOptions,
    ) -> Result<String, ChapterStoryError> {
        let id = match item.item_type {
            ItemType::Character => {
                let record = record_mapper::character_record(item, user_id);
                self.repositories.characters.create(&record).await?.to_string()
            }
            ItemType::Location => {
                let location = record_mapper::location_row(item, user_id);
                self.repositories.locations.create(&location).await?.to_string()
            }
            ItemType::Story => {
                let story = record_mapper::story_row(item, user_id);
                self.repositories.stories.create(&story).await?.to_string()
            }
            ItemType::Chapter => {
                let story_id = self
                    .chapter_stories
                    .resolve(user_id, options.story_id, SAVED_CHAPTER_STORY_SUMMARY)
                    .await?;
                let chapter = record_mapper::chapter_row(item, user_id, story_id);
                self.repositories.chapters.create(&chapter).await?.to_string()
            }
        };
        Ok(id)
    }
}

#[async_trait]
impl PersistenceService for PersistenceServiceImpl {
    #[instrument(skip(self, items, options), fields(count = items.len()))]
    async fn save_items(
        &self,
        user_id: Option<UserId>,
        items: &[ExtractedItem],
        options: SaveOptions,
    ) -> Result<SaveResult, SaveError> {
        let user_id = user_id.ok_or(SaveError::NotAuthenticated)?;

        let mut saved = Vec::new();
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match self.save_item(user_id, item, options).await {
                Ok(id) => saved.push(SavedRecord {
                    index,
                    item_type: item.item_type,
                    id,
                }),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            warn!(user_id = %user_id, errors = ?details, "Some items failed to save");
        }
        info!(user_id = %user_id, saved = saved.len(), failed = errors.len(), "Saved extracted items");

        Ok(SaveResult::from_outcomes(saved, errors))
    }

    #[instrument(skip(self, item, options), fields(item_type = %item.item_type))]
    async fn save_item(
        &self,
        user_id: UserId,
        item: &ExtractedItem,
        options: SaveOptions,
    ) -> Result<String, ItemSaveError> {
        let id = self
            .write(user_id, item, options)
            .await
            .map_err(|e| ItemSaveError::new(item.item_type, e))?;
        debug!(id = %id, "Saved item");
        Ok(id)
    }
}
