//! Saved data viewer - Recent rows of each category for the current user

use futures_util::future::try_join4;
use tracing::{debug, instrument};

use crate::application::ports::outbound::{Repositories, RepositoryError};
use crate::domain::entities::{Chapter, CharacterProfile, Location, Story};
use crate::domain::value_objects::UserId;

#[derive(Debug, thiserror::Error)]
pub enum SavedDataError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Default)]
pub struct SavedData {
    pub characters: Vec<CharacterProfile>,
    pub locations: Vec<Location>,
    pub stories: Vec<Story>,
    pub chapters: Vec<Chapter>,
}

pub struct SavedDataService {
    repositories: Repositories,
    limit: i64,
}

impl SavedDataService {
    pub fn new(repositories: Repositories, limit: i64) -> Self {
        Self {
            repositories,
            limit,
        }
    }

    /// Query all four categories concurrently
    #[instrument(skip(self))]
    pub async fn load(&self, user_id: Option<UserId>) -> Result<SavedData, SavedDataError> {
        let user_id = user_id.ok_or(SavedDataError::NotAuthenticated)?;

        let (characters, locations, stories, chapters) = try_join4(
            self.repositories.characters.list_for_user(user_id, self.limit),
            self.repositories.locations.list_for_user(user_id, self.limit),
            self.repositories.stories.list_for_user(user_id, self.limit),
            self.repositories.chapters.list_for_user(user_id, self.limit),
        )
        .await?;

        debug!(
            characters = characters.len(),
            locations = locations.len(),
            stories = stories.len(),
            chapters = chapters.len(),
            "Loaded saved data"
        );
        Ok(SavedData {
            characters,
            locations,
            stories,
            chapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::services::persistence_service::{
        PersistenceService, PersistenceServiceImpl, SaveOptions,
    };
    use crate::application::services::extraction_service::{extract_items, SAMPLE_CONTENT};
    use crate::application::services::test_support::{repositories, InMemoryRepository};
    use crate::domain::value_objects::{ChapterStoryPolicy, ItemType};

    #[tokio::test]
    async fn test_load_is_scoped_and_limited() {
        let repo = Arc::new(InMemoryRepository::default());
        let persistence = PersistenceServiceImpl::new(repositories(&repo), ChapterStoryPolicy::AlwaysCreate);
        let user = UserId::new();
        let items = extract_items(SAMPLE_CONTENT, &ItemType::ALL);
        persistence
            .save_items(Some(user), &items, SaveOptions::default())
            .await
            .unwrap();
        persistence
            .save_items(Some(UserId::new()), &items, SaveOptions::default())
            .await
            .unwrap();

        let service = SavedDataService::new(repositories(&repo), 1);
        let data = service.load(Some(user)).await.unwrap();
        assert_eq!(data.characters.len(), 1);
        assert_eq!(data.locations.len(), 1);
        assert_eq!(data.stories.len(), 1);
        assert_eq!(data.chapters.len(), 1);
        assert!(data.characters.iter().all(|c| c.user_id == user));

        let all = SavedDataService::new(repositories(&repo), 10)
            .load(Some(user))
            .await
            .unwrap();
        assert_eq!(all.characters.len(), 2);
        // The story item plus the chapter's placeholder
        assert_eq!(all.stories.len(), 2);
    }

    #[tokio::test]
    async fn test_load_requires_user() {
        let repo = Arc::new(InMemoryRepository::default());
        let result = SavedDataService::new(repositories(&repo), 10).load(None).await;
        assert!(matches!(result, Err(SavedDataError::NotAuthenticated)));
    }
}
